use crate::{Face, LineSegment, Orientation, Point};

/// Resolved absolute positions of a widget's four faces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Values indexed by [`Face::index`].
    faces: [f32; 4],
}

impl Bounds {
    /// Construct bounds from face positions.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            faces: [left, top, right, bottom],
        }
    }

    /// Zero-sized bounds at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Position of a face.
    pub fn get(&self, face: Face) -> f32 {
        self.faces[face.index()]
    }

    /// Set the position of a face.
    pub fn set(&mut self, face: Face, value: f32) {
        self.faces[face.index()] = value;
    }

    /// Raw face values in storage order.
    pub fn as_array(&self) -> [f32; 4] {
        self.faces
    }

    /// Horizontal size.
    pub fn width(&self) -> f32 {
        self.get(Face::Right) - self.get(Face::Left)
    }

    /// Vertical size.
    pub fn height(&self) -> f32 {
        self.get(Face::Bottom) - self.get(Face::Top)
    }

    /// Size along an axis.
    pub fn extent(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.width(),
            Orientation::Vertical => self.height(),
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.get(Face::Left), self.get(Face::Top))
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(
            (self.get(Face::Left) + self.get(Face::Right)) / 2.0,
            (self.get(Face::Top) + self.get(Face::Bottom)) / 2.0,
        )
    }

    /// Does this rectangle have no area?
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Does the rectangle contain a point? Far edges are exclusive.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.get(Face::Left)
            && p.x < self.get(Face::Right)
            && p.y >= self.get(Face::Top)
            && p.y < self.get(Face::Bottom)
    }

    /// Corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [Point; 4] {
        let (l, t, r, b) = (
            self.get(Face::Left),
            self.get(Face::Top),
            self.get(Face::Right),
            self.get(Face::Bottom),
        );
        [
            Point::new(l, t),
            Point::new(r, t),
            Point::new(r, b),
            Point::new(l, b),
        ]
    }

    /// The segment making up one face of the rectangle.
    pub fn edge(&self, face: Face) -> LineSegment {
        let [tl, tr, br, bl] = self.corners();
        match face {
            Face::Left => LineSegment { a: tl, b: bl },
            Face::Top => LineSegment { a: tl, b: tr },
            Face::Right => LineSegment { a: tr, b: br },
            Face::Bottom => LineSegment { a: bl, b: br },
        }
    }

    /// Does `other` lie entirely beyond `face` of this rectangle? Touching
    /// counts as beyond.
    pub fn is_beyond(&self, face: Face, other: &Self) -> bool {
        match face {
            Face::Left | Face::Top => other.get(face.opposite()) <= self.get(face),
            Face::Right | Face::Bottom => other.get(face.opposite()) >= self.get(face),
        }
    }
}

impl From<[f32; 4]> for Bounds {
    fn from(faces: [f32; 4]) -> Self {
        Self { faces }
    }
}
