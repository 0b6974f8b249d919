use crate::{Bounds, Point};

/// Four screen-space vertices of a possibly rotated widget, clockwise from
/// the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quad {
    /// Vertices in clockwise order.
    pub vertices: [Point; 4],
}

impl Quad {
    /// An axis-aligned quad covering `bounds`.
    pub fn from_bounds(bounds: &Bounds) -> Self {
        Self {
            vertices: bounds.corners(),
        }
    }

    /// Rotate every vertex around `anchor`.
    pub fn rotated(self, anchor: Point, radians: f32) -> Self {
        if radians == 0.0 {
            return self;
        }
        Self {
            vertices: self.vertices.map(|v| v.rotate_around(anchor, radians)),
        }
    }
}
