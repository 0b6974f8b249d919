use crate::Point;

/// A two-dimensional line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Start point.
    pub a: Point,
    /// End point.
    pub b: Point,
}

/// Orientation of the ordered triple (p, q, r): positive for counter-clockwise.
fn cross(p: Point, q: Point, r: Point) -> f32 {
    (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
}

/// Is `q` within the bounding box of segment `p`-`r`?
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

impl LineSegment {
    /// Construct a segment from two endpoints.
    pub fn new(a: impl Into<Point>, b: impl Into<Point>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Length of the segment.
    pub fn len(&self) -> f32 {
        (self.b - self.a).length()
    }

    /// Is this a degenerate (point) segment?
    pub fn is_empty(&self) -> bool {
        self.len() == 0.0
    }

    /// Midpoint of the segment.
    pub fn midpoint(&self) -> Point {
        (self.a + self.b).scale(0.5)
    }

    /// Shortest distance from `p` to any point on this segment.
    pub fn distance_to_point(&self, p: Point) -> f32 {
        let d = self.b - self.a;
        let len2 = d.dot(d);
        if len2 == 0.0 {
            return (p - self.a).length();
        }
        let t = ((p - self.a).dot(d) / len2).clamp(0.0, 1.0);
        (p - (self.a + d.scale(t))).length()
    }

    /// Do the two segments touch or cross?
    pub fn intersects(&self, other: &Self) -> bool {
        let (p1, q1, p2, q2) = (self.a, self.b, other.a, other.b);
        let d1 = cross(p2, q2, p1);
        let d2 = cross(p2, q2, q1);
        let d3 = cross(p1, q1, p2);
        let d4 = cross(p1, q1, q2);

        if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
            && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
        {
            return true;
        }
        (d1 == 0.0 && on_segment(p2, p1, q2))
            || (d2 == 0.0 && on_segment(p2, q1, q2))
            || (d3 == 0.0 && on_segment(p1, p2, q1))
            || (d4 == 0.0 && on_segment(p1, q2, q1))
    }

    /// Shortest distance between any point on this segment and any point on
    /// `other`. Zero when the segments touch.
    pub fn distance(&self, other: &Self) -> f32 {
        if self.intersects(other) {
            return 0.0;
        }
        self.distance_to_point(other.a)
            .min(self.distance_to_point(other.b))
            .min(other.distance_to_point(self.a))
            .min(other.distance_to_point(self.b))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::approx_eq;

    #[test]
    fn parallel_offset() {
        let a = LineSegment::new((0.0, 0.0), (0.0, 10.0));
        let b = LineSegment::new((5.0, 2.0), (5.0, 8.0));
        assert!(approx_eq(a.distance(&b), 5.0));
    }

    #[test]
    fn disjoint_diagonal() {
        let a = LineSegment::new((0.0, 0.0), (0.0, 10.0));
        let b = LineSegment::new((3.0, 14.0), (3.0, 20.0));
        assert!(approx_eq(a.distance(&b), 5.0));
    }

    #[test]
    fn crossing_and_touching() {
        let a = LineSegment::new((0.0, 0.0), (10.0, 10.0));
        let b = LineSegment::new((0.0, 10.0), (10.0, 0.0));
        assert_eq!(a.distance(&b), 0.0);

        let c = LineSegment::new((10.0, 10.0), (20.0, 10.0));
        assert_eq!(a.distance(&c), 0.0);
    }

    #[test]
    fn point_segment() {
        let s = LineSegment::new((0.0, 0.0), (0.0, 0.0));
        assert!(s.is_empty());
        assert!(approx_eq(s.distance_to_point(Point::new(3.0, 4.0)), 5.0));
        assert_eq!(s.midpoint(), Point::zero());
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            cx in -100.0f32..100.0, cy in -100.0f32..100.0,
            dx in -100.0f32..100.0, dy in -100.0f32..100.0,
        ) {
            let s = LineSegment::new((ax, ay), (bx, by));
            let t = LineSegment::new((cx, cy), (dx, dy));
            prop_assert!(approx_eq(s.distance(&t), t.distance(&s)));
            prop_assert!(s.distance(&t) >= 0.0);
        }
    }
}
