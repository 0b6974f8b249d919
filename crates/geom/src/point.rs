use std::ops::{Add, Sub};

/// A point in floating point pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Construct a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Dot product, treating both points as vectors.
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean length, treating the point as a vector.
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Scale both coordinates.
    pub fn scale(self, s: f32) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
        }
    }

    /// Rotate around `anchor` by `radians` (clockwise in screen space).
    pub fn rotate_around(self, anchor: Self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        let d = self - anchor;
        Self {
            x: anchor.x + d.x * cos - d.y * sin,
            y: anchor.y + d.x * sin + d.y * cos,
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl From<(f32, f32)> for Point {
    #[inline]
    fn from(v: (f32, f32)) -> Self {
        Self { x: v.0, y: v.1 }
    }
}
