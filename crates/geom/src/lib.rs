//! Floating point geometry primitives used by the trellis layout core.

#![warn(missing_docs)]

/// Widget faces and axes.
mod face;
/// Two-dimensional segments and segment distance.
mod linesegment;
/// Point helpers.
mod point;
/// Rotated quads.
mod quad;
/// Resolved four-face bounds.
mod rect;

pub use face::{Face, Orientation};
pub use linesegment::LineSegment;
pub use point::Point;
pub use quad::Quad;
pub use rect::Bounds;

/// Tolerance used for floating point comparisons throughout the layout core.
pub const EPSILON: f32 = 1.0e-3;

/// Are two values equal within [`EPSILON`]?
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
}
