//! The host viewport: the outermost reference region for every scene.

use crate::{
    config::ViewportSize,
    geom::{Orientation, Point},
};

/// Viewport size and origin as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Size reported by the host, if any.
    reported: Option<ViewportSize>,
    /// Size used until the host reports one.
    fallback: ViewportSize,
    /// Offset of the viewport within the host canvas.
    origin: Point,
}

impl Viewport {
    /// Construct a viewport that has not yet been sized by the host.
    pub fn new(fallback: ViewportSize) -> Self {
        Self {
            reported: None,
            fallback,
            origin: Point::zero(),
        }
    }

    /// Effective size.
    pub fn size(&self) -> ViewportSize {
        self.reported.unwrap_or(self.fallback)
    }

    /// Has the host reported a size?
    pub fn is_reported(&self) -> bool {
        self.reported.is_some()
    }

    /// Effective extent along an axis.
    pub fn extent(&self, orientation: Orientation) -> f32 {
        let size = self.size();
        match orientation {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    /// Origin offset within the host canvas.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Origin offset along an axis.
    pub fn origin_on(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.origin.x,
            Orientation::Vertical => self.origin.y,
        }
    }

    /// Record a new size. Returns `true` if the effective size changed.
    pub(crate) fn set_size(&mut self, size: ViewportSize) -> bool {
        let before = self.size();
        self.reported = Some(size);
        before != size
    }

    /// Record a new origin. Returns `true` if it changed.
    pub(crate) fn set_origin(&mut self, origin: Point) -> bool {
        let changed = self.origin != origin;
        self.origin = origin;
        changed
    }
}
