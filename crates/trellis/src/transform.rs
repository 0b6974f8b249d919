//! Widget rotation, depth and screen-space quads.

use crate::{
    error::{Error, Result},
    geom::{Bounds, Face, Point, Quad},
    id::WidgetId,
    scene::Scene,
};

/// Rotation of a widget around an anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Angle, clockwise in screen space.
    pub radians: f32,
    /// Anchor as a fraction of the widget's width and height.
    pub anchor: Point,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            radians: 0.0,
            anchor: Point::new(0.5, 0.5),
        }
    }
}

/// Where and how a widget is drawn on the host canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    /// Top-left corner on the host canvas, before rotation.
    pub origin: Point,
    /// Rotation angle.
    pub radians: f32,
    /// Rotation anchor on the host canvas.
    pub anchor: Point,
    /// Depth.
    pub z_depth: f32,
}

/// Recompute every widget's quad from its render bounds.
pub(crate) fn refresh_quads(scene: &mut Scene) {
    let origin = scene.viewport.origin();
    for (_, node) in &mut scene.nodes {
        let b = node.render_bounds;
        let shifted = Bounds::new(
            b.get(Face::Left) + origin.x,
            b.get(Face::Top) + origin.y,
            b.get(Face::Right) + origin.x,
            b.get(Face::Bottom) + origin.y,
        );
        let anchor = anchor_point(&shifted, node.rotation.anchor);
        node.quad = Quad::from_bounds(&shifted).rotated(anchor, node.rotation.radians);
    }
}

/// Absolute anchor for a relative anchor within bounds.
fn anchor_point(bounds: &Bounds, relative: Point) -> Point {
    let origin = bounds.origin();
    origin + Point::new(bounds.width() * relative.x, bounds.height() * relative.y)
}

/// Rotation and depth of widgets.
pub trait Transforms {
    /// Set a widget's rotation.
    fn set_rotation(&mut self, widget: WidgetId, rotation: Rotation) -> Result<()>;

    /// Set a widget's depth.
    fn set_z_depth(&mut self, widget: WidgetId, depth: f32) -> Result<()>;

    /// The widget's quad as of the last resolution pass.
    fn quad(&self, widget: WidgetId) -> Result<Quad>;

    /// Origin, rotation and depth of a widget on the host canvas.
    fn screen_transform(&self, widget: WidgetId) -> Result<ScreenTransform>;
}

impl Transforms for Scene {
    fn set_rotation(&mut self, widget: WidgetId, rotation: Rotation) -> Result<()> {
        let node = self
            .nodes
            .get_mut(widget)
            .ok_or(Error::NodeNotFound(widget))?;
        node.rotation = rotation;
        self.request_update(false, true, true, false);
        Ok(())
    }

    fn set_z_depth(&mut self, widget: WidgetId, depth: f32) -> Result<()> {
        let node = self
            .nodes
            .get_mut(widget)
            .ok_or(Error::NodeNotFound(widget))?;
        node.z_depth = depth;
        Ok(())
    }

    fn quad(&self, widget: WidgetId) -> Result<Quad> {
        self.nodes
            .get(widget)
            .map(|n| n.quad)
            .ok_or(Error::NodeNotFound(widget))
    }

    fn screen_transform(&self, widget: WidgetId) -> Result<ScreenTransform> {
        let node = self.nodes.get(widget).ok_or(Error::NodeNotFound(widget))?;
        let b = node.render_bounds;
        let origin = b.origin() + self.viewport.origin();
        let anchor = anchor_point(&b, node.rotation.anchor) + self.viewport.origin();
        Ok(ScreenTransform {
            origin,
            radians: node.rotation.radians,
            anchor,
            z_depth: node.z_depth,
        })
    }
}
