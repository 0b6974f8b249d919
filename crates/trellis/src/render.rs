//! The drawing interface between the scene and a host renderer.

use tracing::trace;

use crate::{
    error::Result,
    geom::{Bounds, Quad},
    id::WidgetId,
    interaction::StateKind,
    scene::Scene,
};

/// A surface widgets draw on. Coordinates are host canvas pixels.
pub trait Canvas {
    /// Fill a quad with a named style.
    fn fill_rect(&mut self, quad: &Quad, style: &str);

    /// Draw text inside a quad with a named style.
    fn draw_text(&mut self, quad: &Quad, text: &str, style: &str);
}

/// What a widget knows about itself while rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Widget being rendered.
    pub widget: WidgetId,
    /// Resolved bounds in viewport pixels.
    pub bounds: Bounds,
    /// Screen-space quad.
    pub quad: Quad,
    /// Topmost state for the first player.
    pub state: Option<&'a StateKind>,
    /// Depth.
    pub z_depth: f32,
}

/// Render visible widgets in pre-order. Hidden widgets and their
/// descendants are skipped. Returns the number of widgets rendered.
pub(crate) fn render_scene(scene: &Scene, canvas: &mut dyn Canvas) -> Result<usize> {
    let mut rendered = 0;
    let mut stack = vec![scene.root_id()];
    while let Some(id) = stack.pop() {
        let Some(node) = scene.nodes.get(id) else {
            continue;
        };
        if node.hidden {
            continue;
        }
        let ctx = RenderContext {
            widget: id,
            bounds: node.render_bounds,
            quad: node.quad,
            state: node.states.current(0),
            z_depth: node.z_depth,
        };
        node.widget.render(canvas, &ctx)?;
        rendered += 1;
        stack.extend(node.children.iter().rev().copied());
    }
    trace!(widgets = rendered, "scene rendered");
    Ok(rendered)
}
