//! Plain container.

use crate::{
    error::Result,
    render::{Canvas, RenderContext},
    widget::Widget,
};

/// A container that groups children and optionally fills its bounds. Never
/// takes focus itself; focus passes through to its children.
#[derive(Debug, Default)]
pub struct Panel {
    /// Background style, if filled.
    background: Option<String>,
}

impl Panel {
    /// An unfilled panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the panel with a style.
    pub fn with_background(mut self, style: impl Into<String>) -> Self {
        self.background = Some(style.into());
        self
    }
}

impl Widget for Panel {
    fn render(&self, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) -> Result<()> {
        if let Some(style) = &self.background {
            canvas.fill_rect(&ctx.quad, style);
        }
        Ok(())
    }
}
