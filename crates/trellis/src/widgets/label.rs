//! Static text.

use crate::{
    error::Result,
    render::{Canvas, RenderContext},
    widget::Widget,
    widgets::TextSpan,
};

/// Non-focusable text.
#[derive(Debug)]
pub struct Label {
    /// Text and style.
    text: TextSpan,
}

impl Label {
    /// A label with the default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: TextSpan::new(text, "label"),
        }
    }

    /// The label text.
    pub fn text(&self) -> &str {
        self.text.text()
    }

    /// Replace the label text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text.set_text(text);
    }
}

impl Widget for Label {
    fn render(&self, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) -> Result<()> {
        self.text.draw(canvas, &ctx.quad);
        Ok(())
    }
}
