use crate::{geom::Quad, render::Canvas};

/// A string and the style it is drawn with. Widgets that show text own one
/// of these rather than implementing drawing themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextSpan {
    /// Text to draw.
    text: String,
    /// Style name passed to the canvas.
    style: String,
}

impl TextSpan {
    /// A span with a style.
    pub fn new(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: style.into(),
        }
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The style name.
    pub fn style(&self) -> &str {
        &self.style
    }

    /// Replace the style name.
    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = style.into();
    }

    /// Draw into a quad. Empty text draws nothing.
    pub fn draw(&self, canvas: &mut dyn Canvas, quad: &Quad) {
        if !self.text.is_empty() {
            canvas.draw_text(quad, &self.text, &self.style);
        }
    }
}
