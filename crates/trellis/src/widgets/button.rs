//! Button widget.

use crate::{
    error::Result,
    interaction::StateKind,
    name::WidgetName,
    render::{Canvas, RenderContext},
    widget::Widget,
    widgets::TextSpan,
};

/// A focusable button. Its style tracks its topmost interaction state:
/// `button`, `button/focused`, `button/pressed` and so on.
#[derive(Debug)]
pub struct Button {
    /// Label drawn over the face.
    label: TextSpan,
    /// Style of the face.
    style: String,
}

impl Button {
    /// Construct a button with a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: TextSpan::new(label, "button/label"),
            style: "button".into(),
        }
    }

    /// The button label.
    pub fn label(&self) -> &str {
        self.label.text()
    }

    /// Replace the label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label.set_text(label);
    }

    /// The current face style.
    pub fn style(&self) -> &str {
        &self.style
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::new("")
    }
}

impl Widget for Button {
    fn accept_focus(&self) -> bool {
        true
    }

    fn refresh_style(&mut self, state: Option<&StateKind>) {
        self.style = match state {
            None | Some(StateKind::Enabled) => "button".into(),
            Some(state) => format!("button/{state}"),
        };
    }

    fn render(&self, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) -> Result<()> {
        canvas.fill_rect(&ctx.quad, &self.style);
        self.label.draw(canvas, &ctx.quad);
        Ok(())
    }

    fn name(&self) -> WidgetName {
        WidgetName::convert("button")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_follows_state() {
        let mut b = Button::new("ok");
        b.refresh_style(Some(&StateKind::Focused));
        assert_eq!(b.style(), "button/focused");
        b.refresh_style(Some(&StateKind::Enabled));
        assert_eq!(b.style(), "button");
    }
}
