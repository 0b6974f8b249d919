//! Checkbox widget.

use crate::{
    error::Result,
    id::{PlayerIndex, WidgetId},
    interaction::{InteractionStates, StateFamily, StateKind, StateTemplate},
    name::WidgetName,
    render::{Canvas, RenderContext},
    scene::Scene,
    widget::Widget,
    widgets::TextSpan,
};

/// Name of the overlay state a checked checkbox carries.
pub const CHECKED: &str = "checked";

/// A focusable checkbox. Being checked is an interaction state of its own,
/// layered between Focused and Active.
#[derive(Debug)]
pub struct Checkbox {
    /// Caption drawn next to the box.
    caption: TextSpan,
    /// Mirror of the checked state, for drawing.
    checked: bool,
}

impl Checkbox {
    /// An unchecked checkbox.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: TextSpan::new(caption, "checkbox/caption"),
            checked: false,
        }
    }

    /// The checked state kind.
    pub fn checked_state() -> StateKind {
        StateKind::custom(CHECKED, StateFamily::Overlay)
    }

    /// Is the box drawn checked?
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Flip the checked state of a checkbox in a scene. Returns the new
    /// value, or the old one if the transition was refused.
    pub fn toggle(scene: &mut Scene, id: WidgetId, player: PlayerIndex) -> Result<bool> {
        let state = Self::checked_state();
        let checked = scene.is_state_active(id, &state, player);
        let changed = if checked {
            scene.deactivate_state(id, &state, player)?
        } else {
            scene.activate_state(id, &state, player)?
        };
        let now = checked != changed;
        scene.with_widget_mut::<Self, _>(id, |w| w.checked = now)?;
        Ok(now)
    }
}

impl Widget for Checkbox {
    fn accept_focus(&self) -> bool {
        true
    }

    fn state_templates(&self) -> Vec<StateTemplate> {
        let mut templates = StateTemplate::defaults();
        templates.push(StateTemplate::new(Self::checked_state()));
        templates
    }

    fn render(&self, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) -> Result<()> {
        let style = if self.checked {
            "checkbox/checked"
        } else {
            "checkbox"
        };
        canvas.fill_rect(&ctx.quad, style);
        self.caption.draw(canvas, &ctx.quad);
        Ok(())
    }

    fn name(&self) -> WidgetName {
        WidgetName::convert("checkbox")
    }
}
