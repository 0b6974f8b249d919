//! The widget trait.

use std::any::{Any, type_name};

use crate::{
    error::Result,
    interaction::{StateKind, StateTemplate},
    name::WidgetName,
    render::{Canvas, RenderContext},
    screen_value::ScreenValue,
};

/// Widgets are the behavior attached to nodes in the scene arena. Layout,
/// docking, focus and interaction state are owned by the scene; a widget
/// only answers questions about itself and draws its own content.
pub trait Widget: Any + Send {
    /// Positions of the four faces when the widget is created, in face
    /// storage order. Defaults to filling the owner.
    fn default_edges(&self) -> [ScreenValue; 4] {
        [
            ScreenValue::percent(0.0),
            ScreenValue::percent(0.0),
            ScreenValue::percent(1.0),
            ScreenValue::percent(1.0),
        ]
    }

    /// Can this widget itself hold focus? Containers that only delegate
    /// focus to their children return `false`.
    fn accept_focus(&self) -> bool {
        false
    }

    /// Interaction states instantiated for this widget at initialization.
    fn state_templates(&self) -> Vec<StateTemplate> {
        StateTemplate::defaults()
    }

    /// State activated for every player when the widget is initialized.
    fn initial_state(&self) -> StateKind {
        StateKind::Enabled
    }

    /// Called after the interaction state stack changes. `state` is the
    /// topmost state for the first player.
    fn refresh_style(&mut self, _state: Option<&StateKind>) {}

    /// Draw this widget's own content. Does not draw children.
    fn render(&self, _canvas: &mut dyn Canvas, _ctx: &RenderContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Name used for paths and diagnostics.
    fn name(&self) -> WidgetName {
        let name = type_name::<Self>();
        let short = name.rsplit("::").next().unwrap_or(name);
        WidgetName::convert(short)
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}
