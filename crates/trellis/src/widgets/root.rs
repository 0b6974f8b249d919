use crate::{
    name::WidgetName,
    screen_value::{ScaleType, ScreenValue},
    widget::Widget,
};

/// The widget at the root of every scene. Covers the viewport by default.
pub struct SceneRoot;

impl Widget for SceneRoot {
    fn default_edges(&self) -> [ScreenValue; 4] {
        [
            ScreenValue::new(0.0, ScaleType::PercentViewport),
            ScreenValue::new(0.0, ScaleType::PercentViewport),
            ScreenValue::new(1.0, ScaleType::PercentViewport),
            ScreenValue::new(1.0, ScaleType::PercentViewport),
        ]
    }

    fn name(&self) -> WidgetName {
        WidgetName::convert("root")
    }
}
