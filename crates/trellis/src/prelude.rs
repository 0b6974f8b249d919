//! Import everything needed to build and drive a scene.

pub use crate::{
    config::{SceneConfig, ViewportSize},
    docking::{DockTarget, DockingGraph, PaddingScale},
    error::{Error, Result},
    focus::FocusManager,
    geom::{Bounds, Face, Orientation, Point, Quad},
    id::{FaceRef, PlayerIndex, TypedId, WidgetId},
    interaction::{InteractionStates, StateFamily, StateKind, StateTemplate},
    invalidate::Invalidation,
    navigation::Navigation,
    render::{Canvas, RenderContext},
    resolve::PositionResolver,
    scene::Scene,
    screen_value::{Positions, ScaleType, ScreenValue},
    transform::{Rotation, Transforms},
    widget::Widget,
    widgets::{Button, Checkbox, Label, Panel},
};
