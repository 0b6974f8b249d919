//! Trellis: retained-mode widget layout and focus routing.
//!
//! A [`Scene`] owns a tree of widgets. Every widget has four faces whose
//! positions are expressed as [`ScreenValue`]s in one of several scales, and
//! any face may be docked to a face of another widget. Each update pass
//! orders faces so that every face is resolved after the faces it reads,
//! then resolves them in a single sweep.
//!
//! On top of layout, the scene tracks per-player keyboard focus, tab and
//! directional navigation, and a priority-ordered stack of interaction
//! states per widget.
//!
//! # Module Organization
//!
//! - [`scene`] - The widget arena and update pass
//! - [`screen_value`], [`docking`], [`resolve`], [`invalidate`] - Layout
//! - [`focus`], [`navigation`] - Focus routing
//! - [`interaction`] - Interaction state stacks
//! - [`widgets`] - Built-in widgets

#![warn(missing_docs)]

pub use geom;

/// Scene configuration.
pub mod config;
/// Face docking links and the docking stack.
pub mod docking;
/// Error types.
pub mod error;
/// Per-player focus chains.
pub mod focus;
/// Widget identifiers.
pub mod id;
/// Interaction state stacks.
pub mod interaction;
/// Face staleness propagation.
pub mod invalidate;
/// Widget names and paths.
pub mod name;
/// Tab chains and directional links.
pub mod navigation;
/// Per-widget scene records.
pub mod node;
/// Commonly used traits and types.
pub mod prelude;
/// Rendering hooks.
pub mod render;
/// Face position resolution.
pub mod resolve;
/// The scene arena.
pub mod scene;
/// Scaled face positions.
pub mod screen_value;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Rotation and depth.
pub mod transform;
/// The host viewport.
pub mod viewport;
/// The widget trait.
pub mod widget;
/// Built-in widgets.
pub mod widgets;

pub use config::SceneConfig;
pub use error::{Error, Result};
pub use id::{FaceRef, MAX_PLAYERS, PlayerIndex, TypedId, WidgetId};
pub use scene::{Scene, UpdateReport, UpdateRequest, UpdateStats};
pub use screen_value::{ScaleType, ScreenValue};
pub use widget::Widget;
