//! Fixtures and instrumentation for testing scenes.

/// Canvas that records draw calls.
pub mod canvas;
/// Widget and layout fixtures.
pub mod fixtures;
/// Grids of focusable cells.
pub mod grid;

pub use canvas::{DrawOp, RecordingCanvas};
pub use fixtures::{Block, docked_row, fixed, init_tracing, scene};
pub use grid::ButtonGrid;
