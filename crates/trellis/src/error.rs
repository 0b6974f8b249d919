use std::result::Result as StdResult;

use thiserror::Error;

use crate::{geom::Face, id::WidgetId};

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("node not found: {0:?}")]
    /// A widget id does not refer to a live widget.
    NodeNotFound(WidgetId),
    #[error("node already attached: {0:?}")]
    /// The child already has a parent.
    AlreadyAttached(WidgetId),
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    /// Attaching would make a widget its own ancestor.
    WouldCreateCycle {
        /// Proposed parent.
        parent: WidgetId,
        /// Proposed child.
        child: WidgetId,
    },
    #[error("invalid operation: {0}")]
    /// The operation is not valid in the current state.
    InvalidOperation(String),
    #[error("invalid player index: {0}")]
    /// A player index outside the configured range.
    InvalidPlayer(usize),
    #[error("cannot convert {face} of {widget:?} into a zero-sized reference region")]
    /// A percentage conversion against a zero extent.
    DegenerateExtent {
        /// Widget whose face was being converted.
        widget: WidgetId,
        /// Face being converted.
        face: Face,
    },
    #[error("config: {0}")]
    /// Invalid scene configuration.
    Config(String),
    #[error("json: {0}")]
    /// Configuration could not be parsed.
    Json(#[from] serde_json::Error),
}
