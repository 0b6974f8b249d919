use std::marker::PhantomData;

use slotmap::new_key_type;

use crate::geom::Face;

new_key_type! {
    /// Opaque identifier for a widget stored in the scene arena.
    pub struct WidgetId;
}

/// Type-safe wrapper around a widget identifier tied to a widget type.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TypedId<T> {
    /// Untyped widget identifier.
    id: WidgetId,
    /// Marker for the widget type.
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedId<T> {
    /// Wrap an untyped widget identifier.
    pub fn new(id: WidgetId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedId<T> {}

impl<T> From<TypedId<T>> for WidgetId {
    fn from(value: TypedId<T>) -> Self {
        value.id
    }
}

/// Index of a local player. Bounded by `SceneConfig::max_players`.
pub type PlayerIndex = usize;

/// Hard upper bound on the number of players a scene tracks.
pub const MAX_PLAYERS: usize = 8;

/// A single face of a single widget: the unit of docking resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceRef {
    /// The widget.
    pub widget: WidgetId,
    /// The face.
    pub face: Face,
}

impl FaceRef {
    /// Construct a face reference.
    pub fn new(widget: impl Into<WidgetId>, face: Face) -> Self {
        Self {
            widget: widget.into(),
            face,
        }
    }
}
