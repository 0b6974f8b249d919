//! Face positions expressed in one of several coordinate systems, and the
//! conversions between them.

use std::{cell::RefCell, fmt};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    error::{Error, Result},
    geom::{Face, Orientation},
    id::{FaceRef, WidgetId},
    invalidate::Invalidation,
    resolve::{ReadMode, evaluate_face, read_face},
    scene::Scene,
};

/// Coordinate system a face position is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScaleType {
    /// Pixels from the owner's near face.
    #[default]
    PixelOwner,
    /// Pixels from the scene root's near face.
    PixelScene,
    /// Absolute viewport pixels.
    PixelViewport,
    /// Fraction of the owner's extent.
    PercentOwner,
    /// Fraction of the scene root's extent.
    PercentScene,
    /// Fraction of the viewport's extent.
    PercentViewport,
    /// Raw value, used unchanged as viewport pixels.
    None,
}

/// The region a scale type measures against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// The widget's parent.
    Owner,
    /// The scene root.
    Scene,
    /// The viewport.
    Viewport,
}

impl ScaleType {
    /// Is the value a fraction of a reference extent?
    pub fn is_percentage(self) -> bool {
        matches!(
            self,
            Self::PercentOwner | Self::PercentScene | Self::PercentViewport
        )
    }

    /// Does the value depend on the viewport rather than on any widget?
    pub fn is_viewport_relative(self) -> bool {
        self.reference() == Reference::Viewport
    }

    /// The region this scale type measures against.
    pub fn reference(self) -> Reference {
        match self {
            Self::PixelOwner | Self::PercentOwner => Reference::Owner,
            Self::PixelScene | Self::PercentScene => Reference::Scene,
            Self::PixelViewport | Self::PercentViewport | Self::None => Reference::Viewport,
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PixelOwner => "pixel-owner",
            Self::PixelScene => "pixel-scene",
            Self::PixelViewport => "pixel-viewport",
            Self::PercentOwner => "percent-owner",
            Self::PercentScene => "percent-scene",
            Self::PercentViewport => "percent-viewport",
            Self::None => "none",
        };
        f.write_str(s)
    }
}

/// A face position: the stored raw value, its scale type, and a cached
/// pixel value that is valid while `current` is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenValue {
    /// Value in `scale` units.
    raw: f32,
    /// Coordinate system of `raw`.
    scale: ScaleType,
    /// Last resolved value in viewport pixels.
    #[serde(skip)]
    resolved: f32,
    /// Is `resolved` up to date?
    #[serde(skip)]
    current: bool,
}

impl ScreenValue {
    /// A value in an arbitrary scale type.
    pub fn new(raw: f32, scale: ScaleType) -> Self {
        Self {
            raw,
            scale,
            resolved: 0.0,
            current: false,
        }
    }

    /// Pixels relative to the owner.
    pub fn pixels(raw: f32) -> Self {
        Self::new(raw, ScaleType::PixelOwner)
    }

    /// Fraction of the owner.
    pub fn percent(raw: f32) -> Self {
        Self::new(raw, ScaleType::PercentOwner)
    }

    /// Stored value.
    pub fn raw(&self) -> f32 {
        self.raw
    }

    /// Scale type of the stored value.
    pub fn scale(&self) -> ScaleType {
        self.scale
    }

    /// Cached pixel value. Only meaningful when `is_current` is true.
    pub fn resolved(&self) -> f32 {
        self.resolved
    }

    /// Is the cached pixel value up to date?
    pub fn is_current(&self) -> bool {
        self.current
    }

    /// Store a freshly resolved pixel value.
    pub(crate) fn validate(&mut self, px: f32) {
        self.resolved = px;
        self.current = true;
    }

    /// Mark the cached pixel value stale.
    pub(crate) fn invalidate(&mut self) {
        self.current = false;
    }

    /// Replace value and scale, marking the cache stale.
    pub(crate) fn assign(&mut self, raw: f32, scale: ScaleType) {
        self.raw = raw;
        self.scale = scale;
        self.current = false;
    }
}

/// A reference region along one axis: pixel values are `base + extent * raw`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseExtent {
    /// Pixel position of raw value zero.
    pub base: f32,
    /// Pixels per raw unit.
    pub extent: f32,
}

impl BaseExtent {
    /// Identity mapping: raw values are viewport pixels.
    pub const IDENTITY: Self = Self {
        base: 0.0,
        extent: 1.0,
    };

    /// Map a raw value to pixels.
    pub fn to_pixels(&self, raw: f32) -> f32 {
        self.base + self.extent * raw
    }

    /// Map pixels back to a raw value. `None` if the extent is degenerate.
    pub fn from_pixels(&self, px: f32) -> Option<f32> {
        if self.extent.abs() < f32::EPSILON {
            None
        } else {
            Some((px - self.base) / self.extent)
        }
    }
}

/// The widget whose faces a scale type measures against, or `None` when
/// the reference is the viewport. Owner-relative values on a parentless
/// widget fall through to the scene root; the scene root's own
/// scene-relative values fall through to the viewport.
pub(crate) fn container_for(scene: &Scene, widget: WidgetId, scale: ScaleType) -> Option<WidgetId> {
    let root = scene.root_id();
    match scale.reference() {
        Reference::Owner => scene
            .nodes
            .get(widget)
            .and_then(|n| n.parent)
            .or_else(|| (widget != root).then_some(root)),
        Reference::Scene => (widget != root).then_some(root),
        Reference::Viewport => None,
    }
}

/// Faces of the container that a value of `scale` on `axis` reads.
pub(crate) fn container_faces(
    scene: &Scene,
    widget: WidgetId,
    axis: Orientation,
    scale: ScaleType,
) -> Vec<FaceRef> {
    let Some(container) = container_for(scene, widget, scale) else {
        return Vec::new();
    };
    let mut out = vec![FaceRef::new(container, axis.near())];
    if scale.is_percentage() {
        out.push(FaceRef::new(container, axis.far()));
    }
    out
}

/// Reference region for a value of `scale` on the axis of `face`.
pub(crate) fn base_extent(
    scene: &Scene,
    widget: WidgetId,
    face: Face,
    scale: ScaleType,
    mode: ReadMode<'_>,
) -> BaseExtent {
    let axis = face.orientation();
    match scale {
        ScaleType::PixelViewport | ScaleType::None => BaseExtent::IDENTITY,
        ScaleType::PercentViewport => BaseExtent {
            base: 0.0,
            extent: scene.viewport.extent(axis),
        },
        _ => match container_for(scene, widget, scale) {
            Some(container) => {
                let base = read_face(scene, FaceRef::new(container, axis.near()), mode);
                let extent = if scale.is_percentage() {
                    read_face(scene, FaceRef::new(container, axis.far()), mode) - base
                } else {
                    1.0
                };
                BaseExtent { base, extent }
            }
            None if scale.is_percentage() => BaseExtent {
                base: 0.0,
                extent: scene.viewport.extent(axis),
            },
            None => BaseExtent::IDENTITY,
        },
    }
}

/// Reading and writing face positions in any coordinate system.
pub trait Positions {
    /// Stored value of a face.
    fn edge(&self, widget: WidgetId, face: Face) -> Result<ScreenValue>;

    /// Pixel value of a face in viewport space. Uses the cached value when
    /// current, and otherwise evaluates it from its inputs.
    fn pixel_value(&self, widget: WidgetId, face: Face) -> Result<f32>;

    /// Pixel value of a face in host canvas space, including the viewport
    /// origin.
    fn pixel_value_absolute(&self, widget: WidgetId, face: Face) -> Result<f32>;

    /// Store a position given in `input` units, converting it into the
    /// face's own scale type. Invalidates dependent faces on change.
    fn set_raw_value(
        &mut self,
        widget: WidgetId,
        face: Face,
        value: f32,
        input: ScaleType,
    ) -> Result<()>;

    /// Replace a face's value and scale type verbatim.
    fn set_edge(&mut self, widget: WidgetId, face: Face, value: ScreenValue) -> Result<()>;

    /// Change a face's scale type. With `convert`, the raw value is
    /// rewritten so the pixel position is preserved.
    fn set_scale_type(
        &mut self,
        widget: WidgetId,
        face: Face,
        scale: ScaleType,
        convert: bool,
    ) -> Result<()>;

    /// Set all four faces verbatim.
    fn set_edges(&mut self, widget: WidgetId, edges: [ScreenValue; 4]) -> Result<()> {
        for face in Face::ALL {
            self.set_edge(widget, face, edges[face.index()])?;
        }
        Ok(())
    }
}

impl Positions for Scene {
    fn edge(&self, widget: WidgetId, face: Face) -> Result<ScreenValue> {
        let node = self.nodes.get(widget).ok_or(Error::NodeNotFound(widget))?;
        Ok(node.edges[face.index()])
    }

    fn pixel_value(&self, widget: WidgetId, face: Face) -> Result<f32> {
        let node = self.nodes.get(widget).ok_or(Error::NodeNotFound(widget))?;
        let edge = node.edges[face.index()];
        if edge.is_current() {
            return Ok(edge.resolved());
        }
        Ok(evaluate_face(self, FaceRef::new(widget, face)))
    }

    fn pixel_value_absolute(&self, widget: WidgetId, face: Face) -> Result<f32> {
        let px = self.pixel_value(widget, face)?;
        Ok(px + self.viewport.origin_on(face.orientation()))
    }

    fn set_raw_value(
        &mut self,
        widget: WidgetId,
        face: Face,
        value: f32,
        input: ScaleType,
    ) -> Result<()> {
        let edge = self.edge(widget, face)?;
        let raw = if input == edge.scale() {
            value
        } else {
            let evaluation = RefCell::default();
            let mode = ReadMode::Evaluate(&evaluation);
            let px = base_extent(self, widget, face, input, mode).to_pixels(value);
            base_extent(self, widget, face, edge.scale(), mode)
                .from_pixels(px)
                .ok_or(Error::DegenerateExtent { widget, face })?
        };
        if raw == edge.raw() {
            return Ok(());
        }
        trace!(?widget, %face, raw, scale = %edge.scale(), "set raw value");
        if let Some(node) = self.nodes.get_mut(widget) {
            node.edges[face.index()].assign(raw, edge.scale());
        }
        self.invalidate_dependencies(widget, face);
        Ok(())
    }

    fn set_edge(&mut self, widget: WidgetId, face: Face, value: ScreenValue) -> Result<()> {
        let node = self
            .nodes
            .get_mut(widget)
            .ok_or(Error::NodeNotFound(widget))?;
        let edge = &mut node.edges[face.index()];
        if edge.raw() == value.raw() && edge.scale() == value.scale() {
            return Ok(());
        }
        edge.assign(value.raw(), value.scale());
        self.invalidate_dependencies(widget, face);
        Ok(())
    }

    fn set_scale_type(
        &mut self,
        widget: WidgetId,
        face: Face,
        scale: ScaleType,
        convert: bool,
    ) -> Result<()> {
        let edge = self.edge(widget, face)?;
        if edge.scale() == scale {
            return Ok(());
        }
        let raw = if convert {
            let px = self.pixel_value(widget, face)?;
            let evaluation = RefCell::default();
            base_extent(self, widget, face, scale, ReadMode::Evaluate(&evaluation))
                .from_pixels(px)
                .ok_or(Error::DegenerateExtent { widget, face })?
        } else {
            edge.raw()
        };
        self.set_edge(widget, face, ScreenValue::new(raw, scale))
    }
}
