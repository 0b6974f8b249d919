//! Resolving face positions into render bounds, in docking stack order.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    mem,
};

use tracing::{debug, trace, warn};

use crate::{
    docking::{Anchor, DockingGraph, PaddingScale, anchor_of, is_lock_follower},
    geom::{Face, Orientation},
    id::{FaceRef, WidgetId},
    scene::Scene,
    screen_value::{ScaleType, base_extent, container_for},
    transform::refresh_quads,
};

/// Bookkeeping for one read outside a resolution pass. Every face is
/// computed at most once, and a face met again while its own computation is
/// still running yields its last render value.
#[derive(Debug, Default)]
pub(crate) struct Evaluation {
    /// Faces whose computation is in progress.
    on_path: HashSet<FaceRef>,
    /// Faces already computed during this read.
    computed: HashMap<FaceRef, f32>,
}

/// How stale inputs are treated while computing a face.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ReadMode<'a> {
    /// Inside a resolution pass: every input is expected to be current.
    Resolved,
    /// Outside a pass: stale inputs are computed from their own inputs.
    Evaluate(&'a RefCell<Evaluation>),
}

/// Pixel value of a face outside a resolution pass.
pub(crate) fn evaluate_face(scene: &Scene, face: FaceRef) -> f32 {
    let evaluation = RefCell::default();
    read_face(scene, face, ReadMode::Evaluate(&evaluation))
}

/// Pixel value of an input face.
pub(crate) fn read_face(scene: &Scene, face: FaceRef, mode: ReadMode<'_>) -> f32 {
    let Some(node) = scene.nodes.get(face.widget) else {
        return 0.0;
    };
    let edge = node.edges[face.face.index()];
    if edge.is_current() {
        return edge.resolved();
    }
    let cached = node.render_bounds.get(face.face);
    debug_assert!(
        matches!(mode, ReadMode::Evaluate(_)),
        "face {:?} {} read before it was resolved",
        face.widget,
        face.face
    );
    match mode {
        ReadMode::Resolved => {
            warn!(widget = ?face.widget, face = %face.face, "face read before it was resolved");
            cached
        }
        ReadMode::Evaluate(evaluation) => {
            let known = evaluation.borrow().computed.get(&face).copied();
            if let Some(value) = known {
                return value;
            }
            if !evaluation.borrow_mut().on_path.insert(face) {
                trace!(widget = ?face.widget, face = %face.face, "face reads itself");
                return cached;
            }
            let value = compute_face(scene, face.widget, face.face, mode);
            let mut evaluation = evaluation.borrow_mut();
            evaluation.on_path.remove(&face);
            evaluation.computed.insert(face, value);
            value
        }
    }
}

/// Position of a face computed from its own value, ignoring docking.
fn undocked_value(scene: &Scene, widget: WidgetId, face: Face, mode: ReadMode<'_>) -> f32 {
    let Some(node) = scene.nodes.get(widget) else {
        return 0.0;
    };
    let edge = node.edges[face.index()];
    base_extent(scene, widget, face, edge.scale(), mode).to_pixels(edge.raw())
}

/// Extent of a widget along an axis from its own face values, ignoring
/// docking.
fn natural_extent(scene: &Scene, widget: WidgetId, axis: Orientation, mode: ReadMode<'_>) -> f32 {
    undocked_value(scene, widget, axis.far(), mode) - undocked_value(scene, widget, axis.near(), mode)
}

/// Padding of a docking link in pixels. Only parallel faces are padded.
fn padding_pixels(
    scene: &Scene,
    widget: WidgetId,
    face: Face,
    anchor: &Anchor,
    mode: ReadMode<'_>,
) -> f32 {
    if !face.is_parallel(anchor.link.target_face) {
        return 0.0;
    }
    let axis = face.orientation();
    let scale = match anchor.link.padding_scale {
        PaddingScale::Pixels => 1.0,
        PaddingScale::PercentViewport => scene.viewport.extent(axis),
        PaddingScale::PercentTarget => {
            let target = anchor.face.widget;
            read_face(scene, FaceRef::new(target, axis.far()), mode)
                - read_face(scene, FaceRef::new(target, axis.near()), mode)
        }
        PaddingScale::PercentOwner => natural_extent(scene, widget, axis, mode),
        PaddingScale::PercentScene => {
            base_extent(scene, widget, face, ScaleType::PercentScene, mode).extent
        }
    };
    anchor.link.padding * scale
}

/// Pixel position of a face from its inputs: the docking target plus
/// padding, the locked extent from the docked opposite face, or the
/// face's own value against its reference region.
pub(crate) fn compute_face(scene: &Scene, widget: WidgetId, face: Face, mode: ReadMode<'_>) -> f32 {
    if let Some(anchor) = anchor_of(scene, widget, face) {
        return read_face(scene, anchor.face, mode)
            + padding_pixels(scene, widget, face, &anchor, mode);
    }
    if is_lock_follower(scene, widget, face) {
        let opposite = face.opposite();
        let docked = read_face(scene, FaceRef::new(widget, opposite), mode);
        let natural = undocked_value(scene, widget, face, mode)
            - undocked_value(scene, widget, opposite, mode);
        return docked + natural;
    }
    undocked_value(scene, widget, face, mode)
}

/// Turning the docking stack into render bounds.
pub trait PositionResolver {
    /// Resolve every face in the docking stack, in order. Rebuilds the stack
    /// first if docking is pending. Returns the number of faces resolved.
    fn resolve_scene_positions(&mut self) -> usize;

    /// Resolve a single face from its already-resolved inputs and store the
    /// result in the widget's render bounds.
    fn resolve_face_position(&mut self, widget: WidgetId, face: Face) -> f32;

    /// The widget whose faces a value of `scale` on `widget` reads, or `None`
    /// for the viewport.
    fn reference_widget(&self, widget: WidgetId, scale: ScaleType) -> Option<WidgetId>;
}

impl PositionResolver for Scene {
    fn resolve_scene_positions(&mut self) -> usize {
        if self.pending.docking {
            self.rebuild_docking_stack();
        }
        let stack = mem::take(&mut self.docking_stack);
        for entry in stack.iter() {
            if let Some(node) = self.nodes.get_mut(entry.widget) {
                node.docking.resolved[entry.face.index()] = false;
                node.edges[entry.face.index()].invalidate();
            }
        }
        let mut resolved = 0;
        for entry in stack.iter() {
            if self.nodes.contains_key(entry.widget) {
                self.resolve_face_position(entry.widget, entry.face);
                resolved += 1;
            }
        }
        self.docking_stack = stack;

        refresh_quads(self);
        self.pending.positions = false;
        self.pending.nav_links = true;
        self.stats.position_passes += 1;
        debug!(faces = resolved, "scene positions resolved");
        resolved
    }

    fn resolve_face_position(&mut self, widget: WidgetId, face: Face) -> f32 {
        let value = compute_face(self, widget, face, ReadMode::Resolved);
        if let Some(node) = self.nodes.get_mut(widget) {
            node.render_bounds.set(face, value);
            node.edges[face.index()].validate(value);
            node.docking.resolved[face.index()] = true;
        }
        trace!(?widget, %face, value, "face resolved");
        value
    }

    fn reference_widget(&self, widget: WidgetId, scale: ScaleType) -> Option<WidgetId> {
        container_for(self, widget, scale)
    }
}
