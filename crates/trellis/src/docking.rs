//! Docking links between faces, and the dependency-ordered docking stack
//! that fixes the order faces are resolved in.

use std::{collections::HashSet, mem};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    geom::{Face, Orientation},
    id::{FaceRef, WidgetId},
    invalidate::Invalidation,
    scene::Scene,
    screen_value::{ScaleType, container_faces},
};

/// What a face is docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DockTarget {
    /// Not docked.
    #[default]
    Unset,
    /// The scene root.
    Scene,
    /// Another widget.
    Widget(WidgetId),
}

/// Units for docking padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaddingScale {
    /// Pixels.
    #[default]
    Pixels,
    /// Fraction of the target's extent along the docked axis.
    PercentTarget,
    /// Fraction of the docked widget's own undocked extent along the docked axis.
    PercentOwner,
    /// Fraction of the scene's extent along the docked axis.
    PercentScene,
    /// Fraction of the viewport's extent along the docked axis.
    PercentViewport,
}

/// A single face's docking link.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DockLink {
    /// Widget or scene this face follows.
    pub target: DockTarget,
    /// Face of the target this face follows.
    pub target_face: Face,
    /// Offset added when the two faces are parallel.
    pub padding: f32,
    /// Units of `padding`.
    pub padding_scale: PaddingScale,
}

impl DockLink {
    /// Is a target set?
    pub fn is_set(&self) -> bool {
        self.target != DockTarget::Unset
    }
}

/// Docking configuration and resolution flags for one widget.
#[derive(Debug, Clone, Default)]
pub struct DockingSet {
    /// Link per face.
    pub(crate) links: [DockLink; 4],
    /// Face resolved during the current pass.
    pub(crate) resolved: [bool; 4],
    /// Face is on the current insertion path.
    pub(crate) linking: [bool; 4],
    /// Width is preserved when only one horizontal face is docked.
    pub(crate) width_locked: bool,
    /// Height is preserved when only one vertical face is docked.
    pub(crate) height_locked: bool,
}

impl DockingSet {
    /// The link for a face.
    pub fn link(&self, face: Face) -> DockLink {
        self.links[face.index()]
    }

    /// Does the face have a target set? Targets are not checked for
    /// liveness here.
    pub fn is_docked(&self, face: Face) -> bool {
        self.links[face.index()].is_set()
    }

    /// Was the face resolved in the current pass?
    pub fn is_resolved(&self, face: Face) -> bool {
        self.resolved[face.index()]
    }

    /// Is the extent along an axis locked?
    pub fn is_locked(&self, axis: Orientation) -> bool {
        match axis {
            Orientation::Horizontal => self.width_locked,
            Orientation::Vertical => self.height_locked,
        }
    }
}

/// Ordered sequence of faces such that every face appears after the faces
/// it reads.
#[derive(Debug, Clone, Default)]
pub struct DockingStack {
    /// Faces in resolution order.
    entries: Vec<FaceRef>,
    /// Membership index over `entries`.
    members: HashSet<FaceRef>,
}

impl DockingStack {
    /// Is the face in the stack?
    pub fn contains(&self, face: FaceRef) -> bool {
        self.members.contains(&face)
    }

    /// Position of a face, if present.
    pub fn position(&self, face: FaceRef) -> Option<usize> {
        self.entries.iter().position(|f| *f == face)
    }

    /// Faces in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &FaceRef> {
        self.entries.iter()
    }

    /// Number of faces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the stack empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.members.clear();
    }

    /// Append a face. Faces already present are ignored.
    fn push(&mut self, face: FaceRef) {
        if self.members.insert(face) {
            self.entries.push(face);
        }
    }
}

/// The face another face actually reads through its docking link, after
/// discarding links to dead or detached targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Anchor {
    /// Face being followed. Scene-docked faces follow the scene root.
    pub(crate) face: FaceRef,
    /// Link that produced the anchor.
    pub(crate) link: DockLink,
}

/// Effective docking anchor for a face, if any.
pub(crate) fn anchor_of(scene: &Scene, widget: WidgetId, face: Face) -> Option<Anchor> {
    let node = scene.nodes.get(widget)?;
    let link = node.docking.link(face);
    let target = match link.target {
        DockTarget::Unset => return None,
        DockTarget::Scene => scene.root_id(),
        DockTarget::Widget(target) => target,
    };
    if target == widget && link.target_face == face {
        return None;
    }
    if !scene.nodes.contains_key(target) || !scene.is_attached(target) {
        return None;
    }
    Some(Anchor {
        face: FaceRef::new(target, link.target_face),
        link,
    })
}

/// Faces read when converting docking padding into pixels.
pub(crate) fn padding_faces(scene: &Scene, widget: WidgetId, face: Face, anchor: &Anchor) -> Vec<FaceRef> {
    if !face.is_parallel(anchor.link.target_face) {
        return Vec::new();
    }
    let axis = face.orientation();
    match anchor.link.padding_scale {
        PaddingScale::Pixels | PaddingScale::PercentViewport => Vec::new(),
        PaddingScale::PercentTarget => vec![
            FaceRef::new(anchor.face.widget, axis.near()),
            FaceRef::new(anchor.face.widget, axis.far()),
        ],
        PaddingScale::PercentOwner => scene.nodes.get(widget).map_or_else(Vec::new, |node| {
            [axis.near(), axis.far()]
                .into_iter()
                .flat_map(|f| container_faces(scene, widget, axis, node.edges[f.index()].scale()))
                .collect()
        }),
        PaddingScale::PercentScene => {
            container_faces(scene, widget, axis, ScaleType::PercentScene)
        }
    }
}

/// Is the axis of `face` locked with exactly the opposite face docked?
pub(crate) fn is_lock_follower(scene: &Scene, widget: WidgetId, face: Face) -> bool {
    scene
        .nodes
        .get(widget)
        .is_some_and(|n| n.docking.is_locked(face.orientation()))
        && anchor_of(scene, widget, face).is_none()
        && anchor_of(scene, widget, face.opposite()).is_some()
}

/// Building and querying the docking graph.
pub trait DockingGraph {
    /// Dock `face` of `widget` to `target_face` of `target`, with a pixel
    /// padding. Passing `DockTarget::Unset` clears the link.
    fn set_dock_target(
        &mut self,
        widget: WidgetId,
        face: Face,
        target: DockTarget,
        target_face: Face,
        padding: f32,
    ) -> Result<()>;

    /// Remove the docking link on a face.
    fn clear_dock_target(&mut self, widget: WidgetId, face: Face) -> Result<()> {
        self.set_dock_target(widget, face, DockTarget::Unset, face, 0.0)
    }

    /// Change the padding on a face's docking link.
    fn set_dock_padding(
        &mut self,
        widget: WidgetId,
        face: Face,
        padding: f32,
        scale: PaddingScale,
    ) -> Result<()>;

    /// Lock or unlock the extent of a widget along an axis.
    fn set_extent_locked(&mut self, widget: WidgetId, axis: Orientation, locked: bool)
    -> Result<()>;

    /// Lock or unlock the width.
    fn set_width_locked(&mut self, widget: WidgetId, locked: bool) -> Result<()> {
        self.set_extent_locked(widget, Orientation::Horizontal, locked)
    }

    /// Lock or unlock the height.
    fn set_height_locked(&mut self, widget: WidgetId, locked: bool) -> Result<()> {
        self.set_extent_locked(widget, Orientation::Vertical, locked)
    }

    /// Faces that must be resolved before this face can be.
    fn face_dependencies(&self, widget: WidgetId, face: Face) -> Vec<FaceRef>;

    /// Insert one face, after its dependencies, into `stack`. Returns
    /// `false` if the face lies on a cycle, in which case it is omitted.
    fn add_docking_node(&mut self, stack: &mut DockingStack, widget: WidgetId, face: Face) -> bool;

    /// Insert all faces of a widget and then of its descendants. Returns
    /// `false` if any face was omitted.
    fn add_docking_link(&mut self, stack: &mut DockingStack, widget: WidgetId) -> bool;

    /// Rebuild the scene's docking stack from the root. Returns the number
    /// of faces in the new stack.
    fn rebuild_docking_stack(&mut self) -> usize;

    /// The current docking stack.
    fn docking_stack(&self) -> &DockingStack;
}

impl DockingGraph for Scene {
    fn set_dock_target(
        &mut self,
        widget: WidgetId,
        face: Face,
        target: DockTarget,
        target_face: Face,
        padding: f32,
    ) -> Result<()> {
        if let DockTarget::Widget(t) = target
            && !self.nodes.contains_key(t)
        {
            return Err(Error::NodeNotFound(t));
        }
        let node = self
            .nodes
            .get_mut(widget)
            .ok_or(Error::NodeNotFound(widget))?;
        let link = &mut node.docking.links[face.index()];
        let padding_scale = link.padding_scale;
        *link = DockLink {
            target,
            target_face,
            padding,
            padding_scale,
        };
        debug!(?widget, %face, ?target, %target_face, padding, "dock");
        self.request_update(true, true, false, false);
        self.invalidate_dependencies(widget, face);
        Ok(())
    }

    fn set_dock_padding(
        &mut self,
        widget: WidgetId,
        face: Face,
        padding: f32,
        scale: PaddingScale,
    ) -> Result<()> {
        let node = self
            .nodes
            .get_mut(widget)
            .ok_or(Error::NodeNotFound(widget))?;
        let link = &mut node.docking.links[face.index()];
        link.padding = padding;
        link.padding_scale = scale;
        // Padding units can change which faces are read.
        self.request_update(true, true, false, false);
        self.invalidate_dependencies(widget, face);
        Ok(())
    }

    fn set_extent_locked(
        &mut self,
        widget: WidgetId,
        axis: Orientation,
        locked: bool,
    ) -> Result<()> {
        let node = self
            .nodes
            .get_mut(widget)
            .ok_or(Error::NodeNotFound(widget))?;
        match axis {
            Orientation::Horizontal => node.docking.width_locked = locked,
            Orientation::Vertical => node.docking.height_locked = locked,
        }
        self.request_update(true, true, false, false);
        self.invalidate_dependencies(widget, axis.near());
        self.invalidate_dependencies(widget, axis.far());
        Ok(())
    }

    fn face_dependencies(&self, widget: WidgetId, face: Face) -> Vec<FaceRef> {
        let Some(node) = self.nodes.get(widget) else {
            return Vec::new();
        };
        let axis = face.orientation();
        let opposite = face.opposite();
        let mut deps = Vec::new();
        if let Some(anchor) = anchor_of(self, widget, face) {
            deps.push(anchor.face);
            deps.extend(padding_faces(self, widget, face, &anchor));
        } else {
            let opposite_docked = anchor_of(self, widget, opposite).is_some();
            // Far faces follow the near face; near faces follow a docked far face.
            if !face.is_near() || opposite_docked {
                deps.push(FaceRef::new(widget, opposite));
            }
            let scale = node.edges[face.index()].scale();
            deps.extend(container_faces(self, widget, axis, scale));
            if opposite_docked && node.docking.is_locked(axis) {
                let scale = node.edges[opposite.index()].scale();
                deps.extend(container_faces(self, widget, axis, scale));
            }
        }
        let mut seen = HashSet::new();
        deps.retain(|d| seen.insert(*d));
        deps
    }

    fn add_docking_node(&mut self, stack: &mut DockingStack, widget: WidgetId, face: Face) -> bool {
        let this = FaceRef::new(widget, face);
        if stack.contains(this) {
            return true;
        }
        let Some(node) = self.nodes.get_mut(widget) else {
            return false;
        };
        if node.docking.linking[face.index()] {
            warn!(?widget, %face, "docking cycle detected; face left unresolved");
            return false;
        }
        node.docking.linking[face.index()] = true;

        let mut ok = true;
        for dep in self.face_dependencies(widget, face) {
            if !self.add_docking_node(stack, dep.widget, dep.face) {
                ok = false;
                break;
            }
        }
        if ok {
            stack.push(this);
        }
        if let Some(node) = self.nodes.get_mut(widget) {
            node.docking.linking[face.index()] = false;
        }
        ok
    }

    fn add_docking_link(&mut self, stack: &mut DockingStack, widget: WidgetId) -> bool {
        let mut ok = true;
        for face in Face::ALL {
            ok &= self.add_docking_node(stack, widget, face);
        }
        let children = self
            .nodes
            .get(widget)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            ok &= self.add_docking_link(stack, child);
        }
        ok
    }

    fn rebuild_docking_stack(&mut self) -> usize {
        let mut stack = mem::take(&mut self.docking_stack);
        stack.clear();
        let root = self.root_id();
        if !self.add_docking_link(&mut stack, root) {
            debug!("docking stack rebuilt with omitted faces");
        }
        let len = stack.len();
        self.docking_stack = stack;
        self.pending.docking = false;
        self.stats.docking_rebuilds += 1;
        debug!(faces = len, "docking stack rebuilt");
        len
    }

    fn docking_stack(&self) -> &DockingStack {
        &self.docking_stack
    }
}
