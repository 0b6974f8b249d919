//! Marking faces stale when something they read changes.

use std::collections::HashSet;

use tracing::trace;

use crate::{
    docking::{DockTarget, PaddingScale},
    geom::Face,
    id::{FaceRef, WidgetId},
    scene::Scene,
    screen_value::Reference,
};

/// Propagating staleness through the face dependency graph.
pub trait Invalidation {
    /// Mark a face and every face that transitively reads it as stale, and
    /// request a positions update.
    fn invalidate_dependencies(&mut self, widget: WidgetId, face: Face);

    /// Faces that directly read `face`.
    fn face_dependents(&self, face: FaceRef) -> Vec<FaceRef>;

    /// Mark every face that depends on the viewport as stale.
    fn invalidate_viewport_edges(&mut self);

    /// Mark every face of a subtree, and everything reading them, as stale.
    fn invalidate_subtree(&mut self, widget: WidgetId);
}

/// Invalidate a set of faces and everything reachable from them through
/// the dependents relation. Returns the number of faces touched.
fn invalidate_faces(scene: &mut Scene, seeds: Vec<FaceRef>) -> usize {
    let mut work = seeds;
    let mut seen = HashSet::new();
    while let Some(current) = work.pop() {
        if !seen.insert(current) {
            continue;
        }
        let Some(node) = scene.nodes.get_mut(current.widget) else {
            continue;
        };
        node.edges[current.face.index()].invalidate();
        node.docking.resolved[current.face.index()] = false;
        work.extend(scene.face_dependents(current));
    }
    scene.request_update(false, true, false, false);
    seen.len()
}

impl Invalidation for Scene {
    fn invalidate_dependencies(&mut self, widget: WidgetId, face: Face) {
        let touched = invalidate_faces(self, vec![FaceRef::new(widget, face)]);
        trace!(?widget, %face, faces = touched, "invalidated");
    }

    fn face_dependents(&self, face: FaceRef) -> Vec<FaceRef> {
        let Some(node) = self.nodes.get(face.widget) else {
            return Vec::new();
        };
        let axis = face.face.orientation();
        let root = self.root_id();
        let is_root = face.widget == root;
        let mut out = vec![FaceRef::new(face.widget, face.face.opposite())];

        for &child in &node.children {
            let Some(child_node) = self.nodes.get(child) else {
                continue;
            };
            // Faces reading their opposite face's container are reached
            // through the opposite face.
            for f in [axis.near(), axis.far()] {
                if child_node.edges[f.index()].scale().reference() == Reference::Owner {
                    out.push(FaceRef::new(child, f));
                }
            }
        }

        for (id, other) in &self.nodes {
            for f in Face::ALL {
                let link = other.docking.link(f);
                let target = match link.target {
                    DockTarget::Unset => None,
                    DockTarget::Scene => Some(root),
                    DockTarget::Widget(t) => Some(t),
                };
                let docked_here = target == Some(face.widget)
                    && (link.target_face == face.face
                        || (link.padding_scale == PaddingScale::PercentTarget
                            && link.target_face.is_parallel(face.face)));
                // Docking may cross axes; container references never do.
                let scene_relative = is_root
                    && id != root
                    && f.orientation() == axis
                    && (other.edges[f.index()].scale().reference() == Reference::Scene
                        || link.padding_scale == PaddingScale::PercentScene
                        || (other.parent.is_none()
                            && other.edges[f.index()].scale().reference() == Reference::Owner));
                if docked_here || scene_relative {
                    out.push(FaceRef::new(id, f));
                }
            }
        }
        out
    }

    fn invalidate_viewport_edges(&mut self) {
        let root = self.root_id();
        let mut seeds = Vec::new();
        for (id, node) in &self.nodes {
            for face in Face::ALL {
                let reference = node.edges[face.index()].scale().reference();
                let padding = node.docking.link(face).padding_scale;
                if reference == Reference::Viewport
                    || padding == PaddingScale::PercentViewport
                    || id == root
                {
                    seeds.push(FaceRef::new(id, face));
                }
            }
        }
        let touched = invalidate_faces(self, seeds);
        trace!(faces = touched, "viewport edges invalidated");
    }

    fn invalidate_subtree(&mut self, widget: WidgetId) {
        let seeds = self
            .subtree_pre_order(widget)
            .into_iter()
            .flat_map(|id| Face::ALL.map(|face| FaceRef::new(id, face)))
            .collect();
        invalidate_faces(self, seeds);
    }
}
