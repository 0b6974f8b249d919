//! The scene: widget arena, tree mutation and the per-frame update pass.

use std::{
    any::{Any, type_name},
    collections::{BTreeMap, HashSet},
};

use slotmap::SlotMap;
use tracing::debug;

use crate::{
    config::{SceneConfig, ViewportSize},
    docking::{DockingGraph, DockingStack},
    error::{Error, Result},
    focus::{FocusManager, release_focus},
    geom::{Bounds, Point},
    id::{PlayerIndex, TypedId, WidgetId},
    interaction::{InteractionStates, StateStack},
    invalidate::Invalidation,
    name::{WidgetName, WidgetPath},
    navigation::Navigation,
    node::Node,
    render::{Canvas, render_scene},
    resolve::PositionResolver,
    viewport::Viewport,
    widget::Widget,
    widgets::SceneRoot,
};

/// Subsystems waiting to run in the next update pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Rebuild the docking stack.
    pub docking: bool,
    /// Resolve face positions.
    pub positions: bool,
    /// Rebuild tab chains and spatial links.
    pub nav_links: bool,
    /// Refresh widget styles.
    pub styles: bool,
}

impl UpdateRequest {
    /// Is anything pending?
    pub fn any(&self) -> bool {
        self.docking || self.positions || self.nav_links || self.styles
    }
}

/// Which steps a single update pass ran.
pub type UpdateReport = UpdateRequest;

/// Cumulative counters across update passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Update passes run.
    pub frames: u64,
    /// Docking stack rebuilds.
    pub docking_rebuilds: u64,
    /// Position resolution passes.
    pub position_passes: u64,
    /// Navigation link rebuilds.
    pub nav_rebuilds: u64,
    /// Style refreshes.
    pub style_refreshes: u64,
}

/// A widget tree with everything needed to lay it out and route focus.
/// Scenes are independent: nothing is shared between two instances.
pub struct Scene {
    /// Widget arena.
    pub(crate) nodes: SlotMap<WidgetId, Node>,
    /// Scene root widget.
    pub(crate) root: WidgetId,
    /// Configuration.
    pub(crate) config: SceneConfig,
    /// Host viewport.
    pub(crate) viewport: Viewport,
    /// Faces in resolution order.
    pub(crate) docking_stack: DockingStack,
    /// Subsystems waiting for the next update pass.
    pub(crate) pending: UpdateRequest,
    /// Cumulative counters.
    pub(crate) stats: UpdateStats,
    /// Focused control per player.
    pub(crate) focused: BTreeMap<PlayerIndex, WidgetId>,
}

impl Scene {
    /// Create a scene with a root widget covering the viewport.
    pub fn new(config: SceneConfig) -> Result<Self> {
        config.validate()?;
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(Box::new(SceneRoot)));
        let viewport = Viewport::new(config.default_viewport);
        let mut scene = Self {
            nodes,
            root,
            config,
            viewport,
            docking_stack: DockingStack::default(),
            pending: UpdateRequest::default(),
            stats: UpdateStats::default(),
            focused: BTreeMap::new(),
        };
        scene.initialize_subtree(root)?;
        scene.request_update(true, true, true, true);
        Ok(scene)
    }

    /// Configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The scene root.
    pub fn root_id(&self) -> WidgetId {
        self.root
    }

    /// A node by id.
    pub fn node(&self, id: impl Into<WidgetId>) -> Option<&Node> {
        self.nodes.get(id.into())
    }

    /// Number of widgets in the arena, attached or not.
    pub fn widget_count(&self) -> usize {
        self.nodes.len()
    }

    /// Parent of a widget.
    pub fn parent(&self, id: impl Into<WidgetId>) -> Option<WidgetId> {
        self.nodes.get(id.into()).and_then(|n| n.parent)
    }

    /// Children of a widget.
    pub fn children(&self, id: impl Into<WidgetId>) -> &[WidgetId] {
        self.nodes
            .get(id.into())
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Resolved bounds of a widget, in viewport pixels.
    pub fn render_bounds(&self, id: impl Into<WidgetId>) -> Result<Bounds> {
        let id = id.into();
        self.nodes
            .get(id)
            .map(|n| n.render_bounds)
            .ok_or(Error::NodeNotFound(id))
    }

    /// The host viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Record a new viewport size. Viewport-relative faces are invalidated.
    /// Returns `true` if the effective size changed.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) -> bool {
        let changed = self.viewport.set_size(ViewportSize { width, height });
        if changed {
            debug!(width, height, "viewport resized");
            self.invalidate_viewport_edges();
        }
        changed
    }

    /// Record a new viewport origin. Only quads and absolute values change.
    pub fn set_viewport_origin(&mut self, x: f32, y: f32) -> bool {
        let changed = self.viewport.set_origin(Point::new(x, y));
        if changed {
            self.request_update(false, true, false, false);
        }
        changed
    }

    /// Create a widget in the arena, detached from the tree.
    pub fn create_detached<W>(&mut self, widget: W) -> WidgetId
    where
        W: Widget + 'static,
    {
        self.create_detached_boxed(Box::new(widget))
    }

    /// Create a boxed widget in the arena, detached from the tree.
    pub fn create_detached_boxed(&mut self, widget: Box<dyn Widget>) -> WidgetId {
        self.nodes.insert(Node::new(widget))
    }

    /// Create a widget and append it to a parent.
    pub fn add_child<W>(&mut self, parent: impl Into<WidgetId>, widget: W) -> Result<WidgetId>
    where
        W: Widget + 'static,
    {
        let parent = parent.into();
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        let child = self.create_detached(widget);
        self.attach(parent, child)?;
        Ok(child)
    }

    /// Create a widget, append it to a parent and return a typed id.
    pub fn add_child_typed<W>(&mut self, parent: impl Into<WidgetId>, widget: W) -> Result<TypedId<W>>
    where
        W: Widget + 'static,
    {
        self.add_child(parent, widget).map(TypedId::new)
    }

    /// Append a detached widget to a parent.
    pub fn attach(&mut self, parent: impl Into<WidgetId>, child: impl Into<WidgetId>) -> Result<()> {
        let parent = parent.into();
        let len = self.children(parent).len();
        self.attach_at(parent, child, len)
    }

    /// Insert a detached widget into a parent's children at `index`,
    /// clamped to the number of children.
    pub fn attach_at(
        &mut self,
        parent: impl Into<WidgetId>,
        child: impl Into<WidgetId>,
        index: usize,
    ) -> Result<()> {
        let parent = parent.into();
        let child = child.into();
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(Error::NodeNotFound(child));
        }
        if child == self.root || self.nodes.get(child).and_then(|n| n.parent).is_some() {
            return Err(Error::AlreadyAttached(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }

        if let Some(node) = self.nodes.get_mut(parent) {
            let index = index.min(node.children.len());
            node.children.insert(index, child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if self.is_attached(parent) {
            self.initialize_subtree(child)?;
        }
        self.invalidate_subtree(child);
        self.request_update(true, true, true, false);
        debug!(?parent, ?child, "attached");
        self.debug_assert_tree_invariants();
        Ok(())
    }

    /// Detach a widget from its parent. The subtree stays in the arena.
    pub fn detach(&mut self, child: impl Into<WidgetId>) -> Result<()> {
        let child = child.into();
        if !self.nodes.contains_key(child) {
            return Err(Error::NodeNotFound(child));
        }
        let Some(parent) = self.nodes.get(child).and_then(|n| n.parent) else {
            return Ok(());
        };
        self.release_subtree(child)?;
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|id| *id != child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        self.request_update(true, true, true, false);
        debug!(?parent, ?child, "detached");
        self.debug_assert_tree_invariants();
        Ok(())
    }

    /// Remove a widget and all its descendants from the arena.
    pub fn remove_subtree(&mut self, id: impl Into<WidgetId>) -> Result<()> {
        let id = id.into();
        if id == self.root {
            return Err(Error::InvalidOperation("cannot remove root".into()));
        }
        if !self.nodes.contains_key(id) {
            return Err(Error::NodeNotFound(id));
        }
        self.release_subtree(id)?;
        if let Some(parent) = self.nodes.get(id).and_then(|n| n.parent)
            && let Some(node) = self.nodes.get_mut(parent)
        {
            node.children.retain(|c| *c != id);
        }
        let removed = self.subtree_pre_order(id);
        for node_id in &removed {
            self.nodes.remove(*node_id);
        }
        let gone: HashSet<WidgetId> = removed.iter().copied().collect();
        self.focused.retain(|_, w| !gone.contains(w));
        self.request_update(true, true, true, false);
        debug!(?id, widgets = removed.len(), "subtree removed");
        self.debug_assert_tree_invariants();
        Ok(())
    }

    /// Set a widget's hidden flag. Hiding a focused widget kills its focus.
    /// Returns `true` if visibility changed.
    pub fn set_hidden(&mut self, id: impl Into<WidgetId>, hidden: bool) -> Result<bool> {
        let id = id.into();
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        if node.hidden == hidden {
            return Ok(false);
        }
        node.hidden = hidden;
        if hidden {
            release_focus(self, id)?;
        }
        self.request_update(false, false, true, false);
        Ok(true)
    }

    /// Set whether a widget accepts input from a player.
    pub fn set_accepts_input(
        &mut self,
        id: impl Into<WidgetId>,
        player: PlayerIndex,
        accepts: bool,
    ) -> Result<()> {
        let id = id.into();
        self.check_player(player)?;
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        node.input_mask.set(player, accepts);
        if !accepts && self.is_on_focus_path(id, player) {
            self.kill_focus(id, player)?;
        }
        self.request_update(false, false, true, false);
        Ok(())
    }

    /// Rename a widget.
    pub fn set_name(&mut self, id: impl Into<WidgetId>, name: WidgetName) -> Result<()> {
        let id = id.into();
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        node.name = name;
        Ok(())
    }

    /// Is the widget connected to the scene root?
    pub fn is_attached(&self, id: impl Into<WidgetId>) -> bool {
        let mut current = Some(id.into());
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Is the widget and every ancestor visible?
    pub fn is_visible(&self, id: impl Into<WidgetId>) -> bool {
        let mut current = Some(id.into());
        while let Some(id) = current {
            let Some(node) = self.nodes.get(id) else {
                return false;
            };
            if node.hidden {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Path of names from below the root down to a widget.
    pub fn path_of(&self, id: impl Into<WidgetId>) -> WidgetPath {
        let mut names = Vec::new();
        let mut current = Some(id.into());
        while let Some(id) = current {
            if id == self.root {
                break;
            }
            let Some(node) = self.nodes.get(id) else {
                break;
            };
            names.push(node.name.clone());
            current = node.parent;
        }
        let mut path = WidgetPath::default();
        for name in names.into_iter().rev() {
            path.push(name);
        }
        path
    }

    /// First widget matching a path from the root, taking the first child
    /// with a matching name at each step.
    pub fn find_path(&self, path: &WidgetPath) -> Option<WidgetId> {
        let mut current = self.root;
        for name in path.components() {
            current = self
                .children(current)
                .iter()
                .copied()
                .find(|c| self.nodes.get(*c).is_some_and(|n| n.name == *name))?;
        }
        Some(current)
    }

    /// Run a closure against a widget of type `W`.
    pub fn with_widget<W, R>(&self, id: impl Into<WidgetId>, f: impl FnOnce(&W) -> R) -> Result<R>
    where
        W: Widget + 'static,
    {
        let id = id.into();
        let widget = self
            .nodes
            .get(id)
            .map(|n| &*n.widget)
            .ok_or(Error::NodeNotFound(id))?;
        let any = widget as &dyn Any;
        let widget = any.downcast_ref::<W>().ok_or_else(|| {
            Error::InvalidOperation(format!("expected widget type {}", type_name::<W>()))
        })?;
        Ok(f(widget))
    }

    /// Run a closure against a mutable widget of type `W`.
    pub fn with_widget_mut<W, R>(
        &mut self,
        id: impl Into<WidgetId>,
        f: impl FnOnce(&mut W) -> R,
    ) -> Result<R>
    where
        W: Widget + 'static,
    {
        let id = id.into();
        let widget = self
            .nodes
            .get_mut(id)
            .map(|n| &mut *n.widget)
            .ok_or(Error::NodeNotFound(id))?;
        let any = widget as &mut dyn Any;
        let widget = any.downcast_mut::<W>().ok_or_else(|| {
            Error::InvalidOperation(format!("expected widget type {}", type_name::<W>()))
        })?;
        Ok(f(widget))
    }

    /// Mark subsystems for the next update pass. Flags accumulate until the
    /// pass runs.
    pub fn request_update(&mut self, docking: bool, positions: bool, nav_links: bool, styles: bool) {
        self.pending.docking |= docking;
        self.pending.positions |= positions;
        self.pending.nav_links |= nav_links;
        self.pending.styles |= styles;
    }

    /// Subsystems waiting for the next update pass.
    pub fn pending(&self) -> UpdateRequest {
        self.pending
    }

    /// Cumulative update counters.
    pub fn stats(&self) -> UpdateStats {
        self.stats
    }

    /// Run one update pass: docking rebuild, position resolution,
    /// navigation rebuild and style refresh, each at most once and only if
    /// requested.
    pub fn update_scene(&mut self) -> Result<UpdateReport> {
        let mut report = UpdateReport::default();
        if self.pending.docking {
            self.rebuild_docking_stack();
            report.docking = true;
        }
        if self.pending.positions {
            self.resolve_scene_positions();
            report.positions = true;
        }
        if self.pending.nav_links {
            self.rebuild_navigation_links();
            report.nav_links = true;
        }
        if self.pending.styles {
            self.refresh_styles();
            report.styles = true;
        }
        self.stats.frames += 1;
        debug!(?report, "scene updated");
        Ok(report)
    }

    /// Draw the visible tree. Returns the number of widgets drawn.
    pub fn render(&self, canvas: &mut dyn Canvas) -> Result<usize> {
        render_scene(self, canvas)
    }

    /// Reject player indices outside the configured range.
    pub(crate) fn check_player(&self, player: PlayerIndex) -> Result<()> {
        if player >= self.config.max_players {
            return Err(Error::InvalidPlayer(player));
        }
        Ok(())
    }

    /// Collect a subtree in pre-order, including its root.
    pub(crate) fn subtree_pre_order(&self, root: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Is `ancestor` on the parent chain of `id`?
    fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.nodes.get(p).and_then(|n| n.parent);
        }
        false
    }

    /// Kill focus on a subtree for every player and mark its faces stale.
    fn release_subtree(&mut self, id: WidgetId) -> Result<()> {
        release_focus(self, id)?;
        self.invalidate_subtree(id);
        Ok(())
    }

    /// Instantiate interaction states for uninitialized widgets in a
    /// subtree, in pre-order, and activate their initial state.
    fn initialize_subtree(&mut self, root: WidgetId) -> Result<()> {
        for id in self.subtree_pre_order(root) {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            if node.initialized {
                continue;
            }
            node.states = StateStack::from_templates(node.widget.state_templates());
            node.initialized = true;
            for player in 0..self.config.max_players {
                self.activate_initial_state(id, player)?;
            }
        }
        Ok(())
    }

    /// Hand every widget its topmost state.
    fn refresh_styles(&mut self) {
        let mut refreshed = 0;
        for (_, node) in &mut self.nodes {
            let state = node.states.current(0).cloned();
            node.widget.refresh_style(state.as_ref());
            refreshed += 1;
        }
        self.pending.styles = false;
        self.stats.style_refreshes += 1;
        debug!(widgets = refreshed, "styles refreshed");
    }

    /// Assert structural invariants on the tree in debug builds.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_assert_tree_invariants(&self) {
        debug_assert!(self.nodes.contains_key(self.root), "root node missing");
        for (id, node) in &self.nodes {
            let mut seen = HashSet::with_capacity(node.children.len());
            for child in &node.children {
                debug_assert!(seen.insert(*child), "duplicate child {child:?} under {id:?}");
                debug_assert!(
                    self.nodes.get(*child).is_some_and(|c| c.parent == Some(id)),
                    "child {child:?} parent mismatch under {id:?}"
                );
            }
            if let Some(parent) = node.parent {
                debug_assert!(
                    self.nodes
                        .get(parent)
                        .is_some_and(|p| p.children.contains(&id)),
                    "parent {parent:?} missing child {id:?}"
                );
            }
            debug_assert!(!self.parent_chain_has_cycle(id), "cycle detected from {id:?}");
        }
        for (player, id) in &self.focused {
            debug_assert!(
                self.is_attached(*id),
                "focus for player {player} points at detached widget {id:?}"
            );
        }
    }

    /// Does a widget's parent chain loop?
    #[cfg(debug_assertions)]
    fn parent_chain_has_cycle(&self, start: WidgetId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if !seen.insert(id) {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Assert structural invariants on the tree in debug builds.
    #[cfg(not(debug_assertions))]
    pub(crate) fn debug_assert_tree_invariants(&self) {}
}
