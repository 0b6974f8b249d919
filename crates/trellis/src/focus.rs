//! Per-player focus: a path from the scene root to a focused leaf, moved by
//! three-phase propagation (delegate down, apply, notify up).

use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    geom::Face,
    id::{PlayerIndex, WidgetId},
    interaction::{InteractionStates, StateKind, pop_state, push_state},
    navigation::Navigation,
    scene::Scene,
};

/// Per-player focus bookkeeping held by every widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusData {
    /// Child currently on the focus path.
    pub focused_child: Option<WidgetId>,
    /// Child that most recently held focus.
    pub last_focused_child: Option<WidgetId>,
    /// First child in tab order.
    pub first_target: Option<WidgetId>,
    /// Last child in tab order.
    pub last_target: Option<WidgetId>,
    /// Next sibling in the parent's tab order.
    pub next_target: Option<WidgetId>,
    /// Previous sibling in the parent's tab order.
    pub prev_target: Option<WidgetId>,
    /// Set while this widget is delegating focus to a child.
    pub pending_receive: bool,
}

/// Who asked a widget to change focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sender {
    /// The host or another subsystem.
    External,
    /// The widget's parent, delegating downward.
    Parent,
    /// A child that just gained focus, propagating upward.
    Child(WidgetId),
}

/// Mutable focus data for a widget and player, created on demand.
fn focus_entry(scene: &mut Scene, widget: WidgetId, player: PlayerIndex) -> Option<&mut FocusData> {
    scene
        .nodes
        .get_mut(widget)
        .map(|n| n.focus.entry(player).or_default())
}

/// Does the widget itself accept focus, as opposed to only delegating it?
fn accepts_own_focus(scene: &Scene, widget: WidgetId) -> bool {
    scene
        .nodes
        .get(widget)
        .is_some_and(|n| n.widget.accept_focus())
}

/// Child that a container hands focus to: the last focused child, then the
/// first tab target, then the first eligible child.
fn delegate_target(scene: &Scene, widget: WidgetId, player: PlayerIndex) -> Option<WidgetId> {
    let node = scene.nodes.get(widget)?;
    let data = scene.focus_data(widget, player);
    [data.last_focused_child, data.first_target]
        .into_iter()
        .flatten()
        .find(|c| node.children.contains(c) && scene.can_accept_focus(*c, player))
        .or_else(|| {
            node.children
                .iter()
                .copied()
                .find(|c| scene.can_accept_focus(*c, player))
        })
}

/// Record `child` as the widget's focused child, killing focus on the
/// previous one.
fn adopt_child(
    scene: &mut Scene,
    widget: WidgetId,
    child: WidgetId,
    player: PlayerIndex,
) -> Result<()> {
    let old = scene.focus_data(widget, player).focused_child;
    if let Some(old) = old
        && old != child
    {
        kill_from(scene, old, Sender::Parent, player, false)?;
    }
    if let Some(entry) = focus_entry(scene, widget, player) {
        entry.focused_child = Some(child);
        entry.last_focused_child = Some(child);
    }
    Ok(())
}

/// Focus propagation. Returns `false` if the widget could not take focus.
fn focus_from(
    scene: &mut Scene,
    widget: WidgetId,
    sender: Sender,
    player: PlayerIndex,
) -> Result<bool> {
    if !scene.can_accept_focus(widget, player) {
        return Ok(false);
    }
    match sender {
        Sender::Child(child) => adopt_child(scene, widget, child, player)?,
        Sender::External | Sender::Parent => {
            if let Some(target) = delegate_target(scene, widget, player) {
                if let Some(entry) = focus_entry(scene, widget, player) {
                    entry.pending_receive = true;
                }
                let delegated = focus_from(scene, target, Sender::Parent, player)?;
                if let Some(entry) = focus_entry(scene, widget, player) {
                    entry.pending_receive = false;
                }
                if delegated {
                    return Ok(true);
                }
            }
            if !accepts_own_focus(scene, widget) {
                return Ok(false);
            }
            if let Some(old) = scene.focus_data(widget, player).focused_child {
                kill_from(scene, old, Sender::Parent, player, false)?;
            }
            if let Some(entry) = focus_entry(scene, widget, player) {
                entry.focused_child = None;
            }
        }
    }

    if !scene.is_on_focus_path(widget, player)
        && !push_state(scene, widget, &StateKind::Focused, player, false)?
    {
        debug!(?widget, player, "focus refused");
        return Ok(false);
    }
    if !matches!(sender, Sender::Child(_)) {
        scene.focused.insert(player, widget);
        debug!(?widget, player, "focus set");
    }

    let parent = scene.nodes.get(widget).and_then(|n| n.parent);
    if let Some(parent) = parent
        && !focus_from(scene, parent, Sender::Child(widget), player)?
    {
        warn!(?parent, child = ?widget, player, "parent refused focus from child");
    }
    Ok(true)
}

/// Kill propagation. Returns `false` if the widget was not focused or
/// refused to give up focus. With `force`, refusals are ignored.
fn kill_from(
    scene: &mut Scene,
    widget: WidgetId,
    sender: Sender,
    player: PlayerIndex,
    force: bool,
) -> Result<bool> {
    if !scene.is_on_focus_path(widget, player) {
        return Ok(false);
    }
    if let Some(child) = scene.focus_data(widget, player).focused_child {
        kill_from(scene, child, Sender::Parent, player, force)?;
    }
    if !pop_state(scene, widget, &StateKind::Focused, player, force)? {
        debug!(?widget, player, "focus kill refused");
        return Ok(false);
    }
    if let Some(entry) = focus_entry(scene, widget, player) {
        entry.focused_child = None;
    }

    let parent = scene.nodes.get(widget).and_then(|n| n.parent);
    if scene.focused.get(&player) == Some(&widget) {
        match parent.filter(|p| scene.is_on_focus_path(*p, player)) {
            Some(p) => scene.focused.insert(player, p),
            None => scene.focused.remove(&player),
        };
    }
    if sender != Sender::Parent
        && let Some(parent) = parent
        && let Some(entry) = focus_entry(scene, parent, player)
        && entry.focused_child == Some(widget)
    {
        entry.focused_child = None;
    }
    debug!(?widget, player, "focus killed");
    Ok(true)
}

/// Remove a widget from every player's focus path, ignoring refusals. Used
/// when the widget is being removed, hidden or disabled.
pub(crate) fn release_focus(scene: &mut Scene, widget: WidgetId) -> Result<()> {
    for player in 0..scene.config.max_players {
        if scene.is_on_focus_path(widget, player) {
            kill_from(scene, widget, Sender::External, player, true)?;
        }
    }
    Ok(())
}

/// Children of a container in the order tabbing visits them.
fn tab_children(scene: &Scene, widget: WidgetId, forward: bool, player: PlayerIndex) -> Vec<WidgetId> {
    let mut order = scene.tab_order(widget, player);
    if !forward {
        order.reverse();
    }
    order
}

/// The next (or previous) eligible sibling of `child` in its parent's tab
/// chain. Follows the stored links when the child is part of the chain, and
/// otherwise falls back to a freshly computed tab order.
fn tab_neighbour(
    scene: &Scene,
    parent: WidgetId,
    child: WidgetId,
    forward: bool,
    player: PlayerIndex,
) -> Option<WidgetId> {
    let parent_data = scene.focus_data(parent, player);
    let child_data = scene.focus_data(child, player);
    let linked = parent_data.first_target == Some(child)
        || parent_data.last_target == Some(child)
        || child_data.next_target.is_some()
        || child_data.prev_target.is_some();
    if !linked {
        let order = scene.tab_order(parent, player);
        let pos = order.iter().position(|c| *c == child)?;
        let next = if forward {
            pos.checked_add(1)
        } else {
            pos.checked_sub(1)
        };
        return next.and_then(|i| order.get(i).copied());
    }

    let limit = scene.nodes.get(parent).map_or(0, |n| n.children.len());
    let mut current = child;
    for _ in 0..limit {
        let data = scene.focus_data(current, player);
        let next = if forward {
            data.next_target
        } else {
            data.prev_target
        }?;
        let sibling = scene.nodes.get(next).is_some_and(|n| n.parent == Some(parent));
        if sibling && scene.can_accept_focus(next, player) {
            return Some(next);
        }
        current = next;
    }
    None
}

/// Focus the first (or last) eligible leaf of a subtree.
fn enter(scene: &mut Scene, widget: WidgetId, forward: bool, player: PlayerIndex) -> Result<bool> {
    if !scene.can_accept_focus(widget, player) {
        return Ok(false);
    }
    for child in tab_children(scene, widget, forward, player) {
        if enter(scene, child, forward, player)? {
            return Ok(true);
        }
    }
    focus_from(scene, widget, Sender::External, player)
}

/// Move focus one step through the tab order, wrapping at the root.
fn advance(scene: &mut Scene, from: WidgetId, forward: bool, player: PlayerIndex) -> Result<bool> {
    let mut current = from;
    while let Some(parent) = scene.nodes.get(current).and_then(|n| n.parent) {
        match tab_neighbour(scene, parent, current, forward, player) {
            Some(sibling) => {
                if enter(scene, sibling, forward, player)? {
                    return Ok(true);
                }
                current = sibling;
            }
            None => current = parent,
        }
    }
    let root = scene.root_id();
    enter(scene, root, forward, player)
}

/// Managing per-player focus.
pub trait FocusManager {
    /// Can the widget, or some descendant, take focus for a player? The
    /// widget must be attached, visible, enabled along its ancestor chain and
    /// accept input from the player.
    fn can_accept_focus(&self, widget: WidgetId, player: PlayerIndex) -> bool;

    /// Is the widget on the player's focus path?
    fn is_on_focus_path(&self, widget: WidgetId, player: PlayerIndex) -> bool;

    /// Is the widget the player's focused control?
    fn is_focused(&self, widget: WidgetId, player: PlayerIndex) -> bool;

    /// The deepest focused widget for a player.
    fn focused_control(&self, player: PlayerIndex) -> Option<WidgetId>;

    /// Focus path from the scene root to the focused control.
    fn focus_path(&self, player: PlayerIndex) -> Vec<WidgetId>;

    /// Focus bookkeeping for a widget and player.
    fn focus_data(&self, widget: WidgetId, player: PlayerIndex) -> FocusData;

    /// Give focus to a widget. Containers delegate to a child where one is
    /// eligible. Returns `false` if focus could not be given.
    fn set_focus(&mut self, widget: WidgetId, player: PlayerIndex) -> Result<bool>;

    /// Remove focus from a widget and its focused descendants.
    fn kill_focus(&mut self, widget: WidgetId, player: PlayerIndex) -> Result<bool>;

    /// Focus the first eligible leaf of a subtree in tab order.
    fn focus_first_control(&mut self, widget: WidgetId, player: PlayerIndex) -> Result<bool>;

    /// Focus the last eligible leaf of a subtree in tab order.
    fn focus_last_control(&mut self, widget: WidgetId, player: PlayerIndex) -> Result<bool>;

    /// Move focus to the next control in tab order, wrapping at the end.
    fn next_control(&mut self, player: PlayerIndex) -> Result<bool>;

    /// Move focus to the previous control in tab order, wrapping at the
    /// start.
    fn prev_control(&mut self, player: PlayerIndex) -> Result<bool>;

    /// Move focus from `from` along its spatial navigation link for
    /// `direction`, skipping ineligible targets and falling back to the
    /// parent's link.
    fn navigate_focus(
        &mut self,
        from: WidgetId,
        direction: Face,
        player: PlayerIndex,
    ) -> Result<bool>;

    /// Navigate from the player's focused control.
    fn navigate(&mut self, direction: Face, player: PlayerIndex) -> Result<bool>;
}

impl FocusManager for Scene {
    fn can_accept_focus(&self, widget: WidgetId, player: PlayerIndex) -> bool {
        if player >= self.config.max_players {
            return false;
        }
        let Some(node) = self.nodes.get(widget) else {
            return false;
        };
        if !node.initialized
            || !node.accepts_input(player)
            || !self.is_attached(widget)
            || !self.is_visible(widget)
            || !self.is_enabled_chain(widget)
        {
            return false;
        }
        accepts_own_focus(self, widget)
            || node
                .children
                .iter()
                .any(|c| self.can_accept_focus(*c, player))
    }

    fn is_on_focus_path(&self, widget: WidgetId, player: PlayerIndex) -> bool {
        self.is_state_active(widget, &StateKind::Focused, player)
    }

    fn is_focused(&self, widget: WidgetId, player: PlayerIndex) -> bool {
        self.focused.get(&player) == Some(&widget)
    }

    fn focused_control(&self, player: PlayerIndex) -> Option<WidgetId> {
        self.focused.get(&player).copied()
    }

    fn focus_path(&self, player: PlayerIndex) -> Vec<WidgetId> {
        let mut path = Vec::new();
        let mut current = self.focused_control(player);
        while let Some(id) = current {
            path.push(id);
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        path.reverse();
        path
    }

    fn focus_data(&self, widget: WidgetId, player: PlayerIndex) -> FocusData {
        self.nodes
            .get(widget)
            .and_then(|n| n.focus.get(&player).copied())
            .unwrap_or_default()
    }

    fn set_focus(&mut self, widget: WidgetId, player: PlayerIndex) -> Result<bool> {
        self.check_player(player)?;
        if !self.nodes.contains_key(widget) {
            return Err(Error::NodeNotFound(widget));
        }
        focus_from(self, widget, Sender::External, player)
    }

    fn kill_focus(&mut self, widget: WidgetId, player: PlayerIndex) -> Result<bool> {
        self.check_player(player)?;
        if !self.nodes.contains_key(widget) {
            return Err(Error::NodeNotFound(widget));
        }
        kill_from(self, widget, Sender::External, player, false)
    }

    fn focus_first_control(&mut self, widget: WidgetId, player: PlayerIndex) -> Result<bool> {
        self.check_player(player)?;
        enter(self, widget, true, player)
    }

    fn focus_last_control(&mut self, widget: WidgetId, player: PlayerIndex) -> Result<bool> {
        self.check_player(player)?;
        enter(self, widget, false, player)
    }

    fn next_control(&mut self, player: PlayerIndex) -> Result<bool> {
        self.check_player(player)?;
        let root = self.root_id();
        match self.focused_control(player) {
            Some(current) => advance(self, current, true, player),
            None => enter(self, root, true, player),
        }
    }

    fn prev_control(&mut self, player: PlayerIndex) -> Result<bool> {
        self.check_player(player)?;
        let root = self.root_id();
        match self.focused_control(player) {
            Some(current) => advance(self, current, false, player),
            None => enter(self, root, false, player),
        }
    }

    fn navigate_focus(
        &mut self,
        from: WidgetId,
        direction: Face,
        player: PlayerIndex,
    ) -> Result<bool> {
        self.check_player(player)?;
        let mut visited = vec![from];
        let mut target = self.nav_target(from, direction);
        while let Some(candidate) = target {
            if visited.contains(&candidate) {
                warn!(?from, %direction, ?candidate, "navigation cycle detected");
                break;
            }
            if self.can_accept_focus(candidate, player) {
                return focus_from(self, candidate, Sender::External, player);
            }
            visited.push(candidate);
            target = self.nav_target(candidate, direction);
        }
        match self.nodes.get(from).and_then(|n| n.parent) {
            Some(parent) => self.navigate_focus(parent, direction, player),
            None => Ok(false),
        }
    }

    fn navigate(&mut self, direction: Face, player: PlayerIndex) -> Result<bool> {
        self.check_player(player)?;
        match self.focused_control(player) {
            Some(current) => self.navigate_focus(current, direction, player),
            None => Ok(false),
        }
    }
}
