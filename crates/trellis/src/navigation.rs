//! Tab chains and spatial navigation links, rebuilt from resolved bounds.

use tracing::debug;

use crate::{
    error::{Error, Result},
    focus::FocusManager,
    geom::Face,
    id::{PlayerIndex, WidgetId},
    scene::Scene,
};

/// Spatial navigation link for one face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavLink {
    /// Designer-set target. Wins over the automatic target.
    pub forced: Option<WidgetId>,
    /// Target computed from resolved bounds.
    pub auto: Option<WidgetId>,
    /// Force "no target" regardless of the other fields.
    pub null_override: bool,
}

impl NavLink {
    /// The target navigation follows, before liveness checks.
    pub fn effective(&self) -> Option<WidgetId> {
        if self.null_override {
            None
        } else {
            self.forced.or(self.auto)
        }
    }
}

/// Can any player focus the widget? Spatial links are shared by players.
fn eligible_for_any(scene: &Scene, widget: WidgetId) -> bool {
    (0..scene.config.max_players).any(|p| scene.can_accept_focus(widget, p))
}

/// Building and following navigation links.
pub trait Navigation {
    /// Focus-eligible children of a container for a player, stable-sorted by
    /// tab index. Children without an explicit index are numbered after the
    /// highest explicit index, in child order.
    fn tab_order(&self, container: WidgetId, player: PlayerIndex) -> Vec<WidgetId>;

    /// Rebuild tab chains for every attached container and player, and the
    /// automatic spatial links. Returns the number of widgets visited.
    fn rebuild_navigation_links(&mut self) -> usize;

    /// Nearest eligible sibling beyond `face` of the widget, measured between
    /// facing edges. Equidistant siblings resolve to the first in child
    /// order.
    fn auto_nav_target(&self, widget: WidgetId, face: Face) -> Option<WidgetId>;

    /// The widget navigation in `direction` leads to, if it is still
    /// attached.
    fn nav_target(&self, widget: WidgetId, direction: Face) -> Option<WidgetId>;

    /// Force a navigation target, or clear the forced target with `None`.
    fn set_nav_target(
        &mut self,
        widget: WidgetId,
        face: Face,
        target: Option<WidgetId>,
    ) -> Result<()>;

    /// Force "no target" for a face.
    fn set_nav_null_override(&mut self, widget: WidgetId, face: Face, null: bool) -> Result<()>;

    /// Set or clear a widget's explicit tab index.
    fn set_tab_index(&mut self, widget: WidgetId, index: Option<i32>) -> Result<()>;
}

impl Navigation for Scene {
    fn tab_order(&self, container: WidgetId, player: PlayerIndex) -> Vec<WidgetId> {
        let Some(node) = self.nodes.get(container) else {
            return Vec::new();
        };
        let eligible: Vec<(WidgetId, Option<i32>)> = node
            .children
            .iter()
            .copied()
            .filter(|c| self.can_accept_focus(*c, player))
            .map(|c| (c, self.nodes.get(c).and_then(|n| n.tab_index)))
            .collect();
        let mut next_auto = eligible
            .iter()
            .filter_map(|(_, i)| *i)
            .max()
            .map_or(0, |m| m.saturating_add(1));
        let mut indexed: Vec<(i32, WidgetId)> = eligible
            .into_iter()
            .map(|(c, i)| {
                let index = i.unwrap_or_else(|| {
                    let auto = next_auto;
                    next_auto = next_auto.saturating_add(1);
                    auto
                });
                (index, c)
            })
            .collect();
        indexed.sort_by_key(|(i, _)| *i);
        indexed.into_iter().map(|(_, c)| c).collect()
    }

    fn rebuild_navigation_links(&mut self) -> usize {
        let root = self.root_id();
        let ids = self.subtree_pre_order(root);
        for &id in &ids {
            let children = self
                .nodes
                .get(id)
                .map(|n| n.children.clone())
                .unwrap_or_default();
            for player in 0..self.config.max_players {
                let order = self.tab_order(id, player);
                for child in &children {
                    if let Some(n) = self.nodes.get_mut(*child) {
                        let data = n.focus.entry(player).or_default();
                        data.next_target = None;
                        data.prev_target = None;
                    }
                }
                for (i, child) in order.iter().enumerate() {
                    let prev = i.checked_sub(1).map(|j| order[j]);
                    let next = order.get(i + 1).copied();
                    if let Some(n) = self.nodes.get_mut(*child) {
                        let data = n.focus.entry(player).or_default();
                        data.prev_target = prev;
                        data.next_target = next;
                    }
                }
                if let Some(n) = self.nodes.get_mut(id) {
                    let data = n.focus.entry(player).or_default();
                    data.first_target = order.first().copied();
                    data.last_target = order.last().copied();
                }
            }
        }

        let auto = self.config.auto_navigation;
        for &id in &ids {
            let targets = Face::ALL.map(|face| {
                if auto {
                    self.auto_nav_target(id, face)
                } else {
                    None
                }
            });
            if let Some(n) = self.nodes.get_mut(id) {
                for face in Face::ALL {
                    n.navigation[face.index()].auto = targets[face.index()];
                }
            }
        }
        self.pending.nav_links = false;
        self.stats.nav_rebuilds += 1;
        debug!(widgets = ids.len(), "navigation links rebuilt");
        ids.len()
    }

    fn auto_nav_target(&self, widget: WidgetId, face: Face) -> Option<WidgetId> {
        let node = self.nodes.get(widget)?;
        let parent = self.nodes.get(node.parent?)?;
        let bounds = node.render_bounds;
        let edge = bounds.edge(face);
        let mut best: Option<(f32, WidgetId)> = None;
        for &sibling in &parent.children {
            if sibling == widget || !eligible_for_any(self, sibling) {
                continue;
            }
            let Some(other) = self.nodes.get(sibling).map(|n| n.render_bounds) else {
                continue;
            };
            if !bounds.is_beyond(face, &other) {
                continue;
            }
            let distance = edge.distance(&other.edge(face.opposite()));
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, sibling));
            }
        }
        best.map(|(_, id)| id)
    }

    fn nav_target(&self, widget: WidgetId, direction: Face) -> Option<WidgetId> {
        let target = self
            .nodes
            .get(widget)?
            .navigation[direction.index()]
            .effective()?;
        (target != widget && self.nodes.contains_key(target) && self.is_attached(target))
            .then_some(target)
    }

    fn set_nav_target(
        &mut self,
        widget: WidgetId,
        face: Face,
        target: Option<WidgetId>,
    ) -> Result<()> {
        if let Some(t) = target
            && !self.nodes.contains_key(t)
        {
            return Err(Error::NodeNotFound(t));
        }
        let node = self
            .nodes
            .get_mut(widget)
            .ok_or(Error::NodeNotFound(widget))?;
        node.navigation[face.index()].forced = target;
        self.request_update(false, false, true, false);
        Ok(())
    }

    fn set_nav_null_override(&mut self, widget: WidgetId, face: Face, null: bool) -> Result<()> {
        let node = self
            .nodes
            .get_mut(widget)
            .ok_or(Error::NodeNotFound(widget))?;
        node.navigation[face.index()].null_override = null;
        self.request_update(false, false, true, false);
        Ok(())
    }

    fn set_tab_index(&mut self, widget: WidgetId, index: Option<i32>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(widget)
            .ok_or(Error::NodeNotFound(widget))?;
        node.tab_index = index;
        self.request_update(false, false, true, false);
        Ok(())
    }
}
