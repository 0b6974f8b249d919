//! Interaction states: a priority-ordered stack of states per widget, with
//! a per-player mask for states that track individual players.

use std::fmt;

use bitvec::BitArr;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    focus::{FocusManager, release_focus},
    id::{MAX_PLAYERS, PlayerIndex, WidgetId},
    scene::Scene,
};

/// Bit per player.
pub type PlayerMask = BitArr!(for MAX_PLAYERS, in u8);

/// Families of interaction states. Exactly one state from the `Enabled`
/// or `Disabled` families is active on an initialized widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateFamily {
    /// The widget responds to input.
    Enabled,
    /// The widget ignores input and cannot be focused.
    Disabled,
    /// Layered on top of the baseline.
    Overlay,
}

/// An interaction state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Baseline: responsive.
    Enabled,
    /// Baseline: unresponsive.
    Disabled,
    /// On the focus path for a player.
    Focused,
    /// Held down by a player.
    Pressed,
    /// Hovered or otherwise highlighted by a player.
    Active,
    /// A widget-defined state.
    Custom {
        /// State name.
        name: String,
        /// State family.
        family: StateFamily,
    },
}

impl StateKind {
    /// A widget-defined state.
    pub fn custom(name: impl Into<String>, family: StateFamily) -> Self {
        Self::Custom {
            name: name.into(),
            family,
        }
    }

    /// The state's family.
    pub fn family(&self) -> StateFamily {
        match self {
            Self::Enabled => StateFamily::Enabled,
            Self::Disabled => StateFamily::Disabled,
            Self::Focused | Self::Pressed | Self::Active => StateFamily::Overlay,
            Self::Custom { family, .. } => *family,
        }
    }

    /// Is this an Enabled- or Disabled-family state?
    pub fn is_baseline(&self) -> bool {
        self.family() != StateFamily::Overlay
    }

    /// Is activation tracked per player? Baseline states are shared by all
    /// players.
    pub fn is_per_player(&self) -> bool {
        !self.is_baseline()
    }

    /// Stack priority used when a template does not specify one.
    pub fn default_priority(&self) -> i32 {
        match self {
            Self::Enabled | Self::Disabled => 0,
            Self::Focused => 10,
            Self::Custom { family, .. } if *family != StateFamily::Overlay => 0,
            Self::Custom { .. } => 15,
            Self::Active => 20,
            Self::Pressed => 30,
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => f.write_str("enabled"),
            Self::Disabled => f.write_str("disabled"),
            Self::Focused => f.write_str("focused"),
            Self::Pressed => f.write_str("pressed"),
            Self::Active => f.write_str("active"),
            Self::Custom { name, .. } => f.write_str(name),
        }
    }
}

/// Hooks attached to a state instance. The `can_*` and `allows` methods are
/// vetoes and must not have side effects.
pub trait StateBehavior: Send {
    /// May this state become active for a player?
    fn can_activate(&self, _widget: WidgetId, _player: PlayerIndex) -> bool {
        true
    }

    /// May this state stop being active for a player?
    fn can_deactivate(&self, _widget: WidgetId, _player: PlayerIndex) -> bool {
        true
    }

    /// While this state is active, may `incoming` be activated?
    fn allows(&self, _incoming: &StateKind, _player: PlayerIndex) -> bool {
        true
    }

    /// Called after the state becomes active for a player.
    fn on_activated(&mut self, _widget: WidgetId, _player: PlayerIndex) {}

    /// Called after the state stops being active for a player.
    fn on_deactivated(&mut self, _widget: WidgetId, _player: PlayerIndex) {}
}

/// Behavior with no vetoes and no hooks.
#[derive(Debug, Default)]
pub struct DefaultBehavior;

impl StateBehavior for DefaultBehavior {}

/// Construct the default behavior.
fn default_behavior() -> Box<dyn StateBehavior> {
    Box::new(DefaultBehavior)
}

/// Class-level description of a state, instantiated once per widget.
#[derive(Debug, Clone)]
pub struct StateTemplate {
    /// State kind.
    pub kind: StateKind,
    /// Stack priority. Higher priorities sit nearer the top.
    pub priority: i32,
    /// Behavior factory.
    behavior: fn() -> Box<dyn StateBehavior>,
}

impl StateTemplate {
    /// A template with the kind's default priority and no vetoes.
    pub fn new(kind: StateKind) -> Self {
        let priority = kind.default_priority();
        Self {
            kind,
            priority,
            behavior: default_behavior,
        }
    }

    /// Override the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Override the behavior.
    pub fn with_behavior(mut self, behavior: fn() -> Box<dyn StateBehavior>) -> Self {
        self.behavior = behavior;
        self
    }

    /// The standard state set: both baselines plus focus, press and active.
    pub fn defaults() -> Vec<Self> {
        [
            StateKind::Enabled,
            StateKind::Disabled,
            StateKind::Focused,
            StateKind::Pressed,
            StateKind::Active,
        ]
        .into_iter()
        .map(Self::new)
        .collect()
    }
}

/// A state instance owned by one widget.
pub struct InteractionState {
    /// State kind.
    kind: StateKind,
    /// Stack priority.
    priority: i32,
    /// Is the instance on the stack?
    on_stack: bool,
    /// Players the instance is active for, when tracked per player.
    players: PlayerMask,
    /// Vetoes and hooks.
    behavior: Box<dyn StateBehavior>,
}

impl InteractionState {
    /// State kind.
    pub fn kind(&self) -> &StateKind {
        &self.kind
    }

    /// Stack priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Is the state active for a player?
    pub fn is_active_for(&self, player: PlayerIndex) -> bool {
        self.on_stack
            && (!self.kind.is_per_player() || self.players.get(player).is_some_and(|b| *b))
    }

    /// Does this state, while active, permit `incoming`? Disabled-family
    /// states refuse focus, press and active.
    fn permits(&self, incoming: &StateKind, player: PlayerIndex) -> bool {
        let builtin = self.kind.family() != StateFamily::Disabled
            || !matches!(
                incoming,
                StateKind::Focused | StateKind::Pressed | StateKind::Active
            );
        builtin && self.behavior.allows(incoming, player)
    }
}

impl fmt::Debug for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionState")
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("on_stack", &self.on_stack)
            .finish_non_exhaustive()
    }
}

/// All state instances of a widget, and the priority-ordered stack of
/// those currently active.
#[derive(Debug, Default)]
pub struct StateStack {
    /// Every instance, active or not.
    states: Vec<InteractionState>,
    /// Indices into `states`, lowest priority first. Equal priorities keep
    /// activation order.
    stack: Vec<usize>,
}

impl StateStack {
    /// Instantiate states from templates. Duplicate kinds keep the first
    /// template; missing baselines are added with default settings.
    pub(crate) fn from_templates(templates: Vec<StateTemplate>) -> Self {
        let mut states: Vec<InteractionState> = Vec::with_capacity(templates.len() + 2);
        let baselines = [
            StateTemplate::new(StateKind::Enabled),
            StateTemplate::new(StateKind::Disabled),
        ];
        for template in templates.into_iter().chain(baselines) {
            if states.iter().any(|s| s.kind == template.kind) {
                continue;
            }
            states.push(InteractionState {
                kind: template.kind,
                priority: template.priority,
                on_stack: false,
                players: PlayerMask::ZERO,
                behavior: (template.behavior)(),
            });
        }
        Self {
            states,
            stack: Vec::new(),
        }
    }

    /// Index of the instance of a kind.
    fn instance(&self, kind: &StateKind) -> Option<usize> {
        self.states.iter().position(|s| s.kind == *kind)
    }

    /// Does the widget have an instance of this kind?
    pub fn has_state(&self, kind: &StateKind) -> bool {
        self.instance(kind).is_some()
    }

    /// Is a state active for a player?
    pub fn is_active(&self, kind: &StateKind, player: PlayerIndex) -> bool {
        self.instance(kind)
            .is_some_and(|i| self.states[i].is_active_for(player))
    }

    /// Topmost state active for a player.
    pub fn current(&self, player: PlayerIndex) -> Option<&StateKind> {
        self.stack
            .iter()
            .rev()
            .map(|i| &self.states[*i])
            .find(|s| s.is_active_for(player))
            .map(|s| &s.kind)
    }

    /// States active for a player, lowest priority first.
    pub fn active(&self, player: PlayerIndex) -> Vec<StateKind> {
        self.stack
            .iter()
            .map(|i| &self.states[*i])
            .filter(|s| s.is_active_for(player))
            .map(|s| s.kind.clone())
            .collect()
    }

    /// States not active for any player.
    pub fn inactive(&self) -> Vec<StateKind> {
        self.states
            .iter()
            .filter(|s| !s.on_stack)
            .map(|s| s.kind.clone())
            .collect()
    }

    /// Number of baseline states on the stack.
    pub fn baseline_count(&self) -> usize {
        self.stack
            .iter()
            .filter(|i| self.states[**i].kind.is_baseline())
            .count()
    }

    /// Mark an instance active for a player, inserting it into the stack
    /// above every state of equal or lower priority.
    fn activate(&mut self, index: usize, player: PlayerIndex) {
        let state = &mut self.states[index];
        if state.kind.is_per_player() {
            state.players.set(player, true);
        }
        if state.on_stack {
            return;
        }
        state.on_stack = true;
        let priority = state.priority;
        let pos = self
            .stack
            .iter()
            .position(|i| self.states[*i].priority > priority)
            .unwrap_or(self.stack.len());
        self.stack.insert(pos, index);
    }

    /// Clear an instance for a player, removing it from the stack once no
    /// player holds it.
    fn deactivate(&mut self, index: usize, player: PlayerIndex) {
        let state = &mut self.states[index];
        if state.kind.is_per_player() {
            state.players.set(player, false);
            if state.players.any() {
                return;
            }
        }
        state.on_stack = false;
        self.stack.retain(|i| *i != index);
    }
}

/// Push a state for a player. With `force`, vetoes are skipped.
pub(crate) fn push_state(
    scene: &mut Scene,
    widget: WidgetId,
    kind: &StateKind,
    player: PlayerIndex,
    force: bool,
) -> Result<bool> {
    scene.check_player(player)?;
    let node = scene
        .nodes
        .get(widget)
        .ok_or(Error::NodeNotFound(widget))?;
    let states = &node.states;
    let Some(index) = states.instance(kind) else {
        debug!(?widget, state = %kind, "widget has no such state");
        return Ok(false);
    };
    if states.states[index].is_active_for(player) {
        return Ok(true);
    }
    let displaced: Vec<usize> = if kind.is_baseline() {
        states
            .stack
            .iter()
            .copied()
            .filter(|i| *i != index && states.states[*i].kind.is_baseline())
            .collect()
    } else {
        Vec::new()
    };
    if !force {
        let refused = states
            .stack
            .iter()
            .map(|i| &states.states[*i])
            .any(|s| s.is_active_for(player) && !s.permits(kind, player));
        let vetoed = !states.states[index].behavior.can_activate(widget, player)
            || displaced
                .iter()
                .any(|i| !states.states[*i].behavior.can_deactivate(widget, player));
        if refused || vetoed {
            debug!(?widget, state = %kind, player, "state activation refused");
            return Ok(false);
        }
    }

    if kind.family() == StateFamily::Disabled {
        release_focus(scene, widget)?;
        for p in 0..scene.config.max_players {
            for transient in [StateKind::Pressed, StateKind::Active] {
                pop_state(scene, widget, &transient, p, true)?;
            }
        }
    }

    let node = scene
        .nodes
        .get_mut(widget)
        .ok_or(Error::NodeNotFound(widget))?;
    for i in displaced {
        node.states.deactivate(i, player);
        node.states.states[i].behavior.on_deactivated(widget, player);
    }
    node.states.activate(index, player);
    node.states.states[index]
        .behavior
        .on_activated(widget, player);
    debug!(?widget, state = %kind, player, "state activated");
    // Baselines decide focus eligibility, which feeds the navigation links.
    scene.request_update(false, false, kind.is_baseline(), true);
    Ok(true)
}

/// Pop a state for a player. With `force`, vetoes are skipped and baseline
/// states may be removed.
pub(crate) fn pop_state(
    scene: &mut Scene,
    widget: WidgetId,
    kind: &StateKind,
    player: PlayerIndex,
    force: bool,
) -> Result<bool> {
    scene.check_player(player)?;
    let node = scene
        .nodes
        .get_mut(widget)
        .ok_or(Error::NodeNotFound(widget))?;
    let Some(index) = node.states.instance(kind) else {
        return Ok(false);
    };
    let state = &node.states.states[index];
    if !state.is_active_for(player) {
        return Ok(false);
    }
    if !force {
        if kind.is_baseline() {
            debug!(?widget, state = %kind, "baseline state cannot be removed");
            return Ok(false);
        }
        if !state.behavior.can_deactivate(widget, player) {
            debug!(?widget, state = %kind, player, "state deactivation refused");
            return Ok(false);
        }
    }
    node.states.deactivate(index, player);
    node.states.states[index]
        .behavior
        .on_deactivated(widget, player);
    debug!(?widget, state = %kind, player, "state deactivated");
    scene.request_update(false, false, kind.is_baseline(), true);
    Ok(true)
}

/// Managing a widget's interaction states.
pub trait InteractionStates {
    /// Activate a state for a player. Returns `false` if the widget has no
    /// such state or an active state or behavior refused. Activating
    /// `Focused` focuses the widget.
    fn activate_state(
        &mut self,
        widget: WidgetId,
        kind: &StateKind,
        player: PlayerIndex,
    ) -> Result<bool>;

    /// Deactivate a state for a player. Baseline states cannot be removed;
    /// use [`InteractionStates::set_enabled`] to swap them. Deactivating
    /// `Focused` kills focus.
    fn deactivate_state(
        &mut self,
        widget: WidgetId,
        kind: &StateKind,
        player: PlayerIndex,
    ) -> Result<bool>;

    /// Activate the widget's initial state for a player, establishing a
    /// baseline if none is active.
    fn activate_initial_state(&mut self, widget: WidgetId, player: PlayerIndex) -> Result<bool>;

    /// Topmost active state for a player.
    fn current_state(&self, widget: WidgetId, player: PlayerIndex) -> Result<Option<StateKind>>;

    /// States active for a player, lowest priority first.
    fn active_states(&self, widget: WidgetId, player: PlayerIndex) -> Result<Vec<StateKind>>;

    /// Is a state active for a player?
    fn is_state_active(&self, widget: WidgetId, kind: &StateKind, player: PlayerIndex) -> bool;

    /// Is the widget's baseline in the Enabled family?
    fn is_enabled(&self, widget: WidgetId) -> bool;

    /// Is the widget and every ancestor enabled?
    fn is_enabled_chain(&self, widget: WidgetId) -> bool;

    /// Swap the baseline between Enabled and Disabled.
    fn set_enabled(&mut self, widget: WidgetId, enabled: bool) -> Result<bool>;
}

impl InteractionStates for Scene {
    fn activate_state(
        &mut self,
        widget: WidgetId,
        kind: &StateKind,
        player: PlayerIndex,
    ) -> Result<bool> {
        if *kind == StateKind::Focused {
            return self.set_focus(widget, player);
        }
        let activated = push_state(self, widget, kind, player, false)?;
        if activated
            && *kind == StateKind::Active
            && self.config.focus_on_active
            && self.can_accept_focus(widget, player)
        {
            self.set_focus(widget, player)?;
        }
        Ok(activated)
    }

    fn deactivate_state(
        &mut self,
        widget: WidgetId,
        kind: &StateKind,
        player: PlayerIndex,
    ) -> Result<bool> {
        if *kind == StateKind::Focused {
            return self.kill_focus(widget, player);
        }
        pop_state(self, widget, kind, player, false)
    }

    fn activate_initial_state(&mut self, widget: WidgetId, player: PlayerIndex) -> Result<bool> {
        let node = self
            .nodes
            .get(widget)
            .ok_or(Error::NodeNotFound(widget))?;
        let initial = node.widget.initial_state();
        if node.states.baseline_count() == 0 {
            let baseline = if initial.is_baseline() {
                initial.clone()
            } else {
                StateKind::Enabled
            };
            if !push_state(self, widget, &baseline, player, true)? {
                warn!(?widget, state = %baseline, "no baseline state available");
            }
        }
        if initial.is_baseline() {
            Ok(self.is_state_active(widget, &initial, player))
        } else {
            self.activate_state(widget, &initial, player)
        }
    }

    fn current_state(&self, widget: WidgetId, player: PlayerIndex) -> Result<Option<StateKind>> {
        self.check_player(player)?;
        let node = self
            .nodes
            .get(widget)
            .ok_or(Error::NodeNotFound(widget))?;
        Ok(node.states.current(player).cloned())
    }

    fn active_states(&self, widget: WidgetId, player: PlayerIndex) -> Result<Vec<StateKind>> {
        self.check_player(player)?;
        let node = self
            .nodes
            .get(widget)
            .ok_or(Error::NodeNotFound(widget))?;
        Ok(node.states.active(player))
    }

    fn is_state_active(&self, widget: WidgetId, kind: &StateKind, player: PlayerIndex) -> bool {
        self.nodes
            .get(widget)
            .is_some_and(|n| n.states.is_active(kind, player))
    }

    fn is_enabled(&self, widget: WidgetId) -> bool {
        self.nodes.get(widget).is_some_and(|n| {
            n.states
                .stack
                .iter()
                .any(|i| n.states.states[*i].kind.family() == StateFamily::Enabled)
        })
    }

    fn is_enabled_chain(&self, widget: WidgetId) -> bool {
        let mut current = Some(widget);
        while let Some(id) = current {
            if !self.is_enabled(id) {
                return false;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        true
    }

    fn set_enabled(&mut self, widget: WidgetId, enabled: bool) -> Result<bool> {
        let kind = if enabled {
            StateKind::Enabled
        } else {
            StateKind::Disabled
        };
        push_state(self, widget, &kind, 0, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> StateStack {
        StateStack::from_templates(StateTemplate::defaults())
    }

    #[test]
    fn priority_order() {
        let mut s = stack();
        let enabled = s.instance(&StateKind::Enabled).unwrap();
        let active = s.instance(&StateKind::Active).unwrap();
        let focused = s.instance(&StateKind::Focused).unwrap();
        let pressed = s.instance(&StateKind::Pressed).unwrap();
        s.activate(enabled, 0);
        s.activate(pressed, 0);
        s.activate(active, 0);
        s.activate(focused, 0);
        assert_eq!(
            s.active(0),
            vec![
                StateKind::Enabled,
                StateKind::Focused,
                StateKind::Active,
                StateKind::Pressed
            ]
        );
        assert_eq!(s.current(0), Some(&StateKind::Pressed));
    }

    #[test]
    fn per_player_mask() {
        let mut s = stack();
        let enabled = s.instance(&StateKind::Enabled).unwrap();
        let focused = s.instance(&StateKind::Focused).unwrap();
        s.activate(enabled, 0);
        s.activate(focused, 1);
        assert!(s.is_active(&StateKind::Focused, 1));
        assert!(!s.is_active(&StateKind::Focused, 0));
        // Baselines are shared.
        assert!(s.is_active(&StateKind::Enabled, 1));
        s.activate(focused, 0);
        s.deactivate(focused, 1);
        assert!(s.is_active(&StateKind::Focused, 0));
        s.deactivate(focused, 0);
        assert_eq!(s.inactive().len(), 4);
    }

    #[test]
    fn missing_baselines_added() {
        let s = StateStack::from_templates(vec![StateTemplate::new(StateKind::Focused)]);
        assert!(s.has_state(&StateKind::Enabled));
        assert!(s.has_state(&StateKind::Disabled));
        assert!(!s.has_state(&StateKind::Pressed));
    }

    #[test]
    fn disabled_refuses_overlays() {
        let mut s = stack();
        let disabled = s.instance(&StateKind::Disabled).unwrap();
        s.activate(disabled, 0);
        let d = &s.states[disabled];
        assert!(!d.permits(&StateKind::Focused, 0));
        assert!(!d.permits(&StateKind::Pressed, 0));
        assert!(d.permits(&StateKind::custom("checked", StateFamily::Overlay), 0));
    }

    #[test]
    fn equal_priorities_keep_activation_order() {
        let templates = vec![
            StateTemplate::new(StateKind::custom("a", StateFamily::Overlay)),
            StateTemplate::new(StateKind::custom("b", StateFamily::Overlay)),
        ];
        let mut s = StateStack::from_templates(templates);
        let b = s.instance(&StateKind::custom("b", StateFamily::Overlay)).unwrap();
        let a = s.instance(&StateKind::custom("a", StateFamily::Overlay)).unwrap();
        s.activate(b, 0);
        s.activate(a, 0);
        assert_eq!(
            s.current(0),
            Some(&StateKind::custom("a", StateFamily::Overlay))
        );
    }
}
