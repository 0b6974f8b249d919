use std::collections::BTreeMap;

use crate::{
    docking::DockingSet,
    focus::FocusData,
    geom::{Bounds, Face, Quad},
    id::{PlayerIndex, WidgetId},
    interaction::{PlayerMask, StateStack},
    name::WidgetName,
    navigation::NavLink,
    screen_value::ScreenValue,
    transform::Rotation,
    widget::Widget,
};

/// Core widget data stored in the scene arena.
pub struct Node {
    /// Widget behavior.
    pub(crate) widget: Box<dyn Widget>,
    /// Widget name for paths and diagnostics.
    pub(crate) name: WidgetName,

    /// Parent in the arena tree.
    pub(crate) parent: Option<WidgetId>,
    /// Children in the arena tree, in insertion order.
    pub(crate) children: Vec<WidgetId>,

    /// Position of each face, indexed by `Face::index`.
    pub(crate) edges: [ScreenValue; 4],
    /// Docking links and per-face resolution flags.
    pub(crate) docking: DockingSet,
    /// Resolved faces in viewport pixel space.
    pub(crate) render_bounds: Bounds,
    /// Screen-space vertices after rotation.
    pub(crate) quad: Quad,
    /// Rotation applied around an anchor within the widget.
    pub(crate) rotation: Rotation,
    /// Depth used to order rendering and hit testing.
    pub(crate) z_depth: f32,

    /// Interaction states instantiated for this widget.
    pub(crate) states: StateStack,
    /// Per-player focus propagation data.
    pub(crate) focus: BTreeMap<PlayerIndex, FocusData>,
    /// Spatial navigation links, indexed by `Face::index`.
    pub(crate) navigation: [NavLink; 4],
    /// Explicit tab index. `None` means automatic.
    pub(crate) tab_index: Option<i32>,

    /// Node visibility.
    pub(crate) hidden: bool,
    /// Players this widget accepts input from.
    pub(crate) input_mask: PlayerMask,
    /// Whether interaction states have been instantiated.
    pub(crate) initialized: bool,
}

impl Node {
    /// Construct a detached node around a widget.
    pub(crate) fn new(widget: Box<dyn Widget>) -> Self {
        let name = widget.name();
        let edges = widget.default_edges();
        let mut input_mask = PlayerMask::ZERO;
        input_mask.fill(true);
        Self {
            widget,
            name,
            parent: None,
            children: Vec::new(),
            edges,
            docking: DockingSet::default(),
            render_bounds: Bounds::zero(),
            quad: Quad::default(),
            rotation: Rotation::default(),
            z_depth: 0.0,
            states: StateStack::default(),
            focus: BTreeMap::new(),
            navigation: [NavLink::default(); 4],
            tab_index: None,
            hidden: false,
            input_mask,
            initialized: false,
        }
    }

    /// Return the widget name.
    pub fn name(&self) -> &WidgetName {
        &self.name
    }

    /// Return the parent, if any.
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Return the children.
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    /// Return the stored position of a face.
    pub fn edge(&self, face: Face) -> &ScreenValue {
        &self.edges[face.index()]
    }

    /// Return the resolved bounds in viewport pixel space.
    pub fn render_bounds(&self) -> Bounds {
        self.render_bounds
    }

    /// Return the screen-space quad.
    pub fn quad(&self) -> Quad {
        self.quad
    }

    /// Return the docking configuration.
    pub fn docking(&self) -> &DockingSet {
        &self.docking
    }

    /// Return the interaction state stack.
    pub fn states(&self) -> &StateStack {
        &self.states
    }

    /// Return the navigation link for a face.
    pub fn nav_link(&self, face: Face) -> NavLink {
        self.navigation[face.index()]
    }

    /// Return the explicit tab index.
    pub fn tab_index(&self) -> Option<i32> {
        self.tab_index
    }

    /// Is the node hidden?
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Does the node accept input from a player?
    pub fn accepts_input(&self, player: PlayerIndex) -> bool {
        self.input_mask.get(player).is_some_and(|bit| *bit)
    }

    /// Return the widget.
    pub fn widget(&self) -> &dyn Widget {
        &*self.widget
    }
}
