use tracing::Level;

use crate::{
    config::SceneConfig,
    docking::{DockTarget, DockingGraph},
    error::Result,
    geom::Face,
    id::WidgetId,
    name::WidgetName,
    scene::Scene,
    screen_value::{Positions, ScreenValue},
    widget::Widget,
};

/// Install a debug-level subscriber that writes through the test harness.
/// Safe to call from every test.
pub fn init_tracing() {
    // A subscriber may already be installed by an earlier test.
    drop(
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(Level::DEBUG)
            .try_init(),
    );
}

/// A scene with the viewport sized to `width` x `height`.
pub fn scene(width: f32, height: f32) -> Result<Scene> {
    let mut scene = Scene::new(SceneConfig::default())?;
    scene.set_viewport_size(width, height);
    Ok(scene)
}

/// A named test widget that may or may not take focus.
#[derive(Debug, Clone)]
pub struct Block {
    /// Widget name.
    name: String,
    /// Does the block take focus itself?
    focusable: bool,
}

impl Block {
    /// A focusable block.
    pub fn focusable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            focusable: true,
        }
    }

    /// A block that only delegates focus.
    pub fn container(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            focusable: false,
        }
    }
}

impl Widget for Block {
    fn accept_focus(&self) -> bool {
        self.focusable
    }

    fn name(&self) -> WidgetName {
        WidgetName::convert(&self.name)
    }
}

/// Add a focusable block under `parent` with faces at fixed pixel offsets
/// from the parent's top-left corner.
pub fn fixed(
    scene: &mut Scene,
    parent: WidgetId,
    name: &str,
    faces: [f32; 4],
) -> Result<WidgetId> {
    let id = scene.add_child(parent, Block::focusable(name))?;
    scene.set_edges(id, faces.map(ScreenValue::pixels))?;
    Ok(id)
}

/// Add `count` blocks in a row under `parent`. The first block sits at the
/// parent's left; every later block's left face is docked to the previous
/// block's right face with `gap` pixels of padding, and its width is locked
/// to `width`.
pub fn docked_row(
    scene: &mut Scene,
    parent: WidgetId,
    count: usize,
    width: f32,
    gap: f32,
) -> Result<Vec<WidgetId>> {
    let mut ids: Vec<WidgetId> = Vec::with_capacity(count);
    for i in 0..count {
        let id = fixed(scene, parent, &format!("cell_{i}"), [0.0, 0.0, width, 10.0])?;
        if let Some(prev) = ids.last().copied() {
            scene.set_dock_target(id, Face::Left, DockTarget::Widget(prev), Face::Right, gap)?;
            scene.set_width_locked(id, true)?;
        }
        ids.push(id);
    }
    Ok(ids)
}
