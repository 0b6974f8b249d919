use crate::{
    error::Result,
    id::WidgetId,
    scene::Scene,
    screen_value::{Positions, ScreenValue},
    widgets::{Button, Panel},
};

/// A panel holding a grid of buttons, added row by row.
#[derive(Debug, Clone)]
pub struct ButtonGrid {
    /// The containing panel.
    pub panel: WidgetId,
    /// Columns.
    pub cols: usize,
    /// Rows.
    pub rows: usize,
    /// Buttons in row-major order.
    pub cells: Vec<WidgetId>,
}

impl ButtonGrid {
    /// Build a grid under `parent`. Cells are `size` pixels square and
    /// separated by `gap` pixels.
    pub fn build(
        scene: &mut Scene,
        parent: WidgetId,
        cols: usize,
        rows: usize,
        size: f32,
        gap: f32,
    ) -> Result<Self> {
        let panel = scene.add_child(parent, Panel::new())?;
        let mut cells = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let id = scene.add_child(panel, Button::new(format!("{col},{row}")))?;
                let left = col as f32 * (size + gap);
                let top = row as f32 * (size + gap);
                scene.set_edges(
                    id,
                    [left, top, left + size, top + size].map(ScreenValue::pixels),
                )?;
                cells.push(id);
            }
        }
        Ok(Self {
            panel,
            cols,
            rows,
            cells,
        })
    }

    /// The button at a column and row.
    pub fn cell(&self, col: usize, row: usize) -> Option<WidgetId> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }
}
