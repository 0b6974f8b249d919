use crate::{geom::Quad, render::Canvas};

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `fill_rect`.
    Fill {
        /// Target quad.
        quad: Quad,
        /// Style name.
        style: String,
    },
    /// `draw_text`.
    Text {
        /// Target quad.
        quad: Quad,
        /// Text drawn.
        text: String,
        /// Style name.
        style: String,
    },
}

/// Canvas that records every call for later inspection.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    /// Calls in order.
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    /// An empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Styles of every fill, in order.
    pub fn fill_styles(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill { style, .. } => Some(style.as_str()),
                DrawOp::Text { .. } => None,
            })
            .collect()
    }

    /// Every string drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::Fill { .. } => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, quad: &Quad, style: &str) {
        self.ops.push(DrawOp::Fill {
            quad: *quad,
            style: style.to_string(),
        });
    }

    fn draw_text(&mut self, quad: &Quad, text: &str, style: &str) {
        self.ops.push(DrawOp::Text {
            quad: *quad,
            text: text.to_string(),
            style: style.to_string(),
        });
    }
}
