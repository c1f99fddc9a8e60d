//! Backend-neutral draw commands and text measurement.
//!
//! The sequencer never paints directly. Each frame it fills a `DrawList`
//! which a backend (see `egui_backend`) replays in order.

use eframe::egui::{Color32, Pos2, Rect, Vec2, vec2};

/// One paint primitive
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    Rect {
        rect: Rect,
        rounding: f32,
        color: Color32,
    },
    Line {
        from: Pos2,
        to: Pos2,
        width: f32,
        color: Color32,
    },
    Circle {
        center: Pos2,
        radius: f32,
        color: Color32,
    },
    /// Convex polygon, points in winding order
    Polygon { points: Vec<Pos2>, color: Color32 },
    /// Left-top anchored single-line text
    Text {
        pos: Pos2,
        text: String,
        color: Color32,
    },
    /// Intersect the current clip rect with `Rect` until the matching pop
    PushClip(Rect),
    PopClip,
}

/// Ordered list of paint commands for one sequencer frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect_filled(&mut self, rect: Rect, rounding: f32, color: Color32) {
        self.cmds.push(DrawCmd::Rect { rect, rounding, color });
    }

    pub fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        self.cmds.push(DrawCmd::Line { from, to, width, color });
    }

    pub fn circle_filled(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.cmds.push(DrawCmd::Circle { center, radius, color });
    }

    pub fn polygon(&mut self, points: Vec<Pos2>, color: Color32) {
        self.cmds.push(DrawCmd::Polygon { points, color });
    }

    pub fn text(&mut self, pos: Pos2, text: impl Into<String>, color: Color32) {
        self.cmds.push(DrawCmd::Text {
            pos,
            text: text.into(),
            color,
        });
    }

    pub fn push_clip(&mut self, rect: Rect) {
        self.cmds.push(DrawCmd::PushClip(rect));
    }

    pub fn pop_clip(&mut self) {
        self.cmds.push(DrawCmd::PopClip);
    }

    pub fn cmds(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }
}

/// Measures label text for layout
pub trait TextMetrics {
    /// Size of `text` laid out on a single line
    fn text_size(&self, text: &str) -> Vec2;
}

/// Monospace metrics: every char is `char_width` wide
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 13.0,
        }
    }
}

impl TextMetrics for FixedMetrics {
    fn text_size(&self, text: &str) -> Vec2 {
        vec2(text.chars().count() as f32 * self.char_width, self.line_height)
    }
}
