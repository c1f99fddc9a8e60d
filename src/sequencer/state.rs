//! Persistent per-sequencer state and the caller-owned registry.
//!
//! `SequencerState` survives between frames: zoom, scroll, selection and
//! drag flags. Cursor and size fields are recomputed on every `begin` and
//! are skipped when serializing.

use super::input::PointerTracker;
use super::mapping;
use super::style::{SequencerStyle, StyleStack};
use eframe::egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use rustc_hash::FxHasher;
use std::collections::HashMap;
use std::hash::Hasher;

/// Initial width of the label column
pub const MIN_VALUES_WIDTH: f32 = 32.0;

/// Ids end up in persisted state, so the hash must not change between
/// builds. `FxHasher` from rustc-hash 1.x is a fixed algorithm.
fn hash_path(seed: u64, label: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write_u64(seed);
    hasher.write(label.as_bytes());
    hasher.finish()
}

/// Stable identity of one sequencer widget
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequencerId(u64);

impl SequencerId {
    pub fn new(label: &str) -> Self {
        Self(hash_path(0, label))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Stable identity of one row: hash of the parent row (or sequencer)
/// and the row's full label, `##` suffix included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(u64);

impl RowId {
    pub fn new(parent: u64, label: &str) -> Self {
        Self(hash_path(parent, label))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Playhead marker colour state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlayheadVisual {
    #[default]
    Normal,
    Hovered,
    Pressed,
}

/// Keyframe engaged by a drag. `frame` is `None` once the drag ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeldKey {
    pub row: RowId,
    pub frame: Option<u32>,
}

/// Most recently clicked keyframe, by row label and index
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedKey {
    pub label: String,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuKind {
    /// Create a key at the frame captured when the menu opened
    Create { frame: u32 },
    Delete { frame: u32 },
}

/// Open right-click menu
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContextMenu {
    pub row: RowId,
    pub kind: MenuKind,
    pub anchor: Pos2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthField {
    Start,
    End,
}

/// Active drag on a start / end frame box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LengthDrag {
    pub field: LengthField,
    /// Sub-frame pointer travel not yet applied
    pub remainder: f32,
}

/// Per-instance sequencer state
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerState {
    #[serde(skip)]
    pub top_left_cursor: Pos2,
    /// Top of the ruler, below the zoom bar
    #[serde(skip)]
    pub top_bar_start_cursor: Pos2,
    /// Top of the first row
    #[serde(skip)]
    pub start_values_cursor: Pos2,
    /// Layout cursor of the row being built
    #[serde(skip)]
    pub values_cursor: Pos2,
    #[serde(skip)]
    pub size: Vec2,
    #[serde(skip)]
    pub top_bar_size: Vec2,

    pub start_frame: u32,
    pub end_frame: u32,
    /// Scroll position in frames from `start_frame`
    pub offset_frame: u32,
    pub zoom: f32,
    /// Label column width; only ever grows
    pub values_width: f32,
    #[serde(skip)]
    pub filled_height: f32,

    pub current_frame: u32,
    #[serde(skip)]
    pub holding_current_frame: bool,
    #[serde(skip)]
    pub playhead_visual: PlayheadVisual,
    #[serde(skip)]
    pub holding_zoom_slider: bool,
    #[serde(skip)]
    pub length_drag: Option<LengthDrag>,

    pub selected_timeline: Option<RowId>,
    pub last_selected_timeline: Option<RowId>,
    #[serde(skip)]
    pub timeline_stack: Vec<RowId>,

    #[serde(skip)]
    pub holding: Option<HeldKey>,
    /// Label of the row being built, for `selected_key_index`
    #[serde(skip)]
    pub check_key_label: String,
    pub selected_key: Option<SelectedKey>,

    #[serde(skip)]
    pub menu: Option<ContextMenu>,

    pub selected_group: Option<String>,
    #[serde(skip)]
    pub now_group: Option<String>,
}

impl Default for SequencerState {
    fn default() -> Self {
        Self {
            top_left_cursor: Pos2::ZERO,
            top_bar_start_cursor: Pos2::ZERO,
            start_values_cursor: Pos2::ZERO,
            values_cursor: Pos2::ZERO,
            size: Vec2::ZERO,
            top_bar_size: Vec2::ZERO,
            start_frame: 0,
            end_frame: 0,
            offset_frame: 0,
            zoom: 1.0,
            values_width: MIN_VALUES_WIDTH,
            filled_height: 0.0,
            current_frame: 0,
            holding_current_frame: false,
            playhead_visual: PlayheadVisual::Normal,
            holding_zoom_slider: false,
            length_drag: None,
            selected_timeline: None,
            last_selected_timeline: None,
            timeline_stack: Vec::new(),
            holding: None,
            check_key_label: String::new(),
            selected_key: None,
            menu: None,
            selected_group: None,
            now_group: None,
        }
    }
}

impl SequencerState {
    pub fn total_frames(&self) -> u32 {
        self.end_frame.saturating_sub(self.start_frame)
    }

    /// Whole frames visible at the current zoom
    pub fn view_width(&self) -> u32 {
        mapping::view_width(self.total_frames(), self.zoom)
    }

    /// First visible frame
    pub fn view_start(&self) -> u32 {
        self.start_frame.saturating_add(self.offset_frame)
    }

    /// Last visible frame
    pub fn view_end(&self) -> u32 {
        self.view_start().saturating_add(self.view_width())
    }

    pub fn per_frame_width(&self) -> f32 {
        mapping::per_frame_width(
            self.size.x,
            self.values_width,
            self.start_frame,
            self.end_frame,
            self.zoom,
        )
    }

    /// Largest valid scroll offset
    pub fn max_offset(&self) -> u32 {
        self.total_frames().saturating_sub(self.view_width())
    }

    /// Re-establish `1 <= zoom <= total` and `offset <= total - view_width`.
    pub fn clamp_view(&mut self) {
        let max_zoom = (self.total_frames() as f32).max(1.0);
        self.zoom = self.zoom.clamp(1.0, max_zoom);
        self.offset_frame = self.offset_frame.min(self.max_offset());
    }

    /// Apply a wheel step to the zoom. Returns true when zoom changed.
    ///
    /// One step can zoom in at most to the number of frames visible
    /// before the step.
    pub fn apply_zoom_wheel(&mut self, notches: f32, step: f32) -> bool {
        let max_zoom = (self.view_width() as f32).max(1.0);
        let zoom = (self.zoom + notches * step).clamp(1.0, max_zoom);
        let changed = zoom != self.zoom;
        self.zoom = zoom;
        self.clamp_view();
        changed
    }

    pub fn is_holding(&self, row: RowId, frame: u32) -> bool {
        self.holding == Some(HeldKey { row, frame: Some(frame) })
    }

    /// Some keyframe is mid-drag
    pub fn is_holding_any(&self) -> bool {
        self.holding.is_some_and(|h| h.frame.is_some())
    }

    pub fn selected_key_index(&self, label: &str) -> Option<usize> {
        self.selected_key
            .as_ref()
            .filter(|k| k.label == label)
            .map(|k| k.index)
    }
}

/// Caller-owned store of sequencer instances plus shared style and input
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerRegistry {
    pub(super) states: HashMap<SequencerId, SequencerState>,
    #[serde(skip)]
    pub(super) theme: StyleStack,
    #[serde(skip)]
    pub(super) pointer: PointerTracker,
}

impl SequencerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: SequencerStyle) -> Self {
        Self {
            theme: StyleStack::new(style),
            ..Default::default()
        }
    }

    /// Feed this UI frame's input. Call once per frame before any sequencer.
    pub fn begin_frame(&mut self, input: super::input::FrameInput) {
        self.pointer.update(input);
    }

    /// State of sequencer `id`, created on first use
    pub fn get_or_create(&mut self, id: &str) -> &mut SequencerState {
        self.states.entry(SequencerId::new(id)).or_insert_with(|| {
            log::debug!("Creating sequencer state for '{}'", id);
            SequencerState::default()
        })
    }

    pub fn state(&self, id: &str) -> Option<&SequencerState> {
        self.states.get(&SequencerId::new(id))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn style(&self) -> &SequencerStyle {
        self.theme.style()
    }

    pub fn set_style(&mut self, style: SequencerStyle) {
        self.theme = StyleStack::new(style);
    }

    pub fn push_style_color(&mut self, slot: super::style::ColorSlot, color: eframe::egui::Color32) {
        self.theme.push_color(slot, color);
    }

    pub fn pop_style_color(&mut self, count: usize) {
        self.theme.pop_color(count);
    }
}
