//! Sequencer theme: sizes, spacing and colour slots.
//!
//! `SequencerStyle` is plain serde data so it can live in a JSON config file.
//! `StyleStack` layers temporary colour overrides on top of it; pushes and
//! pops must balance.

use anyhow::{Context, Result};
use eframe::egui::{Color32, Vec2, vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Colour slots of the sequencer theme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSlot {
    Bg,
    TopBarBg,
    TopBarText,
    SelectedTimeline,
    TimelinesBg,
    TimelineBorder,
    TimelineSeparator,
    Text,
    GroupLabel,
    FramePointer,
    FramePointerHovered,
    FramePointerPressed,
    FramePointerLine,
    Keyframe,
    KeyframeHovered,
    KeyframePressed,
    KeyframeSelected,
    ZoomBarBg,
    ZoomBarSlider,
    ZoomBarSliderHovered,
    ZoomBarSliderEnds,
    ZoomBarSliderEndsHovered,
    MenuBg,
    MenuItemHovered,
}

impl ColorSlot {
    pub const COUNT: usize = 24;

    pub const ALL: [ColorSlot; Self::COUNT] = [
        ColorSlot::Bg,
        ColorSlot::TopBarBg,
        ColorSlot::TopBarText,
        ColorSlot::SelectedTimeline,
        ColorSlot::TimelinesBg,
        ColorSlot::TimelineBorder,
        ColorSlot::TimelineSeparator,
        ColorSlot::Text,
        ColorSlot::GroupLabel,
        ColorSlot::FramePointer,
        ColorSlot::FramePointerHovered,
        ColorSlot::FramePointerPressed,
        ColorSlot::FramePointerLine,
        ColorSlot::Keyframe,
        ColorSlot::KeyframeHovered,
        ColorSlot::KeyframePressed,
        ColorSlot::KeyframeSelected,
        ColorSlot::ZoomBarBg,
        ColorSlot::ZoomBarSlider,
        ColorSlot::ZoomBarSliderHovered,
        ColorSlot::ZoomBarSliderEnds,
        ColorSlot::ZoomBarSliderEndsHovered,
        ColorSlot::MenuBg,
        ColorSlot::MenuItemHovered,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color32 {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
}

/// Sizes and colours used by the sequencer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerStyle {
    pub sequencer_rounding: f32,
    /// Ruler height, 0 = derived from font size
    pub top_bar_height: f32,
    pub top_bar_show_frame_lines: bool,
    pub top_bar_show_frame_texts: bool,
    /// Extra spacing around row labels
    pub item_spacing: Vec2,
    /// Label indent per nesting level
    pub depth_item_spacing: f32,
    /// Gap between the ruler and the first row
    pub top_bar_spacing: f32,
    pub current_frame_pointer_size: f32,
    pub current_frame_line_width: f32,
    /// Zoom bar height as a multiple of font size
    pub zoom_height_scale: f32,
    /// Host widget metrics the layout is built from
    pub font_size: f32,
    pub frame_padding: Vec2,
    pub widget_spacing: Vec2,
    pub item_inner_spacing: Vec2,
    pub colors: [Color32; ColorSlot::COUNT],
}

impl Default for SequencerStyle {
    fn default() -> Self {
        let mut colors = [Color32::WHITE; ColorSlot::COUNT];
        let bg = rgba(0.31, 0.31, 0.31, 1.0);
        let top_bar = rgba(0.22, 0.22, 0.22, 0.84);
        colors[ColorSlot::Bg.index()] = bg;
        colors[ColorSlot::TopBarBg.index()] = top_bar;
        colors[ColorSlot::TopBarText.index()] = Color32::WHITE;
        colors[ColorSlot::SelectedTimeline.index()] = rgba(0.98, 0.706, 0.322, 0.88);
        colors[ColorSlot::TimelinesBg.index()] = top_bar;
        colors[ColorSlot::TimelineBorder.index()] = rgba(0.155, 0.155, 0.155, 1.0);
        colors[ColorSlot::TimelineSeparator.index()] = rgba(0.5, 0.5, 0.5, 1.0);
        colors[ColorSlot::Text.index()] = rgba(1.0, 1.0, 1.0, 1.0);
        colors[ColorSlot::GroupLabel.index()] = rgba(0.0, 1.0, 0.0, 1.0);
        colors[ColorSlot::FramePointer.index()] = rgba(0.98, 0.24, 0.24, 0.50);
        colors[ColorSlot::FramePointerHovered.index()] = rgba(0.98, 0.15, 0.15, 1.0);
        colors[ColorSlot::FramePointerPressed.index()] = rgba(0.98, 0.08, 0.08, 1.0);
        colors[ColorSlot::FramePointerLine.index()] = rgba(0.98, 0.98, 0.98, 0.8);
        colors[ColorSlot::Keyframe.index()] = rgba(0.59, 0.59, 0.59, 0.50);
        colors[ColorSlot::KeyframeHovered.index()] = rgba(0.98, 0.39, 0.36, 1.0);
        colors[ColorSlot::KeyframePressed.index()] = rgba(0.98, 0.39, 0.36, 1.0);
        colors[ColorSlot::KeyframeSelected.index()] = rgba(0.98, 0.08, 0.08, 1.0);
        colors[ColorSlot::ZoomBarBg.index()] = rgba(0.59, 0.59, 0.59, 0.90);
        colors[ColorSlot::ZoomBarSlider.index()] = rgba(0.8, 0.8, 0.8, 0.60);
        colors[ColorSlot::ZoomBarSliderHovered.index()] = rgba(0.98, 0.98, 0.98, 0.80);
        colors[ColorSlot::ZoomBarSliderEnds.index()] = rgba(0.59, 0.59, 0.59, 0.90);
        colors[ColorSlot::ZoomBarSliderEndsHovered.index()] = rgba(0.93, 0.93, 0.93, 0.93);
        colors[ColorSlot::MenuBg.index()] = rgba(0.08, 0.08, 0.08, 0.94);
        colors[ColorSlot::MenuItemHovered.index()] = rgba(0.26, 0.59, 0.98, 0.80);

        Self {
            sequencer_rounding: 2.5,
            top_bar_height: 0.0,
            top_bar_show_frame_lines: true,
            top_bar_show_frame_texts: true,
            item_spacing: vec2(4.0, 0.5),
            depth_item_spacing: 10.0,
            top_bar_spacing: 3.0,
            current_frame_pointer_size: 7.0,
            current_frame_line_width: 1.0,
            zoom_height_scale: 1.0,
            font_size: 13.0,
            frame_padding: vec2(4.0, 3.0),
            widget_spacing: vec2(8.0, 4.0),
            item_inner_spacing: vec2(4.0, 4.0),
            colors,
        }
    }
}

impl SequencerStyle {
    pub fn color(&self, slot: ColorSlot) -> Color32 {
        self.colors[slot.index()]
    }

    pub fn set_color(&mut self, slot: ColorSlot, color: Color32) {
        self.colors[slot.index()] = color;
    }

    /// Height of the zoom / pan bar
    pub fn zoom_bar_height(&self) -> f32 {
        self.font_size * self.zoom_height_scale + self.frame_padding.y * 2.0
    }

    /// Load a style from JSON. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read style file: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse style file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize style")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write style file: {}", path.display()))
    }
}

/// Style plus a save/restore stack of colour overrides
#[derive(Clone, Debug, Default)]
pub struct StyleStack {
    style: SequencerStyle,
    backups: Vec<(ColorSlot, Color32)>,
}

impl StyleStack {
    pub fn new(style: SequencerStyle) -> Self {
        Self {
            style,
            backups: Vec::new(),
        }
    }

    pub fn style(&self) -> &SequencerStyle {
        &self.style
    }

    /// Override `slot` until the matching `pop_color`.
    pub fn push_color(&mut self, slot: ColorSlot, color: Color32) {
        self.backups.push((slot, self.style.color(slot)));
        self.style.set_color(slot, color);
    }

    /// Restore the last `count` overrides, newest first.
    ///
    /// Panics when popping more than was pushed.
    pub fn pop_color(&mut self, count: usize) {
        assert!(
            count <= self.backups.len(),
            "pop_style_color({}) with only {} colours pushed",
            count,
            self.backups.len()
        );
        for _ in 0..count {
            if let Some((slot, color)) = self.backups.pop() {
                self.style.set_color(slot, color);
            }
        }
    }

    pub fn depth(&self) -> usize {
        self.backups.len()
    }
}
