//! Immediate-mode timeline / keyframe sequencer.
//!
//! Per UI frame the host:
//! 1. feeds input with [`SequencerRegistry::begin_frame`],
//! 2. opens a scope with [`Sequencer::begin`],
//! 3. lays out rows with `begin_timeline` / `end_timeline` (or groups),
//! 4. calls [`SequencerFrame::end`] and paints the returned [`DrawList`].
//!
//! The frame context mutably borrows the registry, so a second sequencer
//! cannot be opened while one is being built.

pub mod draw;
pub mod egui_backend;
pub mod events;
pub mod flags;
pub mod input;
mod keyframes;
pub mod mapping;
mod menu;
mod playhead;
pub mod state;
pub mod style;
mod timeline;
mod zoom;

#[cfg(test)]
mod harness;

pub use draw::{DrawCmd, DrawList, FixedMetrics, TextMetrics};
pub use events::SequencerEvent;
pub use flags::{SelectionFlags, SequencerFlags, TimelineFlags};
pub use input::{FrameInput, PointerTracker};
pub use state::{RowId, SequencerId, SequencerRegistry, SequencerState};
pub use style::{ColorSlot, SequencerStyle, StyleStack};

use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

/// Depth of the row clip rect below the ruler
const CLIP_DEPTH: f32 = 999_999.0;

/// Text shown for `label`: everything before `##`
pub fn display_label(label: &str) -> &str {
    label.split_once("##").map_or(label, |(visible, _)| visible)
}

/// What the host UI tells the sequencer about where it is placed
#[derive(Clone, Copy)]
pub struct HostUi<'a> {
    /// Layout cursor where the sequencer starts
    pub origin: Pos2,
    /// Space left in the host panel
    pub available: Vec2,
    /// Host scroll offset, used by `ALWAYS_SHOW_HEADER`
    pub scroll: Vec2,
    pub clip_rect: Rect,
    /// Host window is collapsed or culled
    pub skip_items: bool,
    pub metrics: &'a dyn TextMetrics,
}

impl<'a> HostUi<'a> {
    pub fn new(origin: Pos2, available: Vec2, metrics: &'a dyn TextMetrics) -> Self {
        Self {
            origin,
            available,
            scroll: Vec2::ZERO,
            clip_rect: Rect::EVERYTHING,
            skip_items: false,
            metrics,
        }
    }
}

/// Builder for one sequencer scope
#[derive(Clone, Debug)]
pub struct Sequencer<'s> {
    id: &'s str,
    size: Vec2,
    flags: SequencerFlags,
}

impl<'s> Sequencer<'s> {
    pub fn new(id: &'s str) -> Self {
        Self {
            id,
            size: Vec2::ZERO,
            flags: SequencerFlags::empty(),
        }
    }

    /// Requested size; a non-positive axis fills the available width or
    /// the height the rows used last frame.
    pub fn size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn flags(mut self, flags: SequencerFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Open the sequencer scope. `frame`, `start` and `end` are read and
    /// written back when the user scrubs or edits the range.
    ///
    /// Returns `None` when the host is skipping items.
    /// Panics if `start >= end`.
    pub fn begin<'a>(
        self,
        registry: &'a mut SequencerRegistry,
        host: HostUi<'a>,
        frame: &mut u32,
        start: &mut u32,
        end: &mut u32,
    ) -> Option<SequencerFrame<'a>> {
        assert!(
            *start < *end,
            "start frame ({}) must be smaller than end frame ({})",
            *start,
            *end
        );
        if host.skip_items {
            return None;
        }

        let id = SequencerId::new(self.id);
        let SequencerRegistry {
            states,
            theme,
            pointer,
        } = registry;
        let state = states.entry(id).or_insert_with(|| {
            log::debug!("Creating sequencer state for '{}'", self.id);
            state::SequencerState::default()
        });
        let style = theme.style().clone();

        let mut size = vec2(self.size.x.floor(), self.size.y.floor());
        if size.x <= 0.0 {
            size.x = host.available.x.max(4.0);
        }
        if size.y <= 0.0 {
            size.y = state.filled_height.max(4.0);
        }

        let show_zoom = !self.flags.contains(SequencerFlags::HIDE_ZOOM);
        let zoom_height = if show_zoom { style.zoom_bar_height() } else { 0.0 };
        let top_bar_height = if style.top_bar_height > 0.0 {
            style.top_bar_height
        } else {
            host.metrics.text_size("100").y + style.frame_padding.y * 2.0
        };

        state.top_left_cursor = if self.flags.contains(SequencerFlags::ALWAYS_SHOW_HEADER) {
            host.origin + host.scroll
        } else {
            host.origin
        };
        state.top_bar_start_cursor = state.top_left_cursor + vec2(0.0, zoom_height);
        state.start_frame = *start;
        state.end_frame = *end;
        state.size = size;
        state.top_bar_size = vec2(size.x, top_bar_height);
        state.clamp_view();
        if !pointer.primary_down() {
            if let Some(held) = state.holding.as_mut() {
                held.frame = None;
            }
        }

        let mut frame_ctx = SequencerFrame {
            id,
            origin: host.origin,
            state,
            theme,
            pointer,
            metrics: host.metrics,
            clip_rect: host.clip_rect,
            flags: self.flags,
            depth: 0,
            row_height: 0.0,
            menu_confirmed: false,
            menu_opened: false,
            draw: DrawList::new(),
            events: Vec::new(),
        };

        frame_ctx.render_background();
        frame_ctx.process_menu();
        frame_ctx.render_top_bar();
        if show_zoom {
            frame_ctx.process_zoom_bar(start, end);
        }

        let state = &mut *frame_ctx.state;
        if state.size.y < state.filled_height {
            state.size.y = state.filled_height;
        }
        let header = vec2(0.0, state.top_bar_size.y + style.top_bar_spacing + zoom_height);
        state.filled_height = header.y;
        state.start_values_cursor = host.origin + header;
        state.values_cursor = state.start_values_cursor;

        frame_ctx.process_current_frame(frame);

        let clip_min = frame_ctx.state.top_bar_start_cursor + vec2(0.0, top_bar_height);
        let clip = Rect::from_min_max(
            clip_min,
            pos2(frame_ctx.state.top_left_cursor.x + size.x, clip_min.y + CLIP_DEPTH),
        );
        frame_ctx.draw.push_clip(clip);
        frame_ctx.clip_rect = frame_ctx.clip_rect.intersect(clip);

        Some(frame_ctx)
    }
}

/// Result of one sequencer frame
#[derive(Clone, Debug)]
pub struct SequencerOutput {
    /// Area the sequencer occupies in the host layout
    pub rect: Rect,
    pub draw: DrawList,
    pub events: Vec<SequencerEvent>,
    /// The pointer was over a wheel-driven control, so the host should not
    /// scroll with this frame's wheel
    pub wheel_claimed: bool,
}

/// Open sequencer scope. Rows are laid out through its methods.
pub struct SequencerFrame<'a> {
    id: SequencerId,
    origin: Pos2,
    state: &'a mut SequencerState,
    theme: &'a mut StyleStack,
    pointer: &'a mut PointerTracker,
    metrics: &'a dyn TextMetrics,
    clip_rect: Rect,
    flags: SequencerFlags,
    /// Nesting depth of the open rows
    depth: u32,
    /// Height of the row being laid out
    row_height: f32,
    /// The open menu's entry was clicked this frame; its row applies it
    menu_confirmed: bool,
    menu_opened: bool,
    draw: DrawList,
    events: Vec<SequencerEvent>,
}

impl<'a> SequencerFrame<'a> {
    pub fn id(&self) -> SequencerId {
        self.id
    }

    pub fn state(&self) -> &SequencerState {
        &*self.state
    }

    pub fn style(&self) -> &SequencerStyle {
        self.theme.style()
    }

    /// Override a colour until `pop_style_color`.
    pub fn push_style_color(&mut self, slot: ColorSlot, color: eframe::egui::Color32) {
        self.theme.push_color(slot, color);
    }

    pub fn pop_style_color(&mut self, count: usize) {
        self.theme.pop_color(count);
    }

    fn emit(&mut self, event: SequencerEvent) {
        log::debug!("Sequencer event: {:?}", event);
        self.events.push(event);
    }

    fn render_background(&mut self) {
        let style = self.theme.style();
        let top_cut = (self.state.top_left_cursor.y - self.origin.y).abs();
        let size = vec2(self.state.size.x, self.state.size.y - top_cut);
        self.draw.rect_filled(
            Rect::from_min_size(self.origin, size),
            style.sequencer_rounding,
            style.color(ColorSlot::Bg),
        );
    }

    /// Close the scope and hand back the frame's paint commands and events.
    ///
    /// Panics if a timeline is still open.
    pub fn end(mut self) -> SequencerOutput {
        assert!(
            self.state.timeline_stack.is_empty(),
            "mismatch in timeline begin / end: {} timeline(s) still open",
            self.state.timeline_stack.len()
        );

        self.state.last_selected_timeline = self.state.selected_timeline;
        if self.menu_confirmed {
            // Owning row was not laid out this frame
            self.state.menu = None;
        }

        self.draw.pop_clip();
        self.render_current_frame();
        self.render_menu();

        self.state.size.y = self.state.filled_height;
        let rect = Rect::from_min_size(self.origin, self.state.size);
        let wheel_claimed = self.pointer.wheel_claimed();

        SequencerOutput {
            rect,
            draw: self.draw,
            events: self.events,
            wheel_claimed,
        }
    }
}
