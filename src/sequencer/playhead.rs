//! Current-frame marker: hit-testing, scrubbing and drawing.

use super::SequencerFrame;
use super::events::SequencerEvent;
use super::mapping;
use super::state::PlayheadVisual;
use super::style::ColorSlot;
use eframe::egui::{Rect, pos2, vec2};

impl SequencerFrame<'_> {
    /// Marker rect for `frame`, hanging from the top of the ruler.
    fn current_frame_rect(&self, frame: u32) -> Rect {
        let style = self.theme.style();
        let width = style.current_frame_pointer_size;
        let x = mapping::frame_to_x(frame, self.state.view_start(), self.state.per_frame_width());
        let min = self.state.top_bar_start_cursor
            + vec2(self.state.values_width + style.frame_padding.x - width / 2.0 + x, 0.0);
        Rect::from_min_size(min, vec2(width, width * 2.5))
    }

    /// Left edge of the track, where frame `view_start` sits
    fn track_min_x(&self) -> f32 {
        self.state.top_bar_start_cursor.x + self.state.values_width + self.theme.style().frame_padding.x
    }

    /// Frame under screen `x` for the scrubber, clamped to the view
    fn scrub_at(&self, x: f32) -> u32 {
        let state = &*self.state;
        let work_width = state.size.x - state.values_width - state.per_frame_width();
        let normalized = (x - self.track_min_x()) / work_width;
        mapping::scrub_frame(normalized, state.start_frame, state.end_frame, state.zoom, state.offset_frame)
    }

    pub(super) fn process_current_frame(&mut self, frame: &mut u32) {
        let hit_box = self.current_frame_rect(*frame).expand(2.0);
        let hovered = self.pointer.hovered(hit_box);
        let ruler = Rect::from_min_max(
            pos2(self.track_min_x(), self.state.top_bar_start_cursor.y),
            self.state.top_bar_start_cursor + self.state.top_bar_size,
        );
        let before = *frame;
        let mut visual = if hovered { PlayheadVisual::Hovered } else { PlayheadVisual::Normal };

        if self.state.holding_current_frame {
            if self.pointer.is_dragging(0.0) {
                if let Some(pos) = self.pointer.pos() {
                    *frame = self.scrub_at(pos.x);
                }
                visual = PlayheadVisual::Pressed;
            }
            if !self.pointer.primary_down() {
                self.state.holding_current_frame = false;
                visual = PlayheadVisual::Normal;
            }
        } else if self.pointer.primary_clicked() {
            if hovered {
                self.pointer.claim_click();
                self.state.holding_current_frame = true;
                visual = PlayheadVisual::Pressed;
            } else if self.pointer.hovered(ruler) {
                // Jump, then keep scrubbing while held
                self.pointer.claim_click();
                self.state.holding_current_frame = true;
                if let Some(pos) = self.pointer.pos() {
                    *frame = self.scrub_at(pos.x);
                }
                visual = PlayheadVisual::Pressed;
            }
        }

        self.state.current_frame = *frame;
        self.state.playhead_visual = visual;
        if *frame != before {
            self.emit(SequencerEvent::CurrentFrameChanged(*frame));
        }
    }

    /// Marker and its line down through the rows, drawn over everything.
    pub(super) fn render_current_frame(&mut self) {
        let frame = self.state.current_frame;
        if frame < self.state.view_start() || frame > self.state.view_end() {
            return;
        }

        let bb = self.current_frame_rect(frame);
        let style = self.theme.style();
        let slot = match self.state.playhead_visual {
            PlayheadVisual::Normal => ColorSlot::FramePointer,
            PlayheadVisual::Hovered => ColorSlot::FramePointerHovered,
            PlayheadVisual::Pressed => ColorSlot::FramePointerPressed,
        };
        let tip = pos2(bb.center().x, bb.max.y);
        let shoulder = bb.max.y - bb.width() / 2.0;
        let line_height = self.state.size.y - self.state.top_bar_size.y;

        self.draw.line(
            tip,
            tip + vec2(0.0, line_height),
            style.current_frame_line_width,
            style.color(ColorSlot::FramePointerLine),
        );
        self.draw.polygon(
            vec![
                bb.min,
                pos2(bb.max.x, bb.min.y),
                pos2(bb.max.x, shoulder),
                tip,
                pos2(bb.min.x, shoulder),
            ],
            style.color(slot),
        );
    }
}
