//! Top bar ruler, zoom / pan slider and start / end frame boxes.

use super::SequencerFrame;
use super::events::SequencerEvent;
use super::flags::SequencerFlags;
use super::mapping;
use super::state::{LengthDrag, LengthField};
use super::style::ColorSlot;
use eframe::egui::{Rect, pos2, vec2};

/// Zoom change per wheel notch
pub const ZOOM_WHEEL_STEP: f32 = 0.3;
/// Pointer travel that moves a length box by one frame
const LENGTH_DRAG_PIXELS: f32 = 4.0;
const SLIDER_ROUNDING: f32 = 10.0;

/// Lenient start / end validation for the length boxes.
///
/// A negative value, or an edit leaving `end <= start`, reverts to the
/// previous value. Never fails.
pub fn validate_range(old_start: u32, old_end: u32, new_start: i64, new_end: i64) -> (u32, u32) {
    let start = u32::try_from(new_start).unwrap_or(old_start);
    let mut end = u32::try_from(new_end).unwrap_or(old_end);
    if end <= start {
        end = old_end;
    }
    let start = if start >= end { old_start } else { start };
    (start, end)
}

/// Scroll offset for a slider dragged to `normalized` in `[0, 1]`.
///
/// The pointer holds the slider's centre; the left edge is converted back
/// to frames and clamped to `[0, total - view_width]`.
pub fn pan_offset(normalized: f32, zoom: f32, total: u32, view_width: u32) -> u32 {
    let half = 1.0 / zoom / 2.0;
    let max_offset = total.saturating_sub(view_width);
    if normalized - half <= 0.0 {
        return 0;
    }
    if normalized + half >= 1.0 {
        return max_offset;
    }
    let frame_width = 1.0 / total as f32;
    (((normalized - half) / frame_width) as u32).min(max_offset)
}

/// End caps of the slider: squares as tall as the slider, at most half its width.
fn slider_caps(slider: Rect) -> (Rect, Rect) {
    let cap = vec2(slider.height().min(slider.width() / 2.0), slider.height());
    (
        Rect::from_min_size(slider.min, cap),
        Rect::from_min_size(pos2(slider.max.x - cap.x, slider.min.y), cap),
    )
}

impl SequencerFrame<'_> {
    /// Ruler with frame ticks and numbers.
    pub(super) fn render_top_bar(&mut self) {
        let style = self.theme.style();
        let bar_min = self.state.top_bar_start_cursor;
        let bar = Rect::from_min_size(bar_min, self.state.top_bar_size);
        self.draw.rect_filled(bar, style.sequencer_rounding, style.color(ColorSlot::TopBarBg));

        let area = Rect::from_min_max(
            bar_min + vec2(self.state.values_width + style.frame_padding.x, style.frame_padding.y),
            bar.max,
        );
        let ppf = self.state.per_frame_width();
        let view_start = self.state.view_start();
        let count = self.state.view_width().saturating_add(1);
        let (primary, secondary) = mapping::tick_steps(count);
        let text_color = style.color(ColorSlot::TopBarText);
        let (show_lines, show_texts) = (style.top_bar_show_frame_lines, style.top_bar_show_frame_texts);

        let Some(first) = view_start.div_ceil(secondary).checked_mul(secondary) else {
            return;
        };
        for frame in (first..=view_start.saturating_add(count)).step_by(secondary as usize) {
            let x = area.min.x + mapping::frame_to_x(frame, view_start, ppf);
            if x > area.max.x {
                break;
            }
            let is_primary = frame % primary == 0;
            let height = if is_primary { area.height() } else { area.height() / 2.0 };
            if show_lines {
                self.draw.line(pos2(x, area.max.y), pos2(x, area.max.y - height), 1.0, text_color);
            }
            if show_texts && is_primary {
                self.draw.text(pos2(x + 2.0, area.min.y), frame.to_string(), text_color);
            }
        }
    }

    /// Zoom / pan slider, plus the length boxes when enabled.
    pub(super) fn process_zoom_bar(&mut self, start: &mut u32, end: &mut u32) {
        let style = self.theme.style().clone();
        let height = style.zoom_bar_height();
        let cursor = self.state.top_left_cursor;
        let width = self.state.size.x;

        let bar = if self.flags.contains(SequencerFlags::ALLOW_LENGTH_CHANGING) {
            let input_width = self.metrics.text_size("123456").x;
            let inset = input_width + style.widget_spacing.x;
            let half_gap = style.widget_spacing.x / 2.0;

            let start_box = Rect::from_min_size(pos2(cursor.x + half_gap, cursor.y), vec2(input_width, height));
            let end_box = Rect::from_min_size(
                pos2(cursor.x + width - inset + half_gap, cursor.y),
                vec2(input_width, height),
            );
            self.process_length_box(LengthField::Start, start_box, start, end);
            self.process_length_box(LengthField::End, end_box, start, end);

            Rect::from_min_size(cursor + vec2(inset, 0.0), vec2(width - inset * 2.0, height))
        } else {
            Rect::from_min_size(cursor, vec2(width, height))
        };

        let hovered = self.pointer.hovered(bar);
        if hovered {
            let wheel = self.pointer.take_wheel();
            if wheel != 0.0 {
                let offset = self.state.offset_frame;
                if self.state.apply_zoom_wheel(wheel, ZOOM_WHEEL_STEP) {
                    let zoom = self.state.zoom;
                    self.emit(SequencerEvent::ZoomChanged(zoom));
                }
                if self.state.offset_frame != offset {
                    let offset = self.state.offset_frame;
                    self.emit(SequencerEvent::OffsetChanged(offset));
                }
            }
        }

        let total = self.state.total_frames();
        let base_width = bar.width() - style.item_inner_spacing.x;
        let slider_size = vec2(base_width / self.state.zoom, bar.height() - style.item_inner_spacing.y);
        let frame_width = base_width / total as f32;
        let slider_at = |offset: u32| {
            Rect::from_min_size(
                bar.min + style.item_inner_spacing / 2.0 + vec2(frame_width * offset as f32, 0.0),
                slider_size,
            )
        };

        let (left_cap, right_cap) = slider_caps(slider_at(self.state.offset_frame));
        let on_cap = self.pointer.hovered(left_cap) || self.pointer.hovered(right_cap);

        if self.state.holding_zoom_slider {
            if self.pointer.is_dragging(0.01) {
                if let Some(pos) = self.pointer.pos() {
                    let normalized = (pos.x - bar.min.x) / bar.width();
                    let offset = pan_offset(normalized, self.state.zoom, total, self.state.view_width());
                    if offset != self.state.offset_frame {
                        self.state.offset_frame = offset;
                        self.emit(SequencerEvent::OffsetChanged(offset));
                    }
                }
            }
            if !self.pointer.primary_down() {
                self.state.holding_zoom_slider = false;
            }
        }
        if hovered && !on_cap && self.pointer.primary_clicked() {
            self.pointer.claim_click();
            self.state.holding_zoom_slider = true;
        }

        let slider = slider_at(self.state.offset_frame);
        let (left_cap, right_cap) = slider_caps(slider);

        self.draw.rect_filled(bar, SLIDER_ROUNDING, style.color(ColorSlot::ZoomBarBg));
        let slider_color = if self.pointer.hovered(slider) || self.state.holding_zoom_slider {
            ColorSlot::ZoomBarSliderHovered
        } else {
            ColorSlot::ZoomBarSlider
        };
        self.draw.rect_filled(slider, SLIDER_ROUNDING, style.color(slider_color));
        for cap in [left_cap, right_cap] {
            let slot = if self.pointer.hovered(cap) {
                ColorSlot::ZoomBarSliderEndsHovered
            } else {
                ColorSlot::ZoomBarSliderEnds
            };
            self.draw.rect_filled(cap, SLIDER_ROUNDING, style.color(slot));
        }

        let label = format!("{} - {}", self.state.view_start(), self.state.view_end());
        let text_size = self.metrics.text_size(&label);
        self.draw.text(bar.center() - text_size / 2.0, label, style.color(ColorSlot::Text));
    }

    /// Drag-value box for the start or end frame.
    fn process_length_box(&mut self, field: LengthField, rect: Rect, start: &mut u32, end: &mut u32) {
        let hovered = self.pointer.hovered(rect);
        let mut steps: i64 = 0;

        if hovered && self.pointer.primary_clicked() {
            self.pointer.claim_click();
            self.state.length_drag = Some(LengthDrag { field, remainder: 0.0 });
        }
        if let Some(drag) = self.state.length_drag.as_mut().filter(|d| d.field == field) {
            if self.pointer.primary_down() {
                drag.remainder += self.pointer.delta().x / LENGTH_DRAG_PIXELS;
                let whole = drag.remainder.trunc();
                drag.remainder -= whole;
                steps += whole as i64;
            } else {
                self.state.length_drag = None;
            }
        }
        if hovered {
            let wheel = self.pointer.take_wheel();
            if wheel != 0.0 {
                steps += wheel.round() as i64;
            }
        }

        if steps != 0 {
            let (new_start, new_end) = match field {
                LengthField::Start => (*start as i64 + steps, *end as i64),
                LengthField::End => (*start as i64, *end as i64 + steps),
            };
            let (s, e) = validate_range(*start, *end, new_start, new_end);
            if (s, e) != (*start, *end) {
                *start = s;
                *end = e;
                self.state.start_frame = s;
                self.state.end_frame = e;
                self.state.clamp_view();
                self.emit(SequencerEvent::RangeChanged { start: s, end: e });
            }
        }

        let style = self.theme.style();
        let value = match field {
            LengthField::Start => *start,
            LengthField::End => *end,
        };
        self.draw.rect_filled(rect, style.sequencer_rounding, style.color(ColorSlot::TimelinesBg));
        self.draw.text(rect.min + style.frame_padding, value.to_string(), style.color(ColorSlot::Text));
    }
}
