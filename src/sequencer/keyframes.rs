//! Keyframe markers of one row: draw, select, drag, create and delete.

use super::SequencerFrame;
use super::events::SequencerEvent;
use super::flags::TimelineFlags;
use super::mapping;
use super::state::{HeldKey, MenuKind, RowId, SelectedKey};
use super::style::ColorSlot;
use crate::track::Keyframes;
use eframe::egui::{Pos2, Rect, pos2, vec2};

/// Pointer travel that counts as a drag on a keyframe
const KEY_DRAG_THRESHOLD: f32 = 0.01;

/// Index of a selected key after the key at `from` moved to `to`
fn reindex_after_move(selected: usize, from: usize, to: usize) -> usize {
    if selected == from {
        to
    } else if from < selected && selected <= to {
        selected - 1
    } else if to <= selected && selected < from {
        selected + 1
    } else {
        selected
    }
}

/// Geometry of one row's track
#[derive(Clone, Copy)]
struct Track {
    left: f32,
    top: f32,
    height: f32,
    view_start: u32,
    ppf: f32,
}

impl Track {
    /// Top-centre of the marker for `frame`
    fn anchor(&self, frame: u32) -> Pos2 {
        pos2(self.left + mapping::frame_to_x(frame, self.view_start, self.ppf), self.top)
    }

    /// Square hit box, one row high, centred on the marker
    fn hit_box(&self, frame: u32) -> Rect {
        Rect::from_min_size(self.anchor(frame) - vec2(self.height / 2.0, 0.0), vec2(self.height, self.height))
    }
}

impl SequencerFrame<'_> {
    pub(super) fn process_keyframes<T: Default>(
        &mut self,
        row: RowId,
        label: &str,
        keys: &mut Keyframes<T>,
        flags: TimelineFlags,
    ) {
        let padding_x = self.theme.style().frame_padding.x;
        let track = Track {
            left: self.state.start_values_cursor.x + padding_x + self.state.values_width,
            top: self.state.values_cursor.y,
            height: self.row_height,
            view_start: self.state.view_start(),
            ppf: self.state.per_frame_width(),
        };

        self.delete_keyframes(row, label, keys, &track);

        let clicked = self.pointer.primary_clicked();
        let any_hovered = keys.frames().any(|f| self.pointer.hovered(track.hit_box(f)));
        // A click that misses every key is left for the row and the host
        let interact = keys.is_empty() || !clicked || any_hovered;

        let mut clicked_key = None;
        let mut step: Option<(usize, u32)> = None;
        for index in 0..keys.len() {
            let frame = keys[index].frame;
            let hit_box = track.hit_box(frame);
            let hovered = self.pointer.hovered(hit_box);
            self.render_keyframe(row, label, index, frame, &track, hovered);

            if !interact || (clicked && !hovered) {
                continue;
            }

            if hovered
                && !self.state.is_holding_any()
                && self.pointer.is_dragging(KEY_DRAG_THRESHOLD)
                && self.pointer.pressed_in(hit_box)
            {
                self.state.holding = Some(HeldKey { row, frame: Some(frame) });
            }

            if self.state.is_holding(row, frame) && self.pointer.is_dragging(KEY_DRAG_THRESHOLD) {
                clicked_key = Some(index);
                if flags.contains(TimelineFlags::ALLOW_FRAME_CHANGING) && step.is_none() {
                    step = self.step_drag(frame, &track).map(|to| (index, to));
                    if let Some((_, to)) = step {
                        self.state.holding = Some(HeldKey { row, frame: Some(to) });
                    }
                }
                continue;
            }

            if clicked && hovered {
                self.pointer.claim_click();
                clicked_key = Some(index);
            }
        }

        if let Some(index) = clicked_key {
            self.select_key(row, label, index);
        }
        if let Some((index, to)) = step {
            let from = keys[index].frame;
            let new_index = keys.set_frame(index, to);
            if let Some(selected) = self.state.selected_key.as_mut().filter(|k| k.label == label) {
                selected.index = reindex_after_move(selected.index, index, new_index);
            }
            self.emit(SequencerEvent::KeyframeMoved { row, from, to });
        }

        self.create_keyframe(row, label, keys, &track, any_hovered);
    }

    /// One frame of step-wise dragging: past half a row height the key
    /// moves a single frame toward the pointer, within the range.
    fn step_drag(&mut self, frame: u32, track: &Track) -> Option<u32> {
        let pos = self.pointer.pos()?;
        let distance = pos.x - track.anchor(frame).x;
        let drag = self.pointer.drag_delta().x;
        let half = track.height * 0.5;

        let to = if drag > 0.0 && distance > half && frame < self.state.end_frame {
            frame + 1
        } else if drag < 0.0 && distance < -half && frame > self.state.start_frame {
            frame - 1
        } else {
            return None;
        };
        self.pointer.reset_drag_delta();
        Some(to)
    }

    fn select_key(&mut self, row: RowId, label: &str, index: usize) {
        let key = SelectedKey {
            label: label.to_owned(),
            index,
        };
        if self.state.selected_key.as_ref() != Some(&key) {
            self.state.selected_key = Some(key);
            self.emit(SequencerEvent::KeyframeSelected { row, index });
        }
    }

    /// Right-click on a key opens the delete menu; confirming removes it.
    fn delete_keyframes<T>(&mut self, row: RowId, label: &str, keys: &mut Keyframes<T>, track: &Track) {
        for index in (0..keys.len()).rev() {
            let frame = keys[index].frame;
            if !self.menu_opened && self.pointer.secondary_clicked() && self.pointer.hovered(track.hit_box(frame)) {
                self.open_menu(row, MenuKind::Delete { frame });
            }
            if self.take_confirmed(row, MenuKind::Delete { frame }) {
                keys.remove(index);
                self.forget_key(label, index);
                if self.state.is_holding(row, frame) {
                    self.state.holding = None;
                }
                self.emit(SequencerEvent::KeyframeDeleted { row, frame });
            }
        }
    }

    /// Right-click on empty track opens the create menu for the frame under
    /// the pointer; confirming inserts a default value there.
    fn create_keyframe<T: Default>(
        &mut self,
        row: RowId,
        label: &str,
        keys: &mut Keyframes<T>,
        track: &Track,
        on_key: bool,
    ) {
        if !self.menu_opened && !on_key && self.pointer.secondary_clicked() {
            if let Some(pos) = self.pointer.pos() {
                let band = Rect::from_min_max(
                    pos2(track.left, track.top),
                    pos2(self.state.top_left_cursor.x + self.state.size.x, track.top + track.height),
                );
                let frame = mapping::x_to_frame(
                    pos.x,
                    self.state.start_values_cursor.x + self.theme.style().frame_padding.x,
                    self.state.values_width,
                    track.view_start,
                    track.ppf,
                );
                let in_range = frame >= self.state.start_frame as i64 && frame <= self.state.end_frame as i64;
                if band.contains(pos) && in_range {
                    self.open_menu(row, MenuKind::Create { frame: frame as u32 });
                }
            }
        }

        let Some(menu) = self.state.menu else {
            return;
        };
        let MenuKind::Create { frame } = menu.kind else {
            return;
        };
        if self.take_confirmed(row, menu.kind) {
            let index = keys.insert(frame, T::default());
            if let Some(selected) = self.state.selected_key.as_mut().filter(|k| k.label == label) {
                if selected.index >= index {
                    selected.index += 1;
                }
            }
            self.emit(SequencerEvent::KeyframeCreated { row, frame });
        }
    }

    /// Keep the selected index pointing at the same key after `removed` is erased.
    fn forget_key(&mut self, label: &str, removed: usize) {
        let Some(selected) = self.state.selected_key.as_mut().filter(|k| k.label == label) else {
            return;
        };
        if selected.index == removed {
            self.state.selected_key = None;
        } else if selected.index > removed {
            selected.index -= 1;
        }
    }

    fn render_keyframe(&mut self, row: RowId, label: &str, index: usize, frame: u32, track: &Track, hovered: bool) {
        let style = self.theme.style();
        let center = track.anchor(frame) + vec2(0.0, track.height / 2.0);
        let radius = track.height / 3.0;

        if self.state.selected_key_index(label) == Some(index) {
            self.draw.circle_filled(center, radius + 1.0, style.color(ColorSlot::KeyframeSelected));
        }
        let slot = if self.state.is_holding(row, frame) {
            ColorSlot::KeyframePressed
        } else if hovered {
            ColorSlot::KeyframeHovered
        } else {
            ColorSlot::Keyframe
        };
        self.draw.circle_filled(center, radius, style.color(slot));
    }
}
