//! Rows and groups: layout, nesting stack and selection.

use super::events::SequencerEvent;
use super::flags::{SelectionFlags, TimelineFlags};
use super::state::RowId;
use super::style::ColorSlot;
use super::{SequencerFrame, display_label};
use crate::track::Keyframes;
use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

impl SequencerFrame<'_> {
    /// Identity of row `label` under the innermost open row.
    pub fn row_id(&self, label: &str) -> RowId {
        let parent = self
            .state
            .timeline_stack
            .last()
            .map_or(self.id.raw(), |row| row.raw());
        RowId::new(parent, label)
    }

    /// Lay out one row and process its keyframes.
    ///
    /// `open` makes the row closable. With `TimelineFlags::GROUP` it also
    /// gets an arrow that toggles `open`. Returns whether children should
    /// be laid out; when true, `end_timeline` must follow them.
    pub fn begin_timeline<T: Default>(
        &mut self,
        label: &str,
        keys: &mut Keyframes<T>,
        open: Option<&mut bool>,
        flags: TimelineFlags,
    ) -> bool {
        let (id, is_open) = self.layout_row(label, open, flags);
        self.process_keyframes(id, label, keys, flags);
        self.advance_row(id, is_open)
    }

    /// Draws the label and arrow of a row and reserves its height.
    /// Returns the row id and whether it is open.
    fn layout_row(&mut self, label: &str, mut open: Option<&mut bool>, flags: TimelineFlags) -> (RowId, bool) {
        let style = self.theme.style().clone();
        self.state.check_key_label = label.to_owned();
        let id = self.row_id(label);
        let text = display_label(label);

        let mut label_size = self.metrics.text_size(text);
        label_size.x += style.frame_padding.x * 2.0
            + style.item_spacing.x * 2.0
            + self.depth as f32 * style.depth_item_spacing;
        label_size.y += style.frame_padding.y * 2.0 + style.item_spacing.y * 2.0;

        let is_group = flags.contains(TimelineFlags::GROUP) && open.is_some();
        let (visible, hovered) = if is_group {
            label_size.x += style.widget_spacing.x + style.font_size;
            self.group_behaviour(id, open.as_deref_mut(), label_size)
        } else {
            self.timeline_behaviour(id, label_size)
        };

        if self.depth > 0 {
            self.state.values_cursor.x = self.state.top_bar_start_cursor.x;
        }
        self.row_height = label_size.y;
        self.state.filled_height += label_size.y;

        let is_open = open.as_deref().copied().unwrap_or(true);
        if visible {
            self.render_row(id, text, is_group, is_open, hovered);
        }
        (id, is_open)
    }

    /// Moves the cursor below the row and opens it for children.
    fn advance_row(&mut self, id: RowId, is_open: bool) -> bool {
        let style = self.theme.style();
        let indent = style.frame_padding.x + self.depth as f32 * style.depth_item_spacing;
        self.state.values_cursor.x += indent;
        self.state.values_cursor.y += self.row_height;

        if is_open {
            self.depth += 1;
            self.state.timeline_stack.push(id);
        } else {
            self.finish_previous_timeline();
        }
        is_open
    }

    /// Close the row opened by the last successful `begin_timeline`.
    ///
    /// Panics if no row is open.
    pub fn end_timeline(&mut self) {
        assert!(
            !self.state.timeline_stack.is_empty(),
            "end_timeline called without an open timeline"
        );
        self.finish_previous_timeline();
        self.depth = self.depth.saturating_sub(1);
        self.state.timeline_stack.pop();
    }

    /// Collapsible row without keyframes. With `enable_group_select`,
    /// selecting any row inside highlights the whole group.
    pub fn begin_group(&mut self, label: &str, open: &mut bool, enable_group_select: bool) -> bool {
        if enable_group_select {
            self.state.now_group = Some(label.to_owned());
        }
        // Groups own no keys, so the track takes no clicks
        let (id, is_open) = self.layout_row(label, Some(open), TimelineFlags::GROUP);
        let result = self.advance_row(id, is_open);
        if !result {
            self.state.now_group = None;
        }
        result
    }

    pub fn end_group(&mut self) {
        self.state.now_group = None;
        self.end_timeline();
    }

    /// Group `label` owns the current selection.
    pub fn is_group_selected(&self, label: &str) -> bool {
        self.state.selected_group.as_deref() == Some(label)
    }

    /// The innermost open row is selected. With `NEWLY_SELECTED`, only on
    /// the frame the selection moved to it.
    ///
    /// Panics if no row is open.
    pub fn is_timeline_selected(&self, flags: SelectionFlags) -> bool {
        let Some(&open) = self.state.timeline_stack.last() else {
            panic!("is_timeline_selected called with no open timeline");
        };
        let selected = self.state.selected_timeline == Some(open);
        if flags.contains(SelectionFlags::NEWLY_SELECTED) {
            selected && self.state.selected_timeline != self.state.last_selected_timeline
        } else {
            selected
        }
    }

    /// Select row `label` under the innermost open row, or clear with `None`.
    pub fn set_selected_timeline(&mut self, label: Option<&str>) {
        let id = label.map(|l| self.row_id(l));
        if self.state.selected_timeline != id {
            self.state.last_selected_timeline = self.state.selected_timeline;
            self.state.selected_timeline = id;
            self.emit(SequencerEvent::TimelineSelected(id));
        }
    }

    pub fn selected_timeline(&self) -> Option<RowId> {
        self.state.selected_timeline
    }

    /// Index of the selected keyframe on the row laid out last, if it owns it.
    pub fn selected_key_index(&self) -> Option<usize> {
        self.state.selected_key_index(&self.state.check_key_label)
    }

    fn finish_previous_timeline(&mut self) {
        self.state.values_cursor.x = self.state.top_bar_start_cursor.x;
        self.row_height = 0.0;
    }

    fn toggle_selection(&mut self, id: RowId) {
        let next = if self.state.selected_timeline == Some(id) { None } else { Some(id) };
        self.state.last_selected_timeline = self.state.selected_timeline;
        self.state.selected_timeline = next;
        self.state.selected_group = next.and(self.state.now_group.clone());
        self.emit(SequencerEvent::TimelineSelected(next));
    }

    fn clickable(&mut self, rect: Rect) -> bool {
        if self.pointer.hovered(rect) && self.pointer.primary_clicked() {
            self.pointer.claim_click();
            return true;
        }
        false
    }

    fn grow_values_width(&mut self, width: f32) {
        if width > self.state.values_width {
            self.state.values_width = width;
        }
    }

    /// Returns `(visible, hovered)`.
    fn timeline_behaviour(&mut self, id: RowId, label_size: Vec2) -> (bool, bool) {
        let bb = Rect::from_min_size(self.state.values_cursor, label_size);
        let visible = self.clip_rect.intersects(bb);
        if visible && self.clickable(bb) {
            self.toggle_selection(id);
        }
        self.grow_values_width(label_size.x);
        (visible, self.pointer.hovered(bb))
    }

    fn group_behaviour(&mut self, id: RowId, open: Option<&mut bool>, label_size: Vec2) -> (bool, bool) {
        let arrow_size = self.theme.style().font_size;
        let cursor = self.state.values_cursor;
        let arrow_bb = Rect::from_min_size(cursor, vec2(arrow_size, arrow_size));
        let group_bb = Rect::from_min_size(cursor + vec2(arrow_size, 0.0), label_size);
        let arrow_visible = self.clip_rect.intersects(arrow_bb);
        let group_visible = self.clip_rect.intersects(group_bb);

        if arrow_visible && self.clickable(arrow_bb) {
            if let Some(open) = open {
                *open = !*open;
                log::debug!("Group {:?} open: {}", id, *open);
            }
        }
        if group_visible && self.clickable(group_bb) {
            self.toggle_selection(id);
        }
        self.grow_values_width(group_bb.max.x - arrow_bb.min.x);
        (arrow_visible && group_visible, self.pointer.hovered(group_bb))
    }

    fn render_row(&mut self, id: RowId, text: &str, is_group: bool, is_open: bool, hovered: bool) {
        let style = self.theme.style();
        let state = &*self.state;
        let cursor = state.values_cursor;

        let group_highlight = state.selected_group.is_some() && state.selected_group == state.now_group;
        if state.selected_timeline == Some(id) || group_highlight {
            self.draw.rect_filled(
                Rect::from_min_size(cursor, vec2(state.values_width, self.row_height)),
                0.0,
                style.color(ColorSlot::SelectedTimeline),
            );
        }
        self.draw.rect_filled(
            Rect::from_min_size(pos2(state.top_left_cursor.x, cursor.y), vec2(state.size.x, 1.0)),
            0.0,
            style.color(ColorSlot::TimelineSeparator),
        );

        let mut color = style.color(if is_group { ColorSlot::GroupLabel } else { ColorSlot::Text });
        if hovered {
            color = color.gamma_multiply(0.7);
        }
        let mut pos = cursor + style.frame_padding + vec2(self.depth as f32 * style.depth_item_spacing, 0.0);
        if is_group {
            self.draw.polygon(arrow_points(pos, style.font_size, is_open), style.color(ColorSlot::Text));
            pos.x += style.font_size + style.item_spacing.x;
        }
        self.draw.text(pos, text, color);
    }
}

/// Expand arrow inside a `size` square at `pos`: down when open, right when closed.
fn arrow_points(pos: Pos2, size: f32, open: bool) -> Vec<Pos2> {
    let r = size * 0.4;
    let center = pos + vec2(size * 0.5, size * 0.5);
    if open {
        vec![
            center + vec2(0.0, 0.75 * r),
            center + vec2(-0.866 * r, -0.75 * r),
            center + vec2(0.866 * r, -0.75 * r),
        ]
    } else {
        vec![
            center + vec2(0.75 * r, 0.0),
            center + vec2(-0.75 * r, 0.866 * r),
            center + vec2(-0.75 * r, -0.866 * r),
        ]
    }
}
