//! One-entry right-click menus for creating and deleting keyframes.

use super::SequencerFrame;
use super::draw::TextMetrics;
use super::state::{ContextMenu, MenuKind, RowId};
use super::style::{ColorSlot, SequencerStyle};
use eframe::egui::{Rect, vec2};

const MENU_MIN_WIDTH: f32 = 80.0;

impl MenuKind {
    pub fn label(&self) -> &'static str {
        match self {
            MenuKind::Create { .. } => "Create key",
            MenuKind::Delete { .. } => "Delete key",
        }
    }
}

impl ContextMenu {
    /// Clickable entry, anchored at the pointer position the menu opened at
    pub fn entry_rect(&self, metrics: &dyn TextMetrics, style: &SequencerStyle) -> Rect {
        let size = metrics.text_size(self.kind.label()) + style.frame_padding * 2.0;
        Rect::from_min_size(self.anchor, vec2(size.x.max(MENU_MIN_WIDTH), size.y))
    }
}

impl SequencerFrame<'_> {
    /// Resolve clicks against the open menu before anything else sees them.
    pub(super) fn process_menu(&mut self) {
        let Some(menu) = self.state.menu else {
            return;
        };
        let entry = menu.entry_rect(self.metrics, self.theme.style());

        if self.pointer.primary_clicked() {
            if self.pointer.hovered(entry) {
                self.pointer.claim_click();
                self.menu_confirmed = true;
            } else {
                self.state.menu = None;
            }
        } else if self.pointer.secondary_clicked() {
            self.state.menu = None;
        }
    }

    pub(super) fn open_menu(&mut self, row: RowId, kind: MenuKind) {
        let Some(anchor) = self.pointer.pos() else {
            return;
        };
        log::debug!("Opening '{}' menu", kind.label());
        self.state.menu = Some(ContextMenu { row, kind, anchor });
        self.menu_opened = true;
        self.menu_confirmed = false;
    }

    /// True once for the row owning a confirmed menu of `kind`.
    pub(super) fn take_confirmed(&mut self, row: RowId, kind: MenuKind) -> bool {
        let matches = self.menu_confirmed && self.state.menu.is_some_and(|m| m.row == row && m.kind == kind);
        if matches {
            self.menu_confirmed = false;
            self.state.menu = None;
        }
        matches
    }

    pub(super) fn render_menu(&mut self) {
        let Some(menu) = self.state.menu else {
            return;
        };
        let style = self.theme.style();
        let entry = menu.entry_rect(self.metrics, style);
        self.draw.rect_filled(entry.expand(2.0), style.sequencer_rounding, style.color(ColorSlot::MenuBg));
        if self.pointer.hovered(entry) {
            self.draw.rect_filled(entry, 0.0, style.color(ColorSlot::MenuItemHovered));
        }
        self.draw.text(entry.min + style.frame_padding, menu.kind.label(), style.color(ColorSlot::Text));
    }
}
