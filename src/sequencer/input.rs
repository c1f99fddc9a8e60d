//! Pointer input for the sequencer.
//!
//! The host feeds one `FrameInput` snapshot per UI frame. `PointerTracker`
//! compares it with the previous snapshot to derive button edges and drag
//! state, the way an immediate-mode UI polls its devices.

use eframe::egui::{Pos2, Rect, Vec2};

/// Raw input state for one UI frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer position in screen space, `None` when outside the window
    pub pointer_pos: Option<Pos2>,
    pub primary_down: bool,
    pub secondary_down: bool,
    /// Vertical wheel movement in notches (positive = away from user)
    pub wheel: f32,
}

impl FrameInput {
    pub fn at(pos: Pos2) -> Self {
        Self {
            pointer_pos: Some(pos),
            ..Default::default()
        }
    }

    pub fn with_primary(mut self, down: bool) -> Self {
        self.primary_down = down;
        self
    }

    pub fn with_secondary(mut self, down: bool) -> Self {
        self.secondary_down = down;
        self
    }

    pub fn with_wheel(mut self, notches: f32) -> Self {
        self.wheel = notches;
        self
    }
}

/// Edge / drag tracking derived from consecutive `FrameInput`s
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    current: FrameInput,
    previous: FrameInput,
    press_pos: Option<Pos2>,
    drag_origin: Option<Pos2>,
    max_drag_sq: f32,
    click_claimed: bool,
    wheel_claimed: bool,
}

impl PointerTracker {
    /// Advance to the next UI frame.
    pub fn update(&mut self, input: FrameInput) {
        self.previous = self.current;
        self.current = input;
        self.click_claimed = false;
        self.wheel_claimed = false;

        if input.primary_down && !self.previous.primary_down {
            self.press_pos = input.pointer_pos;
            self.drag_origin = input.pointer_pos;
            self.max_drag_sq = 0.0;
        } else if input.primary_down {
            if let (Some(press), Some(pos)) = (self.press_pos, input.pointer_pos) {
                self.max_drag_sq = self.max_drag_sq.max((pos - press).length_sq());
            }
        } else {
            self.press_pos = None;
            self.drag_origin = None;
            self.max_drag_sq = 0.0;
        }
    }

    pub fn pos(&self) -> Option<Pos2> {
        self.current.pointer_pos
    }

    pub fn hovered(&self, rect: Rect) -> bool {
        self.pos().is_some_and(|p| rect.contains(p))
    }

    pub fn primary_down(&self) -> bool {
        self.current.primary_down
    }

    /// Primary button went down this frame and no widget took the press yet.
    pub fn primary_clicked(&self) -> bool {
        !self.click_claimed && self.current.primary_down && !self.previous.primary_down
    }

    pub fn secondary_clicked(&self) -> bool {
        self.current.secondary_down && !self.previous.secondary_down
    }

    pub fn primary_released(&self) -> bool {
        !self.current.primary_down && self.previous.primary_down
    }

    /// Consume this frame's primary press so later widgets ignore it.
    pub fn claim_click(&mut self) {
        self.click_claimed = true;
    }

    /// Where the current primary press started.
    pub fn press_pos(&self) -> Option<Pos2> {
        self.press_pos
    }

    pub fn pressed_in(&self, rect: Rect) -> bool {
        self.press_pos.is_some_and(|p| rect.contains(p))
    }

    /// Primary held and moved at least `threshold` px since the press.
    /// A zero threshold is true for every frame the button is held.
    pub fn is_dragging(&self, threshold: f32) -> bool {
        self.current.primary_down && self.press_pos.is_some() && self.max_drag_sq >= threshold * threshold
    }

    /// Pointer movement since the press or the last `reset_drag_delta`.
    pub fn drag_delta(&self) -> Vec2 {
        match (self.drag_origin, self.pos()) {
            (Some(origin), Some(pos)) => pos - origin,
            _ => Vec2::ZERO,
        }
    }

    pub fn reset_drag_delta(&mut self) {
        if self.current.primary_down {
            self.drag_origin = self.pos();
        }
    }

    /// Pointer movement since the previous frame.
    pub fn delta(&self) -> Vec2 {
        match (self.previous.pointer_pos, self.current.pointer_pos) {
            (Some(prev), Some(pos)) => pos - prev,
            _ => Vec2::ZERO,
        }
    }

    /// Wheel notches, zero once a widget consumed them.
    pub fn wheel(&self) -> f32 {
        if self.wheel_claimed { 0.0 } else { self.current.wheel }
    }

    /// Consume the wheel for a hovered widget, even when it did not move
    /// this frame, so the host does not scroll under it.
    pub fn take_wheel(&mut self) -> f32 {
        let wheel = self.wheel();
        self.wheel_claimed = true;
        wheel
    }

    /// Some widget owned the wheel this frame
    pub fn wheel_claimed(&self) -> bool {
        self.wheel_claimed
    }
}
