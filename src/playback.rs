//! Playhead transport: play / stop / loop over the sequence range.
//!
//! Time accumulates fractionally so frame rate and UI refresh rate stay
//! independent. Hosts read the integer frame with `frame()`.

use log::trace;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FPS: f32 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playback {
    #[serde(skip)]
    pub playing: bool,
    pub looping: bool,
    pub fps: f32,
    /// Fractional playhead position in frames
    pub current: f32,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            playing: false,
            looping: false,
            fps: DEFAULT_FPS,
            current: 0.0,
        }
    }
}

impl Playback {
    pub fn frame(&self) -> u32 {
        self.current.max(0.0) as u32
    }

    /// Start playing. A playhead before `start` or parked on the end
    /// restarts at `start` on the next `advance`.
    pub fn play(&mut self, start: u32, looping: bool) {
        if self.current < start as f32 {
            self.current = start as f32;
        }
        self.looping = looping;
        self.playing = true;
        trace!("Playback started at {} (loop: {})", self.frame(), looping);
    }

    pub fn stop(&mut self) {
        if self.playing {
            self.playing = false;
            trace!("Playback stopped at {}", self.frame());
        }
    }

    pub fn toggle(&mut self, start: u32) {
        if self.playing {
            self.stop();
        } else {
            self.play(start, self.looping);
        }
    }

    /// Jump to `frame`, dropping any sub-frame remainder.
    pub fn seek(&mut self, frame: u32) {
        self.current = frame as f32;
    }

    /// Advance by `dt` seconds. Returns the new frame when it changed.
    ///
    /// Reaching `end` wraps to `start` when looping, otherwise parks on
    /// `end` and stops.
    pub fn advance(&mut self, dt: f32, start: u32, end: u32) -> Option<u32> {
        if !self.playing || end <= start {
            return None;
        }
        let before = self.frame();
        if self.current < start as f32 || self.current >= end as f32 {
            self.current = start as f32;
        }

        self.current += dt * self.fps;
        if self.current >= end as f32 {
            if self.looping {
                let span = (end - start) as f32;
                self.current = start as f32 + (self.current - end as f32) % span;
                trace!("Playback loop: {} -> {}", end, self.frame());
            } else {
                self.current = end as f32;
                self.playing = false;
                trace!("Reached end frame {}, stopping", end);
            }
        }

        let after = self.frame();
        (after != before).then_some(after)
    }
}
