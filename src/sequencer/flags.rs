//! Option flags for sequencers, rows and selection queries.

use bitflags::bitflags;

bitflags! {
    /// Sequencer-level options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SequencerFlags: u32 {
        /// Do not show the zoom / pan bar above the ruler.
        const HIDE_ZOOM = 1 << 1;
        /// Keep the header pinned when the host panel scrolls.
        const ALWAYS_SHOW_HEADER = 1 << 2;
        /// Show start / end frame boxes beside the zoom bar.
        const ALLOW_LENGTH_CHANGING = 1 << 3;
    }
}

bitflags! {
    /// Row-level options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TimelineFlags: u32 {
        /// Collapsible row with an expand arrow. Needs an `open` flag.
        const GROUP = 1 << 1;
        /// Keyframes on this row can be dragged to other frames.
        const ALLOW_FRAME_CHANGING = 1 << 2;
    }
}

bitflags! {
    /// Modifiers for `SequencerFrame::is_timeline_selected`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SelectionFlags: u32 {
        /// Only report the frame on which the selection changed.
        const NEWLY_SELECTED = 1 << 1;
    }
}
