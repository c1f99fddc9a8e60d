//! Sequencer interaction events.
//!
//! Returned from `SequencerFrame::end` so hosts can react (undo stacks,
//! dirty flags) without diffing their data.

use super::state::RowId;

#[derive(Clone, Debug, PartialEq)]
pub enum SequencerEvent {
    /// Playhead moved by scrubbing or a ruler click
    CurrentFrameChanged(u32),
    /// Start / end edited through the length boxes
    RangeChanged { start: u32, end: u32 },
    ZoomChanged(f32),
    /// View scrolled; value is frames from the range start
    OffsetChanged(u32),
    TimelineSelected(Option<RowId>),
    KeyframeSelected { row: RowId, index: usize },
    KeyframeMoved { row: RowId, from: u32, to: u32 },
    KeyframeCreated { row: RowId, frame: u32 },
    KeyframeDeleted { row: RowId, frame: u32 },
}
