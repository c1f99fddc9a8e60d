//! neoseq - immediate-mode keyframe sequencer
//!
//! The engine in `sequencer` is backend independent: it reads a per-frame
//! input snapshot and emits draw commands. `sequencer::egui_backend` wires it
//! into egui.

pub mod cli;
pub mod document;
pub mod paths;
pub mod playback;
pub mod sequencer;
pub mod track;

pub use document::{AnimClip, SequenceDocument, SequenceObject};
pub use playback::Playback;
pub use sequencer::{
    Sequencer, SequencerEvent, SequencerFlags, SequencerFrame, SequencerOutput, SequencerRegistry, SequencerStyle,
    TimelineFlags,
};
pub use track::{Keyframe, Keyframes, Lerp};
