pub mod passage;
pub mod pitch;
pub mod player;

pub use passage::Passage;
pub use pitch::Pitch;
pub use player::{Cue, NoteTiming, PlayCtx, PlaybackHandle, PlaybackId, SequencePlayer};
