pub mod dsp; // Envelope and oscillator primitives
pub mod engine; // Virtual-clock scheduling
pub mod error;
pub mod game; // Round state machine and profiles
pub mod input; // Key and button-device guesses
pub mod scores; // High-score persistence
pub mod sequencing; // Pitches, passages and sequenced playback
pub mod synth; // Tones, voices and the audio-side synth

pub const MAX_BLOCK_SIZE: usize = 2048;

pub use game::{Difficulty, Game, Phase, Profile, Snapshot};
pub use sequencing::{Passage, Pitch};
pub use synth::{AudioOutput, OutputBackend};
