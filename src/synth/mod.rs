// Purpose: tone synthesis, split into a control side (tone, registry,
// output) and an audio side (poly, voice) joined by SynthMessage.

pub mod message;
pub mod output;
pub mod poly;
pub mod registry;
pub mod tone;
pub mod voice;

pub use message::{SynthMessage, ToneId, ToneSink};
pub use output::{AudioOutput, CaptureBackend, OutputBackend};
pub use poly::PianoSynth;
pub use registry::{ActiveSounds, ToneHandle};
pub use tone::ToneSynth;
