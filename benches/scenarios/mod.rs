//! Benchmarks for whole voices and the polyphonic synth.

mod synth;
mod voices;

pub use synth::bench_synth;
pub use voices::bench_voice;
