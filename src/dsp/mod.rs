//! Low-level DSP primitives used by the synth voices.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs.

/// Fixed-duration piano envelope.
pub mod envelope;
/// Sine oscillator used for every partial.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeState};
pub use oscillator::SineOscillator;
