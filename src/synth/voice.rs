//! A single sounding tone on the audio side.
//!
//! The timbre is additive: the fundamental plus four integer harmonics at
//! fixed, un-normalized gains, all multiplied by one piano envelope.
//!
//!   partial   ratio   gain
//!   1         1×      0.80
//!   2         2×      0.30
//!   3         3×      0.15
//!   4         4×      0.08
//!   5         5×      0.04

use crate::dsp::{envelope::Envelope, oscillator::SineOscillator};
use crate::synth::message::ToneId;

/// Harmonic layout as (frequency ratio, gain) pairs.
pub const PARTIALS: [(f32, f32); 5] = [(1.0, 0.8), (2.0, 0.3), (3.0, 0.15), (4.0, 0.08), (5.0, 0.04)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,     // Available for allocation
    Active,   // Ringing through its envelope
    Stopping, // Forced stop, fading out
}

pub struct Voice {
    id: ToneId,
    state: VoiceState,
    age: u64,
    sample_rate: f32,
    partials: [SineOscillator; 5],
    envelope: Envelope,
}

impl Voice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            id: 0,
            state: VoiceState::Free,
            age: 0,
            sample_rate,
            partials: [SineOscillator::new(0.0); 5],
            envelope: Envelope::new(0.0),
        }
    }

    /// Strike a new tone on this voice.
    pub fn start(&mut self, id: ToneId, frequency: f32, duration: f32, age: u64) {
        self.id = id;
        self.age = age;
        self.state = VoiceState::Active;

        for (osc, &(ratio, _)) in self.partials.iter_mut().zip(PARTIALS.iter()) {
            *osc = SineOscillator::new(frequency * ratio);
        }
        self.envelope = Envelope::new(duration);
        self.envelope.note_on();
    }

    /// Cut the tone short with a short fade.
    pub fn stop(&mut self) {
        if self.state == VoiceState::Active {
            self.state = VoiceState::Stopping;
            self.envelope.note_off(self.sample_rate);
        }
    }

    /// Add this voice's output into `out`.
    pub fn render_add(&mut self, out: &mut [f32]) {
        if self.is_free() {
            return;
        }

        for sample in out.iter_mut() {
            let level = self.envelope.next_sample(self.sample_rate);
            let mut tone = 0.0;
            for (osc, &(_, gain)) in self.partials.iter_mut().zip(PARTIALS.iter()) {
                tone += gain * osc.next_sample(self.sample_rate);
            }
            *sample += level * tone;
        }

        if !self.envelope.is_active() {
            self.free();
        }
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Stopping)
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.id = 0;
    }

    pub fn id(&self) -> ToneId {
        self.id
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::{num_complex::Complex, FftPlanner};

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn frees_itself_after_duration() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.start(7, 261.63, 0.1, 0);

        let mut buffer = vec![0.0; 4800];
        voice.render_add(&mut buffer);
        assert!(voice.is_active(), "still inside the last sample");

        let mut tail = vec![0.0; 64];
        voice.render_add(&mut tail);
        assert!(voice.is_free());
        assert_eq!(voice.id(), 0);
        assert!(buffer.iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn stop_fades_and_frees() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.start(1, 440.0, 2.0, 0);
        let mut buffer = vec![0.0; 256];
        voice.render_add(&mut buffer);

        voice.stop();
        assert_eq!(voice.state(), VoiceState::Stopping);
        let mut buffer = vec![0.0; 512];
        voice.render_add(&mut buffer);
        assert!(voice.is_free());
        assert!(buffer[300..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn spectrum_follows_harmonic_gains() {
        // 375 Hz lands exactly on an FFT bin at 48k / 4096 points (bin 32).
        let fundamental = 375.0;
        let size = 4096;
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.start(1, fundamental, 2.0, 0);

        // Skip the attack so the envelope is close to flat over the window.
        let mut skip = vec![0.0; 24_000];
        voice.render_add(&mut skip);
        let mut window = vec![0.0; size];
        voice.render_add(&mut window);

        let mut spectrum: Vec<Complex<f32>> =
            window.iter().map(|&s| Complex::new(s, 0.0)).collect();
        FftPlanner::new().plan_fft_forward(size).process(&mut spectrum);

        let bin = (fundamental * size as f32 / SAMPLE_RATE) as usize;
        let magnitudes: Vec<f32> = (1..=5).map(|k| spectrum[bin * k].norm()).collect();

        for pair in magnitudes.windows(2) {
            assert!(pair[0] > pair[1], "harmonics should fall off: {magnitudes:?}");
        }
        let ratio = magnitudes[1] / magnitudes[0];
        assert!(
            (ratio - 0.3 / 0.8).abs() < 0.05,
            "second harmonic ratio {ratio}"
        );
    }
}
