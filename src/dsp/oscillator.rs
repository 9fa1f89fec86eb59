use std::f32::consts::TAU;

/// Phase-accumulating sine oscillator.
///
/// Phase is kept in cycles (0.0..1.0) so long tones never lose precision.
#[derive(Debug, Clone, Copy)]
pub struct SineOscillator {
    phase: f32,
    frequency: f32,
}

impl SineOscillator {
    pub fn new(frequency: f32) -> Self {
        Self {
            phase: 0.0,
            frequency,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let sample = (TAU * self.phase).sin();
        self.phase += self.frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        sample
    }

    /// Add this oscillator's output, scaled by `gain`, into `out`.
    pub fn render_add(&mut self, out: &mut [f32], gain: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample += gain * self.next_sample(sample_rate);
        }
    }
}
