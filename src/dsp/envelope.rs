/*
Piano Envelope
==============

This module implements the amplitude envelope every game tone is shaped
with. Unlike a classic gated ADSR, the piano envelope knows its total
duration up front: a tone is struck, rings, and dies on its own.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 0.4). This
              multiplies the summed partials of a tone.

  stage       Which segment of the curve we're in. Derived from elapsed
              time rather than driven by gate events.

  duration    Requested tone length in seconds. The envelope is silent at
              exactly t0 + duration.

  knee        The point at 70% of the duration where the tail hands over
              to the final linear release.


The Shape
---------

  Level
    0.4 ┐ ╱╲
        │╱  ╲
    0.2 ┤    ╲___
        │        ‾‾‾‾────___
   0.05 ┤                   ‾‾╲
    0.0 └───────────────────────╲──→ Time
        0  10ms 100ms      0.7d   d
        Attack Decay   Tail  Release

  Attack   linear 0 → 0.4 over a fixed 10 ms (independent of duration)
  Decay    exponential 0.4 → 0.2, ending at 100 ms
  Tail     exponential 0.2 → 0.05, ending at the knee (0.7 × duration)
  Release  linear from the knee level to silence at the duration

The exponential segments follow the usual "ramp towards a target" form:

    level(t) = from × (to / from) ^ ((t - t_start) / (t_end - t_start))

which gives the fast-then-slow fall of a struck string.

Short tones
-----------

If the knee lands before 100 ms (tones shorter than ~143 ms) the tail
segment vanishes and the release starts from wherever the attack/decay curve
has got to at the knee. The curve stays continuous for any duration.


Forced stop
-----------

`note_off` cuts the tone short: it snapshots the current level and fades to
zero over 5 ms (a hard cut would click). The same snapshot-and-interpolate
approach as a classic ADSR release.
*/

/// Attack length in seconds. Fixed, whatever the tone duration.
pub const ATTACK_TIME: f32 = 0.010;
/// Level reached at the end of the attack.
pub const PEAK_LEVEL: f32 = 0.4;
/// Time (from the strike) at which the decay segment ends.
pub const DECAY_END: f32 = 0.100;
/// Level reached at the end of the decay segment.
pub const DECAY_LEVEL: f32 = 0.2;
/// Level reached at the knee.
pub const TAIL_LEVEL: f32 = 0.05;
/// Knee position as a fraction of the duration.
pub const KNEE_FRACTION: f32 = 0.7;
/// Fade length used by a forced stop.
pub const STOP_FADE: f32 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Not sounding, level = 0
    Attack,  // Linear ramp up to the peak
    Decay,   // Exponential fall to the decay level
    Tail,    // Exponential fall to the tail level
    Release, // Linear fall to silence at the duration
    Fade,    // Forced stop in progress
}

pub struct Envelope {
    duration: f32,
    knee: f32,

    stage: EnvelopeState,
    level: f32,
    elapsed_samples: u64,

    // Forced-stop bookkeeping
    fade_start_level: f32,
    fade_total_samples: u32,
    fade_elapsed_samples: u32,
}

fn exp_ramp(from: f32, to: f32, t: f32, start: f32, end: f32) -> f32 {
    let span = (end - start).max(f32::EPSILON);
    let progress = ((t - start) / span).clamp(0.0, 1.0);
    from * (to / from).powf(progress)
}

impl Envelope {
    /// Envelope for a tone lasting `duration` seconds.
    pub fn new(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            duration,
            knee: duration * KNEE_FRACTION,
            stage: EnvelopeState::Idle,
            level: 0.0,
            elapsed_samples: 0,
            fade_start_level: 0.0,
            fade_total_samples: 1,
            fade_elapsed_samples: 0,
        }
    }

    /// Level of the un-released curve (attack, decay, tail) at `t`.
    fn strike_curve(&self, t: f32) -> f32 {
        if t < ATTACK_TIME {
            PEAK_LEVEL * (t / ATTACK_TIME)
        } else if t < DECAY_END {
            exp_ramp(PEAK_LEVEL, DECAY_LEVEL, t, ATTACK_TIME, DECAY_END)
        } else if self.knee > DECAY_END {
            exp_ramp(DECAY_LEVEL, TAIL_LEVEL, t, DECAY_END, self.knee)
        } else {
            DECAY_LEVEL
        }
    }

    /// Envelope level at `t` seconds after the strike.
    ///
    /// Pure function of time; ignores any forced stop.
    pub fn level_at(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.duration {
            return 0.0;
        }
        if t < self.knee {
            return self.strike_curve(t);
        }
        let knee_level = self.strike_curve(self.knee);
        let release_span = (self.duration - self.knee).max(f32::EPSILON);
        knee_level * ((self.duration - t) / release_span)
    }

    fn stage_at(&self, t: f32) -> EnvelopeState {
        if t >= self.duration {
            EnvelopeState::Idle
        } else if t >= self.knee {
            EnvelopeState::Release
        } else if t < ATTACK_TIME {
            EnvelopeState::Attack
        } else if t < DECAY_END {
            EnvelopeState::Decay
        } else {
            EnvelopeState::Tail
        }
    }

    /// Strike: restart the curve from silence.
    pub fn note_on(&mut self) {
        self.elapsed_samples = 0;
        self.level = 0.0;
        self.fade_elapsed_samples = 0;
        self.stage = if self.duration > 0.0 {
            EnvelopeState::Attack
        } else {
            EnvelopeState::Idle
        };
    }

    /// Forced stop: fade from the current level to zero over [`STOP_FADE`].
    pub fn note_off(&mut self, sample_rate: f32) {
        if matches!(self.stage, EnvelopeState::Idle | EnvelopeState::Fade) {
            return;
        }

        self.fade_start_level = self.level;
        self.fade_total_samples = (STOP_FADE * sample_rate).round().max(1.0) as u32;
        self.fade_elapsed_samples = 0;
        self.stage = EnvelopeState::Fade;
    }

    /// Advance the envelope by one sample. Called once per sample.
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Fade => {
                let progress =
                    self.fade_elapsed_samples as f32 / self.fade_total_samples as f32;
                self.level = (self.fade_start_level * (1.0 - progress)).max(0.0);

                self.fade_elapsed_samples = self.fade_elapsed_samples.saturating_add(1);
                if self.fade_elapsed_samples >= self.fade_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }

            _ => {
                let t = self.elapsed_samples as f32 / sample_rate;
                self.level = self.level_at(t);
                self.stage = self.stage_at(t);
                self.elapsed_samples += 1;
            }
        }

        debug_assert!((0.0..=PEAK_LEVEL + 1e-6).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(sample_rate);
        }
    }

    /// Returns true while the envelope still produces output.
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}
