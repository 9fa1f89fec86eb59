//! Control-side tone synthesizer.
//!
//! `trigger` strikes one pitch for a given duration: it sends a `Play`
//! message to the audio side and registers a handle with the
//! [`ActiveSounds`] registry passed in by the owner. The sound itself
//! (partials, envelope) is rendered by [`crate::synth::voice::Voice`].

use std::time::Duration;

use tracing::trace;

use crate::sequencing::pitch::Pitch;
use crate::synth::{
    message::{SynthMessage, ToneId},
    output::AudioOutput,
    registry::{ActiveSounds, ToneHandle},
};

pub struct ToneSynth {
    output: AudioOutput,
    next_id: ToneId,
}

impl ToneSynth {
    pub fn new(output: AudioOutput) -> Self {
        Self { output, next_id: 1 }
    }

    /// Open the audio output. Only the first call does anything.
    pub fn initialize(&mut self) -> bool {
        self.output.initialize()
    }

    pub fn is_initialized(&self) -> bool {
        self.output.is_initialized()
    }

    /// Give back the output, still open if it was, for the next game.
    pub fn into_output(self) -> AudioOutput {
        self.output
    }

    /// Strike `pitch` for `duration`, starting at `now`.
    ///
    /// Returns `None` without side effects when the output has not been
    /// initialized; nothing is registered for a tone nobody can hear.
    pub fn trigger(
        &mut self,
        sounds: &mut ActiveSounds,
        pitch: Pitch,
        duration: Duration,
        now: Duration,
    ) -> Option<ToneId> {
        if !self.output.is_initialized() {
            trace!(%pitch, "audio not initialized, tone skipped");
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;

        self.output.send(SynthMessage::Play {
            id,
            frequency: pitch.frequency(),
            duration: duration.as_secs_f32(),
        });
        sounds.register(ToneHandle::new(id, pitch, now, duration));
        trace!(id, %pitch, "tone triggered");
        Some(id)
    }

    /// Cut one tone short and forget it. Returns false if it had already
    /// finished or been stopped.
    pub fn stop(&mut self, sounds: &mut ActiveSounds, id: ToneId) -> bool {
        match sounds.deregister(id) {
            Some(mut handle) => {
                handle.stop(&mut self.output);
                true
            }
            None => false,
        }
    }

    /// Cut every registered tone short and empty the registry, then tell
    /// the audio side to silence anything still ringing that the registry
    /// already reaped.
    pub fn stop_all(&mut self, sounds: &mut ActiveSounds) {
        sounds.stop_all(&mut self.output);
        self.output.send(SynthMessage::StopAll);
    }
}
