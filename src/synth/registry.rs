//! Tracking of every tone that is currently sounding.
//!
//! The registry is the only thing that can cut already-ringing tones short.
//! Cancelling a passage only prevents future notes; anything struck before
//! the cancel rings on until `stop_all` is called or its envelope ends.

use std::time::Duration;

use crate::sequencing::pitch::Pitch;
use crate::synth::{
    message::{SynthMessage, ToneId},
    output::AudioOutput,
};

/// Control-side view of one struck tone.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneHandle {
    id: ToneId,
    pitch: Pitch,
    started: Duration,
    duration: Duration,
    stopped: bool,
}

impl ToneHandle {
    pub fn new(id: ToneId, pitch: Pitch, started: Duration, duration: Duration) -> Self {
        Self {
            id,
            pitch,
            started,
            duration,
            stopped: false,
        }
    }

    pub fn id(&self) -> ToneId {
        self.id
    }

    pub fn pitch(&self) -> Pitch {
        self.pitch
    }

    pub fn started(&self) -> Duration {
        self.started
    }

    /// Moment the envelope reaches silence on its own.
    pub fn ends_at(&self) -> Duration {
        self.started + self.duration
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Cut the tone short. Stopping twice, or stopping a tone that already
    /// ended, sends nothing the second time and never fails.
    pub fn stop(&mut self, output: &mut AudioOutput) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        output.send(SynthMessage::Stop { id: self.id });
    }
}

#[derive(Debug, Default)]
pub struct ActiveSounds {
    handles: Vec<ToneHandle>,
}

impl ActiveSounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handle: ToneHandle) {
        self.handles.push(handle);
    }

    /// Remove one handle. Returns it if it was still registered.
    pub fn deregister(&mut self, id: ToneId) -> Option<ToneHandle> {
        let idx = self.handles.iter().position(|h| h.id == id)?;
        Some(self.handles.remove(idx))
    }

    /// Deregister every tone whose envelope has completed by `now`.
    /// Returns how many were removed.
    pub fn reap(&mut self, now: Duration) -> usize {
        let before = self.handles.len();
        self.handles.retain(|h| h.ends_at() > now);
        before - self.handles.len()
    }

    /// Stop every registered tone, then forget them all.
    pub fn stop_all(&mut self, output: &mut AudioOutput) {
        for handle in &mut self.handles {
            handle.stop(output);
        }
        self.handles.clear();
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToneHandle> {
        self.handles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::output::CaptureBackend;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn output() -> (AudioOutput, CaptureBackend) {
        let capture = CaptureBackend::new();
        let mut output = AudioOutput::new(capture.clone());
        output.initialize();
        (output, capture)
    }

    #[test]
    fn stop_all_on_empty_registry_is_a_no_op() {
        let (mut output, capture) = output();
        let mut sounds = ActiveSounds::new();
        sounds.stop_all(&mut output);
        sounds.stop_all(&mut output);
        assert!(sounds.is_empty());
        assert!(capture.messages().is_empty());
    }

    #[test]
    fn stop_all_stops_each_tone_once_and_clears() {
        let (mut output, capture) = output();
        let mut sounds = ActiveSounds::new();
        sounds.register(ToneHandle::new(1, Pitch::C, ms(0), ms(600)));
        sounds.register(ToneHandle::new(2, Pitch::E, ms(100), ms(600)));

        sounds.stop_all(&mut output);
        assert!(sounds.is_empty());
        assert_eq!(
            capture.messages(),
            vec![SynthMessage::Stop { id: 1 }, SynthMessage::Stop { id: 2 }]
        );
    }

    #[test]
    fn handle_stop_is_idempotent() {
        let (mut output, capture) = output();
        let mut handle = ToneHandle::new(3, Pitch::G, ms(0), ms(600));
        handle.stop(&mut output);
        handle.stop(&mut output);
        assert!(handle.is_stopped());
        assert_eq!(capture.messages().len(), 1);
    }

    #[test]
    fn stopping_without_output_does_not_fail() {
        let mut output = AudioOutput::disabled();
        let mut sounds = ActiveSounds::new();
        sounds.register(ToneHandle::new(1, Pitch::A, ms(0), ms(600)));
        sounds.stop_all(&mut output);
        assert!(sounds.is_empty());
    }

    #[test]
    fn reap_removes_finished_tones() {
        let mut sounds = ActiveSounds::new();
        sounds.register(ToneHandle::new(1, Pitch::C, ms(0), ms(600)));
        sounds.register(ToneHandle::new(2, Pitch::D, ms(700), ms(600)));

        assert_eq!(sounds.reap(ms(599)), 0);
        assert_eq!(sounds.reap(ms(600)), 1);
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds.iter().next().map(|h| h.pitch()), Some(Pitch::D));
    }

    #[test]
    fn deregister_by_id() {
        let mut sounds = ActiveSounds::new();
        sounds.register(ToneHandle::new(9, Pitch::B, ms(0), ms(600)));
        assert!(sounds.deregister(9).is_some());
        assert!(sounds.deregister(9).is_none());
    }
}
