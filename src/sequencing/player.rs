/*
Sequence Player
===============

Plays an ordered list of pitches with a fixed spacing between strikes, then
reports completion once the last note has had time to ring.

Timeline for the triad (spacing 700ms, note 600ms):

  t(ms)   0      700    1400   2100   2800   3400
          C      E      G      E      C      ✓ complete
          ├─600─┤       ...                  (600ms after the last strike)

The first note is struck synchronously inside `play`. Every later note is a
scheduled cue, and each cue schedules at most the next one, so a playback
never has more than one continuation pending.

Cancellation
------------

`PlaybackHandle::cancel` flips the playback's token. The pending cue is then
skipped by the scheduler, so no later note is struck and completion is never
reported. Notes that were already struck keep ringing; cutting those short
is the job of the active-sound registry.

Completion is reported by `on_cue` returning the playback id, rather than by
a stored callback: the owner decides what completion means.
*/

use std::time::Duration;

use tracing::trace;

use crate::engine::scheduler::{CancelToken, Scheduler};
use crate::sequencing::pitch::Pitch;
use crate::synth::{registry::ActiveSounds, tone::ToneSynth};

/// Spacing and length of passage notes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteTiming {
    /// Time between consecutive strikes.
    pub spacing: Duration,
    /// Ring time of each note; completion fires this long after the last strike.
    pub duration: Duration,
}

impl Default for NoteTiming {
    fn default() -> Self {
        Self {
            spacing: Duration::from_millis(700),
            duration: Duration::from_millis(600),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackId(u64);

/// Scheduled continuation of a playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Strike the next note.
    Note(PlaybackId),
    /// The last note has rung out.
    Complete(PlaybackId),
}

/// Owner's handle on one in-flight playback.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    id: PlaybackId,
    token: CancelToken,
}

impl PlaybackHandle {
    pub fn id(&self) -> PlaybackId {
        self.id
    }

    /// Stop striking further notes and suppress completion. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

struct Playback {
    id: PlaybackId,
    pitches: Vec<Pitch>,
    next: usize,
    timing: NoteTiming,
    token: CancelToken,
}

/// Everything a playback step touches.
pub struct PlayCtx<'a, T> {
    pub scheduler: &'a mut Scheduler<T>,
    pub synth: &'a mut ToneSynth,
    pub sounds: &'a mut ActiveSounds,
}

#[derive(Default)]
pub struct SequencePlayer {
    next_id: u64,
    playbacks: Vec<Playback>,
}

impl SequencePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing `pitches`. The first note is struck immediately.
    ///
    /// Starting a new playback does not cancel older ones; owners that want
    /// a single passage at a time cancel the previous handle first.
    pub fn play<T: From<Cue>>(
        &mut self,
        pitches: &[Pitch],
        timing: NoteTiming,
        ctx: PlayCtx<'_, T>,
    ) -> PlaybackHandle {
        self.playbacks.retain(|p| !p.token.is_cancelled());

        self.next_id += 1;
        let id = PlaybackId(self.next_id);
        let token = CancelToken::new();
        let handle = PlaybackHandle {
            id,
            token: token.clone(),
        };

        trace!(?id, notes = pitches.len(), "playback started");
        self.playbacks.push(Playback {
            id,
            pitches: pitches.to_vec(),
            next: 0,
            timing,
            token,
        });
        self.step(id, ctx);
        handle
    }

    /// Cancel `handle` and drop its playback right away.
    pub fn cancel(&mut self, handle: &PlaybackHandle) {
        handle.cancel();
        self.playbacks.retain(|p| p.id != handle.id);
    }

    /// Handle a due cue. Returns the playback id when that playback has
    /// just completed without being cancelled.
    pub fn on_cue<T: From<Cue>>(&mut self, cue: Cue, ctx: PlayCtx<'_, T>) -> Option<PlaybackId> {
        // Cancelled cues never come due, so sweep cancelled playbacks here.
        self.playbacks.retain(|p| !p.token.is_cancelled());
        match cue {
            Cue::Note(id) => {
                self.step(id, ctx);
                None
            }
            Cue::Complete(id) => {
                let idx = self.playbacks.iter().position(|p| p.id == id)?;
                let playback = self.playbacks.remove(idx);
                if playback.token.is_cancelled() {
                    return None;
                }
                trace!(?id, "playback complete");
                Some(id)
            }
        }
    }

    /// Number of playbacks that are still going to strike or complete.
    pub fn in_flight(&self) -> usize {
        self.playbacks
            .iter()
            .filter(|p| !p.token.is_cancelled())
            .count()
    }

    /// True when no playback, live or cancelled, is held.
    pub fn is_idle(&self) -> bool {
        self.playbacks.is_empty()
    }

    fn step<T: From<Cue>>(&mut self, id: PlaybackId, ctx: PlayCtx<'_, T>) {
        let Some(playback) = self.playbacks.iter_mut().find(|p| p.id == id) else {
            return;
        };
        if playback.token.is_cancelled() {
            return;
        }

        let now = ctx.scheduler.now();
        if let Some(&pitch) = playback.pitches.get(playback.next) {
            ctx.synth
                .trigger(ctx.sounds, pitch, playback.timing.duration, now);
            playback.next += 1;
        }

        let (delay, cue) = if playback.next < playback.pitches.len() {
            (playback.timing.spacing, Cue::Note(id))
        } else {
            (playback.timing.duration, Cue::Complete(id))
        };
        ctx.scheduler
            .schedule_with(delay, T::from(cue), &playback.token);
    }
}
