/*
Round State Machine
===================

One `Game` drives a full session: it primes each round with the reference
passage, picks a target, scores the guess and moves on.

    ┌──────┐ start ┌─────────┐ passage done ┌───────────────┐
    │ Idle │ ────→ │ Priming │ ───────────→ │ AwaitingGuess │ ⟲ replay note / passage
    └──────┘       └─────────┘              └───────────────┘
                        ↑                           │ guess
                        │ pause (1.5s)              ↓
                        │                     ┌──────────┐
                        └──── more rounds ─── │ Feedback │ (2.5s display)
                                              └──────────┘
                                                    │ last round
                                                    ↓
                          exit (any phase) ──→  ┌───────┐
                                                │ Ended │
                                                └───────┘

Time
----

All waiting happens on the game's own `Scheduler`. The owner calls
`tick(now)` from its event loop (or `advance(dt)` in tests); due timers are
handled in order, each at its exact due time.

Staleness
---------

Every timer is checked against the current phase (and round) before it
acts. Exit clears the scheduler, cancels the passage and stops all sound, so
nothing scheduled before an exit can act afterwards. A completed passage
only moves the game forward if it is the passage the game is still waiting
on.

Scoring is synchronous: the score is updated inside `guess`, before the
feedback timer is even scheduled, so the final summary always reads the
settled value.
*/

use std::time::Duration;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, info, warn};

use crate::engine::scheduler::{Scheduler, TaskHandle};
use crate::game::{
    profile::Profile,
    session::{NoScoreboard, RoundOutcome, Scoreboard, SessionSummary},
    snapshot::{GuessOutcome, Observer, Phase, Snapshot},
};
use crate::sequencing::{
    pitch::Pitch,
    player::{Cue, NoteTiming, PlayCtx, PlaybackHandle, PlaybackId, SequencePlayer},
};
use crate::synth::{
    message::ToneId, output::AudioOutput, registry::ActiveSounds, tone::ToneSynth,
};

/// Durations that pace a game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Spacing and length of reference passage notes.
    pub passage: NoteTiming,
    /// Length of a single target, key or device tone.
    pub target_note: Duration,
    /// How long a scored guess stays on screen.
    pub feedback_delay: Duration,
    /// Pause between the end of feedback and the next passage.
    pub round_pause: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            passage: NoteTiming::default(),
            target_note: Duration::from_millis(1000),
            feedback_delay: Duration::from_millis(2500),
            round_pause: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Cue(Cue),
    FeedbackElapsed { round: u32 },
    BeginRound { round: u32 },
}

impl From<Cue> for Timer {
    fn from(cue: Cue) -> Self {
        Timer::Cue(cue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassageRole {
    Priming,
    Replay,
}

pub struct Game {
    player: String,
    profile: Profile,
    timing: Timing,

    phase: Phase,
    round: u32,
    score: u32,
    target: Option<Pitch>,
    target_tone: Option<ToneId>,
    feedback: Option<GuessOutcome>,
    outcomes: Vec<RoundOutcome>,
    finalized: bool,

    scheduler: Scheduler<Timer>,
    sequencer: SequencePlayer,
    passage: Option<(PlaybackHandle, PassageRole)>,
    round_timer: Option<TaskHandle>,
    synth: ToneSynth,
    sounds: ActiveSounds,

    rng: StdRng,
    scoreboard: Box<dyn Scoreboard>,
    observers: Vec<Box<dyn Observer>>,
}

impl Game {
    pub fn new(player: impl Into<String>, profile: Profile, output: AudioOutput) -> Self {
        Self {
            player: player.into(),
            profile,
            timing: Timing::default(),
            phase: Phase::Idle,
            round: 0,
            score: 0,
            target: None,
            target_tone: None,
            feedback: None,
            outcomes: Vec::new(),
            finalized: false,
            scheduler: Scheduler::new(),
            sequencer: SequencePlayer::new(),
            passage: None,
            round_timer: None,
            synth: ToneSynth::new(output),
            sounds: ActiveSounds::new(),
            rng: StdRng::from_entropy(),
            scoreboard: Box::new(NoScoreboard),
            observers: Vec::new(),
        }
    }

    /// Seed target selection (reproducible games).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_scoreboard(mut self, scoreboard: impl Scoreboard + 'static) -> Self {
        self.scoreboard = Box::new(scoreboard);
        self
    }

    /// Register an observer; it is called after every transition.
    pub fn observe(mut self, observer: impl Observer + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    // ---------------------------------------------------------------------
    // Intents
    // ---------------------------------------------------------------------

    /// Idle → Priming. Opens audio on first use. Returns false if the game
    /// was already started.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            debug!(phase = ?self.phase, "start ignored");
            return false;
        }

        self.synth.initialize();
        self.round = 1;
        self.score = 0;
        info!(
            player = %self.player,
            difficulty = %self.profile.difficulty,
            rounds = self.profile.total_rounds,
            "game started"
        );
        self.begin_round();
        true
    }

    /// AwaitingGuess → Feedback. Ignored in any other phase.
    pub fn guess(&mut self, pitch: Pitch) -> Option<GuessOutcome> {
        if self.phase != Phase::AwaitingGuess {
            debug!(%pitch, phase = ?self.phase, "guess ignored");
            return None;
        }
        let target = self.target?;

        let correct = pitch == target;
        if correct {
            self.score += 1;
        }
        let outcome = GuessOutcome {
            guessed: pitch,
            target,
            correct,
        };
        self.outcomes.push(RoundOutcome {
            round: self.round,
            target,
            guessed: pitch,
            correct,
        });
        self.feedback = Some(outcome);
        info!(round = self.round, %pitch, %target, correct, score = self.score, "guess scored");

        // A replay still running belongs to a round that is now decided.
        self.cancel_passage();
        self.phase = Phase::Feedback;
        self.round_timer = Some(self.scheduler.schedule_in(
            self.timing.feedback_delay,
            Timer::FeedbackElapsed { round: self.round },
        ));
        self.notify();
        Some(outcome)
    }

    /// Play the target again, cutting off its previous strike. Only while
    /// awaiting a guess.
    pub fn replay_note(&mut self) -> bool {
        if self.phase != Phase::AwaitingGuess {
            return false;
        }
        let Some(target) = self.target else {
            return false;
        };
        if let Some(previous) = self.target_tone.take() {
            self.synth.stop(&mut self.sounds, previous);
        }
        let now = self.scheduler.now();
        self.target_tone = self
            .synth
            .trigger(&mut self.sounds, target, self.timing.target_note, now);
        true
    }

    /// Play the reference passage again. Only while awaiting a guess; the
    /// target and phase are unchanged.
    pub fn replay_passage(&mut self) -> bool {
        if self.phase != Phase::AwaitingGuess {
            return false;
        }
        self.play_passage(PassageRole::Replay);
        true
    }

    /// Abandon the game from any phase: silence everything, drop every
    /// pending timer, finalize nothing.
    pub fn exit(&mut self) {
        self.synth.stop_all(&mut self.sounds);
        self.cancel_passage();
        if let Some(timer) = self.round_timer.take() {
            timer.cancel();
        }
        self.scheduler.clear();

        if self.phase == Phase::Ended {
            return;
        }
        info!(round = self.round, score = self.score, "game exited");
        self.phase = Phase::Ended;
        self.notify();
    }

    /// Strike a pitch outside the round logic (key or device feedback).
    /// Silent if audio has not been opened.
    pub fn sound_pitch(&mut self, pitch: Pitch) -> bool {
        let now = self.scheduler.now();
        self.synth
            .trigger(&mut self.sounds, pitch, self.timing.target_note, now)
            .is_some()
    }

    // ---------------------------------------------------------------------
    // Time
    // ---------------------------------------------------------------------

    /// Run every timer due at or before `now`.
    pub fn tick(&mut self, now: Duration) {
        while let Some(timer) = self.scheduler.pop_due(now) {
            self.on_timer(timer);
        }
        self.scheduler.advance_to(now);
        self.sounds.reap(self.scheduler.now());
    }

    /// Move the game clock forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        let until = self.scheduler.now() + dt;
        self.tick(until);
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// When the next timer fires, if any is pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_rounds(&self) -> u32 {
        self.profile.total_rounds
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// Current target. Renderers should go through [`Game::snapshot`],
    /// which hides it until it is revealed.
    pub fn target(&self) -> Option<Pitch> {
        self.target
    }

    pub fn outcomes(&self) -> &[RoundOutcome] {
        &self.outcomes
    }

    pub fn is_awaiting_guess(&self) -> bool {
        self.phase == Phase::AwaitingGuess
    }

    /// True once a finished game has been handed to the scoreboard.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn active_sounds(&self) -> &ActiveSounds {
        &self.sounds
    }

    /// True while a passage (priming or replay) may still strike notes.
    pub fn passage_pending(&self) -> bool {
        self.passage
            .as_ref()
            .is_some_and(|(handle, _)| !handle.is_cancelled())
    }

    pub fn audio_initialized(&self) -> bool {
        self.synth.is_initialized()
    }

    /// Tear the game down and hand back its audio output so a follow-up
    /// game can reuse an already opened device.
    pub fn into_output(mut self) -> AudioOutput {
        self.synth.stop_all(&mut self.sounds);
        self.synth.into_output()
    }

    pub fn snapshot(&self) -> Snapshot {
        let revealed = self.feedback.is_some();
        Snapshot {
            phase: self.phase,
            round: self.round,
            total_rounds: self.profile.total_rounds,
            score: self.score,
            target_revealed: revealed,
            target: self.feedback.map(|f| f.target),
            feedback: self.feedback,
            keys_enabled: self.is_awaiting_guess(),
        }
    }

    // ---------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------

    fn on_timer(&mut self, timer: Timer) {
        match timer {
            Timer::Cue(cue) => {
                let ctx = PlayCtx {
                    scheduler: &mut self.scheduler,
                    synth: &mut self.synth,
                    sounds: &mut self.sounds,
                };
                if let Some(id) = self.sequencer.on_cue(cue, ctx) {
                    self.on_passage_complete(id);
                }
            }
            Timer::FeedbackElapsed { round } => self.on_feedback_elapsed(round),
            Timer::BeginRound { round } => {
                if self.phase == Phase::Feedback && round == self.round {
                    self.begin_round();
                } else {
                    debug!(round, phase = ?self.phase, "stale round start dropped");
                }
            }
        }
    }

    fn begin_round(&mut self) {
        self.round_timer = None;
        self.target = None;
        self.target_tone = None;
        self.feedback = None;
        self.phase = Phase::Priming;
        debug!(round = self.round, passage = self.profile.passage.name(), "priming");
        self.play_passage(PassageRole::Priming);
        self.notify();
    }

    fn on_passage_complete(&mut self, id: PlaybackId) {
        let role = match &self.passage {
            Some((handle, role)) if handle.id() == id => *role,
            _ => {
                debug!(?id, "completion of a superseded passage dropped");
                return;
            }
        };
        self.passage = None;

        if role == PassageRole::Priming && self.phase == Phase::Priming {
            self.await_guess();
        }
    }

    fn await_guess(&mut self) {
        let Some(&target) = self.profile.usable().choose(&mut self.rng) else {
            warn!(difficulty = %self.profile.difficulty, "profile has no usable pitches");
            return;
        };

        self.target = Some(target);
        self.phase = Phase::AwaitingGuess;
        let now = self.scheduler.now();
        self.target_tone = self
            .synth
            .trigger(&mut self.sounds, target, self.timing.target_note, now);
        debug!(round = self.round, "target chosen");
        self.notify();
    }

    fn on_feedback_elapsed(&mut self, round: u32) {
        if self.phase != Phase::Feedback || round != self.round {
            debug!(round, phase = ?self.phase, "stale feedback timer dropped");
            return;
        }

        if self.round >= self.profile.total_rounds {
            self.finish();
            return;
        }

        self.round += 1;
        self.feedback = None;
        self.target = None;
        self.round_timer = Some(self.scheduler.schedule_in(
            self.timing.round_pause,
            Timer::BeginRound { round: self.round },
        ));
        self.notify();
    }

    fn finish(&mut self) {
        self.cancel_passage();
        self.round_timer = None;
        self.phase = Phase::Ended;

        let summary = SessionSummary {
            player: self.player.clone(),
            difficulty: self.profile.difficulty,
            score: self.score,
            total_rounds: self.profile.total_rounds,
            rounds: self.outcomes.clone(),
        };
        info!(
            player = %summary.player,
            score = summary.score,
            total = summary.total_rounds,
            "game finished"
        );
        self.scoreboard.finalize_session(&summary);
        self.finalized = true;
        self.notify();
    }

    fn play_passage(&mut self, role: PassageRole) {
        self.cancel_passage();
        let ctx = PlayCtx {
            scheduler: &mut self.scheduler,
            synth: &mut self.synth,
            sounds: &mut self.sounds,
        };
        let handle = self
            .sequencer
            .play(self.profile.passage.pitches(), self.timing.passage, ctx);
        self.passage = Some((handle, role));
    }

    fn cancel_passage(&mut self) {
        if let Some((handle, _)) = self.passage.take() {
            self.sequencer.cancel(&handle);
        }
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer.transition(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::profile::Difficulty;
    use crate::synth::{message::SynthMessage, output::CaptureBackend};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn game(difficulty: Difficulty) -> (Game, CaptureBackend) {
        let capture = CaptureBackend::new();
        let game = Game::new("ada", difficulty.profile(), AudioOutput::new(capture.clone()))
            .with_seed(7);
        (game, capture)
    }

    #[test]
    fn starts_idle() {
        let (game, capture) = game(Difficulty::Easy);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.round(), 0);
        assert_eq!(capture.opens(), 0, "audio opens on start, not before");
    }

    #[test]
    fn start_twice_is_rejected() {
        let (mut game, capture) = game(Difficulty::Easy);
        assert!(game.start());
        assert!(!game.start());
        assert_eq!(capture.opens(), 1);
    }

    #[test]
    fn triad_primes_then_awaits() {
        let (mut game, capture) = game(Difficulty::Easy);
        game.start();
        assert_eq!(game.phase(), Phase::Priming);

        game.advance(ms(3399));
        assert_eq!(game.phase(), Phase::Priming);
        game.advance(ms(1));
        assert_eq!(game.phase(), Phase::AwaitingGuess);

        // Five passage notes plus the target.
        let played = capture.played_frequencies();
        assert_eq!(played.len(), 6);
        let target = game.target().expect("target chosen");
        assert_eq!(played[5], target.frequency());
    }

    #[test]
    fn replay_keeps_target_and_phase() {
        let (mut game, capture) = game(Difficulty::Hard);
        game.start();
        game.advance(ms(3400));
        let target = game.target();

        assert!(game.replay_note());
        assert!(game.replay_passage());
        game.advance(ms(10_000));

        assert_eq!(game.phase(), Phase::AwaitingGuess);
        assert_eq!(game.target(), target);
        // passage 5 + target 1 + replayed note 1 + replayed passage 5
        assert_eq!(capture.played_frequencies().len(), 12);
    }

    #[test]
    fn replays_are_ignored_outside_awaiting() {
        let (mut game, _) = game(Difficulty::Easy);
        assert!(!game.replay_note());
        assert!(!game.replay_passage());
        game.start();
        assert!(!game.replay_note());
        assert!(!game.replay_passage());
    }

    #[test]
    fn replaying_twice_keeps_one_passage_pending() {
        let (mut game, capture) = game(Difficulty::Easy);
        game.start();
        game.advance(ms(3400));
        capture.clear();

        game.replay_passage();
        game.advance(ms(100));
        game.replay_passage();
        game.advance(ms(10_000));

        // First replay was cut after one note, second played in full.
        assert_eq!(capture.played_frequencies().len(), 6);
    }

    #[test]
    fn guess_during_replay_cancels_it() {
        let (mut game, capture) = game(Difficulty::Easy);
        game.start();
        game.advance(ms(3400));
        game.replay_passage();
        assert!(game.passage_pending());

        let target = game.target().expect("target");
        game.guess(target);
        assert!(!game.passage_pending());
        capture.clear();
        game.advance(ms(2000));
        assert!(capture.played_frequencies().is_empty());
    }

    #[test]
    fn observers_see_every_phase() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let (game, _) = game(Difficulty::Easy);
        let mut game = game.observe(move |s: &Snapshot| sink.borrow_mut().push(s.phase));

        game.start();
        game.advance(ms(3400));
        let target = game.target().expect("target");
        game.guess(target);
        game.advance(ms(2500));
        game.advance(ms(1500));

        assert_eq!(
            *seen.borrow(),
            vec![
                Phase::Priming,
                Phase::AwaitingGuess,
                Phase::Feedback,
                Phase::Feedback,
                Phase::Priming,
            ]
        );
    }

    #[test]
    fn snapshot_hides_target_until_feedback() {
        let (mut game, _) = game(Difficulty::Easy);
        game.start();
        game.advance(ms(3400));
        let snap = game.snapshot();
        assert!(!snap.target_revealed);
        assert_eq!(snap.target, None);
        assert!(snap.keys_enabled);

        let target = game.target().expect("target");
        game.guess(target);
        let snap = game.snapshot();
        assert!(snap.target_revealed);
        assert_eq!(snap.target, Some(target));
        assert!(!snap.keys_enabled);
    }

    #[test]
    fn output_carries_over_to_the_next_game() {
        let (mut game, capture) = game(Difficulty::Easy);
        game.start();
        let output = game.into_output();

        let mut next = Game::new("ada", Difficulty::Easy.profile(), output);
        next.start();
        assert!(next.audio_initialized());
        assert_eq!(capture.opens(), 1);
    }

    #[test]
    fn replay_note_cuts_the_previous_strike() {
        let (mut game, capture) = game(Difficulty::Easy);
        game.start();
        game.advance(ms(3400));
        let first = game.target_tone.expect("target struck");

        assert!(game.replay_note());
        assert_eq!(
            capture.messages().iter().filter(|m| **m == SynthMessage::Stop { id: first }).count(),
            1
        );
        assert_eq!(game.active_sounds().iter().filter(|h| h.id() == first).count(), 0);
        assert_ne!(game.target_tone, Some(first));
    }

    #[test]
    fn exit_releases_player_state_and_silences_audio_side() {
        let (mut game, capture) = game(Difficulty::Easy);
        game.start();
        game.advance(ms(3400));
        game.replay_passage();
        assert_eq!(game.sequencer.in_flight(), 1);

        game.exit();
        assert_eq!(game.sequencer.in_flight(), 0);
        assert!(game.sequencer.is_idle());
        assert_eq!(capture.messages().last(), Some(&SynthMessage::StopAll));
    }

    #[test]
    fn sound_pitch_is_silent_before_start() {
        let (mut game, capture) = game(Difficulty::Easy);
        assert!(!game.sound_pitch(Pitch::F));
        assert!(capture.messages().is_empty());
    }
}
