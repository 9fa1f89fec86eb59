//! Read-only view of the game handed to renderers after every transition.

use serde::Serialize;

use crate::sequencing::pitch::Pitch;

/// Round state machine phases.
///
///   Idle → Priming → AwaitingGuess → Feedback → (Priming | Ended)
///
/// `Ended` is also reachable from any phase through an explicit exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Created, not started.
    Idle,
    /// Reference passage is playing.
    Priming,
    /// Target note chosen; waiting for the player.
    AwaitingGuess,
    /// Guess scored; showing the result, then pausing before the next round.
    Feedback,
    /// Finished or exited. Terminal.
    Ended,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "ready",
            Phase::Priming => "listen",
            Phase::AwaitingGuess => "your guess",
            Phase::Feedback => "result",
            Phase::Ended => "game over",
        }
    }
}

/// Result of one scored guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuessOutcome {
    pub guessed: Pitch,
    pub target: Pitch,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    /// 1-based round index; 0 only before the game starts.
    pub round: u32,
    pub total_rounds: u32,
    pub score: u32,
    /// True when the target may be shown to the player.
    pub target_revealed: bool,
    /// The target, present only while revealed.
    pub target: Option<Pitch>,
    /// Last scored guess of the current round.
    pub feedback: Option<GuessOutcome>,
    /// Whether the on-screen keys accept guesses.
    pub keys_enabled: bool,
}

/// Receives a snapshot after every state transition.
pub trait Observer {
    fn transition(&mut self, snapshot: &Snapshot);
}

impl<F> Observer for F
where
    F: FnMut(&Snapshot),
{
    fn transition(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}
