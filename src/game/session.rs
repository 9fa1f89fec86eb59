use serde::{Deserialize, Serialize};

use crate::game::profile::Difficulty;
use crate::sequencing::pitch::Pitch;

/// One scored round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round: u32,
    pub target: Pitch,
    pub guessed: Pitch,
    pub correct: bool,
}

/// A finished game, as handed to the scoreboard.
///
/// Only games that ran through their last round produce one; exiting early
/// finalizes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub player: String,
    pub difficulty: Difficulty,
    pub score: u32,
    pub total_rounds: u32,
    pub rounds: Vec<RoundOutcome>,
}

/// Consumer of finished sessions (percentages, persistence, ranking).
pub trait Scoreboard {
    fn finalize_session(&mut self, session: &SessionSummary);
}

impl<F> Scoreboard for F
where
    F: FnMut(&SessionSummary),
{
    fn finalize_session(&mut self, session: &SessionSummary) {
        self(session)
    }
}

/// Scoreboard that drops every session.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScoreboard;

impl Scoreboard for NoScoreboard {
    fn finalize_session(&mut self, _session: &SessionSummary) {}
}
