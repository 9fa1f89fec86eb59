//! The ear-training game: profiles, the round state machine, and the seams
//! it talks to (observers for rendering, a scoreboard for finished games).

pub mod machine;
pub mod profile;
pub mod session;
pub mod snapshot;

pub use machine::{Game, Timing};
pub use profile::{Difficulty, Profile};
pub use session::{NoScoreboard, RoundOutcome, Scoreboard, SessionSummary};
pub use snapshot::{GuessOutcome, Observer, Phase, Snapshot};
