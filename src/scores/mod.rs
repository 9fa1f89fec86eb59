//! High-score table: the scoreboard behind finished games.
//!
//! Records are ranked by percentage (highest first), then by difficulty
//! (hardest first), then by age (earliest first), and only the top entries
//! are kept. The table lives as one JSON array under [`HIGH_SCORES_KEY`] in
//! a [`KeyValueStore`].

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ScoreResult;
use crate::game::{
    profile::Difficulty,
    session::{Scoreboard, SessionSummary},
};

pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

pub const HIGH_SCORES_KEY: &str = "high_scores";
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player: String,
    pub difficulty: Difficulty,
    pub score: u32,
    pub total_rounds: u32,
    pub percentage: u32,
    pub recorded_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn from_session(session: &SessionSummary, recorded_at: DateTime<Utc>) -> Self {
        Self {
            player: session.player.clone(),
            difficulty: session.difficulty,
            score: session.score,
            total_rounds: session.total_rounds,
            percentage: percentage(session.score, session.total_rounds),
            recorded_at,
        }
    }
}

/// `score / total` as a rounded whole percentage. Zero rounds score 0%.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(score) * 100.0 / f64::from(total)).round() as u32
}

fn rank(records: &mut [ScoreRecord]) {
    records.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then_with(|| b.difficulty.cmp(&a.difficulty))
            .then_with(|| a.recorded_at.cmp(&b.recorded_at))
    });
}

pub struct HighScores<S: KeyValueStore> {
    store: S,
    capacity: usize,
}

impl<S: KeyValueStore> HighScores<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Keep at most `capacity` records.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Ranked records, best first.
    pub fn records(&self) -> ScoreResult<Vec<ScoreRecord>> {
        match self.store.get(HIGH_SCORES_KEY)? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Vec::new()),
        }
    }

    /// Add a finished session and persist the re-ranked table.
    pub fn record(
        &mut self,
        session: &SessionSummary,
        recorded_at: DateTime<Utc>,
    ) -> ScoreResult<Vec<ScoreRecord>> {
        let mut records = self.records()?;
        records.push(ScoreRecord::from_session(session, recorded_at));
        rank(&mut records);
        records.truncate(self.capacity);

        self.store
            .set(HIGH_SCORES_KEY, serde_json::to_string(&records)?)?;
        Ok(records)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> Scoreboard for HighScores<S> {
    fn finalize_session(&mut self, session: &SessionSummary) {
        match self.record(session, Utc::now()) {
            Ok(records) => info!(
                player = %session.player,
                percentage = percentage(session.score, session.total_rounds),
                entries = records.len(),
                "score recorded"
            ),
            Err(err) => warn!(%err, "failed to record score"),
        }
    }
}
