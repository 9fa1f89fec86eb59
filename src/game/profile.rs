//! Difficulty profiles.
//!
//! | label  | usable pitches | reference | rounds |
//! |--------|----------------|-----------|--------|
//! | easy   | C E G          | triad     | 5      |
//! | medium | all seven      | scale     | 7      |
//! | hard   | all seven      | triad     | 10     |
//!
//! Hard plays the triad rather than the scale: the player gets less context
//! for more candidate notes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownDifficulty;
use crate::sequencing::{passage::Passage, pitch::Pitch};

const EASY_PITCHES: [Pitch; 3] = [Pitch::C, Pitch::E, Pitch::G];

/// Profile label. Ordered easy < medium < hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn profile(self) -> Profile {
        Profile::for_difficulty(self)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(s.into())),
        }
    }
}

/// Everything a difficulty decides about a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub difficulty: Difficulty,
    usable: &'static [Pitch],
    pub passage: Passage,
    pub total_rounds: u32,
}

impl Profile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                usable: &EASY_PITCHES,
                passage: Passage::Triad,
                total_rounds: 5,
            },
            Difficulty::Medium => Self {
                difficulty,
                usable: &Pitch::ALL,
                passage: Passage::Scale,
                total_rounds: 7,
            },
            Difficulty::Hard => Self {
                difficulty,
                usable: &Pitch::ALL,
                passage: Passage::Triad,
                total_rounds: 10,
            },
        }
    }

    /// Pitches a target may be drawn from, ascending.
    pub fn usable(&self) -> &'static [Pitch] {
        self.usable
    }

    pub fn is_usable(&self, pitch: Pitch) -> bool {
        self.usable.contains(&pitch)
    }

    pub fn label(&self) -> &'static str {
        self.difficulty.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passage_is_subset_of_usable_pitches() {
        for difficulty in Difficulty::ALL {
            let profile = difficulty.profile();
            for pitch in profile.passage.pitches() {
                assert!(
                    profile.is_usable(*pitch),
                    "{difficulty}: passage note {pitch} is not usable"
                );
            }
        }
    }

    #[test]
    fn documented_profiles() {
        let easy = Difficulty::Easy.profile();
        assert_eq!(easy.usable(), &[Pitch::C, Pitch::E, Pitch::G]);
        assert_eq!(easy.passage, Passage::Triad);
        assert_eq!(easy.total_rounds, 5);

        let hard = Difficulty::Hard.profile();
        assert_eq!(hard.usable().len(), 7);
        assert_eq!(hard.total_rounds, 10);
    }

    #[test]
    fn difficulty_ordering() {
        assert!(Difficulty::Hard > Difficulty::Medium);
        assert!(Difficulty::Medium > Difficulty::Easy);
    }

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(
            "expert".parse::<Difficulty>(),
            Err(UnknownDifficulty("expert".into()))
        );
    }
}
