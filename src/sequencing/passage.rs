//! Reference passages played before each guess.

use serde::{Deserialize, Serialize};

use super::pitch::Pitch;

const TRIAD: [Pitch; 5] = [Pitch::C, Pitch::E, Pitch::G, Pitch::E, Pitch::C];
const SCALE: [Pitch; 7] = Pitch::ALL;

/// Which reference passage a round opens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Passage {
    /// C major triad up and back down: C E G E C
    Triad,
    /// C major scale ascending: C D E F G A B
    Scale,
}

impl Passage {
    /// The pitches of the passage, in playing order.
    pub fn pitches(self) -> &'static [Pitch] {
        match self {
            Passage::Triad => &TRIAD,
            Passage::Scale => &SCALE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Passage::Triad => "triad",
            Passage::Scale => "scale",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triad_returns_to_root() {
        let notes = Passage::Triad.pitches();
        assert_eq!(notes.first(), Some(&Pitch::C));
        assert_eq!(notes.last(), Some(&Pitch::C));
        assert_eq!(notes.len(), 5);
    }

    #[test]
    fn scale_covers_every_pitch_once() {
        assert_eq!(Passage::Scale.pitches(), &Pitch::ALL);
    }
}
