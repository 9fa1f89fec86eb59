/*
Pitches
=======

The game works on the seven natural notes of the octave starting at middle C.
Each pitch maps to a fixed fundamental in Hz (equal temperament, A4 = 440 Hz):

  C4 261.63   D4 293.66   E4 329.63   F4 349.23
  G4 392.00   A4 440.00   B4 493.88

The set is closed: nothing in the game ever needs a sharp, a flat, or another
octave, so a plain enum is enough and lets the compiler check every match.
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownPitch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pitch {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Pitch {
    /// All pitches in ascending order.
    pub const ALL: [Pitch; 7] = [
        Pitch::C,
        Pitch::D,
        Pitch::E,
        Pitch::F,
        Pitch::G,
        Pitch::A,
        Pitch::B,
    ];

    /// Fundamental frequency in Hz.
    pub fn frequency(self) -> f32 {
        match self {
            Pitch::C => 261.63,
            Pitch::D => 293.66,
            Pitch::E => 329.63,
            Pitch::F => 349.23,
            Pitch::G => 392.00,
            Pitch::A => 440.00,
            Pitch::B => 493.88,
        }
    }

    /// Letter name, e.g. `"C"`.
    pub fn name(self) -> &'static str {
        match self {
            Pitch::C => "C",
            Pitch::D => "D",
            Pitch::E => "E",
            Pitch::F => "F",
            Pitch::G => "G",
            Pitch::A => "A",
            Pitch::B => "B",
        }
    }

    /// Position in the octave, 0 for C through 6 for B.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a pitch by its letter (either case).
    pub fn from_letter(letter: char) -> Option<Pitch> {
        match letter.to_ascii_uppercase() {
            'C' => Some(Pitch::C),
            'D' => Some(Pitch::D),
            'E' => Some(Pitch::E),
            'F' => Some(Pitch::F),
            'G' => Some(Pitch::G),
            'A' => Some(Pitch::A),
            'B' => Some(Pitch::B),
            _ => None,
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pitch {
    type Err = UnknownPitch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Pitch::from_letter(letter).ok_or_else(|| UnknownPitch(s.into())),
            _ => Err(UnknownPitch(s.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequencies_ascend() {
        for pair in Pitch::ALL.windows(2) {
            assert!(
                pair[0].frequency() < pair[1].frequency(),
                "{} should sit below {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn a_is_concert_pitch() {
        assert_eq!(Pitch::A.frequency(), 440.0);
    }

    #[test]
    fn parses_letters() {
        assert_eq!("g".parse::<Pitch>(), Ok(Pitch::G));
        assert_eq!(" B ".parse::<Pitch>(), Ok(Pitch::B));
        assert!("H".parse::<Pitch>().is_err());
        assert!("CD".parse::<Pitch>().is_err());
    }

    #[test]
    fn index_matches_order() {
        for (i, pitch) in Pitch::ALL.iter().enumerate() {
            assert_eq!(pitch.index(), i);
        }
    }
}
