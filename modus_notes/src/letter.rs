// The seven natural note letters.
//
// `NaturalLetter` is the letter-name half of a spelled note: C D E F G A B,
// wrapping from B back to C. Scale spelling walks these letters one step per
// degree, so `next()`/`previous()` wrap around the ring rather than stopping
// at the ends.
//
// Pitch classes are measured in semitones above C (C = 0 ... B = 11).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A natural (unaltered) note letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NaturalLetter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NaturalLetter {
    /// All letters in ascending order starting from C.
    pub const ALL: [NaturalLetter; 7] = [
        NaturalLetter::C,
        NaturalLetter::D,
        NaturalLetter::E,
        NaturalLetter::F,
        NaturalLetter::G,
        NaturalLetter::A,
        NaturalLetter::B,
    ];

    /// Position in the C..B ring (C = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Letter at `index` positions above C, wrapping every seven.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 7]
    }

    /// The next letter up, wrapping B -> C.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The next letter down, wrapping C -> B.
    pub fn previous(self) -> Self {
        Self::from_index(self.index() + 6)
    }

    /// Semitones above C of the unaltered letter.
    pub fn pitch_class(self) -> u8 {
        match self {
            NaturalLetter::C => 0,
            NaturalLetter::D => 2,
            NaturalLetter::E => 4,
            NaturalLetter::F => 5,
            NaturalLetter::G => 7,
            NaturalLetter::A => 9,
            NaturalLetter::B => 11,
        }
    }

    /// Parse a single letter, case-insensitive.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(NaturalLetter::C),
            'D' => Some(NaturalLetter::D),
            'E' => Some(NaturalLetter::E),
            'F' => Some(NaturalLetter::F),
            'G' => Some(NaturalLetter::G),
            'A' => Some(NaturalLetter::A),
            'B' => Some(NaturalLetter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            NaturalLetter::C => 'C',
            NaturalLetter::D => 'D',
            NaturalLetter::E => 'E',
            NaturalLetter::F => 'F',
            NaturalLetter::G => 'G',
            NaturalLetter::A => 'A',
            NaturalLetter::B => 'B',
        }
    }
}

impl fmt::Display for NaturalLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
