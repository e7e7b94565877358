// Diatonic interval degrees measured against the major scale.
//
// The major scale is the yardstick for interval quality: a third of four
// semitones is "major" because that is what the major scale puts on its
// third degree. `IntervalDegree` names the eight positions from prime to
// octave and knows how many semitones the major scale places there, and
// whether the position is a perfect one (prime, fourth, fifth, octave) or
// an imperfect one (second, third, sixth, seventh).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semitone steps of the major scale, degree to degree.
pub const MAJOR_SCALE_STEPS: [u8; 7] = [2, 2, 1, 2, 2, 2, 1];

/// A generic interval size: the number of letter steps plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntervalDegree {
    Prime,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Octave,
}

impl IntervalDegree {
    pub const ALL: [IntervalDegree; 8] = [
        IntervalDegree::Prime,
        IntervalDegree::Second,
        IntervalDegree::Third,
        IntervalDegree::Fourth,
        IntervalDegree::Fifth,
        IntervalDegree::Sixth,
        IntervalDegree::Seventh,
        IntervalDegree::Octave,
    ];

    /// Interval spanning `steps` letter steps (0 = prime, 7 = octave).
    pub fn from_steps(steps: usize) -> Option<Self> {
        Self::ALL.get(steps).copied()
    }

    /// Letter steps spanned by this interval.
    pub fn steps(self) -> usize {
        self as usize
    }

    /// Semitones the major scale places at this degree above its root.
    pub fn major_halftones(self) -> u8 {
        MAJOR_SCALE_STEPS[..self.steps()].iter().sum()
    }

    /// Prime, fourth, fifth and octave are perfect; the rest come in
    /// major/minor pairs.
    pub fn is_perfect(self) -> bool {
        matches!(
            self,
            IntervalDegree::Prime
                | IntervalDegree::Fourth
                | IntervalDegree::Fifth
                | IntervalDegree::Octave
        )
    }

    /// Ordinal label ("1st", "2nd", ...).
    pub fn ordinal(self) -> &'static str {
        match self {
            IntervalDegree::Prime => "1st",
            IntervalDegree::Second => "2nd",
            IntervalDegree::Third => "3rd",
            IntervalDegree::Fourth => "4th",
            IntervalDegree::Fifth => "5th",
            IntervalDegree::Sixth => "6th",
            IntervalDegree::Seventh => "7th",
            IntervalDegree::Octave => "8th",
        }
    }
}

impl fmt::Display for IntervalDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ordinal())
    }
}
