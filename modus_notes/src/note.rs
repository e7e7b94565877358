// Spelled notes: a natural letter plus a signed alteration.
//
// A `Note` is a pitch class with a spelling. `C#` and `Db` sound the same
// but are different notes here, because scale spelling cares about which
// letter a degree lands on. Positive alterations are sharps, negative ones
// flats; `C##` is C with alteration +2.
//
// Notes are written and parsed in plain ASCII: `#` for sharp, `b` for flat,
// and `x` accepted on input as a double sharp. Serde uses the same text
// form, so a note is a JSON string like `"Eb"`.

use crate::letter::NaturalLetter;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest number of sharps or flats a parsed note may carry.
pub const MAX_ALTERATION: i8 = 3;

/// Errors from parsing note text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteParseError {
    #[error("empty note name")]
    Empty,
    #[error("unknown note letter '{0}'")]
    UnknownLetter(char),
    #[error("unexpected accidental '{0}'")]
    UnknownAccidental(char),
    #[error("cannot mix sharps and flats in '{0}'")]
    MixedAccidentals(String),
    #[error("too many accidentals in '{0}' (max {MAX_ALTERATION})")]
    TooManyAccidentals(String),
}

/// A spelled note without octave information.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    letter: NaturalLetter,
    alteration: i8,
}

impl Note {
    pub const fn new(letter: NaturalLetter, alteration: i8) -> Self {
        Self { letter, alteration }
    }

    /// The unaltered note for `letter`.
    pub const fn natural(letter: NaturalLetter) -> Self {
        Self::new(letter, 0)
    }

    /// The natural letter this note is spelled on.
    pub fn letter(self) -> NaturalLetter {
        self.letter
    }

    /// Signed accidental count: +1 per sharp, -1 per flat.
    pub fn alteration(self) -> i8 {
        self.alteration
    }

    pub fn is_natural(self) -> bool {
        self.alteration == 0
    }

    /// Semitones above C, in 0..12.
    pub fn pitch_class(self) -> u8 {
        (self.letter.pitch_class() as i32 + self.alteration as i32).rem_euclid(12) as u8
    }

    /// The same letter raised one semitone.
    pub fn sharpened(self) -> Self {
        self.altered(1)
    }

    /// The same letter lowered one semitone.
    pub fn flattened(self) -> Self {
        self.altered(-1)
    }

    /// The same letter moved `semitones` up (positive) or down (negative).
    pub fn altered(self, semitones: i8) -> Self {
        Self::new(self.letter, self.alteration + semitones)
    }

    /// True if both notes share a pitch class regardless of spelling.
    pub fn is_enharmonic_to(self, other: Note) -> bool {
        self.pitch_class() == other.pitch_class()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.alteration >= 0 { "#" } else { "b" };
        let accidentals = sign.repeat(self.alteration.unsigned_abs() as usize);
        f.pad(&format!("{}{}", self.letter, accidentals))
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Note({})", self)
    }
}

impl FromStr for Note {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let first = chars.next().ok_or(NoteParseError::Empty)?;
        let letter = NaturalLetter::from_char(first).ok_or(NoteParseError::UnknownLetter(first))?;

        let mut sharps: i8 = 0;
        let mut flats: i8 = 0;
        for c in chars {
            match c {
                '#' => sharps += 1,
                'x' | 'X' => sharps += 2,
                'b' => flats += 1,
                other => return Err(NoteParseError::UnknownAccidental(other)),
            }
            if sharps > MAX_ALTERATION || flats > MAX_ALTERATION {
                return Err(NoteParseError::TooManyAccidentals(s.to_string()));
            }
        }
        if sharps > 0 && flats > 0 {
            return Err(NoteParseError::MixedAccidentals(s.to_string()));
        }

        Ok(Self::new(letter, sharps - flats))
    }
}

impl From<NaturalLetter> for Note {
    fn from(letter: NaturalLetter) -> Self {
        Self::natural(letter)
    }
}

// Serialize as the spelled text so notes read naturally in JSON output.
impl Serialize for Note {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
