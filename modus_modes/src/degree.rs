// Degrees and their modal annotations.
//
// A `Degree` is one position of a mode: its 1-based number, the spelled
// note on it, and how far above the root it sits. Degrees are stored in a
// `DegreeGraph` arena (see graph.rs) and linked by `DegreeId` indices.
//
// Annotation (see characteristic.rs) adds two things to each degree of a
// seven-step mode:
// - `ModalCharacteristic`s: the quality of the interval reaching this degree
//   from each other degree, with a signed weight per quality.
// - `ModalPosition`: the sum of those weights and a Low/Neutral/High label.
//
// The label convention is inverted on purpose: a negative sum is `High`,
// a positive sum is `Low`. Sorting and display both read it that way.

use modus_notes::{IntervalDegree, Note};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a degree inside its `DegreeGraph`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DegreeId(pub u32);

impl DegreeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DegreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DegreeId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Characteristics
// ---------------------------------------------------------------------------

/// Interval quality relative to the major-scale reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacteristicName {
    ThreeTimesDiminished,
    TwiceDiminished,
    Diminished,
    Minor,
    Clean,
    Major,
    Augmented,
    TwiceAugmented,
    ThreeTimesAugmented,
}

impl CharacteristicName {
    /// Quality of an interval `diff` semitones away from the major-scale
    /// size for `interval`. `None` outside the named range.
    pub fn classify(interval: IntervalDegree, diff: i32) -> Option<Self> {
        use CharacteristicName::*;
        if interval.is_perfect() {
            match diff {
                -3 => Some(ThreeTimesDiminished),
                -2 => Some(TwiceDiminished),
                -1 => Some(Diminished),
                0 => Some(Clean),
                1 => Some(Augmented),
                2 => Some(TwiceAugmented),
                3 => Some(ThreeTimesAugmented),
                _ => None,
            }
        } else {
            match diff {
                -3 => Some(TwiceDiminished),
                -2 => Some(Diminished),
                -1 => Some(Minor),
                0 => Some(Major),
                1 => Some(Augmented),
                2 => Some(TwiceAugmented),
                _ => None,
            }
        }
    }

    /// Signed weight contributed to a degree's absolute modal position.
    pub fn weight(self) -> i32 {
        match self {
            CharacteristicName::ThreeTimesDiminished => -4,
            CharacteristicName::TwiceDiminished => -3,
            CharacteristicName::Diminished => -2,
            CharacteristicName::Minor => -1,
            CharacteristicName::Clean => 0,
            CharacteristicName::Major => 1,
            CharacteristicName::Augmented => 2,
            CharacteristicName::TwiceAugmented => 3,
            CharacteristicName::ThreeTimesAugmented => 4,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            CharacteristicName::ThreeTimesDiminished => "3xDim",
            CharacteristicName::TwiceDiminished => "2xDim",
            CharacteristicName::Diminished => "Dim",
            CharacteristicName::Minor => "Minor",
            CharacteristicName::Clean => "Clean",
            CharacteristicName::Major => "Major",
            CharacteristicName::Augmented => "Aug",
            CharacteristicName::TwiceAugmented => "2xAug",
            CharacteristicName::ThreeTimesAugmented => "3xAug",
        }
    }
}

impl fmt::Display for CharacteristicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// The interval quality reaching a degree from one other degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalCharacteristic {
    pub name: CharacteristicName,
    /// Number of the degree the interval was measured from.
    pub against: u8,
    /// Interval size from `against` up to the owning degree.
    pub interval: IntervalDegree,
    /// `name.weight()`, stored so sums never need the table again.
    pub relative_weight: i32,
}

impl ModalCharacteristic {
    pub fn new(name: CharacteristicName, against: u8, interval: IntervalDegree) -> Self {
        Self {
            name,
            against,
            interval,
            relative_weight: name.weight(),
        }
    }
}

// ---------------------------------------------------------------------------
// Absolute position
// ---------------------------------------------------------------------------

/// Qualitative reading of a position weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModalPositionName {
    Low,
    Neutral,
    High,
}

/// A degree's aggregate modal weight. Only the ordering of weights is
/// meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalPosition {
    pub name: ModalPositionName,
    pub weight: i32,
}

impl ModalPosition {
    /// Negative weights read `High`, positive ones `Low`.
    pub fn from_weight(weight: i32) -> Self {
        let name = match weight.signum() {
            -1 => ModalPositionName::High,
            0 => ModalPositionName::Neutral,
            _ => ModalPositionName::Low,
        };
        Self { name, weight }
    }

    /// Sum of the characteristics' weights.
    pub fn from_characteristics(characteristics: &[ModalCharacteristic]) -> Self {
        Self::from_weight(characteristics.iter().map(|c| c.relative_weight).sum())
    }
}

impl fmt::Display for ModalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({:+})", self.name, self.weight)
    }
}

// ---------------------------------------------------------------------------
// Degree
// ---------------------------------------------------------------------------

/// One position of a mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degree {
    pub number: u8,
    pub halftones_from_prime: u8,
    pub note: Note,
    pub previous: Option<DegreeId>,
    pub next: Option<DegreeId>,
    /// Intervals arriving at this degree: one per other degree, measured
    /// from that degree (`against`) up to this one.
    pub modal_characteristics: Vec<ModalCharacteristic>,
    pub absolute_modal_position: Option<ModalPosition>,
}

impl Degree {
    /// A fresh, unlinked, unannotated degree.
    pub fn new(number: u8, halftones_from_prime: u8, note: Note) -> Self {
        Self {
            number,
            halftones_from_prime,
            note,
            previous: None,
            next: None,
            modal_characteristics: Vec::new(),
            absolute_modal_position: None,
        }
    }

    /// Copy of this degree's content with both links cleared.
    pub fn detached(&self) -> Self {
        Self {
            previous: None,
            next: None,
            ..self.clone()
        }
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn halftones_from_prime(&self) -> u8 {
        self.halftones_from_prime
    }

    pub fn note(&self) -> Note {
        self.note
    }

    pub fn modal_characteristics(&self) -> &[ModalCharacteristic] {
        &self.modal_characteristics
    }

    pub fn absolute_modal_position(&self) -> Option<ModalPosition> {
        self.absolute_modal_position
    }

    /// Same notes, numbers, halftones and annotations; links are ignored.
    pub fn same_content(&self, other: &Degree) -> bool {
        self.number == other.number
            && self.halftones_from_prime == other.halftones_from_prime
            && self.note == other.note
            && self.modal_characteristics == other.modal_characteristics
            && self.absolute_modal_position == other.absolute_modal_position
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (+{})", self.number, self.note, self.halftones_from_prime)?;
        if let Some(position) = self.absolute_modal_position {
            write!(f, " {position}")?;
        }
        Ok(())
    }
}
