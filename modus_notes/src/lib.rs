// Note vocabulary shared by the modus crates.
//
// Provides the small, static building blocks the mode engine spells scales
// with. Nothing here knows about modes or degrees.
//
// Architecture:
// - `letter.rs`:   `NaturalLetter` — the seven-letter ring C..B
// - `note.rs`:     `Note` — letter plus signed alteration, text parsing, serde
// - `interval.rs`: `IntervalDegree` — prime..octave with major-scale halftones
//
// All types are `Copy` and carry no hidden state; two calls with the same
// input always produce the same output.

pub mod interval;
pub mod letter;
pub mod note;

// Re-export key types at crate root for convenience.
pub use interval::{IntervalDegree, MAJOR_SCALE_STEPS};
pub use letter::NaturalLetter;
pub use note::{MAX_ALTERATION, Note, NoteParseError};
