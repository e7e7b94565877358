// Modus mode engine.
//
// Builds musical modes from semitone step templates: every degree gets a
// correctly spelled note (one letter per degree, sharps and flats chosen to
// fit), the degrees are linked into a circle, and seven-step modes are
// annotated with interval characteristics and an absolute modal position
// that orders degrees from "high" (flat-leaning) to "low" (sharp-leaning).
//
// Architecture:
// - template.rs: `ModeTemplate` (validated step list) and `ModeKind` (named modes)
// - spelling.rs: 12-slot spelling circle, letter cycle, lazy `SpellingResolver`
// - degree.rs: `Degree`, `DegreeId`, characteristics and modal positions
// - graph.rs: `DegreeGraph` arena with linked-chain operations (attach,
//   insert, close/open, rounds, reverse, weight sort)
// - characteristic.rs: relative + absolute modal position calculation
// - builder.rs: `ModeBuilder` state machine and `build_mode`
// - mode.rs: `Mode`, the finished product and its query API
// - catalog.rs: `ModeCatalog`, JSON-loadable named templates
// - error.rs: `ModeError`
//
// Note vocabulary (letters, notes, interval sizes) lives in `modus_notes`
// and is re-exported here. `main.rs` is the `modes` command-line front end.
//
// Builds are deterministic: the same template and root always produce the
// same spellings, links and weights.

pub mod builder;
pub mod catalog;
pub mod characteristic;
pub mod degree;
pub mod error;
pub mod graph;
pub mod mode;
pub mod spelling;
pub mod template;

pub use builder::{BuildStage, ModeBuilder, build_mode};
pub use catalog::{CatalogEntry, ModeCatalog, default_catalog};
pub use degree::{
    CharacteristicName, Degree, DegreeId, ModalCharacteristic, ModalPosition, ModalPositionName,
};
pub use error::{ModeError, Result};
pub use graph::{DegreeGraph, Direction};
pub use mode::Mode;
pub use spelling::{NoteSpellingCircle, SpellingResolver};
pub use template::{ModeKind, ModeTemplate};

pub use modus_notes::{IntervalDegree, NaturalLetter, Note, NoteParseError};
