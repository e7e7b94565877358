// Error type for mode construction.
//
// Every fallible operation in this crate returns `Result<T, ModeError>`.
// Nothing is retried: a template or note that fails here fails the whole
// build, and a mode is either returned complete or not at all.

use modus_notes::IntervalDegree;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModeError>;

#[derive(Debug, Error)]
pub enum ModeError {
    /// The template is empty, has a zero step, or does not span one octave.
    #[error("invalid mode template: {0}")]
    InvalidTemplate(String),

    /// No correct spelling exists for the requested build.
    #[error("unresolvable spelling: {0}")]
    UnresolvableSpelling(String),

    /// An interval deviates further from the major reference than any named
    /// characteristic covers.
    #[error(
        "no characteristic for a {interval} that is {diff:+} semitones off major (degree {degree})"
    )]
    UnknownDegreeCharacteristic {
        degree: u8,
        interval: IntervalDegree,
        diff: i32,
    },

    /// A degree graph operation found links it cannot work with.
    #[error("degree graph invariant violated: {0}")]
    StructuralInvariantViolation(String),

    /// A spelling-circle walk outside 0..12 semitones.
    #[error("invalid step count {0}: must be within 0..12")]
    InvalidStepCount(i32),

    #[error("no mode named '{0}'")]
    UnknownMode(String),

    #[error("malformed mode catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

impl ModeError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        Self::StructuralInvariantViolation(message.into())
    }
}
