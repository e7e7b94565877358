// Mode templates: the semitone step patterns that define a mode's shape.
//
// A template is the sequence of semitone steps from one degree to the next,
// wrapping back to the root after the last step. Ionian is
// `[2, 2, 1, 2, 2, 2, 1]`. A valid template has at least one step, no zero
// steps, and steps summing to exactly twelve (one octave).
//
// This module provides:
// - `ModeTemplate`: a validated step sequence, with rotation and cumulative
//   halftone helpers used by the characteristic calculator
// - `ModeKind`: the named modes this crate knows, each with its template
//
// Used by builder.rs (spelling + graph construction), characteristic.rs
// (rotation), and catalog.rs (named lookup and JSON loading).

use crate::error::{ModeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semitones in one octave; every template's steps add up to this.
pub const OCTAVE_HALFTONES: u32 = 12;

/// The largest template the spelling resolver can assign letters to.
pub const MAX_SPELLED_DEGREES: usize = 7;

/// A validated sequence of semitone steps spanning one octave.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct ModeTemplate {
    steps: Vec<u8>,
}

impl ModeTemplate {
    /// Build a template, rejecting anything `validate_steps` rejects.
    pub fn new(steps: impl Into<Vec<u8>>) -> Result<Self> {
        let steps = steps.into();
        validate_steps(&steps)?;
        Ok(Self { steps })
    }

    /// Re-check the template invariants.
    ///
    /// Always `Ok` for a template obtained through `new`; kept as an
    /// explicit operation so callers holding a deserialized or hand-built
    /// template can assert validity before building.
    pub fn validate(&self) -> Result<()> {
        validate_steps(&self.steps)
    }

    pub fn steps(&self) -> &[u8] {
        &self.steps
    }

    /// Number of degrees the template produces.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Seven-step templates are the only ones that get modal annotation.
    pub fn is_heptatonic(&self) -> bool {
        self.steps.len() == 7
    }

    /// The step pattern as seen from degree `degree_number` (1-based).
    ///
    /// `rotated(1)` is the template itself; `rotated(2)` of Ionian is
    /// Dorian. Numbers wrap, so `rotated(len + 1) == rotated(1)`.
    pub fn rotated(&self, degree_number: usize) -> Vec<u8> {
        if self.steps.is_empty() {
            return Vec::new();
        }
        let start = degree_number.saturating_sub(1) % self.steps.len();
        let mut rotated = Vec::with_capacity(self.steps.len());
        rotated.extend_from_slice(&self.steps[start..]);
        rotated.extend_from_slice(&self.steps[..start]);
        rotated
    }

    /// Cumulative halftones of each degree above the root, starting at 0.
    pub fn halftones(&self) -> Vec<u8> {
        cumulative_halftones(&self.steps)
    }
}

/// Cumulative sums of `steps`, starting at 0 and excluding the final octave.
pub fn cumulative_halftones(steps: &[u8]) -> Vec<u8> {
    let mut total = 0u8;
    let mut out = Vec::with_capacity(steps.len());
    for &step in steps {
        out.push(total);
        total = total.saturating_add(step);
    }
    out
}

fn validate_steps(steps: &[u8]) -> Result<()> {
    if steps.is_empty() {
        return Err(ModeError::InvalidTemplate("template has no steps".into()));
    }
    if let Some(pos) = steps.iter().position(|&s| s == 0) {
        return Err(ModeError::InvalidTemplate(format!(
            "step {} is zero",
            pos + 1
        )));
    }
    let sum: u32 = steps.iter().map(|&s| s as u32).sum();
    if sum != OCTAVE_HALFTONES {
        return Err(ModeError::InvalidTemplate(format!(
            "steps sum to {sum}, expected {OCTAVE_HALFTONES}"
        )));
    }
    Ok(())
}

impl TryFrom<Vec<u8>> for ModeTemplate {
    type Error = ModeError;

    fn try_from(steps: Vec<u8>) -> Result<Self> {
        Self::new(steps)
    }
}

impl From<ModeTemplate> for Vec<u8> {
    fn from(template: ModeTemplate) -> Self {
        template.steps
    }
}

impl fmt::Display for ModeTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.steps.iter().map(|s| s.to_string()).collect();
        write!(f, "{{{}}}", parts.join(","))
    }
}

// ---------------------------------------------------------------------------
// Named modes
// ---------------------------------------------------------------------------

/// The modes this crate ships templates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeKind {
    /// C D E F G A B  (major scale)
    Ionian,
    /// D E F G A B C  (natural minor with raised 6th)
    Dorian,
    /// E F G A B C D  (half-step from 1 to 2)
    Phrygian,
    /// F G A B C D E  (raised 4th, the brightest diatonic mode)
    Lydian,
    /// G A B C D E F  (major with lowered 7th)
    Mixolydian,
    /// A B C D E F G  (natural minor)
    Aeolian,
    /// B C D E F G A  (diminished 5th, the darkest diatonic mode)
    Locrian,
    /// Natural minor with raised 6th and 7th (ascending form).
    MelodicMinor,
    /// Natural minor with raised 7th.
    HarmonicMinor,
    /// Seventh mode of melodic minor, a.k.a. the altered scale.
    SuperLocrian,
    MajorPentatonic,
    MinorPentatonic,
}

impl ModeKind {
    pub const ALL: [ModeKind; 12] = [
        ModeKind::Ionian,
        ModeKind::Dorian,
        ModeKind::Phrygian,
        ModeKind::Lydian,
        ModeKind::Mixolydian,
        ModeKind::Aeolian,
        ModeKind::Locrian,
        ModeKind::MelodicMinor,
        ModeKind::HarmonicMinor,
        ModeKind::SuperLocrian,
        ModeKind::MajorPentatonic,
        ModeKind::MinorPentatonic,
    ];

    /// Semitone steps from each degree to the next.
    pub fn steps(self) -> &'static [u8] {
        match self {
            ModeKind::Ionian => &[2, 2, 1, 2, 2, 2, 1],
            ModeKind::Dorian => &[2, 1, 2, 2, 2, 1, 2],
            ModeKind::Phrygian => &[1, 2, 2, 2, 1, 2, 2],
            ModeKind::Lydian => &[2, 2, 2, 1, 2, 2, 1],
            ModeKind::Mixolydian => &[2, 2, 1, 2, 2, 1, 2],
            ModeKind::Aeolian => &[2, 1, 2, 2, 1, 2, 2],
            ModeKind::Locrian => &[1, 2, 2, 1, 2, 2, 2],
            ModeKind::MelodicMinor => &[2, 1, 2, 2, 2, 2, 1],
            ModeKind::HarmonicMinor => &[2, 1, 2, 2, 1, 3, 1],
            ModeKind::SuperLocrian => &[1, 2, 1, 2, 2, 2, 2],
            ModeKind::MajorPentatonic => &[2, 2, 3, 2, 3],
            ModeKind::MinorPentatonic => &[3, 2, 2, 3, 2],
        }
    }

    /// The validated template for this mode.
    pub fn template(self) -> ModeTemplate {
        // Built-in step tables are covered by test_builtin_templates_are_valid.
        ModeTemplate {
            steps: self.steps().to_vec(),
        }
    }

    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            ModeKind::Ionian => "ionian",
            ModeKind::Dorian => "dorian",
            ModeKind::Phrygian => "phrygian",
            ModeKind::Lydian => "lydian",
            ModeKind::Mixolydian => "mixolydian",
            ModeKind::Aeolian => "aeolian",
            ModeKind::Locrian => "locrian",
            ModeKind::MelodicMinor => "melodic minor",
            ModeKind::HarmonicMinor => "harmonic minor",
            ModeKind::SuperLocrian => "super locrian",
            ModeKind::MajorPentatonic => "major pentatonic",
            ModeKind::MinorPentatonic => "minor pentatonic",
        }
    }

    /// Alternative names accepted by `from_name`.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ModeKind::Ionian => &["major"],
            ModeKind::Aeolian => &["minor", "natural minor"],
            ModeKind::SuperLocrian => &["altered", "superlocrian", "super-locrian"],
            ModeKind::MelodicMinor => &["jazz minor"],
            ModeKind::MajorPentatonic => &["pentatonic"],
            _ => &[],
        }
    }

    /// Look a mode up by name or alias, ignoring case and surrounding space.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|kind| {
            kind.name() == wanted || kind.aliases().iter().any(|alias| *alias == wanted)
        })
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sum() {
        assert!(matches!(
            ModeTemplate::new(vec![1, 2, 3, 5, 2]),
            Err(ModeError::InvalidTemplate(_))
        ));
        assert!(ModeTemplate::new(vec![1, 2, 3, 5, 1]).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_and_zero() {
        assert!(matches!(
            ModeTemplate::new(Vec::<u8>::new()),
            Err(ModeError::InvalidTemplate(_))
        ));
        assert!(matches!(
            ModeTemplate::new(vec![2, 0, 10]),
            Err(ModeError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_single_step_octave_is_valid() {
        let t = ModeTemplate::new(vec![12]).unwrap();
        assert_eq!(t.len(), 1);
        assert!(!t.is_heptatonic());
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_builtin_templates_are_valid() {
        for kind in ModeKind::ALL {
            assert!(
                ModeTemplate::new(kind.steps()).is_ok(),
                "{kind} has an invalid step table"
            );
        }
    }

    #[test]
    fn test_rotation_walks_the_diatonic_modes() {
        let ionian = ModeKind::Ionian.template();
        assert_eq!(ionian.rotated(1), ModeKind::Ionian.steps());
        assert_eq!(ionian.rotated(2), ModeKind::Dorian.steps());
        assert_eq!(ionian.rotated(4), ModeKind::Lydian.steps());
        assert_eq!(ionian.rotated(7), ModeKind::Locrian.steps());
        assert_eq!(ionian.rotated(8), ionian.rotated(1));
    }

    #[test]
    fn test_halftones() {
        assert_eq!(
            ModeKind::Dorian.template().halftones(),
            vec![0, 2, 3, 5, 7, 9, 10]
        );
    }

    #[test]
    fn test_from_name_accepts_aliases() {
        assert_eq!(ModeKind::from_name("Dorian"), Some(ModeKind::Dorian));
        assert_eq!(ModeKind::from_name(" major "), Some(ModeKind::Ionian));
        assert_eq!(ModeKind::from_name("natural minor"), Some(ModeKind::Aeolian));
        assert_eq!(ModeKind::from_name("altered"), Some(ModeKind::SuperLocrian));
        assert_eq!(ModeKind::from_name("bebop"), None);
    }

    #[test]
    fn test_serde_rejects_invalid_steps() {
        let ok: ModeTemplate = serde_json::from_str("[2,2,1,2,2,2,1]").unwrap();
        assert_eq!(ok, ModeKind::Ionian.template());
        assert!(serde_json::from_str::<ModeTemplate>("[2,2,2]").is_err());
    }
}
