// Mode construction: template + root note -> fully linked, annotated `Mode`.
//
// The pipeline: validate template → insert root as degree 1 → spell and
// append the remaining degrees → close the circle → annotate (seven-step
// templates only) → `Mode`.
//
// `ModeBuilder` walks those steps as an explicit state machine so each
// transition can check it is being called at the right time:
//
//   Empty → FirstNoteInserted → StepsResolved → CircleClosed
//         → Annotated | Unannotated
//
// Calling a step out of order fails with `StructuralInvariantViolation`.
// `build_mode` runs the whole sequence and is what most callers want.
//
// Templates with other than seven steps are built and closed but never
// annotated: their degrees keep `absolute_modal_position == None`. Modal
// position is only defined for seven-step modes.

use crate::characteristic;
use crate::degree::{Degree, DegreeId};
use crate::error::{ModeError, Result};
use crate::graph::DegreeGraph;
use crate::mode::Mode;
use crate::spelling::{NoteSpellingCircle, SpellingResolver};
use crate::template::ModeTemplate;
use modus_notes::Note;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where a `ModeBuilder` is in the construction sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildStage {
    Empty,
    FirstNoteInserted,
    StepsResolved,
    CircleClosed,
    Annotated,
    Unannotated,
}

/// Step-by-step mode construction. See the module docs for the stages.
#[derive(Debug, Clone)]
pub struct ModeBuilder {
    name: String,
    template: ModeTemplate,
    circle: NoteSpellingCircle,
    graph: DegreeGraph,
    first: Option<DegreeId>,
    root: Option<Note>,
    stage: BuildStage,
}

impl ModeBuilder {
    /// Start a build. The template is validated here, before anything else.
    pub fn new(template: &ModeTemplate, name: impl Into<String>) -> Result<Self> {
        template.validate()?;
        Ok(Self {
            name: name.into(),
            template: template.clone(),
            circle: NoteSpellingCircle::new(),
            graph: DegreeGraph::new(),
            first: None,
            root: None,
            stage: BuildStage::Empty,
        })
    }

    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    fn expect_stage(&self, expected: BuildStage, operation: &str) -> Result<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(ModeError::structural(format!(
                "{operation} needs stage {expected:?}, builder is at {:?}",
                self.stage
            )))
        }
    }

    fn advance_to(&mut self, stage: BuildStage) {
        debug!(mode = %self.name, from = ?self.stage, to = ?stage, "build stage");
        self.stage = stage;
    }

    fn first(&self) -> Result<DegreeId> {
        self.first
            .ok_or_else(|| ModeError::structural("builder has no first degree"))
    }

    /// Insert `root` verbatim as degree 1, 0 halftones.
    pub fn insert_first_note(&mut self, root: Note) -> Result<()> {
        self.expect_stage(BuildStage::Empty, "insert_first_note")?;
        let id = self.graph.add(Degree::new(1, 0, root));
        self.first = Some(id);
        self.root = Some(root);
        self.advance_to(BuildStage::FirstNoteInserted);
        Ok(())
    }

    /// Spell degrees 2..=len and append them to the open chain.
    pub fn resolve_steps(&mut self) -> Result<()> {
        self.expect_stage(BuildStage::FirstNoteInserted, "resolve_steps")?;
        let first = self.first()?;
        let root = self
            .root
            .ok_or_else(|| ModeError::structural("builder has no root note"))?;

        let resolved = SpellingResolver::new(&self.circle, &self.template, root)?
            .collect::<Result<Vec<_>>>()?;
        for (i, step) in resolved.into_iter().enumerate() {
            let number = i as u8 + 2;
            let id = self
                .graph
                .add(Degree::new(number, step.halftones, step.note));
            self.graph.push_back(first, id)?;
            debug!(number, note = %step.note, halftones = step.halftones, "degree spelled");
        }
        self.advance_to(BuildStage::StepsResolved);
        Ok(())
    }

    /// Link the last degree back to the first.
    pub fn close_circle(&mut self) -> Result<()> {
        self.expect_stage(BuildStage::StepsResolved, "close_circle")?;
        let first = self.first()?;
        self.graph.close_circle(first)?;
        self.advance_to(BuildStage::CircleClosed);
        Ok(())
    }

    /// Annotate a seven-step mode; mark anything else as unannotated.
    pub fn annotate(&mut self) -> Result<()> {
        self.expect_stage(BuildStage::CircleClosed, "annotate")?;
        if self.template.is_heptatonic() {
            let first = self.first()?;
            characteristic::annotate(&mut self.graph, first, &self.template)?;
            self.advance_to(BuildStage::Annotated);
        } else {
            debug!(
                mode = %self.name,
                degrees = self.template.len(),
                "not heptatonic, skipping modal annotation"
            );
            self.advance_to(BuildStage::Unannotated);
        }
        Ok(())
    }

    /// Hand over the finished mode.
    pub fn finish(self) -> Result<Mode> {
        if !matches!(self.stage, BuildStage::Annotated | BuildStage::Unannotated) {
            return Err(ModeError::structural(format!(
                "finish needs an annotated or unannotated mode, builder is at {:?}",
                self.stage
            )));
        }
        Ok(Mode::from_parts(
            self.name,
            self.template,
            self.graph,
            self.first,
        ))
    }
}

/// Build a complete mode from `template`, starting on `root`.
pub fn build_mode(template: &ModeTemplate, root: Note, name: &str) -> Result<Mode> {
    let mut builder = ModeBuilder::new(template, name)?;
    builder.insert_first_note(root)?;
    builder.resolve_steps()?;
    builder.close_circle()?;
    builder.annotate()?;
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Direction;
    use crate::template::ModeKind;

    fn note(s: &str) -> Note {
        s.parse().unwrap()
    }

    #[test]
    fn test_stages_in_order() {
        let template = ModeKind::Ionian.template();
        let mut builder = ModeBuilder::new(&template, "ionian").unwrap();
        assert_eq!(builder.stage(), BuildStage::Empty);
        builder.insert_first_note(note("C")).unwrap();
        assert_eq!(builder.stage(), BuildStage::FirstNoteInserted);
        builder.resolve_steps().unwrap();
        assert_eq!(builder.stage(), BuildStage::StepsResolved);
        builder.close_circle().unwrap();
        assert_eq!(builder.stage(), BuildStage::CircleClosed);
        builder.annotate().unwrap();
        assert_eq!(builder.stage(), BuildStage::Annotated);
        let mode = builder.finish().unwrap();
        assert_eq!(mode.len(), 7);
        assert!(mode.is_annotated());
    }

    #[test]
    fn test_out_of_order_transition_fails() {
        let template = ModeKind::Ionian.template();
        let mut builder = ModeBuilder::new(&template, "ionian").unwrap();
        assert!(matches!(
            builder.resolve_steps(),
            Err(ModeError::StructuralInvariantViolation(_))
        ));
        builder.insert_first_note(note("C")).unwrap();
        assert!(builder.insert_first_note(note("D")).is_err());
        assert!(builder.close_circle().is_err());
        assert!(builder.clone().finish().is_err());
    }

    #[test]
    fn test_non_heptatonic_is_unannotated() {
        let template = ModeKind::MinorPentatonic.template();
        let mut builder = ModeBuilder::new(&template, "minor pentatonic").unwrap();
        builder.insert_first_note(note("A")).unwrap();
        builder.resolve_steps().unwrap();
        builder.close_circle().unwrap();
        builder.annotate().unwrap();
        assert_eq!(builder.stage(), BuildStage::Unannotated);
        let mode = builder.finish().unwrap();
        assert_eq!(mode.len(), 5);
        assert!(!mode.is_annotated());
        assert!(
            mode.iter_one_round(Direction::Forward)
                .all(|d| d.modal_characteristics.is_empty())
        );
    }

    #[test]
    fn test_build_mode_closes_circle() {
        let mode = build_mode(&ModeKind::Locrian.template(), note("B"), "locrian").unwrap();
        let graph = mode.graph();
        let first = mode.first_id().unwrap();
        assert!(graph.is_closed(first).unwrap());
        let halftones: Vec<u8> = mode
            .iter_one_round(Direction::Forward)
            .map(|d| d.halftones_from_prime)
            .collect();
        assert_eq!(halftones, vec![0, 1, 3, 5, 6, 8, 10]);
    }

    #[test]
    fn test_build_mode_rejects_bad_root() {
        assert!(matches!(
            build_mode(&ModeKind::Ionian.template(), note("Ebb"), "ionian"),
            Err(ModeError::UnresolvableSpelling(_))
        ));
    }

    #[test]
    fn test_build_mode_rejects_long_template() {
        let template = ModeTemplate::new(vec![1, 1, 2, 1, 2, 1, 2, 2]).unwrap();
        assert!(matches!(
            build_mode(&template, note("C"), "octatonic-ish"),
            Err(ModeError::UnresolvableSpelling(_))
        ));
    }
}
