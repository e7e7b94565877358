// A built mode: a name, its template, and the circle of degrees.
//
// `Mode` owns the `DegreeGraph` arena its degrees live in and remembers
// which degree is the entry point (degree 1 after building, whichever
// degree sorts first after `sort_by_absolute_modal_positions`). Everything
// else is reached by walking links from that entry point.
//
// Modes are produced by builder.rs. Once built, the only in-place mutation
// is re-sorting; `reversed` and `rotated_to` return new modes.

use crate::degree::{Degree, DegreeId};
use crate::error::{ModeError, Result};
use crate::graph::{DegreeGraph, Direction};
use crate::template::ModeTemplate;
use modus_notes::Note;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ModeFile")]
pub struct Mode {
    name: String,
    template: ModeTemplate,
    graph: DegreeGraph,
    first: Option<DegreeId>,
}

#[derive(Deserialize)]
struct ModeFile {
    name: String,
    template: ModeTemplate,
    graph: DegreeGraph,
    first: Option<DegreeId>,
}

impl TryFrom<ModeFile> for Mode {
    type Error = ModeError;

    fn try_from(file: ModeFile) -> Result<Self> {
        if let Some(first) = file.first.filter(|&id| file.graph.get(id).is_none()) {
            return Err(ModeError::structural(format!(
                "entry {first} is not in a graph of {} degrees",
                file.graph.len()
            )));
        }
        Ok(Self::from_parts(file.name, file.template, file.graph, file.first))
    }
}

impl Mode {
    pub(crate) fn from_parts(
        name: String,
        template: ModeTemplate,
        graph: DegreeGraph,
        first: Option<DegreeId>,
    ) -> Self {
        Self {
            name,
            template,
            graph,
            first,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The template the mode was built from.
    pub fn template(&self) -> &ModeTemplate {
        &self.template
    }

    /// The arena holding this mode's degrees.
    pub fn graph(&self) -> &DegreeGraph {
        &self.graph
    }

    /// Id of the entry degree inside `graph()`.
    pub fn first_id(&self) -> Option<DegreeId> {
        self.first
    }

    /// The entry degree; `None` only for an empty mode.
    pub fn first_degree(&self) -> Option<&Degree> {
        self.first.and_then(|id| self.graph.get(id))
    }

    /// Number of degrees, counted by walking one round.
    pub fn len(&self) -> usize {
        self.iter_one_round(Direction::Forward).count()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Lazily visit every degree once, starting at the entry degree.
    pub fn iter_one_round(&self, direction: Direction) -> impl Iterator<Item = &Degree> {
        self.first
            .into_iter()
            .flat_map(move |first| self.graph.round(first, direction))
            .map(|(_, degree)| degree)
    }

    /// The degree numbered `number`, wherever it sits in the round.
    pub fn degree(&self, number: u8) -> Option<&Degree> {
        self.iter_one_round(Direction::Forward)
            .find(|d| d.number == number)
    }

    /// The notes of one round, ascending from the entry degree, or
    /// descending back down to it when `descending`.
    pub fn generate_scale(&self, descending: bool) -> Vec<Note> {
        let direction = if descending {
            Direction::Backward
        } else {
            Direction::Forward
        };
        self.iter_one_round(direction).map(|d| d.note).collect()
    }

    /// True when every degree carries an absolute modal position.
    pub fn is_annotated(&self) -> bool {
        !self.is_empty()
            && self
                .iter_one_round(Direction::Forward)
                .all(|d| d.absolute_modal_position.is_some())
    }

    /// Reorder the mode by absolute modal position weight.
    ///
    /// Returns `Ok(false)` and leaves the mode untouched when any degree is
    /// unannotated (or the mode is empty).
    pub fn sort_by_absolute_modal_positions(&mut self, ascending: bool) -> Result<bool> {
        let Some(first) = self.first else {
            return Ok(false);
        };
        match self.graph.sorted_by_weight(first, ascending)? {
            Some((graph, head)) => {
                self.graph = graph;
                self.first = Some(head);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// A copy mirrored around the entry degree (1 7 6 5 4 3 2).
    pub fn reversed(&self) -> Result<Mode> {
        let Some(first) = self.first else {
            return Ok(self.clone());
        };
        let (graph, head) = self.graph.reversed(first)?;
        Ok(Self::from_parts(
            self.name.clone(),
            self.template.clone(),
            graph,
            Some(head),
        ))
    }

    /// A copy entered at degree `number` instead of the current entry.
    /// Degree numbers and annotations are unchanged.
    pub fn rotated_to(&self, number: u8) -> Result<Mode> {
        let first = self
            .first
            .ok_or_else(|| ModeError::structural("cannot rotate an empty mode"))?;
        let target = self
            .graph
            .round(first, Direction::Forward)
            .find(|(_, d)| d.number == number)
            .map(|(id, _)| id)
            .ok_or_else(|| {
                ModeError::structural(format!("mode '{}' has no degree {number}", self.name))
            })?;
        Ok(Self::from_parts(
            self.name.clone(),
            self.template.clone(),
            self.graph.clone(),
            Some(target),
        ))
    }

    /// Same name, template and degree content in the same round order.
    pub fn same_structure(&self, other: &Mode) -> bool {
        self.name == other.name
            && self.template == other.template
            && self.len() == other.len()
            && self
                .iter_one_round(Direction::Forward)
                .zip(other.iter_one_round(Direction::Forward))
                .all(|(a, b)| a.same_content(b))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notes: Vec<String> = self
            .generate_scale(false)
            .iter()
            .map(|n| n.to_string())
            .collect();
        write!(f, "{} [{}]", self.name, notes.join(" "))
    }
}
