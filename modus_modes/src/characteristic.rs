// Modal characteristics and absolute modal positions.
//
// For every degree `d` of a seven-step mode, the template is rotated so it
// starts on `d` and walked once around. Each other degree `d'` reached `j`
// letter steps later sits some number of semitones above `d`; comparing
// that with what the major scale puts `j` steps up gives a diff, and the
// diff names the quality of the interval `d -> d'` (Clean, Minor, Aug, ...).
// That characteristic is recorded on `d'`, naming `d` as the degree it was
// measured from.
//
// Once every degree carries one characteristic per other degree, each
// degree's absolute modal position is the sum of its characteristics'
// weights. In C Ionian, F collects only major and perfect intervals from
// below and ends up with the lowest weight (-6, `High`); B ends up at +6.
//
// Diffs outside the named range fail the whole annotation with
// `UnknownDegreeCharacteristic`; such templates are too far from anything
// diatonic to rank.

use crate::degree::{CharacteristicName, DegreeId, ModalCharacteristic, ModalPosition};
use crate::error::{ModeError, Result};
use crate::graph::{DegreeGraph, Direction};
use crate::template::{ModeTemplate, cumulative_halftones};
use modus_notes::IntervalDegree;
use tracing::debug;

/// Fill in modal characteristics and absolute positions for the chain
/// through `first`, which must hold one degree per template step.
pub fn annotate(graph: &mut DegreeGraph, first: DegreeId, template: &ModeTemplate) -> Result<()> {
    set_relative_modal_positions(graph, first, template)?;
    set_absolute_modal_positions(graph, first)
}

/// Replace every degree's characteristics with freshly computed ones.
pub fn set_relative_modal_positions(
    graph: &mut DegreeGraph,
    first: DegreeId,
    template: &ModeTemplate,
) -> Result<()> {
    let ids: Vec<DegreeId> = graph.round(first, Direction::Forward).map(|(id, _)| id).collect();
    if ids.len() != template.len() {
        return Err(ModeError::structural(format!(
            "chain has {} degrees but the template has {} steps",
            ids.len(),
            template.len()
        )));
    }

    let mut computed: Vec<Vec<ModalCharacteristic>> = vec![Vec::new(); ids.len()];
    for (root_index, &root_id) in ids.iter().enumerate() {
        let root_number = graph.degree(root_id).number;
        let halftones = cumulative_halftones(&template.rotated(root_number as usize));

        for (steps, &above) in halftones.iter().enumerate().skip(1) {
            let interval = IntervalDegree::from_steps(steps).ok_or_else(|| {
                ModeError::structural(format!("no interval spans {steps} letter steps"))
            })?;
            let diff = above as i32 - interval.major_halftones() as i32;
            let name = CharacteristicName::classify(interval, diff).ok_or(
                ModeError::UnknownDegreeCharacteristic {
                    degree: root_number,
                    interval,
                    diff,
                },
            )?;
            let target = (root_index + steps) % ids.len();
            computed[target].push(ModalCharacteristic::new(name, root_number, interval));
        }
    }

    for (&id, characteristics) in ids.iter().zip(computed) {
        graph.degree_mut(id).modal_characteristics = characteristics;
    }
    Ok(())
}

/// Sum each degree's characteristic weights into its absolute position.
pub fn set_absolute_modal_positions(graph: &mut DegreeGraph, first: DegreeId) -> Result<()> {
    let ids: Vec<DegreeId> = graph.round(first, Direction::Forward).map(|(id, _)| id).collect();
    for id in ids {
        let degree = graph.degree_mut(id);
        let position = ModalPosition::from_characteristics(&degree.modal_characteristics);
        debug!(
            number = degree.number,
            note = %degree.note,
            weight = position.weight,
            "absolute modal position"
        );
        degree.absolute_modal_position = Some(position);
    }
    Ok(())
}
