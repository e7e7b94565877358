// Enharmonic spelling: picking `Eb` rather than `D#` for a scale degree.
//
// Two rings are walked in lock-step while a scale is spelled:
// - `NoteSpellingCircle`: 12 chromatic slots, one per semitone above C, each
//   listing the natural, single-sharp and single-flat spellings that land on
//   that pitch class (slot 1 holds `C#` and `Db`).
// - `NaturalLetterCycle`: a cursor on the seven-letter ring. Every degree
//   after the first takes the next letter, so a heptatonic scale uses each
//   letter exactly once.
//
// For each template step, `SpellingResolver` advances the chromatic slot by
// the step size to find the target pitch class, advances the letter cursor
// to find the expected letter, then alters that letter until it lands on the
// target. The result has the right letter and the right pitch at once.
//
// The circle is immutable and cheap to build. The letter cursor belongs to
// one resolver; independent builds never share it.

use crate::error::{ModeError, Result};
use crate::template::{MAX_SPELLED_DEGREES, ModeTemplate};
use modus_notes::{NaturalLetter, Note};
use serde::{Deserialize, Serialize};
use tracing::trace;

const SLOT_COUNT: usize = 12;

// ---------------------------------------------------------------------------
// Chromatic slots
// ---------------------------------------------------------------------------

/// One semitone position in the chromatic ring with its valid spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromaticSlot {
    /// Semitones above C, 0..12.
    pub offset: u8,
    /// Each spelling's letter is its natural-letter base. No two spellings
    /// share a base letter.
    pub spellings: Vec<Note>,
}

impl ChromaticSlot {
    pub fn contains(&self, note: Note) -> bool {
        self.spellings.contains(&note)
    }
}

/// The ring of 12 chromatic slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSpellingCircle {
    slots: Vec<ChromaticSlot>,
}

impl Default for NoteSpellingCircle {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteSpellingCircle {
    /// Build the circle from the seven letters: each letter contributes its
    /// natural, sharp and flat spelling to the slot it sounds in.
    pub fn new() -> Self {
        let mut slots: Vec<ChromaticSlot> = (0..SLOT_COUNT as u8)
            .map(|offset| ChromaticSlot {
                offset,
                spellings: Vec::new(),
            })
            .collect();

        for alteration in [0i8, 1, -1] {
            for letter in NaturalLetter::ALL {
                let note = Note::new(letter, alteration);
                slots[note.pitch_class() as usize].spellings.push(note);
            }
        }

        Self { slots }
    }

    /// The slot `offset` semitones above C.
    pub fn slot_at(&self, offset: u8) -> Result<&ChromaticSlot> {
        self.slots
            .get(offset as usize)
            .ok_or(ModeError::InvalidStepCount(offset as i32))
    }

    /// The slot listing `note` among its spellings. Notes with more than one
    /// accidental are not listed anywhere.
    pub fn slot_of(&self, note: Note) -> Option<&ChromaticSlot> {
        self.slots.iter().find(|slot| slot.contains(note))
    }

    /// The spelling in `slot` whose natural-letter base is `letter`.
    pub fn spelling_matching(&self, slot: &ChromaticSlot, letter: NaturalLetter) -> Option<Note> {
        slot.spellings.iter().copied().find(|n| n.letter() == letter)
    }

    /// A spelling in the circle that sounds like `note`: the natural one if
    /// there is one, otherwise the sharp.
    pub fn enharmonic_spelling(&self, note: Note) -> Option<Note> {
        let slot = self.slots.iter().find(|slot| {
            slot.spellings.first().is_some_and(|n| n.is_enharmonic_to(note))
        })?;
        slot.spellings.first().copied()
    }

    /// Walk `semitones` slots forward from `slot`, wrapping after B.
    pub fn advance(&self, slot: &ChromaticSlot, semitones: i32) -> Result<&ChromaticSlot> {
        if !(0..SLOT_COUNT as i32).contains(&semitones) {
            return Err(ModeError::InvalidStepCount(semitones));
        }
        let target = (slot.offset as usize + semitones as usize) % SLOT_COUNT;
        Ok(&self.slots[target])
    }

    /// The slot the unaltered `letter` sounds in.
    pub fn plain_slot(&self, letter: NaturalLetter) -> &ChromaticSlot {
        &self.slots[letter.pitch_class() as usize]
    }

    pub fn slots(&self) -> &[ChromaticSlot] {
        &self.slots
    }
}

// ---------------------------------------------------------------------------
// Letter cursor
// ---------------------------------------------------------------------------

/// A cursor on the C..B ring remembering the last letter handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaturalLetterCycle {
    cursor: NaturalLetter,
}

impl NaturalLetterCycle {
    pub fn new(start: NaturalLetter) -> Self {
        Self { cursor: start }
    }

    /// Advance one letter and return it.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> NaturalLetter {
        self.cursor = self.cursor.next();
        self.cursor
    }

    /// Resynchronize on `letter`, e.g. the letter of a starting note.
    pub fn set_cursor_to(&mut self, letter: NaturalLetter) {
        self.cursor = letter;
    }

    /// The last letter handed out.
    pub fn cursor(&self) -> NaturalLetter {
        self.cursor
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// One spelled scale degree after the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStep {
    pub note: Note,
    /// Semitones above the root.
    pub halftones: u8,
}

/// Lazily spells degrees 2..=len of a template starting from a root note.
///
/// Single pass: each `next()` consumes one template step. The last step of
/// the template leads back to the root and is never spelled.
#[derive(Debug)]
pub struct SpellingResolver<'a> {
    circle: &'a NoteSpellingCircle,
    steps: &'a [u8],
    letters: NaturalLetterCycle,
    slot: &'a ChromaticSlot,
    halftones: u8,
    position: usize,
}

impl<'a> SpellingResolver<'a> {
    /// Start a resolver at `root`.
    ///
    /// Fails with `UnresolvableSpelling` when the template has more degrees
    /// than there are letters, or when `root` is not one of the circle's
    /// spellings (more than one accidental).
    pub fn new(
        circle: &'a NoteSpellingCircle,
        template: &'a ModeTemplate,
        root: Note,
    ) -> Result<Self> {
        if template.len() > MAX_SPELLED_DEGREES {
            return Err(ModeError::UnresolvableSpelling(format!(
                "{} degrees cannot each take a distinct letter (max {})",
                template.len(),
                MAX_SPELLED_DEGREES
            )));
        }
        let slot = circle.slot_of(root).ok_or_else(|| {
            let mut message = format!("root {root} is not in the spelling circle");
            if let Some(respelled) = circle.enharmonic_spelling(root) {
                message.push_str(&format!("; try {respelled}"));
            }
            ModeError::UnresolvableSpelling(message)
        })?;

        let mut letters = NaturalLetterCycle::new(NaturalLetter::C);
        letters.set_cursor_to(root.letter());

        Ok(Self {
            circle,
            steps: template.steps(),
            letters,
            slot,
            halftones: 0,
            position: 0,
        })
    }

    fn resolve_next(&mut self, step: u8) -> Result<ResolvedStep> {
        let target = self.circle.advance(self.slot, step as i32)?;
        let expected = self.letters.next();
        let diff = signed_distance(self.circle.plain_slot(expected).offset, target.offset);

        let note = self
            .circle
            .spelling_matching(target, expected)
            .unwrap_or_else(|| Note::natural(expected).altered(-diff));
        debug_assert_eq!(note, Note::natural(expected).altered(-diff));

        self.slot = target;
        self.halftones += step;
        trace!(%note, halftones = self.halftones, diff, "resolved spelling");
        Ok(ResolvedStep {
            note,
            halftones: self.halftones,
        })
    }
}

impl Iterator for SpellingResolver<'_> {
    type Item = Result<ResolvedStep>;

    fn next(&mut self) -> Option<Self::Item> {
        // The final step returns to the root; it has nothing to spell.
        if self.position + 1 >= self.steps.len() {
            return None;
        }
        let step = self.steps[self.position];
        self.position += 1;
        Some(self.resolve_next(step))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps.len().saturating_sub(self.position + 1);
        (remaining, Some(remaining))
    }
}

/// `from - to` in semitones, folded into -5..=6.
fn signed_distance(from: u8, to: u8) -> i8 {
    let d = (from as i32 - to as i32).rem_euclid(SLOT_COUNT as i32);
    (if d > 6 { d - SLOT_COUNT as i32 } else { d }) as i8
}

/// Spell every degree of `template` from `root`, root included.
pub fn spell_scale(
    circle: &NoteSpellingCircle,
    template: &ModeTemplate,
    root: Note,
) -> Result<Vec<ResolvedStep>> {
    let mut out = vec![ResolvedStep {
        note: root,
        halftones: 0,
    }];
    for step in SpellingResolver::new(circle, template, root)? {
        out.push(step?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ModeKind;

    fn note(s: &str) -> Note {
        s.parse().unwrap()
    }

    fn spelled(kind: ModeKind, root: &str) -> Vec<String> {
        let circle = NoteSpellingCircle::new();
        spell_scale(&circle, &kind.template(), note(root))
            .unwrap()
            .iter()
            .map(|s| s.note.to_string())
            .collect()
    }

    #[test]
    fn test_circle_slots() {
        let circle = NoteSpellingCircle::new();
        assert_eq!(circle.slots().len(), 12);
        let slot1 = circle.slot_at(1).unwrap();
        assert!(slot1.contains(note("C#")));
        assert!(slot1.contains(note("Db")));
        assert!(slot1.spellings.iter().all(|n| !n.is_natural()));
        let slot0 = circle.slot_at(0).unwrap();
        assert_eq!(circle.spelling_matching(slot0, NaturalLetter::C), Some(note("C")));
        assert!(slot0.contains(note("B#")));
        assert!(circle.slot_at(4).unwrap().contains(note("Fb")));
    }

    #[test]
    fn test_each_slot_has_one_spelling_per_letter() {
        let circle = NoteSpellingCircle::new();
        for slot in circle.slots() {
            for letter in NaturalLetter::ALL {
                let count = slot.spellings.iter().filter(|n| n.letter() == letter).count();
                assert!(count <= 1, "slot {} has {count} spellings on {letter}", slot.offset);
            }
        }
    }

    #[test]
    fn test_spelling_matching() {
        let circle = NoteSpellingCircle::new();
        let slot = circle.slot_at(6).unwrap();
        assert_eq!(circle.spelling_matching(slot, NaturalLetter::F), Some(note("F#")));
        assert_eq!(circle.spelling_matching(slot, NaturalLetter::G), Some(note("Gb")));
        assert_eq!(circle.spelling_matching(slot, NaturalLetter::A), None);
    }

    #[test]
    fn test_advance_wraps_and_rejects_bad_counts() {
        let circle = NoteSpellingCircle::new();
        let b = circle.slot_of(note("B")).unwrap();
        assert_eq!(circle.advance(b, 2).unwrap().offset, 1);
        assert_eq!(circle.advance(b, 0).unwrap().offset, 11);
        assert!(matches!(circle.advance(b, 12), Err(ModeError::InvalidStepCount(12))));
        assert!(matches!(circle.advance(b, -1), Err(ModeError::InvalidStepCount(-1))));
        assert!(matches!(circle.slot_at(12), Err(ModeError::InvalidStepCount(12))));
    }

    #[test]
    fn test_letter_cycle() {
        let mut cycle = NaturalLetterCycle::new(NaturalLetter::A);
        assert_eq!(cycle.next(), NaturalLetter::B);
        assert_eq!(cycle.next(), NaturalLetter::C);
        cycle.set_cursor_to(NaturalLetter::F);
        assert_eq!(cycle.cursor(), NaturalLetter::F);
        assert_eq!(cycle.next(), NaturalLetter::G);
    }

    #[test]
    fn test_signed_distance_folds() {
        assert_eq!(signed_distance(2, 1), 1);
        assert_eq!(signed_distance(0, 1), -1);
        assert_eq!(signed_distance(0, 11), 1);
        assert_eq!(signed_distance(11, 0), -1);
        assert_eq!(signed_distance(6, 0), 6);
    }

    #[test]
    fn test_spells_major_minor_and_altered() {
        assert_eq!(spelled(ModeKind::Ionian, "C"), ["C", "D", "E", "F", "G", "A", "B"]);
        assert_eq!(spelled(ModeKind::Aeolian, "C"), ["C", "D", "Eb", "F", "G", "Ab", "Bb"]);
        assert_eq!(
            spelled(ModeKind::SuperLocrian, "C"),
            ["C", "Db", "Eb", "Fb", "Gb", "Ab", "Bb"]
        );
    }

    #[test]
    fn test_spells_sharp_keys() {
        assert_eq!(spelled(ModeKind::Dorian, "B"), ["B", "C#", "D", "E", "F#", "G#", "A"]);
        assert_eq!(spelled(ModeKind::Ionian, "F#"), ["F#", "G#", "A#", "B", "C#", "D#", "E#"]);
    }

    #[test]
    fn test_spells_double_alterations() {
        // G# harmonic minor raises the 7th onto F##.
        assert_eq!(
            spelled(ModeKind::HarmonicMinor, "G#"),
            ["G#", "A#", "B", "C#", "D#", "E", "F##"]
        );
    }

    #[test]
    fn test_halftones_accumulate() {
        let circle = NoteSpellingCircle::new();
        let steps = spell_scale(&circle, &ModeKind::Ionian.template(), note("D")).unwrap();
        let halftones: Vec<u8> = steps.iter().map(|s| s.halftones).collect();
        assert_eq!(halftones, vec![0, 2, 4, 5, 7, 9, 11]);
    }

    #[test]
    fn test_resolver_is_lazy_and_sized() {
        let circle = NoteSpellingCircle::new();
        let template = ModeKind::MajorPentatonic.template();
        let mut resolver = SpellingResolver::new(&circle, &template, note("C")).unwrap();
        assert_eq!(resolver.size_hint(), (4, Some(4)));
        assert_eq!(resolver.next().unwrap().unwrap().note, note("D"));
        assert_eq!(resolver.size_hint(), (3, Some(3)));
    }

    #[test]
    fn test_rejects_double_altered_root() {
        let circle = NoteSpellingCircle::new();
        let template = ModeKind::Ionian.template();
        assert!(matches!(
            SpellingResolver::new(&circle, &template, note("Dbb")),
            Err(ModeError::UnresolvableSpelling(msg)) if msg.ends_with("try C")
        ));
    }

    #[test]
    fn test_enharmonic_spelling_prefers_natural_then_sharp() {
        let circle = NoteSpellingCircle::new();
        assert_eq!(circle.enharmonic_spelling(note("Ebb")), Some(note("D")));
        assert_eq!(circle.enharmonic_spelling(note("Fx")), Some(note("G")));
        assert_eq!(circle.enharmonic_spelling(note("Cbb")), Some(note("A#")));
        assert_eq!(circle.enharmonic_spelling(note("E#")), Some(note("F")));
    }

    #[test]
    fn test_rejects_templates_longer_than_seven() {
        let circle = NoteSpellingCircle::new();
        let template = ModeTemplate::new(vec![2, 2, 1, 1, 1, 2, 2, 1]).unwrap();
        assert!(matches!(
            SpellingResolver::new(&circle, &template, note("C")),
            Err(ModeError::UnresolvableSpelling(_))
        ));
    }

    #[test]
    fn test_single_step_template_spells_only_the_root() {
        let circle = NoteSpellingCircle::new();
        let template = ModeTemplate::new(vec![12]).unwrap();
        let steps = spell_scale(&circle, &template, note("E")).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].note, note("E"));
    }
}
