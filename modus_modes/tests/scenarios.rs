// End-to-end checks of the public mode API: building from templates,
// spelling, circle closure, modal sorting and the embedded catalog.

use modus_modes::{
    Direction, Mode, ModeError, ModeKind, ModeTemplate, NaturalLetter, Note, build_mode,
    default_catalog,
};

fn note(s: &str) -> Note {
    s.parse().unwrap()
}

fn build(steps: &[u8], root: &str) -> Mode {
    let template = ModeTemplate::new(steps.to_vec()).unwrap();
    build_mode(&template, note(root), "test").unwrap()
}

fn scale(mode: &Mode) -> Vec<String> {
    mode.generate_scale(false)
        .iter()
        .map(|n| n.to_string())
        .collect()
}

#[test]
fn ionian_from_c() {
    let mode = build(&[2, 2, 1, 2, 2, 2, 1], "C");
    assert_eq!(scale(&mode), ["C", "D", "E", "F", "G", "A", "B"]);
}

#[test]
fn aeolian_from_c() {
    let mode = build(&[2, 1, 2, 2, 1, 2, 2], "C");
    assert_eq!(scale(&mode), ["C", "D", "Eb", "F", "G", "Ab", "Bb"]);
}

#[test]
fn super_locrian_from_c_keeps_one_letter_per_degree() {
    let mode = build(&[1, 2, 1, 2, 2, 2, 2], "C");
    assert_eq!(scale(&mode), ["C", "Db", "Eb", "Fb", "Gb", "Ab", "Bb"]);
}

#[test]
fn dorian_from_b_sorted_descending() {
    let mut mode = build_mode(&ModeKind::Dorian.template(), note("B"), "dorian").unwrap();
    assert_eq!(scale(&mode), ["B", "C#", "D", "E", "F#", "G#", "A"]);
    assert!(mode.sort_by_absolute_modal_positions(false).unwrap());
    assert_eq!(scale(&mode), ["G#", "C#", "F#", "B", "E", "A", "D"]);
}

#[test]
fn single_step_template_builds_without_annotation() {
    let mut mode = build(&[12], "C");
    assert_eq!(mode.len(), 1);
    let first = mode.first_degree().unwrap();
    assert_eq!(first.note, note("C"));
    assert!(first.absolute_modal_position.is_none());
    assert!(first.modal_characteristics.is_empty());
    assert!(!mode.sort_by_absolute_modal_positions(true).unwrap());
}

#[test]
fn template_validation() {
    assert!(matches!(
        ModeTemplate::new(vec![1, 2, 3, 5, 2]),
        Err(ModeError::InvalidTemplate(_))
    ));
    let template = ModeTemplate::new(vec![1, 2, 3, 5, 1]).unwrap();
    assert!(template.validate().is_ok());
    assert_eq!(build_mode(&template, note("C"), "odd").unwrap().len(), 5);
}

#[test]
fn heptatonic_modes_visit_letters_in_order() {
    for kind in ModeKind::ALL.into_iter().filter(|k| k.template().is_heptatonic()) {
        for root in ["C", "F#", "Bb", "Eb", "G#"] {
            let mode = build_mode(&kind.template(), note(root), kind.name()).unwrap();
            let letters: Vec<NaturalLetter> = mode
                .iter_one_round(Direction::Forward)
                .map(|d| d.note.letter())
                .collect();
            for pair in letters.windows(2) {
                assert_eq!(pair[1], pair[0].next(), "{kind} on {root}");
            }
            assert_eq!(letters[0], letters[6].next(), "{kind} on {root}");
        }
    }
}

#[test]
fn spelled_notes_match_halftones() {
    for kind in ModeKind::ALL {
        let root = note("Eb");
        let mode = build_mode(&kind.template(), root, kind.name()).unwrap();
        for degree in mode.iter_one_round(Direction::Forward) {
            let expected = (root.pitch_class() + degree.halftones_from_prime) % 12;
            assert_eq!(degree.note.pitch_class(), expected, "{kind} degree {}", degree.number);
        }
    }
}

#[test]
fn built_modes_are_closed_circles() {
    let mode = build_mode(&ModeKind::Lydian.template(), note("Ab"), "lydian").unwrap();
    let graph = mode.graph();
    let first = mode.first_id().unwrap();
    let last = graph.get_last(first, false).unwrap();
    assert_eq!(graph.degree(last).next, Some(first));
    assert_eq!(graph.degree(first).previous, Some(last));
    assert_eq!(graph.degree(last).number, 7);
}

#[test]
fn ascending_sort_is_non_decreasing() {
    for kind in [ModeKind::Ionian, ModeKind::HarmonicMinor, ModeKind::SuperLocrian] {
        let mut mode = build_mode(&kind.template(), note("D"), kind.name()).unwrap();
        assert!(mode.sort_by_absolute_modal_positions(true).unwrap());
        let weights: Vec<i32> = mode
            .iter_one_round(Direction::Forward)
            .map(|d| d.absolute_modal_position.unwrap().weight)
            .collect();
        assert!(weights.windows(2).all(|w| w[0] <= w[1]), "{kind}: {weights:?}");
        assert_eq!(weights.len(), 7);
    }
}

#[test]
fn builds_are_deterministic() {
    let template = ModeKind::HarmonicMinor.template();
    let a = build_mode(&template, note("G#"), "harmonic minor").unwrap();
    let b = build_mode(&template, note("G#"), "harmonic minor").unwrap();
    assert!(a.same_structure(&b));
    assert_eq!(a, b);
    assert!(!std::ptr::eq(a.graph(), b.graph()));
}

#[test]
fn catalog_names_build() {
    let catalog = default_catalog();
    for name in catalog.names() {
        let template = catalog.template(name).unwrap();
        let mode = build_mode(&template, note("C"), name).unwrap();
        assert_eq!(mode.len(), template.len());
        assert_eq!(mode.is_annotated(), template.is_heptatonic());
    }
}
