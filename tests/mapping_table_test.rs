//! Mapping-table resolution against an ARPAbet to IPA table

use pronunciation_dict_utils::prelude::*;

fn arpabet_dictionary() -> PronunciationDict {
    let mut dictionary = PronunciationDict::new();
    dictionary.insert(
        "test".to_string(),
        vec![
            (pronunciation(["AO", "AO2", "AO3", "AA1", "EY2", "."]), 1.0),
            (pronunciation(["A03", "NN", "HH"]), 2.0),
        ]
        .into(),
    );
    dictionary
}

fn table(entries: &[(&str, &str)]) -> MappingTable {
    entries
        .iter()
        .map(|(symbol, replacement)| (symbol.to_string(), replacement.to_string()))
        .collect()
}

fn ipa_table(ey2: &str) -> MappingTable {
    table(&[
        ("EY1", "ˈeɪ"),
        ("EY", "eɪ"),
        ("AO1", "ˈɔ"),
        ("EY0", "eɪ"),
        ("AO", "ɔ"),
        ("AO0", "ɔ"),
        ("AO2", "ˌɔ"),
        ("EY2", ey2),
    ])
}

fn options() -> MultiprocessingOptions {
    MultiprocessingOptions::new(4, 10, Some(100)).unwrap()
}

fn expected(first: &[&str]) -> Pronunciations {
    vec![
        (pronunciation(first.iter().copied()), 1.0),
        (pronunciation(["A03", "NN", "HH"]), 2.0),
    ]
    .into()
}

#[test]
fn test_full_mapping() {
    let mut dictionary = arpabet_dictionary();
    let report =
        resolve_mapping_table(&mut dictionary, &ipa_table("ˌeɪ"), false, &options()).unwrap();

    assert_eq!(report.changed.iter().collect::<Vec<_>>(), vec!["test"]);
    assert_eq!(report.mappable, vec!["AO2", "EY2", "AO"]);
    assert_eq!(
        report.unmappable.iter().collect::<Vec<_>>(),
        vec!["AO3", "AA1", ".", "A03", "NN", "HH"]
    );
    assert_eq!(
        dictionary.get("test"),
        Some(&expected(&["ɔ", "ˌɔ", "AO3", "AA1", "ˌeɪ", "."]))
    );
}

#[test]
fn test_full_mapping_splits_on_whitespace() {
    let mut dictionary = arpabet_dictionary();
    let report =
        resolve_mapping_table(&mut dictionary, &ipa_table("ˌe ɪ"), false, &options()).unwrap();

    assert_eq!(report.changed.len(), 1);
    assert_eq!(
        dictionary.get("test"),
        Some(&expected(&["ɔ", "ˌɔ", "AO3", "AA1", "ˌe", "ɪ", "."]))
    );
}

#[test]
fn test_partial_mapping_applies_longest_symbol_first() {
    let mut dictionary = arpabet_dictionary();
    let report =
        resolve_mapping_table(&mut dictionary, &ipa_table("ˌeɪ"), true, &options()).unwrap();

    assert_eq!(report.changed.len(), 1);
    // AO3 has no entry of its own, so the AO entry rewrites its prefix.
    assert_eq!(
        dictionary.get("test"),
        Some(&expected(&["ɔ", "ˌɔ", "ɔ3", "AA1", "ˌeɪ", "."]))
    );
}

#[test]
fn test_partial_mapping_rejects_whitespace() {
    let mut dictionary = PronunciationDict::new();
    dictionary.insert(
        "test".to_string(),
        Pronunciations::single(pronunciation(["EY2"]), 1.0),
    );

    let err = resolve_mapping_table(&mut dictionary, &table(&[("EY2", "ˌe ɪ")]), true, &options())
        .unwrap_err();
    let DictError::MappingAborted { symbol, source, .. } = &err else {
        panic!("unexpected error: {:?}", err);
    };
    assert_eq!(symbol, "EY2");
    assert!(matches!(
        **source,
        DictError::WhitespaceInPartialMapping { .. }
    ));
    assert!(err.to_string().contains("some changes may have been applied"));
}

#[test]
fn test_table_without_overlap_changes_nothing() {
    for partial in [false, true] {
        let mut dictionary = arpabet_dictionary();
        let report = resolve_mapping_table(
            &mut dictionary,
            &table(&[("V", "v"), ("F", "f"), ("D", "d"), ("MM", "m")]),
            partial,
            &options(),
        )
        .unwrap();

        assert!(report.changed.is_empty());
        assert!(report.mappable.is_empty());
        assert_eq!(dictionary, arpabet_dictionary());
    }
}

#[test]
fn test_empty_dictionary_and_table() {
    let mut dictionary = PronunciationDict::new();
    let report =
        resolve_mapping_table(&mut dictionary, &MappingTable::default(), false, &options())
            .unwrap();
    assert!(report.changed.is_empty());
    assert!(dictionary.is_empty());
}
