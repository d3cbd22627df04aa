use std::collections::HashMap;

use rcl_core::lang::keywords::{self, KeywordKind};
use rcl_core::lang::literals::{self, LiteralValue};
use rcl_core::lang::markers::{self, Sigil};
use rcl_core::lang::punctuation;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            keywords::as_str(info.id),
            info.canonical,
            "keyword as_str mismatch for {:?}",
            info.id
        );

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate keyword spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn only_reserved_keywords_resolve_as_reserved() {
    for info in keywords::KEYWORDS {
        let reserved = keywords::reserved_from_str(info.canonical);
        match keywords::kind(info.id) {
            KeywordKind::Reserved => assert_eq!(reserved, Some(info.id)),
            KeywordKind::Contextual => assert_eq!(reserved, None, "{} is contextual", info.canonical),
        }
    }
}

#[test]
fn literal_words_unique_and_canonical_first() {
    let mut seen: HashMap<&'static str, literals::LiteralWordId> = HashMap::new();
    for info in literals::LITERAL_WORDS {
        assert_eq!(literals::from_str(info.spelling), Some(info.id));
        assert_eq!(literals::as_str(info.id), info.spelling);
        assert_eq!(literals::value(info.id), info.value);
        if let Some(prev) = seen.insert(info.spelling, info.id) {
            panic!("duplicate literal spelling {:?}: {prev:?} and {:?}", info.spelling, info.id);
        }
    }

    for value in [LiteralValue::Bool(true), LiteralValue::Bool(false), LiteralValue::Null] {
        let canonical = literals::canonical_for(value);
        let first = literals::LITERAL_WORDS
            .iter()
            .find(|w| w.value == value)
            .expect("every value has a spelling");
        assert_eq!(canonical, first.id);
    }
}

#[test]
fn punctuation_spellings_unique_and_longest_first_is_complete() {
    let mut seen: HashMap<&'static str, punctuation::PunctuationId> = HashMap::new();
    for info in punctuation::PUNCTUATION {
        assert_eq!(punctuation::from_str(info.canonical), Some(info.id));
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate punctuation {:?}: {prev:?} and {:?}", info.canonical, info.id);
        }
        assert!(punctuation::LONGEST_FIRST.contains(&info.id), "{:?} missing from LONGEST_FIRST", info.id);
    }

    let lengths: Vec<usize> = punctuation::LONGEST_FIRST
        .iter()
        .map(|&id| punctuation::as_str(id).len())
        .collect();
    assert!(lengths.windows(2).all(|w| w[0] >= w[1]), "LONGEST_FIRST is not ordered: {lengths:?}");
}

#[test]
fn trim_markers_resolve_and_are_longest_first() {
    for info in markers::TRIM_MODES {
        assert_eq!(markers::trim_mode_from_str(info.marker), Some(info.mode));
        assert_eq!(markers::trim_marker(info.mode), info.marker);
    }
    let lengths: Vec<usize> = markers::TRIM_MODES.iter().map(|m| m.marker.len()).collect();
    assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn code_markers_follow_their_tag() {
    for info in markers::CODE_LANGUAGES {
        assert_eq!(markers::code_language_from_tag(info.tag), Some(info.language));
        assert_eq!(markers::single_line_code_marker(info.language), format!("${}>", info.tag));
        assert_eq!(markers::fenced_code_marker(info.language), format!("${}>>>", info.tag));
    }
}

#[test]
fn sigils_round_trip() {
    for sigil in [Sigil::Dollar, Sigil::At] {
        assert_eq!(Sigil::from_char(sigil.as_char()), Some(sigil));
    }
    assert_eq!(Sigil::from_char('#'), None);
}
