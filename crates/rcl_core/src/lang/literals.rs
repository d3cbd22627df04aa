//! Literal words: the capitalized spellings that denote booleans and null.
//!
//! RCL accepts several synonyms for each constant (`True`, `Yes`, `On`, ...). They share the shape of an
//! identifier, so the lexer consults this registry before treating a capitalized word as a name.
//!
//! ## Examples
//! ```rust
//! use rcl_core::lang::literals::{self, LiteralValue, LiteralWordId};
//!
//! assert_eq!(literals::from_str("Enabled"), Some(LiteralWordId::Enabled));
//! assert_eq!(literals::value(LiteralWordId::Void), LiteralValue::Null);
//! assert_eq!(literals::canonical_for(LiteralValue::Bool(false)), LiteralWordId::False);
//! ```

/// The constant a literal word denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    Bool(bool),
    Null,
}

/// Stable identifier for literal words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralWordId {
    True,
    Yes,
    On,
    Enabled,
    Active,
    False,
    No,
    Off,
    Disabled,
    Inactive,
    Null,
    None,
    Void,
}

/// Metadata for a literal word.
#[derive(Debug, Clone, Copy)]
pub struct LiteralWordInfo {
    pub id: LiteralWordId,
    pub spelling: &'static str,
    pub value: LiteralValue,
}

/// Registry of all literal words. The first entry for each value is its canonical spelling.
pub const LITERAL_WORDS: &[LiteralWordInfo] = &[
    word(LiteralWordId::True, "True", LiteralValue::Bool(true)),
    word(LiteralWordId::Yes, "Yes", LiteralValue::Bool(true)),
    word(LiteralWordId::On, "On", LiteralValue::Bool(true)),
    word(LiteralWordId::Enabled, "Enabled", LiteralValue::Bool(true)),
    word(LiteralWordId::Active, "Active", LiteralValue::Bool(true)),
    word(LiteralWordId::False, "False", LiteralValue::Bool(false)),
    word(LiteralWordId::No, "No", LiteralValue::Bool(false)),
    word(LiteralWordId::Off, "Off", LiteralValue::Bool(false)),
    word(LiteralWordId::Disabled, "Disabled", LiteralValue::Bool(false)),
    word(LiteralWordId::Inactive, "Inactive", LiteralValue::Bool(false)),
    word(LiteralWordId::Null, "Null", LiteralValue::Null),
    word(LiteralWordId::None, "None", LiteralValue::Null),
    word(LiteralWordId::Void, "Void", LiteralValue::Null),
];

/// Lookup by spelling (case-sensitive).
pub fn from_str(s: &str) -> Option<LiteralWordId> {
    LITERAL_WORDS.iter().find(|w| w.spelling == s).map(|w| w.id)
}

/// Return the spelling of a literal word.
pub fn as_str(id: LiteralWordId) -> &'static str {
    info_for(id).spelling
}

/// Return the constant a literal word denotes.
pub fn value(id: LiteralWordId) -> LiteralValue {
    info_for(id).value
}

/// Return the canonical word for a constant.
pub fn canonical_for(value: LiteralValue) -> LiteralWordId {
    LITERAL_WORDS
        .iter()
        .find(|w| w.value == value)
        .map(|w| w.id)
        .expect("every literal value has a spelling")
}

/// Return the full metadata record for a literal word.
pub fn info_for(id: LiteralWordId) -> &'static LiteralWordInfo {
    LITERAL_WORDS
        .iter()
        .find(|w| w.id == id)
        .expect("literal word info missing")
}

const fn word(id: LiteralWordId, spelling: &'static str, value: LiteralValue) -> LiteralWordInfo {
    LiteralWordInfo { id, spelling, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_spellings() {
        assert_eq!(as_str(canonical_for(LiteralValue::Bool(true))), "True");
        assert_eq!(as_str(canonical_for(LiteralValue::Bool(false))), "False");
        assert_eq!(as_str(canonical_for(LiteralValue::Null)), "Null");
    }

    #[test]
    fn every_word_is_capitalized() {
        for w in LITERAL_WORDS {
            assert!(w.spelling.starts_with(|c: char| c.is_ascii_uppercase()), "{}", w.spelling);
            assert_eq!(from_str(w.spelling), Some(w.id));
        }
    }

    #[test]
    fn lowercase_spellings_are_not_literals() {
        assert_eq!(from_str("true"), None);
        assert_eq!(from_str("null"), None);
    }
}
