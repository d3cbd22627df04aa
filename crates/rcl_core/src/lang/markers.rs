//! Mode-switching markers.
//!
//! These spellings move the lexer out of its default mode: block-scalar openers, embedded-code
//! openers, string and interpolation delimiters, type-tag brackets, and variable sigils.
//!
//! ## Examples
//! ```rust
//! use rcl_core::lang::markers::{self, CodeLanguage, TrimMode};
//!
//! assert_eq!(markers::trim_mode_from_str("+|+"), Some(TrimMode::PreserveAll));
//! assert_eq!(markers::fenced_code_marker(CodeLanguage::TypeScript), "$ts>>>");
//! assert_eq!(markers::code_language_from_tag("js"), Some(CodeLanguage::JavaScript));
//! ```

/// Block-scalar trim mode, selected by the marker that opens the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrimMode {
    /// `|`: block indentation stripped, exactly one trailing newline.
    Clean,
    /// `|-`: like `Clean`, and every line trimmed on both sides.
    Trim,
    /// `+|`: block indentation stripped, every other byte kept.
    Preserve,
    /// `+|+`: byte-exact apart from the common minimal indentation.
    PreserveAll,
}

/// Metadata for a block-scalar marker.
#[derive(Debug, Clone, Copy)]
pub struct TrimModeInfo {
    pub mode: TrimMode,
    pub marker: &'static str,
    pub name: &'static str,
}

/// Registry of block-scalar markers, longest spelling first.
pub const TRIM_MODES: &[TrimModeInfo] = &[
    TrimModeInfo {
        mode: TrimMode::PreserveAll,
        marker: "+|+",
        name: "preserve-all",
    },
    TrimModeInfo {
        mode: TrimMode::Preserve,
        marker: "+|",
        name: "preserve",
    },
    TrimModeInfo {
        mode: TrimMode::Trim,
        marker: "|-",
        name: "trim",
    },
    TrimModeInfo {
        mode: TrimMode::Clean,
        marker: "|",
        name: "clean",
    },
];

/// Return the marker spelling for a trim mode.
pub fn trim_marker(mode: TrimMode) -> &'static str {
    trim_info(mode).marker
}

/// Return the human-readable name of a trim mode.
pub fn trim_name(mode: TrimMode) -> &'static str {
    trim_info(mode).name
}

/// Lookup a trim mode by its exact marker spelling.
pub fn trim_mode_from_str(s: &str) -> Option<TrimMode> {
    TRIM_MODES.iter().find(|t| t.marker == s).map(|t| t.mode)
}

fn trim_info(mode: TrimMode) -> &'static TrimModeInfo {
    TRIM_MODES
        .iter()
        .find(|t| t.mode == mode)
        .expect("trim mode info missing")
}

/// Language of an embedded code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeLanguage {
    /// `$>` / `$>>>`: the consumer decides.
    Unspecified,
    JavaScript,
    TypeScript,
}

/// Metadata for an embedded-code language tag.
#[derive(Debug, Clone, Copy)]
pub struct CodeLanguageInfo {
    pub language: CodeLanguage,
    /// Text between `$` and `>`; empty for [`CodeLanguage::Unspecified`].
    pub tag: &'static str,
    pub single_line: &'static str,
    pub fenced: &'static str,
}

/// Registry of embedded-code languages.
pub const CODE_LANGUAGES: &[CodeLanguageInfo] = &[
    CodeLanguageInfo {
        language: CodeLanguage::JavaScript,
        tag: "js",
        single_line: "$js>",
        fenced: "$js>>>",
    },
    CodeLanguageInfo {
        language: CodeLanguage::TypeScript,
        tag: "ts",
        single_line: "$ts>",
        fenced: "$ts>>>",
    },
    CodeLanguageInfo {
        language: CodeLanguage::Unspecified,
        tag: "",
        single_line: "$>",
        fenced: "$>>>",
    },
];

/// Lookup a language by the tag written between `$` and `>`.
pub fn code_language_from_tag(tag: &str) -> Option<CodeLanguage> {
    CODE_LANGUAGES.iter().find(|c| c.tag == tag).map(|c| c.language)
}

/// Return the tag written between `$` and `>`.
pub fn code_language_tag(language: CodeLanguage) -> &'static str {
    code_info(language).tag
}

/// Return the single-line embedded-code marker, e.g. `$js>`.
pub fn single_line_code_marker(language: CodeLanguage) -> &'static str {
    code_info(language).single_line
}

/// Return the fenced embedded-code marker, e.g. `$js>>>`.
pub fn fenced_code_marker(language: CodeLanguage) -> &'static str {
    code_info(language).fenced
}

fn code_info(language: CodeLanguage) -> &'static CodeLanguageInfo {
    CODE_LANGUAGES
        .iter()
        .find(|c| c.language == language)
        .expect("code language info missing")
}

/// Sigil that introduces a variable path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sigil {
    /// `$name`
    Dollar,
    /// `@name`
    At,
}

impl Sigil {
    pub fn from_char(c: char) -> Option<Sigil> {
        match c {
            '$' => Some(Sigil::Dollar),
            '@' => Some(Sigil::At),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Sigil::Dollar => '$',
            Sigil::At => '@',
        }
    }
}

/// Starts a line comment in the default mode.
pub const COMMENT: char = '#';
/// Delimits a triple-quoted string.
pub const TRIPLE_QUOTE: &str = "\"\"\"";
/// Delimits a single-line string.
pub const QUOTE: char = '"';
/// Interpolation openers recognized inside strings. The first is canonical.
pub const INTERPOLATION_OPENERS: &[&str] = &["#{", "${"];
/// Closes an interpolation.
pub const INTERPOLATION_CLOSE: char = '}';
/// Opens a type tag.
pub const TYPE_TAG_OPEN: char = '<';
/// Separates primary and secondary type-tag content.
pub const TYPE_TAG_PIPE: char = '|';
/// Closes a type tag.
pub const TYPE_TAG_CLOSE: char = '>';
/// Atom prefix.
pub const ATOM_PREFIX: char = ':';
/// Name of the catch-all match pattern (`:default`).
pub const DEFAULT_CASE: &str = "default";
/// Delimits a regex literal.
pub const REGEX_DELIMITER: char = '/';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_markers_are_longest_first() {
        for (i, t) in TRIM_MODES.iter().enumerate() {
            for later in &TRIM_MODES[i + 1..] {
                assert!(
                    !later.marker.starts_with(t.marker),
                    "{} would shadow {}",
                    t.marker,
                    later.marker
                );
            }
        }
    }

    #[test]
    fn code_markers_are_built_from_their_tag() {
        for c in CODE_LANGUAGES {
            assert_eq!(c.single_line, format!("${}>", c.tag));
            assert_eq!(c.fenced, format!("${}>>>", c.tag));
            assert_eq!(code_language_from_tag(c.tag), Some(c.language));
        }
    }

    #[test]
    fn sigils_round_trip() {
        for s in [Sigil::Dollar, Sigil::At] {
            assert_eq!(Sigil::from_char(s.as_char()), Some(s));
        }
    }
}
