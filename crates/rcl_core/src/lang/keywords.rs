//! Keyword vocabulary.
//!
//! RCL has two kinds of keywords:
//! - **reserved** words (`import`, `as`, `with`, `match`) that the lexer always turns into keyword tokens;
//! - **contextual** words (`start`, `on`, `set`, ...) that lex as ordinary lower names and are only
//!   recognized by the parser in the one position where they carry meaning. `on`, for instance, is also a
//!   perfectly good section type.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - [`reserved_from_str`] is what the lexer uses; contextual words never become keyword tokens.
//!
//! ## Examples
//! ```rust
//! use rcl_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::reserved_from_str("with"), Some(KeywordId::With));
//! assert_eq!(keywords::reserved_from_str("start"), None);
//! assert_eq!(keywords::from_str("start"), Some(KeywordId::Start));
//! ```

use super::registry::{Example, Since, Stability};

/// Whether the lexer reserves the spelling or the parser recognizes it in context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    Reserved,
    Contextual,
}

/// Where a keyword is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Module-level declarations (`import`, `as`).
    Module,
    /// Branching and arguments (`match`, `with`).
    Flow,
    /// Flow invocation (`start`, `on`).
    Invocation,
    /// Context mutation inside transitions (`set`, `append`, `merge`, `to`, `into`).
    Context,
}

/// Stable identifier for keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    Import,
    As,
    With,
    Match,
    Start,
    On,
    Set,
    Append,
    Merge,
    To,
    Into,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub kind: KeywordKind,
    pub category: KeywordCategory,
    pub description: &'static str,
    pub since: Since,
    pub stability: Stability,
    pub examples: &'static [Example],
}

/// Registry of all keywords.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Module
    reserved(
        KeywordId::Import,
        "import",
        KeywordCategory::Module,
        "Bring a shared definition into scope by slash-separated path.",
        &[Example {
            code: "import Shared / Common Flows as Common",
            note: None,
        }],
    ),
    reserved(
        KeywordId::As,
        "as",
        KeywordCategory::Module,
        "Alias an imported path.",
        &[],
    ),
    // Flow
    reserved(
        KeywordId::With,
        "with",
        KeywordCategory::Flow,
        "Attach a parameter list to a transition or match target.",
        &[Example {
            code: "-> Choose Size with size: \"small\"",
            note: None,
        }],
    ),
    reserved(
        KeywordId::Match,
        "match",
        KeywordCategory::Flow,
        "Branch on a scrutinee value; cases are tried in textual order.",
        &[Example {
            code: "match @reply.text\n  \"Yes\" -> Confirm\n  :default -> Menu",
            note: Some("The first matching case wins."),
        }],
    ),
    // Invocation
    contextual(
        KeywordId::Start,
        "start",
        KeywordCategory::Invocation,
        "Invoke another flow from a transition.",
        &[Example {
            code: "-> start Checkout with id: @cart.id",
            note: None,
        }],
    ),
    contextual(
        KeywordId::On,
        "on",
        KeywordCategory::Invocation,
        "Handle an outcome of an invoked flow.",
        &[Example {
            code: "on :end -> Thanks",
            note: None,
        }],
    ),
    // Context
    contextual(
        KeywordId::Set,
        "set",
        KeywordCategory::Context,
        "Assign a value to a context variable before transitioning.",
        &[],
    ),
    contextual(
        KeywordId::Append,
        "append",
        KeywordCategory::Context,
        "Append a value to a context list before transitioning.",
        &[],
    ),
    contextual(
        KeywordId::Merge,
        "merge",
        KeywordCategory::Context,
        "Merge a dictionary into a context variable before transitioning.",
        &[],
    ),
    contextual(
        KeywordId::To,
        "to",
        KeywordCategory::Context,
        "Separates target and value in `set` and `append`.",
        &[],
    ),
    contextual(
        KeywordId::Into,
        "into",
        KeywordCategory::Context,
        "Separates value and target in `merge`.",
        &[],
    ),
];

/// Return the canonical spelling for a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Return whether the keyword is reserved or contextual.
pub fn kind(id: KeywordId) -> KeywordKind {
    info_for(id).kind
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Return the full metadata record for a keyword.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (a programming error caught by the registry tests).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup any keyword (reserved or contextual) by spelling.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

/// Lookup a reserved keyword by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` only for words the lexer must turn into keyword tokens.
pub fn reserved_from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS
        .iter()
        .find(|k| k.kind == KeywordKind::Reserved && k.canonical == s)
        .map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn reserved(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    description: &'static str,
    examples: &'static [Example],
) -> KeywordInfo {
    info(id, canonical, KeywordKind::Reserved, category, description, examples)
}

const fn contextual(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    description: &'static str,
    examples: &'static [Example],
) -> KeywordInfo {
    info(id, canonical, KeywordKind::Contextual, category, description, examples)
}

const fn info(
    id: KeywordId,
    canonical: &'static str,
    kind: KeywordKind,
    category: KeywordCategory,
    description: &'static str,
    examples: &'static [Example],
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        kind,
        category,
        description,
        since: Since(0, 1),
        stability: Stability::Stable,
        examples,
    }
}
