//! Shareable metadata for `rcl_core::lang` registries.
//!
//! Every registry table stores the same provenance fields; this submodule defines them once.
//!
//! ## Notes
//! - These types are `Copy` so registries can live in `const` tables.
//! - Metadata is meant for tooling and diagnostics; syntax rules live in the lexer/parser.

/// Language version that introduced a vocabulary item, as `(major, minor)`.
///
/// ## Examples
/// ```rust
/// use rcl_core::lang::registry::Since;
///
/// let since = Since(0, 1);
/// assert_eq!(since.to_string(), "0.1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Since(pub u16, pub u16);

impl std::fmt::Display for Since {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

/// Describe the lifecycle status of a vocabulary item.
///
/// ## Examples
/// ```rust
/// use rcl_core::lang::registry::Stability;
///
/// let s = Stability::Stable;
/// assert_eq!(format!("{s:?}"), "Stable");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Draft,
    Deprecated,
}

/// Represent a small example snippet for documentation.
///
/// ## Examples
/// ```rust
/// use rcl_core::lang::registry::Example;
///
/// let ex = Example {
///     code: "match @reply.text\n  :default -> Menu",
///     note: Some("Catch-all branch."),
/// };
/// assert!(ex.code.contains("match"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}
