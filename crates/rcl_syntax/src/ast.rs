//! Abstract Syntax Tree definitions for RCL
//!
//! A [`File`] owns its whole subtree. Nodes are plain enums and structs; consumers walk them by pattern matching
//! or through the [`crate::visit`] traits.

use rcl_core::lang::literals::{self, LiteralValue, LiteralWordId};
use rcl_core::lang::markers::{CodeLanguage, Sigil, TrimMode};

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`.
    pub fn point(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Names as written in source. Title-case identifiers may contain single spaces (`Customer Support`).
pub type Ident = String;

/// A compilation unit: imports and top-level sections in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct File {
    pub items: Vec<Spanned<FileItem>>,
}

impl File {
    /// Return a copy of this tree with every span reset, for structural comparison.
    pub fn without_spans(&self) -> File {
        let mut copy = self.clone();
        crate::visit::erase_spans(&mut copy);
        copy
    }

    /// Compare two trees ignoring source positions.
    pub fn same_shape(&self, other: &File) -> bool {
        self.without_spans() == other.without_spans()
    }

    /// Iterate the top-level sections.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.items.iter().filter_map(|item| match &item.node {
            FileItem::Section(section) => Some(section),
            FileItem::Import(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileItem {
    Import(ImportDecl),
    Section(Section),
}

/// `import Shared / Common Flows as Common`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub path: Vec<Spanned<Ident>>,
    pub alias: Option<Spanned<Ident>>,
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub header: SectionHeader,
    pub body: Vec<Spanned<BodyItem>>,
}

/// Section header.
///
/// Two header forms exist: `type [Identifier] [params]` and `type "label" [:atom] [params]`. Only one of `id`
/// and `label` is ever set by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionHeader {
    pub section_type: Spanned<Ident>,
    pub id: Option<Spanned<Ident>>,
    pub label: Option<Spanned<StringLiteral>>,
    pub atom: Option<Spanned<Atom>>,
    pub params: Vec<Spanned<Parameter>>,
}

impl SectionHeader {
    pub fn new(section_type: Spanned<Ident>) -> Self {
        Self {
            section_type,
            id: None,
            label: None,
            atom: None,
            params: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyItem {
    Section(Section),
    Attribute(AttributeAssignment),
    Spread(SpreadDirective),
    Match(MatchBlock),
    Transition(SimpleTransition),
    StateReference(StateReference),
    Message(MessageDefinition),
    /// An empty source line, kept so printers can reproduce vertical spacing.
    Blank,
}

/// `text Welcome "Hello #{@user.name}!" :transactional`
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDefinition {
    pub message_type: Spanned<Ident>,
    pub name: Spanned<Ident>,
    pub label: Spanned<StringLiteral>,
    pub atom: Option<Spanned<Atom>>,
    pub params: Vec<Spanned<Parameter>>,
    pub body: Vec<Spanned<BodyItem>>,
}

// ============================================================================
// Attributes, spreads, state references
// ============================================================================

/// What an attribute assigns to.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeTarget {
    /// `displayName: ...`
    Key(Spanned<Ident>),
    /// `$greeting = ...`
    Variable(Spanned<VariablePath>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeAssignment {
    pub target: AttributeTarget,
    /// [`Value::Omitted`] for a bare `name:` line.
    pub value: Spanned<Value>,
    /// `name:, value` (the comma marks a continuation of a multi-value attribute).
    pub after_comma: bool,
}

/// `...Shared Defaults`
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadDirective {
    pub name: Spanned<Ident>,
}

/// A bare identifier or variable path on its own line.
#[derive(Debug, Clone, PartialEq)]
pub struct StateReference {
    pub target: Spanned<Value>,
}

// ============================================================================
// Transitions and match blocks
// ============================================================================

/// `-> Target with x: 1`
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleTransition {
    pub target: TransitionTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionTarget {
    Value(ContextualizedValue),
    Flow(FlowInvocation),
    Context(ContextOperation),
}

/// A value plus the optional `with` parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextualizedValue {
    pub value: Spanned<Value>,
    pub params: Vec<Spanned<Parameter>>,
}

/// `-> start Checkout with id: 1`, optionally followed by indented `on :end -> Done` handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowInvocation {
    pub flow: Spanned<Ident>,
    pub params: Vec<Spanned<Parameter>>,
    pub handlers: Vec<Spanned<FlowHandler>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowHandler {
    pub outcome: Spanned<Atom>,
    pub target: ContextualizedValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextOpKind {
    /// `set @target to value`
    Set,
    /// `append value to @target`
    Append,
    /// `merge value into @target`
    Merge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContextOperation {
    pub kind: ContextOpKind,
    pub target: Spanned<VariablePath>,
    pub value: Spanned<Value>,
    /// Continuation after a second `->`.
    pub then: Option<Box<ContextualizedValue>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchBlock {
    pub scrutinee: Spanned<Value>,
    /// Source order; the first matching case wins.
    pub cases: Vec<Spanned<MatchCase>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    pub pattern: Spanned<MatchPattern>,
    pub target: TransitionTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchPattern {
    String(StringLiteral),
    Number(NumberLiteral),
    Atom(Atom),
    Regex(RegexLiteral),
    /// `:default`
    Default,
}

// ============================================================================
// Parameters
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// `size: "small"` (attribute-name token). The value may be [`Value::Omitted`].
    Named { name: Spanned<Ident>, value: Spanned<Value> },
    /// `size : "small"` or `"Size": "small"`.
    Keyed { key: Spanned<DictKey>, value: Spanned<Value> },
    Positional(Spanned<Value>),
}

impl Parameter {
    pub fn value(&self) -> &Spanned<Value> {
        match self {
            Parameter::Named { value, .. } | Parameter::Keyed { value, .. } => value,
            Parameter::Positional(value) => value,
        }
    }
}

// ============================================================================
// Values
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(StringLiteral),
    Regex(RegexLiteral),
    Number(NumberLiteral),
    Boolean { value: bool, word: LiteralWordId },
    Null(LiteralWordId),
    Atom(Atom),
    TypeTag(TypeTag),
    Identifier(Ident),
    Variable(VariablePath),
    List(ListValue),
    Dictionary(DictValue),
    Code(EmbeddedCode),
    MultiLine(MultiLineString),
    /// Explicitly absent value (bare `name:`).
    Omitted,
}

impl Value {
    /// Build a boolean or null value from its literal word.
    pub fn from_literal_word(word: LiteralWordId) -> Value {
        match literals::value(word) {
            LiteralValue::Bool(value) => Value::Boolean { value, word },
            LiteralValue::Null => Value::Null(word),
        }
    }

    pub fn is_omitted(&self) -> bool {
        matches!(self, Value::Omitted)
    }

    /// Short human-readable name of the variant, for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Regex(_) => "regex",
            Value::Number(_) => "number",
            Value::Boolean { .. } => "boolean",
            Value::Null(_) => "null",
            Value::Atom(_) => "atom",
            Value::TypeTag(_) => "type tag",
            Value::Identifier(_) => "identifier",
            Value::Variable(_) => "variable",
            Value::List(_) => "list",
            Value::Dictionary(_) => "dictionary",
            Value::Code(_) => "embedded code",
            Value::MultiLine(_) => "multi-line string",
            Value::Omitted => "omitted value",
        }
    }
}

/// A single- or triple-quoted string. Text parts hold unescaped content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringLiteral {
    pub triple: bool,
    pub parts: Vec<StringPart>,
}

impl StringLiteral {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            triple: false,
            parts: vec![StringPart::Text(text.into())],
        }
    }

    /// Concatenated text if the string has no interpolations.
    pub fn as_plain(&self) -> Option<String> {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                StringPart::Text(text) => out.push_str(text),
                StringPart::Interpolation(_) => return None,
            }
        }
        Some(out)
    }

    pub fn interpolations(&self) -> impl Iterator<Item = &Spanned<Interpolation>> {
        self.parts.iter().filter_map(|part| match part {
            StringPart::Interpolation(interp) => Some(interp),
            StringPart::Text(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    Text(String),
    Interpolation(Spanned<Interpolation>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Interpolation {
    /// `#{@user.name}`, `${name}`
    Path(VariablePath),
    /// Any other value, e.g. `#{<date 2024-01-01>}`.
    Value(Box<Value>),
}

/// `$name.segment...`; the sigil is absent only for bare paths inside an interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct VariablePath {
    pub sigil: Option<Sigil>,
    pub root: Ident,
    pub segments: Vec<Ident>,
}

/// Number with its source spelling.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub raw: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegexLiteral {
    /// Pattern text as written between the slashes (escapes kept).
    pub pattern: String,
    pub flags: String,
}

/// `:name` or `:"quoted name"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub name: String,
    pub quoted: bool,
}

/// `<date 2024-01-01 | %Y-%m-%d>`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeTag {
    pub type_name: Ident,
    pub content: Option<String>,
    pub secondary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionForm {
    /// `( ... )` or `{ ... }` on one logical line.
    Inline,
    /// An indented block of `- item` lines or `key: value` lines.
    Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
    pub form: CollectionForm,
    pub items: Vec<Spanned<Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictValue {
    pub form: CollectionForm,
    pub entries: Vec<Spanned<DictEntry>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictEntry {
    pub key: Spanned<DictKey>,
    pub value: Spanned<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DictKey {
    Name(Ident),
    Quoted(StringLiteral),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeForm {
    /// `$js> code` to end of line.
    Inline,
    /// `$js>>>` followed by an indented block.
    Fenced,
}

/// Embedded code, kept as an opaque string.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedCode {
    pub language: CodeLanguage,
    pub form: CodeForm,
    pub code: String,
}

/// Block scalar string after trim-mode processing.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLineString {
    pub mode: TrimMode,
    pub segments: Vec<TextSegment>,
}

impl MultiLineString {
    /// The string value: segments joined, each followed by `\n` when newline-terminated.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(&segment.text);
            if segment.newline {
                out.push('\n');
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    pub newline: bool,
}
