//! Core formatting logic for RCL source
//!
//! Walks the AST and emits canonical source. Values that own an indented block (`|` strings, `$js>>>` code) are
//! written as their marker on the current line; the block body is queued and emitted when the line ends.

use rcl_core::lang::literals;
use rcl_core::lang::markers;
use rcl_syntax::ast::*;

use super::config::FormatConfig;
use super::writer::FormatWriter;

/// Formatter that turns an AST back into source text
pub struct Formatter {
    writer: FormatWriter,
    /// Block bodies of values written on the current line, emitted once it ends.
    pending: Vec<PendingBlock>,
}

struct PendingBlock {
    lines: Vec<String>,
    /// False when the source ended on the last block line without a line break.
    final_break: bool,
}

impl PendingBlock {
    fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            final_break: true,
        }
    }
}

impl Formatter {
    pub fn new(config: &FormatConfig) -> Self {
        Self {
            writer: FormatWriter::new(config),
            pending: Vec::new(),
        }
    }

    /// Format a file and return the source
    pub fn format(mut self, file: &File) -> String {
        self.format_file(file);
        self.writer.finish()
    }

    // ========================================================================
    // File
    // ========================================================================

    fn format_file(&mut self, file: &File) {
        let mut prev_was_import = false;
        for (i, item) in file.items.iter().enumerate() {
            let is_import = matches!(item.node, FileItem::Import(_));
            if i > 0 && !(prev_was_import && is_import) {
                self.writer.newline();
            }
            match &item.node {
                FileItem::Import(import) => self.format_import(import),
                FileItem::Section(section) => self.format_section(section),
            }
            prev_was_import = is_import;
        }
    }

    fn format_import(&mut self, import: &ImportDecl) {
        let path: Vec<&str> = import.path.iter().map(|segment| segment.node.as_str()).collect();
        self.writer.write("import ");
        self.writer.write(&path.join(" / "));
        if let Some(alias) = &import.alias {
            self.writer.write(" as ");
            self.writer.write(&alias.node);
        }
        self.end_line();
    }

    /// End the current line and emit any queued block bodies one level deeper.
    fn end_line(&mut self) {
        self.writer.newline();
        for block in std::mem::take(&mut self.pending) {
            self.writer.indent();
            let last = block.lines.len().saturating_sub(1);
            for (i, line) in block.lines.iter().enumerate() {
                if i == last && !block.final_break {
                    self.writer.write(line);
                } else if line.is_empty() {
                    self.writer.newline();
                } else {
                    self.writer.writeln(line);
                }
            }
            self.writer.dedent();
        }
    }

    // ========================================================================
    // Sections and body items
    // ========================================================================

    fn format_section(&mut self, section: &Section) {
        let header = &section.header;
        let mut line = header.section_type.node.clone();
        if let Some(id) = &header.id {
            line.push(' ');
            line.push_str(&id.node);
        }
        if let Some(label) = &header.label {
            line.push(' ');
            line.push_str(&self.string(&label.node));
        }
        if let Some(atom) = &header.atom {
            line.push(' ');
            line.push_str(&atom_text(&atom.node));
        }
        if !header.params.is_empty() {
            line.push(' ');
            line.push_str(&self.params(&header.params));
        }
        self.writer.write(&line);
        self.end_line();
        self.format_body(&section.body);
    }

    fn format_body(&mut self, body: &[Spanned<BodyItem>]) {
        self.writer.indent();
        for item in body {
            self.format_body_item(&item.node);
        }
        self.writer.dedent();
    }

    fn format_body_item(&mut self, item: &BodyItem) {
        match item {
            BodyItem::Blank => self.writer.newline(),
            BodyItem::Section(section) => self.format_section(section),
            BodyItem::Attribute(attribute) => {
                let prefix = match &attribute.target {
                    AttributeTarget::Key(key) if attribute.after_comma => format!("{}:,", key.node),
                    AttributeTarget::Key(key) => format!("{}:", key.node),
                    AttributeTarget::Variable(path) => format!("{} =", variable_text(&path.node)),
                };
                self.value_line(&prefix, &attribute.value.node);
            }
            BodyItem::Spread(spread) => {
                self.writer.write("...");
                self.writer.write(&spread.name.node);
                self.end_line();
            }
            BodyItem::Match(block) => {
                let scrutinee = self.inline(&block.scrutinee.node);
                self.writer.write("match ");
                self.writer.write(&scrutinee);
                self.end_line();
                self.writer.indent();
                for case in &block.cases {
                    let pattern = self.pattern(&case.node.pattern.node);
                    self.writer.write(&pattern);
                    self.writer.write(" -> ");
                    self.format_transition(&case.node.target);
                }
                self.writer.dedent();
            }
            BodyItem::Transition(transition) => {
                self.writer.write("-> ");
                self.format_transition(&transition.target);
            }
            BodyItem::StateReference(reference) => {
                let target = self.inline(&reference.target.node);
                self.writer.write(&target);
                self.end_line();
            }
            BodyItem::Message(message) => self.format_message(message),
        }
    }

    fn format_message(&mut self, message: &MessageDefinition) {
        let mut line = format!(
            "{} {} {}",
            message.message_type.node,
            message.name.node,
            self.string(&message.label.node)
        );
        if let Some(atom) = &message.atom {
            line.push(' ');
            line.push_str(&atom_text(&atom.node));
        }
        if !message.params.is_empty() {
            line.push(' ');
            line.push_str(&self.params(&message.params));
        }
        self.writer.write(&line);
        self.end_line();
        if !message.body.is_empty() {
            self.format_body(&message.body);
        }
    }

    /// `prefix value` on one line, or `prefix` followed by an indented block collection.
    fn value_line(&mut self, prefix: &str, value: &Value) {
        match value {
            Value::List(list) if list.form == CollectionForm::Block && !list.items.is_empty() => {
                self.writer.write(prefix);
                self.end_line();
                self.writer.indent();
                for item in &list.items {
                    self.value_line("-", &item.node);
                }
                self.writer.dedent();
            }
            Value::Dictionary(dict) if dict.form == CollectionForm::Block && !dict.entries.is_empty() => {
                self.writer.write(prefix);
                self.end_line();
                self.writer.indent();
                for entry in &dict.entries {
                    let key = self.key(&entry.node.key.node);
                    self.value_line(&key, &entry.node.value.node);
                }
                self.writer.dedent();
            }
            Value::Omitted => {
                self.writer.write(prefix);
                self.end_line();
            }
            _ => {
                let text = self.inline(value);
                self.writer.write(prefix);
                self.writer.write(" ");
                self.writer.write(&text);
                self.end_line();
            }
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// The rest of a transition line, its end, and any handler block.
    fn format_transition(&mut self, target: &TransitionTarget) {
        match target {
            TransitionTarget::Value(value) => {
                let text = self.contextualized(value);
                self.writer.write(&text);
                self.end_line();
            }
            TransitionTarget::Flow(flow) => {
                let mut line = format!("start {}", flow.flow.node);
                if !flow.params.is_empty() {
                    line.push_str(" with ");
                    line.push_str(&self.params(&flow.params));
                }
                self.writer.write(&line);
                self.end_line();
                self.writer.indent();
                for handler in &flow.handlers {
                    let target = self.contextualized(&handler.node.target);
                    self.writer.write("on ");
                    self.writer.write(&atom_text(&handler.node.outcome.node));
                    self.writer.write(" -> ");
                    self.writer.write(&target);
                    self.end_line();
                }
                self.writer.dedent();
            }
            TransitionTarget::Context(op) => {
                let target = variable_text(&op.target.node);
                let value = self.inline(&op.value.node);
                let mut line = match op.kind {
                    ContextOpKind::Set => format!("set {target} to {value}"),
                    ContextOpKind::Append => format!("append {value} to {target}"),
                    ContextOpKind::Merge => format!("merge {value} into {target}"),
                };
                if let Some(then) = &op.then {
                    line.push_str(" -> ");
                    line.push_str(&self.contextualized(then));
                }
                self.writer.write(&line);
                self.end_line();
            }
        }
    }

    fn contextualized(&mut self, value: &ContextualizedValue) -> String {
        let mut out = self.inline(&value.value.node);
        if !value.params.is_empty() {
            out.push_str(" with ");
            out.push_str(&self.params(&value.params));
        }
        out
    }

    fn pattern(&mut self, pattern: &MatchPattern) -> String {
        match pattern {
            MatchPattern::String(s) => self.string(s),
            MatchPattern::Number(n) => n.raw.clone(),
            MatchPattern::Atom(atom) => atom_text(atom),
            MatchPattern::Regex(regex) => regex_text(regex),
            MatchPattern::Default => format!("{}{}", markers::ATOM_PREFIX, markers::DEFAULT_CASE),
        }
    }

    // ========================================================================
    // Parameters and values
    // ========================================================================

    fn params(&mut self, params: &[Spanned<Parameter>]) -> String {
        let mut parts = Vec::with_capacity(params.len());
        for param in params {
            let text = match &param.node {
                Parameter::Named { name, value } if value.node.is_omitted() => format!("{}:", name.node),
                Parameter::Named { name, value } => format!("{}: {}", name.node, self.inline(&value.node)),
                Parameter::Keyed { key, value } => {
                    let value = self.inline(&value.node);
                    match &key.node {
                        DictKey::Name(name) => format!("{name} : {value}"),
                        DictKey::Quoted(s) => format!("{}: {value}", self.string(s)),
                    }
                }
                Parameter::Positional(value) => self.inline(&value.node),
            };
            parts.push(text);
        }
        parts.join(", ")
    }

    /// A dictionary key with its colon.
    fn key(&mut self, key: &DictKey) -> String {
        match key {
            DictKey::Name(name) => format!("{name}:"),
            DictKey::Quoted(s) => format!("{}:", self.string(s)),
        }
    }

    /// A value as it appears inside a line.
    fn inline(&mut self, value: &Value) -> String {
        match value {
            Value::String(s) => self.string(s),
            Value::Regex(regex) => regex_text(regex),
            Value::Number(n) => n.raw.clone(),
            Value::Boolean { word, .. } | Value::Null(word) => literals::as_str(*word).to_string(),
            Value::Atom(atom) => atom_text(atom),
            Value::TypeTag(tag) => type_tag_text(tag),
            Value::Identifier(name) => name.clone(),
            Value::Variable(path) => variable_text(path),
            Value::List(list) => {
                let mut items = Vec::with_capacity(list.items.len());
                for item in &list.items {
                    items.push(self.inline(&item.node));
                }
                format!("({})", items.join(", "))
            }
            Value::Dictionary(dict) => {
                let mut entries = Vec::with_capacity(dict.entries.len());
                for entry in &dict.entries {
                    let key = self.key(&entry.node.key.node);
                    let value = self.inline(&entry.node.value.node);
                    entries.push(format!("{key} {value}"));
                }
                format!("{{{}}}", entries.join(", "))
            }
            Value::Code(code) => match code.form {
                CodeForm::Inline => {
                    let marker = markers::single_line_code_marker(code.language);
                    if code.code.is_empty() {
                        marker.to_string()
                    } else {
                        format!("{marker} {}", code.code)
                    }
                }
                CodeForm::Fenced => {
                    self.pending
                        .push(PendingBlock::new(code.code.split('\n').map(str::to_string).collect()));
                    markers::fenced_code_marker(code.language).to_string()
                }
            },
            Value::MultiLine(text) => {
                self.pending.push(PendingBlock {
                    lines: text.segments.iter().map(|segment| segment.text.clone()).collect(),
                    final_break: text.segments.last().is_none_or(|segment| segment.newline),
                });
                markers::trim_marker(text.mode).to_string()
            }
            Value::Omitted => String::new(),
        }
    }

    fn string(&mut self, s: &StringLiteral) -> String {
        let quote = if s.triple { markers::TRIPLE_QUOTE } else { "\"" };
        let mut out = String::from(quote);
        for part in &s.parts {
            match part {
                StringPart::Text(text) => out.push_str(&escape(text, s.triple)),
                StringPart::Interpolation(interpolation) => {
                    out.push_str(markers::INTERPOLATION_OPENERS[0]);
                    match &interpolation.node {
                        Interpolation::Path(path) => out.push_str(&variable_text(path)),
                        Interpolation::Value(value) => {
                            let text = self.inline(value);
                            out.push_str(&text);
                        }
                    }
                    out.push(markers::INTERPOLATION_CLOSE);
                }
            }
        }
        out.push_str(quote);
        out
    }
}

/// Escape string text so it re-lexes to the same content.
fn escape(text: &str, triple: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' if !triple => out.push_str("\\n"),
            '\t' if !triple => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '#' | '$' if chars.peek() == Some(&'{') => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn atom_text(atom: &Atom) -> String {
    if atom.quoted {
        format!("{}\"{}\"", markers::ATOM_PREFIX, escape(&atom.name, false))
    } else {
        format!("{}{}", markers::ATOM_PREFIX, atom.name)
    }
}

fn regex_text(regex: &RegexLiteral) -> String {
    format!("/{}/{}", regex.pattern, regex.flags)
}

fn variable_text(path: &VariablePath) -> String {
    let mut out = String::new();
    if let Some(sigil) = path.sigil {
        out.push(sigil.as_char());
    }
    out.push_str(&path.root);
    for segment in &path.segments {
        out.push('.');
        out.push_str(segment);
    }
    out
}

fn type_tag_text(tag: &TypeTag) -> String {
    let mut out = format!("{}{}", markers::TYPE_TAG_OPEN, tag.type_name);
    if let Some(content) = tag.content.as_deref().filter(|c| !c.is_empty()) {
        out.push(' ');
        out.push_str(content);
    }
    if let Some(secondary) = &tag.secondary {
        out.push(' ');
        out.push(markers::TYPE_TAG_PIPE);
        if !secondary.is_empty() {
            out.push(' ');
            out.push_str(secondary);
        }
    }
    out.push(markers::TYPE_TAG_CLOSE);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_single_line() {
        assert_eq!(escape("a\"b\\c\nd", false), "a\\\"b\\\\c\\nd");
        assert_eq!(escape("cost #{x} and ${y} #1", false), "cost \\#{x} and \\${y} #1");
    }

    #[test]
    fn test_escape_triple_keeps_newlines() {
        assert_eq!(escape("one\ntwo", true), "one\ntwo");
    }

    #[test]
    fn test_type_tag_text() {
        let tag = TypeTag {
            type_name: "date".into(),
            content: Some("2024-01-01".into()),
            secondary: Some(String::new()),
        };
        assert_eq!(type_tag_text(&tag), "<date 2024-01-01 |>");
    }

    #[test]
    fn test_quoted_atom() {
        let atom = Atom {
            name: "two words".into(),
            quoted: true,
        };
        assert_eq!(atom_text(&atom), ":\"two words\"");
    }
}
