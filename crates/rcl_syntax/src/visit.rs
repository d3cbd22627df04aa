//! AST traversal.
//!
//! [`Visitor`] has one method per node kind. Every method defaults to walking the node's children through
//! the matching `walk_*` function, so an implementation overrides only what it cares about and calls the
//! `walk_*` function itself when it still wants to descend.

use crate::ast::*;

pub trait Visitor {
    fn visit_file(&mut self, file: &File) {
        walk_file(self, file);
    }

    fn visit_import(&mut self, _import: &ImportDecl) {}

    fn visit_section(&mut self, section: &Section) {
        walk_section(self, section);
    }

    fn visit_body_item(&mut self, item: &Spanned<BodyItem>) {
        walk_body_item(self, item);
    }

    fn visit_attribute(&mut self, attribute: &AttributeAssignment) {
        walk_attribute(self, attribute);
    }

    fn visit_spread(&mut self, _spread: &SpreadDirective) {}

    fn visit_message(&mut self, message: &MessageDefinition) {
        walk_message(self, message);
    }

    fn visit_match(&mut self, block: &MatchBlock) {
        walk_match(self, block);
    }

    fn visit_transition(&mut self, target: &TransitionTarget) {
        walk_transition(self, target);
    }

    fn visit_parameter(&mut self, param: &Spanned<Parameter>) {
        self.visit_value(&param.node.value().node);
    }

    fn visit_value(&mut self, value: &Value) {
        walk_value(self, value);
    }

    fn visit_string(&mut self, string: &StringLiteral) {
        walk_string(self, string);
    }

    fn visit_variable(&mut self, _path: &VariablePath) {}
}

pub fn walk_file<V: Visitor + ?Sized>(v: &mut V, file: &File) {
    for item in &file.items {
        match &item.node {
            FileItem::Import(import) => v.visit_import(import),
            FileItem::Section(section) => v.visit_section(section),
        }
    }
}

pub fn walk_section<V: Visitor + ?Sized>(v: &mut V, section: &Section) {
    if let Some(label) = &section.header.label {
        v.visit_string(&label.node);
    }
    for param in &section.header.params {
        v.visit_parameter(param);
    }
    for item in &section.body {
        v.visit_body_item(item);
    }
}

pub fn walk_body_item<V: Visitor + ?Sized>(v: &mut V, item: &Spanned<BodyItem>) {
    match &item.node {
        BodyItem::Section(section) => v.visit_section(section),
        BodyItem::Attribute(attribute) => v.visit_attribute(attribute),
        BodyItem::Spread(spread) => v.visit_spread(spread),
        BodyItem::Match(block) => v.visit_match(block),
        BodyItem::Transition(transition) => v.visit_transition(&transition.target),
        BodyItem::StateReference(reference) => v.visit_value(&reference.target.node),
        BodyItem::Message(message) => v.visit_message(message),
        BodyItem::Blank => {}
    }
}

pub fn walk_attribute<V: Visitor + ?Sized>(v: &mut V, attribute: &AttributeAssignment) {
    if let AttributeTarget::Variable(path) = &attribute.target {
        v.visit_variable(&path.node);
    }
    v.visit_value(&attribute.value.node);
}

pub fn walk_message<V: Visitor + ?Sized>(v: &mut V, message: &MessageDefinition) {
    v.visit_string(&message.label.node);
    for param in &message.params {
        v.visit_parameter(param);
    }
    for item in &message.body {
        v.visit_body_item(item);
    }
}

pub fn walk_match<V: Visitor + ?Sized>(v: &mut V, block: &MatchBlock) {
    v.visit_value(&block.scrutinee.node);
    for case in &block.cases {
        if let MatchPattern::String(string) = &case.node.pattern.node {
            v.visit_string(string);
        }
        v.visit_transition(&case.node.target);
    }
}

fn walk_contextualized<V: Visitor + ?Sized>(v: &mut V, target: &ContextualizedValue) {
    v.visit_value(&target.value.node);
    for param in &target.params {
        v.visit_parameter(param);
    }
}

pub fn walk_transition<V: Visitor + ?Sized>(v: &mut V, target: &TransitionTarget) {
    match target {
        TransitionTarget::Value(value) => walk_contextualized(v, value),
        TransitionTarget::Flow(flow) => {
            for param in &flow.params {
                v.visit_parameter(param);
            }
            for handler in &flow.handlers {
                walk_contextualized(v, &handler.node.target);
            }
        }
        TransitionTarget::Context(op) => {
            v.visit_variable(&op.target.node);
            v.visit_value(&op.value.node);
            if let Some(then) = &op.then {
                walk_contextualized(v, then);
            }
        }
    }
}

pub fn walk_value<V: Visitor + ?Sized>(v: &mut V, value: &Value) {
    match value {
        Value::String(string) => v.visit_string(string),
        Value::Variable(path) => v.visit_variable(path),
        Value::List(list) => {
            for item in &list.items {
                v.visit_value(&item.node);
            }
        }
        Value::Dictionary(dict) => {
            for entry in &dict.entries {
                if let DictKey::Quoted(key) = &entry.node.key.node {
                    v.visit_string(key);
                }
                v.visit_value(&entry.node.value.node);
            }
        }
        _ => {}
    }
}

pub fn walk_string<V: Visitor + ?Sized>(v: &mut V, string: &StringLiteral) {
    for interpolation in string.interpolations() {
        match &interpolation.node {
            Interpolation::Path(path) => v.visit_variable(path),
            Interpolation::Value(value) => v.visit_value(value),
        }
    }
}

/// Node counts for a parsed file, as shown by `rcl parse`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    pub imports: usize,
    pub sections: usize,
    pub attributes: usize,
    pub messages: usize,
    pub transitions: usize,
    pub match_blocks: usize,
    pub interpolations: usize,
    pub variables: usize,
}

impl NodeStats {
    pub fn collect(file: &File) -> Self {
        let mut stats = NodeStats::default();
        stats.visit_file(file);
        stats
    }
}

impl Visitor for NodeStats {
    fn visit_import(&mut self, _import: &ImportDecl) {
        self.imports += 1;
    }

    fn visit_section(&mut self, section: &Section) {
        self.sections += 1;
        walk_section(self, section);
    }

    fn visit_attribute(&mut self, attribute: &AttributeAssignment) {
        self.attributes += 1;
        walk_attribute(self, attribute);
    }

    fn visit_message(&mut self, message: &MessageDefinition) {
        self.messages += 1;
        walk_message(self, message);
    }

    fn visit_match(&mut self, block: &MatchBlock) {
        self.match_blocks += 1;
        walk_match(self, block);
    }

    fn visit_transition(&mut self, target: &TransitionTarget) {
        self.transitions += 1;
        walk_transition(self, target);
    }

    fn visit_string(&mut self, string: &StringLiteral) {
        self.interpolations += string.interpolations().count();
        walk_string(self, string);
    }

    fn visit_variable(&mut self, _path: &VariablePath) {
        self.variables += 1;
    }
}

// ============================================================================
// Span erasure (structural comparison)
// ============================================================================

/// Reset every span in the tree to the default.
pub fn erase_spans(file: &mut File) {
    for item in &mut file.items {
        item.span = Span::default();
        match &mut item.node {
            FileItem::Import(import) => {
                for segment in &mut import.path {
                    segment.span = Span::default();
                }
                if let Some(alias) = &mut import.alias {
                    alias.span = Span::default();
                }
            }
            FileItem::Section(section) => erase_section(section),
        }
    }
}

fn erase_section(section: &mut Section) {
    let header = &mut section.header;
    header.section_type.span = Span::default();
    if let Some(id) = &mut header.id {
        id.span = Span::default();
    }
    if let Some(label) = &mut header.label {
        label.span = Span::default();
        erase_string(&mut label.node);
    }
    if let Some(atom) = &mut header.atom {
        atom.span = Span::default();
    }
    erase_params(&mut header.params);
    erase_body(&mut section.body);
}

fn erase_body(body: &mut [Spanned<BodyItem>]) {
    for item in body {
        item.span = Span::default();
        match &mut item.node {
            BodyItem::Section(section) => erase_section(section),
            BodyItem::Attribute(attribute) => {
                match &mut attribute.target {
                    AttributeTarget::Key(key) => key.span = Span::default(),
                    AttributeTarget::Variable(path) => path.span = Span::default(),
                }
                erase_value(&mut attribute.value);
            }
            BodyItem::Spread(spread) => spread.name.span = Span::default(),
            BodyItem::Match(block) => {
                erase_value(&mut block.scrutinee);
                for case in &mut block.cases {
                    case.span = Span::default();
                    case.node.pattern.span = Span::default();
                    if let MatchPattern::String(string) = &mut case.node.pattern.node {
                        erase_string(string);
                    }
                    erase_transition(&mut case.node.target);
                }
            }
            BodyItem::Transition(transition) => erase_transition(&mut transition.target),
            BodyItem::StateReference(reference) => erase_value(&mut reference.target),
            BodyItem::Message(message) => {
                message.message_type.span = Span::default();
                message.name.span = Span::default();
                message.label.span = Span::default();
                erase_string(&mut message.label.node);
                if let Some(atom) = &mut message.atom {
                    atom.span = Span::default();
                }
                erase_params(&mut message.params);
                erase_body(&mut message.body);
            }
            BodyItem::Blank => {}
        }
    }
}

fn erase_contextualized(target: &mut ContextualizedValue) {
    erase_value(&mut target.value);
    erase_params(&mut target.params);
}

fn erase_transition(target: &mut TransitionTarget) {
    match target {
        TransitionTarget::Value(value) => erase_contextualized(value),
        TransitionTarget::Flow(flow) => {
            flow.flow.span = Span::default();
            erase_params(&mut flow.params);
            for handler in &mut flow.handlers {
                handler.span = Span::default();
                handler.node.outcome.span = Span::default();
                erase_contextualized(&mut handler.node.target);
            }
        }
        TransitionTarget::Context(op) => {
            op.target.span = Span::default();
            erase_value(&mut op.value);
            if let Some(then) = &mut op.then {
                erase_contextualized(then);
            }
        }
    }
}

fn erase_params(params: &mut [Spanned<Parameter>]) {
    for param in params {
        param.span = Span::default();
        match &mut param.node {
            Parameter::Named { name, value } => {
                name.span = Span::default();
                erase_value(value);
            }
            Parameter::Keyed { key, value } => {
                key.span = Span::default();
                if let DictKey::Quoted(string) = &mut key.node {
                    erase_string(string);
                }
                erase_value(value);
            }
            Parameter::Positional(value) => erase_value(value),
        }
    }
}

fn erase_value(value: &mut Spanned<Value>) {
    value.span = Span::default();
    erase_value_node(&mut value.node);
}

fn erase_value_node(value: &mut Value) {
    match value {
        Value::String(string) => erase_string(string),
        Value::List(list) => {
            for item in &mut list.items {
                erase_value(item);
            }
        }
        Value::Dictionary(dict) => {
            for entry in &mut dict.entries {
                entry.span = Span::default();
                entry.node.key.span = Span::default();
                if let DictKey::Quoted(string) = &mut entry.node.key.node {
                    erase_string(string);
                }
                erase_value(&mut entry.node.value);
            }
        }
        _ => {}
    }
}

fn erase_string(string: &mut StringLiteral) {
    for part in &mut string.parts {
        if let StringPart::Interpolation(interpolation) = part {
            interpolation.span = Span::default();
            if let Interpolation::Value(value) = &mut interpolation.node {
                erase_value_node(value);
            }
        }
    }
}
