//! XML dump of a tree for debugging
//!
//! One element per node, named after its kind, children nested in order.
//! Positions are written only when valid.

use crate::decl::Decl;
use crate::expr::{Expr, Literal};
use crate::node::{NodeData, NodeId};
use crate::parts::{CaseClause, Name, TypeName};
use crate::stmt::Stmt;
use crate::tree::SyntaxTree;
use std::fmt::Write;

/// Dump options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    /// Write `startLine`/`startCol`/`endLine`/`endCol` attributes
    pub positions: bool,
    /// Spaces per nesting level
    pub indent: usize,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            positions: true,
            indent: 2,
        }
    }
}

/// Dumps the whole tree
#[must_use]
pub fn dump(tree: &SyntaxTree, options: DumpOptions) -> String {
    dump_node(tree, tree.root(), options)
}

/// Dumps the subtree rooted at `id`
#[must_use]
pub fn dump_node(tree: &SyntaxTree, id: NodeId, options: DumpOptions) -> String {
    let mut writer = XmlWriter {
        tree,
        options,
        output: String::new(),
    };
    writer.element(id, 0);
    writer.output
}

struct XmlWriter<'tree> {
    tree: &'tree SyntaxTree,
    options: DumpOptions,
    output: String,
}

impl XmlWriter<'_> {
    fn element(&mut self, id: NodeId, depth: usize) {
        let tree = self.tree;
        let node = &tree[id];
        let pad = " ".repeat(depth * self.options.indent);
        let mut attributes = Vec::new();
        if self.options.positions {
            let span = node.span();
            if span.start().is_valid() {
                attributes.push(("startLine", span.start().line.to_string()));
                attributes.push(("startCol", span.start().column.to_string()));
            }
            if let Some(finish) = span.finish().filter(|finish| finish.is_valid()) {
                attributes.push(("endLine", finish.line.to_string()));
                attributes.push(("endCol", finish.column.to_string()));
            }
        }
        attributes.extend(kind_attributes(node.data()));

        let _ = write!(self.output, "{pad}<{}", node.kind());
        for (name, value) in &attributes {
            let _ = write!(self.output, " {name}=\"{}\"", escape(value));
        }
        let text = match node.data() {
            NodeData::Comment(comment) => Some(comment.text.as_str()),
            _ => None,
        };
        if node.children().is_empty() && text.is_none() {
            self.output.push_str(" />\n");
            return;
        }
        self.output.push('>');
        if let Some(text) = text {
            self.output.push_str(&escape(text));
        }
        if !node.children().is_empty() {
            self.output.push('\n');
            for &child in node.children() {
                self.element(child, depth + 1);
            }
            self.output.push_str(&pad);
        }
        let _ = writeln!(self.output, "</{}>", node.kind());
    }
}

fn kind_attributes(data: &NodeData) -> Vec<(&'static str, String)> {
    match data {
        NodeData::Name(Name::Simple(simple)) => {
            let mut attributes = vec![("name", simple.text.clone())];
            if let Some(suffix) = simple.type_character {
                attributes.push(("typeCharacter", suffix.to_string()));
            }
            if simple.escaped {
                attributes.push(("escaped", "true".to_owned()));
            }
            attributes
        }
        NodeData::Name(Name::Special(special)) => vec![("name", special.to_string())],
        NodeData::Type(TypeName::Intrinsic(intrinsic)) => {
            vec![("type", intrinsic.to_string())]
        }
        NodeData::Type(TypeName::Array { rank, .. }) => {
            vec![("rank", rank.to_string())]
        }
        NodeData::Modifier(modifier) => vec![("modifier", modifier.to_string())],
        NodeData::Comment(comment) if comment.is_rem => vec![("isRem", "true".to_owned())],
        NodeData::Expr(expr) => expr_attributes(expr),
        NodeData::Stmt(stmt) => stmt_attributes(stmt),
        NodeData::Decl(decl) => decl_attributes(decl),
        NodeData::CaseClause(CaseClause::Comparison { op: Some(op), .. }) => {
            vec![("operator", op.to_string())]
        }
        NodeData::Declarator(declarator) if declarator.is_new => {
            vec![("isNew", "true".to_owned())]
        }
        _ => Vec::new(),
    }
}

fn expr_attributes(expr: &Expr) -> Vec<(&'static str, String)> {
    match expr {
        Expr::Literal(literal) => vec![("value", literal_text(literal))],
        Expr::IntrinsicCast { target, .. } => vec![("type", target.to_string())],
        Expr::Unary { op, .. } | Expr::Binary { op, .. } => vec![("operator", op.to_string())],
        _ => Vec::new(),
    }
}

fn literal_text(literal: &Literal) -> String {
    match literal {
        Literal::String(text) | Literal::Date(text) | Literal::Decimal(text) => text.clone(),
        Literal::Character(character) => character.to_string(),
        Literal::Integer { value, .. } => value.to_string(),
        Literal::FloatingPoint { value, .. } => value.to_string(),
        Literal::Boolean(value) => value.to_string(),
    }
}

fn stmt_attributes(stmt: &Stmt) -> Vec<(&'static str, String)> {
    match stmt {
        Stmt::LabelReference {
            name,
            is_line_number,
        } => {
            let mut attributes = vec![("label", name.clone())];
            if *is_line_number {
                attributes.push(("isLineNumber", "true".to_owned()));
            }
            attributes
        }
        Stmt::Exit { block } | Stmt::Continue { block } | Stmt::EndBlock { block } => {
            vec![("block", block.to_string())]
        }
        Stmt::Resume { kind, label } => with_label(("kind", kind.to_string()), label.as_ref()),
        Stmt::OnError { kind, label } => with_label(("kind", kind.to_string()), label.as_ref()),
        Stmt::ReDim { preserve: true, .. } => vec![("preserve", "true".to_owned())],
        Stmt::CompoundAssignment { op, .. } => vec![("operator", op.to_string())],
        Stmt::Loop {
            condition: Some(condition),
        }
        | Stmt::DoBlock {
            condition: Some(condition),
            ..
        } => vec![("test", if condition.is_while { "While" } else { "Until" }.to_owned())],
        _ => Vec::new(),
    }
}

fn decl_attributes(decl: &Decl) -> Vec<(&'static str, String)> {
    match decl {
        Decl::EndBlock { block } => vec![("block", block.to_string())],
        Decl::Option(option) => vec![("option", option.to_string())],
        Decl::Method {
            operator: Some(op),
            ..
        } => vec![("operator", op.to_string())],
        Decl::External {
            charset,
            library,
            alias,
            ..
        } => {
            let mut attributes = vec![("charset", charset.to_string()), ("lib", library.clone())];
            if let Some(alias) = alias {
                attributes.push(("alias", alias.clone()));
            }
            attributes
        }
        _ => Vec::new(),
    }
}

fn with_label(
    first: (&'static str, String),
    label: Option<&String>,
) -> Vec<(&'static str, String)> {
    let mut attributes = vec![first];
    if let Some(label) = label {
        attributes.push(("label", label.clone()));
    }
    attributes
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(literal_text(&Literal::integer(42)), "42");
        assert_eq!(literal_text(&Literal::Boolean(true)), "true");
    }
}
