//! Parse diagnostics carried alongside a tree
//!
//! The parser reports these; nothing in this workspace interprets them
//! beyond counting errors.

use crate::tree::SyntaxTree;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use vb_span::Span;

/// Severity of a parse diagnostic
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    /// Prevents lowering
    #[display("error")]
    Error,
    /// Informational
    #[display("warning")]
    Warning,
}

/// A message reported by the parser
#[derive(Clone, Debug, Display, Eq, PartialEq, Serialize, Deserialize)]
#[display("{span}: {severity}: {message}")]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Source range
    pub span: Span,
}

impl Diagnostic {
    /// Error diagnostic
    #[must_use]
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }

    /// Warning diagnostic
    #[must_use]
    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
        }
    }
}

/// A parsed file: the tree plus whatever the parser reported
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedFile {
    /// File name used in messages
    pub name: String,
    /// The tree
    pub tree: SyntaxTree,
    /// Parser diagnostics, in report order
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedFile {
    /// Pairs a tree with no diagnostics
    #[must_use]
    pub fn new(name: impl Into<String>, tree: SyntaxTree) -> Self {
        Self {
            name: name.into(),
            tree,
            diagnostics: Vec::new(),
        }
    }

    /// Number of error diagnostics
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Error)
            .count()
    }
}
