//! Lowering failures
//!
//! Lowering is all-or-nothing: the first error aborts the pass and no
//! partial program is returned.

use miette::Diagnostic;
use thiserror::Error;
use vb_span::Span;
use vb_syntax::{NodeId, NodeKind, SyntaxTree};

/// Reason a file could not be lowered
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LowerError {
    /// The construct has no lowering
    #[error("unsupported construct {kind} at {span}")]
    #[diagnostic(
        code(lower::unsupported),
        help("rewrite the construct by hand or extend the lowering")
    )]
    Unsupported {
        /// Kind of the offending node
        kind: NodeKind,
        /// Where it appears
        span: Span,
    },

    /// The tree still contains a syntax error placeholder
    #[error("syntax error node at {span}")]
    #[diagnostic(
        code(lower::bad_node),
        help("fix the parse diagnostics before lowering")
    )]
    BadNode {
        /// Where it appears
        span: Span,
    },

    /// The tree has a shape the builder allows but lowering cannot give a
    /// meaning to
    #[error("malformed tree: {reason}")]
    #[diagnostic(code(lower::malformed_tree))]
    MalformedTree {
        /// What is wrong
        reason: String,
    },
}

impl LowerError {
    /// `Unsupported` for the node `id`, or `BadNode` if it is a placeholder
    pub(crate) fn unsupported(tree: &SyntaxTree, id: NodeId) -> Self {
        let span = tree.span(id);
        if tree.kind(id).is_bad() {
            return Self::BadNode { span };
        }
        Self::Unsupported {
            kind: tree.kind(id),
            span,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            reason: reason.into(),
        }
    }
}
