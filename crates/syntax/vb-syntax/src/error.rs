//! Construction errors
//!
//! Every variant is raised by [`crate::TreeBuilder`] before a node is
//! allocated; a failed construction leaves the arena untouched.

use crate::kind::{NodeFamily, NodeKind};
use miette::Diagnostic;
use thiserror::Error;

/// Violated construction invariant
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SyntaxError {
    /// Kind lies outside the payload family's range
    #[error("{kind} is not a {family} kind")]
    #[diagnostic(code(syntax::kind_outside_family))]
    KindOutsideFamily {
        /// Requested kind
        kind: NodeKind,
        /// Family of the supplied payload
        family: NodeFamily,
    },

    /// Kind is in the family but the payload variant describes another kind
    #[error("payload variant does not describe a {kind}")]
    #[diagnostic(code(syntax::payload_mismatch))]
    PayloadMismatch {
        /// Requested kind
        kind: NodeKind,
    },

    /// A required child reference does not name a node of this tree
    #[error("{kind}.{field} refers to a node that does not exist")]
    #[diagnostic(code(syntax::missing_child))]
    MissingChild {
        /// Kind under construction
        kind: NodeKind,
        /// Child field
        field: &'static str,
    },

    /// The child already belongs to another node
    #[error("{kind}.{field} refers to a node that already has a parent")]
    #[diagnostic(
        code(syntax::child_already_attached),
        help("nodes form a tree; build a fresh node for each position")
    )]
    ChildAlreadyAttached {
        /// Kind under construction
        kind: NodeKind,
        /// Child field
        field: &'static str,
    },

    /// The child exists but has the wrong kind for its slot
    #[error("{kind}.{field} expects {expected}, found {found}")]
    #[diagnostic(code(syntax::wrong_child_family))]
    WrongChildFamily {
        /// Kind under construction
        kind: NodeKind,
        /// Child field
        field: &'static str,
        /// What the slot accepts
        expected: String,
        /// Kind of the supplied child
        found: NodeKind,
    },

    /// Enumerated field outside the subset accepted by the kind
    #[error("invalid enumerant {value} for {kind}.{field}")]
    #[diagnostic(code(syntax::invalid_enumerant))]
    InvalidEnumerant {
        /// Kind under construction
        kind: NodeKind,
        /// Offending field
        field: &'static str,
        /// Offending value
        value: String,
    },

    /// Collection with neither elements nor separators
    #[error("{kind} has no elements and no separators")]
    #[diagnostic(code(syntax::empty_collection))]
    EmptyCollection {
        /// Collection kind
        kind: NodeKind,
    },

    /// Comments attached to a kind that cannot carry them
    #[error("{kind} cannot carry comments")]
    #[diagnostic(code(syntax::not_commentable))]
    NotCommentable {
        /// Kind under construction
        kind: NodeKind,
    },

    /// The node chosen as root was adopted by another node
    #[error("root {kind} already has a parent")]
    #[diagnostic(code(syntax::root_has_parent))]
    RootHasParent {
        /// Kind of the chosen root
        kind: NodeKind,
    },
}
