//! Parse tree model for the legacy Basic dialect
//!
//! Trees are built bottom-up through [`TreeBuilder`], which validates every
//! node at construction, and are immutable afterwards. Nodes live in one
//! arena per tree; parents and children are index lookups.

mod builder;
pub mod decl;
mod diagnostic;
pub mod dump;
mod error;
pub mod expr;
mod kind;
pub mod lookup;
mod node;
pub mod parts;
pub mod stmt;
pub mod token;
mod tree;

pub use builder::TreeBuilder;
pub use decl::{Decl, DeclHeader, Signature};
pub use diagnostic::{Diagnostic, ParsedFile, Severity};
pub use error::SyntaxError;
pub use expr::{Expr, Literal};
pub use kind::{NodeFamily, NodeKind};
pub use node::{Node, NodeData, NodeId};
pub use parts::{
    Argument, Attribute, CaseClause, Collection, Comment, File, Import, Initializer, Name,
    Parameter, SimpleName, TypeName, TypeParameter, VariableDeclarator,
};
pub use stmt::{LoopCondition, Stmt};
pub use tree::{Descendants, SyntaxTree};
