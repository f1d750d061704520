//! Node storage and the payload protocol shared by every family
//!
//! Each family payload reports which kinds it accepts, which direct
//! children it holds (in declaration order) and which enumerated values
//! it must validate. The builder drives all three at construction.

use crate::decl::Decl;
use crate::error::SyntaxError;
use crate::expr::Expr;
use crate::kind::{NodeFamily, NodeKind};
use crate::parts::{
    Argument, Attribute, CaseClause, Collection, Comment, File, Import, Initializer, Name,
    Parameter, TypeName, TypeParameter, VariableDeclarator,
};
use crate::stmt::Stmt;
use crate::token::ModifierKind;
use std::fmt;
use la_arena::Idx;
use vb_span::Span;

/// Index of a node in its tree's arena
pub type NodeId = Idx<Node>;

/// A single node of a syntax tree
///
/// Nodes are immutable once their tree is finished. `parent` is set by
/// the node that adopts this one, never by the node itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) span: Span,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) comments: Vec<NodeId>,
    pub(crate) data: NodeData,
}

impl Node {
    /// Kind tag
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Source range
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Adopting node, `None` for the root and for orphans
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in declaration order, attached comments last
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Attached comment nodes
    #[must_use]
    pub fn comments(&self) -> &[NodeId] {
        &self.comments
    }

    /// Family payload
    #[must_use]
    pub const fn data(&self) -> &NodeData {
        &self.data
    }

    /// Whether this is the syntax error placeholder
    #[must_use]
    pub const fn is_bad(&self) -> bool {
        self.kind.is_bad()
    }
}

/// Payload of a node, one variant per family
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum NodeData {
    /// Unparseable text
    SyntaxError,
    /// Delimited collection
    Collection(Collection),
    /// Comment
    Comment(Comment),
    /// Name
    Name(Name),
    /// Type name
    Type(TypeName),
    /// Initializer
    Initializer(Initializer),
    /// Argument
    Argument(Argument),
    /// Expression
    Expr(Expr),
    /// Statement
    Stmt(Stmt),
    /// Modifier keyword
    Modifier(ModifierKind),
    /// Variable declarator
    Declarator(VariableDeclarator),
    /// Case clause
    CaseClause(CaseClause),
    /// Attribute
    Attribute(Attribute),
    /// Declaration
    Decl(Decl),
    /// Parameter
    Parameter(Parameter),
    /// Import
    Import(Import),
    /// Type parameter
    TypeParameter(TypeParameter),
    /// File
    File(File),
}

impl NodeData {
    /// Family of this payload
    #[must_use]
    pub const fn family(&self) -> NodeFamily {
        match self {
            Self::SyntaxError => NodeFamily::SyntaxError,
            Self::Collection(_) => NodeFamily::Collection,
            Self::Comment(_) => NodeFamily::Comment,
            Self::Name(_) => NodeFamily::Name,
            Self::Type(_) => NodeFamily::Type,
            Self::Initializer(_) => NodeFamily::Initializer,
            Self::Argument(_) => NodeFamily::Argument,
            Self::Expr(_) => NodeFamily::Expression,
            Self::Stmt(_) => NodeFamily::Statement,
            Self::Modifier(_) => NodeFamily::Modifier,
            Self::Declarator(_) => NodeFamily::Declarator,
            Self::CaseClause(_) => NodeFamily::CaseClause,
            Self::Attribute(_) => NodeFamily::Attribute,
            Self::Decl(_) => NodeFamily::Declaration,
            Self::Parameter(_) => NodeFamily::Parameter,
            Self::Import(_) => NodeFamily::Import,
            Self::TypeParameter(_) => NodeFamily::TypeParameter,
            Self::File(_) => NodeFamily::File,
        }
    }

    fn payload(&self) -> Option<&dyn Payload> {
        let payload: &dyn Payload = match self {
            Self::SyntaxError | Self::Modifier(_) => return None,
            Self::Collection(data) => data,
            Self::Comment(data) => data,
            Self::Name(data) => data,
            Self::Type(data) => data,
            Self::Initializer(data) => data,
            Self::Argument(data) => data,
            Self::Expr(data) => data,
            Self::Stmt(data) => data,
            Self::Declarator(data) => data,
            Self::CaseClause(data) => data,
            Self::Attribute(data) => data,
            Self::Decl(data) => data,
            Self::Parameter(data) => data,
            Self::Import(data) => data,
            Self::TypeParameter(data) => data,
            Self::File(data) => data,
        };
        Some(payload)
    }

    /// Whether this payload may be tagged with `kind`
    #[must_use]
    pub fn accepts(&self, kind: NodeKind) -> bool {
        match self.payload() {
            Some(payload) => payload.accepts(kind),
            None => self.family().contains(kind),
        }
    }

    pub(crate) fn slots(&self, kind: NodeKind) -> Slots {
        let mut slots = Slots::new(kind);
        if let Some(payload) = self.payload() {
            payload.slots(&mut slots);
        }
        slots
    }

    pub(crate) fn check_enumerants(&self, kind: NodeKind) -> Result<(), SyntaxError> {
        match self.payload() {
            Some(payload) => payload.check_enumerants(kind),
            None => Ok(()),
        }
    }

    pub(crate) fn references(&self) -> Vec<(&'static str, NodeId, Expect)> {
        match self {
            Self::Expr(Expr::CallOrIndex {
                declarator: Some(declarator),
                ..
            }) => vec![(
                "declarator",
                *declarator,
                Expect::Kind(NodeKind::VariableDeclarator),
            )],
            _ => Vec::new(),
        }
    }
}

/// Per-family construction protocol
pub(crate) trait Payload {
    /// Whether the payload may be tagged with `kind`
    fn accepts(&self, kind: NodeKind) -> bool;

    /// Pushes direct children in declaration order
    fn slots(&self, slots: &mut Slots);

    /// Validates enumerated fields against the kind's value set
    fn check_enumerants(&self, _kind: NodeKind) -> Result<(), SyntaxError> {
        Ok(())
    }
}

/// What a child slot may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expect {
    /// Any kind of the family
    Family(NodeFamily),
    /// Exactly this kind
    Kind(NodeKind),
}

impl Expect {
    /// Syntax error placeholders stand in for any child
    pub(crate) fn matches(self, kind: NodeKind) -> bool {
        kind.is_bad()
            || match self {
                Self::Family(family) => family.contains(kind),
                Self::Kind(expected) => expected == kind,
            }
    }
}

impl fmt::Display for Expect {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Family(family) => write!(formatter, "a {family}"),
            Self::Kind(kind) => write!(formatter, "{kind}"),
        }
    }
}

/// One direct child reference
#[derive(Debug, Clone, Copy)]
pub(crate) struct Slot {
    pub field: &'static str,
    pub id: NodeId,
    pub expect: Expect,
}

/// Ordered child references of a node under construction
#[derive(Debug)]
pub(crate) struct Slots {
    pub kind: NodeKind,
    pub items: Vec<Slot>,
}

impl Slots {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn required(&mut self, field: &'static str, id: NodeId, expect: Expect) {
        self.items.push(Slot { field, id, expect });
    }

    pub fn optional(&mut self, field: &'static str, id: Option<NodeId>, expect: Expect) {
        if let Some(id) = id {
            self.required(field, id, expect);
        }
    }

    pub fn family(&mut self, field: &'static str, id: NodeId, family: NodeFamily) {
        self.required(field, id, Expect::Family(family));
    }

    pub fn kind(&mut self, field: &'static str, id: NodeId, kind: NodeKind) {
        self.required(field, id, Expect::Kind(kind));
    }

    pub fn optional_family(&mut self, field: &'static str, id: Option<NodeId>, family: NodeFamily) {
        self.optional(field, id, Expect::Family(family));
    }

    pub fn optional_kind(&mut self, field: &'static str, id: Option<NodeId>, kind: NodeKind) {
        self.optional(field, id, Expect::Kind(kind));
    }
}

/// Builds the enumerant error for `kind`
pub(crate) fn invalid_enumerant(
    kind: NodeKind,
    field: &'static str,
    value: impl fmt::Display,
) -> SyntaxError {
    SyntaxError::InvalidEnumerant {
        kind,
        field,
        value: value.to_string(),
    }
}
