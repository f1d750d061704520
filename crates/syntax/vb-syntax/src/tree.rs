//! Finished, immutable syntax trees

use crate::decl::Decl;
use crate::expr::Expr;
use crate::kind::NodeKind;
use crate::node::{Node, NodeData, NodeId};
use crate::parts::{Collection, Name, TypeName, VariableDeclarator};
use crate::stmt::Stmt;
use std::iter;
use std::ops::Index;
use la_arena::Arena;
use vb_span::Span;

/// A parse tree owned by a single arena
///
/// Parents and children are index lookups, so a tree can be shared
/// between any number of readers.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    nodes: Arena<Node>,
    root: NodeId,
}

impl SyntaxTree {
    pub(crate) const fn new(nodes: Arena<Node>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    /// Root node, normally a `File`
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, orphans included
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty; never true for a finished tree
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes with their ids, in allocation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter()
    }

    /// Kind of `id`
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].kind
    }

    /// Span of `id`
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id].span
    }

    /// Parent of `id`
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Direct children of `id` in declaration order
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Payload of `id`
    #[must_use]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id].data
    }

    /// Proper ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.parent(id), |&current| self.parent(current))
    }

    /// `id` and everything below it, pre-order
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Nearest ancestor of `id` whose kind satisfies `predicate`
    pub fn enclosing(
        &self,
        id: NodeId,
        mut predicate: impl FnMut(NodeKind) -> bool,
    ) -> Option<NodeId> {
        self.ancestors(id).find(|&ancestor| predicate(self.kind(ancestor)))
    }

    /// Whether the tree contains a syntax error placeholder
    #[must_use]
    pub fn has_bad_nodes(&self) -> bool {
        self.nodes.iter().any(|(_, node)| node.is_bad())
    }

    /// Expression payload of `id`
    #[must_use]
    pub fn expr(&self, id: NodeId) -> Option<&Expr> {
        match self.data(id) {
            NodeData::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// Statement payload of `id`
    #[must_use]
    pub fn stmt(&self, id: NodeId) -> Option<&Stmt> {
        match self.data(id) {
            NodeData::Stmt(stmt) => Some(stmt),
            _ => None,
        }
    }

    /// Declaration payload of `id`
    #[must_use]
    pub fn decl(&self, id: NodeId) -> Option<&Decl> {
        match self.data(id) {
            NodeData::Decl(decl) => Some(decl),
            _ => None,
        }
    }

    /// Name payload of `id`
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&Name> {
        match self.data(id) {
            NodeData::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Type payload of `id`
    #[must_use]
    pub fn type_name(&self, id: NodeId) -> Option<&TypeName> {
        match self.data(id) {
            NodeData::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// Collection payload of `id`
    #[must_use]
    pub fn collection(&self, id: NodeId) -> Option<&Collection> {
        match self.data(id) {
            NodeData::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Declarator payload of `id`
    #[must_use]
    pub fn declarator(&self, id: NodeId) -> Option<&VariableDeclarator> {
        match self.data(id) {
            NodeData::Declarator(declarator) => Some(declarator),
            _ => None,
        }
    }

    /// Present elements of the collection `id`; empty when `id` is absent
    /// or not a collection
    pub fn elements(&self, id: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        id.and_then(|id| self.collection(id))
            .into_iter()
            .flat_map(Collection::present)
    }

    /// Identifier text of a name-like node
    ///
    /// Accepts simple names, variable names, qualified names (the last
    /// part) and simple name expressions.
    #[must_use]
    pub fn name_text(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            NodeData::Name(Name::Simple(simple)) => Some(&simple.text),
            NodeData::Name(Name::Variable { name, .. } | Name::Qualified { name, .. })
            | NodeData::Expr(Expr::SimpleName { name }) => self.name_text(*name),
            _ => None,
        }
    }

    /// Whether the expression `id` is a compile-time constant
    ///
    /// Literals are constant; unary and parenthesized expressions forward
    /// their operand and binary expressions require both operands.
    #[must_use]
    pub fn is_constant(&self, id: NodeId) -> bool {
        match self.expr(id) {
            Some(Expr::Literal(_)) => true,
            Some(Expr::Unary { operand, .. } | Expr::Parenthetical { operand }) => {
                self.is_constant(*operand)
            }
            Some(Expr::Binary { left, right, .. }) => {
                self.is_constant(*left) && self.is_constant(*right)
            }
            _ => false,
        }
    }

    /// Whether the declarator `id` declares a field
    ///
    /// Derived from the node owning the declarator's collection; nothing
    /// is stored on the declarator itself.
    #[must_use]
    pub fn is_field(&self, id: NodeId) -> bool {
        self.parent(id)
            .filter(|&list| self.kind(list) == NodeKind::VariableDeclaratorCollection)
            .and_then(|list| self.parent(list))
            .is_some_and(|owner| self.kind(owner) == NodeKind::VariableListDeclaration)
    }
}

impl Index<NodeId> for SyntaxTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

/// Pre-order walk returned by [`SyntaxTree::descendants`]
#[derive(Debug)]
pub struct Descendants<'tree> {
    tree: &'tree SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
