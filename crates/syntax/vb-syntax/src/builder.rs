//! Validated tree construction
//!
//! Nodes are built bottom-up: children first, then the node adopting
//! them. Each allocation validates the kind, the enumerated fields and
//! every child slot, then sets the parent of each child exactly once.

use crate::error::SyntaxError;
use crate::kind::NodeKind;
use crate::node::{Expect, Node, NodeData, NodeId};
use crate::parts::{Collection, Comment};
use crate::tree::SyntaxTree;
use rustc_hash::FxHashSet;
use tracing::trace;
use la_arena::Arena;
use vb_span::{Location, Span};

/// Builds a [`SyntaxTree`] one validated node at a time
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Arena<Node>,
}

impl TreeBuilder {
    /// Creates an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes allocated so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been allocated yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates a node without comments
    ///
    /// # Errors
    ///
    /// Returns the first violated construction invariant.
    pub fn alloc(
        &mut self,
        kind: NodeKind,
        span: Span,
        data: impl Into<NodeData>,
    ) -> Result<NodeId, SyntaxError> {
        self.alloc_with_comments(kind, span, data, Vec::new())
    }

    /// Allocates a node and attaches `comments` to it
    ///
    /// # Errors
    ///
    /// Returns the first violated construction invariant.
    pub fn alloc_with_comments(
        &mut self,
        kind: NodeKind,
        span: Span,
        data: impl Into<NodeData>,
        comments: Vec<NodeId>,
    ) -> Result<NodeId, SyntaxError> {
        let data = data.into();
        let family = data.family();
        if !family.contains(kind) {
            return Err(SyntaxError::KindOutsideFamily { kind, family });
        }
        if !data.accepts(kind) {
            return Err(SyntaxError::PayloadMismatch { kind });
        }
        data.check_enumerants(kind)?;

        let slots = data.slots(kind);
        let mut seen = FxHashSet::default();
        for slot in &slots.items {
            let child = self.checked(kind, slot.field, slot.id, slot.expect)?;
            if child.parent.is_some() || !seen.insert(slot.id) {
                return Err(SyntaxError::ChildAlreadyAttached {
                    kind,
                    field: slot.field,
                });
            }
        }
        for (field, id, expect) in data.references() {
            self.checked(kind, field, id, expect)?;
        }
        if !comments.is_empty() && !kind.is_commentable() {
            return Err(SyntaxError::NotCommentable { kind });
        }
        for &comment in &comments {
            let node = self.checked(
                kind,
                "comments",
                comment,
                Expect::Kind(NodeKind::Comment),
            )?;
            if node.parent.is_some() || !seen.insert(comment) {
                return Err(SyntaxError::ChildAlreadyAttached {
                    kind,
                    field: "comments",
                });
            }
        }

        let mut children: Vec<NodeId> = slots.items.iter().map(|slot| slot.id).collect();
        children.extend(comments.iter().copied());
        let id = self.nodes.alloc(Node {
            kind,
            span,
            parent: None,
            children,
            comments,
            data,
        });
        let adopted = self.nodes[id].children.clone();
        for child in adopted {
            self.nodes[child].parent = Some(id);
        }
        trace!(?kind, index = u32::from(id.into_raw()), "allocated node");
        Ok(id)
    }

    /// Allocates a delimited collection
    ///
    /// # Errors
    ///
    /// Fails on an empty collection or on mismatched elements.
    pub fn collection(
        &mut self,
        kind: NodeKind,
        span: Span,
        elements: Vec<Option<NodeId>>,
        separators: Vec<Location>,
    ) -> Result<NodeId, SyntaxError> {
        self.alloc(kind, span, Collection::new(elements, separators))
    }

    /// Allocates a comment
    ///
    /// # Errors
    ///
    /// Never fails for a well-formed comment; the signature matches the
    /// other constructors.
    pub fn comment(
        &mut self,
        span: Span,
        text: impl Into<String>,
        is_rem: bool,
    ) -> Result<NodeId, SyntaxError> {
        let comment = Comment {
            text: text.into(),
            is_rem,
        };
        self.alloc(NodeKind::Comment, span, comment)
    }

    /// Finishes the tree with `root` as its root
    ///
    /// # Errors
    ///
    /// Fails when `root` is not a node of this builder or has a parent.
    pub fn finish(self, root: NodeId) -> Result<SyntaxTree, SyntaxError> {
        if !self.contains(root) {
            return Err(SyntaxError::MissingChild {
                kind: NodeKind::File,
                field: "root",
            });
        }
        let node = &self.nodes[root];
        if node.parent.is_some() {
            return Err(SyntaxError::RootHasParent { kind: node.kind });
        }
        Ok(SyntaxTree::new(self.nodes, root))
    }

    fn contains(&self, id: NodeId) -> bool {
        (u32::from(id.into_raw()) as usize) < self.nodes.len()
    }

    fn checked(
        &self,
        kind: NodeKind,
        field: &'static str,
        id: NodeId,
        expect: Expect,
    ) -> Result<&Node, SyntaxError> {
        if !self.contains(id) {
            return Err(SyntaxError::MissingChild { kind, field });
        }
        let child = &self.nodes[id];
        if !expect.matches(child.kind) {
            return Err(SyntaxError::WrongChildFamily {
                kind,
                field,
                expected: expect.to_string(),
                found: child.kind,
            });
        }
        Ok(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::{Name, SimpleName};
    use crate::stmt::Stmt;
    use crate::token::ModifierKind;

    fn name(builder: &mut TreeBuilder, text: &str) -> NodeId {
        builder
            .alloc(
                NodeKind::SimpleName,
                Span::default(),
                Name::Simple(SimpleName::new(text)),
            )
            .unwrap()
    }

    #[test]
    fn test_empty_collection_is_rejected() {
        let mut builder = TreeBuilder::new();
        let result = builder.collection(
            NodeKind::ArgumentCollection,
            Span::default(),
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(
            result,
            Err(SyntaxError::EmptyCollection {
                kind: NodeKind::ArgumentCollection
            })
        );
        assert!(builder.is_empty());
    }

    #[test]
    fn test_collection_of_holes_is_allowed() {
        let mut builder = TreeBuilder::new();
        let bounds = builder.collection(
            NodeKind::ArgumentCollection,
            Span::default(),
            vec![None, None],
            vec![Location::new(1, 9)],
        );
        assert!(bounds.is_ok());
    }

    #[test]
    fn test_kind_outside_family() {
        let mut builder = TreeBuilder::new();
        let result = builder.alloc(NodeKind::ForBlockStatement, Span::default(), ModifierKind::Dim);
        assert!(matches!(
            result,
            Err(SyntaxError::KindOutsideFamily {
                kind: NodeKind::ForBlockStatement,
                ..
            })
        ));
    }

    #[test]
    fn test_payload_must_describe_kind() {
        let mut builder = TreeBuilder::new();
        let result = builder.alloc(NodeKind::GotoStatement, Span::default(), Stmt::Empty);
        assert_eq!(
            result,
            Err(SyntaxError::PayloadMismatch {
                kind: NodeKind::GotoStatement
            })
        );
    }

    #[test]
    fn test_child_can_only_be_adopted_once() {
        let mut builder = TreeBuilder::new();
        let shared = name(&mut builder, "x");
        let first = builder.alloc(
            NodeKind::VariableName,
            Span::default(),
            Name::Variable {
                name: shared,
                array_type: None,
            },
        );
        assert!(first.is_ok());
        let second = builder.alloc(
            NodeKind::VariableName,
            Span::default(),
            Name::Variable {
                name: shared,
                array_type: None,
            },
        );
        assert!(matches!(
            second,
            Err(SyntaxError::ChildAlreadyAttached { field: "name", .. })
        ));
    }

    #[test]
    fn test_wrong_child_kind() {
        let mut builder = TreeBuilder::new();
        let simple = name(&mut builder, "x");
        let result = builder.collection(
            NodeKind::StatementCollection,
            Span::default(),
            vec![Some(simple)],
            Vec::new(),
        );
        assert!(matches!(
            result,
            Err(SyntaxError::WrongChildFamily {
                found: NodeKind::SimpleName,
                ..
            })
        ));
    }

    #[test]
    fn test_comments_only_on_statements_and_declarations() {
        let mut builder = TreeBuilder::new();
        let comment = builder.comment(Span::default(), "note", false).unwrap();
        let result = builder.alloc_with_comments(
            NodeKind::SimpleName,
            Span::default(),
            Name::Simple(SimpleName::new("x")),
            vec![comment],
        );
        assert_eq!(
            result,
            Err(SyntaxError::NotCommentable {
                kind: NodeKind::SimpleName
            })
        );
        let stop = builder
            .alloc_with_comments(
                NodeKind::StopStatement,
                Span::default(),
                Stmt::Empty,
                vec![comment],
            )
            .unwrap();
        let tree = builder.finish(stop).unwrap();
        assert_eq!(tree[stop].comments(), &[comment]);
        assert_eq!(tree.parent(comment), Some(stop));
    }

    #[test]
    fn test_root_must_be_unattached() {
        let mut builder = TreeBuilder::new();
        let simple = name(&mut builder, "x");
        builder
            .alloc(
                NodeKind::VariableName,
                Span::default(),
                Name::Variable {
                    name: simple,
                    array_type: None,
                },
            )
            .unwrap();
        assert!(matches!(
            builder.finish(simple),
            Err(SyntaxError::RootHasParent { .. })
        ));
    }
}
