//! Structural name lookup
//!
//! Resolves a referenced simple name to its declaring `VariableDeclarator`
//! by walking from the reference toward the root and scanning the direct
//! children of each ancestor. There is no symbol table: the nearest
//! textual match wins and nothing is cached.

use crate::decl::Decl;
use crate::expr::Expr;
use crate::kind::NodeKind;
use crate::node::{NodeData, NodeId};
use crate::parts::VariableDeclarator;
use crate::stmt::Stmt;
use crate::tree::SyntaxTree;
use tracing::trace;

/// Declarator of the control variable of a `For` or `For Each` block
///
/// An inline declarator (`For i As Integer = ...`) wins; otherwise the
/// control expression is resolved structurally.
#[must_use]
pub fn control_variable_declarator(tree: &SyntaxTree, block: NodeId) -> Option<NodeId> {
    match tree.stmt(block)? {
        Stmt::ForBlock {
            control,
            declarator,
            ..
        }
        | Stmt::ForEachBlock {
            control,
            declarator,
            ..
        } => declarator.or_else(|| resolve_declarator(tree, *control)),
        _ => None,
    }
}

/// Declarator of the target of a call-or-index expression
#[must_use]
pub fn call_or_index_declarator(tree: &SyntaxTree, expression: NodeId) -> Option<NodeId> {
    match tree.expr(expression)? {
        Expr::CallOrIndex {
            target,
            declarator,
            ..
        } => declarator.or_else(|| resolve_declarator(tree, *target)),
        _ => None,
    }
}

/// Declarators of every operand of a `ReDim` statement, in operand order
///
/// Operands that do not resolve yield `None`.
#[must_use]
pub fn redim_declarators(tree: &SyntaxTree, statement: NodeId) -> Vec<Option<NodeId>> {
    let Some(Stmt::ReDim { variables, .. }) = tree.stmt(statement) else {
        return Vec::new();
    };
    tree.elements(Some(*variables))
        .map(|operand| match tree.kind(operand) {
            NodeKind::CallOrIndexExpression => call_or_index_declarator(tree, operand),
            _ => resolve_declarator(tree, operand),
        })
        .collect()
}

/// Resolves the name referenced by `reference` to its declarator
///
/// Qualified references never resolve, whatever the nesting.
#[must_use]
pub fn resolve_declarator(tree: &SyntaxTree, reference: NodeId) -> Option<NodeId> {
    let name = referenced_name(tree, reference)?;
    let found = tree
        .ancestors(reference)
        .find_map(|ancestor| scan_scope(tree, ancestor, name));
    trace!(name, resolved = found.is_some(), "structural lookup");
    found
}

fn referenced_name(tree: &SyntaxTree, reference: NodeId) -> Option<&str> {
    match tree.expr(reference)? {
        Expr::SimpleName { name } => tree.name_text(*name),
        Expr::Parenthetical { operand } => referenced_name(tree, *operand),
        Expr::CallOrIndex { target, .. } => referenced_name(tree, *target),
        _ => None,
    }
}

fn scan_scope(tree: &SyntaxTree, scope: NodeId, name: &str) -> Option<NodeId> {
    tree.children(scope).iter().find_map(|&child| match tree.kind(child) {
        NodeKind::VariableDeclaratorCollection => scan_declarators(tree, child, name),
        NodeKind::VariableDeclarator => declares(tree, child, name).then_some(child),
        NodeKind::LocalDeclarationStatement | NodeKind::VariableListDeclaration => {
            declarator_list(tree, child).and_then(|list| scan_declarators(tree, list, name))
        }
        _ => None,
    })
}

fn declarator_list(tree: &SyntaxTree, declaration: NodeId) -> Option<NodeId> {
    match tree.data(declaration) {
        NodeData::Stmt(Stmt::LocalDeclaration { declarators, .. })
        | NodeData::Decl(Decl::VariableList { declarators, .. }) => Some(*declarators),
        _ => None,
    }
}

fn scan_declarators(tree: &SyntaxTree, list: NodeId, name: &str) -> Option<NodeId> {
    tree.elements(Some(list))
        .find(|&declarator| declares(tree, declarator, name))
}

fn declares(tree: &SyntaxTree, declarator: NodeId, name: &str) -> bool {
    let Some(VariableDeclarator { names, .. }) = tree.declarator(declarator) else {
        return false;
    };
    tree.elements(Some(*names))
        .any(|variable| tree.name_text(variable) == Some(name))
}
