//! Statement dispatcher and the simple statements
//!
//! Block statements live in `loops`, `branch` and `routine`; `ReDim` in
//! `redim`.

use crate::context::LowerContext;
use crate::error::LowerError;
use crate::expr::invocation;
use crate::types::default_value;
use vb_ir::{IrExpr, IrStmt, IrType, PrimitiveType};
use vb_syntax::token::{BlockType, ModifierKind};
use vb_syntax::{Expr, NodeId, NodeKind, Stmt};

impl LowerContext<'_> {
    /// Lowers every statement of a `StatementCollection`
    pub fn lower_body(&mut self, statements: Option<NodeId>) -> Result<Vec<IrStmt>, LowerError> {
        let tree = self.tree;
        let mut lowered = Vec::new();
        for statement in tree.elements(statements) {
            lowered.extend(self.lower_stmt(statement)?);
        }
        Ok(lowered)
    }

    /// Lowers one statement, preceded by its attached comments
    pub fn lower_stmt(&mut self, id: NodeId) -> Result<Vec<IrStmt>, LowerError> {
        let mut lowered = self.comment_statements(id);
        lowered.extend(self.lower_stmt_inner(id)?);
        Ok(lowered)
    }

    #[allow(clippy::too_many_lines, reason = "one arm per statement kind")]
    fn lower_stmt_inner(&mut self, id: NodeId) -> Result<Vec<IrStmt>, LowerError> {
        let tree = self.tree;
        let Some(stmt) = tree.stmt(id) else {
            return Err(self.unsupported(id));
        };
        match (tree.kind(id), stmt) {
            (NodeKind::EmptyStatement, _) | (_, Stmt::EndBlock { .. }) => Ok(Vec::new()),
            (NodeKind::StopStatement, _) => Ok(vec![IrStmt::Expression(IrExpr::static_call(
                "System.Diagnostics.Debugger",
                "Break",
                Vec::new(),
            ))]),
            (NodeKind::EndStatement, _) => Ok(vec![IrStmt::Expression(IrExpr::static_call(
                "Environment",
                "Exit",
                vec![IrExpr::int(0)],
            ))]),
            (
                kind,
                Stmt::LabelReference {
                    name,
                    is_line_number,
                },
            ) => {
                let label = label_name(name, *is_line_number);
                match kind {
                    NodeKind::LabelStatement => Ok(vec![IrStmt::Label(label)]),
                    NodeKind::GotoStatement => Ok(vec![IrStmt::Goto(label)]),
                    _ => self.lower_gosub(id, label),
                }
            }
            (_, Stmt::Exit { block }) => self.lower_exit(id, *block).map(|exit| vec![exit]),
            (_, Stmt::Return { expression }) => {
                self.lower_return(id, *expression).map(|ret| vec![ret])
            }
            (_, Stmt::RaiseEvent { name, arguments }) => {
                let event = IrExpr::Variable(self.text(*name)?);
                let args = self.lower_arguments(*arguments)?;
                Ok(vec![IrStmt::Expression(IrExpr::DelegateInvoke {
                    target: Box::new(event),
                    args,
                })])
            }
            (_, Stmt::ReDim {
                preserve,
                variables,
            }) => self.lower_redim(id, *preserve, *variables),
            (_, Stmt::Erase { variables }) => tree
                .elements(Some(*variables))
                .map(|variable| Ok(IrStmt::assign(self.lower_expr(variable)?, IrExpr::Null)))
                .collect(),
            (_, Stmt::Call { target, arguments }) => {
                let callee = self.lower_expr(*target)?;
                let args = self.lower_arguments(*arguments)?;
                Ok(vec![IrStmt::Expression(invocation(callee, args))])
            }
            (_, Stmt::Assignment { target, source }) => {
                let target = self.assignment_target(*target)?;
                let source = self.lower_expr(*source)?;
                Ok(vec![IrStmt::assign(target, source)])
            }
            (_, Stmt::CompoundAssignment { op, target, source }) => {
                let target = self.assignment_target(*target)?;
                let source = self.lower_expr(*source)?;
                let value = self
                    .binary_operation(*op, target.clone(), source)
                    .ok_or_else(|| self.unsupported(id))?;
                Ok(vec![IrStmt::assign(target, value)])
            }
            (_, Stmt::MidAssignment {
                target,
                start,
                length,
                source,
            }) => self.lower_mid(*target, *start, *length, *source),
            (_, Stmt::LocalDeclaration {
                modifiers,
                declarators,
            }) => self.lower_local_declaration(*modifiers, *declarators),
            (_, Stmt::DoBlock {
                condition,
                statements,
                end,
            }) => self.lower_do(id, condition.as_ref(), *statements, *end),
            (_, Stmt::WhileBlock {
                condition,
                statements,
                ..
            }) => self.lower_while(*condition, *statements),
            (_, Stmt::ForBlock {
                control,
                declarator,
                lower,
                upper,
                step,
                statements,
                ..
            }) => self.lower_for(*control, *declarator, *lower, *upper, *step, *statements),
            (_, Stmt::ForEachBlock {
                control,
                declarator,
                collection,
                statements,
                ..
            }) => self.lower_for_each(id, *control, *declarator, *collection, *statements),
            (NodeKind::WithBlockStatement, Stmt::Guarded {
                expression,
                statements,
                ..
            }) => {
                let target = self.lower_expr(*expression)?;
                let statements = *statements;
                self.in_with(target, |context| context.lower_body(statements))
            }
            (_, Stmt::IfBlock {
                condition,
                statements,
                else_ifs,
                else_block,
                ..
            }) => self
                .lower_if(*condition, *statements, *else_ifs, *else_block)
                .map(|branch| vec![branch]),
            (_, Stmt::LineIf {
                condition,
                statements,
                else_statements,
            }) => {
                let condition = self.lower_expr(*condition)?;
                let then_body = self.lower_body(*statements)?;
                let else_body = self.lower_body(*else_statements)?;
                Ok(vec![IrStmt::Conditional {
                    condition,
                    then_body,
                    else_body,
                }])
            }
            (_, Stmt::SelectBlock {
                expression,
                cases,
                case_else,
                ..
            }) => self.lower_select(*expression, *cases, *case_else),
            _ => Err(self.unsupported(id)),
        }
    }

    /// Assignment target, with the routine's own name replaced by its
    /// shadow result
    pub fn assignment_target(&mut self, target: NodeId) -> Result<IrExpr, LowerError> {
        if let (Some(Expr::SimpleName { name }), Some(routine)) =
            (self.tree.expr(target), self.routine.as_ref())
        {
            if let Some(shadow) = &routine.shadow {
                let assigned = self.tree.name_text(*name).unwrap_or_default();
                if assigned.eq_ignore_ascii_case(&routine.name) {
                    return Ok(IrExpr::Variable(shadow.clone()));
                }
            }
        }
        self.lower_expr(target)
    }

    /// `Mid(target, start[, length]) = source` as a self-assignment of
    /// the string-splicing primitive
    fn lower_mid(
        &mut self,
        target: NodeId,
        start: NodeId,
        length: Option<NodeId>,
        source: NodeId,
    ) -> Result<Vec<IrStmt>, LowerError> {
        let target = self.assignment_target(target)?;
        let start = self.lower_expr(start)?;
        let length = match length {
            Some(length) => self.lower_expr(length)?,
            None => IrExpr::field(IrExpr::TypeRef(IrType::Primitive(PrimitiveType::Int)), "MaxValue"),
        };
        let source = self.lower_expr(source)?;
        let spliced = IrExpr::static_call(
            "StringType",
            "MidStmtStr",
            vec![target.clone(), start, length, source],
        );
        Ok(vec![IrStmt::assign(target, spliced)])
    }

    fn lower_local_declaration(
        &mut self,
        modifiers: NodeId,
        declarators: NodeId,
    ) -> Result<Vec<IrStmt>, LowerError> {
        let is_const = self.modifiers(Some(modifiers)).contains(&ModifierKind::Const);
        let tree = self.tree;
        let mut lowered = Vec::new();
        for declarator in tree.elements(Some(declarators)) {
            for variable in self.declared_variables(declarator)? {
                let init = match variable.init {
                    Some(init) => Some(init),
                    None if is_const => return Err(self.unsupported(declarator)),
                    None => Some(default_value(&variable.ty)),
                };
                lowered.push(IrStmt::declare(variable.name, variable.ty, init));
            }
        }
        Ok(lowered)
    }

    /// Nearest enclosing loop statement of `id`
    pub fn enclosing_loop(&self, id: NodeId) -> Option<(NodeId, BlockType)> {
        let tree = self.tree;
        tree.ancestors(id).find_map(|ancestor| {
            let block = match tree.kind(ancestor) {
                NodeKind::DoBlockStatement => BlockType::Do,
                NodeKind::ForBlockStatement | NodeKind::ForEachBlockStatement => BlockType::For,
                NodeKind::WhileBlockStatement => BlockType::While,
                _ => return None,
            };
            Some((ancestor, block))
        })
    }
}

/// IR label for a source label; line numbers get a letter prefix
pub(crate) fn label_name(name: &str, is_line_number: bool) -> String {
    if is_line_number {
        format!("Line{name}")
    } else {
        name.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_number_labels_are_identifiers() {
        assert_eq!(label_name("100", true), "Line100");
        assert_eq!(label_name("Retry", false), "Retry");
    }
}
