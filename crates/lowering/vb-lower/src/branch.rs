//! `If` chains and `Select Case`
//!
//! Both become one nested conditional chain in source order; each later
//! branch is the else-body of the one before it.

use crate::context::LowerContext;
use crate::error::LowerError;
use tracing::trace;
use vb_ir::{BinaryOp, IrExpr, IrStmt, IrType};
use vb_syntax::token::OperatorKind;
use vb_syntax::{CaseClause, Expr, NodeData, NodeId, Stmt};

const fn relational(op: OperatorKind) -> BinaryOp {
    match op {
        OperatorKind::NotEquals => BinaryOp::NotEqual,
        OperatorKind::LessThan => BinaryOp::Less,
        OperatorKind::LessThanEquals => BinaryOp::LessEqual,
        OperatorKind::GreaterThan => BinaryOp::Greater,
        OperatorKind::GreaterThanEquals => BinaryOp::GreaterEqual,
        _ => BinaryOp::Equal,
    }
}

impl LowerContext<'_> {
    pub fn lower_if(
        &mut self,
        condition: NodeId,
        statements: Option<NodeId>,
        else_ifs: Option<NodeId>,
        else_block: Option<NodeId>,
    ) -> Result<IrStmt, LowerError> {
        let tree = self.tree;
        let condition = self.lower_expr(condition)?;
        let then_body = self.lower_body(statements)?;
        let mut branches = Vec::new();
        for else_if in tree.elements(else_ifs) {
            let Some(Stmt::ElseIfBlock {
                condition,
                statements,
            }) = tree.stmt(else_if)
            else {
                return Err(self.unsupported(else_if));
            };
            let condition = self.lower_expr(*condition)?;
            let body = self.lower_body(*statements)?;
            branches.push((condition, body));
        }
        let tail = self.lower_terminal_else(else_block)?;
        Ok(IrStmt::Conditional {
            condition,
            then_body,
            else_body: chain(branches, tail),
        })
    }

    /// Body of an `Else` or `Case Else` block
    fn lower_terminal_else(&mut self, block: Option<NodeId>) -> Result<Vec<IrStmt>, LowerError> {
        let tree = self.tree;
        match block.map(|block| (block, tree.stmt(block))) {
            None => Ok(Vec::new()),
            Some((_, Some(Stmt::Body { statements }))) => self.lower_body(*statements),
            Some((block, _)) => Err(self.unsupported(block)),
        }
    }

    /// `Select Case` as a conditional chain
    ///
    /// The clauses of one `Case` are combined with a logical and. A
    /// selector other than a plain name or literal is evaluated once into
    /// a fresh local that every clause tests.
    pub fn lower_select(
        &mut self,
        expression: NodeId,
        cases: Option<NodeId>,
        case_else: Option<NodeId>,
    ) -> Result<Vec<IrStmt>, LowerError> {
        let tree = self.tree;
        let mut lowered = Vec::new();
        let mut value = self.lower_expr(expression)?;
        if !matches!(
            tree.expr(expression),
            Some(Expr::SimpleName { .. } | Expr::Literal(_))
        ) {
            let selected = self.names.fresh("selected");
            trace!(%selected, "select value evaluated once");
            lowered.push(IrStmt::declare(selected.as_str(), IrType::OBJECT, Some(value)));
            value = IrExpr::var(selected);
        }
        let mut branches = Vec::new();
        for case in tree.elements(cases) {
            let Some(Stmt::CaseBlock {
                clauses,
                statements,
            }) = tree.stmt(case)
            else {
                return Err(self.unsupported(case));
            };
            let mut test: Option<IrExpr> = None;
            for clause in tree.elements(Some(*clauses)) {
                let clause = self.lower_case_clause(&value, clause)?;
                test = Some(match test {
                    Some(test) => IrExpr::binary(BinaryOp::LogicalAnd, test, clause),
                    None => clause,
                });
            }
            let test = test.ok_or_else(|| self.unsupported(case))?;
            branches.push((test, self.lower_body(*statements)?));
        }
        let tail = self.lower_terminal_else(case_else)?;
        lowered.extend(chain(branches, tail));
        Ok(lowered)
    }

    fn lower_case_clause(&mut self, value: &IrExpr, clause: NodeId) -> Result<IrExpr, LowerError> {
        let tree = self.tree;
        match tree.data(clause) {
            NodeData::CaseClause(CaseClause::Comparison { op, operand }) => {
                let op = op.map_or(BinaryOp::Equal, relational);
                let operand = self.lower_expr(*operand)?;
                Ok(IrExpr::binary(op, value.clone(), operand))
            }
            NodeData::CaseClause(CaseClause::Range { lower, upper }) => {
                let (lower, upper) = (*lower, *upper);
                let lower = self.lower_expr(lower)?;
                let upper = self.lower_expr(upper)?;
                Ok(IrExpr::binary(
                    BinaryOp::LogicalAnd,
                    IrExpr::binary(BinaryOp::GreaterEqual, value.clone(), lower),
                    IrExpr::binary(BinaryOp::LessEqual, value.clone(), upper),
                ))
            }
            _ => Err(self.unsupported(clause)),
        }
    }
}

/// Folds `(test, body)` branches into nested conditionals ending in `tail`
fn chain(branches: Vec<(IrExpr, Vec<IrStmt>)>, tail: Vec<IrStmt>) -> Vec<IrStmt> {
    branches
        .into_iter()
        .rev()
        .fold(tail, |else_body, (condition, then_body)| {
            vec![IrStmt::Conditional {
                condition,
                then_body,
                else_body,
            }]
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use vb_ir::pretty::PrettyPrint;

    fn render(statements: &[IrStmt]) -> String {
        statements
            .iter()
            .map(|statement| statement.format_top(String::new()).unwrap())
            .collect()
    }

    fn set(value: i64) -> Vec<IrStmt> {
        vec![IrStmt::assign(IrExpr::var("y"), IrExpr::int(value))]
    }

    #[test]
    fn test_chain_prints_as_else_if_ladder() {
        let x = || IrExpr::var("x");
        let range = IrExpr::binary(
            BinaryOp::LogicalAnd,
            IrExpr::binary(BinaryOp::GreaterEqual, x(), IrExpr::int(2)),
            IrExpr::binary(BinaryOp::LessEqual, x(), IrExpr::int(5)),
        );
        let branches = vec![
            (IrExpr::binary(BinaryOp::Equal, x(), IrExpr::int(1)), set(1)),
            (range, set(2)),
        ];
        expect![[r#"
            if (x == 1) {
                y = 1;
            } else if ((x >= 2) && (x <= 5)) {
                y = 2;
            } else {
                y = 0;
            }
        "#]]
        .assert_eq(&render(&chain(branches, set(0))));
    }

    #[test]
    fn test_chain_keeps_source_order() {
        let branches = vec![
            (IrExpr::var("a"), vec![IrStmt::Break]),
            (IrExpr::var("b"), vec![IrStmt::Return(None)]),
        ];
        let chained = chain(branches, vec![IrStmt::Goto("Other".to_owned())]);
        let [IrStmt::Conditional {
            condition,
            else_body,
            ..
        }] = chained.as_slice()
        else {
            panic!("expected one conditional, got {chained:?}");
        };
        assert_eq!(condition, &IrExpr::var("a"));
        let [IrStmt::Conditional {
            condition,
            else_body,
            ..
        }] = else_body.as_slice()
        else {
            panic!("expected a nested conditional");
        };
        assert_eq!(condition, &IrExpr::var("b"));
        assert_eq!(else_body, &vec![IrStmt::Goto("Other".to_owned())]);
    }

    #[test]
    fn test_empty_chain_is_the_tail() {
        assert!(chain(Vec::new(), Vec::new()).is_empty());
    }
}
