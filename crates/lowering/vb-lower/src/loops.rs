//! `For`, `For Each`, `Do` and `While` loops
//!
//! Every loop becomes one IR iteration, which tests before each pass.
//! Post-test `Do` loops carry a boolean latch that starts true and is
//! recomputed from the trailing condition at the end of the body.

use crate::context::LowerContext;
use crate::error::LowerError;
use tracing::trace;
use vb_ir::{BinaryOp, CastKind, IrExpr, IrStmt, IrType, PrimitiveType, UnaryOp};
use vb_syntax::{lookup, LoopCondition, NodeId, Stmt};

impl LowerContext<'_> {
    /// Declarations for an inline `For x As T` control variable
    fn declare_control(&mut self, declarator: Option<NodeId>) -> Result<Vec<IrStmt>, LowerError> {
        let Some(declarator) = declarator else {
            return Ok(Vec::new());
        };
        Ok(self
            .declared_variables(declarator)?
            .into_iter()
            .map(|variable| IrStmt::declare(variable.name, variable.ty, None))
            .collect())
    }

    /// `for (c = lower; c <= upper; c = c + step)`
    pub fn lower_for(
        &mut self,
        control: NodeId,
        declarator: Option<NodeId>,
        lower: NodeId,
        upper: NodeId,
        step: Option<NodeId>,
        statements: Option<NodeId>,
    ) -> Result<Vec<IrStmt>, LowerError> {
        let mut lowered = self.declare_control(declarator)?;
        let control = self.lower_expr(control)?;
        let lower = self.lower_expr(lower)?;
        let upper = self.lower_expr(upper)?;
        let step = match step {
            Some(step) => self.lower_expr(step)?,
            None => IrExpr::int(1),
        };
        let body = self.lower_body(statements)?;
        lowered.push(IrStmt::Iteration {
            init: Some(Box::new(IrStmt::assign(control.clone(), lower))),
            test: IrExpr::binary(BinaryOp::LessEqual, control.clone(), upper),
            increment: Some(Box::new(IrStmt::assign(
                control.clone(),
                IrExpr::binary(BinaryOp::Add, control, step),
            ))),
            body,
        });
        Ok(lowered)
    }

    /// Enumerator-driven iteration whose body starts by assigning the
    /// current element, cast to the control variable's type
    pub fn lower_for_each(
        &mut self,
        id: NodeId,
        control: NodeId,
        declarator: Option<NodeId>,
        collection: NodeId,
        statements: Option<NodeId>,
    ) -> Result<Vec<IrStmt>, LowerError> {
        let mut lowered = self.declare_control(declarator)?;
        let element_type = match (
            lookup::control_variable_declarator(self.tree, id),
            self.reference_text(control),
        ) {
            (Some(declarator), Some(name)) => self.declarator_type(declarator, &name)?,
            _ => IrType::OBJECT,
        };
        trace!(%element_type, "for each control type");
        let control = self.lower_expr(control)?;
        let collection = self.lower_expr(collection)?;
        let enumerator = self.names.fresh("enumerator");
        let current = IrExpr::field(IrExpr::var(enumerator.as_str()), "Current");
        let mut body = vec![IrStmt::assign(
            control,
            IrExpr::Cast {
                kind: CastKind::Convert,
                ty: element_type,
                expr: Box::new(current),
            },
        )];
        body.extend(self.lower_body(statements)?);
        lowered.push(IrStmt::Iteration {
            init: Some(Box::new(IrStmt::declare(
                enumerator.as_str(),
                IrType::named("System.Collections.IEnumerator"),
                Some(IrExpr::call(collection, "GetEnumerator", Vec::new())),
            ))),
            test: IrExpr::call(IrExpr::var(enumerator), "MoveNext", Vec::new()),
            increment: None,
            body,
        });
        Ok(lowered)
    }

    /// Test of a `While`/`Until` condition; `Until` is negated
    fn loop_test(&mut self, condition: &LoopCondition) -> Result<IrExpr, LowerError> {
        let test = self.lower_expr(condition.expression)?;
        if condition.is_while {
            Ok(test)
        } else {
            Ok(IrExpr::unary(UnaryOp::Not, test))
        }
    }

    pub fn lower_do(
        &mut self,
        id: NodeId,
        condition: Option<&LoopCondition>,
        statements: Option<NodeId>,
        end: Option<NodeId>,
    ) -> Result<Vec<IrStmt>, LowerError> {
        let trailing = match end.and_then(|end| self.tree.stmt(end)) {
            Some(Stmt::Loop { condition }) => *condition,
            _ => None,
        };
        let iteration = match (condition, trailing) {
            (Some(_), Some(_)) => {
                return Err(LowerError::malformed(format!(
                    "Do loop at {} has a condition at both ends",
                    self.tree.span(id)
                )));
            }
            (Some(condition), None) => IrStmt::Iteration {
                init: None,
                test: self.loop_test(condition)?,
                increment: None,
                body: self.lower_body(statements)?,
            },
            (None, Some(condition)) => {
                let latch = self.names.fresh("latch");
                trace!(%latch, "post-test loop latch");
                let mut body = self.lower_body(statements)?;
                body.push(IrStmt::assign(
                    IrExpr::var(latch.as_str()),
                    self.loop_test(&condition)?,
                ));
                IrStmt::Iteration {
                    init: Some(Box::new(IrStmt::declare(
                        latch.as_str(),
                        IrType::Primitive(PrimitiveType::Bool),
                        Some(IrExpr::bool(true)),
                    ))),
                    test: IrExpr::var(latch),
                    increment: None,
                    body,
                }
            }
            (None, None) => IrStmt::Iteration {
                init: None,
                test: IrExpr::bool(true),
                increment: None,
                body: self.lower_body(statements)?,
            },
        };
        Ok(vec![iteration])
    }

    pub fn lower_while(
        &mut self,
        condition: NodeId,
        statements: Option<NodeId>,
    ) -> Result<Vec<IrStmt>, LowerError> {
        Ok(vec![IrStmt::Iteration {
            init: None,
            test: self.lower_expr(condition)?,
            increment: None,
            body: self.lower_body(statements)?,
        }])
    }
}
