//! `ReDim` and `ReDim Preserve`

use crate::context::LowerContext;
use crate::error::LowerError;
use tracing::debug;
use vb_ir::{IrExpr, IrStmt, IrType};
use vb_syntax::{lookup, Expr, NodeId};

impl LowerContext<'_> {
    /// Reallocates every operand; `Preserve` copies the common prefix of
    /// the old contents through a temporary of the new size
    pub fn lower_redim(
        &mut self,
        id: NodeId,
        preserve: bool,
        variables: NodeId,
    ) -> Result<Vec<IrStmt>, LowerError> {
        let tree = self.tree;
        let declarators = lookup::redim_declarators(tree, id);
        let mut lowered = Vec::new();
        for (operand, declarator) in tree.elements(Some(variables)).zip(declarators) {
            let Some(Expr::CallOrIndex {
                target, arguments, ..
            }) = tree.expr(operand)
            else {
                return Err(self.unsupported(operand));
            };
            let name = self.reference_text(*target);
            let element = match (declarator, name.as_deref()) {
                (Some(declarator), Some(name)) => self
                    .declarator_type(declarator, name)?
                    .element()
                    .cloned()
                    .unwrap_or(IrType::OBJECT),
                _ => IrType::OBJECT,
            };
            let array = self.lower_expr(*target)?;
            let lengths = self.bound_lengths(*arguments)?;
            let rank = u32::try_from(lengths.len()).map_err(|_| {
                LowerError::malformed(format!("ReDim at {} has too many bounds", tree.span(id)))
            })?;
            let allocation = IrExpr::ArrayCreate {
                element: element.clone(),
                lengths,
                initializer: None,
            };
            if !preserve {
                lowered.push(IrStmt::assign(array, allocation));
                continue;
            }
            let temp = self
                .names
                .fresh(&format!("{}Preserved", name.as_deref().unwrap_or("array")));
            debug!(%temp, "ReDim Preserve through temporary");
            let copied = IrExpr::static_call(
                "Math",
                "Min",
                vec![
                    IrExpr::field(array.clone(), "Length"),
                    IrExpr::field(IrExpr::var(temp.as_str()), "Length"),
                ],
            );
            lowered.push(IrStmt::declare(
                temp.as_str(),
                IrType::array(element, rank),
                Some(allocation),
            ));
            lowered.push(IrStmt::Expression(IrExpr::static_call(
                "Array",
                "Copy",
                vec![array.clone(), IrExpr::var(temp.as_str()), copied],
            )));
            lowered.push(IrStmt::assign(array, IrExpr::var(temp)));
        }
        Ok(lowered)
    }
}
