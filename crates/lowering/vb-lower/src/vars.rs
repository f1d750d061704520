//! Variables introduced by a declarator, shared by locals and fields

use crate::context::LowerContext;
use crate::error::LowerError;
use vb_ir::{IrExpr, IrType};
use vb_syntax::{Initializer, Name, NodeData, NodeId, TypeName, VariableDeclarator};

/// One name of a declarator with its type and initial value
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DeclaredVariable {
    pub name: String,
    pub ty: IrType,
    pub init: Option<IrExpr>,
}

impl LowerContext<'_> {
    /// Every variable declared by `declarator`, in name order
    ///
    /// `As New T(args)` constructs, explicit bounds allocate, an
    /// initializer is lowered as written.
    pub fn declared_variables(
        &mut self,
        declarator: NodeId,
    ) -> Result<Vec<DeclaredVariable>, LowerError> {
        let tree = self.tree;
        let Some(VariableDeclarator {
            names,
            ty,
            is_new,
            arguments,
            initializer,
        }) = tree.declarator(declarator)
        else {
            return Err(self.unsupported(declarator));
        };
        let mut variables = Vec::new();
        for variable in tree.elements(Some(*names)) {
            let name = self.text(variable)?;
            let var_ty = self.variable_type(variable, *ty)?;
            let init = if let Some(initializer) = initializer {
                Some(self.lower_initializer(*initializer, &var_ty)?)
            } else if *is_new {
                Some(IrExpr::ObjectCreate {
                    ty: var_ty.clone(),
                    args: self.lower_arguments(*arguments)?,
                })
            } else {
                self.array_allocation(variable, &var_ty)?
            };
            variables.push(DeclaredVariable {
                name,
                ty: var_ty,
                init,
            });
        }
        Ok(variables)
    }

    fn lower_initializer(&mut self, initializer: NodeId, ty: &IrType) -> Result<IrExpr, LowerError> {
        let tree = self.tree;
        match tree.data(initializer) {
            NodeData::Initializer(Initializer::Expression { expression }) => {
                self.lower_expr(*expression)
            }
            NodeData::Initializer(Initializer::Aggregate { .. }) => {
                let element = ty.element().cloned().unwrap_or(IrType::OBJECT);
                Ok(IrExpr::ArrayCreate {
                    element,
                    lengths: Vec::new(),
                    initializer: Some(self.lower_aggregate(initializer)?),
                })
            }
            _ => Err(self.unsupported(initializer)),
        }
    }

    /// `new T[n]` for a name declared with explicit bounds, `a(10)`
    fn array_allocation(
        &mut self,
        variable: NodeId,
        ty: &IrType,
    ) -> Result<Option<IrExpr>, LowerError> {
        let tree = self.tree;
        let Some(Name::Variable {
            array_type: Some(array_type),
            ..
        }) = tree.name(variable)
        else {
            return Ok(None);
        };
        let Some(TypeName::Array {
            bounds: Some(bounds),
            ..
        }) = tree.type_name(*array_type)
        else {
            return Ok(None);
        };
        let element = ty.element().cloned().unwrap_or(IrType::OBJECT);
        Ok(Some(IrExpr::ArrayCreate {
            element,
            lengths: self.bound_lengths(Some(*bounds))?,
            initializer: None,
        }))
    }
}
