//! Methods, properties and the statements that leave them
//!
//! A routine that assigns to its own name gets a shadow local: declared
//! first with the zero value of the result type, assigned wherever the
//! source assigns the routine name, and returned at the end and at every
//! exit. `GoSub` and the bare `Return` that ends a legacy subroutine are
//! paired through a synthesized return-point label.

use crate::context::{LowerContext, NameGenerator, Routine};
use crate::error::LowerError;
use crate::stmt::label_name;
use crate::types::{default_value, visibility};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};
use vb_ir::{
    ExternInfo, IrExpr, IrMethod, IrParameter, IrProperty, IrStmt, IrType, MethodKind,
    ParameterDirection, Visibility,
};
use vb_syntax::token::{BlockType, ModifierKind};
use vb_syntax::{
    Decl, DeclHeader, Expr, Initializer, NodeData, NodeId, NodeKind, Parameter, Signature, Stmt,
    SyntaxTree,
};

/// Name of the label a legacy subroutine returns to
pub(crate) fn return_point(label: &str) -> String {
    format!("{label}_return")
}

/// Nearest method or accessor enclosing `id`
pub(crate) fn enclosing_routine(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    tree.enclosing(id, |kind| {
        matches!(
            kind,
            NodeKind::SubDeclaration
                | NodeKind::FunctionDeclaration
                | NodeKind::ConstructorDeclaration
                | NodeKind::OperatorDeclaration
                | NodeKind::GetAccessorDeclaration
                | NodeKind::SetAccessorDeclaration
        )
    })
}

/// Whether a statement under `routine` assigns to `name`
fn assigns_own_name(tree: &SyntaxTree, routine: NodeId, name: &str) -> bool {
    tree.descendants(routine).any(|id| {
        let target = match tree.stmt(id) {
            Some(
                Stmt::Assignment { target, .. }
                | Stmt::CompoundAssignment { target, .. }
                | Stmt::MidAssignment { target, .. },
            ) => *target,
            _ => return false,
        };
        matches!(tree.expr(target), Some(Expr::SimpleName { name: simple })
            if tree.name_text(*simple).is_some_and(|text| text.eq_ignore_ascii_case(name)))
    })
}

/// Label closest before `id` in the routine, in source order
fn preceding_label(tree: &SyntaxTree, routine: NodeId, id: NodeId) -> Option<String> {
    let mut label = None;
    for node in tree.descendants(routine) {
        if node == id {
            break;
        }
        if let Some(Stmt::LabelReference {
            name,
            is_line_number,
        }) = tree.stmt(node)
        {
            if tree.kind(node) == NodeKind::LabelStatement {
                label = Some(label_name(name, *is_line_number));
            }
        }
    }
    label
}

/// Whether any `GoSub` under `routine` targets `label`
fn is_gosub_target(tree: &SyntaxTree, routine: NodeId, label: &str) -> bool {
    tree.descendants(routine).any(|node| {
        tree.kind(node) == NodeKind::GoSubStatement
            && matches!(tree.stmt(node), Some(Stmt::LabelReference { name, is_line_number })
                if label_name(name, *is_line_number).eq_ignore_ascii_case(label))
    })
}

impl LowerContext<'_> {
    /// Body of a method or accessor, with the shadow result when the
    /// routine assigns to its own name
    fn lower_routine_body(
        &mut self,
        node: NodeId,
        name: &str,
        return_type: &IrType,
        statements: Option<NodeId>,
    ) -> Result<Vec<IrStmt>, LowerError> {
        let mut names = NameGenerator::for_subtree(self.tree, node);
        let shadow = (*return_type != IrType::Void && assigns_own_name(self.tree, node, name))
            .then(|| names.fresh(&format!("{name}Result")));
        if let Some(shadow) = &shadow {
            debug!(routine = name, %shadow, "implicit result shadow");
        }
        let routine = Routine {
            name: name.to_owned(),
            shadow: shadow.clone(),
            return_type: return_type.clone(),
            return_points: FxHashSet::default(),
        };
        self.in_routine(routine, names, |context| {
            let mut body = Vec::new();
            if let Some(shadow) = &shadow {
                body.push(IrStmt::declare(
                    shadow.as_str(),
                    return_type.clone(),
                    Some(default_value(return_type)),
                ));
            }
            body.extend(context.lower_body(statements)?);
            if let Some(shadow) = shadow {
                body.push(IrStmt::Return(Some(IrExpr::var(shadow))));
            }
            Ok(body)
        })
    }

    pub fn lower_parameters(
        &mut self,
        parameters: Option<NodeId>,
    ) -> Result<Vec<IrParameter>, LowerError> {
        let tree = self.tree;
        tree.elements(parameters)
            .map(|parameter| {
                let NodeData::Parameter(Parameter {
                    modifiers,
                    name,
                    ty,
                    initializer,
                    ..
                }) = tree.data(parameter)
                else {
                    return Err(self.unsupported(parameter));
                };
                let modifiers = self.modifiers(*modifiers);
                let default = match initializer.map(|initializer| tree.data(initializer)) {
                    Some(NodeData::Initializer(Initializer::Expression {
                        expression,
                    })) => Some(self.lower_expr(*expression)?),
                    Some(_) => return Err(self.unsupported(parameter)),
                    None => None,
                };
                Ok(IrParameter {
                    name: self.text(*name)?,
                    ty: self.variable_type(*name, *ty)?,
                    direction: if modifiers.contains(&ModifierKind::ByRef) {
                        ParameterDirection::Ref
                    } else {
                        ParameterDirection::In
                    },
                    is_params: modifiers.contains(&ModifierKind::ParamArray),
                    default,
                })
            })
            .collect()
    }

    /// `Sub`, `Function` or `Sub New`
    pub fn lower_method(
        &mut self,
        id: NodeId,
        header: DeclHeader,
        signature: Signature,
        statements: Option<NodeId>,
        owner: &str,
        in_module: bool,
    ) -> Result<IrMethod, LowerError> {
        let modifiers = self.modifiers(header.modifiers);
        let name = self.text(signature.name)?;
        let (kind, method_name, return_type) = match self.tree.kind(id) {
            NodeKind::SubDeclaration => (MethodKind::Normal, name.clone(), IrType::Void),
            NodeKind::FunctionDeclaration => (
                MethodKind::Normal,
                name.clone(),
                self.result_type(signature.name, signature.result_type)?,
            ),
            NodeKind::ConstructorDeclaration => {
                (MethodKind::Constructor, owner.to_owned(), IrType::Void)
            }
            _ => return Err(self.unsupported(id)),
        };
        let parameters = self.lower_parameters(signature.parameters)?;
        let body = self.lower_routine_body(id, &name, &return_type, statements)?;
        trace!(method = %method_name, statements = body.len(), "lowered method");
        Ok(IrMethod {
            name: method_name,
            kind,
            visibility: visibility(&modifiers, Visibility::Public),
            is_static: in_module || modifiers.contains(&ModifierKind::Shared),
            type_parameters: self.type_parameters(signature.type_parameters)?,
            parameters,
            return_type,
            body,
            external: None,
            comments: self.comments(id),
        })
    }

    pub fn type_parameters(&self, collection: Option<NodeId>) -> Result<Vec<String>, LowerError> {
        let tree = self.tree;
        tree.elements(collection)
            .map(|parameter| match tree.data(parameter) {
                NodeData::TypeParameter(parameter) => self.text(parameter.name),
                _ => Err(self.unsupported(parameter)),
            })
            .collect()
    }

    /// `Declare Sub/Function ... Lib "x" [Alias "y"]`
    pub fn lower_external(&mut self, id: NodeId) -> Result<IrMethod, LowerError> {
        let Some(Decl::External {
            header,
            signature,
            charset,
            library,
            alias,
        }) = self.tree.decl(id).cloned()
        else {
            return Err(self.unsupported(id));
        };
        let modifiers = self.modifiers(header.modifiers);
        let return_type = match self.tree.kind(id) {
            NodeKind::ExternalFunctionDeclaration => {
                self.result_type(signature.name, signature.result_type)?
            }
            _ => IrType::Void,
        };
        Ok(IrMethod {
            name: self.text(signature.name)?,
            kind: MethodKind::Normal,
            visibility: visibility(&modifiers, Visibility::Public),
            is_static: true,
            type_parameters: Vec::new(),
            parameters: self.lower_parameters(signature.parameters)?,
            return_type,
            body: Vec::new(),
            external: Some(ExternInfo {
                library,
                entry_point: alias,
                charset: charset.to_string(),
            }),
            comments: self.comments(id),
        })
    }

    /// `Property` with its `Get` and `Set` accessors
    pub fn lower_property(&mut self, id: NodeId, in_module: bool) -> Result<IrProperty, LowerError> {
        let tree = self.tree;
        let Some(Decl::Property {
            header,
            signature,
            accessors,
            ..
        }) = tree.decl(id)
        else {
            return Err(self.unsupported(id));
        };
        let modifiers = self.modifiers(header.modifiers);
        let name = self.text(signature.name)?;
        let ty = self.result_type(signature.name, signature.result_type)?;
        let mut property = IrProperty {
            name: name.clone(),
            ty: ty.clone(),
            visibility: visibility(&modifiers, Visibility::Public),
            is_static: in_module || modifiers.contains(&ModifierKind::Shared),
            parameters: self.lower_parameters(signature.parameters)?,
            getter: None,
            setter: None,
            setter_parameter: "value".to_owned(),
            comments: self.comments(id),
        };
        for accessor in tree.elements(*accessors) {
            let (parameters, statements) = match tree.decl(accessor) {
                Some(Decl::Accessor {
                    parameters,
                    statements,
                    ..
                }) => (*parameters, *statements),
                Some(Decl::Empty | Decl::EndBlock { .. }) => continue,
                _ => return Err(self.unsupported(accessor)),
            };
            if tree.kind(accessor) == NodeKind::GetAccessorDeclaration {
                property.getter = Some(self.lower_routine_body(accessor, &name, &ty, statements)?);
                continue;
            }
            if let Some(NodeData::Parameter(Parameter { name, .. })) =
                tree.elements(parameters).next().map(|value| tree.data(value))
            {
                property.setter_parameter = self.text(*name)?;
            }
            property.setter =
                Some(self.lower_routine_body(accessor, &name, &IrType::Void, statements)?);
        }
        Ok(property)
    }

    /// `Exit Do/For/While` breaks out of the nearest loop; `Exit
    /// Sub/Function/Property` returns
    pub fn lower_exit(&mut self, id: NodeId, block: BlockType) -> Result<IrStmt, LowerError> {
        match block {
            BlockType::Do | BlockType::For | BlockType::While => {
                match self.enclosing_loop(id) {
                    Some((_, enclosing)) if enclosing == block => Ok(IrStmt::Break),
                    _ => Err(self.unsupported(id)),
                }
            }
            BlockType::Sub | BlockType::Function | BlockType::Property => {
                if let Some(shadow) = self.routine.as_ref().and_then(|routine| routine.shadow.clone()) {
                    return Ok(IrStmt::Return(Some(IrExpr::var(shadow))));
                }
                let return_type = self.exit_return_type(id)?;
                if return_type == IrType::Void {
                    Ok(IrStmt::Return(None))
                } else {
                    Ok(IrStmt::Return(Some(default_value(&return_type))))
                }
            }
            _ => Err(self.unsupported(id)),
        }
    }

    /// Result type of the routine enclosing `id`, found by walking up
    fn exit_return_type(&self, id: NodeId) -> Result<IrType, LowerError> {
        let tree = self.tree;
        let routine = enclosing_routine(tree, id).ok_or_else(|| {
            LowerError::malformed(format!("Exit at {} is outside any routine", tree.span(id)))
        })?;
        match (tree.kind(routine), tree.decl(routine)) {
            (NodeKind::FunctionDeclaration | NodeKind::OperatorDeclaration, Some(Decl::Method { signature, .. })) => {
                self.result_type(signature.name, signature.result_type)
            }
            (NodeKind::GetAccessorDeclaration, _) => {
                let property = tree
                    .ancestors(routine)
                    .find(|&ancestor| tree.kind(ancestor) == NodeKind::PropertyDeclaration);
                match property.and_then(|property| tree.decl(property)) {
                    Some(Decl::Property { signature, .. }) => {
                        self.result_type(signature.name, signature.result_type)
                    }
                    _ => Err(LowerError::malformed("Get accessor outside a property")),
                }
            }
            _ => Ok(IrType::Void),
        }
    }

    /// `Return [value]`; a bare `Return` after a `GoSub` target label
    /// jumps back to that `GoSub`
    pub fn lower_return(
        &mut self,
        id: NodeId,
        expression: Option<NodeId>,
    ) -> Result<IrStmt, LowerError> {
        if let Some(expression) = expression {
            return Ok(IrStmt::Return(Some(self.lower_expr(expression)?)));
        }
        let tree = self.tree;
        let routine = enclosing_routine(tree, id).ok_or_else(|| {
            LowerError::malformed(format!("Return at {} is outside any routine", tree.span(id)))
        })?;
        if let Some(label) = preceding_label(tree, routine, id) {
            if is_gosub_target(tree, routine, &label) {
                debug!(%label, "Return ends a GoSub subroutine");
                return Ok(IrStmt::Goto(return_point(&label)));
            }
        }
        trace!("Return leaves the routine");
        let shadow = self.routine.as_ref().and_then(|routine| routine.shadow.clone());
        Ok(IrStmt::Return(shadow.map(IrExpr::var)))
    }

    /// `GoSub L`: jump to `L`, then the return point the matching
    /// `Return` jumps back to
    ///
    /// A label has a single return point, so a second `GoSub` to it in the
    /// same routine has no lowering.
    pub fn lower_gosub(&mut self, id: NodeId, label: String) -> Result<Vec<IrStmt>, LowerError> {
        let first = self
            .routine
            .as_mut()
            .is_none_or(|routine| routine.return_points.insert(label.clone()));
        if !first {
            debug!(%label, "repeated GoSub to one label");
            return Err(self.unsupported(id));
        }
        let point = return_point(&label);
        Ok(vec![IrStmt::Goto(label), IrStmt::Label(point)])
    }
}
