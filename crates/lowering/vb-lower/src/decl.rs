//! Files, types and their members

use crate::context::LowerContext;
use crate::error::LowerError;
use crate::types::visibility;
use indexmap::IndexSet;
use tracing::trace;
use vb_ir::{
    IrEnum, IrEnumMember, IrField, IrImport, IrMember, IrProgram, IrTypeDecl, TypeKind, Visibility,
};
use vb_syntax::token::ModifierKind;
use vb_syntax::{Decl, Import, NodeData, NodeId, NodeKind};

/// Declarations that contribute no member to the top-level type
fn is_directive(decl: Option<&Decl>) -> bool {
    matches!(
        decl,
        Some(Decl::Option(_) | Decl::Imports { .. } | Decl::Empty | Decl::EndBlock { .. })
    )
}

const fn type_kind(kind: NodeKind) -> Option<TypeKind> {
    match kind {
        NodeKind::ClassDeclaration => Some(TypeKind::Class),
        NodeKind::ModuleDeclaration => Some(TypeKind::Module),
        NodeKind::StructureDeclaration => Some(TypeKind::Struct),
        _ => None,
    }
}

impl LowerContext<'_> {
    /// The whole file as one program
    ///
    /// A file holding exactly one class, module or structure becomes that
    /// type; anything else is wrapped in a module named after the
    /// configured class name. Directives apply in source order.
    pub fn lower_file(&mut self) -> Result<IrProgram, LowerError> {
        let tree = self.tree;
        let root = tree.root();
        let NodeData::File(file) = tree.data(root) else {
            return Err(LowerError::malformed(format!(
                "root is {}, not a file",
                tree.kind(root)
            )));
        };
        let declarations: Vec<NodeId> = tree.elements(file.declarations).collect();
        let members: Vec<NodeId> = declarations
            .iter()
            .copied()
            .filter(|&declaration| !is_directive(tree.decl(declaration)))
            .collect();
        let single = match members.as_slice() {
            [only] if type_kind(tree.kind(*only)).is_some() => Some(*only),
            _ => None,
        };

        let mut imports = IndexSet::new();
        let mut wrapper = IrTypeDecl::new(self.options.class_name.as_str(), TypeKind::Module);
        let mut lowered = None;
        for declaration in declarations {
            match tree.decl(declaration) {
                Some(Decl::Option(option)) => self.apply_option(*option),
                Some(Decl::Imports { imports: clauses }) => {
                    for clause in tree.elements(Some(*clauses)) {
                        imports.insert(self.lower_import(clause)?);
                    }
                }
                Some(Decl::Empty | Decl::EndBlock { .. }) => {}
                _ if Some(declaration) == single => {
                    lowered = Some(self.lower_type_block(declaration)?);
                }
                _ => {
                    let name = wrapper.name.clone();
                    let lowered = self.lower_members(declaration, &name, true)?;
                    wrapper.members.extend(lowered);
                }
            }
        }
        Ok(IrProgram {
            namespace: self.options.namespace.clone(),
            imports,
            options: self.source,
            ty: lowered.unwrap_or(wrapper),
        })
    }

    fn lower_import(&self, clause: NodeId) -> Result<IrImport, LowerError> {
        match self.tree.data(clause) {
            NodeData::Import(Import::Name { target }) => Ok(IrImport {
                alias: None,
                target: self.qualified_text(*target)?,
            }),
            NodeData::Import(Import::Alias { alias, target }) => Ok(IrImport {
                alias: Some(self.text(*alias)?),
                target: self.qualified_text(*target)?,
            }),
            _ => Err(self.unsupported(clause)),
        }
    }

    /// `Class`, `Module` or `Structure` with its members
    pub fn lower_type_block(&mut self, id: NodeId) -> Result<IrTypeDecl, LowerError> {
        let tree = self.tree;
        let (Some(kind), Some(Decl::TypeBlock {
            header,
            name,
            type_parameters,
            declarations,
            ..
        })) = (type_kind(tree.kind(id)), tree.decl(id))
        else {
            return Err(self.unsupported(id));
        };
        let modifiers = self.modifiers(header.modifiers);
        let mut ty = IrTypeDecl::new(self.text(*name)?, kind);
        ty.visibility = visibility(&modifiers, Visibility::Public);
        ty.type_parameters = self.type_parameters(*type_parameters)?;
        ty.comments = self.comments(id);
        let in_module = kind == TypeKind::Module;
        for member in tree.elements(*declarations) {
            if let Some(Decl::TypeList { types }) = tree.decl(member) {
                for base in tree.elements(Some(*types)) {
                    ty.base_types.push(self.lower_type(base)?);
                }
                continue;
            }
            let lowered = self.lower_members(member, &ty.name, in_module)?;
            ty.members.extend(lowered);
        }
        trace!(name = %ty.name, %kind, members = ty.members.len(), "lowered type");
        Ok(ty)
    }

    /// Members contributed by one declaration; a field list yields one
    /// field per declared name
    fn lower_members(
        &mut self,
        id: NodeId,
        owner: &str,
        in_module: bool,
    ) -> Result<Vec<IrMember>, LowerError> {
        let tree = self.tree;
        let Some(decl) = tree.decl(id) else {
            return Err(self.unsupported(id));
        };
        let member = match decl {
            Decl::Empty | Decl::EndBlock { .. } => return Ok(Vec::new()),
            Decl::VariableList {
                header,
                declarators,
            } => return self.lower_fields(id, header.modifiers, *declarators, in_module),
            Decl::Method {
                header,
                signature,
                statements,
                ..
            } => IrMember::Method(self.lower_method(
                id,
                *header,
                *signature,
                *statements,
                owner,
                in_module,
            )?),
            Decl::External { .. } => IrMember::Method(self.lower_external(id)?),
            Decl::Property { .. } => IrMember::Property(self.lower_property(id, in_module)?),
            Decl::Enum { .. } => IrMember::Enum(self.lower_enum(id)?),
            Decl::TypeBlock { .. } => IrMember::Type(self.lower_type_block(id)?),
            _ => return Err(self.unsupported(id)),
        };
        Ok(vec![member])
    }

    fn lower_fields(
        &mut self,
        id: NodeId,
        modifiers: Option<NodeId>,
        declarators: NodeId,
        in_module: bool,
    ) -> Result<Vec<IrMember>, LowerError> {
        let tree = self.tree;
        let modifiers = self.modifiers(modifiers);
        let is_const = modifiers.contains(&ModifierKind::Const);
        let mut comments = self.comments(id);
        let mut fields = Vec::new();
        for declarator in tree.elements(Some(declarators)) {
            for variable in self.declared_variables(declarator)? {
                if is_const && variable.init.is_none() {
                    return Err(self.unsupported(declarator));
                }
                fields.push(IrMember::Field(IrField {
                    name: variable.name,
                    ty: variable.ty,
                    visibility: visibility(&modifiers, Visibility::Private),
                    is_static: in_module || modifiers.contains(&ModifierKind::Shared),
                    is_const,
                    is_readonly: modifiers.contains(&ModifierKind::ReadOnly),
                    init: variable.init,
                    comments: std::mem::take(&mut comments),
                }));
            }
        }
        Ok(fields)
    }

    fn lower_enum(&mut self, id: NodeId) -> Result<IrEnum, LowerError> {
        let tree = self.tree;
        let Some(Decl::Enum {
            header,
            name,
            underlying,
            members,
            ..
        }) = tree.decl(id)
        else {
            return Err(self.unsupported(id));
        };
        let modifiers = self.modifiers(header.modifiers);
        let mut lowered = IrEnum {
            name: self.text(*name)?,
            visibility: visibility(&modifiers, Visibility::Public),
            underlying: self.lower_optional_type(*underlying)?,
            members: Vec::new(),
        };
        for member in tree.elements(*members) {
            match tree.decl(member) {
                Some(Decl::EnumValue { name, value, .. }) => {
                    let value = match value {
                        Some(value) => Some(self.lower_expr(*value)?),
                        None => None,
                    };
                    lowered.members.push(IrEnumMember {
                        name: self.text(*name)?,
                        value,
                    });
                }
                Some(Decl::Empty | Decl::EndBlock { .. }) => {}
                _ => return Err(self.unsupported(member)),
            }
        }
        Ok(lowered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_class_module_and_structure_are_types() {
        assert_eq!(type_kind(NodeKind::ModuleDeclaration), Some(TypeKind::Module));
        assert_eq!(type_kind(NodeKind::StructureDeclaration), Some(TypeKind::Struct));
        assert_eq!(type_kind(NodeKind::InterfaceDeclaration), None);
        assert!(is_directive(Some(&Decl::Empty)));
        assert!(!is_directive(None));
    }
}
