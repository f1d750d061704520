//! Type names, declared variable types and modifiers

use crate::context::LowerContext;
use crate::error::LowerError;
use vb_ir::{IrType, PrimitiveType, Visibility};
use vb_syntax::token::{IntrinsicType, ModifierKind, TypeCharacter};
use vb_syntax::{Name, NodeData, NodeId, TypeName, VariableDeclarator};

pub(crate) const fn primitive(intrinsic: IntrinsicType) -> PrimitiveType {
    match intrinsic {
        IntrinsicType::Boolean => PrimitiveType::Bool,
        IntrinsicType::SByte => PrimitiveType::SByte,
        IntrinsicType::Byte => PrimitiveType::Byte,
        IntrinsicType::Short => PrimitiveType::Short,
        IntrinsicType::UShort => PrimitiveType::UShort,
        IntrinsicType::Integer => PrimitiveType::Int,
        IntrinsicType::UInteger => PrimitiveType::UInt,
        IntrinsicType::Long => PrimitiveType::Long,
        IntrinsicType::ULong => PrimitiveType::ULong,
        IntrinsicType::Decimal => PrimitiveType::Decimal,
        IntrinsicType::Single => PrimitiveType::Float,
        IntrinsicType::Double => PrimitiveType::Double,
        IntrinsicType::Date => PrimitiveType::DateTime,
        IntrinsicType::Char => PrimitiveType::Char,
        IntrinsicType::String => PrimitiveType::String,
        IntrinsicType::Object => PrimitiveType::Object,
    }
}

fn type_character(character: TypeCharacter) -> IrType {
    IrType::Primitive(primitive(character.intrinsic()))
}

/// Zero value of `ty`, used for result shadows and bare exits
pub(crate) fn default_value(ty: &IrType) -> vb_ir::IrExpr {
    match ty {
        IrType::Primitive(primitive) if primitive.is_numeric() => vb_ir::IrExpr::int(0),
        IrType::Primitive(PrimitiveType::Bool) => vb_ir::IrExpr::bool(false),
        other => vb_ir::IrExpr::Default(other.clone()),
    }
}

impl LowerContext<'_> {
    /// Dotted text of a name node
    pub fn qualified_text(&self, id: NodeId) -> Result<String, LowerError> {
        match self.tree.name(id) {
            Some(Name::Simple(simple)) => Ok(simple.text.clone()),
            Some(Name::Special(_)) => Ok("global:".to_owned()),
            Some(Name::Qualified {
                qualifier, name, ..
            }) => {
                let qualifier = self.qualified_text(*qualifier)?;
                let name = self.text(*name)?;
                if qualifier.ends_with(':') {
                    Ok(format!("{qualifier}:{name}"))
                } else {
                    Ok(format!("{qualifier}.{name}"))
                }
            }
            Some(Name::Variable { name, .. }) => self.text(*name),
            None => Err(self.unsupported(id)),
        }
    }

    pub fn lower_type(&self, id: NodeId) -> Result<IrType, LowerError> {
        let Some(ty) = self.tree.type_name(id) else {
            return Err(self.unsupported(id));
        };
        match ty {
            TypeName::Intrinsic(intrinsic) => Ok(IrType::Primitive(primitive(*intrinsic))),
            TypeName::Named { name } => Ok(IrType::Named(self.qualified_text(*name)?)),
            TypeName::Array { element, rank, .. } => {
                let element = match element {
                    Some(element) => self.lower_type(*element)?,
                    None => IrType::OBJECT,
                };
                Ok(IrType::array(element, *rank))
            }
            TypeName::Constructed {
                name,
                type_arguments,
            } => Ok(IrType::Generic {
                name: self.qualified_text(*name)?,
                arguments: self
                    .tree
                    .elements(Some(*type_arguments))
                    .map(|argument| self.lower_type(argument))
                    .collect::<Result<_, _>>()?,
            }),
        }
    }

    pub fn lower_optional_type(&self, id: Option<NodeId>) -> Result<Option<IrType>, LowerError> {
        id.map(|id| self.lower_type(id)).transpose()
    }

    /// Type of the variable named by the `VariableName` node `variable`
    ///
    /// An `As` clause wins over a type character; a name with array
    /// bounds or `()` wraps the result in an array of that rank.
    pub fn variable_type(
        &self,
        variable: NodeId,
        declared: Option<NodeId>,
    ) -> Result<IrType, LowerError> {
        let (name, array_type) = match self.tree.name(variable) {
            Some(Name::Variable { name, array_type }) => (*name, *array_type),
            _ => (variable, None),
        };
        let mut ty = match declared {
            Some(declared) => self.lower_type(declared)?,
            None => match self.tree.name(name) {
                Some(Name::Simple(simple)) => {
                    simple.type_character.map_or(IrType::OBJECT, type_character)
                }
                _ => IrType::OBJECT,
            },
        };
        if let Some(array_type) = array_type {
            if let Some(TypeName::Array { rank, .. }) = self.tree.type_name(array_type) {
                ty = IrType::array(ty, *rank);
            }
        }
        Ok(ty)
    }

    /// Type of `name` as declared by `declarator`, `object` when unknown
    pub fn declarator_type(&self, declarator: NodeId, name: &str) -> Result<IrType, LowerError> {
        let Some(VariableDeclarator { names, ty, .. }) = self.tree.declarator(declarator) else {
            return Ok(IrType::OBJECT);
        };
        let variable = self
            .tree
            .elements(Some(*names))
            .find(|&variable| self.tree.name_text(variable) == Some(name));
        match variable {
            Some(variable) => self.variable_type(variable, *ty),
            None => Ok(IrType::OBJECT),
        }
    }

    /// Routine result type: `As` clause, else the name's type character,
    /// else `object`
    pub fn result_type(&self, name: NodeId, declared: Option<NodeId>) -> Result<IrType, LowerError> {
        self.variable_type(name, declared)
    }

    pub fn modifiers(&self, collection: Option<NodeId>) -> Vec<ModifierKind> {
        self.tree
            .elements(collection)
            .filter_map(|id| match self.tree.data(id) {
                NodeData::Modifier(modifier) => Some(*modifier),
                _ => None,
            })
            .collect()
    }
}

/// Accessibility stated by `modifiers`, else `default`
pub(crate) fn visibility(modifiers: &[ModifierKind], default: Visibility) -> Visibility {
    let has = |kind| modifiers.contains(&kind);
    match (
        has(ModifierKind::Public),
        has(ModifierKind::Protected),
        has(ModifierKind::Friend),
        has(ModifierKind::Private),
    ) {
        (true, ..) => Visibility::Public,
        (_, true, true, _) => Visibility::ProtectedInternal,
        (_, true, false, _) => Visibility::Protected,
        (_, false, true, _) => Visibility::Internal,
        (_, false, false, true) => Visibility::Private,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_combinations() {
        use ModifierKind as M;
        assert_eq!(
            visibility(&[M::Protected, M::Friend], Visibility::Private),
            Visibility::ProtectedInternal
        );
        assert_eq!(visibility(&[M::Dim], Visibility::Private), Visibility::Private);
        assert_eq!(visibility(&[M::Shared], Visibility::Public), Visibility::Public);
        assert_eq!(visibility(&[M::Friend], Visibility::Public), Visibility::Internal);
    }

    #[test]
    fn test_zero_values() {
        let double = IrType::Primitive(PrimitiveType::Double);
        assert_eq!(default_value(&double), vb_ir::IrExpr::int(0));
        let text = IrType::Primitive(PrimitiveType::String);
        assert_eq!(default_value(&text), vb_ir::IrExpr::Default(text));
    }
}
