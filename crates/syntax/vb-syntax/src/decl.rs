//! Declaration payloads

use crate::error::SyntaxError;
use crate::kind::{NodeFamily, NodeKind};
use crate::node::{invalid_enumerant, NodeId, Payload, Slots};
use crate::token::{BlockType, Charset, OperatorKind, OptionKind};

/// Attribute blocks and modifiers leading a declaration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclHeader {
    /// `AttributeBlockCollection`
    pub attributes: Option<NodeId>,
    /// `ModifierCollection`
    pub modifiers: Option<NodeId>,
}

impl DeclHeader {
    fn push(self, slots: &mut Slots) {
        slots.optional_kind(
            "attributes",
            self.attributes,
            NodeKind::AttributeBlockCollection,
        );
        slots.optional_kind("modifiers", self.modifiers, NodeKind::ModifierCollection);
    }
}

/// Name, type parameters, parameters and result type of a routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Routine name
    pub name: NodeId,
    /// `(Of T)` list
    pub type_parameters: Option<NodeId>,
    /// Parameter list
    pub parameters: Option<NodeId>,
    /// `As T` result, only on functions and properties
    pub result_type: Option<NodeId>,
}

impl Signature {
    /// Signature with only a name
    #[must_use]
    pub const fn named(name: NodeId) -> Self {
        Self {
            name,
            type_parameters: None,
            parameters: None,
            result_type: None,
        }
    }

    fn push(self, slots: &mut Slots) {
        slots.kind("name", self.name, NodeKind::SimpleName);
        slots.optional_kind(
            "type_parameters",
            self.type_parameters,
            NodeKind::TypeParameterCollection,
        );
        slots.optional_kind("parameters", self.parameters, NodeKind::ParameterCollection);
        slots.optional_family("result_type", self.result_type, NodeFamily::Type);
    }
}

/// Declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    /// Blank declaration line
    Empty,
    /// `End Sub`, `End Class`, ...
    EndBlock {
        /// Closed block
        block: BlockType,
    },
    /// `Option ...`
    Option(OptionKind),
    /// `Imports a, b = c`
    Imports {
        /// `ImportCollection`
        imports: NodeId,
    },
    /// `<Assembly: ...>`
    Attribute {
        /// `AttributeBlockCollection`
        attributes: NodeId,
    },
    /// `Namespace N ... End Namespace`
    Namespace {
        /// Namespace name
        name: NodeId,
        /// Members
        declarations: Option<NodeId>,
        /// Closing declaration
        end: Option<NodeId>,
    },
    /// `Class`, `Module`, `Structure`, `Interface`
    TypeBlock {
        /// Attributes and modifiers
        header: DeclHeader,
        /// Type name
        name: NodeId,
        /// `(Of T)` list
        type_parameters: Option<NodeId>,
        /// Members
        declarations: Option<NodeId>,
        /// Closing declaration
        end: Option<NodeId>,
    },
    /// `Enum E [As T] ... End Enum`
    Enum {
        /// Attributes and modifiers
        header: DeclHeader,
        /// Enum name
        name: NodeId,
        /// Underlying type
        underlying: Option<NodeId>,
        /// Enum values
        members: Option<NodeId>,
        /// Closing declaration
        end: Option<NodeId>,
    },
    /// `Name [= value]` inside an enum
    EnumValue {
        /// Attributes and modifiers
        header: DeclHeader,
        /// Member name
        name: NodeId,
        /// Explicit value
        value: Option<NodeId>,
    },
    /// `Delegate Sub` / `Delegate Function`
    Delegate {
        /// Attributes and modifiers
        header: DeclHeader,
        /// Signature
        signature: Signature,
    },
    /// `Event E(args)`
    Event {
        /// Attributes and modifiers
        header: DeclHeader,
        /// Signature
        signature: Signature,
        /// `Implements` list
        implements: Option<NodeId>,
    },
    /// `Sub`, `Function`, `Sub New` and `Operator`
    Method {
        /// Attributes and modifiers
        header: DeclHeader,
        /// Signature
        signature: Signature,
        /// Overloaded operator, only on `Operator` declarations
        operator: Option<OperatorKind>,
        /// `Implements` list
        implements: Option<NodeId>,
        /// Body
        statements: Option<NodeId>,
        /// Closing declaration
        end: Option<NodeId>,
    },
    /// `Declare [charset] Sub|Function name Lib "lib" [Alias "alias"]`
    External {
        /// Attributes and modifiers
        header: DeclHeader,
        /// Signature
        signature: Signature,
        /// Character set
        charset: Charset,
        /// Library name
        library: String,
        /// Entry point alias
        alias: Option<String>,
    },
    /// `Property P ... End Property`
    Property {
        /// Attributes and modifiers
        header: DeclHeader,
        /// Signature
        signature: Signature,
        /// `Implements` list
        implements: Option<NodeId>,
        /// `Get` and `Set` accessors
        accessors: Option<NodeId>,
        /// Closing declaration
        end: Option<NodeId>,
    },
    /// `Get ... End Get` and `Set(value) ... End Set`
    Accessor {
        /// Attributes and modifiers
        header: DeclHeader,
        /// `Set` parameter list
        parameters: Option<NodeId>,
        /// Body
        statements: Option<NodeId>,
        /// Closing declaration
        end: Option<NodeId>,
    },
    /// Field list (`Dim`, `Private`, `Const`, ...)
    VariableList {
        /// Attributes and modifiers
        header: DeclHeader,
        /// Declared fields
        declarators: NodeId,
    },
    /// `Inherits` and `Implements` lists
    TypeList {
        /// `TypeNameCollection`
        types: NodeId,
    },
}

impl Payload for Decl {
    fn accepts(&self, kind: NodeKind) -> bool {
        use NodeKind as K;
        match self {
            Self::Empty => kind == K::EmptyDeclaration,
            Self::EndBlock { .. } => kind == K::EndBlockDeclaration,
            Self::Option(_) => kind == K::OptionDeclaration,
            Self::Imports { .. } => kind == K::ImportsDeclaration,
            Self::Attribute { .. } => kind == K::AttributeDeclaration,
            Self::Namespace { .. } => kind == K::NamespaceDeclaration,
            Self::TypeBlock { .. } => matches!(
                kind,
                K::ClassDeclaration
                    | K::ModuleDeclaration
                    | K::StructureDeclaration
                    | K::InterfaceDeclaration
            ),
            Self::Enum { .. } => kind == K::EnumDeclaration,
            Self::EnumValue { .. } => kind == K::EnumValueDeclaration,
            Self::Delegate { .. } => {
                matches!(kind, K::DelegateSubDeclaration | K::DelegateFunctionDeclaration)
            }
            Self::Event { .. } => kind == K::EventDeclaration,
            Self::Method { .. } => matches!(
                kind,
                K::SubDeclaration
                    | K::FunctionDeclaration
                    | K::ConstructorDeclaration
                    | K::OperatorDeclaration
            ),
            Self::External { .. } => {
                matches!(kind, K::ExternalSubDeclaration | K::ExternalFunctionDeclaration)
            }
            Self::Property { .. } => kind == K::PropertyDeclaration,
            Self::Accessor { .. } => {
                matches!(kind, K::GetAccessorDeclaration | K::SetAccessorDeclaration)
            }
            Self::VariableList { .. } => kind == K::VariableListDeclaration,
            Self::TypeList { .. } => {
                matches!(kind, K::InheritsDeclaration | K::ImplementsDeclaration)
            }
        }
    }

    fn slots(&self, slots: &mut Slots) {
        const MEMBERS: NodeKind = NodeKind::DeclarationCollection;
        const END: NodeKind = NodeKind::EndBlockDeclaration;
        const BODY: NodeKind = NodeKind::StatementCollection;
        match self {
            Self::Empty | Self::EndBlock { .. } | Self::Option(_) => {}
            Self::Imports { imports } => slots.kind("imports", *imports, NodeKind::ImportCollection),
            Self::Attribute { attributes } => {
                slots.kind("attributes", *attributes, NodeKind::AttributeBlockCollection);
            }
            Self::Namespace {
                name,
                declarations,
                end,
            } => {
                slots.family("name", *name, NodeFamily::Name);
                slots.optional_kind("declarations", *declarations, MEMBERS);
                slots.optional_kind("end", *end, END);
            }
            Self::TypeBlock {
                header,
                name,
                type_parameters,
                declarations,
                end,
            } => {
                header.push(slots);
                slots.kind("name", *name, NodeKind::SimpleName);
                slots.optional_kind(
                    "type_parameters",
                    *type_parameters,
                    NodeKind::TypeParameterCollection,
                );
                slots.optional_kind("declarations", *declarations, MEMBERS);
                slots.optional_kind("end", *end, END);
            }
            Self::Enum {
                header,
                name,
                underlying,
                members,
                end,
            } => {
                header.push(slots);
                slots.kind("name", *name, NodeKind::SimpleName);
                slots.optional_family("underlying", *underlying, NodeFamily::Type);
                slots.optional_kind("members", *members, MEMBERS);
                slots.optional_kind("end", *end, END);
            }
            Self::EnumValue {
                header,
                name,
                value,
            } => {
                header.push(slots);
                slots.kind("name", *name, NodeKind::SimpleName);
                slots.optional_family("value", *value, NodeFamily::Expression);
            }
            Self::Delegate { header, signature } | Self::External {
                header, signature, ..
            } => {
                header.push(slots);
                signature.push(slots);
            }
            Self::Event {
                header,
                signature,
                implements,
            } => {
                header.push(slots);
                signature.push(slots);
                slots.optional_kind("implements", *implements, NodeKind::NameCollection);
            }
            Self::Method {
                header,
                signature,
                implements,
                statements,
                end,
                ..
            } => {
                header.push(slots);
                signature.push(slots);
                slots.optional_kind("implements", *implements, NodeKind::NameCollection);
                slots.optional_kind("statements", *statements, BODY);
                slots.optional_kind("end", *end, END);
            }
            Self::Property {
                header,
                signature,
                implements,
                accessors,
                end,
            } => {
                header.push(slots);
                signature.push(slots);
                slots.optional_kind("implements", *implements, NodeKind::NameCollection);
                slots.optional_kind("accessors", *accessors, MEMBERS);
                slots.optional_kind("end", *end, END);
            }
            Self::Accessor {
                header,
                parameters,
                statements,
                end,
            } => {
                header.push(slots);
                slots.optional_kind("parameters", *parameters, NodeKind::ParameterCollection);
                slots.optional_kind("statements", *statements, BODY);
                slots.optional_kind("end", *end, END);
            }
            Self::VariableList {
                header,
                declarators,
            } => {
                header.push(slots);
                slots.kind(
                    "declarators",
                    *declarators,
                    NodeKind::VariableDeclaratorCollection,
                );
            }
            Self::TypeList { types } => slots.kind("types", *types, NodeKind::TypeNameCollection),
        }
    }

    fn check_enumerants(&self, kind: NodeKind) -> Result<(), SyntaxError> {
        match self {
            Self::EndBlock { block } if !block.closes_declaration() => {
                Err(invalid_enumerant(kind, "block", block))
            }
            Self::Option(OptionKind::Base(base)) if *base > 1 => {
                Err(invalid_enumerant(kind, "base", base))
            }
            Self::Method { operator, .. } => {
                match (kind == NodeKind::OperatorDeclaration, operator) {
                    (true, None) => Err(invalid_enumerant(kind, "operator", "none")),
                    (false, Some(op)) => Err(invalid_enumerant(kind, "operator", op)),
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }
}
