//! Payloads of the smaller families: collections, comments, names, types,
//! initializers, arguments, declarators, case clauses, attributes,
//! parameters, imports, type parameters and the file itself

use crate::error::SyntaxError;
use crate::kind::{NodeFamily, NodeKind};
use crate::node::{invalid_enumerant, NodeId, Payload, Slots};
use crate::token::{AttributeTarget, IntrinsicType, OperatorKind, SpecialNameKind, TypeCharacter};
use vb_span::Location;

/// Ordered elements interleaved with separator positions
///
/// Elements may be holes (an omitted array bound, an omitted argument).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Elements in source order; `None` marks a hole
    pub elements: Vec<Option<NodeId>>,
    /// Positions of the separators between elements
    pub separators: Vec<Location>,
    /// Position of the closing delimiter, if the collection has one
    pub right_delimiter: Option<Location>,
}

impl Collection {
    /// Creates a collection without a closing delimiter
    #[must_use]
    pub const fn new(elements: Vec<Option<NodeId>>, separators: Vec<Location>) -> Self {
        Self {
            elements,
            separators,
            right_delimiter: None,
        }
    }

    /// Elements that are present, skipping holes
    pub fn present(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.elements.iter().flatten().copied()
    }

    /// Number of element positions, holes included
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether there are no element positions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Payload for Collection {
    fn accepts(&self, kind: NodeKind) -> bool {
        NodeFamily::Collection.contains(kind)
    }

    fn slots(&self, slots: &mut Slots) {
        let Some(rule) = slots.kind.element_rule() else {
            return;
        };
        for element in self.present() {
            slots.required("element", element, rule);
        }
    }

    fn check_enumerants(&self, kind: NodeKind) -> Result<(), SyntaxError> {
        if self.elements.is_empty() && self.separators.is_empty() {
            return Err(SyntaxError::EmptyCollection { kind });
        }
        Ok(())
    }
}

/// Source comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment text without the leading marker
    pub text: String,
    /// Whether the comment was written with `REM`
    pub is_rem: bool,
}

impl Payload for Comment {
    fn accepts(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Comment
    }

    fn slots(&self, _slots: &mut Slots) {}
}

/// Identifier with its optional type character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleName {
    /// Identifier text as written
    pub text: String,
    /// Trailing type character
    pub type_character: Option<TypeCharacter>,
    /// Whether the identifier was bracket-escaped
    pub escaped: bool,
}

impl SimpleName {
    /// Plain identifier
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            type_character: None,
            escaped: false,
        }
    }
}

/// Names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Name {
    /// `x`
    Simple(SimpleName),
    /// `Global`
    Special(SpecialNameKind),
    /// `A.B`
    Qualified {
        /// Left side
        qualifier: NodeId,
        /// Position of the dot
        dot: Location,
        /// Right side, a simple name
        name: NodeId,
    },
    /// Declared variable name, optionally with array bounds (`a(10)`)
    Variable {
        /// The simple name
        name: NodeId,
        /// Array modifier carried on the name
        array_type: Option<NodeId>,
    },
}

impl Payload for Name {
    fn accepts(&self, kind: NodeKind) -> bool {
        matches!(
            (self, kind),
            (Self::Simple(_), NodeKind::SimpleName)
                | (Self::Special(_), NodeKind::SpecialName)
                | (Self::Qualified { .. }, NodeKind::QualifiedName)
                | (Self::Variable { .. }, NodeKind::VariableName)
        )
    }

    fn slots(&self, slots: &mut Slots) {
        match self {
            Self::Simple(_) | Self::Special(_) => {}
            Self::Qualified {
                qualifier, name, ..
            } => {
                slots.family("qualifier", *qualifier, NodeFamily::Name);
                slots.kind("name", *name, NodeKind::SimpleName);
            }
            Self::Variable { name, array_type } => {
                slots.kind("name", *name, NodeKind::SimpleName);
                slots.optional_kind("array_type", *array_type, NodeKind::ArrayType);
            }
        }
    }
}

/// Type names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    /// Built-in type keyword
    Intrinsic(IntrinsicType),
    /// Named type
    Named {
        /// The name
        name: NodeId,
    },
    /// Array type, optionally with bounds
    Array {
        /// Element type, absent when the array modifier sits on a variable name
        element: Option<NodeId>,
        /// Number of dimensions
        rank: u32,
        /// Bound arguments
        bounds: Option<NodeId>,
    },
    /// Generic instantiation
    Constructed {
        /// Generic type name
        name: NodeId,
        /// Type arguments
        type_arguments: NodeId,
    },
}

impl Payload for TypeName {
    fn accepts(&self, kind: NodeKind) -> bool {
        matches!(
            (self, kind),
            (Self::Intrinsic(_), NodeKind::IntrinsicType)
                | (Self::Named { .. }, NodeKind::NamedType)
                | (Self::Array { .. }, NodeKind::ArrayType)
                | (Self::Constructed { .. }, NodeKind::ConstructedType)
        )
    }

    fn slots(&self, slots: &mut Slots) {
        match self {
            Self::Intrinsic(_) => {}
            Self::Named { name } => slots.family("name", *name, NodeFamily::Name),
            Self::Array {
                element, bounds, ..
            } => {
                slots.optional_family("element", *element, NodeFamily::Type);
                slots.optional_kind("bounds", *bounds, NodeKind::ArgumentCollection);
            }
            Self::Constructed {
                name,
                type_arguments,
            } => {
                slots.family("name", *name, NodeFamily::Name);
                slots.kind("type_arguments", *type_arguments, NodeKind::TypeNameCollection);
            }
        }
    }

    fn check_enumerants(&self, kind: NodeKind) -> Result<(), SyntaxError> {
        match self {
            Self::Array { rank: 0, .. } => Err(invalid_enumerant(kind, "rank", 0)),
            _ => Ok(()),
        }
    }
}

/// Variable initializers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initializer {
    /// `= expr`
    Expression {
        /// Initial value
        expression: NodeId,
    },
    /// `= {a, b, c}`
    Aggregate {
        /// Nested initializers, absent for `{}`
        elements: Option<NodeId>,
    },
}

impl Payload for Initializer {
    fn accepts(&self, kind: NodeKind) -> bool {
        matches!(
            (self, kind),
            (Self::Expression { .. }, NodeKind::ExpressionInitializer)
                | (Self::Aggregate { .. }, NodeKind::AggregateInitializer)
        )
    }

    fn slots(&self, slots: &mut Slots) {
        match self {
            Self::Expression { expression } => {
                slots.family("expression", *expression, NodeFamily::Expression);
            }
            Self::Aggregate { elements } => {
                slots.optional_kind("elements", *elements, NodeKind::InitializerCollection);
            }
        }
    }
}

/// Call or index argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// Name of a named argument (`name:=value`)
    pub name: Option<NodeId>,
    /// Argument value
    pub expression: NodeId,
}

impl Payload for Argument {
    fn accepts(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Argument
    }

    fn slots(&self, slots: &mut Slots) {
        slots.optional_kind("name", self.name, NodeKind::SimpleName);
        slots.family("expression", self.expression, NodeFamily::Expression);
    }
}

/// `names As [New] type(arguments) = initializer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclarator {
    /// Declared names
    pub names: NodeId,
    /// Declared type
    pub ty: Option<NodeId>,
    /// Whether the type was written `As New`
    pub is_new: bool,
    /// Constructor arguments of `As New T(...)`
    pub arguments: Option<NodeId>,
    /// Initial value
    pub initializer: Option<NodeId>,
}

impl Payload for VariableDeclarator {
    fn accepts(&self, kind: NodeKind) -> bool {
        kind == NodeKind::VariableDeclarator
    }

    fn slots(&self, slots: &mut Slots) {
        slots.kind("names", self.names, NodeKind::VariableNameCollection);
        slots.optional_family("ty", self.ty, NodeFamily::Type);
        slots.optional_kind("arguments", self.arguments, NodeKind::ArgumentCollection);
        slots.optional_family("initializer", self.initializer, NodeFamily::Initializer);
    }
}

/// `Case` clauses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseClause {
    /// `Case value` or `Case Is op value`
    Comparison {
        /// Relational operator, `None` means equality
        op: Option<OperatorKind>,
        /// Compared value
        operand: NodeId,
    },
    /// `Case lower To upper`
    Range {
        /// Inclusive lower bound
        lower: NodeId,
        /// Inclusive upper bound
        upper: NodeId,
    },
}

impl Payload for CaseClause {
    fn accepts(&self, kind: NodeKind) -> bool {
        matches!(
            (self, kind),
            (Self::Comparison { .. }, NodeKind::ComparisonCaseClause)
                | (Self::Range { .. }, NodeKind::RangeCaseClause)
        )
    }

    fn slots(&self, slots: &mut Slots) {
        match self {
            Self::Comparison { operand, .. } => {
                slots.family("operand", *operand, NodeFamily::Expression);
            }
            Self::Range { lower, upper } => {
                slots.family("lower", *lower, NodeFamily::Expression);
                slots.family("upper", *upper, NodeFamily::Expression);
            }
        }
    }

    fn check_enumerants(&self, kind: NodeKind) -> Result<(), SyntaxError> {
        match self {
            Self::Comparison { op: Some(op), .. } if !op.is_relational() => {
                Err(invalid_enumerant(kind, "op", op))
            }
            _ => Ok(()),
        }
    }
}

/// `<Target: Name(arguments)>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Explicit target
    pub target: Option<AttributeTarget>,
    /// Attribute type name
    pub name: NodeId,
    /// Constructor arguments
    pub arguments: Option<NodeId>,
}

impl Payload for Attribute {
    fn accepts(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Attribute
    }

    fn slots(&self, slots: &mut Slots) {
        slots.family("name", self.name, NodeFamily::Name);
        slots.optional_kind("arguments", self.arguments, NodeKind::ArgumentCollection);
    }
}

/// Routine parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Attribute blocks
    pub attributes: Option<NodeId>,
    /// `ByVal`, `ByRef`, `Optional`, `ParamArray`
    pub modifiers: Option<NodeId>,
    /// Parameter name
    pub name: NodeId,
    /// Declared type
    pub ty: Option<NodeId>,
    /// Default value of an optional parameter
    pub initializer: Option<NodeId>,
}

impl Payload for Parameter {
    fn accepts(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Parameter
    }

    fn slots(&self, slots: &mut Slots) {
        slots.optional_kind(
            "attributes",
            self.attributes,
            NodeKind::AttributeBlockCollection,
        );
        slots.optional_kind("modifiers", self.modifiers, NodeKind::ModifierCollection);
        slots.kind("name", self.name, NodeKind::VariableName);
        slots.optional_family("ty", self.ty, NodeFamily::Type);
        slots.optional_family("initializer", self.initializer, NodeFamily::Initializer);
    }
}

/// Imports clauses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Import {
    /// `Imports A.B`
    Name {
        /// Imported namespace or type
        target: NodeId,
    },
    /// `Imports Alias = A.B`
    Alias {
        /// Alias name
        alias: NodeId,
        /// Aliased namespace or type
        target: NodeId,
    },
}

impl Payload for Import {
    fn accepts(&self, kind: NodeKind) -> bool {
        matches!(
            (self, kind),
            (Self::Name { .. }, NodeKind::NameImport) | (Self::Alias { .. }, NodeKind::AliasImport)
        )
    }

    fn slots(&self, slots: &mut Slots) {
        match self {
            Self::Name { target } => slots.family("target", *target, NodeFamily::Name),
            Self::Alias { alias, target } => {
                slots.kind("alias", *alias, NodeKind::SimpleName);
                slots.family("target", *target, NodeFamily::Name);
            }
        }
    }
}

/// Generic type parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    /// Parameter name
    pub name: NodeId,
    /// `As` constraints
    pub constraints: Option<NodeId>,
}

impl Payload for TypeParameter {
    fn accepts(&self, kind: NodeKind) -> bool {
        kind == NodeKind::TypeParameter
    }

    fn slots(&self, slots: &mut Slots) {
        slots.kind("name", self.name, NodeKind::SimpleName);
        slots.optional_kind(
            "constraints",
            self.constraints,
            NodeKind::TypeConstraintCollection,
        );
    }
}

/// A whole source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Top-level declarations in source order
    pub declarations: Option<NodeId>,
}

impl Payload for File {
    fn accepts(&self, kind: NodeKind) -> bool {
        kind == NodeKind::File
    }

    fn slots(&self, slots: &mut Slots) {
        slots.optional_kind(
            "declarations",
            self.declarations,
            NodeKind::DeclarationCollection,
        );
    }
}
