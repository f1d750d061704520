//! Expression payloads

use crate::error::SyntaxError;
use crate::kind::{NodeFamily, NodeKind};
use crate::node::{invalid_enumerant, NodeId, Payload, Slots};
use crate::token::{IntegerBase, IntrinsicType, OperatorKind, TypeCharacter};
use vb_span::Location;

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `"text"`
    String(String),
    /// `"c"c`
    Character(char),
    /// `#1/1/2000#`, kept as written
    Date(String),
    /// Integral literal
    Integer {
        /// Value
        value: i64,
        /// Radix it was written in
        base: IntegerBase,
        /// Type suffix
        type_character: Option<TypeCharacter>,
    },
    /// Floating point literal
    FloatingPoint {
        /// Value
        value: f64,
        /// Type suffix
        type_character: Option<TypeCharacter>,
    },
    /// `1.5D`, kept as written
    Decimal(String),
    /// `True` / `False`
    Boolean(bool),
}

impl Literal {
    /// Plain decimal integer
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::Integer {
            value,
            base: IntegerBase::Decimal,
            type_character: None,
        }
    }

    const fn kind(&self) -> NodeKind {
        match self {
            Self::String(_) => NodeKind::StringLiteralExpression,
            Self::Character(_) => NodeKind::CharacterLiteralExpression,
            Self::Date(_) => NodeKind::DateLiteralExpression,
            Self::Integer { .. } => NodeKind::IntegerLiteralExpression,
            Self::FloatingPoint { .. } => NodeKind::FloatingPointLiteralExpression,
            Self::Decimal(_) => NodeKind::DecimalLiteralExpression,
            Self::Boolean(_) => NodeKind::BooleanLiteralExpression,
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `x`
    SimpleName {
        /// The simple name
        name: NodeId,
    },
    /// Type used in expression position (`Integer.MaxValue`)
    TypeReference {
        /// The type name
        ty: NodeId,
    },
    /// `a.b`, or `.b` inside a `With` block
    Qualified {
        /// Left side, absent inside `With`
        qualifier: Option<NodeId>,
        /// Position of the dot
        dot: Location,
        /// Member name
        name: NodeId,
    },
    /// `a!b`, or `!b` inside a `With` block
    DictionaryLookup {
        /// Left side, absent inside `With`
        qualifier: Option<NodeId>,
        /// Position of the bang
        bang: Location,
        /// Key name
        name: NodeId,
    },
    /// `a(Of T)`
    GenericQualified {
        /// Generic target
        base: NodeId,
        /// Type arguments
        type_arguments: NodeId,
    },
    /// `a(args)`, a call or an array index
    CallOrIndex {
        /// Called or indexed expression
        target: NodeId,
        /// Arguments
        arguments: Option<NodeId>,
        /// Declarator of the target when the parser resolved it; not a child
        declarator: Option<NodeId>,
    },
    /// `New T(args)`
    New {
        /// Constructed type
        ty: NodeId,
        /// Constructor arguments
        arguments: Option<NodeId>,
    },
    /// `New T() {a, b}`
    NewAggregate {
        /// Array type
        ty: NodeId,
        /// Aggregate initializer
        initializer: NodeId,
    },
    /// `CType`, `DirectCast` and `TryCast`
    Cast {
        /// Converted value
        operand: NodeId,
        /// Target type
        ty: NodeId,
    },
    /// `CInt(x)`, `CStr(x)`, ...
    IntrinsicCast {
        /// Target type
        target: IntrinsicType,
        /// Converted value
        operand: NodeId,
    },
    /// `TypeOf x Is T`
    TypeOf {
        /// Tested value
        operand: NodeId,
        /// Tested type
        ty: NodeId,
    },
    /// `GetType(T)`
    GetType {
        /// Type
        ty: NodeId,
    },
    /// `AddressOf m`
    AddressOf {
        /// Referenced method
        operand: NodeId,
    },
    /// Literal
    Literal(Literal),
    /// `Me`, `MyBase`, `MyClass`
    Instance,
    /// `Nothing`
    Nothing,
    /// `(x)`
    Parenthetical {
        /// Inner expression
        operand: NodeId,
    },
    /// Prefix operator
    Unary {
        /// Operator
        op: OperatorKind,
        /// Operand
        operand: NodeId,
    },
    /// Infix operator
    Binary {
        /// Operator
        op: OperatorKind,
        /// Position of the operator token
        op_location: Location,
        /// Left operand
        left: NodeId,
        /// Right operand
        right: NodeId,
    },
}

impl Payload for Expr {
    fn accepts(&self, kind: NodeKind) -> bool {
        use NodeKind as K;
        match self {
            Self::SimpleName { .. } => kind == K::SimpleNameExpression,
            Self::TypeReference { .. } => kind == K::TypeReferenceExpression,
            Self::Qualified { .. } => kind == K::QualifiedExpression,
            Self::DictionaryLookup { .. } => kind == K::DictionaryLookupExpression,
            Self::GenericQualified { .. } => kind == K::GenericQualifiedExpression,
            Self::CallOrIndex { .. } => kind == K::CallOrIndexExpression,
            Self::New { .. } => kind == K::NewExpression,
            Self::NewAggregate { .. } => kind == K::NewAggregateExpression,
            Self::Cast { .. } => matches!(
                kind,
                K::CTypeExpression | K::DirectCastExpression | K::TryCastExpression
            ),
            Self::IntrinsicCast { .. } => kind == K::IntrinsicCastExpression,
            Self::TypeOf { .. } => kind == K::TypeOfExpression,
            Self::GetType { .. } => kind == K::GetTypeExpression,
            Self::AddressOf { .. } => kind == K::AddressOfExpression,
            Self::Literal(literal) => kind == literal.kind(),
            Self::Instance => matches!(
                kind,
                K::MeExpression | K::MyBaseExpression | K::MyClassExpression
            ),
            Self::Nothing => kind == K::NothingExpression,
            Self::Parenthetical { .. } => kind == K::ParentheticalExpression,
            Self::Unary { .. } => kind == K::UnaryOperatorExpression,
            Self::Binary { .. } => kind == K::BinaryOperatorExpression,
        }
    }

    fn slots(&self, slots: &mut Slots) {
        const EXPR: NodeFamily = NodeFamily::Expression;
        match self {
            Self::SimpleName { name } => slots.kind("name", *name, NodeKind::SimpleName),
            Self::TypeReference { ty } | Self::GetType { ty } => {
                slots.family("ty", *ty, NodeFamily::Type);
            }
            Self::Qualified {
                qualifier, name, ..
            }
            | Self::DictionaryLookup {
                qualifier, name, ..
            } => {
                slots.optional_family("qualifier", *qualifier, EXPR);
                slots.kind("name", *name, NodeKind::SimpleName);
            }
            Self::GenericQualified {
                base,
                type_arguments,
            } => {
                slots.family("base", *base, EXPR);
                slots.kind("type_arguments", *type_arguments, NodeKind::TypeNameCollection);
            }
            Self::CallOrIndex {
                target, arguments, ..
            } => {
                slots.family("target", *target, EXPR);
                slots.optional_kind("arguments", *arguments, NodeKind::ArgumentCollection);
            }
            Self::New { ty, arguments } => {
                slots.family("ty", *ty, NodeFamily::Type);
                slots.optional_kind("arguments", *arguments, NodeKind::ArgumentCollection);
            }
            Self::NewAggregate { ty, initializer } => {
                slots.kind("ty", *ty, NodeKind::ArrayType);
                slots.kind("initializer", *initializer, NodeKind::AggregateInitializer);
            }
            Self::Cast { operand, ty } | Self::TypeOf { operand, ty } => {
                slots.family("operand", *operand, EXPR);
                slots.family("ty", *ty, NodeFamily::Type);
            }
            Self::IntrinsicCast { operand, .. }
            | Self::AddressOf { operand }
            | Self::Parenthetical { operand }
            | Self::Unary { operand, .. } => slots.family("operand", *operand, EXPR),
            Self::Literal(_) | Self::Instance | Self::Nothing => {}
            Self::Binary { left, right, .. } => {
                slots.family("left", *left, EXPR);
                slots.family("right", *right, EXPR);
            }
        }
    }

    fn check_enumerants(&self, kind: NodeKind) -> Result<(), SyntaxError> {
        match self {
            Self::Unary { op, .. } if !op.is_unary() => Err(invalid_enumerant(kind, "op", op)),
            Self::Binary { op, .. } if !op.is_binary() => Err(invalid_enumerant(kind, "op", op)),
            Self::Literal(Literal::Integer {
                type_character: Some(suffix @ TypeCharacter::String),
                ..
            }) => Err(invalid_enumerant(kind, "type_character", suffix)),
            Self::Literal(Literal::FloatingPoint {
                type_character: Some(suffix),
                ..
            }) if !matches!(suffix, TypeCharacter::Single | TypeCharacter::Double) => {
                Err(invalid_enumerant(kind, "type_character", suffix))
            }
            _ => Ok(()),
        }
    }
}
