//! IR expressions

use crate::types::IrType;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Literal values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum IrLiteral {
    /// Integral value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Decimal value, kept as written
    Decimal(String),
    /// Boolean
    Bool(bool),
    /// String
    String(String),
    /// Character
    Char(char),
    /// Date, kept as written
    Date(String),
}

/// Binary operators
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `+`
    #[display("+")]
    Add,
    /// `-`
    #[display("-")]
    Subtract,
    /// `*`
    #[display("*")]
    Multiply,
    /// `/`
    #[display("/")]
    Divide,
    /// Integer division
    #[display("/")]
    IntegerDivide,
    /// `%`
    #[display("%")]
    Modulus,
    /// `<<`
    #[display("<<")]
    ShiftLeft,
    /// `>>`
    #[display(">>")]
    ShiftRight,
    /// `==`
    #[display("==")]
    Equal,
    /// `!=`
    #[display("!=")]
    NotEqual,
    /// `<`
    #[display("<")]
    Less,
    /// `<=`
    #[display("<=")]
    LessEqual,
    /// `>`
    #[display(">")]
    Greater,
    /// `>=`
    #[display(">=")]
    GreaterEqual,
    /// Reference equality
    #[display("==")]
    IdentityEqual,
    /// Reference inequality
    #[display("!=")]
    IdentityNotEqual,
    /// Non-short-circuit `&`
    #[display("&")]
    BitAnd,
    /// Non-short-circuit `|`
    #[display("|")]
    BitOr,
    /// `^`
    #[display("^")]
    BitXor,
    /// `&&`
    #[display("&&")]
    LogicalAnd,
    /// `||`
    #[display("||")]
    LogicalOr,
}

/// Unary operators
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `+`
    #[display("+")]
    Plus,
    /// `-`
    #[display("-")]
    Negate,
    /// `!`
    #[display("!")]
    Not,
}

/// Conversion flavours
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum CastKind {
    /// Value-converting cast
    Convert,
    /// Reference cast that throws on failure
    Direct,
    /// Reference cast that yields null on failure
    Try,
}

/// Expressions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum IrExpr {
    /// Literal
    Literal(IrLiteral),
    /// Local, parameter or unqualified member
    Variable(String),
    /// Type used as the target of a static member access
    TypeRef(IrType),
    /// `target.name`
    FieldRef {
        /// Qualifier
        target: Box<IrExpr>,
        /// Member name
        name: String,
    },
    /// `target.method(args)` or `method(args)`
    Invoke {
        /// Qualifier, absent for an unqualified call
        target: Option<Box<IrExpr>>,
        /// Method name
        method: String,
        /// Arguments
        args: Vec<IrExpr>,
    },
    /// Callable expression applied to arguments (`d(args)`)
    DelegateInvoke {
        /// Invoked expression
        target: Box<IrExpr>,
        /// Arguments
        args: Vec<IrExpr>,
    },
    /// `target[indices]`
    Index {
        /// Indexed array
        target: Box<IrExpr>,
        /// One index per dimension
        indices: Vec<IrExpr>,
    },
    /// `new T[lengths]` or `new T[] { elements }`
    ArrayCreate {
        /// Element type
        element: IrType,
        /// Length per dimension
        lengths: Vec<IrExpr>,
        /// Initial elements
        initializer: Option<Vec<IrExpr>>,
    },
    /// `new T(args)`
    ObjectCreate {
        /// Constructed type
        ty: IrType,
        /// Constructor arguments
        args: Vec<IrExpr>,
    },
    /// Conversion
    Cast {
        /// Flavour
        kind: CastKind,
        /// Target type
        ty: IrType,
        /// Converted value
        expr: Box<IrExpr>,
    },
    /// Infix operation
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<IrExpr>,
        /// Right operand
        right: Box<IrExpr>,
    },
    /// Prefix operation
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<IrExpr>,
    },
    /// `typeof(T)`
    TypeOf(IrType),
    /// `expr is T`
    TypeIs {
        /// Tested value
        expr: Box<IrExpr>,
        /// Tested type
        ty: IrType,
    },
    /// `default(T)`
    Default(IrType),
    /// Current instance
    This,
    /// Base class view of the current instance
    Base,
    /// Null reference
    Null,
    /// Method group used as a delegate
    MethodRef {
        /// Qualifier
        target: Option<Box<IrExpr>>,
        /// Method name
        method: String,
    },
}

impl IrExpr {
    /// Integer literal
    #[must_use]
    pub const fn int(value: i64) -> Self {
        Self::Literal(IrLiteral::Int(value))
    }

    /// Boolean literal
    #[must_use]
    pub const fn bool(value: bool) -> Self {
        Self::Literal(IrLiteral::Bool(value))
    }

    /// Variable reference
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// `left op right`
    #[must_use]
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `op operand`
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// `target.name`
    #[must_use]
    pub fn field(target: Self, name: impl Into<String>) -> Self {
        Self::FieldRef {
            target: Box::new(target),
            name: name.into(),
        }
    }

    /// `target.method(args)`
    #[must_use]
    pub fn call(target: Self, method: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Invoke {
            target: Some(Box::new(target)),
            method: method.into(),
            args,
        }
    }

    /// `Type.method(args)`
    #[must_use]
    pub fn static_call(ty: impl Into<String>, method: impl Into<String>, args: Vec<Self>) -> Self {
        Self::call(Self::TypeRef(IrType::named(ty)), method, args)
    }

    /// Integer value of a literal, if this is one
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Literal(IrLiteral::Int(value)) => Some(*value),
            _ => None,
        }
    }
}
