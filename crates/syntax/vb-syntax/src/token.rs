//! Enumerated values carried by nodes
//!
//! Several of these are shared between node kinds that only accept a
//! subset; the builder checks the subset at construction.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Unary and binary operators
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum OperatorKind {
    /// Unary `+`
    UnaryPlus,
    /// Unary `-`
    Negate,
    /// `Not`
    Not,
    /// `+`
    Plus,
    /// Binary `-`
    Minus,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `\`
    IntegralDivide,
    /// `Mod`
    Modulus,
    /// `^`
    Power,
    /// `&`
    Concatenate,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `=`
    Equals,
    /// `<>`
    NotEquals,
    /// `<`
    LessThan,
    /// `<=`
    LessThanEquals,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanEquals,
    /// `Like`
    Like,
    /// `Is`
    Is,
    /// `IsNot`
    IsNot,
    /// `And`
    And,
    /// `AndAlso`
    AndAlso,
    /// `Or`
    Or,
    /// `OrElse`
    OrElse,
    /// `Xor`
    Xor,
    /// `To`, only meaningful inside array bounds and case ranges
    To,
}

impl OperatorKind {
    /// Whether this operator may appear in a unary expression
    #[must_use]
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::UnaryPlus | Self::Negate | Self::Not)
    }

    /// Whether this operator may appear in a binary expression
    #[must_use]
    pub const fn is_binary(self) -> bool {
        !matches!(self, Self::UnaryPlus | Self::Negate | Self::Not)
    }

    /// Whether this operator has a compound assignment form (`+=`, `&=`, ...)
    #[must_use]
    pub const fn is_compound_assignable(self) -> bool {
        matches!(
            self,
            Self::Plus
                | Self::Minus
                | Self::Multiply
                | Self::Divide
                | Self::IntegralDivide
                | Self::Power
                | Self::Concatenate
                | Self::ShiftLeft
                | Self::ShiftRight
        )
    }

    /// Whether this operator is a relational comparison
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            Self::Equals
                | Self::NotEquals
                | Self::LessThan
                | Self::LessThanEquals
                | Self::GreaterThan
                | Self::GreaterThanEquals
        )
    }
}

/// Kind of block named by `Exit`, `Continue` and `End` statements
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum BlockType {
    Do,
    For,
    While,
    Select,
    Sub,
    Function,
    Property,
    Get,
    Set,
    Try,
    If,
    With,
    SyncLock,
    Using,
    Class,
    Module,
    Structure,
    Interface,
    Enum,
    Namespace,
    Operator,
    Event,
}

impl BlockType {
    /// Blocks an `Exit` statement may leave
    #[must_use]
    pub const fn is_exitable(self) -> bool {
        matches!(
            self,
            Self::Do
                | Self::For
                | Self::While
                | Self::Select
                | Self::Sub
                | Self::Function
                | Self::Property
                | Self::Try
        )
    }

    /// Blocks a `Continue` statement may target
    #[must_use]
    pub const fn is_loop(self) -> bool {
        matches!(self, Self::Do | Self::For | Self::While)
    }

    /// Blocks closed by an `End` statement inside a method body
    #[must_use]
    pub const fn closes_statement(self) -> bool {
        matches!(
            self,
            Self::If
                | Self::Select
                | Self::While
                | Self::With
                | Self::SyncLock
                | Self::Using
                | Self::Try
        )
    }

    /// Blocks closed by an `End` statement at declaration level
    #[must_use]
    pub const fn closes_declaration(self) -> bool {
        matches!(
            self,
            Self::Sub
                | Self::Function
                | Self::Property
                | Self::Get
                | Self::Set
                | Self::Class
                | Self::Module
                | Self::Structure
                | Self::Interface
                | Self::Enum
                | Self::Namespace
                | Self::Operator
                | Self::Event
        )
    }
}

/// Built-in types
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum IntrinsicType {
    Boolean,
    SByte,
    Byte,
    Short,
    UShort,
    Integer,
    UInteger,
    Long,
    ULong,
    Decimal,
    Single,
    Double,
    Date,
    Char,
    String,
    Object,
}

impl IntrinsicType {
    /// Whether the type is numeric
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::SByte
                | Self::Byte
                | Self::Short
                | Self::UShort
                | Self::Integer
                | Self::UInteger
                | Self::Long
                | Self::ULong
                | Self::Decimal
                | Self::Single
                | Self::Double
        )
    }
}

/// Type suffix characters on identifiers and literals
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum TypeCharacter {
    /// `$`
    #[display("$")]
    String,
    /// `%`
    #[display("%")]
    Integer,
    /// `&`
    #[display("&")]
    Long,
    /// `!`
    #[display("!")]
    Single,
    /// `#`
    #[display("#")]
    Double,
    /// `@`
    #[display("@")]
    Decimal,
}

impl TypeCharacter {
    /// Intrinsic type implied by the suffix
    #[must_use]
    pub const fn intrinsic(self) -> IntrinsicType {
        match self {
            Self::String => IntrinsicType::String,
            Self::Integer => IntrinsicType::Integer,
            Self::Long => IntrinsicType::Long,
            Self::Single => IntrinsicType::Single,
            Self::Double => IntrinsicType::Double,
            Self::Decimal => IntrinsicType::Decimal,
        }
    }
}

/// Declaration and parameter modifiers
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum ModifierKind {
    Public,
    Private,
    Protected,
    Friend,
    Static,
    Shared,
    Const,
    Dim,
    ReadOnly,
    WriteOnly,
    WithEvents,
    Overridable,
    NotOverridable,
    Overrides,
    Overloads,
    MustOverride,
    MustInherit,
    NotInheritable,
    Shadows,
    Partial,
    Default,
    ByVal,
    ByRef,
    Optional,
    ParamArray,
}

impl ModifierKind {
    /// Whether this modifier is only meaningful on a parameter
    #[must_use]
    pub const fn is_parameter_modifier(self) -> bool {
        matches!(self, Self::ByVal | Self::ByRef | Self::Optional | Self::ParamArray)
    }
}

/// `Option` directive
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum OptionKind {
    /// `Option Explicit [On|Off]`
    Explicit(bool),
    /// `Option Strict [On|Off]`
    Strict(bool),
    /// `Option Compare Text`
    CompareText,
    /// `Option Compare Binary`
    CompareBinary,
    /// `Option Base n`, only 0 or 1 are legal
    Base(u8),
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit(on) => write!(formatter, "Explicit {}", on_off(*on)),
            Self::Strict(on) => write!(formatter, "Strict {}", on_off(*on)),
            Self::CompareText => write!(formatter, "Compare Text"),
            Self::CompareBinary => write!(formatter, "Compare Binary"),
            Self::Base(base) => write!(formatter, "Base {base}"),
        }
    }
}

const fn on_off(on: bool) -> &'static str {
    if on { "On" } else { "Off" }
}

/// Special names
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum SpecialNameKind {
    /// `Global`
    Global,
}

/// Form of a `Resume` statement
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum ResumeKind {
    /// `Resume`
    None,
    /// `Resume Next`
    Next,
    /// `Resume label`
    Label,
}

/// Form of an `On Error` statement
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum OnErrorKind {
    /// `On Error GoTo label`
    Label,
    /// `On Error GoTo 0`
    Zero,
    /// `On Error GoTo -1`
    MinusOne,
    /// `On Error Resume Next`
    Next,
}

/// Target of an attribute (`<Assembly: ...>`)
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum AttributeTarget {
    /// `Assembly:`
    Assembly,
    /// `Module:`
    Module,
}

/// Character set of a `Declare` statement
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Charset {
    /// No charset keyword
    Default,
    /// `Ansi`
    Ansi,
    /// `Unicode`
    Unicode,
    /// `Auto`
    Auto,
}

/// Radix of an integer literal
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum IntegerBase {
    /// Plain decimal digits
    Decimal,
    /// `&H` prefix
    Hexadecimal,
    /// `&O` prefix
    Octal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_arity_partition() {
        assert!(OperatorKind::Not.is_unary());
        assert!(!OperatorKind::Not.is_binary());
        assert!(OperatorKind::Like.is_binary());
        assert!(OperatorKind::Power.is_compound_assignable());
        assert!(!OperatorKind::Like.is_compound_assignable());
    }

    #[test]
    fn test_exit_and_continue_targets() {
        assert!(BlockType::Property.is_exitable());
        assert!(!BlockType::If.is_exitable());
        assert!(BlockType::While.is_loop());
        assert!(!BlockType::Select.is_loop());
    }

    #[test]
    fn test_option_display() {
        assert_eq!(OptionKind::Explicit(true).to_string(), "Explicit On");
        assert_eq!(OptionKind::Base(1).to_string(), "Base 1");
    }
}
