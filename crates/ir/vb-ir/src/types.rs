//! IR types and accessibility

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Built-in value types of the target
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// Boolean
    #[display("bool")]
    Bool,
    /// Signed 8-bit
    #[display("sbyte")]
    SByte,
    /// Unsigned 8-bit
    #[display("byte")]
    Byte,
    /// Signed 16-bit
    #[display("short")]
    Short,
    /// Unsigned 16-bit
    #[display("ushort")]
    UShort,
    /// Signed 32-bit
    #[display("int")]
    Int,
    /// Unsigned 32-bit
    #[display("uint")]
    UInt,
    /// Signed 64-bit
    #[display("long")]
    Long,
    /// Unsigned 64-bit
    #[display("ulong")]
    ULong,
    /// Decimal
    #[display("decimal")]
    Decimal,
    /// 32-bit float
    #[display("float")]
    Float,
    /// 64-bit float
    #[display("double")]
    Double,
    /// Date and time
    #[display("DateTime")]
    DateTime,
    /// UTF-16 code unit
    #[display("char")]
    Char,
    /// String
    #[display("string")]
    String,
    /// Root object type
    #[display("object")]
    Object,
}

impl PrimitiveType {
    /// Whether the zero value of this type is a numeric zero
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(
            self,
            Self::Bool | Self::DateTime | Self::Char | Self::String | Self::Object
        )
    }
}

/// A type reference
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum IrType {
    /// No value, only as a method result
    Void,
    /// Built-in type
    Primitive(PrimitiveType),
    /// User or library type, possibly dotted
    Named(String),
    /// Generic instantiation
    Generic {
        /// Generic type
        name: String,
        /// Type arguments
        arguments: Vec<IrType>,
    },
    /// Array
    Array {
        /// Element type
        element: Box<IrType>,
        /// Number of dimensions
        rank: u32,
    },
}

impl IrType {
    /// The root object type
    pub const OBJECT: Self = Self::Primitive(PrimitiveType::Object);

    /// Named type
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Array of `element`
    #[must_use]
    pub fn array(element: Self, rank: u32) -> Self {
        Self::Array {
            element: Box::new(element),
            rank,
        }
    }

    /// Element type of an array type
    #[must_use]
    pub fn element(&self) -> Option<&Self> {
        match self {
            Self::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Whether this is an array type
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }
}

impl std::fmt::Display for IrType {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Void => write!(formatter, "void"),
            Self::Primitive(primitive) => write!(formatter, "{primitive}"),
            Self::Named(name) => write!(formatter, "{name}"),
            Self::Generic { name, arguments } => {
                write!(formatter, "{name}<")?;
                for (index, argument) in arguments.iter().enumerate() {
                    if index > 0 {
                        write!(formatter, ", ")?;
                    }
                    write!(formatter, "{argument}")?;
                }
                write!(formatter, ">")
            }
            Self::Array { element, rank } => {
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                write!(formatter, "{element}[{commas}]")
            }
        }
    }
}

/// Member and type accessibility
#[derive(Copy, Clone, Debug, Default, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Visibility {
    /// Visible everywhere
    #[display("public")]
    Public,
    /// Visible inside the declaring type
    #[default]
    #[display("private")]
    Private,
    /// Visible to derived types
    #[display("protected")]
    Protected,
    /// Visible inside the assembly
    #[display("internal")]
    Internal,
    /// Visible to derived types and inside the assembly
    #[display("protected internal")]
    ProtectedInternal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        let matrix = IrType::array(IrType::Primitive(PrimitiveType::Double), 2);
        assert_eq!(matrix.to_string(), "double[,]");
        let list = IrType::Generic {
            name: "List".to_owned(),
            arguments: vec![IrType::named("Customer")],
        };
        assert_eq!(list.to_string(), "List<Customer>");
    }

    #[test]
    fn test_zero_values() {
        assert!(PrimitiveType::Decimal.is_numeric());
        assert!(!PrimitiveType::String.is_numeric());
    }
}
