//! Programs, types and members

use crate::expr::IrExpr;
use crate::stmt::IrStmt;
use crate::types::{IrType, Visibility};
use derive_more::Display;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// String comparison mode in effect for `Like` and text comparisons
#[derive(Copy, Clone, Debug, Default, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum CompareMode {
    /// Ordinal comparison
    #[default]
    Binary,
    /// Culture-aware, case-insensitive comparison
    Text,
}

/// Source directives recorded on the program
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOptions {
    /// `Option Explicit`, when stated
    pub explicit: Option<bool>,
    /// `Option Strict`, when stated
    pub strict: Option<bool>,
    /// Comparison mode at the end of the file
    pub compare: CompareMode,
    /// Array base at the end of the file
    pub base: u8,
}

/// A namespace import
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct IrImport {
    /// Alias of an aliased import
    pub alias: Option<String>,
    /// Imported namespace or type
    pub target: String,
}

/// One lowered file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrProgram {
    /// Enclosing namespace
    pub namespace: Option<String>,
    /// Imports in first-seen order
    pub imports: IndexSet<IrImport>,
    /// Directives seen in the file
    pub options: SourceOptions,
    /// The single top-level type
    pub ty: IrTypeDecl,
}

impl IrProgram {
    /// JSON form handed to the renderer
    ///
    /// # Errors
    ///
    /// Fails only if a float literal is not finite.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Kind of a type declaration
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum TypeKind {
    /// Reference type
    #[display("class")]
    Class,
    /// Class whose members are all shared
    #[display("static class")]
    Module,
    /// Value type
    #[display("struct")]
    Struct,
}

/// A class, module or structure
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrTypeDecl {
    /// Type name
    pub name: String,
    /// Kind
    pub kind: TypeKind,
    /// Accessibility
    pub visibility: Visibility,
    /// Generic parameters
    pub type_parameters: Vec<String>,
    /// Base class followed by implemented interfaces
    pub base_types: Vec<IrType>,
    /// Members in source order
    pub members: Vec<IrMember>,
    /// Attached comments
    pub comments: Vec<String>,
}

impl IrTypeDecl {
    /// Empty type
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            type_parameters: Vec::new(),
            base_types: Vec::new(),
            members: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Method named `name`, first match
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&IrMethod> {
        self.members.iter().find_map(|member| match member {
            IrMember::Method(method) if method.name == name => Some(method),
            _ => None,
        })
    }
}

/// Type members
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum IrMember {
    /// Field
    Field(IrField),
    /// Method or constructor
    Method(IrMethod),
    /// Property
    Property(IrProperty),
    /// Nested type
    Type(IrTypeDecl),
    /// Nested enum
    Enum(IrEnum),
}

/// A field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrField {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: IrType,
    /// Accessibility
    pub visibility: Visibility,
    /// Shared across instances
    pub is_static: bool,
    /// Compile-time constant
    pub is_const: bool,
    /// Assigned once, at construction
    pub is_readonly: bool,
    /// Initial value
    pub init: Option<IrExpr>,
    /// Attached comments
    pub comments: Vec<String>,
}

/// How an argument is passed
#[derive(Copy, Clone, Debug, Default, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum ParameterDirection {
    /// By value
    #[default]
    #[display("")]
    In,
    /// By reference
    #[display("ref ")]
    Ref,
}

/// A method parameter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrParameter {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub ty: IrType,
    /// Passing convention
    pub direction: ParameterDirection,
    /// Collects trailing arguments into an array
    pub is_params: bool,
    /// Default value of an optional parameter
    pub default: Option<IrExpr>,
}

/// Method flavours
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum MethodKind {
    /// Ordinary method
    Normal,
    /// Instance constructor
    Constructor,
}

/// Native entry point of an external method
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExternInfo {
    /// Library name
    pub library: String,
    /// Entry point name when it differs from the method name
    pub entry_point: Option<String>,
    /// Character set name
    pub charset: String,
}

/// A method
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrMethod {
    /// Method name
    pub name: String,
    /// Flavour
    pub kind: MethodKind,
    /// Accessibility
    pub visibility: Visibility,
    /// Shared across instances
    pub is_static: bool,
    /// Generic parameters
    pub type_parameters: Vec<String>,
    /// Parameters
    pub parameters: Vec<IrParameter>,
    /// Result type, `Void` for subroutines
    pub return_type: IrType,
    /// Body statements
    pub body: Vec<IrStmt>,
    /// Native entry point of a `Declare`d method
    pub external: Option<ExternInfo>,
    /// Attached comments
    pub comments: Vec<String>,
}

/// A property with optional accessors
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrProperty {
    /// Property name
    pub name: String,
    /// Property type
    pub ty: IrType,
    /// Accessibility
    pub visibility: Visibility,
    /// Shared across instances
    pub is_static: bool,
    /// Index parameters
    pub parameters: Vec<IrParameter>,
    /// Getter body
    pub getter: Option<Vec<IrStmt>>,
    /// Setter body; the assigned value is named by `setter_parameter`
    pub setter: Option<Vec<IrStmt>>,
    /// Name of the setter's value parameter
    pub setter_parameter: String,
    /// Attached comments
    pub comments: Vec<String>,
}

/// An enum
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrEnum {
    /// Enum name
    pub name: String,
    /// Accessibility
    pub visibility: Visibility,
    /// Underlying integral type
    pub underlying: Option<IrType>,
    /// Members with their explicit values
    pub members: Vec<IrEnumMember>,
}

/// An enum member
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrEnumMember {
    /// Member name
    pub name: String,
    /// Explicit value
    pub value: Option<IrExpr>,
}
