//! Target-agnostic object model produced by lowering
//!
//! The model mirrors what a class-based managed language can express: one
//! top-level type per file, fields, methods and properties, and a small
//! statement vocabulary in which every structured construct of the source
//! language is rebuilt from conditionals, `for`-style iterations, gotos and
//! labels.

mod expr;
pub mod pretty;
mod program;
mod stmt;
mod types;

pub use expr::{BinaryOp, CastKind, IrExpr, IrLiteral, UnaryOp};
pub use program::{
    CompareMode, ExternInfo, IrEnum, IrEnumMember, IrField, IrImport, IrMember, IrMethod,
    IrParameter, IrProgram, IrProperty, IrTypeDecl, MethodKind, ParameterDirection,
    SourceOptions, TypeKind,
};
pub use stmt::IrStmt;
pub use types::{IrType, PrimitiveType, Visibility};
