//! Syntax tree → IR lowering
//!
//! One pass per file over an immutable tree. Legacy constructs without a
//! structured counterpart are desugared here: counted and post-test
//! loops, implicit function results, `GoSub`/`Return`, `Mid` assignment,
//! `ReDim Preserve` and the operators that map to library calls. Any
//! construct without a lowering aborts the whole pass.

mod branch;
mod context;
mod decl;
mod error;
mod expr;
mod loops;
mod redim;
mod routine;
mod stmt;
mod types;
mod vars;

pub use context::LowerOptions;
pub use error::LowerError;

use context::LowerContext;
use tracing::{debug, instrument};
use vb_ir::IrProgram;
use vb_syntax::SyntaxTree;

/// Lowers a finished tree to an IR program
///
/// # Errors
///
/// [`LowerError::BadNode`] if the tree holds a syntax error placeholder,
/// [`LowerError::Unsupported`] for the first construct without a
/// lowering, [`LowerError::MalformedTree`] for shapes the builder allows
/// but that have no meaning, such as a `Return` outside any routine.
#[instrument(skip_all, fields(class = %options.class_name))]
pub fn lower_file(tree: &SyntaxTree, options: &LowerOptions) -> Result<IrProgram, LowerError> {
    if let Some((_, bad)) = tree.iter().find(|(_, node)| node.is_bad()) {
        return Err(LowerError::BadNode { span: bad.span() });
    }
    let program = LowerContext::new(tree, options).lower_file()?;
    debug!(
        ty = %program.ty.name,
        members = program.ty.members.len(),
        imports = program.imports.len(),
        "lowered file"
    );
    Ok(program)
}
