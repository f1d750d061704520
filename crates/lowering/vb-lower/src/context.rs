//! Per-file lowering state
//!
//! Directive flags accumulate in source order and are visible to every
//! later expression of the same file. Routine state is replaced on entry
//! to each method or accessor.

use crate::error::LowerError;
use rustc_hash::FxHashSet;
use vb_ir::{CompareMode, IrExpr, IrStmt, IrType, SourceOptions};
use vb_syntax::token::OptionKind;
use vb_syntax::{NodeData, NodeId, SyntaxTree};

/// Caller-supplied settings for one lowering pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowerOptions {
    /// Name of the wrapping type when a file is not a single type block
    pub class_name: String,
    /// Namespace recorded on the program
    pub namespace: Option<String>,
    /// Comparison mode before any `Option Compare`
    pub compare: CompareMode,
    /// Array base before any `Option Base`
    pub base: u8,
    /// Whether attached comments become IR comments
    pub emit_comments: bool,
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            class_name: "Module1".to_owned(),
            namespace: None,
            compare: CompareMode::Binary,
            base: 0,
            emit_comments: true,
        }
    }
}

/// Method or accessor currently being lowered
#[derive(Debug, Clone)]
pub(crate) struct Routine {
    /// Source name; assignments to it target the shadow result
    pub name: String,
    /// Synthesized local holding the implicit result
    pub shadow: Option<String>,
    /// Declared result type, `Void` for subroutines and setters
    pub return_type: IrType,
    /// GoSub targets whose return point has been placed
    pub return_points: FxHashSet<String>,
}

/// Collision-free names for synthesized locals
///
/// Seeded with every identifier of the routine so that a synthesized
/// name can never capture or shadow a source name.
#[derive(Debug, Default)]
pub(crate) struct NameGenerator {
    taken: FxHashSet<String>,
}

impl NameGenerator {
    /// Generator reserving every simple name under `root`
    pub fn for_subtree(tree: &SyntaxTree, root: NodeId) -> Self {
        let taken = tree
            .descendants(root)
            .filter_map(|id| match tree.data(id) {
                NodeData::Name(vb_syntax::Name::Simple(simple)) => {
                    Some(simple.text.to_ascii_lowercase())
                }
                _ => None,
            })
            .collect();
        Self { taken }
    }

    /// `base`, or `base` with the smallest numeric suffix not yet taken
    pub fn fresh(&mut self, base: &str) -> String {
        let mut candidate = base.to_owned();
        let mut suffix = 1_u32;
        while self.taken.contains(&candidate.to_ascii_lowercase()) {
            candidate = format!("{base}{suffix}");
            suffix += 1;
        }
        self.taken.insert(candidate.to_ascii_lowercase());
        candidate
    }
}

/// Mutable state threaded through every lowering call of one file
#[derive(Debug)]
pub(crate) struct LowerContext<'tree> {
    pub tree: &'tree SyntaxTree,
    pub options: LowerOptions,
    pub source: SourceOptions,
    pub names: NameGenerator,
    /// Lowered targets of the enclosing `With` blocks, innermost last
    pub with_stack: Vec<IrExpr>,
    pub routine: Option<Routine>,
}

impl<'tree> LowerContext<'tree> {
    pub fn new(tree: &'tree SyntaxTree, options: &LowerOptions) -> Self {
        Self {
            tree,
            source: SourceOptions {
                compare: options.compare,
                base: options.base,
                ..SourceOptions::default()
            },
            options: options.clone(),
            names: NameGenerator::default(),
            with_stack: Vec::new(),
            routine: None,
        }
    }

    /// Comparison mode in effect at this point of the file
    pub const fn compare(&self) -> CompareMode {
        self.source.compare
    }

    /// Array base in effect at this point of the file
    pub const fn base(&self) -> u8 {
        self.source.base
    }

    pub fn apply_option(&mut self, option: OptionKind) {
        match option {
            OptionKind::Explicit(on) => self.source.explicit = Some(on),
            OptionKind::Strict(on) => self.source.strict = Some(on),
            OptionKind::CompareText => self.source.compare = CompareMode::Text,
            OptionKind::CompareBinary => self.source.compare = CompareMode::Binary,
            OptionKind::Base(base) => self.source.base = base,
        }
    }

    pub fn unsupported(&self, id: NodeId) -> LowerError {
        LowerError::unsupported(self.tree, id)
    }

    /// Identifier text of a name-like node
    pub fn text(&self, id: NodeId) -> Result<String, LowerError> {
        self.tree
            .name_text(id)
            .map(str::to_owned)
            .ok_or_else(|| self.unsupported(id))
    }

    /// IR comments for the comments attached to `id`
    pub fn comments(&self, id: NodeId) -> Vec<String> {
        if !self.options.emit_comments {
            return Vec::new();
        }
        self.tree[id]
            .comments()
            .iter()
            .filter_map(|&comment| match self.tree.data(comment) {
                NodeData::Comment(comment) => Some(comment.text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Comment statements for the comments attached to `id`
    pub fn comment_statements(&self, id: NodeId) -> Vec<IrStmt> {
        self.comments(id).into_iter().map(IrStmt::Comment).collect()
    }

    /// Runs `lower` with `routine` as the current routine
    pub fn in_routine<T>(
        &mut self,
        routine: Routine,
        names: NameGenerator,
        lower: impl FnOnce(&mut Self) -> Result<T, LowerError>,
    ) -> Result<T, LowerError> {
        let outer_routine = self.routine.replace(routine);
        let outer_names = std::mem::replace(&mut self.names, names);
        let result = lower(self);
        self.routine = outer_routine;
        self.names = outer_names;
        result
    }

    /// Runs `lower` with `target` as the innermost `With` target
    pub fn in_with<T>(
        &mut self,
        target: IrExpr,
        lower: impl FnOnce(&mut Self) -> Result<T, LowerError>,
    ) -> Result<T, LowerError> {
        self.with_stack.push(target);
        let result = lower(self);
        self.with_stack.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_names_skip_taken_ones_case_insensitively() {
        let mut names = NameGenerator::default();
        names.taken.insert("fresult".to_owned());
        names.taken.insert("fresult1".to_owned());
        assert_eq!(names.fresh("FResult"), "FResult2");
        assert_eq!(names.fresh("FResult"), "FResult3");
        assert_eq!(names.fresh("latch"), "latch");
    }
}
