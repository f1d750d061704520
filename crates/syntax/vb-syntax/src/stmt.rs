//! Statement payloads
//!
//! Block statements own their bodies as `StatementCollection` children and
//! their closing statement (`End If`, `Loop`, `Next`) as a trailing child.

use crate::error::SyntaxError;
use crate::kind::{NodeFamily, NodeKind};
use crate::node::{invalid_enumerant, NodeId, Payload, Slots};
use crate::token::{BlockType, OnErrorKind, OperatorKind, ResumeKind};

const EXPR: NodeFamily = NodeFamily::Expression;
const BODY: NodeKind = NodeKind::StatementCollection;

/// `While cond` or `Until cond` on a `Do` or `Loop` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopCondition {
    /// `While` when true, `Until` otherwise
    pub is_while: bool,
    /// Tested expression
    pub expression: NodeId,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// Empty line, `End` or `Stop`
    Empty,
    /// `GoTo label`, `GoSub label` or a `label:` definition
    LabelReference {
        /// Label text
        name: String,
        /// Whether the label is a line number
        is_line_number: bool,
    },
    /// `Resume`, `Resume Next`, `Resume label`
    Resume {
        /// Form
        kind: ResumeKind,
        /// Target label of `Resume label`
        label: Option<String>,
    },
    /// `Exit Do`, `Exit Sub`, ...
    Exit {
        /// Block being left
        block: BlockType,
    },
    /// `Continue For`, ...
    Continue {
        /// Loop being continued
        block: BlockType,
    },
    /// `Return [expr]`
    Return {
        /// Returned value
        expression: Option<NodeId>,
    },
    /// `Error n`
    Error {
        /// Error number
        expression: NodeId,
    },
    /// `On Error ...`
    OnError {
        /// Form
        kind: OnErrorKind,
        /// Target label of `On Error GoTo label`
        label: Option<String>,
    },
    /// `RaiseEvent name(args)`
    RaiseEvent {
        /// Event name
        name: NodeId,
        /// Event arguments
        arguments: Option<NodeId>,
    },
    /// `AddHandler e, h` and `RemoveHandler e, h`
    Handler {
        /// Event expression
        event: NodeId,
        /// Handler expression
        handler: NodeId,
    },
    /// `ReDim [Preserve] a(n), b(m)`
    ReDim {
        /// Whether old contents are kept
        preserve: bool,
        /// Redimensioned arrays, each a call-or-index expression
        variables: NodeId,
    },
    /// `Erase a, b`
    Erase {
        /// Erased arrays
        variables: NodeId,
    },
    /// `Call m(args)` or a bare invocation
    Call {
        /// Invoked expression
        target: NodeId,
        /// Arguments
        arguments: Option<NodeId>,
    },
    /// `target = source`
    Assignment {
        /// Assigned location
        target: NodeId,
        /// Assigned value
        source: NodeId,
    },
    /// `target op= source`
    CompoundAssignment {
        /// Operator applied before assigning
        op: OperatorKind,
        /// Assigned location
        target: NodeId,
        /// Right operand
        source: NodeId,
    },
    /// `Mid(target, start[, length]) = source`
    MidAssignment {
        /// String variable being mutated
        target: NodeId,
        /// 1-based start position
        start: NodeId,
        /// Number of replaced characters
        length: Option<NodeId>,
        /// Replacement text
        source: NodeId,
    },
    /// `Dim`, `Static` or `Const` inside a method body
    LocalDeclaration {
        /// Declaration keywords
        modifiers: NodeId,
        /// Declared variables
        declarators: NodeId,
    },
    /// `End If`, `End Select`, `End While`, ...
    EndBlock {
        /// Closed block
        block: BlockType,
    },
    /// `Loop [While|Until cond]`
    Loop {
        /// Trailing condition
        condition: Option<LoopCondition>,
    },
    /// `Next [vars]`
    Next {
        /// Named control variables
        variables: Option<NodeId>,
    },
    /// `Do [While|Until cond] ... Loop`
    DoBlock {
        /// Leading condition
        condition: Option<LoopCondition>,
        /// Body
        statements: Option<NodeId>,
        /// Closing `Loop`
        end: Option<NodeId>,
    },
    /// `While cond ... End While`
    WhileBlock {
        /// Tested expression
        condition: NodeId,
        /// Body
        statements: Option<NodeId>,
        /// Closing `End While`
        end: Option<NodeId>,
    },
    /// `For control = lower To upper [Step step] ... Next`
    ForBlock {
        /// Control variable expression
        control: NodeId,
        /// Declarator when the control variable is declared inline
        declarator: Option<NodeId>,
        /// Initial value
        lower: NodeId,
        /// Inclusive limit
        upper: NodeId,
        /// Increment
        step: Option<NodeId>,
        /// Body
        statements: Option<NodeId>,
        /// Closing `Next`
        next: Option<NodeId>,
    },
    /// `For Each control In collection ... Next`
    ForEachBlock {
        /// Control variable expression
        control: NodeId,
        /// Declarator when the control variable is declared inline
        declarator: Option<NodeId>,
        /// Enumerated collection
        collection: NodeId,
        /// Body
        statements: Option<NodeId>,
        /// Closing `Next`
        next: Option<NodeId>,
    },
    /// `With expr ... End With` and `SyncLock expr ... End SyncLock`
    Guarded {
        /// Subject expression
        expression: NodeId,
        /// Body
        statements: Option<NodeId>,
        /// Closing statement
        end: Option<NodeId>,
    },
    /// `Using resource ... End Using`
    Using {
        /// Resource expression
        expression: Option<NodeId>,
        /// Resource declarations
        declarators: Option<NodeId>,
        /// Body
        statements: Option<NodeId>,
        /// Closing statement
        end: Option<NodeId>,
    },
    /// `Try ... Catch ... Finally ... End Try`
    TryBlock {
        /// Guarded body
        statements: Option<NodeId>,
        /// Catch blocks
        catches: Option<NodeId>,
        /// Finally block
        finally: Option<NodeId>,
        /// Closing statement
        end: Option<NodeId>,
    },
    /// `Catch name As T When filter`
    CatchBlock {
        /// Exception variable
        name: Option<NodeId>,
        /// Exception type
        ty: Option<NodeId>,
        /// `When` filter
        filter: Option<NodeId>,
        /// Body
        statements: Option<NodeId>,
    },
    /// `Finally`, `Else` and `Case Else` bodies
    Body {
        /// Body
        statements: Option<NodeId>,
    },
    /// `If cond Then ... [ElseIf ...] [Else ...] End If`
    IfBlock {
        /// Tested expression
        condition: NodeId,
        /// Then body
        statements: Option<NodeId>,
        /// `ElseIf` blocks in source order
        else_ifs: Option<NodeId>,
        /// `Else` block
        else_block: Option<NodeId>,
        /// Closing statement
        end: Option<NodeId>,
    },
    /// `ElseIf cond Then ...`
    ElseIfBlock {
        /// Tested expression
        condition: NodeId,
        /// Body
        statements: Option<NodeId>,
    },
    /// `If cond Then a : b Else c`
    LineIf {
        /// Tested expression
        condition: NodeId,
        /// Then statements
        statements: Option<NodeId>,
        /// Else statements
        else_statements: Option<NodeId>,
    },
    /// `Select Case expr ... End Select`
    SelectBlock {
        /// Selector
        expression: NodeId,
        /// `Case` blocks in source order
        cases: Option<NodeId>,
        /// `Case Else` block
        case_else: Option<NodeId>,
        /// Closing statement
        end: Option<NodeId>,
    },
    /// `Case clauses ...`
    CaseBlock {
        /// Clauses
        clauses: NodeId,
        /// Body
        statements: Option<NodeId>,
    },
}

impl Payload for Stmt {
    fn accepts(&self, kind: NodeKind) -> bool {
        use NodeKind as K;
        match self {
            Self::Empty => matches!(kind, K::EmptyStatement | K::EndStatement | K::StopStatement),
            Self::LabelReference { .. } => {
                matches!(kind, K::GotoStatement | K::GoSubStatement | K::LabelStatement)
            }
            Self::Resume { .. } => kind == K::ResumeStatement,
            Self::Exit { .. } => kind == K::ExitStatement,
            Self::Continue { .. } => kind == K::ContinueStatement,
            Self::Return { .. } => kind == K::ReturnStatement,
            Self::Error { .. } => kind == K::ErrorStatement,
            Self::OnError { .. } => kind == K::OnErrorStatement,
            Self::RaiseEvent { .. } => kind == K::RaiseEventStatement,
            Self::Handler { .. } => {
                matches!(kind, K::AddHandlerStatement | K::RemoveHandlerStatement)
            }
            Self::ReDim { .. } => kind == K::ReDimStatement,
            Self::Erase { .. } => kind == K::EraseStatement,
            Self::Call { .. } => kind == K::CallStatement,
            Self::Assignment { .. } => kind == K::AssignmentStatement,
            Self::CompoundAssignment { .. } => kind == K::CompoundAssignmentStatement,
            Self::MidAssignment { .. } => kind == K::MidAssignmentStatement,
            Self::LocalDeclaration { .. } => kind == K::LocalDeclarationStatement,
            Self::EndBlock { .. } => kind == K::EndBlockStatement,
            Self::Loop { .. } => kind == K::LoopStatement,
            Self::Next { .. } => kind == K::NextStatement,
            Self::DoBlock { .. } => kind == K::DoBlockStatement,
            Self::WhileBlock { .. } => kind == K::WhileBlockStatement,
            Self::ForBlock { .. } => kind == K::ForBlockStatement,
            Self::ForEachBlock { .. } => kind == K::ForEachBlockStatement,
            Self::Guarded { .. } => {
                matches!(kind, K::WithBlockStatement | K::SyncLockBlockStatement)
            }
            Self::Using { .. } => kind == K::UsingBlockStatement,
            Self::TryBlock { .. } => kind == K::TryBlockStatement,
            Self::CatchBlock { .. } => kind == K::CatchBlockStatement,
            Self::Body { .. } => matches!(
                kind,
                K::FinallyBlockStatement | K::ElseBlockStatement | K::CaseElseBlockStatement
            ),
            Self::IfBlock { .. } => kind == K::IfBlockStatement,
            Self::ElseIfBlock { .. } => kind == K::ElseIfBlockStatement,
            Self::LineIf { .. } => kind == K::LineIfStatement,
            Self::SelectBlock { .. } => kind == K::SelectBlockStatement,
            Self::CaseBlock { .. } => kind == K::CaseBlockStatement,
        }
    }

    #[allow(clippy::too_many_lines, reason = "one arm per statement shape")]
    fn slots(&self, slots: &mut Slots) {
        match self {
            Self::Empty
            | Self::LabelReference { .. }
            | Self::Resume { .. }
            | Self::Exit { .. }
            | Self::Continue { .. }
            | Self::OnError { .. }
            | Self::EndBlock { .. } => {}
            Self::Return { expression } => slots.optional_family("expression", *expression, EXPR),
            Self::Error { expression } => slots.family("expression", *expression, EXPR),
            Self::RaiseEvent { name, arguments } => {
                slots.kind("name", *name, NodeKind::SimpleName);
                slots.optional_kind("arguments", *arguments, NodeKind::ArgumentCollection);
            }
            Self::Handler { event, handler } => {
                slots.family("event", *event, EXPR);
                slots.family("handler", *handler, EXPR);
            }
            Self::ReDim { variables, .. } | Self::Erase { variables } => {
                slots.kind("variables", *variables, NodeKind::ExpressionCollection);
            }
            Self::Call { target, arguments } => {
                slots.family("target", *target, EXPR);
                slots.optional_kind("arguments", *arguments, NodeKind::ArgumentCollection);
            }
            Self::Assignment { target, source }
            | Self::CompoundAssignment { target, source, .. } => {
                slots.family("target", *target, EXPR);
                slots.family("source", *source, EXPR);
            }
            Self::MidAssignment {
                target,
                start,
                length,
                source,
            } => {
                slots.family("target", *target, EXPR);
                slots.family("start", *start, EXPR);
                slots.optional_family("length", *length, EXPR);
                slots.family("source", *source, EXPR);
            }
            Self::LocalDeclaration {
                modifiers,
                declarators,
            } => {
                slots.kind("modifiers", *modifiers, NodeKind::ModifierCollection);
                slots.kind(
                    "declarators",
                    *declarators,
                    NodeKind::VariableDeclaratorCollection,
                );
            }
            Self::Loop { condition } => push_condition(slots, condition.as_ref()),
            Self::Next { variables } => {
                slots.optional_kind("variables", *variables, NodeKind::ExpressionCollection);
            }
            Self::DoBlock {
                condition,
                statements,
                end,
            } => {
                push_condition(slots, condition.as_ref());
                slots.optional_kind("statements", *statements, BODY);
                slots.optional_kind("end", *end, NodeKind::LoopStatement);
            }
            Self::WhileBlock {
                condition,
                statements,
                end,
            } => {
                slots.family("condition", *condition, EXPR);
                slots.optional_kind("statements", *statements, BODY);
                slots.optional_kind("end", *end, NodeKind::EndBlockStatement);
            }
            Self::ForBlock {
                control,
                declarator,
                lower,
                upper,
                step,
                statements,
                next,
            } => {
                slots.family("control", *control, EXPR);
                slots.optional_kind("declarator", *declarator, NodeKind::VariableDeclarator);
                slots.family("lower", *lower, EXPR);
                slots.family("upper", *upper, EXPR);
                slots.optional_family("step", *step, EXPR);
                slots.optional_kind("statements", *statements, BODY);
                slots.optional_kind("next", *next, NodeKind::NextStatement);
            }
            Self::ForEachBlock {
                control,
                declarator,
                collection,
                statements,
                next,
            } => {
                slots.family("control", *control, EXPR);
                slots.optional_kind("declarator", *declarator, NodeKind::VariableDeclarator);
                slots.family("collection", *collection, EXPR);
                slots.optional_kind("statements", *statements, BODY);
                slots.optional_kind("next", *next, NodeKind::NextStatement);
            }
            Self::Guarded {
                expression,
                statements,
                end,
            } => {
                slots.family("expression", *expression, EXPR);
                slots.optional_kind("statements", *statements, BODY);
                slots.optional_kind("end", *end, NodeKind::EndBlockStatement);
            }
            Self::Using {
                expression,
                declarators,
                statements,
                end,
            } => {
                slots.optional_family("expression", *expression, EXPR);
                slots.optional_kind(
                    "declarators",
                    *declarators,
                    NodeKind::VariableDeclaratorCollection,
                );
                slots.optional_kind("statements", *statements, BODY);
                slots.optional_kind("end", *end, NodeKind::EndBlockStatement);
            }
            Self::TryBlock {
                statements,
                catches,
                finally,
                end,
            } => {
                slots.optional_kind("statements", *statements, BODY);
                slots.optional_kind("catches", *catches, BODY);
                slots.optional_kind("finally", *finally, NodeKind::FinallyBlockStatement);
                slots.optional_kind("end", *end, NodeKind::EndBlockStatement);
            }
            Self::CatchBlock {
                name,
                ty,
                filter,
                statements,
            } => {
                slots.optional_kind("name", *name, NodeKind::SimpleName);
                slots.optional_family("ty", *ty, NodeFamily::Type);
                slots.optional_family("filter", *filter, EXPR);
                slots.optional_kind("statements", *statements, BODY);
            }
            Self::Body { statements } => slots.optional_kind("statements", *statements, BODY),
            Self::IfBlock {
                condition,
                statements,
                else_ifs,
                else_block,
                end,
            } => {
                slots.family("condition", *condition, EXPR);
                slots.optional_kind("statements", *statements, BODY);
                slots.optional_kind("else_ifs", *else_ifs, BODY);
                slots.optional_kind("else_block", *else_block, NodeKind::ElseBlockStatement);
                slots.optional_kind("end", *end, NodeKind::EndBlockStatement);
            }
            Self::ElseIfBlock {
                condition,
                statements,
            } => {
                slots.family("condition", *condition, EXPR);
                slots.optional_kind("statements", *statements, BODY);
            }
            Self::LineIf {
                condition,
                statements,
                else_statements,
            } => {
                slots.family("condition", *condition, EXPR);
                slots.optional_kind("statements", *statements, BODY);
                slots.optional_kind("else_statements", *else_statements, BODY);
            }
            Self::SelectBlock {
                expression,
                cases,
                case_else,
                end,
            } => {
                slots.family("expression", *expression, EXPR);
                slots.optional_kind("cases", *cases, BODY);
                slots.optional_kind("case_else", *case_else, NodeKind::CaseElseBlockStatement);
                slots.optional_kind("end", *end, NodeKind::EndBlockStatement);
            }
            Self::CaseBlock {
                clauses,
                statements,
            } => {
                slots.kind("clauses", *clauses, NodeKind::CaseClauseCollection);
                slots.optional_kind("statements", *statements, BODY);
            }
        }
    }

    fn check_enumerants(&self, kind: NodeKind) -> Result<(), SyntaxError> {
        match self {
            Self::Exit { block } if !block.is_exitable() => {
                Err(invalid_enumerant(kind, "block", block))
            }
            Self::Continue { block } if !block.is_loop() => {
                Err(invalid_enumerant(kind, "block", block))
            }
            Self::EndBlock { block } if !block.closes_statement() => {
                Err(invalid_enumerant(kind, "block", block))
            }
            Self::CompoundAssignment { op, .. } if !op.is_compound_assignable() => {
                Err(invalid_enumerant(kind, "op", op))
            }
            Self::Resume {
                kind: resume,
                label,
            } if (*resume == ResumeKind::Label) != label.is_some() => {
                Err(invalid_enumerant(kind, "kind", resume))
            }
            Self::OnError {
                kind: on_error,
                label,
            } if (*on_error == OnErrorKind::Label) != label.is_some() => {
                Err(invalid_enumerant(kind, "kind", on_error))
            }
            _ => Ok(()),
        }
    }
}

fn push_condition(slots: &mut Slots, condition: Option<&LoopCondition>) {
    if let Some(condition) = condition {
        slots.family("condition", condition.expression, EXPR);
    }
}
