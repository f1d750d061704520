//! Integration test utilities for the lowering pipeline
//!
//! [`Fixture`] builds syntax trees the way the parser does, bottom-up
//! through the validating builder, so tests can describe a program without
//! source text. [`interpreter`] runs lowered method bodies so tests can
//! check what the IR does as well as how it looks.

pub mod interpreter;

use vb_ir::{IrProgram, IrStmt};
use vb_lower::{LowerError, LowerOptions};
use vb_span::{Location, Span};
use vb_syntax::token::{BlockType, IntrinsicType, ModifierKind, OperatorKind, OptionKind};
use vb_syntax::{
    Argument, CaseClause, Collection, Decl, DeclHeader, Expr, File, Initializer, Literal,
    LoopCondition, Name, NodeData, NodeId, NodeKind, Signature, SimpleName, Stmt, SyntaxError,
    SyntaxTree, TreeBuilder, TypeName, VariableDeclarator,
};

fn built<T>(result: Result<T, SyntaxError>) -> T {
    result.unwrap_or_else(|error| panic!("fixture built an invalid node: {error}"))
}

/// Tree under construction
///
/// Every node gets its own source line, so a node can be told apart by
/// the line of its span.
#[derive(Debug, Default)]
pub struct Fixture {
    builder: TreeBuilder,
    line: u32,
}

impl Fixture {
    /// Creates an empty fixture
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn span(&mut self) -> Span {
        self.line += 1;
        Span::at(Location::new(self.line, 1))
    }

    /// Allocates any node
    pub fn node(&mut self, kind: NodeKind, data: impl Into<NodeData>) -> NodeId {
        let span = self.span();
        built(self.builder.alloc(kind, span, data))
    }

    /// Allocates a statement or declaration carrying one comment
    pub fn commented(
        &mut self,
        kind: NodeKind,
        data: impl Into<NodeData>,
        comment: &str,
    ) -> NodeId {
        let span = self.span();
        let comment = built(self.builder.comment(span, comment, false));
        let span = self.span();
        built(self.builder.alloc_with_comments(kind, span, data, vec![comment]))
    }

    /// Allocates a collection with one separator between elements
    pub fn list(&mut self, kind: NodeKind, elements: Vec<NodeId>) -> NodeId {
        let span = self.span();
        let separators = (1..elements.len())
            .map(|column| Location::new(self.line, u32::try_from(column).unwrap_or(u32::MAX)))
            .collect();
        let elements = elements.into_iter().map(Some).collect();
        built(
            self.builder
                .alloc(kind, span, Collection::new(elements, separators)),
        )
    }

    fn optional_list(&mut self, kind: NodeKind, elements: Vec<NodeId>) -> Option<NodeId> {
        (!elements.is_empty()).then(|| self.list(kind, elements))
    }

    /// Finishes the tree with `declarations` as the file's members
    #[must_use]
    pub fn finish(mut self, declarations: Vec<NodeId>) -> SyntaxTree {
        let declarations = self.optional_list(NodeKind::DeclarationCollection, declarations);
        let root = self.node(NodeKind::File, File { declarations });
        self.finish_at(root)
    }

    /// Finishes the tree with an arbitrary root
    #[must_use]
    pub fn finish_at(self, root: NodeId) -> SyntaxTree {
        built(self.builder.finish(root))
    }

    // Names and types

    pub fn simple_name(&mut self, text: &str) -> NodeId {
        self.node(NodeKind::SimpleName, Name::Simple(SimpleName::new(text)))
    }

    pub fn variable_name(&mut self, text: &str) -> NodeId {
        let name = self.simple_name(text);
        self.node(
            NodeKind::VariableName,
            Name::Variable {
                name,
                array_type: None,
            },
        )
    }

    /// `name(b1, b2, ...)`, a variable name with explicit bounds
    pub fn array_name(&mut self, text: &str, bounds: Vec<NodeId>) -> NodeId {
        let name = self.simple_name(text);
        let rank = u32::try_from(bounds.len()).unwrap_or(u32::MAX);
        let bounds = self.arguments(bounds);
        let array_type = self.node(
            NodeKind::ArrayType,
            TypeName::Array {
                element: None,
                rank,
                bounds,
            },
        );
        self.node(
            NodeKind::VariableName,
            Name::Variable {
                name,
                array_type: Some(array_type),
            },
        )
    }

    pub fn intrinsic(&mut self, ty: IntrinsicType) -> NodeId {
        self.node(NodeKind::IntrinsicType, TypeName::Intrinsic(ty))
    }

    pub fn named_type(&mut self, text: &str) -> NodeId {
        let name = self.simple_name(text);
        self.node(NodeKind::NamedType, TypeName::Named { name })
    }

    // Expressions

    /// Simple name expression
    pub fn name(&mut self, text: &str) -> NodeId {
        let name = self.simple_name(text);
        self.node(NodeKind::SimpleNameExpression, Expr::SimpleName { name })
    }

    pub fn int(&mut self, value: i64) -> NodeId {
        self.node(
            NodeKind::IntegerLiteralExpression,
            Expr::Literal(Literal::integer(value)),
        )
    }

    pub fn string(&mut self, text: &str) -> NodeId {
        self.node(
            NodeKind::StringLiteralExpression,
            Expr::Literal(Literal::String(text.to_owned())),
        )
    }

    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.node(
            NodeKind::BooleanLiteralExpression,
            Expr::Literal(Literal::Boolean(value)),
        )
    }

    pub fn binary(&mut self, op: OperatorKind, left: NodeId, right: NodeId) -> NodeId {
        let op_location = Location::new(self.line, 2);
        self.node(
            NodeKind::BinaryOperatorExpression,
            Expr::Binary {
                op,
                op_location,
                left,
                right,
            },
        )
    }

    pub fn unary(&mut self, op: OperatorKind, operand: NodeId) -> NodeId {
        self.node(NodeKind::UnaryOperatorExpression, Expr::Unary { op, operand })
    }

    pub fn parenthesized(&mut self, operand: NodeId) -> NodeId {
        self.node(
            NodeKind::ParentheticalExpression,
            Expr::Parenthetical { operand },
        )
    }

    /// `qualifier.name`; no qualifier means the enclosing `With` target
    pub fn member(&mut self, qualifier: Option<NodeId>, name: &str) -> NodeId {
        let name = self.simple_name(name);
        let dot = Location::new(self.line, 1);
        self.node(
            NodeKind::QualifiedExpression,
            Expr::Qualified {
                qualifier,
                dot,
                name,
            },
        )
    }

    /// `target(arguments)`, call or index
    pub fn call(&mut self, target: NodeId, arguments: Vec<NodeId>) -> NodeId {
        let arguments = self.arguments(arguments);
        self.node(
            NodeKind::CallOrIndexExpression,
            Expr::CallOrIndex {
                target,
                arguments,
                declarator: None,
            },
        )
    }

    /// Positional arguments wrapping `expressions`
    pub fn arguments(&mut self, expressions: Vec<NodeId>) -> Option<NodeId> {
        let arguments = expressions
            .into_iter()
            .map(|expression| {
                self.node(
                    NodeKind::Argument,
                    Argument {
                        name: None,
                        expression,
                    },
                )
            })
            .collect();
        self.optional_list(NodeKind::ArgumentCollection, arguments)
    }

    // Variable declarations

    pub fn declarator(
        &mut self,
        names: Vec<NodeId>,
        ty: Option<NodeId>,
        value: Option<NodeId>,
    ) -> NodeId {
        let names = self.list(NodeKind::VariableNameCollection, names);
        let initializer = value.map(|expression| {
            self.node(
                NodeKind::ExpressionInitializer,
                Initializer::Expression { expression },
            )
        });
        self.node(
            NodeKind::VariableDeclarator,
            VariableDeclarator {
                names,
                ty,
                is_new: false,
                arguments: None,
                initializer,
            },
        )
    }

    pub fn modifiers(&mut self, modifiers: &[ModifierKind]) -> NodeId {
        let modifiers = modifiers
            .iter()
            .map(|&modifier| self.node(NodeKind::Modifier, modifier))
            .collect();
        self.list(NodeKind::ModifierCollection, modifiers)
    }

    /// Local declaration statement of `declarators`
    pub fn local(&mut self, modifier: ModifierKind, declarators: Vec<NodeId>) -> NodeId {
        let modifiers = self.modifiers(&[modifier]);
        let declarators = self.list(NodeKind::VariableDeclaratorCollection, declarators);
        self.node(
            NodeKind::LocalDeclarationStatement,
            Stmt::LocalDeclaration {
                modifiers,
                declarators,
            },
        )
    }

    /// `Dim name As ty`
    pub fn dim(&mut self, name: &str, ty: IntrinsicType) -> NodeId {
        let variable = self.variable_name(name);
        let ty = self.intrinsic(ty);
        let declarator = self.declarator(vec![variable], Some(ty), None);
        self.local(ModifierKind::Dim, vec![declarator])
    }

    /// `Dim name(bounds) As ty`
    pub fn dim_array(&mut self, name: &str, bounds: Vec<NodeId>, ty: IntrinsicType) -> NodeId {
        let variable = self.array_name(name, bounds);
        let ty = self.intrinsic(ty);
        let declarator = self.declarator(vec![variable], Some(ty), None);
        self.local(ModifierKind::Dim, vec![declarator])
    }

    // Statements

    /// Statement collection, `None` when empty
    pub fn body(&mut self, statements: Vec<NodeId>) -> Option<NodeId> {
        self.optional_list(NodeKind::StatementCollection, statements)
    }

    pub fn assign(&mut self, target: NodeId, source: NodeId) -> NodeId {
        self.node(
            NodeKind::AssignmentStatement,
            Stmt::Assignment { target, source },
        )
    }

    /// `name = source`
    pub fn set(&mut self, name: &str, source: NodeId) -> NodeId {
        let target = self.name(name);
        self.assign(target, source)
    }

    pub fn compound(&mut self, op: OperatorKind, target: NodeId, source: NodeId) -> NodeId {
        self.node(
            NodeKind::CompoundAssignmentStatement,
            Stmt::CompoundAssignment { op, target, source },
        )
    }

    pub fn call_statement(&mut self, target: NodeId, arguments: Vec<NodeId>) -> NodeId {
        let arguments = self.arguments(arguments);
        self.node(NodeKind::CallStatement, Stmt::Call { target, arguments })
    }

    fn label_reference(&mut self, kind: NodeKind, name: &str) -> NodeId {
        self.node(
            kind,
            Stmt::LabelReference {
                name: name.to_owned(),
                is_line_number: name.chars().all(|character| character.is_ascii_digit()),
            },
        )
    }

    pub fn label(&mut self, name: &str) -> NodeId {
        self.label_reference(NodeKind::LabelStatement, name)
    }

    pub fn goto(&mut self, name: &str) -> NodeId {
        self.label_reference(NodeKind::GotoStatement, name)
    }

    pub fn gosub(&mut self, name: &str) -> NodeId {
        self.label_reference(NodeKind::GoSubStatement, name)
    }

    pub fn return_statement(&mut self, expression: Option<NodeId>) -> NodeId {
        self.node(NodeKind::ReturnStatement, Stmt::Return { expression })
    }

    pub fn exit(&mut self, block: BlockType) -> NodeId {
        self.node(NodeKind::ExitStatement, Stmt::Exit { block })
    }

    pub fn end_block(&mut self, block: BlockType) -> NodeId {
        self.node(NodeKind::EndBlockStatement, Stmt::EndBlock { block })
    }

    /// `For control = lower To upper [Step step] ... Next`
    pub fn for_block(
        &mut self,
        control: &str,
        lower: NodeId,
        upper: NodeId,
        step: Option<NodeId>,
        statements: Vec<NodeId>,
    ) -> NodeId {
        let control = self.name(control);
        let statements = self.body(statements);
        let next = self.node(NodeKind::NextStatement, Stmt::Next { variables: None });
        self.node(
            NodeKind::ForBlockStatement,
            Stmt::ForBlock {
                control,
                declarator: None,
                lower,
                upper,
                step,
                statements,
                next: Some(next),
            },
        )
    }

    /// `Do [While|Until top] ... Loop [While|Until bottom]`; the flag is
    /// true for `While`
    pub fn do_loop(
        &mut self,
        top: Option<(bool, NodeId)>,
        bottom: Option<(bool, NodeId)>,
        statements: Vec<NodeId>,
    ) -> NodeId {
        let condition = top.map(|(is_while, expression)| LoopCondition {
            is_while,
            expression,
        });
        let statements = self.body(statements);
        let trailing = bottom.map(|(is_while, expression)| LoopCondition {
            is_while,
            expression,
        });
        let end = self.node(
            NodeKind::LoopStatement,
            Stmt::Loop {
                condition: trailing,
            },
        );
        self.node(
            NodeKind::DoBlockStatement,
            Stmt::DoBlock {
                condition,
                statements,
                end: Some(end),
            },
        )
    }

    /// `If condition Then ... [Else ...] End If`
    pub fn if_block(
        &mut self,
        condition: NodeId,
        statements: Vec<NodeId>,
        else_statements: Option<Vec<NodeId>>,
    ) -> NodeId {
        let statements = self.body(statements);
        let else_block = else_statements.map(|else_statements| {
            let statements = self.body(else_statements);
            self.node(NodeKind::ElseBlockStatement, Stmt::Body { statements })
        });
        let end = self.end_block(BlockType::If);
        self.node(
            NodeKind::IfBlockStatement,
            Stmt::IfBlock {
                condition,
                statements,
                else_ifs: None,
                else_block,
                end: Some(end),
            },
        )
    }

    /// `Case [Is] op operand`; no operator means equality
    pub fn case_is(&mut self, op: Option<OperatorKind>, operand: NodeId) -> NodeId {
        self.node(
            NodeKind::ComparisonCaseClause,
            CaseClause::Comparison { op, operand },
        )
    }

    /// `Case lower To upper`
    pub fn case_range(&mut self, lower: NodeId, upper: NodeId) -> NodeId {
        self.node(NodeKind::RangeCaseClause, CaseClause::Range { lower, upper })
    }

    /// `Select Case expression`, one `(clauses, statements)` pair per
    /// `Case` in source order
    pub fn select(
        &mut self,
        expression: NodeId,
        cases: Vec<(Vec<NodeId>, Vec<NodeId>)>,
        case_else: Option<Vec<NodeId>>,
    ) -> NodeId {
        let cases = cases
            .into_iter()
            .map(|(clauses, statements)| {
                let clauses = self.list(NodeKind::CaseClauseCollection, clauses);
                let statements = self.body(statements);
                self.node(
                    NodeKind::CaseBlockStatement,
                    Stmt::CaseBlock {
                        clauses,
                        statements,
                    },
                )
            })
            .collect();
        let cases = self.body(cases);
        let case_else = case_else.map(|statements| {
            let statements = self.body(statements);
            self.node(NodeKind::CaseElseBlockStatement, Stmt::Body { statements })
        });
        let end = self.end_block(BlockType::Select);
        self.node(
            NodeKind::SelectBlockStatement,
            Stmt::SelectBlock {
                expression,
                cases,
                case_else,
                end: Some(end),
            },
        )
    }

    /// `With target ... End With`
    pub fn with_block(&mut self, target: NodeId, statements: Vec<NodeId>) -> NodeId {
        let statements = self.body(statements);
        let end = self.end_block(BlockType::With);
        self.node(
            NodeKind::WithBlockStatement,
            Stmt::Guarded {
                expression: target,
                statements,
                end: Some(end),
            },
        )
    }

    /// `ReDim [Preserve] a(b1, ...), ...`; operands are call-or-index
    /// expressions
    pub fn redim(&mut self, preserve: bool, operands: Vec<NodeId>) -> NodeId {
        let variables = self.list(NodeKind::ExpressionCollection, operands);
        self.node(
            NodeKind::ReDimStatement,
            Stmt::ReDim {
                preserve,
                variables,
            },
        )
    }

    // Declarations

    fn method(
        &mut self,
        kind: NodeKind,
        name: &str,
        result_type: Option<NodeId>,
        statements: Vec<NodeId>,
        block: BlockType,
    ) -> NodeId {
        let name = self.simple_name(name);
        let statements = self.body(statements);
        let end = self.node(NodeKind::EndBlockDeclaration, Decl::EndBlock { block });
        self.node(
            kind,
            Decl::Method {
                header: DeclHeader::default(),
                signature: Signature {
                    result_type,
                    ..Signature::named(name)
                },
                operator: None,
                implements: None,
                statements,
                end: Some(end),
            },
        )
    }

    /// `Sub name() ... End Sub`
    pub fn sub(&mut self, name: &str, statements: Vec<NodeId>) -> NodeId {
        self.method(
            NodeKind::SubDeclaration,
            name,
            None,
            statements,
            BlockType::Sub,
        )
    }

    /// `Function name() [As result] ... End Function`
    pub fn function(
        &mut self,
        name: &str,
        result: Option<IntrinsicType>,
        statements: Vec<NodeId>,
    ) -> NodeId {
        let result_type = result.map(|result| self.intrinsic(result));
        self.method(
            NodeKind::FunctionDeclaration,
            name,
            result_type,
            statements,
            BlockType::Function,
        )
    }

    /// `Property name As result` with a `Get` accessor holding `getter`
    pub fn property(
        &mut self,
        name: &str,
        result: IntrinsicType,
        getter: Vec<NodeId>,
    ) -> NodeId {
        let name = self.simple_name(name);
        let result_type = self.intrinsic(result);
        let statements = self.body(getter);
        let end = self.node(
            NodeKind::EndBlockDeclaration,
            Decl::EndBlock {
                block: BlockType::Get,
            },
        );
        let get = self.node(
            NodeKind::GetAccessorDeclaration,
            Decl::Accessor {
                header: DeclHeader::default(),
                parameters: None,
                statements,
                end: Some(end),
            },
        );
        let accessors = self.list(NodeKind::DeclarationCollection, vec![get]);
        let end = self.node(
            NodeKind::EndBlockDeclaration,
            Decl::EndBlock {
                block: BlockType::Property,
            },
        );
        self.node(
            NodeKind::PropertyDeclaration,
            Decl::Property {
                header: DeclHeader::default(),
                signature: Signature {
                    result_type: Some(result_type),
                    ..Signature::named(name)
                },
                implements: None,
                accessors: Some(accessors),
                end: Some(end),
            },
        )
    }

    /// `Module name ... End Module`
    pub fn module(&mut self, name: &str, members: Vec<NodeId>) -> NodeId {
        let name = self.simple_name(name);
        let declarations = self.optional_list(NodeKind::DeclarationCollection, members);
        let end = self.node(
            NodeKind::EndBlockDeclaration,
            Decl::EndBlock {
                block: BlockType::Module,
            },
        );
        self.node(
            NodeKind::ModuleDeclaration,
            Decl::TypeBlock {
                header: DeclHeader::default(),
                name,
                type_parameters: None,
                declarations,
                end: Some(end),
            },
        )
    }

    pub fn option(&mut self, option: OptionKind) -> NodeId {
        self.node(NodeKind::OptionDeclaration, Decl::Option(option))
    }
}

/// Lowers `tree` with default options
///
/// # Errors
///
/// Whatever lowering reports.
pub fn lower(tree: &SyntaxTree) -> Result<IrProgram, LowerError> {
    vb_lower::lower_file(tree, &LowerOptions::default())
}

/// Body of the method `name` of the program's top-level type
///
/// # Panics
///
/// When the type has no such method.
#[must_use]
pub fn method_body<'program>(program: &'program IrProgram, name: &str) -> &'program [IrStmt] {
    match program.ty.method(name) {
        Some(method) => &method.body,
        None => panic!("no method {name} in {}", program.ty.name),
    }
}
