//! Exact IR produced for legacy constructs

use expect_test::expect;
use integration_tests::interpreter::{Interpreter, Value};
use integration_tests::{lower, method_body, Fixture};
use vb_ir::{
    BinaryOp, CompareMode, IrExpr, IrLiteral, IrMember, IrProgram, IrStmt, IrType, PrimitiveType,
    TypeKind,
};
use vb_lower::{lower_file, LowerError, LowerOptions};
use vb_syntax::token::{BlockType, IntrinsicType, OperatorKind, OptionKind};
use vb_syntax::{NodeData, NodeKind, Stmt};

fn int_type() -> IrType {
    IrType::Primitive(PrimitiveType::Int)
}

fn string(text: &str) -> IrExpr {
    IrExpr::Literal(IrLiteral::String(text.to_owned()))
}

fn unsupported_kind(error: LowerError) -> NodeKind {
    match error {
        LowerError::Unsupported { kind, .. } => kind,
        other => panic!("expected an unsupported construct, got {other:?}"),
    }
}

#[test]
fn test_function_result_shadow() {
    let mut f = Fixture::new();
    let five = f.int(5);
    let assign = f.set("F", five);
    let function = f.function("F", Some(IntrinsicType::Integer), vec![assign]);
    let tree = f.finish(vec![function]);
    let program = lower(&tree).unwrap();
    assert_eq!(
        method_body(&program, "F"),
        &[
            IrStmt::declare("FResult", int_type(), Some(IrExpr::int(0))),
            IrStmt::assign(IrExpr::var("FResult"), IrExpr::int(5)),
            IrStmt::Return(Some(IrExpr::var("FResult"))),
        ]
    );
    expect![[r#"
        public static class Module1 {
            public static int F() {
                int FResult = 0;
                FResult = 5;
                return FResult;
            }
        }
    "#]]
    .assert_eq(&program.to_string());
}

#[test]
fn test_shadow_name_avoids_source_names() {
    let mut f = Fixture::new();
    let local = f.dim("fresult", IntrinsicType::Integer);
    let read = f.name("fresult");
    let assign = f.set("F", read);
    let function = f.function("F", Some(IntrinsicType::Integer), vec![local, assign]);
    let tree = f.finish(vec![function]);
    let program = lower(&tree).unwrap();
    assert_eq!(
        method_body(&program, "F"),
        &[
            IrStmt::declare("FResult1", int_type(), Some(IrExpr::int(0))),
            IrStmt::declare("fresult", int_type(), Some(IrExpr::int(0))),
            IrStmt::assign(IrExpr::var("FResult1"), IrExpr::var("fresult")),
            IrStmt::Return(Some(IrExpr::var("FResult1"))),
        ]
    );
}

#[test]
fn test_exit_function_returns_shadow_or_zero_value() {
    let mut f = Fixture::new();
    let exit = f.exit(BlockType::Function);
    let bare = f.function("Bare", Some(IntrinsicType::Integer), vec![exit]);
    let two = f.int(2);
    let assign = f.set("Early", two);
    let exit = f.exit(BlockType::Function);
    let early = f.function("Early", Some(IntrinsicType::Boolean), vec![assign, exit]);
    let tree = f.finish(vec![bare, early]);
    let program = lower(&tree).unwrap();
    assert_eq!(
        method_body(&program, "Bare"),
        &[IrStmt::Return(Some(IrExpr::int(0)))]
    );
    assert_eq!(
        method_body(&program, "Early"),
        &[
            IrStmt::declare(
                "EarlyResult",
                IrType::Primitive(PrimitiveType::Bool),
                Some(IrExpr::bool(false))
            ),
            IrStmt::assign(IrExpr::var("EarlyResult"), IrExpr::int(2)),
            IrStmt::Return(Some(IrExpr::var("EarlyResult"))),
            IrStmt::Return(Some(IrExpr::var("EarlyResult"))),
        ]
    );
}

#[test]
fn test_explicit_return_needs_no_shadow() {
    let mut f = Fixture::new();
    let three = f.int(3);
    let ret = f.return_statement(Some(three));
    let function = f.function("Three", Some(IntrinsicType::Integer), vec![ret]);
    let tree = f.finish(vec![function]);
    let program = lower(&tree).unwrap();
    assert_eq!(
        method_body(&program, "Three"),
        &[IrStmt::Return(Some(IrExpr::int(3)))]
    );
}

#[test]
fn test_redim_preserve_copies_through_temporary() {
    let mut f = Fixture::new();
    let five = f.int(5);
    let dim = f.dim_array("a", vec![five], IntrinsicType::Integer);
    let target = f.name("a");
    let ten = f.int(10);
    let operand = f.call(target, vec![ten]);
    let redim = f.redim(true, vec![operand]);
    let main = f.sub("Main", vec![dim, redim]);
    let tree = f.finish(vec![main]);
    let program = lower(&tree).unwrap();
    let allocate = |length| IrExpr::ArrayCreate {
        element: int_type(),
        lengths: vec![IrExpr::int(length)],
        initializer: None,
    };
    assert_eq!(
        method_body(&program, "Main"),
        &[
            IrStmt::declare("a", IrType::array(int_type(), 1), Some(allocate(6))),
            IrStmt::declare("aPreserved", IrType::array(int_type(), 1), Some(allocate(11))),
            IrStmt::Expression(IrExpr::static_call(
                "Array",
                "Copy",
                vec![
                    IrExpr::var("a"),
                    IrExpr::var("aPreserved"),
                    IrExpr::static_call(
                        "Math",
                        "Min",
                        vec![
                            IrExpr::field(IrExpr::var("a"), "Length"),
                            IrExpr::field(IrExpr::var("aPreserved"), "Length"),
                        ]
                    ),
                ]
            )),
            IrStmt::assign(IrExpr::var("a"), IrExpr::var("aPreserved")),
        ]
    );
}

#[test]
fn test_redim_without_preserve_reallocates() {
    let mut f = Fixture::new();
    let five = f.int(5);
    let dim = f.dim_array("a", vec![five], IntrinsicType::Integer);
    let target = f.name("a");
    let ten = f.int(10);
    let operand = f.call(target, vec![ten]);
    let redim = f.redim(false, vec![operand]);
    let main = f.sub("Main", vec![dim, redim]);
    let tree = f.finish(vec![main]);
    let program = lower(&tree).unwrap();
    assert_eq!(
        method_body(&program, "Main")[1],
        IrStmt::assign(
            IrExpr::var("a"),
            IrExpr::ArrayCreate {
                element: int_type(),
                lengths: vec![IrExpr::int(11)],
                initializer: None,
            }
        )
    );
}

#[test]
fn test_gosub_jumps_and_returns() {
    let mut f = Fixture::new();
    let dim = f.dim("count", IntrinsicType::Integer);
    let gosub = f.gosub("Work");
    let count = f.name("count");
    let one = f.int(1);
    let increment = f.binary(OperatorKind::Plus, count, one);
    let after = f.set("count", increment);
    let exit = f.exit(BlockType::Sub);
    let label = f.label("Work");
    let count = f.name("count");
    let ten = f.int(10);
    let add = f.binary(OperatorKind::Plus, count, ten);
    let work = f.set("count", add);
    let ret = f.return_statement(None);
    let main = f.sub("Main", vec![dim, gosub, after, exit, label, work, ret]);
    let tree = f.finish(vec![main]);
    let program = lower(&tree).unwrap();
    let body = method_body(&program, "Main");
    let plus = |amount| IrExpr::binary(BinaryOp::Add, IrExpr::var("count"), IrExpr::int(amount));
    assert_eq!(
        body,
        &[
            IrStmt::declare("count", int_type(), Some(IrExpr::int(0))),
            IrStmt::Goto("Work".to_owned()),
            IrStmt::Label("Work_return".to_owned()),
            IrStmt::assign(IrExpr::var("count"), plus(1)),
            IrStmt::Return(None),
            IrStmt::Label("Work".to_owned()),
            IrStmt::assign(IrExpr::var("count"), plus(10)),
            IrStmt::Goto("Work_return".to_owned()),
        ]
    );

    let mut interpreter = Interpreter::new();
    assert_eq!(interpreter.run(body), Ok(None));
    assert_eq!(interpreter.local("count"), Some(&Value::Int(11)));
}

#[test]
fn test_second_gosub_to_one_label_aborts() {
    let mut f = Fixture::new();
    let first = f.gosub("Work");
    let second = f.gosub("Work");
    let exit = f.exit(BlockType::Sub);
    let label = f.label("Work");
    let ret = f.return_statement(None);
    let main = f.sub("Main", vec![first, second, exit, label, ret]);
    let tree = f.finish(vec![main]);
    assert_eq!(
        lower(&tree),
        Err(LowerError::Unsupported {
            kind: NodeKind::GoSubStatement,
            span: tree.span(second),
        })
    );

    // one GoSub per routine is fine even when the label names repeat
    let mut f = Fixture::new();
    let routine = |f: &mut Fixture, name: &str| {
        let gosub = f.gosub("Work");
        let exit = f.exit(BlockType::Sub);
        let label = f.label("Work");
        let ret = f.return_statement(None);
        f.sub(name, vec![gosub, exit, label, ret])
    };
    let first = routine(&mut f, "First");
    let second = routine(&mut f, "Second");
    let tree = f.finish(vec![first, second]);
    let program = lower(&tree).unwrap();
    for name in ["First", "Second"] {
        assert_eq!(
            method_body(&program, name)[..2],
            [
                IrStmt::Goto("Work".to_owned()),
                IrStmt::Label("Work_return".to_owned()),
            ]
        );
    }
}

#[test]
fn test_line_number_labels() {
    let mut f = Fixture::new();
    let label = f.label("100");
    let goto = f.goto("100");
    let main = f.sub("Main", vec![label, goto]);
    let tree = f.finish(vec![main]);
    let program = lower(&tree).unwrap();
    assert_eq!(
        method_body(&program, "Main"),
        &[
            IrStmt::Label("Line100".to_owned()),
            IrStmt::Goto("Line100".to_owned()),
        ]
    );
}

#[test]
fn test_unsupported_construct_aborts_whole_file() {
    let mut f = Fixture::new();
    let zero = f.int(0);
    let fine = f.set("x", zero);
    let first = f.sub("First", vec![fine]);
    let end = f.end_block(BlockType::Try);
    let guarded = f.node(
        NodeKind::TryBlockStatement,
        Stmt::TryBlock {
            statements: None,
            catches: None,
            finally: None,
            end: Some(end),
        },
    );
    let second = f.sub("Second", vec![guarded]);
    let tree = f.finish(vec![first, second]);
    assert_eq!(
        unsupported_kind(lower(&tree).unwrap_err()),
        NodeKind::TryBlockStatement
    );
}

#[test]
fn test_exit_must_match_nearest_loop() {
    let mut f = Fixture::new();
    let exit = f.exit(BlockType::Do);
    let main = f.sub("Main", vec![exit]);
    let tree = f.finish(vec![main]);
    assert_eq!(
        unsupported_kind(lower(&tree).unwrap_err()),
        NodeKind::ExitStatement
    );

    let mut f = Fixture::new();
    let exit = f.exit(BlockType::For);
    let forever = f.do_loop(None, None, vec![exit]);
    let main = f.sub("Main", vec![forever]);
    let tree = f.finish(vec![main]);
    assert_eq!(
        unsupported_kind(lower(&tree).unwrap_err()),
        NodeKind::ExitStatement
    );
}

#[test]
fn test_condition_at_both_ends_is_malformed() {
    let mut f = Fixture::new();
    let top = f.boolean(true);
    let bottom = f.boolean(false);
    let both = f.do_loop(Some((true, top)), Some((false, bottom)), Vec::new());
    let main = f.sub("Main", vec![both]);
    let tree = f.finish(vec![main]);
    assert!(matches!(
        lower(&tree),
        Err(LowerError::MalformedTree { .. })
    ));
}

#[test]
fn test_syntax_error_node_is_reported() {
    let mut f = Fixture::new();
    let bad = f.node(NodeKind::SyntaxError, NodeData::SyntaxError);
    let main = f.sub("Main", vec![bad]);
    let tree = f.finish(vec![main]);
    assert_eq!(
        lower(&tree),
        Err(LowerError::BadNode {
            span: tree.span(bad)
        })
    );
}

/// `Sub Main: m = "abc" Like "a*"`, with an `Option Compare Text` before
/// or after it
fn like_program(option_first: bool) -> vb_ir::IrProgram {
    let mut f = Fixture::new();
    let text = f.string("abc");
    let pattern = f.string("a*");
    let like = f.binary(OperatorKind::Like, text, pattern);
    let assign = f.set("m", like);
    let main = f.sub("Main", vec![assign]);
    let option = f.option(OptionKind::CompareText);
    let declarations = if option_first {
        vec![option, main]
    } else {
        vec![main, option]
    };
    let tree = f.finish(declarations);
    lower(&tree).unwrap()
}

fn like_call(mode: &str) -> IrStmt {
    IrStmt::assign(
        IrExpr::var("m"),
        IrExpr::static_call(
            "LikeOperator",
            "LikeString",
            vec![
                string("abc"),
                string("a*"),
                IrExpr::field(IrExpr::TypeRef(IrType::named("CompareMethod")), mode),
            ],
        ),
    )
}

#[test]
fn test_like_reads_compare_mode_in_source_order() {
    let program = like_program(true);
    assert_eq!(method_body(&program, "Main"), &[like_call("Text")]);
    assert_eq!(program.options.compare, CompareMode::Text);

    let program = like_program(false);
    assert_eq!(method_body(&program, "Main"), &[like_call("Binary")]);
    assert_eq!(program.options.compare, CompareMode::Text);
}

#[test]
fn test_option_base_shifts_bound_lengths() {
    let mut f = Fixture::new();
    let option = f.option(OptionKind::Base(1));
    let five = f.int(5);
    let fixed = f.dim_array("a", vec![five], IntrinsicType::Integer);
    let n = f.name("n");
    let sized = f.dim_array("b", vec![n], IntrinsicType::Integer);
    let main = f.sub("Main", vec![fixed, sized]);
    let tree = f.finish(vec![option, main]);
    let program = lower(&tree).unwrap();
    let lengths: Vec<_> = method_body(&program, "Main")
        .iter()
        .map(|statement| match statement {
            IrStmt::Declare {
                init: Some(IrExpr::ArrayCreate { lengths, .. }),
                ..
            } => lengths[0].clone(),
            other => panic!("expected an array declaration, got {other:?}"),
        })
        .collect();
    assert_eq!(lengths, vec![IrExpr::int(5), IrExpr::var("n")]);
    assert_eq!(program.options.base, 1);
}

#[test]
fn test_power_becomes_library_call() {
    let mut f = Fixture::new();
    let x = f.name("x");
    let two = f.int(2);
    let power = f.binary(OperatorKind::Power, x, two);
    let assign = f.set("y", power);
    let main = f.sub("Main", vec![assign]);
    let tree = f.finish(vec![main]);
    let program = lower(&tree).unwrap();
    assert_eq!(
        method_body(&program, "Main"),
        &[IrStmt::assign(
            IrExpr::var("y"),
            IrExpr::static_call("Math", "Pow", vec![IrExpr::var("x"), IrExpr::int(2)]),
        )]
    );
}

#[test]
fn test_mid_assignment_splices_in_place() {
    let mut f = Fixture::new();
    let target = f.name("s");
    let start = f.int(2);
    let source = f.string("xy");
    let mid = f.node(
        NodeKind::MidAssignmentStatement,
        Stmt::MidAssignment {
            target,
            start,
            length: None,
            source,
        },
    );
    let main = f.sub("Main", vec![mid]);
    let tree = f.finish(vec![main]);
    let program = lower(&tree).unwrap();
    assert_eq!(
        method_body(&program, "Main"),
        &[IrStmt::assign(
            IrExpr::var("s"),
            IrExpr::static_call(
                "StringType",
                "MidStmtStr",
                vec![
                    IrExpr::var("s"),
                    IrExpr::int(2),
                    IrExpr::field(IrExpr::TypeRef(int_type()), "MaxValue"),
                    string("xy"),
                ],
            ),
        )]
    );
}

/// Length of the only bound of `Dim a(bound) As Integer`
/// Lowers `Sub Main` declaring `Dim a(bound) As Integer`
fn lower_with_bound(
    build: impl FnOnce(&mut Fixture) -> vb_syntax::NodeId,
) -> Result<IrProgram, LowerError> {
    let mut f = Fixture::new();
    let bound = build(&mut f);
    let dim = f.dim_array("a", vec![bound], IntrinsicType::Integer);
    let main = f.sub("Main", vec![dim]);
    let tree = f.finish(vec![main]);
    lower(&tree)
}

fn declared_length(build: impl FnOnce(&mut Fixture) -> vb_syntax::NodeId) -> IrExpr {
    let program = lower_with_bound(build).unwrap();
    match &method_body(&program, "Main")[0] {
        IrStmt::Declare {
            init: Some(IrExpr::ArrayCreate { lengths, .. }),
            ..
        } => lengths[0].clone(),
        other => panic!("expected an array declaration, got {other:?}"),
    }
}

#[test]
fn test_range_bounds() {
    let literal = declared_length(|f| {
        let one = f.int(1);
        let five = f.int(5);
        f.binary(OperatorKind::To, one, five)
    });
    assert_eq!(literal, IrExpr::int(5));

    let computed = declared_length(|f| {
        let lo = f.name("lo");
        let hi = f.name("hi");
        f.binary(OperatorKind::To, lo, hi)
    });
    assert_eq!(
        computed,
        IrExpr::binary(
            BinaryOp::Add,
            IrExpr::binary(BinaryOp::Subtract, IrExpr::var("hi"), IrExpr::var("lo")),
            IrExpr::int(1)
        )
    );

    let upper = declared_length(|f| f.name("n"));
    assert_eq!(
        upper,
        IrExpr::binary(BinaryOp::Add, IrExpr::var("n"), IrExpr::int(1))
    );
}

#[test]
fn test_literal_bound_overflow_is_malformed() {
    assert!(matches!(
        lower_with_bound(|f| f.int(i64::MAX)),
        Err(LowerError::MalformedTree { .. })
    ));
    assert!(matches!(
        lower_with_bound(|f| {
            let lo = f.int(-i64::MAX);
            let hi = f.int(i64::MAX);
            f.binary(OperatorKind::To, lo, hi)
        }),
        Err(LowerError::MalformedTree { .. })
    ));

    let unfolded = declared_length(|f| {
        let min = f.int(i64::MIN);
        f.unary(OperatorKind::Negate, min)
    });
    assert!(matches!(
        unfolded,
        IrExpr::Binary {
            op: BinaryOp::Add,
            ..
        }
    ));
}

#[test]
fn test_range_outside_array_bound_is_unsupported() {
    let mut f = Fixture::new();
    let one = f.int(1);
    let five = f.int(5);
    let range = f.binary(OperatorKind::To, one, five);
    let assign = f.set("y", range);
    let main = f.sub("Main", vec![assign]);
    let tree = f.finish(vec![main]);
    assert_eq!(
        unsupported_kind(lower(&tree).unwrap_err()),
        NodeKind::BinaryOperatorExpression
    );

    let mut f = Fixture::new();
    let lo = f.name("lo");
    let hi = f.name("hi");
    let range = f.binary(OperatorKind::To, lo, hi);
    let target = f.name("a");
    let operand = f.call(target, vec![range]);
    let redim = f.redim(false, vec![operand]);
    let main = f.sub("Main", vec![redim]);
    let tree = f.finish(vec![main]);
    assert_eq!(
        unsupported_kind(lower(&tree).unwrap_err()),
        NodeKind::BinaryOperatorExpression
    );
}

#[test]
fn test_call_or_index_follows_declaration() {
    let mut f = Fixture::new();
    let three = f.int(3);
    let dim = f.dim_array("values", vec![three], IntrinsicType::Integer);
    let values = f.name("values");
    let one = f.int(1);
    let element = f.call(values, vec![one]);
    let read = f.set("y", element);
    let compute = f.name("Compute");
    let one = f.int(1);
    let call = f.call(compute, vec![one]);
    let invoke = f.set("z", call);
    let main = f.sub("Main", vec![dim, read, invoke]);
    let tree = f.finish(vec![main]);
    let program = lower(&tree).unwrap();
    let body = method_body(&program, "Main");
    assert_eq!(
        body[1],
        IrStmt::assign(
            IrExpr::var("y"),
            IrExpr::Index {
                target: Box::new(IrExpr::var("values")),
                indices: vec![IrExpr::int(1)],
            }
        )
    );
    assert_eq!(
        body[2],
        IrStmt::assign(
            IrExpr::var("z"),
            IrExpr::Invoke {
                target: None,
                method: "Compute".to_owned(),
                args: vec![IrExpr::int(1)],
            }
        )
    );
}

#[test]
fn test_single_type_block_becomes_program_type() {
    let mut f = Fixture::new();
    let option = f.option(OptionKind::Explicit(true));
    let main = f.sub("Main", Vec::new());
    let module = f.module("Program", vec![main]);
    let tree = f.finish(vec![option, module]);
    let program = lower(&tree).unwrap();
    assert_eq!(program.ty.name, "Program");
    assert_eq!(program.ty.kind, TypeKind::Module);
    assert_eq!(program.options.explicit, Some(true));
    assert!(program.ty.method("Main").is_some());

    let mut f = Fixture::new();
    let first = f.module("First", Vec::new());
    let second = f.module("Second", Vec::new());
    let tree = f.finish(vec![first, second]);
    let program = lower(&tree).unwrap();
    assert_eq!(program.ty.name, "Module1");
    assert_eq!(program.ty.members.len(), 2);
    assert!(program
        .ty
        .members
        .iter()
        .all(|member| matches!(member, IrMember::Type(ty) if ty.kind == TypeKind::Module)));
}

#[test]
fn test_statement_comments_follow_options() {
    let build = || {
        let mut f = Fixture::new();
        let target = f.name("total");
        let zero = f.int(0);
        let reset = f.commented(
            NodeKind::AssignmentStatement,
            Stmt::Assignment {
                target,
                source: zero,
            },
            " start over",
        );
        let main = f.sub("Main", vec![reset]);
        f.finish(vec![main])
    };
    let reset = IrStmt::assign(IrExpr::var("total"), IrExpr::int(0));

    let program = lower(&build()).unwrap();
    assert_eq!(
        method_body(&program, "Main"),
        &[IrStmt::Comment(" start over".to_owned()), reset.clone()]
    );

    let options = LowerOptions {
        emit_comments: false,
        ..LowerOptions::default()
    };
    let program = lower_file(&build(), &options).unwrap();
    assert_eq!(method_body(&program, "Main"), &[reset]);
}

#[test]
fn test_for_each_drives_an_enumerator() {
    let mut f = Fixture::new();
    let dim = f.dim("item", IntrinsicType::String);
    let control = f.name("item");
    let collection = f.name("names");
    let each = f.node(
        NodeKind::ForEachBlockStatement,
        Stmt::ForEachBlock {
            control,
            declarator: None,
            collection,
            statements: None,
            next: None,
        },
    );
    let main = f.sub("Main", vec![dim, each]);
    let tree = f.finish(vec![main]);
    let program = lower(&tree).unwrap();
    let text = IrType::Primitive(PrimitiveType::String);
    assert_eq!(
        method_body(&program, "Main")[1],
        IrStmt::Iteration {
            init: Some(Box::new(IrStmt::declare(
                "enumerator",
                IrType::named("System.Collections.IEnumerator"),
                Some(IrExpr::call(IrExpr::var("names"), "GetEnumerator", Vec::new())),
            ))),
            test: IrExpr::call(IrExpr::var("enumerator"), "MoveNext", Vec::new()),
            increment: None,
            body: vec![IrStmt::assign(
                IrExpr::var("item"),
                IrExpr::Cast {
                    kind: vb_ir::CastKind::Convert,
                    ty: text,
                    expr: Box::new(IrExpr::field(IrExpr::var("enumerator"), "Current")),
                },
            )],
        }
    );
}

#[test]
fn test_with_block_qualifies_members() {
    let mut f = Fixture::new();
    let count = f.member(None, "Count");
    let one = f.int(1);
    let set_count = f.assign(count, one);
    let total = f.member(None, "Total");
    let current = f.member(None, "Count");
    let two = f.int(2);
    let sum = f.binary(OperatorKind::Plus, current, two);
    let set_total = f.assign(total, sum);
    let inner_target = f.member(None, "Inner");
    let value = f.member(None, "Value");
    let three = f.int(3);
    let set_value = f.assign(value, three);
    let inner = f.with_block(inner_target, vec![set_value]);
    let target = f.name("outer");
    let with = f.with_block(target, vec![set_count, set_total, inner]);
    let main = f.sub("Main", vec![with]);
    let tree = f.finish(vec![main]);
    let program = lower(&tree).unwrap();
    let outer = || IrExpr::var("outer");
    assert_eq!(
        method_body(&program, "Main"),
        &[
            IrStmt::assign(IrExpr::field(outer(), "Count"), IrExpr::int(1)),
            IrStmt::assign(
                IrExpr::field(outer(), "Total"),
                IrExpr::binary(
                    BinaryOp::Add,
                    IrExpr::field(outer(), "Count"),
                    IrExpr::int(2)
                )
            ),
            IrStmt::assign(
                IrExpr::field(IrExpr::field(outer(), "Inner"), "Value"),
                IrExpr::int(3)
            ),
        ]
    );
}

#[test]
fn test_member_access_outside_with_is_malformed() {
    let mut f = Fixture::new();
    let count = f.member(None, "Count");
    let one = f.int(1);
    let assign = f.assign(count, one);
    let main = f.sub("Main", vec![assign]);
    let tree = f.finish(vec![main]);
    assert!(matches!(
        lower(&tree),
        Err(LowerError::MalformedTree { .. })
    ));
}

#[test]
fn test_property_getter_shadow_and_exit() {
    let mut f = Fixture::new();
    let seven = f.int(7);
    let assign = f.set("Answer", seven);
    let exit = f.exit(BlockType::Property);
    let answer = f.property("Answer", IntrinsicType::Integer, vec![assign, exit]);
    let exit = f.exit(BlockType::Property);
    let zero = f.property("Zero", IntrinsicType::Integer, vec![exit]);
    let tree = f.finish(vec![answer, zero]);
    let program = lower(&tree).unwrap();
    let getter = |name: &str| {
        program
            .ty
            .members
            .iter()
            .find_map(|member| match member {
                IrMember::Property(property) if property.name == name => Some(property),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no property {name}"))
    };
    let answer = getter("Answer");
    assert_eq!(answer.ty, int_type());
    assert!(answer.is_static);
    assert_eq!(answer.setter, None);
    assert_eq!(
        answer.getter.as_deref(),
        Some(
            &[
                IrStmt::declare("AnswerResult", int_type(), Some(IrExpr::int(0))),
                IrStmt::assign(IrExpr::var("AnswerResult"), IrExpr::int(7)),
                IrStmt::Return(Some(IrExpr::var("AnswerResult"))),
                IrStmt::Return(Some(IrExpr::var("AnswerResult"))),
            ][..]
        )
    );
    assert_eq!(
        getter("Zero").getter.as_deref(),
        Some(&[IrStmt::Return(Some(IrExpr::int(0)))][..])
    );
}

#[test]
fn test_compound_assignment_expands() {
    let mut f = Fixture::new();
    let target = f.name("x");
    let two = f.int(2);
    let square = f.compound(OperatorKind::Power, target, two);
    let target = f.name("s");
    let suffix = f.string("!");
    let append = f.compound(OperatorKind::Concatenate, target, suffix);
    let main = f.sub("Main", vec![square, append]);
    let tree = f.finish(vec![main]);
    let program = lower(&tree).unwrap();
    assert_eq!(
        method_body(&program, "Main"),
        &[
            IrStmt::assign(
                IrExpr::var("x"),
                IrExpr::static_call("Math", "Pow", vec![IrExpr::var("x"), IrExpr::int(2)])
            ),
            IrStmt::assign(
                IrExpr::var("s"),
                IrExpr::static_call("String", "Concat", vec![IrExpr::var("s"), string("!")])
            ),
        ]
    );
}

#[test]
fn test_select_evaluates_computed_selector_once() {
    let mut f = Fixture::new();
    let source = f.name("NextToken");
    let subject = f.call(source, Vec::new());
    let one = f.int(1);
    let first = f.case_is(None, one);
    let hit = f.string("one");
    let on_one = f.set("seen", hit);
    let two = f.int(2);
    let second = f.case_is(Some(OperatorKind::GreaterThanEquals), two);
    let hit = f.string("more");
    let on_more = f.set("seen", hit);
    let select = f.select(
        subject,
        vec![(vec![first], vec![on_one]), (vec![second], vec![on_more])],
        None,
    );
    let main = f.sub("Main", vec![select]);
    let tree = f.finish(vec![main]);
    let program = lower(&tree).unwrap();
    let selected = || IrExpr::var("selected");
    assert_eq!(
        method_body(&program, "Main"),
        &[
            IrStmt::declare(
                "selected",
                IrType::OBJECT,
                Some(IrExpr::Invoke {
                    target: None,
                    method: "NextToken".to_owned(),
                    args: Vec::new(),
                })
            ),
            IrStmt::Conditional {
                condition: IrExpr::binary(BinaryOp::Equal, selected(), IrExpr::int(1)),
                then_body: vec![IrStmt::assign(IrExpr::var("seen"), string("one"))],
                else_body: vec![IrStmt::Conditional {
                    condition: IrExpr::binary(BinaryOp::GreaterEqual, selected(), IrExpr::int(2)),
                    then_body: vec![IrStmt::assign(IrExpr::var("seen"), string("more"))],
                    else_body: Vec::new(),
                }],
            },
        ]
    );
}
