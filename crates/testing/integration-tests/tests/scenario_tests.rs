//! Lowered bodies run through the reference interpreter
//!
//! Each scenario builds a `Sub Main`, lowers it and checks the locals the
//! body leaves behind.

use integration_tests::interpreter::{Interpreter, Value};
use integration_tests::{lower, method_body, Fixture};
use vb_syntax::token::{BlockType, IntrinsicType, ModifierKind, OperatorKind};
use vb_syntax::NodeId;

/// Runs `Sub Main` built from `statements` and returns the interpreter
fn run(mut f: Fixture, statements: Vec<NodeId>) -> Interpreter {
    let main = f.sub("Main", statements);
    let tree = f.finish(vec![main]);
    let program = lower(&tree).unwrap();
    let mut interpreter = Interpreter::new();
    interpreter.run(method_body(&program, "Main")).unwrap();
    interpreter
}

/// `Dim name As Integer = value`
fn initialized(f: &mut Fixture, name: &str, value: i64) -> NodeId {
    let variable = f.variable_name(name);
    let ty = f.intrinsic(IntrinsicType::Integer);
    let value = f.int(value);
    let declarator = f.declarator(vec![variable], Some(ty), Some(value));
    f.local(ModifierKind::Dim, vec![declarator])
}

/// `Dim name As String = text`
fn text_local(f: &mut Fixture, name: &str, text: &str) -> NodeId {
    let variable = f.variable_name(name);
    let ty = f.intrinsic(IntrinsicType::String);
    let value = f.string(text);
    let declarator = f.declarator(vec![variable], Some(ty), Some(value));
    f.local(ModifierKind::Dim, vec![declarator])
}

/// `name = name + amount`
fn bump(f: &mut Fixture, name: &str, amount: NodeId) -> NodeId {
    let current = f.name(name);
    let sum = f.binary(OperatorKind::Plus, current, amount);
    f.set(name, sum)
}

/// `x < limit`
fn below(f: &mut Fixture, name: &str, limit: i64) -> NodeId {
    let current = f.name(name);
    let limit = f.int(limit);
    f.binary(OperatorKind::LessThan, current, limit)
}

#[test]
fn test_pre_test_do_may_run_zero_times() {
    let mut f = Fixture::new();
    let x = initialized(&mut f, "x", 5);
    let passes = f.dim("passes", IntrinsicType::Integer);
    let one = f.int(1);
    let body = bump(&mut f, "passes", one);
    let test = below(&mut f, "x", 5);
    let loop_ = f.do_loop(Some((true, test)), None, vec![body]);
    let interpreter = run(f, vec![x, passes, loop_]);
    assert_eq!(interpreter.local("passes"), Some(&Value::Int(0)));
}

#[test]
fn test_post_test_do_runs_at_least_once() {
    let mut f = Fixture::new();
    let x = initialized(&mut f, "x", 5);
    let passes = f.dim("passes", IntrinsicType::Integer);
    let one = f.int(1);
    let body = bump(&mut f, "passes", one);
    let test = below(&mut f, "x", 5);
    let loop_ = f.do_loop(None, Some((true, test)), vec![body]);
    let interpreter = run(f, vec![x, passes, loop_]);
    assert_eq!(interpreter.local("passes"), Some(&Value::Int(1)));
}

#[test]
fn test_do_until_stops_when_condition_holds() {
    let mut f = Fixture::new();
    let x = initialized(&mut f, "x", 0);
    let one = f.int(1);
    let body = bump(&mut f, "x", one);
    let current = f.name("x");
    let limit = f.int(3);
    let reached = f.binary(OperatorKind::GreaterThanEquals, current, limit);
    let loop_ = f.do_loop(Some((false, reached)), None, vec![body]);
    let interpreter = run(f, vec![x, loop_]);
    assert_eq!(interpreter.local("x"), Some(&Value::Int(3)));
}

#[test]
fn test_for_accumulates_with_and_without_step() {
    let mut f = Fixture::new();
    let i = f.dim("i", IntrinsicType::Integer);
    let sum = f.dim("sum", IntrinsicType::Integer);
    let value = f.name("i");
    let body = bump(&mut f, "sum", value);
    let one = f.int(1);
    let four = f.int(4);
    let each = f.for_block("i", one, four, None, vec![body]);
    let interpreter = run(f, vec![i, sum, each]);
    assert_eq!(interpreter.local("sum"), Some(&Value::Int(10)));
    assert_eq!(interpreter.local("i"), Some(&Value::Int(5)));

    let mut f = Fixture::new();
    let i = f.dim("i", IntrinsicType::Integer);
    let sum = f.dim("sum", IntrinsicType::Integer);
    let value = f.name("i");
    let body = bump(&mut f, "sum", value);
    let one = f.int(1);
    let nine = f.int(9);
    let two = f.int(2);
    let each = f.for_block("i", one, nine, Some(two), vec![body]);
    let interpreter = run(f, vec![i, sum, each]);
    assert_eq!(interpreter.local("sum"), Some(&Value::Int(25)));
}

#[test]
fn test_exit_for_leaves_loop() {
    let mut f = Fixture::new();
    let i = f.dim("i", IntrinsicType::Integer);
    let sum = f.dim("sum", IntrinsicType::Integer);
    let current = f.name("i");
    let three = f.int(3);
    let past = f.binary(OperatorKind::GreaterThan, current, three);
    let exit = f.exit(BlockType::For);
    let guard = f.if_block(past, vec![exit], None);
    let value = f.name("i");
    let body = bump(&mut f, "sum", value);
    let one = f.int(1);
    let ten = f.int(10);
    let each = f.for_block("i", one, ten, None, vec![guard, body]);
    let interpreter = run(f, vec![i, sum, each]);
    assert_eq!(interpreter.local("sum"), Some(&Value::Int(6)));
    assert_eq!(interpreter.local("i"), Some(&Value::Int(4)));
}

/// `Select Case x` with `Case 1 To 10`, `Case 5` and `Case Else`, each
/// recording which branch ran
fn select_branch(x: i64) -> Value {
    let mut f = Fixture::new();
    let declaration = initialized(&mut f, "x", x);
    let result = text_local(&mut f, "branch", "");
    let subject = f.name("x");
    let lower = f.int(1);
    let upper = f.int(10);
    let range = f.case_range(lower, upper);
    let label = f.string("range");
    let in_range = f.set("branch", label);
    let five = f.int(5);
    let exact = f.case_is(None, five);
    let label = f.string("five");
    let is_five = f.set("branch", label);
    let label = f.string("other");
    let otherwise = f.set("branch", label);
    let select = f.select(
        subject,
        vec![(vec![range], vec![in_range]), (vec![exact], vec![is_five])],
        Some(vec![otherwise]),
    );
    let interpreter = run(f, vec![declaration, result, select]);
    interpreter.local("branch").cloned().unwrap()
}

#[test]
fn test_select_takes_first_matching_case() {
    assert_eq!(select_branch(5), Value::String("range".to_owned()));
    assert_eq!(select_branch(50), Value::String("other".to_owned()));
}

#[test]
fn test_power_yields_float() {
    let mut f = Fixture::new();
    let x = initialized(&mut f, "x", 3);
    let base = f.name("x");
    let two = f.int(2);
    let power = f.binary(OperatorKind::Power, base, two);
    let square = f.set("x", power);
    let interpreter = run(f, vec![x, square]);
    assert_eq!(interpreter.local("x"), Some(&Value::Float(9.0)));
}

#[test]
fn test_string_concatenation() {
    let mut f = Fixture::new();
    let left = f.string("legacy ");
    let right = f.string("basic");
    let joined = f.binary(OperatorKind::Concatenate, left, right);
    let variable = f.variable_name("text");
    let ty = f.intrinsic(IntrinsicType::String);
    let declarator = f.declarator(vec![variable], Some(ty), Some(joined));
    let text = f.local(ModifierKind::Dim, vec![declarator]);
    let interpreter = run(f, vec![text]);
    assert_eq!(
        interpreter.local("text"),
        Some(&Value::String("legacy basic".to_owned()))
    );
}
