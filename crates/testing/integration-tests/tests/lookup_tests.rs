//! Structural name lookup from references to declarators

use integration_tests::Fixture;
use vb_syntax::lookup::{
    call_or_index_declarator, control_variable_declarator, redim_declarators, resolve_declarator,
};
use vb_syntax::token::{IntrinsicType, ModifierKind, OperatorKind};
use vb_syntax::{NodeId, NodeKind, Stmt};

/// `Dim name As Integer`, returning the statement and its declarator
fn dim(f: &mut Fixture, name: &str) -> (NodeId, NodeId) {
    let variable = f.variable_name(name);
    let ty = f.intrinsic(IntrinsicType::Integer);
    let declarator = f.declarator(vec![variable], Some(ty), None);
    (f.local(ModifierKind::Dim, vec![declarator]), declarator)
}

#[test]
fn test_for_control_resolves_to_preceding_dim() {
    let mut f = Fixture::new();
    let (declaration, declarator) = dim(&mut f, "x");
    let one = f.int(1);
    let three = f.int(3);
    let each = f.for_block("x", one, three, None, Vec::new());
    let main = f.sub("Main", vec![declaration, each]);
    let tree = f.finish(vec![main]);
    assert_eq!(control_variable_declarator(&tree, each), Some(declarator));
}

#[test]
fn test_qualified_control_never_resolves() {
    let mut f = Fixture::new();
    let (declaration, _) = dim(&mut f, "x");
    let obj = f.name("obj");
    let control = f.member(Some(obj), "x");
    let lower = f.int(1);
    let upper = f.int(3);
    let each = f.node(
        NodeKind::ForBlockStatement,
        Stmt::ForBlock {
            control,
            declarator: None,
            lower,
            upper,
            step: None,
            statements: None,
            next: None,
        },
    );
    let main = f.sub("Main", vec![declaration, each]);
    let tree = f.finish(vec![main]);
    assert_eq!(control_variable_declarator(&tree, each), None);
    assert_eq!(resolve_declarator(&tree, control), None);
}

#[test]
fn test_nearest_scope_wins() {
    let mut f = Fixture::new();
    let (outer, _) = dim(&mut f, "x");
    let (inner, inner_declarator) = dim(&mut f, "x");
    let reference = f.name("x");
    let one = f.int(1);
    let increment = f.binary(OperatorKind::Plus, reference, one);
    let assign = f.set("y", increment);
    let condition = f.boolean(true);
    let branch = f.if_block(condition, vec![inner, assign], None);
    let main = f.sub("Main", vec![outer, branch]);
    let tree = f.finish(vec![main]);
    assert_eq!(resolve_declarator(&tree, reference), Some(inner_declarator));
}

#[test]
fn test_lookup_is_case_sensitive() {
    let mut f = Fixture::new();
    let (declaration, _) = dim(&mut f, "total");
    let reference = f.name("Total");
    let read = f.set("y", reference);
    let main = f.sub("Main", vec![declaration, read]);
    let tree = f.finish(vec![main]);
    assert_eq!(resolve_declarator(&tree, reference), None);
}

#[test]
fn test_call_or_index_resolves_array_declarator() {
    let mut f = Fixture::new();
    let five = f.int(5);
    let variable = f.array_name("values", vec![five]);
    let ty = f.intrinsic(IntrinsicType::Integer);
    let declarator = f.declarator(vec![variable], Some(ty), None);
    let declaration = f.local(ModifierKind::Dim, vec![declarator]);
    let target = f.name("values");
    let two = f.int(2);
    let element = f.call(target, vec![two]);
    let read = f.set("y", element);
    let main = f.sub("Main", vec![declaration, read]);
    let tree = f.finish(vec![main]);
    assert_eq!(call_or_index_declarator(&tree, element), Some(declarator));
}

#[test]
fn test_redim_operands_resolve_in_order() {
    let mut f = Fixture::new();
    let (declaration, declarator) = dim(&mut f, "known");
    let known = f.name("known");
    let ten = f.int(10);
    let first = f.call(known, vec![ten]);
    let unknown = f.name("unknown");
    let two = f.int(2);
    let second = f.call(unknown, vec![two]);
    let redim = f.redim(false, vec![first, second]);
    let main = f.sub("Main", vec![declaration, redim]);
    let tree = f.finish(vec![main]);
    assert_eq!(redim_declarators(&tree, redim), vec![Some(declarator), None]);
}

#[test]
fn test_fields_are_visible_from_methods() {
    let mut f = Fixture::new();
    let variable = f.variable_name("count");
    let declarator = f.declarator(vec![variable], None, None);
    let declarators = f.list(NodeKind::VariableDeclaratorCollection, vec![declarator]);
    let list = f.node(
        NodeKind::VariableListDeclaration,
        vb_syntax::Decl::VariableList {
            header: vb_syntax::DeclHeader::default(),
            declarators,
        },
    );
    let reference = f.name("count");
    let read = f.set("y", reference);
    let main = f.sub("Main", vec![read]);
    let module = f.module("Counter", vec![list, main]);
    let tree = f.finish(vec![module]);
    assert_eq!(resolve_declarator(&tree, reference), Some(declarator));
}
