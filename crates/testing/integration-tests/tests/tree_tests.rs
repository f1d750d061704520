//! Structural invariants of built trees
//!
//! Parent and child links must agree everywhere, children keep slot order
//! with comments last, and the builder refuses malformed nodes.

use expect_test::expect;
use integration_tests::Fixture;
use vb_span::Span;
use vb_syntax::dump::{dump, DumpOptions};
use vb_syntax::token::{BlockType, IntrinsicType, ModifierKind, OperatorKind};
use vb_syntax::{
    Decl, DeclHeader, NodeData, NodeKind, Stmt, SyntaxError, SyntaxTree, TreeBuilder,
};

/// `Sub Main` with a loop, a branch and a commented assignment
fn sample() -> SyntaxTree {
    let mut f = Fixture::new();
    let dim = f.dim("total", IntrinsicType::Integer);
    let total = f.name("total");
    let i = f.name("i");
    let sum = f.binary(OperatorKind::Plus, total, i);
    let accumulate = f.set("total", sum);
    let one = f.int(1);
    let ten = f.int(10);
    let each = f.for_block("i", one, ten, None, vec![accumulate]);
    let total = f.name("total");
    let limit = f.int(20);
    let condition = f.binary(OperatorKind::GreaterThan, total, limit);
    let exit = f.exit(BlockType::Sub);
    let guard = f.if_block(condition, vec![exit], None);
    let zero = f.int(0);
    let target = f.name("total");
    let reset = f.commented(
        NodeKind::AssignmentStatement,
        Stmt::Assignment {
            target,
            source: zero,
        },
        " start over",
    );
    let main = f.sub("Main", vec![dim, each, guard, reset]);
    let module = f.module("Program", vec![main]);
    f.finish(vec![module])
}

#[test]
fn test_every_child_points_back_to_its_parent() {
    let tree = sample();
    for (id, node) in tree.iter() {
        for &child in node.children() {
            assert_eq!(tree.parent(child), Some(id), "{} under {}", tree.kind(child), node.kind());
        }
        match node.parent() {
            Some(parent) => assert!(tree.children(parent).contains(&id)),
            None => assert_eq!(id, tree.root()),
        }
    }
}

#[test]
fn test_children_are_stable_and_slot_ordered() {
    let tree = sample();
    let assignment = tree
        .iter()
        .find(|(_, node)| node.kind() == NodeKind::AssignmentStatement && !node.comments().is_empty())
        .map(|(id, _)| id)
        .unwrap();
    let Some(Stmt::Assignment { target, source }) = tree.stmt(assignment) else {
        panic!("expected an assignment");
    };
    let comment = tree[assignment].comments()[0];
    assert_eq!(tree.children(assignment), &[*target, *source, comment]);
    assert_eq!(tree.children(assignment), tree.children(assignment));

    let first: Vec<_> = tree.descendants(tree.root()).collect();
    let second: Vec<_> = tree.descendants(tree.root()).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), tree.len());
}

#[test]
fn test_ancestors_end_at_the_file() {
    let tree = sample();
    let exit = tree
        .iter()
        .find(|(_, node)| node.kind() == NodeKind::ExitStatement)
        .map(|(id, _)| id)
        .unwrap();
    let kinds: Vec<NodeKind> = tree.ancestors(exit).map(|id| tree.kind(id)).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::StatementCollection,
            NodeKind::IfBlockStatement,
            NodeKind::StatementCollection,
            NodeKind::SubDeclaration,
            NodeKind::DeclarationCollection,
            NodeKind::ModuleDeclaration,
            NodeKind::DeclarationCollection,
            NodeKind::File,
        ]
    );
    assert_eq!(
        tree.enclosing(exit, |kind| kind == NodeKind::SubDeclaration)
            .map(|id| tree.kind(id)),
        Some(NodeKind::SubDeclaration)
    );
}

#[test]
fn test_empty_collection_cannot_be_built() {
    let mut builder = TreeBuilder::new();
    let result = builder.collection(
        NodeKind::StatementCollection,
        Span::default(),
        Vec::new(),
        Vec::new(),
    );
    assert_eq!(
        result,
        Err(SyntaxError::EmptyCollection {
            kind: NodeKind::StatementCollection
        })
    );
}

#[test]
fn test_end_block_must_close_a_statement_block() {
    let mut builder = TreeBuilder::new();
    let result = builder.alloc(
        NodeKind::EndBlockStatement,
        Span::default(),
        Stmt::EndBlock {
            block: BlockType::Sub,
        },
    );
    assert!(matches!(
        result,
        Err(SyntaxError::InvalidEnumerant { field: "block", .. })
    ));
}

#[test]
fn test_declarator_role_is_derived_from_its_owner() {
    let mut f = Fixture::new();
    let field_name = f.variable_name("count");
    let field = f.declarator(vec![field_name], None, None);
    let fields = f.list(NodeKind::VariableDeclaratorCollection, vec![field]);
    let modifiers = f.modifiers(&[ModifierKind::Private]);
    let list = f.node(
        NodeKind::VariableListDeclaration,
        Decl::VariableList {
            header: DeclHeader {
                attributes: None,
                modifiers: Some(modifiers),
            },
            declarators: fields,
        },
    );
    let local_name = f.variable_name("scratch");
    let local = f.declarator(vec![local_name], None, None);
    let statement = f.local(ModifierKind::Dim, vec![local]);
    let run = f.sub("Run", vec![statement]);
    let module = f.module("Counter", vec![list, run]);
    let tree = f.finish(vec![module]);
    assert!(tree.is_field(field));
    assert!(!tree.is_field(local));
}

#[test]
fn test_constant_expressions() {
    let mut f = Fixture::new();
    let two = f.int(2);
    let three = f.int(3);
    let product = f.binary(OperatorKind::Multiply, two, three);
    let negated = f.unary(OperatorKind::Negate, product);
    let constant = f.parenthesized(negated);
    let x = f.name("x");
    let one = f.int(1);
    let variable = f.binary(OperatorKind::Plus, x, one);
    let both = f.binary(OperatorKind::Minus, constant, variable);
    let tree = f.finish_at(both);
    assert!(tree.is_constant(constant));
    assert!(!tree.is_constant(variable));
    assert!(!tree.is_constant(both));
}

#[test]
fn test_syntax_error_node_fits_any_slot() {
    let mut f = Fixture::new();
    let bad = f.node(NodeKind::SyntaxError, NodeData::SyntaxError);
    let one = f.int(1);
    let sum = f.binary(OperatorKind::Plus, bad, one);
    let tree = f.finish_at(sum);
    assert!(tree.has_bad_nodes());
    assert!(tree[bad].is_bad());
}

#[test]
fn test_xml_dump() {
    let mut f = Fixture::new();
    let zero = f.int(0);
    let reset = f.set("total", zero);
    let stop = f.node(NodeKind::StopStatement, Stmt::Empty);
    let main = f.sub("Main", vec![reset, stop]);
    let tree = f.finish(vec![main]);
    let options = DumpOptions {
        positions: false,
        indent: 2,
    };
    expect![[r#"
        <File>
          <DeclarationCollection>
            <SubDeclaration>
              <SimpleName name="Main" />
              <StatementCollection>
                <AssignmentStatement>
                  <SimpleNameExpression>
                    <SimpleName name="total" />
                  </SimpleNameExpression>
                  <IntegerLiteralExpression value="0" />
                </AssignmentStatement>
                <StopStatement />
              </StatementCollection>
              <EndBlockDeclaration block="Sub" />
            </SubDeclaration>
          </DeclarationCollection>
        </File>
    "#]]
    .assert_eq(&dump(&tree, options));
}
