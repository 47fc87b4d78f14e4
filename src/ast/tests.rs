use std::sync::Arc;

use super::*;
use crate::base::FileId;

fn document(source: &str) -> Arc<Document> {
    Document::new(FileId::new(1), "file:///test.pkl", 1, source)
}

/// Parses `source`, which must be free of syntax errors
fn valid_document(source: &str) -> Arc<Document> {
    let doc = document(source);
    assert!(doc.errors().is_empty(), "{:?}", doc.errors());
    doc
}

fn find(doc: &Arc<Document>, kind: NodeKind) -> Node {
    doc.root()
        .descendants()
        .into_iter()
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind:?} node"))
}

#[test]
fn test_ast_tree_integrity() {
    let doc = valid_document(
        r#"
        import "other.pkl"
        class Foo extends Bar { x: Int = let (y = 1) y + 2 }
        res = new Listing { for (k, v in m) { v } when (true) { 1 } else { 2 } }
        "#,
    );
    for node in doc.root().descendants() {
        let children = node.children();
        for child in &children {
            assert_eq!(child.parent().as_ref(), Some(&node));
            assert_eq!(children.iter().filter(|c| *c == child).count(), 1);
        }
    }
    assert!(doc.root().parent().is_none());
    assert_eq!(Module::cast(doc.root()).unwrap().imports().len(), 1);
}

#[test]
fn test_ast_children_are_memoized() {
    let doc = valid_document("a = 1\nb = 2");
    let first = doc.root().children();
    let count = doc.node_count();
    let second = doc.root().children();
    assert_eq!(first, second);
    assert_eq!(doc.node_count(), count);
}

#[test]
fn test_ast_children_built_concurrently_are_shared() {
    let doc = document("a = 1\nb = 2\nc = 3");
    let root = doc.root();
    let results: Vec<Vec<Node>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| root.children()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(doc.node_count(), 4);
}

#[test]
fn test_ast_module_header_and_imports() {
    let doc = valid_document(
        "module com.example.Config\namends \"base.pkl\"\nimport \"lib/util.pkl\"\nimport \"pkl:json\" as j\n",
    );
    let module = Module::cast(doc.root()).unwrap();
    assert_eq!(module.name().as_deref(), Some("com.example.Config"));
    assert!(module.is_amend());
    let clause = module.extends_amends().unwrap();
    assert_eq!(clause.uri().unwrap().value().as_deref(), Some("base.pkl"));

    let names: Vec<_> = module
        .imports()
        .iter()
        .filter_map(|i| i.binding_name())
        .collect();
    assert_eq!(names, vec!["util", "j"]);
}

#[test]
fn test_ast_class_members() {
    let doc = valid_document(
        "abstract class Shape<out T> extends Base {\n  hidden name: String\n  function area(scale: Float): Float = 0.0\n}",
    );
    let class = Class::cast(find(&doc, NodeKind::Class)).unwrap();
    assert_eq!(class.name().unwrap(), "Shape");
    assert!(class.is_abstract());
    assert!(!class.is_open());

    let params = class.type_parameters();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].variance(), Variance::Covariant);

    let supertype = class.supertype().unwrap();
    let declared = DeclaredType::cast_ref(supertype.node()).unwrap();
    assert_eq!(declared.name().unwrap().text(), "Base");

    let props = class.properties();
    assert_eq!(props.len(), 1);
    assert!(props[0].is_hidden());
    assert_eq!(props[0].name().unwrap(), "name");

    let methods = class.methods();
    assert_eq!(methods[0].name().unwrap(), "area");
    assert_eq!(methods[0].parameters()[0].name().as_deref(), Some("scale"));
    assert!(methods[0].return_type().is_some());
}

#[test]
fn test_ast_binary_operands() {
    let doc = valid_document("x = a ?? b");
    let binary = BinaryExpr::cast(find(&doc, NodeKind::NullCoalesceExpr)).unwrap();
    assert_eq!(binary.left().unwrap().node().text(), "a");
    assert_eq!(binary.right().unwrap().node().text(), "b");
    assert_eq!(binary.operator().unwrap().text, "??");
}

#[test]
fn test_ast_let_slots() {
    let doc = valid_document("x = let (y = 1 + 1) y * 2");
    let let_expr = LetExpr::cast(find(&doc, NodeKind::LetExpr)).unwrap();
    assert_eq!(let_expr.parameter().unwrap().name().as_deref(), Some("y"));
    assert_eq!(let_expr.var_expr().unwrap().node().text(), "1 + 1");
    assert_eq!(let_expr.body().unwrap().node().text(), "y * 2");
}

#[test]
fn test_ast_missing_required_child_is_structured_error() {
    let doc = document("x = 1 +");
    let binary = BinaryExpr::cast(find(&doc, NodeKind::AdditiveExpr)).unwrap();
    match binary.right() {
        Err(AstError::MissingChild { kind, slot, .. }) => {
            assert_eq!(kind, NodeKind::AdditiveExpr);
            assert_eq!(slot, "right operand");
        }
        other => panic!("expected missing child, got {other:?}"),
    }
}

#[test]
fn test_ast_string_value() {
    let doc = valid_document(r#"x = "a\tb\u{41}""#);
    let literal = StringLiteral::cast(find(&doc, NodeKind::StringLiteral)).unwrap();
    assert_eq!(literal.value().as_deref(), Some("a\tbA"));

    let doc = valid_document(r#"x = "a\(y)b""#);
    let literal = StringLiteral::cast(find(&doc, NodeKind::StringLiteral)).unwrap();
    assert_eq!(literal.value(), None);
    assert_eq!(literal.parts().len(), 1);
}

#[test]
fn test_ast_closing_delimiter_missing() {
    let doc = document("x = (1 + 2\ny = 3");
    let paren = find(&doc, NodeKind::ParenthesizedExpr);
    assert_eq!(paren.check_closing_delimiter(), Some(")"));

    let doc = document("x = foo[1\ny = 3");
    let subscript = find(&doc, NodeKind::SubscriptExpr);
    assert_eq!(subscript.check_closing_delimiter(), Some("]"));
}

#[test]
fn test_ast_closing_delimiter_present() {
    let doc = valid_document("x = (1 + 2)");
    let paren = find(&doc, NodeKind::ParenthesizedExpr);
    assert_eq!(paren.check_closing_delimiter(), None);
}

#[test]
fn test_ast_closing_delimiter_suppressed_by_captured_error() {
    // The right operand carries a captured parse error
    let doc = document("x = 1 + (2 3");
    let paren = find(&doc, NodeKind::ParenthesizedExpr);
    assert!(paren.has_error());
    assert_eq!(paren.check_closing_delimiter(), None);
}

#[test]
fn test_ast_argument_list_missing_comma() {
    let doc = document("x = f(1 2)");
    let args = find(&doc, NodeKind::ArgumentList);
    assert_eq!(args.check_closing_delimiter(), Some(","));

    let doc = document("x = f(1, 2)");
    let args = find(&doc, NodeKind::ArgumentList);
    assert_eq!(args.check_closing_delimiter(), None);
}

struct KindCounter {
    exprs: usize,
    types: usize,
    classes: usize,
}

impl Visitor for KindCounter {
    type Output = ();

    fn visit_node(&mut self, _node: &Node) {}

    fn visit_expr(&mut self, _node: &Node) {
        self.exprs += 1;
    }

    fn visit_type(&mut self, _node: &Node) {
        self.types += 1;
    }

    fn visit_class(&mut self, _node: &Node) {
        self.classes += 1;
    }
}

#[test]
fn test_ast_visitor_dispatches_once_per_node() {
    let doc = valid_document("class A { x: Int = 1 + 2 }");
    let mut counter = KindCounter {
        exprs: 0,
        types: 0,
        classes: 0,
    };
    for node in doc.root().descendants() {
        node.accept(&mut counter);
    }
    assert_eq!(counter.classes, 1);
    assert_eq!(counter.types, 1);
    assert_eq!(counter.exprs, 3);
}

#[test]
fn test_ast_node_at_offset_finds_deepest() {
    let source = "x = foo.bar";
    let doc = valid_document(source);
    let offset = crate::base::TextSize::new(source.find("bar").unwrap() as u32 + 1);
    let node = doc.root().node_at_offset(offset).unwrap();
    assert_eq!(node.kind(), NodeKind::QualifiedAccessExpr);
}

#[test]
fn test_ast_doc_comment() {
    let doc = valid_document("/// The answer\nanswer = 42");
    let property = find(&doc, NodeKind::ClassProperty);
    assert_eq!(property.doc_comment().as_deref(), Some("The answer"));
}
