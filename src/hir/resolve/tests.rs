use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use super::*;
use crate::ast::{Class, Document, NodeKind};
use crate::base::{FileId, TextSize};
use crate::hir::{BaseModule, Context};

fn context() -> Context {
    let base = BaseModule::new().expect("bundled base module loads");
    Context::new(Arc::new(base))
}

fn document(uri: &str, source: &str) -> Arc<Document> {
    static NEXT_FILE: AtomicU32 = AtomicU32::new(1);
    Document::new(FileId::new(NEXT_FILE.fetch_add(1, Ordering::Relaxed)), uri, 1, source)
}

/// Innermost access expression covering the last character of the `nth`
/// occurrence of `needle`
fn access_at(doc: &Arc<Document>, needle: &str, nth: usize) -> Node {
    let offset = doc
        .text()
        .match_indices(needle)
        .nth(nth)
        .map(|(i, _)| i + needle.len() - 1)
        .unwrap_or_else(|| panic!("no occurrence {nth} of {needle:?}"));
    let node = doc
        .root()
        .node_at_offset(TextSize::from(offset as u32))
        .expect("offset inside document");
    std::iter::once(node.clone())
        .chain(node.ancestors())
        .find(|n| access_name(n).is_some())
        .unwrap_or_else(|| panic!("no access expression at {needle:?}"))
}

fn enclosing(node: &Node, kind: NodeKind) -> Option<Node> {
    node.ancestors().find(|a| a.kind() == kind)
}

#[test]
fn test_let_binding_shadows_class_and_module_properties() {
    let doc = document(
        "file:///m.pkl",
        "x = 1\nclass C {\n  x: String = \"a\"\n  y = let (x = true) x\n  z = x\n}\nw = x\n",
    );
    let ctx = context().with_document(doc.clone());

    let in_let = resolve_access(&access_at(&doc, ") x", 0), &ctx).expect("let body x resolves");
    assert_eq!(in_let.node.kind(), NodeKind::Parameter);

    let in_class = resolve_access(&access_at(&doc, "= x", 0), &ctx).expect("class x resolves");
    assert_eq!(in_class.node.kind(), NodeKind::ClassProperty);
    assert!(enclosing(&in_class.node, NodeKind::Class).is_some());

    let in_module = resolve_access(&access_at(&doc, "= x", 1), &ctx).expect("module x resolves");
    assert_eq!(in_module.node.kind(), NodeKind::ClassProperty);
    assert!(enclosing(&in_module.node, NodeKind::Class).is_none());
}

#[test]
fn test_let_variable_not_visible_in_its_own_value() {
    let doc = document("file:///m.pkl", "x = 1\ny = let (x = x) x\n");
    let ctx = context().with_document(doc.clone());

    let bound_value = resolve_access(&access_at(&doc, "(x = x", 0), &ctx).expect("resolves");
    assert_eq!(bound_value.node.kind(), NodeKind::ClassProperty);
}

#[test]
fn test_method_and_property_namespaces_are_separate() {
    let doc = document("file:///m.pkl", "f = 2\nfunction f() = 1\ncall = f()\nprop = f\n");
    let ctx = context().with_document(doc.clone());

    let call = resolve_access(&access_at(&doc, "call = f", 0), &ctx).expect("call resolves");
    assert_eq!(call.node.kind(), NodeKind::ClassMethod);

    let prop = resolve_access(&access_at(&doc, "prop = f", 0), &ctx).expect("property resolves");
    assert_eq!(prop.node.kind(), NodeKind::ClassProperty);
}

#[test]
fn test_base_module_is_consulted_last() {
    let doc = document("file:///m.pkl", "a = pi\nb = List(1, 2)\n");
    let ctx = context().with_document(doc.clone());

    let pi = resolve_access(&access_at(&doc, "pi", 0), &ctx).expect("pi resolves");
    assert!(ctx.base().contains(&pi.node));

    let list = resolve_access(&access_at(&doc, "= List", 0), &ctx).expect("List() resolves");
    assert_eq!(list.node.kind(), NodeKind::ClassMethod);
    assert!(ctx.base().contains(&list.node));
}

#[test]
fn test_qualified_access_through_import() {
    let lib = document("file:///proj/lib.pkl", "answer: Int = 42\nlocal secret = 1\n");
    let main = document(
        "file:///proj/main.pkl",
        "import \"lib.pkl\"\na = lib.answer\nb = lib.secret\n",
    );
    let ctx = context().with_document(lib.clone()).with_document(main.clone());

    let answer = resolve_access(&access_at(&main, "answer", 0), &ctx).expect("answer resolves");
    assert!(Arc::ptr_eq(answer.node.document(), &lib));

    assert!(resolve_access(&access_at(&main, "secret", 0), &ctx).is_none());
}

#[test]
fn test_unqualified_name_finds_import_after_leading_comment() {
    let lib = document("file:///proj/lib.pkl", "answer: Int = 42\n");
    let main = document(
        "file:///proj/main.pkl",
        "// Copyright header\n\nimport \"lib.pkl\"\n\nx = lib\ny = lib.answer\n",
    );
    assert!(main.errors().is_empty(), "{:?}", main.errors());
    let ctx = context().with_document(lib.clone()).with_document(main.clone());

    let import = resolve_access(&access_at(&main, "= lib", 0), &ctx).expect("import resolves");
    assert_eq!(import.node.kind(), NodeKind::ImportClause);
    assert!(Arc::ptr_eq(import.node.document(), &main));

    let answer = resolve_access(&access_at(&main, "answer", 0), &ctx).expect("answer resolves");
    assert!(Arc::ptr_eq(answer.node.document(), &lib));
}

#[test]
fn test_object_body_members_and_receiver() {
    let doc = document(
        "file:///m.pkl",
        "class Person {\n  name: String\n  age: Int\n}\np: Person = new {\n  name = \"x\"\n  age = name.length\n}\n",
    );
    let ctx = context().with_document(doc.clone());

    let name = resolve_access(&access_at(&doc, "age = name", 0), &ctx).expect("name resolves");
    assert_eq!(name.node.kind(), NodeKind::ObjectProperty);

    let length = resolve_access(&access_at(&doc, "length", 0), &ctx).expect("length resolves");
    assert!(ctx.base().contains(&length.node));
}

#[test]
fn test_super_access_finds_superclass_member() {
    let doc = document(
        "file:///m.pkl",
        "open class A { function greet(): String = \"a\" }\nclass B extends A { function greet(): String = super.greet() }\n",
    );
    let ctx = context().with_document(doc.clone());

    let greet = resolve_access(&access_at(&doc, "super.greet", 0), &ctx).expect("super resolves");
    let class = enclosing(&greet.node, NodeKind::Class).and_then(Class::cast).expect("in class");
    assert_eq!(class.name().ok().as_deref(), Some("A"));
}

#[test]
fn test_inherited_members_bind_type_arguments() {
    let doc = document(
        "file:///m.pkl",
        "open class Box<T> { value: T }\nclass IntBox extends Box<Int>\nb: IntBox\nv = b.value\n",
    );
    let ctx = context().with_document(doc.clone());

    let value = resolve_access(&access_at(&doc, "b.value", 0), &ctx).expect("value resolves");
    assert_eq!(value.bindings.len(), 1);
    let bound = value.bindings.values().next().expect("one binding");
    assert_eq!(bound, &ctx.base().int_type());
}

#[test]
fn test_unresolved_name_is_not_an_error() {
    let doc = document("file:///m.pkl", "a = nowhere\nb = \"s\".nope\n");
    let ctx = context().with_document(doc.clone());

    assert!(resolve_access(&access_at(&doc, "nowhere", 0), &ctx).is_none());
    assert!(resolve_access(&access_at(&doc, "nope", 0), &ctx).is_none());
}

#[test]
fn test_collect_all_lists_visible_names_once() {
    let doc = document(
        "file:///m.pkl",
        "x = 1\nclass C {\n  x: Int\n  y = let (z = 1) z\n}\n",
    );
    let ctx = context().with_document(doc.clone());
    let access = access_at(&doc, ") z", 0);

    let all = resolve(&access, None, &TypeParameterBindings::default(), &ctx, CollectAll::new());

    assert!(all.contains_key("z"));
    assert!(all.contains_key("x"));
    assert!(all.contains_key("pi"));
    assert_eq!(all["x"].node.kind(), NodeKind::ClassProperty);
    assert!(enclosing(&all["x"].node, NodeKind::Class).is_some());
}

#[test]
fn test_cancelled_lookup_finds_nothing() {
    let doc = document("file:///m.pkl", "x = 1\ny = x\n");
    let token = tokio_util::sync::CancellationToken::new();
    let ctx = context().with_document(doc.clone()).with_cancellation(token.clone());
    token.cancel();

    assert!(resolve_access(&access_at(&doc, "= x", 0), &ctx).is_none());
}

#[test]
fn test_type_name_resolution() {
    let lib = document("file:///proj/lib.pkl", "class Shape\n");
    let main = document(
        "file:///proj/main.pkl",
        "import \"lib.pkl\"\nclass Local\na: Local\nb: lib.Shape\nc: String\nd: lib.Missing\n",
    );
    let ctx = context().with_document(lib.clone()).with_document(main.clone());
    let names: Vec<_> = main
        .root()
        .descendants()
        .into_iter()
        .filter_map(crate::ast::QualifiedIdent::cast)
        .filter(|q| q.node().parent().is_some_and(|p| p.kind() == NodeKind::DeclaredType))
        .collect();
    assert_eq!(names.len(), 4);

    let local = resolve_type_name(&names[0], &ctx).expect("Local");
    assert!(Arc::ptr_eq(local.document(), &main));
    let shape = resolve_type_name(&names[1], &ctx).expect("lib.Shape");
    assert!(Arc::ptr_eq(shape.document(), &lib));
    let string = resolve_type_name(&names[2], &ctx).expect("String");
    assert!(ctx.base().is_class(&string, "String"));
    assert!(resolve_type_name(&names[3], &ctx).is_none());
}
