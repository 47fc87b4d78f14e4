use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use super::*;
use crate::ast::{Document, NodeKind};
use crate::base::{FileId, TextSize};
use crate::hir::{BaseModule, Context};

const CARET: &str = "<|>";

fn document(uri: &str, source: &str) -> Arc<Document> {
    static NEXT_FILE: AtomicU32 = AtomicU32::new(1);
    Document::new(FileId::new(NEXT_FILE.fetch_add(1, Ordering::Relaxed)), uri, 1, source)
}

/// Parse `source` with the caret marker removed; returns the caret offset
fn with_caret(uri: &str, source: &str) -> (Arc<Document>, TextSize) {
    let offset = source.find(CARET).expect("source has a caret");
    let text = source.replacen(CARET, "", 1);
    (document(uri, &text), TextSize::from(offset as u32))
}

fn context(docs: &[&Arc<Document>]) -> Context {
    let base = BaseModule::new().expect("bundled base module loads");
    docs.iter()
        .fold(Context::new(Arc::new(base)), |ctx, doc| ctx.with_document(Arc::clone(doc)))
}

fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|i| &*i.label).collect()
}

// ============================================================================
// Go to definition
// ============================================================================

#[test]
fn test_goto_let_parameter() {
    let (doc, offset) = with_caret("file:///a.pkl", "x = 2\ny = let (x = 1) x<|>\n");
    let ctx = context(&[&doc]);

    let result = goto_definition(&doc, offset, &ctx);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].kind, NodeKind::Parameter);
    assert_eq!(result.targets[0].name.as_deref(), Some("x"));
    assert_eq!(result.targets[0].span.start.line, 1);
}

#[test]
fn test_goto_type_name() {
    let (doc, offset) = with_caret("file:///a.pkl", "class Foo\na: Fo<|>o\n");
    let ctx = context(&[&doc]);

    let result = goto_definition(&doc, offset, &ctx);
    let target = result.targets.first().expect("one target");
    assert_eq!(target.kind, NodeKind::Class);
    assert_eq!(target.name.as_deref(), Some("Foo"));
    assert_eq!(&doc.text()[target.range], "Foo");
}

#[test]
fn test_goto_import_uri_opens_module() {
    let lib = document("file:///proj/lib.pkl", "answer = 42\n");
    let (main, offset) = with_caret("file:///proj/main.pkl", "import \"li<|>b.pkl\"\nx = lib.answer\n");
    let ctx = context(&[&lib, &main]);

    let result = goto_definition(&main, offset, &ctx);
    let target = result.targets.first().expect("one target");
    assert_eq!(target.kind, NodeKind::Module);
    assert_eq!(&*target.uri, "file:///proj/lib.pkl");
}

#[test]
fn test_goto_member_in_other_module() {
    let lib = document("file:///proj/lib.pkl", "answer = 42\n");
    let (main, offset) = with_caret("file:///proj/main.pkl", "import \"lib.pkl\"\nx = lib.ans<|>wer\n");
    let ctx = context(&[&lib, &main]);

    let result = goto_definition(&main, offset, &ctx);
    let target = result.targets.first().expect("one target");
    assert_eq!(target.file, lib.file());
    assert_eq!(target.kind, NodeKind::ClassProperty);
}

#[test]
fn test_goto_declaration_name_is_itself() {
    let (doc, offset) = with_caret("file:///a.pkl", "po<|>rt = 80\n");
    let ctx = context(&[&doc]);

    let result = goto_definition(&doc, offset, &ctx);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].name.as_deref(), Some("port"));
}

#[test]
fn test_goto_unresolved_is_empty() {
    let (doc, offset) = with_caret("file:///a.pkl", "x = nowh<|>ere\n");
    let ctx = context(&[&doc]);
    assert!(goto_definition(&doc, offset, &ctx).is_empty());

    let (doc, offset) = with_caret("file:///a.pkl", "x = 1 +<|> 2\n");
    assert!(goto_definition(&doc, offset, &context(&[&doc])).is_empty());
}

// ============================================================================
// Hover
// ============================================================================

#[test]
fn test_hover_property_with_doc_comment() {
    let (doc, offset) = with_caret("file:///a.pkl", "/// The listening port\nport: Int = 8080\nx = po<|>rt\n");
    let ctx = context(&[&doc]);

    let info = hover(&doc, offset, &ctx).expect("hover");
    assert!(info.contents.starts_with("```pkl\nport: Int\n```"), "{}", info.contents);
    assert!(info.contents.contains("The listening port"));
    assert_eq!(&doc.text()[info.range], "port");
}

#[test]
fn test_hover_inferred_type() {
    let (doc, offset) = with_caret("file:///a.pkl", "name = \"pkl\"\nx = na<|>me.length\n");
    let ctx = context(&[&doc]);

    let info = hover(&doc, offset, &ctx).expect("hover");
    assert!(info.contents.contains("name: String"), "{}", info.contents);
}

#[test]
fn test_hover_method_signature() {
    let (doc, offset) = with_caret(
        "file:///a.pkl",
        "function add(a: Int, b: Int): Int = a + b\nx = ad<|>d(1, 2)\n",
    );
    let ctx = context(&[&doc]);

    let info = hover(&doc, offset, &ctx).expect("hover");
    assert!(
        info.contents.contains("function add(a: Int, b: Int): Int"),
        "{}",
        info.contents
    );
}

#[test]
fn test_hover_class_header() {
    let (doc, offset) = with_caret("file:///a.pkl", "open class A\nclass B extends A\nx: B<|>\n");
    let ctx = context(&[&doc]);

    let info = hover(&doc, offset, &ctx).expect("hover");
    assert!(info.contents.contains("class B extends A"), "{}", info.contents);
}

#[test]
fn test_hover_member_of_generic_class() {
    let (doc, offset) = with_caret(
        "file:///a.pkl",
        "open class Box<T> { value: T }\nclass IntBox extends Box<Int>\nb: IntBox\nv = b.val<|>ue\n",
    );
    let ctx = context(&[&doc]);

    let info = hover(&doc, offset, &ctx).expect("hover");
    assert!(info.contents.contains("value: Int"), "{}", info.contents);
}

#[test]
fn test_hover_on_operator_is_none() {
    let (doc, offset) = with_caret("file:///a.pkl", "x = 1 <|>+ 2\n");
    let ctx = context(&[&doc]);
    assert!(hover(&doc, offset, &ctx).is_none());
}

// ============================================================================
// Completion
// ============================================================================

#[test]
fn test_member_completion_after_dot() {
    let (doc, offset) = with_caret(
        "file:///a.pkl",
        "class Person {\n  name: String\n  function greet(): String = name\n}\np: Person\nx = p.<|>\n",
    );
    let ctx = context(&[&doc]);

    let items = completions(&doc, offset, &ctx);
    let names = labels(&items);
    assert!(names.contains(&"name"), "{names:?}");
    assert!(names.contains(&"greet"), "{names:?}");

    let name = items.iter().find(|i| &*i.label == "name").expect("name item");
    assert_eq!(name.kind, CompletionKind::Property);
    assert_eq!(name.detail.as_deref(), Some("String"));

    let greet = items.iter().find(|i| &*i.label == "greet").expect("greet item");
    assert_eq!(greet.kind, CompletionKind::Method);
    assert_eq!(greet.insert_text.as_deref(), Some("greet()"));
}

#[test]
fn test_member_completion_after_null_safe_dot() {
    let (doc, offset) = with_caret(
        "file:///a.pkl",
        "class Person { name: String }\np: Person?\nx = p?.na<|>\n",
    );
    let ctx = context(&[&doc]);

    let items = completions(&doc, offset, &ctx);
    assert!(labels(&items).contains(&"name"));
}

#[test]
fn test_member_completion_hides_local_module_members() {
    let lib = document("file:///proj/lib.pkl", "answer = 42\nlocal secret = 1\n");
    let (main, offset) = with_caret("file:///proj/main.pkl", "import \"lib.pkl\"\nx = lib.<|>\n");
    let ctx = context(&[&lib, &main]);

    let items = completions(&main, offset, &ctx);
    let names = labels(&items);
    assert!(names.contains(&"answer"), "{names:?}");
    assert!(!names.contains(&"secret"), "{names:?}");
}

#[test]
fn test_scope_completion_orders_inner_first() {
    let (doc, offset) = with_caret(
        "file:///a.pkl",
        "x = 1\nclass C {\n  y: Int\n  z = let (w = 1) w<|>\n}\n",
    );
    let ctx = context(&[&doc]);

    let items = completions(&doc, offset, &ctx);
    let names = labels(&items);
    let position = |name: &str| {
        names
            .iter()
            .position(|n| *n == name)
            .unwrap_or_else(|| panic!("{name} missing from {names:?}"))
    };

    assert_eq!(names[0], "w");
    assert!(position("w") < position("y"));
    assert!(position("y") < position("x"));
    assert!(position("x") < position("pi"));
    assert!(items.windows(2).all(|w| w[0].sort_priority < w[1].sort_priority));
}

#[test]
fn test_member_completion_skips_operators() {
    let (doc, offset) = with_caret("file:///a.pkl", "n = 1\nx = n.<|>\n");
    let ctx = context(&[&doc]);

    let names = labels(&completions(&doc, offset, &ctx)).join(" ");
    assert!(names.contains("isEven"), "{names}");
    for op in ["+", "==", "<", "~/"] {
        assert!(!names.split(' ').any(|n| n == op), "{op} offered in {names}");
    }
}

#[test]
fn test_completion_on_unknown_receiver_is_empty() {
    let (doc, offset) = with_caret("file:///a.pkl", "x = nowhere.<|>\n");
    let ctx = context(&[&doc]);
    assert!(completions(&doc, offset, &ctx).is_empty());
}

#[test]
fn test_completion_kind_to_lsp() {
    assert_eq!(CompletionKind::Method.to_lsp(), 2);
    assert_eq!(CompletionKind::Class.to_lsp(), 7);
    assert_eq!(CompletionKind::Property.to_lsp(), 10);
}
