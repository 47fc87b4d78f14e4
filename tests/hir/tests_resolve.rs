//! Resolution within and across documents.

use std::sync::Arc;

use pklsem::ast::{Document, Node, NodeKind};
use pklsem::hir::{TypeParameterBindings, compute_expr_type, resolve_access};

use crate::helpers::pkl_helpers::{context_with, document, property_expr};
use crate::helpers::source_fixtures::{SERVER_LIB, SERVER_MAIN};

const LIB_URI: &str = "file:///p/lib/server.pkl";
const MAIN_URI: &str = "file:///p/main.pkl";

/// The last access expression named `name` in `doc`.
fn last_access(doc: &Arc<Document>, name: &str) -> Node {
    doc.root()
        .descendants()
        .into_iter()
        .filter(|n| {
            matches!(
                n.kind(),
                NodeKind::UnqualifiedAccessExpr | NodeKind::QualifiedAccessExpr
            )
        })
        .filter(|n| n.identifier().is_ok_and(|t| t.text == name))
        .last()
        .unwrap_or_else(|| panic!("no access named {name}"))
}

#[test]
fn test_member_of_imported_module() {
    let lib = document(LIB_URI, SERVER_LIB);
    let main = document(MAIN_URI, SERVER_MAIN);
    let ctx = context_with(&[&lib, &main]);

    let resolved = resolve_access(&last_access(&main, "port"), &ctx).expect("port resolves");
    assert!(Arc::ptr_eq(resolved.node.document(), &lib));
    assert_eq!(resolved.node.kind(), NodeKind::ClassProperty);

    let port = property_expr(&main, "port");
    let ty = compute_expr_type(&port, &TypeParameterBindings::default(), &ctx);
    assert_eq!(ty.to_string(), "Int");

    let endpoint = property_expr(&main, "endpoint");
    let ty = compute_expr_type(&endpoint, &TypeParameterBindings::default(), &ctx);
    assert_eq!(ty.to_string(), "Endpoint");
}

#[test]
fn test_local_members_are_hidden_from_importers() {
    let lib = document(LIB_URI, SERVER_LIB);
    let main = document(MAIN_URI, "import \"lib/server.pkl\"\nleak = server.secret\n");
    let ctx = context_with(&[&lib, &main]);

    assert!(resolve_access(&last_access(&main, "secret"), &ctx).is_none());
}

#[test]
fn test_import_of_unknown_module_resolves_nothing() {
    let main = document(MAIN_URI, SERVER_MAIN);
    let ctx = context_with(&[&main]);

    assert!(resolve_access(&last_access(&main, "port"), &ctx).is_none());
    let port = property_expr(&main, "port");
    let ty = compute_expr_type(&port, &TypeParameterBindings::default(), &ctx);
    assert!(ty.is_unknown());
}

#[test]
fn test_builtins_resolve_into_base_module() {
    let doc = document("file:///b.pkl", "x = \"abc\".length\ny = List(1, 2)\n");
    let ctx = context_with(&[&doc]);

    let length = resolve_access(&last_access(&doc, "length"), &ctx).expect("length resolves");
    assert!(ctx.base().contains(&length.node));

    let list = resolve_access(&last_access(&doc, "List"), &ctx).expect("List resolves");
    assert_eq!(list.node.kind(), NodeKind::ClassMethod);
}
