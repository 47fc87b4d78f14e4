//! Expression types as rendered for users.

use pklsem::hir::{TypeParameterBindings, compute_expr_type};
use rstest::rstest;

use crate::helpers::pkl_helpers::{context_with, document, property_expr};

fn rendered_type(source: &str) -> String {
    let doc = document("file:///types.pkl", source);
    let ctx = context_with(&[&doc]);
    let expr = property_expr(&doc, "x");
    compute_expr_type(&expr, &TypeParameterBindings::default(), &ctx).to_string()
}

#[rstest]
#[case::int_addition("x = 1 + 2\n", "Int")]
#[case::mixed_addition("x = 1.5 + 2\n", "Float")]
#[case::division("x = 3 / 2\n", "Float")]
#[case::truncating_division("x = 7 ~/ 2\n", "Int")]
#[case::concatenation("x = \"a\" + \"b\"\n", "String")]
#[case::comparison("x = 1 < 2\n", "Boolean")]
#[case::null_literal("x = null\n", "Null")]
#[case::throw("x = throw(\"boom\")\n", "nothing")]
#[case::if_union("x = if (true) 1 else \"s\"\n", "Int|String")]
#[case::let_body("x = let (y = 1) y + 1\n", "Int")]
#[case::builtin_property("x = \"s\".length\n", "Int")]
#[case::unknown_name("x = nowhere\n", "unknown")]
fn test_expression_type(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(rendered_type(source), expected);
}

#[test]
fn test_declared_generic_member_types() {
    let source = "class Box<T> {\n  value: T\n}\nb: Box<Int>\nx = b.value\n";
    assert_eq!(rendered_type(source), "Int");
}

#[test]
fn test_nullable_access_chain() {
    let source = "class P {\n  name: String?\n}\np: P\nx = p.name\n";
    assert_eq!(rendered_type(source), "String?");
}
