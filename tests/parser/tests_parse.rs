//! Parsing tests through the public API.

use pklsem::ast::NodeKind;
use pklsem::parser::parse;
use rstest::rstest;

use crate::helpers::pkl_helpers::{document, property_expr};
use crate::helpers::source_fixtures::{ANNOTATIONS, PERSON_MODULE, SERVER_LIB, SERVER_MAIN};

// =============================================================================
// WELL-FORMED INPUT
// =============================================================================

#[rstest]
#[case::person(PERSON_MODULE)]
#[case::server_lib(SERVER_LIB)]
#[case::server_main(SERVER_MAIN)]
#[case::annotations(ANNOTATIONS)]
#[case::amends("amends \"base.pkl\"\nx = 1\n")]
#[case::typealias("typealias Port = Int\np: Port = 80\n")]
#[case::generics("class Pair<out A, out B> {\n  first: A\n  second: B\n}\n")]
#[case::function_type("f: (Int, String) -> Boolean\n")]
#[case::object_generators("xs {\n  for (k, v in m) { [k] = v }\n  when (flag) { 1 } else { 2 }\n  ...other\n}\n")]
#[case::multiline_string("s = \"\"\"\n  hello\n  \\(name)\n  \"\"\"\n")]
#[case::lambda("f = (x, y) -> x + y\ng = f.apply(1, 2)\n")]
fn test_parses_without_errors(#[case] source: &str) {
    let parse = parse(source);
    assert!(parse.ok(), "unexpected errors: {:?}", parse.errors);
    assert_eq!(parse.syntax().text().to_string(), source);
}

// =============================================================================
// PRECEDENCE
// =============================================================================

#[rstest]
#[case("1 + 2 * 3", NodeKind::AdditiveExpr)]
#[case("1 * 2 + 3", NodeKind::AdditiveExpr)]
#[case("a ?? b ?? c", NodeKind::NullCoalesceExpr)]
#[case("a |> f ?? g", NodeKind::NullCoalesceExpr)]
#[case("a == b || c", NodeKind::LogicalOrExpr)]
#[case("!a && b", NodeKind::LogicalAndExpr)]
#[case("1 < 2 == true", NodeKind::EqualityExpr)]
#[case("x is Int", NodeKind::TypeTestExpr)]
#[case("-2 ** 2", NodeKind::ExponentiationExpr)]
#[case("p.q[0]!!", NodeKind::NonNullExpr)]
#[case("p?.q", NodeKind::QualifiedAccessExpr)]
#[case("if (a) b else c + 1", NodeKind::IfExpr)]
#[case("let (a = 1) a + 1", NodeKind::LetExpr)]
#[case("new Listing<Int> { 1 }", NodeKind::NewExpr)]
#[case("(base) { x = 1 }", NodeKind::AmendExpr)]
#[case("import(\"a.pkl\")", NodeKind::ImportExpr)]
#[case("read?(\"env:HOME\")", NodeKind::ReadExpr)]
fn test_top_level_expression_kind(#[case] expr: &str, #[case] expected: NodeKind) {
    let doc = document("file:///prec.pkl", &format!("x = {expr}\n"));
    assert!(doc.errors().is_empty(), "{:?}", doc.errors());
    assert_eq!(property_expr(&doc, "x").node().kind(), expected);
}

// =============================================================================
// RECOVERY
// =============================================================================

#[test]
fn test_missing_closers_do_not_produce_parse_errors() {
    let parse = parse("a = (1 + 2\nb = f(1, 2\nc = xs[0\n");
    assert!(parse.ok(), "{:?}", parse.errors);
}

#[test]
fn test_malformed_members_keep_later_members() {
    let doc = document("file:///bad.pkl", "a = = 1\nclass {\nb = 2\n");
    assert!(!doc.errors().is_empty());
    assert_eq!(property_expr(&doc, "b").node().kind(), NodeKind::IntLiteral);
}

#[test]
fn test_errors_are_within_the_document() {
    let source = "x = 1 +\ny = )\n";
    let doc = document("file:///bad.pkl", source);
    let end = pklsem::TextSize::of(source);
    for error in doc.errors() {
        assert!(error.range.end() <= end, "{error:?}");
    }
}

// =============================================================================
// LEADING TRIVIA
// =============================================================================

#[rstest]
#[case::blank_line("\nimport \"a.pkl\"\nx = 1\n")]
#[case::line_comment("// c\nimport \"a.pkl\"\nx = 1\n")]
#[case::blank_line_and_comment("\n// c\nimport \"a.pkl\"\nx = 1\n")]
#[case::doc_comment_on_member("/// docs\nimport \"a.pkl\"\nx = 1\n")]
fn test_imports_after_leading_trivia(#[case] source: &str) {
    let doc = document("file:///trivia.pkl", source);
    assert!(doc.errors().is_empty(), "{:?}", doc.errors());

    let imports: Vec<_> = doc
        .root()
        .descendants()
        .into_iter()
        .filter(|n| n.kind() == NodeKind::ImportClause)
        .collect();
    assert_eq!(imports.len(), 1);
    assert_eq!(property_expr(&doc, "x").node().kind(), NodeKind::IntLiteral);
}

#[test]
fn test_leading_annotation_still_attaches_to_first_member() {
    let doc = document("file:///trivia.pkl", "// c\n@Deprecated\nx = 1\n");
    assert!(doc.errors().is_empty(), "{:?}", doc.errors());
    assert_eq!(property_expr(&doc, "x").node().kind(), NodeKind::IntLiteral);
}
