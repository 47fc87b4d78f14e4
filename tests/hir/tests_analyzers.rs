//! Default analyzers over whole modules.

use pklsem::hir::MessageCatalog;

use crate::helpers::pkl_helpers::analyze;
use crate::helpers::source_fixtures::{ANNOTATIONS, PERSON_MODULE};

#[test]
fn test_clean_module_has_no_diagnostics() {
    let report = analyze(PERSON_MODULE);
    assert!(report.diagnostics.is_empty(), "{:?}", report.keys());
    assert!(report.internal_errors.is_empty());
}

#[test]
fn test_annotation_fixture() {
    let report = analyze(ANNOTATIONS);
    assert_eq!(report.keys(), ["typeIsAbstract", "notAnnotation", "cannotFindType"]);
}

#[test]
fn test_messages_render_with_arguments() {
    let report = analyze("class Plain\n@Plain\nx = 1\n");
    let diagnostic = &report.diagnostics[0];
    assert_eq!(
        diagnostic.render(MessageCatalog::bundled()),
        "Type `Plain` is not a subclass of `Annotation`"
    );
}

#[test]
fn test_syntax_and_annotation_diagnostics_together() {
    let report = analyze("@Missing\nx = (1\n");
    assert!(report.has_diagnostic("cannotFindType"));
    assert!(report.has_diagnostic("missingDelimiter"));
}
