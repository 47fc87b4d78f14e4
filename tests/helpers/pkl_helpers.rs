//! Helpers for building documents and contexts.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use pklsem::ast::{Document, Expr, Property};
use pklsem::hir::{AnalysisReport, BaseModule, Context, DiagnosticsRunner};
use pklsem::{FileId, TextSize};

/// Marks the cursor position in test sources.
pub const CARET: &str = "<|>";

/// Parses `source` as a document at `uri` with a fresh file id.
pub fn document(uri: &str, source: &str) -> Arc<Document> {
    static NEXT_FILE: AtomicU32 = AtomicU32::new(1);
    Document::new(FileId::new(NEXT_FILE.fetch_add(1, Ordering::Relaxed)), uri, 1, source)
}

/// Parses `source` with the caret marker removed; returns the caret offset.
pub fn document_with_caret(uri: &str, source: &str) -> (Arc<Document>, TextSize) {
    let offset = source
        .find(CARET)
        .unwrap_or_else(|| panic!("no caret in {source:?}"));
    let text = source.replacen(CARET, "", 1);
    (document(uri, &text), TextSize::from(offset as u32))
}

/// A context that knows every document in `docs`.
pub fn context_with(docs: &[&Arc<Document>]) -> Context {
    let base = BaseModule::new().expect("bundled base module loads");
    docs.iter()
        .fold(Context::new(Arc::new(base)), |ctx, doc| ctx.with_document(Arc::clone(doc)))
}

/// Value expression of the property `name`.
pub fn property_expr(doc: &Arc<Document>, name: &str) -> Expr {
    doc.root()
        .descendants()
        .into_iter()
        .filter_map(Property::cast)
        .find(|p| p.name().is_ok_and(|n| n == name))
        .and_then(|p| p.expr())
        .unwrap_or_else(|| panic!("no property {name} with a value"))
}

/// Runs the default analyzers over a single-document source.
pub fn analyze(source: &str) -> AnalysisReport {
    let doc = document("file:///test.pkl", source);
    let ctx = context_with(&[&doc]);
    DiagnosticsRunner::with_defaults()
        .run(&doc.root(), &ctx)
        .expect("analysis is not cancelled")
}
