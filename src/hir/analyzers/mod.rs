//! Analyzer framework.
//!
//! An [`Analyzer`] inspects one node at a time, appends diagnostics, and says
//! whether the walk should continue into the node's children.
//! [`DiagnosticsRunner`] walks a document pre-order and calls every
//! registered analyzer on every node it reaches.
//!
//! A subtree is entered when at least one analyzer asks for it. An analyzer
//! that hits a malformed node returns an [`AstError`]; the runner records it
//! in the report and skips that subtree, so the rest of the document is
//! still analyzed.

mod annotation;
mod syntax;

pub use annotation::AnnotationAnalyzer;
pub use syntax::SyntaxAnalyzer;

use tracing::{debug, warn};

use super::{Context, Diagnostic};
use crate::ast::{AstError, Node};
use crate::error::{Error, Result};

/// A check run on every node of a document.
///
/// Implementations only append to `diagnostics`; they keep no state between
/// calls.
pub trait Analyzer: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Check `node`. Returns whether the walk should descend into its children.
    fn analyze(
        &self,
        node: &Node,
        diagnostics: &mut Vec<Diagnostic>,
        ctx: &Context,
    ) -> Result<bool, AstError>;
}

/// Outcome of one analysis pass.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub diagnostics: Vec<Diagnostic>,
    /// Malformed nodes whose subtrees were skipped
    pub internal_errors: Vec<AstError>,
}

impl AnalysisReport {
    pub fn has_diagnostic(&self, key: &str) -> bool {
        self.diagnostics.iter().any(|d| d.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.key.as_str()).collect()
    }
}

/// Runs a set of analyzers over a document.
#[derive(Default)]
pub struct DiagnosticsRunner {
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl DiagnosticsRunner {
    /// A runner with no analyzers.
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner with every analyzer this crate provides.
    pub fn with_defaults() -> Self {
        Self::new()
            .with(SyntaxAnalyzer)
            .with(AnnotationAnalyzer)
    }

    pub fn with(mut self, analyzer: impl Analyzer + 'static) -> Self {
        self.register(Box::new(analyzer));
        self
    }

    pub fn register(&mut self, analyzer: Box<dyn Analyzer>) {
        self.analyzers.push(analyzer);
    }

    pub fn analyzer_names(&self) -> Vec<&'static str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    /// Analyze the tree rooted at `root`.
    ///
    /// Fails only with [`Error::Cancelled`] when the context's request is
    /// cancelled mid-walk.
    pub fn run(&self, root: &Node, ctx: &Context) -> Result<AnalysisReport> {
        let mut report = AnalysisReport::default();
        let mut stack = vec![root.clone()];

        while let Some(node) = stack.pop() {
            if ctx.is_cancelled() {
                debug!(file = %root.file(), "analysis cancelled");
                return Err(Error::Cancelled);
            }

            let mut descend = false;
            let mut failed = false;
            for analyzer in &self.analyzers {
                match analyzer.analyze(&node, &mut report.diagnostics, ctx) {
                    Ok(d) => descend |= d,
                    Err(err) => {
                        warn!(analyzer = analyzer.name(), error = %err, "skipping malformed subtree");
                        report.internal_errors.push(err);
                        failed = true;
                    }
                }
            }

            if descend && !failed {
                let mut children = node.children();
                children.reverse();
                stack.extend(children);
            }
        }

        debug!(
            file = %root.file(),
            diagnostics = report.diagnostics.len(),
            internal_errors = report.internal_errors.len(),
            "analysis finished"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for DiagnosticsRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticsRunner")
            .field("analyzers", &self.analyzer_names())
            .finish()
    }
}
