//! Syntax diagnostics: parse errors and missing closing delimiters.

use super::Analyzer;
use crate::ast::{AstError, Node, NodeKind};
use crate::base::TextRange;
use crate::hir::{Context, Diagnostic};

/// Reports the document's parse errors once, at the module node, and every
/// delimited construct whose closer is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxAnalyzer;

impl Analyzer for SyntaxAnalyzer {
    fn name(&self) -> &'static str {
        "syntax"
    }

    fn analyze(
        &self,
        node: &Node,
        diagnostics: &mut Vec<Diagnostic>,
        _ctx: &Context,
    ) -> Result<bool, AstError> {
        if node.kind() == NodeKind::Module && node.parent().is_none() {
            for error in node.document().errors() {
                diagnostics.push(
                    Diagnostic::error(node, "syntaxError")
                        .with_range(node, error.range)
                        .with_arg(error.message.clone()),
                );
            }
        }

        match node.check_closing_delimiter() {
            Some(",") => diagnostics.push(Diagnostic::error(node, "missingComma")),
            Some(expected) => {
                let at = TextRange::empty(node.range().end());
                diagnostics.push(
                    Diagnostic::error(node, "missingDelimiter")
                        .with_range(node, at)
                        .with_arg(expected),
                );
            }
            None => {}
        }
        Ok(true)
    }
}
