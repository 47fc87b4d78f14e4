//! Diagnostics: findings reported by analyzers.
//!
//! A diagnostic carries a message key and arguments rather than final text;
//! [`Diagnostic::render`] looks the key up in a [`MessageCatalog`].

use smol_str::SmolStr;

use super::messages::MessageCatalog;
use crate::ast::Node;
use crate::base::{FileId, Span, TextRange};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A finding attached to a source range.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: FileId,
    /// Byte range of the offending node.
    pub range: TextRange,
    /// Line/column form of `range`.
    pub span: Span,
    /// Severity level.
    pub severity: Severity,
    /// Message catalog key.
    pub key: SmolStr,
    /// Positional arguments for the message, `{0}`, `{1}`, ...
    pub args: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic on `node`.
    pub fn error(node: &Node, key: &str) -> Self {
        Self::new(node, Severity::Error, key)
    }

    /// Create a new warning diagnostic on `node`.
    pub fn warning(node: &Node, key: &str) -> Self {
        Self::new(node, Severity::Warning, key)
    }

    fn new(node: &Node, severity: Severity, key: &str) -> Self {
        Self {
            file: node.file(),
            range: node.range(),
            span: node.span(),
            severity,
            key: SmolStr::new(key),
            args: Vec::new(),
        }
    }

    /// Narrow the diagnostic to `range` within the same document as `node`.
    pub fn with_range(mut self, node: &Node, range: TextRange) -> Self {
        self.range = range;
        self.span = node.document().line_index().span(range);
        self
    }

    /// Append a message argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Message text for this diagnostic.
    pub fn render(&self, catalog: &MessageCatalog) -> String {
        catalog.format(&self.key, &self.args)
    }
}
