//! Go-to-definition implementation.

use std::sync::Arc;

use smol_str::SmolStr;

use super::reference::{Reference, name_range, reference_at};
use crate::ast::{Document, Node, NodeKind, declaration_name};
use crate::base::{FileId, Span, TextRange, TextSize};
use crate::hir::{Context, resolve_access, resolve_type_name};

/// Result of a go-to-definition request.
#[derive(Clone, Debug)]
pub struct GotoResult {
    /// The targets to jump to.
    pub targets: Vec<GotoTarget>,
}

impl GotoResult {
    /// Create an empty result (no targets found).
    pub fn empty() -> Self {
        Self {
            targets: Vec::new(),
        }
    }

    /// Create a result with a single target.
    pub fn single(target: GotoTarget) -> Self {
        Self {
            targets: vec![target],
        }
    }

    /// Check if any targets were found.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A target location for go-to-definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GotoTarget {
    /// The file containing the target.
    pub file: FileId,
    /// Uri of the document containing the target.
    pub uri: Arc<str>,
    /// Range of the target's name, or of the whole node if it has none.
    pub range: TextRange,
    /// `range` as line/column positions.
    pub span: Span,
    /// Kind of the declaration.
    pub kind: NodeKind,
    /// Declared name, if the target has one.
    pub name: Option<SmolStr>,
}

impl From<&Node> for GotoTarget {
    fn from(node: &Node) -> Self {
        let range = name_range(node);
        let doc = node.document();
        Self {
            file: node.file(),
            uri: Arc::from(doc.uri()),
            range,
            span: doc.line_index().span(range),
            kind: node.kind(),
            name: declaration_name(node),
        }
    }
}

/// Find the declaration of whatever is at `offset` in `doc`.
///
/// Access expressions resolve through the scope rules, type names through
/// type name lookup, and module uris to the root of the imported module.
/// The name of a declaration resolves to the declaration itself.
pub fn goto_definition(doc: &Arc<Document>, offset: TextSize, ctx: &Context) -> GotoResult {
    let Some(reference) = reference_at(doc, offset) else {
        return GotoResult::empty();
    };
    let target = match reference {
        Reference::Access(access) => resolve_access(&access, ctx).map(|r| r.node),
        Reference::TypeName(name) => resolve_type_name(&name, ctx),
        Reference::ModuleUri { uri, .. } => ctx.resolve_import(doc, &uri),
        Reference::Declaration(node) => Some(node),
    };
    match target {
        Some(node) => GotoResult::single(GotoTarget::from(&node)),
        None => GotoResult::empty(),
    }
}
