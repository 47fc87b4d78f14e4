//! What the cursor points at.

use std::sync::Arc;

use crate::ast::{Document, ImportExpr, ModuleUri, Node, NodeKind, QualifiedIdent, declaration_name};
use crate::base::{TextRange, TextSize};
use crate::hir::resolve::access_name;

/// A named thing under the cursor.
#[derive(Debug, Clone)]
pub(crate) enum Reference {
    /// Identifier, member or `super` access expression.
    Access(Node),
    /// Type name in a declared type, annotation or `extends` clause.
    TypeName(QualifiedIdent),
    /// Uri of an import, `amends`/`extends` clause or import expression.
    ModuleUri { node: Node, uri: String },
    /// The name of a declaration itself.
    Declaration(Node),
}

impl Reference {
    /// Range to highlight for this reference.
    pub(crate) fn range(&self) -> TextRange {
        match self {
            Reference::Access(node) | Reference::Declaration(node) => name_range(node),
            Reference::TypeName(name) => name.node().range(),
            Reference::ModuleUri { node, .. } => node.range(),
        }
    }
}

/// Innermost reference covering `offset`.
pub(crate) fn reference_at(doc: &Arc<Document>, offset: TextSize) -> Option<Reference> {
    let deepest = doc.root().node_at_offset(offset)?;
    for node in std::iter::once(deepest.clone()).chain(deepest.ancestors()) {
        if access_name(&node).is_some() {
            if name_covers(&node, offset) {
                return Some(Reference::Access(node));
            }
            continue;
        }
        match node.kind() {
            NodeKind::QualifiedIdent
                if node.parent().is_some_and(|p| p.kind() == NodeKind::DeclaredType) =>
            {
                return QualifiedIdent::cast(node).map(Reference::TypeName);
            }
            NodeKind::ModuleUri => {
                let uri = ModuleUri::cast_ref(&node)?.value()?;
                return Some(Reference::ModuleUri { node, uri });
            }
            NodeKind::ImportExpr => {
                let uri = ImportExpr::cast_ref(&node)?.uri()?.value()?;
                return Some(Reference::ModuleUri { node, uri });
            }
            _ if declaration_name(&node).is_some() && name_covers(&node, offset) => {
                return Some(Reference::Declaration(node));
            }
            _ => {}
        }
    }
    None
}

/// Range of the identifier naming `node`, or the whole node when it has none
pub(crate) fn name_range(node: &Node) -> TextRange {
    node.identifier().map_or_else(|_| node.range(), |ident| ident.range)
}

fn name_covers(node: &Node, offset: TextSize) -> bool {
    node.identifier()
        .is_ok_and(|ident| ident.range.contains_inclusive(offset))
}
