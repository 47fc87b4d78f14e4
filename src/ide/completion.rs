//! Completion suggestions implementation.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::text_utils::{is_word_character, member_dot_before};
use crate::ast::{Document, Expr, Node, NodeKind, QualifiedAccessExpr};
use crate::base::TextSize;
use crate::hir::resolve::{visit_type_members, visit_unqualified};
use crate::hir::{
    CollectAll, Context, Namespace, ResolveVisitor, Resolved, TypeParameterBindings,
    compute_expr_type, declaration_type,
};
use crate::parser::SyntaxKind;

/// Kind of completion item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionKind {
    Property,
    Method,
    Class,
    TypeAlias,
    Variable,
    Module,
    TypeParameter,
}

impl CompletionKind {
    /// Convert to LSP completion item kind number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            CompletionKind::Method => 2,         // Method
            CompletionKind::Variable => 6,       // Variable
            CompletionKind::Class => 7,          // Class
            CompletionKind::TypeAlias => 8,      // Interface
            CompletionKind::Module => 9,         // Module
            CompletionKind::Property => 10,      // Property
            CompletionKind::TypeParameter => 25, // TypeParameter
        }
    }

    fn of(node: &Node) -> Self {
        match node.kind() {
            NodeKind::ClassMethod | NodeKind::ObjectMethod => CompletionKind::Method,
            NodeKind::Class => CompletionKind::Class,
            NodeKind::TypeAlias => CompletionKind::TypeAlias,
            NodeKind::Parameter | NodeKind::TypedIdentifier => CompletionKind::Variable,
            NodeKind::ImportClause | NodeKind::Module => CompletionKind::Module,
            NodeKind::TypeParameter => CompletionKind::TypeParameter,
            _ => CompletionKind::Property,
        }
    }
}

/// A completion suggestion.
#[derive(Clone, Debug)]
pub struct CompletionItem {
    /// The text to insert.
    pub label: Arc<str>,
    /// The kind of completion.
    pub kind: CompletionKind,
    /// Detail text (shown after label).
    pub detail: Option<Arc<str>>,
    /// Documentation (shown in popup).
    pub documentation: Option<Arc<str>>,
    /// Text to insert (if different from label).
    pub insert_text: Option<Arc<str>>,
    /// Sort priority (lower = higher priority).
    pub sort_priority: u32,
}

impl CompletionItem {
    /// Create a new completion item.
    pub fn new(label: impl Into<Arc<str>>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            insert_text: None,
            sort_priority: 100,
        }
    }

    /// Set the detail text.
    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the documentation.
    pub fn with_documentation(mut self, doc: impl Into<Arc<str>>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    /// Set the insert text.
    pub fn with_insert_text(mut self, text: impl Into<Arc<str>>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    /// Set the sort priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.sort_priority = priority;
        self
    }

    /// Create from a resolved declaration. The detail is the declaration's
    /// computed type.
    fn from_resolved(name: &str, resolved: &Resolved, ctx: &Context) -> Self {
        let kind = CompletionKind::of(&resolved.node);
        let mut item = Self::new(name, kind);

        let ty = declaration_type(&resolved.node, &resolved.bindings, ctx);
        if !ty.is_unknown() {
            item = item.with_detail(ty.to_string());
        }
        if let Some(doc) = resolved.node.doc_comment() {
            item = item.with_documentation(doc);
        }
        if kind == CompletionKind::Method {
            item = item.with_insert_text(format!("{name}()"));
        }
        item
    }
}

/// Get completion suggestions at `offset`.
///
/// After `.` or `?.` the members of the receiver's type are offered;
/// anywhere else, every name visible at the cursor. Items are ordered by
/// lookup order, so inner declarations sort before outer ones. Operator
/// members such as `+` are not offered.
pub fn completions(doc: &Arc<Document>, offset: TextSize, ctx: &Context) -> Vec<CompletionItem> {
    let found = match member_dot_before(doc.text(), offset) {
        Some(dot) => member_completions(doc, dot, ctx),
        None => scope_completions(doc, offset, ctx),
    };

    found
        .iter()
        .filter(|(name, _)| name.starts_with(is_word_character))
        .enumerate()
        .map(|(i, (name, resolved))| {
            CompletionItem::from_resolved(name, resolved, ctx).with_priority(i as u32)
        })
        .collect()
}

fn member_completions(
    doc: &Arc<Document>,
    dot: TextSize,
    ctx: &Context,
) -> IndexMap<SmolStr, Resolved> {
    let Some(receiver) = receiver_before(doc, dot) else {
        return IndexMap::new();
    };
    let base = ctx.base();
    let ty = compute_expr_type(&receiver, &TypeParameterBindings::default(), ctx).non_null(base);
    if ty.is_unknown() {
        return IndexMap::new();
    }
    collect_both(|ns, visitor| {
        visit_type_members(&ty, ns, ctx, visitor, 0);
    })
}

fn scope_completions(doc: &Arc<Document>, offset: TextSize, ctx: &Context) -> IndexMap<SmolStr, Resolved> {
    let Some(at) = doc.root().node_at_offset(offset) else {
        return IndexMap::new();
    };
    let bindings = TypeParameterBindings::default();
    collect_both(|ns, visitor| {
        visit_unqualified(&at, ns, &bindings, ctx, visitor, 0);
    })
}

/// Properties first, then methods not shadowed by a property name
fn collect_both(mut walk: impl FnMut(Namespace, &mut CollectAll)) -> IndexMap<SmolStr, Resolved> {
    let mut properties = CollectAll::new();
    walk(Namespace::Property, &mut properties);
    let mut methods = CollectAll::new();
    walk(Namespace::Method, &mut methods);

    let mut found = properties.finish();
    for (name, resolved) in methods.finish() {
        found.entry(name).or_insert(resolved);
    }
    found
}

/// Receiver expression of the member access whose dot is at `dot`
fn receiver_before(doc: &Arc<Document>, dot: TextSize) -> Option<Expr> {
    let at = doc.root().node_at_offset(dot)?;
    std::iter::once(at.clone())
        .chain(at.ancestors())
        .filter_map(QualifiedAccessExpr::cast)
        .find(|access| {
            access.node().terminals().iter().any(|t| {
                matches!(t.kind, SyntaxKind::DOT | SyntaxKind::QUESTION_DOT) && t.range.contains(dot)
            })
        })
        .and_then(|access| access.receiver().ok())
}
