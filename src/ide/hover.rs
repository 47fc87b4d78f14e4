//! Hover information implementation.

use std::sync::Arc;

use super::reference::{Reference, reference_at};
use crate::ast::{
    Class, Document, ImportClause, Method, Module, Node, NodeKind, TypeAlias, declaration_name,
};
use crate::base::{Span, TextRange, TextSize};
use crate::hir::{Context, TypeParameterBindings, declaration_type, resolve_access, resolve_type_name};

/// Result of a hover request.
#[derive(Clone, Debug)]
pub struct HoverResult {
    /// The hover content (markdown).
    pub contents: String,
    /// Range of the hovered reference.
    pub range: TextRange,
    /// `range` as line/column positions.
    pub span: Span,
}

/// Describe the declaration referenced at `offset`: its kind, name and
/// computed type, followed by its doc comment.
pub fn hover(doc: &Arc<Document>, offset: TextSize, ctx: &Context) -> Option<HoverResult> {
    let reference = reference_at(doc, offset)?;
    let range = reference.range();
    let (decl, bindings) = match reference {
        Reference::Access(access) => {
            let resolved = resolve_access(&access, ctx)?;
            (resolved.node, resolved.bindings)
        }
        Reference::TypeName(name) => (resolve_type_name(&name, ctx)?, Default::default()),
        Reference::ModuleUri { uri, .. } => (ctx.resolve_import(doc, &uri)?, Default::default()),
        Reference::Declaration(node) => (node, Default::default()),
    };

    Some(HoverResult {
        contents: build_hover_content(&decl, &bindings, ctx),
        range,
        span: doc.line_index().span(range),
    })
}

fn build_hover_content(decl: &Node, bindings: &TypeParameterBindings, ctx: &Context) -> String {
    let mut content = String::new();
    content.push_str("```pkl\n");
    content.push_str(&signature(decl, bindings, ctx));
    content.push_str("\n```\n");

    if let Some(doc) = decl.doc_comment() {
        content.push_str("\n---\n\n");
        content.push_str(&doc);
        content.push('\n');
    }
    content
}

/// One-line declaration signature with inferred types filled in
fn signature(decl: &Node, bindings: &TypeParameterBindings, ctx: &Context) -> String {
    let name = declaration_name(decl).unwrap_or_default();
    let type_of = |node: &Node| declaration_type(node, bindings, ctx);

    match decl.kind() {
        NodeKind::Class => {
            let Some(class) = Class::cast_ref(decl) else {
                return format!("class {name}");
            };
            let mut out = String::new();
            if class.is_abstract() {
                out.push_str("abstract ");
            } else if class.is_open() {
                out.push_str("open ");
            }
            out.push_str("class ");
            out.push_str(&name);
            let params = class.type_parameters();
            if !params.is_empty() {
                let names: Vec<_> = params
                    .iter()
                    .filter_map(|p| declaration_name(p.node()))
                    .collect();
                out.push_str(&format!("<{}>", names.join(", ")));
            }
            if let Some(supertype) = class.supertype() {
                out.push_str(" extends ");
                out.push_str(supertype.node().text().trim());
            }
            out
        }
        NodeKind::TypeAlias => match TypeAlias::cast_ref(decl).and_then(|a| a.aliased_type().ok()) {
            Some(aliased) => format!("typealias {name} = {}", aliased.node().text().trim()),
            None => format!("typealias {name}"),
        },
        NodeKind::ClassMethod | NodeKind::ObjectMethod => {
            let params = Method::cast_ref(decl)
                .map(|m| m.parameters())
                .unwrap_or_default()
                .iter()
                .map(|p| {
                    let param_name = p.name().unwrap_or_default();
                    format!("{param_name}: {}", type_of(p.node()))
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("function {name}({params}): {}", type_of(decl))
        }
        NodeKind::ClassProperty | NodeKind::ObjectProperty | NodeKind::Parameter | NodeKind::TypedIdentifier => {
            format!("{name}: {}", type_of(decl))
        }
        NodeKind::ImportClause => {
            let uri = ImportClause::cast_ref(decl)
                .and_then(|c| c.uri().ok())
                .and_then(|u| u.value())
                .unwrap_or_default();
            format!("import \"{uri}\" as {name}")
        }
        NodeKind::Module => {
            let module_name = Module::cast_ref(decl)
                .and_then(|m| m.name())
                .unwrap_or_else(|| decl.document().uri().to_string());
            format!("module {module_name}")
        }
        NodeKind::TypeParameter => format!("type parameter {name}"),
        kind => format!("{kind:?} {name}"),
    }
}
