//! Resolution of type names.

use smol_str::SmolStr;
use tracing::trace;

use super::members::module_chain;
use crate::ast::{
    Class, ImportClause, Method, Module, Node, NodeKind, QualifiedIdent, TypeAlias,
};
use crate::hir::Context;

/// Declaration a type name refers to.
///
/// The result is a `Class`, `TypeAlias`, `TypeParameter`, or the root of an
/// imported module. Names that do not resolve yield `None`.
pub fn resolve_type_name(name: &QualifiedIdent, ctx: &Context) -> Option<Node> {
    let parts = name.parts();
    let resolved = match parts.as_slice() {
        [] => None,
        [simple] => resolve_simple_type_name(name.node(), simple, ctx),
        [qualifier, rest @ ..] => {
            let module = import_target(name.node(), qualifier, ctx)?;
            resolve_in_module(&module, rest, ctx)
        }
    };
    trace!(name = %name.text(), found = resolved.is_some(), "resolve type name");
    resolved
}

fn resolve_simple_type_name(at: &Node, name: &str, ctx: &Context) -> Option<Node> {
    for scope in at.ancestors() {
        let params = match scope.kind() {
            NodeKind::Class => Class::cast_ref(&scope).map(|c| c.type_parameters()),
            NodeKind::TypeAlias => TypeAlias::cast_ref(&scope).map(|t| t.type_parameters()),
            NodeKind::ClassMethod | NodeKind::ObjectMethod => {
                Method::cast_ref(&scope).map(|m| m.type_parameters())
            }
            NodeKind::Module => {
                if let Some(found) = module_type_member(&scope, name, ctx) {
                    return Some(found);
                }
                if let Some(target) = import_target(&scope, name, ctx) {
                    return Some(target);
                }
                None
            }
            _ => None,
        };
        if let Some(param) = params
            .unwrap_or_default()
            .into_iter()
            .find(|p| p.name().is_ok_and(|n| n == name))
        {
            return Some(param.node().clone());
        }
    }
    base_type_member(name, ctx)
}

/// Resolve `path` inside `module`; only a single trailing segment is a type.
fn resolve_in_module(module: &Node, path: &[SmolStr], ctx: &Context) -> Option<Node> {
    match path {
        [name] => module_type_member(module, name, ctx),
        _ => None,
    }
}

/// Class or type alias `name` declared by `module` or a module it amends or extends
fn module_type_member(module: &Node, name: &str, ctx: &Context) -> Option<Node> {
    for current in module_chain(module, ctx) {
        let module = Module::cast(current)?;
        let class = module
            .classes()
            .into_iter()
            .find(|c| c.name().is_ok_and(|n| n == name))
            .map(Node::from);
        let found = class.or_else(|| {
            module
                .type_aliases()
                .into_iter()
                .find(|t| t.name().is_ok_and(|n| n == name))
                .map(Node::from)
        });
        if found.is_some() {
            return found;
        }
    }
    None
}

fn base_type_member(name: &str, ctx: &Context) -> Option<Node> {
    let base = ctx.base();
    base.class(name)
        .map(|c| c.node().clone())
        .or_else(|| base.type_alias(name).map(|t| t.node().clone()))
}

/// Root of the module bound to import `binding` in the module enclosing `at`
pub(crate) fn import_target(at: &Node, binding: &str, ctx: &Context) -> Option<Node> {
    let root = if at.kind() == NodeKind::Module {
        at.clone()
    } else {
        at.ancestors().last()?
    };
    let module = Module::cast(root)?;
    let clause = module
        .imports()
        .into_iter()
        .find(|i| !i.is_glob() && i.binding_name().is_some_and(|n| n == binding))?;
    import_clause_target(&clause, ctx)
}

/// Root of the module an import clause refers to
pub(crate) fn import_clause_target(clause: &ImportClause, ctx: &Context) -> Option<Node> {
    let uri = clause.uri().ok()?.value()?;
    ctx.resolve_import(clause.node().document(), &uri)
}
