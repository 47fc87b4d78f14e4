//! Lexical scope walk for unqualified and `super` access.

use super::members::{
    module_chain, offer, visit_class_members, visit_declarations, visit_module_members,
    visit_type_members,
};
use super::{Namespace, ResolveVisitor};
use crate::ast::{
    Class, ForGenerator, FunctionLiteral, LetExpr, Method, Module, Node, NodeKind, ObjectBody,
    is_in_let_body,
};
use crate::hir::types::{TypeParameterBindings, class_self_type, superclass, this_type_at};
use crate::hir::Context;

/// Visit every declaration visible from `access`, innermost scope first
/// (`access` itself counts as a scope when it is one):
/// local bindings, object members and the implicit receiver, enclosing class
/// members, module members, imports, and finally the base module.
pub(crate) fn visit_unqualified<V: ResolveVisitor>(
    access: &Node,
    ns: Namespace,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    visitor: &mut V,
    depth: u32,
) -> bool {
    let mut prev = access.clone();
    let mut receiver_visited = false;
    for scope in std::iter::once(access.clone()).chain(access.ancestors()) {
        if ctx.is_cancelled() {
            return false;
        }
        let more = match scope.kind() {
            NodeKind::LetExpr if ns == Namespace::Property => LetExpr::cast_ref(&scope)
                .filter(|let_expr| is_in_let_body(let_expr, &prev))
                .and_then(|let_expr| let_expr.parameter().ok())
                .is_none_or(|param| offer(visitor, param.node(), bindings)),
            NodeKind::FunctionLiteral if ns == Namespace::Property => {
                let params = FunctionLiteral::cast_ref(&scope)
                    .map(|f| f.parameters())
                    .unwrap_or_default();
                offer_all(visitor, params.iter().map(|p| p.node()), bindings)
            }
            NodeKind::ClassMethod | NodeKind::ObjectMethod if ns == Namespace::Property => {
                let params = Method::cast_ref(&scope)
                    .map(|m| m.parameters())
                    .unwrap_or_default();
                offer_all(visitor, params.iter().map(|p| p.node()), bindings)
            }
            NodeKind::ForGenerator if ns == Namespace::Property && prev.kind() == NodeKind::ObjectBody => {
                let params = ForGenerator::cast_ref(&scope)
                    .map(|f| f.parameters())
                    .unwrap_or_default();
                offer_all(visitor, params.iter().map(|p| p.node()), bindings)
            }
            NodeKind::ObjectBody => {
                let lexical = visit_object_body(&scope, ns, bindings, visitor);
                if lexical && !receiver_visited {
                    receiver_visited = true;
                    let this = this_type_at(&scope, bindings, ctx, depth + 1);
                    visit_type_members(&this, ns, ctx, visitor, depth + 1)
                } else {
                    lexical
                }
            }
            NodeKind::Class => match Class::cast_ref(&scope) {
                Some(class) => {
                    let ty = class_self_type(&class).substitute(bindings);
                    visit_class_members(&ty, ns, ctx, visitor, depth + 1)
                }
                None => true,
            },
            NodeKind::Module => return visit_module_scope(&scope, ns, ctx, visitor, depth),
            _ => true,
        };
        if !more {
            return false;
        }
        prev = scope;
    }
    true
}

fn offer_all<'a, V: ResolveVisitor>(
    visitor: &mut V,
    elements: impl IntoIterator<Item = &'a Node>,
    bindings: &TypeParameterBindings,
) -> bool {
    elements.into_iter().all(|element| offer(visitor, element, bindings))
}

/// Parameters and members declared directly in an object body
fn visit_object_body<V: ResolveVisitor>(
    body: &Node,
    ns: Namespace,
    bindings: &TypeParameterBindings,
    visitor: &mut V,
) -> bool {
    let Some(body) = ObjectBody::cast_ref(body) else {
        return true;
    };
    match ns {
        Namespace::Property => {
            offer_all(visitor, body.parameters().iter().map(|p| p.node()), bindings)
                && offer_all(visitor, body.properties().iter().map(|p| p.node()), bindings)
        }
        Namespace::Method => offer_all(visitor, body.methods().iter().map(|m| m.node()), bindings),
    }
}

/// Module members, then imports, then the base module
fn visit_module_scope<V: ResolveVisitor>(
    root: &Node,
    ns: Namespace,
    ctx: &Context,
    visitor: &mut V,
    depth: u32,
) -> bool {
    if !visit_module_members(root, ns, true, ctx, visitor, depth + 1) {
        return false;
    }
    let empty = TypeParameterBindings::default();
    if ns == Namespace::Property {
        let imports = Module::cast_ref(root).map(|m| m.imports()).unwrap_or_default();
        if !offer_all(visitor, imports.iter().map(|i| i.node()), &empty) {
            return false;
        }
    }
    if ctx.is_cancelled() {
        return false;
    }
    visit_declarations(&ctx.base().module(), ns, true, visitor, &empty)
}

/// Members reachable through `super` at `access`.
///
/// In a class this is the superclass; in an object body, the members of the
/// amended object; at module level, the module being amended or extended.
/// Overrides are not checked against the member they shadow.
pub(crate) fn visit_super<V: ResolveVisitor>(
    access: &Node,
    ns: Namespace,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    visitor: &mut V,
    depth: u32,
) -> bool {
    for scope in std::iter::once(access.clone()).chain(access.ancestors()) {
        match scope.kind() {
            NodeKind::ObjectBody => {
                let this = this_type_at(&scope, bindings, ctx, depth + 1);
                return visit_type_members(&this, ns, ctx, visitor, depth + 1);
            }
            NodeKind::Class => {
                let Some(class) = Class::cast_ref(&scope) else {
                    return true;
                };
                return match superclass(&class, bindings, ctx, depth + 1) {
                    Some(parent) => visit_type_members(&parent, ns, ctx, visitor, depth + 1),
                    None => true,
                };
            }
            NodeKind::Module => {
                return match module_chain(&scope, ctx).get(1) {
                    Some(parent) => visit_module_members(parent, ns, false, ctx, visitor, depth + 1),
                    None => true,
                };
            }
            _ => {}
        }
    }
    true
}
