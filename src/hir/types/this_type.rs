//! The implicit receiver type at a node.

use tracing::trace;

use super::compute::{expr_type, property_type};
use super::declared::{class_self_type, resolve_type_at};
use super::subtype::supertype_args;
use super::{Type, TypeParameterBindings};
use crate::ast::{AmendExpr, Annotation, Class, NewExpr, Node, NodeKind, Property};
use crate::hir::Context;

/// Type of `this` at `node`.
///
/// Walks outward from `node` (inclusive) to the nearest class, object body
/// or module. An object body takes the type of the object it builds: the
/// type named by `new`, the parent of an amend expression, or the type of
/// the property, entry or element it defines. The walk only ever moves to
/// enclosing nodes, so it terminates for any nesting of amend chains.
pub fn compute_this_type(node: &Node, bindings: &TypeParameterBindings, ctx: &Context) -> Type {
    this_type_at(node, bindings, ctx, 0)
}

pub(crate) fn this_type_at(
    node: &Node,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    depth: u32,
) -> Type {
    if depth > ctx.max_depth() {
        trace!("this type depth exceeded");
        return Type::Unknown;
    }
    for scope in std::iter::once(node.clone()).chain(node.ancestors()) {
        match scope.kind() {
            NodeKind::Class => {
                if let Some(class) = Class::cast_ref(&scope) {
                    return class_self_type(&class).substitute(bindings);
                }
            }
            NodeKind::Module => return Type::module(scope),
            NodeKind::ObjectBody => {
                if let Some(ty) = object_body_type(&scope, bindings, ctx, depth) {
                    return ty;
                }
            }
            _ => {}
        }
    }
    Type::Unknown
}

/// Type of the object an object body builds; `None` if the body belongs to
/// a generator and the enclosing body decides.
fn object_body_type(
    body: &Node,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    depth: u32,
) -> Option<Type> {
    let base = ctx.base();
    let owner = body.parent()?;
    let ty = match owner.kind() {
        NodeKind::NewExpr => {
            let new_expr = NewExpr::cast_ref(&owner)?;
            match new_expr.type_node() {
                Some(type_node) => resolve_type_at(&type_node, bindings, ctx, depth + 1),
                None => expected_type(&owner, bindings, ctx, depth + 1),
            }
        }
        NodeKind::AmendExpr => match AmendExpr::cast_ref(&owner)?.parent_expr() {
            Ok(parent) => expr_type(parent.node(), bindings, ctx, depth + 1),
            Err(_) => Type::Unknown,
        },
        NodeKind::ClassProperty | NodeKind::ObjectProperty => {
            property_type(&Property::cast_ref(&owner)?, bindings, ctx, depth + 1)
        }
        NodeKind::ObjectEntry => {
            let container = this_type_at(&owner, bindings, ctx, depth + 1);
            entry_value_type(&container, ctx)
        }
        NodeKind::Annotation => match Annotation::cast_ref(&owner)?.type_node() {
            Some(type_node) => resolve_type_at(&type_node, bindings, ctx, depth + 1),
            None => Type::Unknown,
        },
        NodeKind::ForGenerator | NodeKind::WhenGenerator => return None,
        _ => base.dynamic_type(),
    };
    Some(ty)
}

/// Type a `new` expression without an explicit type is expected to have,
/// taken from the slot it is assigned to.
pub(crate) fn expected_type(
    expr: &Node,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    depth: u32,
) -> Type {
    let base = ctx.base();
    let Some(slot) = expr.parent() else {
        return base.dynamic_type();
    };
    let ty = match slot.kind() {
        NodeKind::ClassProperty | NodeKind::ObjectProperty => match Property::cast_ref(&slot) {
            Some(property) => property_type(&property, bindings, ctx, depth + 1),
            None => Type::Unknown,
        },
        NodeKind::ObjectEntry => {
            let container = this_type_at(&slot, bindings, ctx, depth + 1);
            entry_value_type(&container, ctx)
        }
        NodeKind::ObjectElement => {
            let container = this_type_at(&slot, bindings, ctx, depth + 1);
            element_type(&container, ctx)
        }
        _ => Type::Unknown,
    };
    if ty.is_unknown() { base.dynamic_type() } else { ty }
}

/// Value type of `[key] = value` entries in an object of type `container`
pub(crate) fn entry_value_type(container: &Type, ctx: &Context) -> Type {
    let base = ctx.base();
    for name in ["Mapping", "Map"] {
        if let Some(args) = supertype_args(container, name, ctx) {
            return args.get(1).cloned().unwrap_or(Type::Unknown);
        }
    }
    let element = element_type(container, ctx);
    if element.is_unknown() { base.dynamic_type() } else { element }
}

/// Element type of a listing-like `container`
pub(crate) fn element_type(container: &Type, ctx: &Context) -> Type {
    for name in ["Listing", "Collection"] {
        if let Some(args) = supertype_args(container, name, ctx) {
            return args.first().cloned().unwrap_or(Type::Unknown);
        }
    }
    Type::Unknown
}
