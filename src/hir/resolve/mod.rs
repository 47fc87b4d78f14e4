//! Name resolution.
//!
//! [`resolve`] finds the declarations an access expression may refer to and
//! feeds them, in lookup order, to a [`ResolveVisitor`]. The visitor decides
//! whether the first match is enough or every candidate is collected.
//!
//! Lookup order for an unqualified name, innermost first:
//!
//! 1. `let` bindings, function and method parameters, `for` variables
//! 2. members of enclosing object bodies, then members of their receiver type
//! 3. members of the enclosing class and its superclasses
//! 4. members of the enclosing module and the modules it amends or extends
//! 5. imports
//! 6. the base module
//!
//! A qualified name is looked up on the static type of its receiver. `super`
//! names start at the superclass, the amended object, or the parent module.
//! Properties and methods live in separate namespaces: an access with an
//! argument list only sees methods.

mod members;
mod names;
mod scope;
mod visitor;

use smol_str::SmolStr;
use tracing::trace;

pub use names::resolve_type_name;
pub use visitor::{CollectAll, ElementsNamed, FirstElementNamed, ResolveVisitor, Resolved};

pub(crate) use members::{module_chain, visit_type_members};
pub(crate) use names::import_clause_target;
pub(crate) use scope::visit_unqualified;

use crate::ast::{
    ArgumentList, Node, NodeKind, QualifiedAccessExpr, SuperAccessExpr, UnqualifiedAccessExpr,
};
use crate::hir::Context;
use crate::hir::types::{Type, TypeParameterBindings, expr_type};

/// Which declarations a lookup considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Properties, parameters, classes, type aliases and imports
    Property,
    /// Methods
    Method,
}

/// Resolve the access expression `access`.
///
/// For a qualified access, `receiver` overrides the inferred receiver type.
/// Nodes that are not access expressions resolve to the visitor's empty
/// result.
pub fn resolve<V: ResolveVisitor>(
    access: &Node,
    receiver: Option<&Type>,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    mut visitor: V,
) -> V::Output {
    resolve_at(access, receiver, bindings, ctx, &mut visitor, 0);
    visitor.finish()
}

/// First declaration `access` refers to.
pub fn resolve_access(access: &Node, ctx: &Context) -> Option<Resolved> {
    let (name, _) = access_name(access)?;
    resolve(
        access,
        None,
        &TypeParameterBindings::default(),
        ctx,
        FirstElementNamed::new(name),
    )
}

pub(crate) fn resolve_at<V: ResolveVisitor>(
    access: &Node,
    receiver: Option<&Type>,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    visitor: &mut V,
    depth: u32,
) -> bool {
    if depth > ctx.max_depth() || ctx.is_cancelled() {
        return false;
    }
    let Some((name, ns)) = access_name(access) else {
        return true;
    };
    trace!(%name, ?ns, kind = ?access.kind(), "resolve");
    match access.kind() {
        NodeKind::QualifiedAccessExpr => {
            let receiver_type = match receiver {
                Some(ty) => ty.clone(),
                None => match QualifiedAccessExpr::cast_ref(access).map(|q| q.receiver()) {
                    Some(Ok(expr)) => expr_type(expr.node(), bindings, ctx, depth + 1),
                    _ => return true,
                },
            };
            // member lookup never happens on the null half of a nullable receiver
            let receiver_type = receiver_type.non_null(ctx.base());
            members::visit_type_members(&receiver_type, ns, ctx, visitor, depth + 1)
        }
        NodeKind::SuperAccessExpr => scope::visit_super(access, ns, bindings, ctx, visitor, depth),
        _ => visit_unqualified(access, ns, bindings, ctx, visitor, depth),
    }
}

/// Member name and namespace of an access expression
pub(crate) fn access_name(node: &Node) -> Option<(SmolStr, Namespace)> {
    let (name, args) = match node.kind() {
        NodeKind::UnqualifiedAccessExpr => {
            let access = UnqualifiedAccessExpr::cast_ref(node)?;
            (access.member_name().ok()?, access.argument_list())
        }
        NodeKind::QualifiedAccessExpr => {
            let access = QualifiedAccessExpr::cast_ref(node)?;
            (access.member_name().ok()?, access.argument_list())
        }
        NodeKind::SuperAccessExpr => {
            let access = SuperAccessExpr::cast_ref(node)?;
            (access.member_name().ok()?, access.argument_list())
        }
        _ => return None,
    };
    Some((name, namespace_of(args.as_ref())))
}

fn namespace_of(args: Option<&ArgumentList>) -> Namespace {
    if args.is_some() {
        Namespace::Method
    } else {
        Namespace::Property
    }
}

#[cfg(test)]
mod tests;
