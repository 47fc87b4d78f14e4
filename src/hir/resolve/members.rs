//! Member lookup on types, classes and modules.

use rustc_hash::FxHashSet;
use tracing::debug;

use super::{Namespace, ResolveVisitor};
use crate::ast::{Class, Method, Module, Node, NodeKind, Property, declaration_name};
use crate::hir::types::{Type, TypeParameterBindings, bind_parameters, function_class_type, superclass};
use crate::hir::Context;

/// Offer `element` to `visitor` under its declared name.
pub(crate) fn offer<V: ResolveVisitor>(
    visitor: &mut V,
    element: &Node,
    bindings: &TypeParameterBindings,
) -> bool {
    match declaration_name(element) {
        Some(name) => visitor.visit(&name, element, bindings),
        None => true,
    }
}

/// `module` followed by the modules it amends or extends, transitively.
///
/// Stops at a cycle, at an unresolvable uri, or when the request is cancelled.
pub(crate) fn module_chain(module: &Node, ctx: &Context) -> Vec<Node> {
    let mut chain = Vec::new();
    let mut seen = FxHashSet::default();
    let mut current = Some(module.clone());
    while let Some(node) = current {
        if ctx.is_cancelled() || !seen.insert(node.clone()) {
            break;
        }
        current = Module::cast_ref(&node)
            .and_then(|m| m.extends_amends())
            .and_then(|clause| clause.uri().ok()?.value())
            .and_then(|uri| ctx.resolve_import(node.document(), &uri));
        chain.push(node);
    }
    chain
}

/// Members of a type in namespace `ns`, most specific first.
pub(crate) fn visit_type_members<V: ResolveVisitor>(
    ty: &Type,
    ns: Namespace,
    ctx: &Context,
    visitor: &mut V,
    depth: u32,
) -> bool {
    let base = ctx.base();
    match ty {
        Type::Class { .. } => visit_class_members(ty, ns, ctx, visitor, depth),
        Type::Module { module } => visit_module_members(module, ns, false, ctx, visitor, depth),
        Type::Union(members) => {
            for member in members.iter().filter(|m| !m.is_null(base)) {
                if !visit_type_members(member, ns, ctx, visitor, depth) {
                    return false;
                }
            }
            true
        }
        Type::StringLiteral(_) => visit_class_members(&base.string_type(), ns, ctx, visitor, depth),
        Type::Function { params, ret } => {
            let class_type = function_class_type(params, ret, base);
            visit_class_members(&class_type, ns, ctx, visitor, depth)
        }
        Type::Unknown | Type::Nothing | Type::Variable(_) => true,
    }
}

/// Members of a class type and its superclasses, most derived first.
pub(crate) fn visit_class_members<V: ResolveVisitor>(
    class_type: &Type,
    ns: Namespace,
    ctx: &Context,
    visitor: &mut V,
    depth: u32,
) -> bool {
    let Type::Class { class, args } = class_type else {
        return true;
    };
    let mut current = Some((class.clone(), args.clone()));
    let mut seen = FxHashSet::default();
    while let Some((node, args)) = current {
        if !seen.insert(node.clone()) {
            debug!(class = ?node, "cyclic class hierarchy");
            break;
        }
        let Some(class) = Class::cast_ref(&node) else {
            break;
        };
        let bindings = bind_parameters(&class, &args);
        let members: Vec<Node> = match ns {
            Namespace::Property => class.properties().into_iter().map(Node::from).collect(),
            Namespace::Method => class.methods().into_iter().map(Node::from).collect(),
        };
        for member in &members {
            if !offer(visitor, member, &bindings) {
                return false;
            }
        }
        current = match superclass(&class, &bindings, ctx, depth) {
            Some(Type::Class { class, args }) => Some((class, args)),
            _ => None,
        };
    }
    true
}

/// Members of a module, of the modules it amends or extends, and of the
/// builtin `Module` class. Local members are only offered for `module`
/// itself, and only when `include_local` is set.
pub(crate) fn visit_module_members<V: ResolveVisitor>(
    module: &Node,
    ns: Namespace,
    include_local: bool,
    ctx: &Context,
    visitor: &mut V,
    depth: u32,
) -> bool {
    let bindings = TypeParameterBindings::default();
    for (i, current) in module_chain(module, ctx).iter().enumerate() {
        if ctx.is_cancelled() {
            debug!("module member lookup cancelled");
            return false;
        }
        if !visit_declarations(current, ns, include_local && i == 0, visitor, &bindings) {
            return false;
        }
    }
    visit_class_members(&ctx.base().module_type(), ns, ctx, visitor, depth)
}

/// Top-level declarations of one module, without following its parents.
pub(crate) fn visit_declarations<V: ResolveVisitor>(
    module: &Node,
    ns: Namespace,
    include_local: bool,
    visitor: &mut V,
    bindings: &TypeParameterBindings,
) -> bool {
    let Some(module) = Module::cast_ref(module) else {
        return true;
    };
    for member in module.members() {
        let wanted = match ns {
            Namespace::Property => matches!(
                member.kind(),
                NodeKind::ClassProperty | NodeKind::Class | NodeKind::TypeAlias
            ),
            Namespace::Method => member.kind() == NodeKind::ClassMethod,
        };
        if !wanted || (!include_local && is_local(&member)) {
            continue;
        }
        if !offer(visitor, &member, bindings) {
            return false;
        }
    }
    true
}

fn is_local(member: &Node) -> bool {
    Property::cast_ref(member).is_some_and(|p| p.is_local())
        || Method::cast_ref(member).is_some_and(|m| m.is_local())
}
