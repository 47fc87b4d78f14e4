//! Subtype checks.

use rustc_hash::FxHashSet;

use super::declared::{function_class_type, superclass};
use super::{Type, bind_parameters};
use crate::ast::{Class, Node, Variance};
use crate::hir::Context;
use crate::hir::resolve::module_chain;

/// Whether `sub` is a subtype of `sup`.
///
/// Classes are compared nominally along the superclass chain, with type
/// arguments checked by declared variance. Unions, nullable types, string
/// literal types and function types are compared structurally. `unknown` is
/// compatible in both directions. The relation is reflexive and transitive.
pub fn is_subtype_of(sub: &Type, sup: &Type, ctx: &Context) -> bool {
    subtype(sub, sup, ctx, 0)
}

fn subtype(sub: &Type, sup: &Type, ctx: &Context, depth: u32) -> bool {
    if sub == sup {
        return true;
    }
    if depth > ctx.max_depth() {
        return true;
    }
    let base = ctx.base();
    match (sub, sup) {
        (Type::Unknown, _) | (_, Type::Unknown) => true,
        (Type::Nothing, _) => true,
        (_, Type::Nothing) => false,
        (Type::Union(members), _) => members.iter().all(|m| subtype(m, sup, ctx, depth + 1)),
        (_, Type::Union(members)) => members.iter().any(|m| subtype(sub, m, ctx, depth + 1)),
        (Type::Variable(_), _) | (_, Type::Variable(_)) => true,
        (_, Type::Class { class, .. }) if base.is_class(class, "Any") => true,
        (Type::StringLiteral(_), Type::Class { .. }) => subtype(&base.string_type(), sup, ctx, depth + 1),
        (Type::Class { .. }, Type::Class { class: target, args: target_args }) => {
            match supertype_args_of(sub, target, ctx, depth) {
                Some(args) => arguments_conform(&args, target_args, target, ctx, depth),
                None => false,
            }
        }
        (Type::Module { module }, Type::Module { module: target }) => {
            module_chain(module, ctx).contains(target)
        }
        (Type::Module { .. }, Type::Class { .. }) => subtype(&base.module_type(), sup, ctx, depth + 1),
        (
            Type::Function { params, ret },
            Type::Function {
                params: sup_params,
                ret: sup_ret,
            },
        ) => {
            params.len() == sup_params.len()
                && sup_params
                    .iter()
                    .zip(params)
                    .all(|(s, p)| subtype(s, p, ctx, depth + 1))
                && subtype(ret, sup_ret, ctx, depth + 1)
        }
        (Type::Function { params, ret }, Type::Class { .. }) => {
            subtype(&function_class_type(params, ret, base), sup, ctx, depth + 1)
        }
        _ => false,
    }
}

/// Compare the arguments `sub` has for `target` with the arguments of `sup`.
fn arguments_conform(
    actual: &[Type],
    expected: &[Type],
    target: &Node,
    ctx: &Context,
    depth: u32,
) -> bool {
    if actual.is_empty() || expected.is_empty() {
        return true;
    }
    let variances: Vec<Variance> = Class::cast_ref(target)
        .map(|c| c.type_parameters().iter().map(|p| p.variance()).collect())
        .unwrap_or_default();
    actual.iter().zip(expected).enumerate().all(|(i, (a, e))| {
        match variances.get(i).copied().unwrap_or(Variance::Invariant) {
            Variance::Covariant => subtype(a, e, ctx, depth + 1),
            Variance::Contravariant => subtype(e, a, ctx, depth + 1),
            Variance::Invariant => subtype(a, e, ctx, depth + 1) && subtype(e, a, ctx, depth + 1),
        }
    })
}

/// Type arguments `ty` supplies to the builtin class `class_name` when
/// viewed as that class; `None` if `ty` does not extend it.
pub(crate) fn supertype_args(ty: &Type, class_name: &str, ctx: &Context) -> Option<Vec<Type>> {
    let target = ctx.base().class(class_name)?.node().clone();
    supertype_args_of(ty, &target, ctx, 0)
}

/// Walk the superclass chain of a class type up to `target`.
fn supertype_args_of(ty: &Type, target: &Node, ctx: &Context, depth: u32) -> Option<Vec<Type>> {
    let Type::Class { class, args } = ty else {
        return None;
    };
    let mut current = (class.clone(), args.clone());
    let mut seen = FxHashSet::default();
    loop {
        if &current.0 == target {
            return Some(current.1);
        }
        if !seen.insert(current.0.clone()) {
            return None;
        }
        let class = Class::cast_ref(&current.0)?;
        let bindings = bind_parameters(&class, &current.1);
        match superclass(&class, &bindings, ctx, depth + 1)? {
            Type::Class { class, args } => current = (class, args),
            _ => return None,
        }
    }
}
