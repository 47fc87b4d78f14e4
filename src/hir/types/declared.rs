//! Types written in source: annotations, supertypes, aliases.

use tracing::trace;

use super::{Type, TypeParameterBindings};
use crate::ast::{
    Class, DeclaredType, FunctionType, NodeKind, NullableType, ParenthesizedType,
    StringLiteralType, TypeAlias, TypeNode, UnionType,
};
use crate::hir::resolve::resolve_type_name;
use crate::hir::{BaseModule, Context};

/// Type denoted by a type annotation.
pub fn resolve_type(node: &TypeNode, bindings: &TypeParameterBindings, ctx: &Context) -> Type {
    resolve_type_at(node, bindings, ctx, 0)
}

pub(crate) fn resolve_type_at(
    node: &TypeNode,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    depth: u32,
) -> Type {
    if depth > ctx.max_depth() {
        trace!("type resolution depth exceeded");
        return Type::Unknown;
    }
    let base = ctx.base();
    let node = node.node();
    match node.kind() {
        NodeKind::UnknownType => Type::Unknown,
        NodeKind::NothingType => Type::Nothing,
        NodeKind::ModuleType => match node.ancestors().last() {
            Some(root) => Type::module(root),
            None => Type::Unknown,
        },
        NodeKind::StringLiteralType => StringLiteralType::cast_ref(node)
            .and_then(|t| t.value())
            .map(|text| Type::StringLiteral(text.into()))
            .unwrap_or_else(|| base.string_type()),
        NodeKind::NullableType => NullableType::cast_ref(node)
            .and_then(|t| t.inner().ok())
            .map(|inner| resolve_type_at(&inner, bindings, ctx, depth + 1).nullable(base))
            .unwrap_or(Type::Unknown),
        NodeKind::ParenthesizedType => ParenthesizedType::cast_ref(node)
            .and_then(|t| t.inner().ok())
            .map(|inner| resolve_type_at(&inner, bindings, ctx, depth + 1))
            .unwrap_or(Type::Unknown),
        NodeKind::UnionType => match UnionType::cast_ref(node) {
            Some(union) => Type::union_of(
                union
                    .members()
                    .iter()
                    .map(|m| resolve_type_at(m, bindings, ctx, depth + 1)),
            ),
            None => Type::Unknown,
        },
        NodeKind::FunctionType => match FunctionType::cast_ref(node) {
            Some(function) => {
                let params = function
                    .parameter_types()
                    .iter()
                    .map(|p| resolve_type_at(p, bindings, ctx, depth + 1))
                    .collect();
                let ret = function
                    .return_type()
                    .map(|r| resolve_type_at(&r, bindings, ctx, depth + 1))
                    .unwrap_or(Type::Unknown);
                Type::function(params, ret)
            }
            None => Type::Unknown,
        },
        NodeKind::DeclaredType => match DeclaredType::cast_ref(node) {
            Some(declared) => resolve_declared(&declared, bindings, ctx, depth),
            None => Type::Unknown,
        },
        _ => Type::Unknown,
    }
}

fn resolve_declared(
    declared: &DeclaredType,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    depth: u32,
) -> Type {
    let Ok(name) = declared.name() else {
        return Type::Unknown;
    };
    let Some(target) = resolve_type_name(&name, ctx) else {
        return Type::Unknown;
    };
    let args: Vec<Type> = declared
        .type_arguments()
        .iter()
        .map(|a| resolve_type_at(a, bindings, ctx, depth + 1))
        .collect();
    match target.kind() {
        NodeKind::Class => Type::class(target, args),
        NodeKind::TypeAlias => match TypeAlias::cast_ref(&target) {
            Some(alias) => expand_alias(&alias, &args, ctx, depth),
            None => Type::Unknown,
        },
        NodeKind::TypeParameter => bindings
            .get(&target)
            .cloned()
            .unwrap_or(Type::Variable(target)),
        NodeKind::Module => Type::module(target),
        _ => Type::Unknown,
    }
}

/// Aliased type with the alias parameters bound to `args`
fn expand_alias(alias: &TypeAlias, args: &[Type], ctx: &Context, depth: u32) -> Type {
    let Ok(aliased) = alias.aliased_type() else {
        return Type::Unknown;
    };
    let bindings: TypeParameterBindings = alias
        .type_parameters()
        .into_iter()
        .zip(args)
        .map(|(param, arg)| (param.node().clone(), arg.clone()))
        .collect();
    resolve_type_at(&aliased, &bindings, ctx, depth + 1)
}

/// Type of `this` inside a class body: the class applied to its own
/// parameters.
pub fn class_self_type(class: &Class) -> Type {
    let args = class
        .type_parameters()
        .into_iter()
        .map(|p| Type::Variable(p.node().clone()))
        .collect();
    Type::class(class.node().clone(), args)
}

/// Direct superclass of `class`, with `bindings` applied.
///
/// Classes outside the base module without an `extends` clause extend
/// `Typed`; base classes without one have no superclass.
pub(crate) fn superclass(
    class: &Class,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    depth: u32,
) -> Option<Type> {
    match class.supertype() {
        Some(supertype) => Some(resolve_type_at(&supertype, bindings, ctx, depth + 1)),
        None if ctx.base().contains(class.node()) => None,
        None => Some(ctx.base().typed_type()),
    }
}

/// Builtin class type a function type is an instance of.
pub(crate) fn function_class_type(params: &[Type], ret: &Type, base: &BaseModule) -> Type {
    let mut args = params.to_vec();
    args.push(ret.clone());
    match params.len() {
        0 => base.generic_type("Function0", args),
        1 => base.generic_type("Function1", args),
        2 => base.generic_type("Function2", args),
        _ => base.generic_type("Function", vec![ret.clone()]),
    }
}
