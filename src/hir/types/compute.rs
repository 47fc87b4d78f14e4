//! Static types of expressions and declarations.

use tracing::trace;

use super::declared::{class_self_type, resolve_type_at};
use super::subtype::supertype_args;
use super::this_type::{element_type, expected_type, this_type_at};
use super::{Type, TypeParameterBindings};
use crate::ast::{
    BinaryExpr, Class, Expr, ForGenerator, FunctionLiteral, IfExpr, ImportClause, ImportExpr,
    LetExpr, Method, NewExpr, Node, NodeKind, Parameter, Property, QualifiedAccessExpr,
    ReadExpr, SubscriptExpr, TypeTestExpr, TypedIdentifier,
};
use crate::hir::resolve::{
    ElementsNamed, FirstElementNamed, Namespace, ResolveVisitor, Resolved, access_name,
    import_clause_target, resolve_at, visit_type_members,
};
use crate::hir::Context;

/// Static type of an expression.
///
/// Pure: calling it twice on the same node yields equal types and leaves the
/// tree untouched apart from lazily built children.
pub fn compute_expr_type(expr: &Expr, bindings: &TypeParameterBindings, ctx: &Context) -> Type {
    expr_type(expr.node(), bindings, ctx, 0)
}

/// Declared or inferred type of a declaration found by the resolver.
pub fn declaration_type(node: &Node, bindings: &TypeParameterBindings, ctx: &Context) -> Type {
    decl_type(node, bindings, ctx, 0)
}

pub(crate) fn expr_type(
    node: &Node,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    depth: u32,
) -> Type {
    if depth > ctx.max_depth() {
        trace!(node = ?node, "expression type depth exceeded");
        return Type::Unknown;
    }
    let base = ctx.base();
    let sub = |child: &Node| expr_type(child, bindings, ctx, depth + 1);
    let child_expr = |n: usize| -> Option<Node> {
        node.children().into_iter().filter(|c| c.kind().is_expr()).nth(n)
    };

    match node.kind() {
        NodeKind::NullLiteral => base.null_type(),
        NodeKind::TrueLiteral | NodeKind::FalseLiteral => base.boolean_type(),
        NodeKind::IntLiteral => base.int_type(),
        NodeKind::FloatLiteral => base.float_type(),
        NodeKind::StringLiteral | NodeKind::MlStringLiteral => base.string_type(),
        NodeKind::ThisExpr => this_type_at(node, bindings, ctx, depth + 1),
        NodeKind::OuterExpr => outer_type(node, bindings, ctx, depth),
        NodeKind::ModuleExpr => match node.ancestors().last() {
            Some(root) => Type::module(root),
            None => Type::Unknown,
        },
        NodeKind::ThrowExpr => Type::Nothing,
        NodeKind::TraceExpr | NodeKind::ParenthesizedExpr => {
            child_expr(0).map(|e| sub(&e)).unwrap_or(Type::Unknown)
        }
        NodeKind::ImportExpr => import_expr_type(node, ctx),
        NodeKind::ReadExpr => read_type(node, ctx),
        NodeKind::UnqualifiedAccessExpr
        | NodeKind::QualifiedAccessExpr
        | NodeKind::SuperAccessExpr => access_type(node, bindings, ctx, depth),
        NodeKind::SubscriptExpr => {
            let Some(subscript) = SubscriptExpr::cast_ref(node) else {
                return Type::Unknown;
            };
            match subscript.receiver() {
                Ok(receiver) => operator_type(&sub(receiver.node()), "[]", ctx, depth),
                Err(_) => Type::Unknown,
            }
        }
        NodeKind::SuperSubscriptExpr => {
            let this = this_type_at(node, bindings, ctx, depth + 1);
            operator_type(&this, "[]", ctx, depth)
        }
        NodeKind::NonNullExpr => child_expr(0)
            .map(|e| sub(&e).non_null(base))
            .unwrap_or(Type::Unknown),
        NodeKind::UnaryMinusExpr => child_expr(0).map(|e| sub(&e)).unwrap_or(Type::Unknown),
        NodeKind::LogicalNotExpr => {
            let ty = child_expr(0)
                .map(|e| operator_type(&sub(&e), "!", ctx, depth))
                .unwrap_or(Type::Unknown);
            if ty.is_unknown() { base.boolean_type() } else { ty }
        }
        NodeKind::AdditiveExpr
        | NodeKind::MultiplicativeExpr
        | NodeKind::ExponentiationExpr
        | NodeKind::ComparisonExpr
        | NodeKind::EqualityExpr
        | NodeKind::LogicalAndExpr
        | NodeKind::LogicalOrExpr => binary_operator_type(node, bindings, ctx, depth),
        NodeKind::NullCoalesceExpr => {
            let left = child_expr(0).map(|e| sub(&e)).unwrap_or(Type::Unknown);
            let right = child_expr(1).map(|e| sub(&e)).unwrap_or(Type::Unknown);
            left.non_null(base).union(right)
        }
        NodeKind::PipeExpr => {
            let function = child_expr(1).map(|e| sub(&e)).unwrap_or(Type::Unknown);
            function_result(&function, ctx)
        }
        NodeKind::TypeTestExpr => match TypeTestExpr::cast_ref(node) {
            Some(test) if test.is_cast() => match test.type_node() {
                Ok(ty) => resolve_type_at(&ty, bindings, ctx, depth + 1),
                Err(_) => Type::Unknown,
            },
            _ => base.boolean_type(),
        },
        NodeKind::IfExpr => {
            let Some(if_expr) = IfExpr::cast_ref(node) else {
                return Type::Unknown;
            };
            let then = if_expr.then_expr().map(|e| sub(e.node())).unwrap_or(Type::Unknown);
            let otherwise = if_expr.else_expr().map(|e| sub(e.node())).unwrap_or(Type::Unknown);
            then.union(otherwise)
        }
        NodeKind::LetExpr => LetExpr::cast_ref(node)
            .and_then(|l| l.body().ok())
            .map(|body| sub(body.node()))
            .unwrap_or(Type::Unknown),
        NodeKind::FunctionLiteral => {
            let Some(function) = FunctionLiteral::cast_ref(node) else {
                return Type::Unknown;
            };
            let params = function
                .parameters()
                .iter()
                .map(|p| match p.declared_type() {
                    Some(ty) => resolve_type_at(&ty, bindings, ctx, depth + 1),
                    None => Type::Unknown,
                })
                .collect();
            let ret = function.body().map(|b| sub(b.node())).unwrap_or(Type::Unknown);
            Type::function(params, ret)
        }
        NodeKind::NewExpr => match NewExpr::cast_ref(node).and_then(|n| n.type_node()) {
            Some(ty) => resolve_type_at(&ty, bindings, ctx, depth + 1),
            None => expected_type(node, bindings, ctx, depth + 1),
        },
        NodeKind::AmendExpr => child_expr(0).map(|e| sub(&e)).unwrap_or(Type::Unknown),
        _ => Type::Unknown,
    }
}

/// Type of the declaration an access expression resolves to
fn access_type(node: &Node, bindings: &TypeParameterBindings, ctx: &Context, depth: u32) -> Type {
    let base = ctx.base();
    let Some((name, _)) = access_name(node) else {
        return Type::Unknown;
    };

    if let Some(qualified) = QualifiedAccessExpr::cast_ref(node) {
        let Ok(receiver) = qualified.receiver() else {
            return Type::Unknown;
        };
        let receiver_type = expr_type(receiver.node(), bindings, ctx, depth + 1);
        if qualified.is_null_safe() {
            // `null?.x` is null; otherwise look up on the non-null part
            if receiver_type.is_null(base) {
                return base.null_type();
            }
            let receiver_type = receiver_type.non_null(base);
            return member_type(node, &name, &receiver_type, bindings, ctx, depth).nullable(base);
        }
        return member_type(node, &name, &receiver_type, bindings, ctx, depth);
    }

    let mut visitor = FirstElementNamed::new(name);
    resolve_at(node, None, bindings, ctx, &mut visitor, depth + 1);
    match visitor.finish() {
        Some(resolved) => resolved_type(&resolved, ctx, depth),
        None => Type::Unknown,
    }
}

fn member_type(
    node: &Node,
    name: &str,
    receiver: &Type,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    depth: u32,
) -> Type {
    let mut visitor = FirstElementNamed::new(name);
    resolve_at(node, Some(receiver), bindings, ctx, &mut visitor, depth + 1);
    match visitor.finish() {
        Some(resolved) => resolved_type(&resolved, ctx, depth),
        None => Type::Unknown,
    }
}

fn resolved_type(resolved: &Resolved, ctx: &Context, depth: u32) -> Type {
    decl_type(&resolved.node, &resolved.bindings, ctx, depth + 1)
}

/// Return type of the operator method `op` on `receiver`
fn operator_type(receiver: &Type, op: &str, ctx: &Context, depth: u32) -> Type {
    let mut visitor = FirstElementNamed::new(op);
    visit_type_members(receiver, Namespace::Method, ctx, &mut visitor, depth + 1);
    match visitor.finish() {
        Some(resolved) => resolved_type(&resolved, ctx, depth),
        None => Type::Unknown,
    }
}

fn binary_operator_type(
    node: &Node,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    depth: u32,
) -> Type {
    let Some(binary) = BinaryExpr::cast_ref(node) else {
        return Type::Unknown;
    };
    let (Ok(left), Ok(op)) = (binary.left(), binary.operator()) else {
        return Type::Unknown;
    };
    let left_type = expr_type(left.node(), bindings, ctx, depth + 1);
    let ty = operator_type(&left_type, &op.text, ctx, depth);
    if ty.is_unknown() && yields_boolean(node.kind()) {
        ctx.base().boolean_type()
    } else {
        ty
    }
}

/// Operators whose result is `Boolean` when the left operand has no such member
fn yields_boolean(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::ComparisonExpr
            | NodeKind::EqualityExpr
            | NodeKind::LogicalAndExpr
            | NodeKind::LogicalOrExpr
    )
}

/// Result type of applying a function value
fn function_result(function: &Type, ctx: &Context) -> Type {
    match function {
        Type::Function { ret, .. } => (**ret).clone(),
        Type::Class { .. } => supertype_args(function, "Function", ctx)
            .and_then(|args| args.first().cloned())
            .unwrap_or(Type::Unknown),
        _ => Type::Unknown,
    }
}

/// `outer` refers to the receiver one object level out
fn outer_type(node: &Node, bindings: &TypeParameterBindings, ctx: &Context, depth: u32) -> Type {
    let Some(body) = node.ancestors().find(|a| a.kind() == NodeKind::ObjectBody) else {
        return Type::Unknown;
    };
    match body.parent() {
        Some(owner) => match owner.parent() {
            Some(scope) => this_type_at(&scope, bindings, ctx, depth + 1),
            None => Type::Unknown,
        },
        None => Type::Unknown,
    }
}

fn import_expr_type(node: &Node, ctx: &Context) -> Type {
    let Some(import) = ImportExpr::cast_ref(node) else {
        return Type::Unknown;
    };
    if import.is_glob() {
        let base = ctx.base();
        return base.generic_type("Mapping", vec![base.string_type(), base.module_type()]);
    }
    import
        .uri()
        .and_then(|uri| uri.value())
        .and_then(|uri| ctx.resolve_import(node.document(), &uri))
        .map(Type::module)
        .unwrap_or(Type::Unknown)
}

fn read_type(node: &Node, ctx: &Context) -> Type {
    let base = ctx.base();
    match ReadExpr::cast_ref(node) {
        Some(read) if read.is_glob() => {
            base.generic_type("Mapping", vec![base.string_type(), base.resource_type()])
        }
        Some(read) if read.is_nullable() => base.resource_type().nullable(base),
        Some(_) => base.resource_type(),
        None => Type::Unknown,
    }
}

// ============================================================================
// Declarations
// ============================================================================

pub(crate) fn decl_type(
    node: &Node,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    depth: u32,
) -> Type {
    if depth > ctx.max_depth() {
        return Type::Unknown;
    }
    let base = ctx.base();
    match node.kind() {
        NodeKind::ClassProperty | NodeKind::ObjectProperty => {
            let Some(property) = Property::cast_ref(node) else {
                return Type::Unknown;
            };
            let ty = property_type(&property, bindings, ctx, depth + 1);
            if !ty.is_unknown() {
                return ty;
            }
            match property.expr() {
                Some(expr) => expr_type(expr.node(), bindings, ctx, depth + 1),
                None if property.is_amend() => base.dynamic_type(),
                None => Type::Unknown,
            }
        }
        NodeKind::ClassMethod | NodeKind::ObjectMethod => {
            let Some(method) = Method::cast_ref(node) else {
                return Type::Unknown;
            };
            match (method.return_type(), method.body()) {
                (Some(ret), _) => resolve_type_at(&ret, bindings, ctx, depth + 1),
                (None, Some(body)) => expr_type(body.node(), bindings, ctx, depth + 1),
                (None, None) => Type::Unknown,
            }
        }
        NodeKind::Parameter => match Parameter::cast_ref(node) {
            Some(param) => parameter_type(&param, bindings, ctx, depth),
            None => Type::Unknown,
        },
        NodeKind::TypedIdentifier => {
            let declared = TypedIdentifier::cast_ref(node).and_then(|t| t.declared_type());
            match (declared, node.parent().and_then(Parameter::cast)) {
                (Some(ty), _) => resolve_type_at(&ty, bindings, ctx, depth + 1),
                (None, Some(param)) => parameter_type(&param, bindings, ctx, depth),
                (None, None) => Type::Unknown,
            }
        }
        NodeKind::Class => match Class::cast_ref(node) {
            Some(class) => base.generic_type("Class", vec![class_self_type(&class)]),
            None => Type::Unknown,
        },
        NodeKind::TypeAlias => base.class_type("TypeAlias"),
        NodeKind::ImportClause => match ImportClause::cast_ref(node) {
            Some(clause) if clause.is_glob() => {
                base.generic_type("Mapping", vec![base.string_type(), base.module_type()])
            }
            Some(clause) => import_clause_target(&clause, ctx)
                .map(Type::module)
                .unwrap_or(Type::Unknown),
            None => Type::Unknown,
        },
        NodeKind::Module => Type::module(node.clone()),
        _ => Type::Unknown,
    }
}

/// Declared type of a property, or the declared type of the property it
/// overrides or amends. Unknown if neither is annotated.
pub(crate) fn property_type(
    property: &Property,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    depth: u32,
) -> Type {
    if depth > ctx.max_depth() {
        return Type::Unknown;
    }
    if let Some(declared) = property.declared_type() {
        return resolve_type_at(&declared, bindings, ctx, depth + 1);
    }
    let (Ok(name), Some(scope)) = (property.name(), property.node().parent()) else {
        return Type::Unknown;
    };
    let owner = this_type_at(&scope, bindings, ctx, depth + 1);
    let mut visitor = ElementsNamed::new(name);
    visit_type_members(&owner, Namespace::Property, ctx, &mut visitor, depth + 1);
    visitor
        .finish()
        .into_iter()
        .filter(|r| &r.node != property.node())
        .find_map(|r| {
            let declared = Property::cast_ref(&r.node)?.declared_type()?;
            Some(resolve_type_at(&declared, &r.bindings, ctx, depth + 1))
        })
        .unwrap_or(Type::Unknown)
}

/// Declared type of a parameter, else the type its binding site implies
fn parameter_type(
    param: &Parameter,
    bindings: &TypeParameterBindings,
    ctx: &Context,
    depth: u32,
) -> Type {
    if let Some(declared) = param.declared_type() {
        return resolve_type_at(&declared, bindings, ctx, depth + 1);
    }
    let Some(site) = param.node().parent() else {
        return Type::Unknown;
    };
    match site.kind() {
        NodeKind::LetExpr => LetExpr::cast_ref(&site)
            .and_then(|l| l.var_expr().ok())
            .map(|e| expr_type(e.node(), bindings, ctx, depth + 1))
            .unwrap_or(Type::Unknown),
        NodeKind::ForGenerator => {
            let Some(generator) = ForGenerator::cast_ref(&site) else {
                return Type::Unknown;
            };
            let iterable = generator
                .iterable()
                .map(|e| expr_type(e.node(), bindings, ctx, depth + 1))
                .unwrap_or(Type::Unknown);
            let is_key = generator.key_parameter().is_some_and(|k| &k == param);
            iteration_type(&iterable, is_key, ctx)
        }
        _ => Type::Unknown,
    }
}

/// Key or value type when iterating over `iterable` in a `for` generator
fn iteration_type(iterable: &Type, key: bool, ctx: &Context) -> Type {
    let base = ctx.base();
    for name in ["Mapping", "Map"] {
        if let Some(args) = supertype_args(iterable, name, ctx) {
            let index = if key { 0 } else { 1 };
            return args.get(index).cloned().unwrap_or(Type::Unknown);
        }
    }
    if key {
        return base.int_type();
    }
    element_type(iterable, ctx)
}
