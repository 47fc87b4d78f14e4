//! Type system: type values, declared types, inference and subtyping.
//!
//! Every entry point takes a [`Context`](crate::hir::Context) and a set of
//! type parameter bindings. Recursion is bounded by the context's maximum
//! depth; past it the result degrades to [`Type::Unknown`].

mod compute;
mod declared;
mod subtype;
mod this_type;
mod ty;

pub use compute::{compute_expr_type, declaration_type};
pub use declared::{class_self_type, resolve_type};
pub use subtype::is_subtype_of;
pub use this_type::compute_this_type;
pub use ty::{Type, TypeParameterBindings};

pub(crate) use compute::expr_type;
pub(crate) use declared::{function_class_type, superclass};
pub(crate) use subtype::supertype_args;
pub(crate) use this_type::{element_type, this_type_at};
pub(crate) use ty::bind_parameters;
