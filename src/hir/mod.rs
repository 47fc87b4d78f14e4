//! High-level IR (HIR): name resolution, types and analysis.
//!
//! Everything here is a pure query over AST nodes plus a [`Context`]. Nothing
//! is cached on the tree beyond its lazily built children, so results can be
//! recomputed at any time and a changed document simply gets a new tree.
//!
//! ## Key Types
//!
//! - [`Context`]: base module, known modules, cancellation and depth limit
//! - [`BaseModule`]: builtin classes and functions from `pkl:base`
//! - [`Type`]: static types; [`TypeParameterBindings`] for generics
//! - [`ResolveVisitor`]: first-match or collect-all lookup strategies
//! - [`DiagnosticsRunner`]: drives [`Analyzer`]s over a document
//!
//! ## Query Layers
//!
//! ```text
//! resolve_type_name(name)          ← type names in annotations
//!     │
//!     ▼
//! resolve_type(type node)          ← declared types
//!     │
//!     ▼
//! resolve(access, visitor)         ← identifiers, members, super
//!     │                ▲
//!     ▼                │
//! compute_expr_type / compute_this_type
//!     │
//!     ▼
//! is_subtype_of                    ← analyzers, ide
//! ```

mod base_module;
mod context;
mod diagnostics;
mod messages;

pub mod analyzers;
pub mod resolve;
pub mod types;

pub use analyzers::{AnalysisReport, Analyzer, AnnotationAnalyzer, DiagnosticsRunner, SyntaxAnalyzer};
pub use base_module::{BASE_URI, BaseModule};
pub use context::{Context, DEFAULT_MAX_DEPTH, join_uri};
pub use diagnostics::{Diagnostic, Severity};
pub use messages::MessageCatalog;
pub use resolve::{
    CollectAll, ElementsNamed, FirstElementNamed, Namespace, ResolveVisitor, Resolved, resolve,
    resolve_access, resolve_type_name,
};
pub use types::{
    Type, TypeParameterBindings, class_self_type, compute_expr_type, compute_this_type,
    declaration_type, is_subtype_of, resolve_type,
};
