//! # pklsem
//!
//! Semantic core for Pkl language tooling: parsing, AST, name resolution,
//! type computation and analyzers.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Open documents, versions, cancellation, config, loader
//!   ↓
//! ide       → IDE features (completion, hover, goto-def)
//!   ↓
//! hir       → Resolver, types, base module, analyzers
//!   ↓
//! ast       → Typed node handles over a per-document arena
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, rowan tree
//!   ↓
//! base      → Primitives (FileId, LineIndex, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → ast → hir → ide → project)
// ============================================================================

/// Foundation types: FileId, line index, TextRange
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, lossless syntax tree
pub mod parser;

/// AST: per-document node arena and typed wrappers
pub mod ast;

/// High-level IR: resolution, types, diagnostics
pub mod hir;

/// IDE features: completion, hover, goto-definition
pub mod ide;

/// Project management: document store and directory loading
pub mod project;

mod error;

pub use error::{Error, Result};

// Re-export foundation types
pub use base::{FileId, LineCol, LineIndex, Position, Span, TextRange, TextSize};
