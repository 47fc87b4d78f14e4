//! IDE features: high-level APIs for LSP handlers.
//!
//! This module provides the interface between the semantic model (HIR)
//! and a language server. Each function corresponds to an LSP request.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take a document, an offset and a [`Context`], return data
//! 2. **No LSP types**: Uses our own types, converted at LSP boundary
//! 3. **Composable**: Built on top of HIR queries
//!
//! ## Usage
//!
//! ```ignore
//! use pklsem::ide::hover;
//! use pklsem::project::Project;
//!
//! let mut project = Project::new(config)?;
//! let doc = project.open("file:///a.pkl", 1, "x = 1\ny = x\n");
//! let ctx = project.context_for("file:///a.pkl")?;
//! let info = hover(&doc, 11.into(), &ctx);
//! ```
//!
//! [`Context`]: crate::hir::Context

mod completion;
mod goto;
mod hover;
mod reference;
pub mod text_utils;

pub use completion::{CompletionItem, CompletionKind, completions};
pub use goto::{GotoResult, GotoTarget, goto_definition};
pub use hover::{HoverResult, hover};

#[cfg(test)]
mod tests;
