//! Rowan-based parser for Pkl
//!
//! This module provides a lossless parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! CstNode → positioned, thread-safe view with child slots and error markers
//!     ↓
//! AST layer → arena of typed nodes
//! ```
//!
//! Closing delimiters of parenthesized constructs are optional slots in the
//! tree: a missing closer is left for the semantic layer to report, while
//! stray tokens are captured in `ERROR` nodes.

#[allow(clippy::module_inception)]
mod parser;

mod cst;
pub mod grammar;
mod lexer;
mod syntax_kind;

pub use cst::{CstElement, CstNode, CstToken};
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, SyntaxError, parse};
pub use syntax_kind::{PklLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
