//! Foundation types for the pklsem toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`] - Identifiers for parsed documents
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`], [`Span`] - Line/column positions for diagnostics
//!
//! This module has NO dependencies on other pklsem modules.

mod file_id;
mod line_index;
mod position;

pub use file_id::FileId;
pub use line_index::{LineCol, LineIndex};
pub use position::{Position, Span};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
