//! Crate-level error type.

use thiserror::Error;

use crate::ast::AstError;

/// Failures surfaced by the project layer and the analysis driver.
///
/// Unresolved names and unknown types are not errors; they are ordinary
/// query results.
#[derive(Debug, Error)]
pub enum Error {
    /// The request was superseded by a newer document version.
    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Ast(#[from] AstError),

    #[error("unknown document: {0}")]
    UnknownDocument(String),

    /// The base module lacks a class the type system relies on.
    #[error("base module is missing builtin `{0}`")]
    MissingBuiltin(&'static str),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
