//! HIR layer tests
//!
//! Name resolution, type computation and analyzers driven through the
//! public API, including resolution across documents.

mod tests_analyzers;
mod tests_resolve;
mod tests_types;
