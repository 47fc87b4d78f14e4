//! Parser layer tests
//!
//! Tests for the syntax adapter as seen through the AST:
//! - Error-free parsing of representative modules
//! - Operator precedence
//! - Recovery from malformed input

mod tests_parse;
