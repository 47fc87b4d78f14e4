//! IDE feature tests
//!
//! Completion, hover and goto-definition against documents held by a
//! [`pklsem::project::Project`], the way a language server drives them.

mod tests_features;
