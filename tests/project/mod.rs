//! Project tests
//!
//! Loading modules from disk and analyzing them as a project.

mod tests_loader;
