//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod pkl_helpers;
pub mod source_fixtures;
