//! Integration tests for the mkpkg binary.

mod build_tests;
mod common;
