//! CLI integration tests against a mock resource manager.

mod apply_tests;
mod common;
mod destroy_tests;
mod read_tests;
