//! End-to-end tests for the CLI commands.

pub mod check_test;
pub mod select_test;
