//! Test support shared by the workspace crates.
//!
//! Unit tests and integration tests both route their tracing output through
//! [`logging::init`], so `TEST_LOG=debug cargo test` works the same everywhere.

pub mod logging;
