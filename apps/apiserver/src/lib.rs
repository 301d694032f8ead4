#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod bootstrap;
pub mod config;
pub mod entities;
pub mod error;
pub mod infra;
pub mod orchestration;
pub mod state;
pub mod storage;
pub mod util;

// Re-exports for public API
pub use config::{BootstrapSettings, ConfigResolver, EnvConfig, MapConfig};
pub use error::{BootstrapError, FailureKind};
pub use infra::state::{build_manager, ManagerBuilder};
pub use state::client_manager::ClientManager;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
