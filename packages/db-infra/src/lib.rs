//! Shared database bootstrap infrastructure.
//! Connection targets, bounded exponential backoff and connection
//! establishment used by the apiserver before any store is handed out.

pub mod config;
pub mod error;
pub mod infra;

pub use config::db::{ConnectionTarget, DbDriver, SqliteLocation, DEFAULT_DB_NAME};
pub use error::DbInfraError;
pub use infra::db::backoff::{retry_with_backoff, retry_with_predicate, BackoffPolicy, RetryError};
pub use infra::db::core::{
    ensure_database_exists, establish_connection, is_connection_string_error, is_transient,
    redact_credentials, redact_db_err, sanitize_db_url, DbConnector, SeaOrmConnector,
};

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
