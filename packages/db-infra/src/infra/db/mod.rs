pub mod backoff;
pub mod core;

pub use backoff::{retry_with_backoff, retry_with_predicate, BackoffPolicy, RetryError};
pub use core::{ensure_database_exists, establish_connection, DbConnector, SeaOrmConnector};
