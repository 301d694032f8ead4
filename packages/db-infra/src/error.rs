use std::time::Duration;

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbInfraError {
    #[error("Configuration error: {message}")]
    Config { message: String },
    #[error("Driver {driver} is not supported")]
    UnsupportedDriver { driver: String },
    #[error("{operation} did not succeed after {attempts} attempts in {elapsed:?}: {source}")]
    RetryExhausted {
        operation: &'static str,
        attempts: u32,
        elapsed: Duration,
        #[source]
        source: DbErr,
    },
    #[error("{operation} failed with a non-retryable error: {source}")]
    Permanent {
        operation: &'static str,
        #[source]
        source: DbErr,
    },
}

impl DbInfraError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for errors caused by configuration rather than by the server.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::UnsupportedDriver { .. })
    }
}
