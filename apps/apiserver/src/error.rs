use db_infra::DbInfraError;
use schema::SchemaError;
use thiserror::Error;

use crate::storage::object_store::ObjectStoreError;

/// Coarse classification of a bootstrap failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A dependency stayed unreachable for the whole retry budget.
    RetryExhausted,
    /// Missing, malformed or unsupported configuration. Never retried.
    Config,
    /// A dependency was reachable but could not be prepared for use.
    Provisioning,
}

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Database unavailable: {source}")]
    DbUnavailable {
        #[source]
        source: DbInfraError,
    },
    #[error("Database error: {source}")]
    Db {
        #[source]
        source: DbInfraError,
    },
    #[error("Schema error: {source}")]
    Schema {
        #[from]
        source: SchemaError,
    },
    #[error("Object store error: {source}")]
    ObjectStore {
        #[from]
        source: ObjectStoreError,
    },
    #[error("Failed to create {client} client: {detail}")]
    Orchestration {
        client: &'static str,
        detail: String,
    },
    #[error("Shutdown error: {detail}")]
    Shutdown { detail: String },
}

impl BootstrapError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn orchestration(client: &'static str, detail: impl Into<String>) -> Self {
        Self::Orchestration {
            client,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            BootstrapError::Config { .. } => FailureKind::Config,
            BootstrapError::DbUnavailable { .. } => FailureKind::RetryExhausted,
            BootstrapError::Db { .. }
            | BootstrapError::Schema { .. }
            | BootstrapError::ObjectStore { .. }
            | BootstrapError::Orchestration { .. }
            | BootstrapError::Shutdown { .. } => FailureKind::Provisioning,
        }
    }

    /// Stable machine-readable code, logged next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            BootstrapError::Config { .. } => "CONFIG_ERROR",
            BootstrapError::DbUnavailable { .. } => "DB_UNAVAILABLE",
            BootstrapError::Db { .. } => "DB_ERROR",
            BootstrapError::Schema { .. } => "SCHEMA_ERROR",
            BootstrapError::ObjectStore { .. } => "OBJECT_STORE_ERROR",
            BootstrapError::Orchestration { .. } => "ORCHESTRATION_CLIENT_ERROR",
            BootstrapError::Shutdown { .. } => "SHUTDOWN_ERROR",
        }
    }
}

impl From<DbInfraError> for BootstrapError {
    fn from(err: DbInfraError) -> Self {
        match err {
            e if e.is_config() => BootstrapError::config(e.to_string()),
            e @ DbInfraError::RetryExhausted { .. } => BootstrapError::DbUnavailable { source: e },
            e => BootstrapError::Db { source: e },
        }
    }
}
