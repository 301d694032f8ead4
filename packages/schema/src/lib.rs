//! Persistent schema of the pipelines API server.
//!
//! Materialization is additive: missing tables are created, existing ones are
//! left untouched, and the run-metric foreign key is declared once. Running it
//! against an already-materialized database is a no-op.

pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DatabaseBackend, DatabaseConnection};
use thiserror::Error;
use tracing::{debug, info};

mod constraints;
mod tables;

pub use constraints::{run_metric_foreign_key, RUN_METRIC_FK};
pub use tables::{
    Experiments, Jobs, Pipelines, ResourceReferences, RunDetails, RunMetrics, TABLES,
};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to materialize table {table}: {source}")]
    Table {
        table: &'static str,
        #[source]
        source: DbErr,
    },
    #[error("failed to declare constraint {name}: {source}")]
    Constraint {
        name: &'static str,
        #[source]
        source: DbErr,
    },
    #[error("constraint {name} is missing and cannot be added to the existing table")]
    ConstraintMissing { name: &'static str },
    #[error("schema materialization is not supported on {backend}")]
    UnsupportedBackend { backend: String },
}

/// Creates every table that is absent, then declares the run-metric foreign key.
pub async fn materialize_schema(db: &DatabaseConnection) -> Result<(), SchemaError> {
    let manager = SchemaManager::new(db);
    let backend = manager.get_database_backend();
    if !matches!(backend, DatabaseBackend::MySql | DatabaseBackend::Sqlite) {
        return Err(SchemaError::UnsupportedBackend {
            backend: format!("{backend:?}"),
        });
    }

    info!(backend = ?backend, tables = TABLES.len(), "schema=materialize start");

    for (table, statement) in tables::create_statements(backend) {
        manager
            .create_table(statement)
            .await
            .map_err(|source| SchemaError::Table { table, source })?;
        debug!(table, "schema=table ready");
    }

    constraints::declare_run_metric_constraint(&manager).await?;

    info!(backend = ?backend, "schema=materialize done");
    Ok(())
}

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
