use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use tracing::{debug, info, warn};

use crate::tables::{RunDetails, RunMetrics};
use crate::SchemaError;

pub const RUN_METRIC_FK: &str = "fk_run_metrics_run_details";

/// Run metrics follow their run: deleting or re-keying a run cascades.
pub fn run_metric_foreign_key() -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(RUN_METRIC_FK)
        .from(RunMetrics::Table, RunMetrics::RunUuid)
        .to(RunDetails::Table, RunDetails::Uuid)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

pub(crate) async fn declare_run_metric_constraint(
    manager: &SchemaManager<'_>,
) -> Result<(), SchemaError> {
    match manager.get_database_backend() {
        DatabaseBackend::MySql => declare_on_mysql(manager).await,
        DatabaseBackend::Sqlite => verify_on_sqlite(manager).await,
        other => Err(SchemaError::UnsupportedBackend {
            backend: format!("{other:?}"),
        }),
    }
}

async fn declare_on_mysql(manager: &SchemaManager<'_>) -> Result<(), SchemaError> {
    if mysql_constraint_exists(manager).await? {
        debug!(constraint = RUN_METRIC_FK, "schema=constraint present");
        return Ok(());
    }

    if let Err(source) = manager.create_foreign_key(run_metric_foreign_key()).await {
        // Another replica may have declared it between the check and the create.
        if mysql_constraint_exists(manager).await? {
            warn!(constraint = RUN_METRIC_FK, error = %source, "schema=constraint raced");
            return Ok(());
        }
        return Err(SchemaError::Constraint {
            name: RUN_METRIC_FK,
            source,
        });
    }

    info!(constraint = RUN_METRIC_FK, "schema=constraint added");
    Ok(())
}

async fn mysql_constraint_exists(manager: &SchemaManager<'_>) -> Result<bool, SchemaError> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::MySql,
        "SELECT COUNT(*) AS cnt FROM information_schema.TABLE_CONSTRAINTS \
         WHERE CONSTRAINT_SCHEMA = DATABASE() AND TABLE_NAME = ? \
         AND CONSTRAINT_NAME = ? AND CONSTRAINT_TYPE = 'FOREIGN KEY'",
        ["run_metrics".into(), RUN_METRIC_FK.into()],
    );
    count(manager, stmt).await.map(|n| n > 0)
}

// Tables created by this crate carry the key inline. A pre-existing table
// without it cannot be altered in place.
async fn verify_on_sqlite(manager: &SchemaManager<'_>) -> Result<(), SchemaError> {
    let stmt = Statement::from_string(
        DatabaseBackend::Sqlite,
        "SELECT COUNT(*) AS cnt FROM pragma_foreign_key_list('run_metrics') \
         WHERE \"table\" = 'run_details' AND \"from\" = 'RunUUID' AND \"to\" = 'UUID' \
         AND on_delete = 'CASCADE' AND on_update = 'CASCADE'",
    );

    if count(manager, stmt).await? == 0 {
        return Err(SchemaError::ConstraintMissing {
            name: RUN_METRIC_FK,
        });
    }
    debug!(constraint = RUN_METRIC_FK, "schema=constraint present");
    Ok(())
}

async fn count(manager: &SchemaManager<'_>, stmt: Statement) -> Result<i64, SchemaError> {
    let constraint_err = |source| SchemaError::Constraint {
        name: RUN_METRIC_FK,
        source,
    };

    let row = manager
        .get_connection()
        .query_one(stmt)
        .await
        .map_err(constraint_err)?;

    match row {
        Some(row) => row.try_get::<i64>("", "cnt").map_err(constraint_err),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseConnection, DbErr, MockDatabase, MockExecResult, RuntimeErr, Value};

    use super::*;

    fn count_row(n: i64) -> Vec<BTreeMap<&'static str, Value>> {
        vec![BTreeMap::from([("cnt", Value::BigInt(Some(n)))])]
    }

    fn mysql() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::MySql)
    }

    async fn declare(db: &DatabaseConnection) -> Result<(), SchemaError> {
        declare_run_metric_constraint(&SchemaManager::new(db)).await
    }

    fn statements(db: DatabaseConnection) -> Vec<String> {
        db.into_transaction_log()
            .iter()
            .map(|t| format!("{t:?}"))
            .collect()
    }

    fn duplicate_key() -> DbErr {
        DbErr::Exec(RuntimeErr::Internal(
            "Duplicate foreign key constraint name 'fk_run_metrics_run_details'".into(),
        ))
    }

    #[tokio::test]
    async fn test_mysql_existing_constraint_is_left_alone() {
        let db = mysql().append_query_results([count_row(1)]).into_connection();

        declare(&db).await.expect("declare");

        let log = statements(db);
        assert_eq!(log.len(), 1, "{log:?}");
        assert!(log[0].contains("information_schema.TABLE_CONSTRAINTS"), "{log:?}");
    }

    #[tokio::test]
    async fn test_mysql_missing_constraint_is_added() {
        let db = mysql()
            .append_query_results([count_row(0)])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        declare(&db).await.expect("declare");

        let log = statements(db);
        assert_eq!(log.len(), 2, "{log:?}");
        assert!(log[1].contains("ADD CONSTRAINT"), "{log:?}");
        assert!(log[1].contains(RUN_METRIC_FK), "{log:?}");
        assert!(log[1].contains("ON DELETE CASCADE"), "{log:?}");
    }

    #[tokio::test]
    async fn test_mysql_concurrent_declaration_is_accepted() {
        let db = mysql()
            .append_query_results([count_row(0), count_row(1)])
            .append_exec_errors([duplicate_key()])
            .into_connection();

        declare(&db).await.expect("lost race still succeeds");

        assert_eq!(statements(db).len(), 3);
    }

    #[tokio::test]
    async fn test_mysql_failed_declaration_is_reported() {
        let db = mysql()
            .append_query_results([count_row(0), count_row(0)])
            .append_exec_errors([DbErr::Exec(RuntimeErr::Internal(
                "Cannot add foreign key constraint".into(),
            ))])
            .into_connection();

        let err = declare(&db).await.unwrap_err();

        assert!(
            matches!(err, SchemaError::Constraint { name: RUN_METRIC_FK, .. }),
            "{err}"
        );
    }

    #[test]
    fn test_foreign_key_cascades_both_ways() {
        let mut table = Table::create()
            .table(RunMetrics::Table)
            .col(ColumnDef::new(RunMetrics::RunUuid).string())
            .to_owned();
        table.foreign_key(&mut run_metric_foreign_key());

        let sql = DatabaseBackend::Sqlite.build(&table).to_string();
        assert!(sql.contains("ON DELETE CASCADE"), "{sql}");
        assert!(sql.contains("ON UPDATE CASCADE"), "{sql}");
        assert!(sql.contains(RUN_METRIC_FK), "{sql}");
    }
}
