//! Schema materialization against an embedded SQLite database.
//!
//!   cargo test -p schema --test materialize_tests

use schema::{materialize_schema, SchemaError, RUN_METRIC_FK, TABLES};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};

#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

async fn memory_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.min_connections(1).max_connections(1).sqlx_logging(false);
    Database::connect(opt).await.expect("open sqlite")
}

async fn exec(db: &DatabaseConnection, sql: &str) -> Result<(), sea_orm::DbErr> {
    db.execute(Statement::from_string(DatabaseBackend::Sqlite, sql))
        .await
        .map(|_| ())
}

async fn count(db: &DatabaseConnection, sql: &str) -> i64 {
    db.query_one(Statement::from_string(DatabaseBackend::Sqlite, sql))
        .await
        .expect("query")
        .expect("row")
        .try_get::<i64>("", "cnt")
        .expect("cnt")
}

async fn seed_run(db: &DatabaseConnection, uuid: &str) {
    exec(
        db,
        &format!("INSERT INTO run_details (\"UUID\") VALUES ('{uuid}')"),
    )
    .await
    .expect("insert run");
}

async fn seed_metric(db: &DatabaseConnection, run: &str, name: &str) -> Result<(), sea_orm::DbErr> {
    exec(
        db,
        &format!(
            "INSERT INTO run_metrics (\"RunUUID\", \"NodeID\", \"Name\", \"NumberValue\") \
             VALUES ('{run}', 'node-1', '{name}', 0.5)"
        ),
    )
    .await
}

#[tokio::test]
async fn creates_every_table() {
    let db = memory_db().await;
    materialize_schema(&db).await.expect("materialize");

    for table in TABLES {
        let n = count(
            &db,
            &format!(
                "SELECT COUNT(*) AS cnt FROM sqlite_master WHERE type = 'table' AND name = '{table}'"
            ),
        )
        .await;
        assert_eq!(n, 1, "table {table} missing");
    }
}

#[tokio::test]
async fn materialization_is_idempotent() {
    let db = memory_db().await;
    materialize_schema(&db).await.expect("first pass");
    seed_run(&db, "run-1").await;
    seed_metric(&db, "run-1", "accuracy").await.expect("metric");

    materialize_schema(&db).await.expect("second pass");

    let runs = count(&db, "SELECT COUNT(*) AS cnt FROM run_details").await;
    let metrics = count(&db, "SELECT COUNT(*) AS cnt FROM run_metrics").await;
    assert_eq!((runs, metrics), (1, 1), "existing rows must survive");
}

#[tokio::test]
async fn metric_requires_existing_run() {
    let db = memory_db().await;
    materialize_schema(&db).await.expect("materialize");

    let res = seed_metric(&db, "no-such-run", "accuracy").await;
    assert!(res.is_err(), "orphan metric was accepted");
}

#[tokio::test]
async fn deleting_run_cascades_to_metrics() {
    let db = memory_db().await;
    materialize_schema(&db).await.expect("materialize");
    seed_run(&db, "run-1").await;
    seed_run(&db, "run-2").await;
    seed_metric(&db, "run-1", "accuracy").await.expect("metric");
    seed_metric(&db, "run-1", "loss").await.expect("metric");
    seed_metric(&db, "run-2", "loss").await.expect("metric");

    exec(&db, "DELETE FROM run_details WHERE \"UUID\" = 'run-1'")
        .await
        .expect("delete run");

    let left = count(&db, "SELECT COUNT(*) AS cnt FROM run_metrics").await;
    assert_eq!(left, 1);
}

#[tokio::test]
async fn rekeying_run_cascades_to_metrics() {
    let db = memory_db().await;
    materialize_schema(&db).await.expect("materialize");
    seed_run(&db, "run-1").await;
    seed_metric(&db, "run-1", "accuracy").await.expect("metric");

    exec(
        &db,
        "UPDATE run_details SET \"UUID\" = 'run-9' WHERE \"UUID\" = 'run-1'",
    )
    .await
    .expect("update run");

    let moved = count(
        &db,
        "SELECT COUNT(*) AS cnt FROM run_metrics WHERE \"RunUUID\" = 'run-9'",
    )
    .await;
    assert_eq!(moved, 1);
}

#[tokio::test]
async fn legacy_metrics_table_without_key_is_reported() {
    let db = memory_db().await;
    exec(
        &db,
        "CREATE TABLE run_metrics (\"RunUUID\" varchar(255) NOT NULL, \
         \"NodeID\" varchar(255) NOT NULL, \"Name\" varchar(255) NOT NULL, \
         PRIMARY KEY (\"RunUUID\", \"NodeID\", \"Name\"))",
    )
    .await
    .expect("legacy table");

    let err = materialize_schema(&db).await.unwrap_err();
    assert!(
        matches!(err, SchemaError::ConstraintMissing { name } if name == RUN_METRIC_FK),
        "{err}"
    );
}

#[tokio::test]
async fn file_database_keeps_schema_across_connections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("pipelines.db").display());

    let first = Database::connect(url.as_str()).await.expect("open");
    materialize_schema(&first).await.expect("materialize");
    seed_run(&first, "run-1").await;
    first.close().await.expect("close");

    let second = Database::connect(url.as_str()).await.expect("reopen");
    materialize_schema(&second).await.expect("rematerialize");
    let runs = count(&second, "SELECT COUNT(*) AS cnt FROM run_details").await;
    assert_eq!(runs, 1);
    second.close().await.expect("close");
}
