use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, RuntimeErr};
use tracing::{info, trace, warn};

use crate::config::db::ConnectionTarget;
use crate::error::DbInfraError;
use crate::infra::db::backoff::{retry_with_predicate, BackoffPolicy, RetryError};

/// Opens sea-orm connection pools. Production code uses [`SeaOrmConnector`];
/// tests substitute connectors that simulate an unavailable server.
#[async_trait]
pub trait DbConnector: Send + Sync {
    async fn connect(&self, options: ConnectOptions) -> Result<DatabaseConnection, DbErr>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SeaOrmConnector;

#[async_trait]
impl DbConnector for SeaOrmConnector {
    async fn connect(&self, options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
        Database::connect(options).await
    }
}

/// Errors worth retrying while the server is still coming up.
pub fn is_transient(err: &DbErr) -> bool {
    if is_connection_string_error(err) {
        return false;
    }
    matches!(
        err,
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) | DbErr::Exec(_) | DbErr::Query(_)
    )
}

/// Connection errors raised before any I/O because the DSN itself is unusable.
pub fn is_connection_string_error(err: &DbErr) -> bool {
    let DbErr::Conn(inner) = err else {
        return false;
    };
    let text = inner.to_string();
    text.contains("cannot be parsed") || text.contains("error with configuration")
}

/// Returns `err` with any credentials embedded in its message masked.
/// The variant is preserved so retry classification is unaffected.
pub fn redact_db_err(err: DbErr) -> DbErr {
    let text = err.to_string();
    if redact_credentials(&text) == text {
        return err;
    }
    let clean = |inner: &dyn std::fmt::Display| {
        RuntimeErr::Internal(redact_credentials(&inner.to_string()))
    };
    match err {
        DbErr::Conn(inner) => DbErr::Conn(clean(&inner)),
        DbErr::Exec(inner) => DbErr::Exec(clean(&inner)),
        DbErr::Query(inner) => DbErr::Query(clean(&inner)),
        other => DbErr::Custom(redact_credentials(&other.to_string())),
    }
}

fn into_infra_error(operation: &'static str, err: RetryError<DbErr>) -> DbInfraError {
    match err {
        RetryError::Permanent { source, .. } if is_connection_string_error(&source) => {
            DbInfraError::config(format!("{operation}: invalid connection string: {source}"))
        }
        RetryError::Exhausted {
            attempts,
            elapsed,
            last,
        } => DbInfraError::RetryExhausted {
            operation,
            attempts,
            elapsed,
            source: last,
        },
        RetryError::Permanent { source, .. } => DbInfraError::Permanent { operation, source },
    }
}

/// Single-connection options for short-lived server-level work.
fn server_options(url: &str) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url);
    opt.min_connections(1)
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(2))
        .sqlx_logging(false);
    opt
}

fn pool_options(target: &ConnectionTarget) -> ConnectOptions {
    let mut opt = ConnectOptions::new(target.database_url());
    opt.sqlx_logging(false);
    if target.is_single_connection() {
        // Every in-memory connection is its own database.
        opt.min_connections(1).max_connections(1);
    }
    opt
}

/// Sanitize database URL by masking the password.
pub fn sanitize_db_url(url: &str) -> String {
    redact_credentials(url)
}

/// Masks the password of every `scheme://user:password@` occurrence in `text`.
pub fn redact_credentials(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(i) = rest.find("://") {
        let (head, tail) = rest.split_at(i + 3);
        out.push_str(head);

        // Userinfo is percent-encoded, so it never holds these delimiters.
        let end = tail
            .find(|c: char| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '\'' | '"'))
            .unwrap_or(tail.len());
        let authority = &tail[..end];
        let user = authority
            .rfind('@')
            .and_then(|at| authority[..at].split_once(':').map(|(user, _)| (user, at)));
        match user {
            Some((user, at)) => {
                out.push_str(user);
                out.push_str(":***");
                out.push_str(&authority[at..]);
            }
            None => out.push_str(authority),
        }
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

// Driver errors may quote the DSN; mask it before the retrier logs them.
async fn redacted_connect(
    connector: &dyn DbConnector,
    options: ConnectOptions,
) -> Result<DatabaseConnection, DbErr> {
    connector.connect(options).await.map_err(redact_db_err)
}

/// Creates the target database on its server when it does not exist yet.
///
/// Runs on a dedicated single-connection handle to the server because the
/// target database cannot be selected before it exists. The handle is closed
/// whether or not creation succeeds. Embedded targets need no work.
pub async fn ensure_database_exists(
    connector: &dyn DbConnector,
    target: &ConnectionTarget,
    policy: &BackoffPolicy,
) -> Result<(), DbInfraError> {
    let (Some(server_url), Some(db_name)) = (target.server_url(), target.database_name()) else {
        trace!(driver = %target.driver(), create_database = "skipped");
        return Ok(());
    };

    info!(
        server = %sanitize_db_url(&server_url),
        database = db_name,
        "create_database=start"
    );

    let options = server_options(&server_url);
    let server = retry_with_predicate(
        policy,
        move || redacted_connect(connector, options.clone()),
        is_transient,
    )
    .await
    .map_err(|e| into_infra_error("connect to database server", e))?;

    let statement = format!("CREATE DATABASE IF NOT EXISTS `{db_name}`");
    let (conn, sql) = (&server, statement.as_str());
    let created = retry_with_predicate(
        policy,
        move || async move { conn.execute_unprepared(sql).await.map_err(redact_db_err) },
        is_transient,
    )
    .await;

    if let Err(e) = server.close().await {
        warn!(error = %e, "failed to close server-level connection");
    }

    created.map_err(|e| into_infra_error("create database", e))?;
    info!(database = db_name, "create_database=done");
    Ok(())
}

/// Opens the pooled handle that the rest of the process shares.
///
/// The database is created first if needed; both steps retry under `policy`
/// and an exhausted budget is returned as [`DbInfraError::RetryExhausted`].
pub async fn establish_connection(
    connector: &dyn DbConnector,
    target: &ConnectionTarget,
    policy: &BackoffPolicy,
) -> Result<DatabaseConnection, DbInfraError> {
    ensure_database_exists(connector, target, policy).await?;

    let url = target.database_url();
    info!(
        driver = %target.driver(),
        url = %sanitize_db_url(&url),
        budget_ms = policy.max_elapsed.as_millis() as u64,
        "connect=start"
    );

    let options = pool_options(target);
    let db = retry_with_predicate(
        policy,
        move || redacted_connect(connector, options.clone()),
        is_transient,
    )
    .await
    .map_err(|e| into_infra_error("connect to database", e))?;

    info!(driver = %target.driver(), "connect=done");
    Ok(db)
}
