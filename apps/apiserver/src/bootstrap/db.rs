use db_infra::{establish_connection, BackoffPolicy, ConnectionTarget, DbConnector};
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::error::BootstrapError;

/// Single entrypoint for the database: connect (creating the database when
/// needed), then materialize the schema on the live handle.
///
/// If materialization fails the handle is closed before the error is returned.
pub async fn bootstrap_db(
    connector: &dyn DbConnector,
    target: &ConnectionTarget,
    policy: &BackoffPolicy,
) -> Result<DatabaseConnection, BootstrapError> {
    let db = establish_connection(connector, target, policy).await?;

    if let Err(e) = schema::materialize_schema(&db).await {
        if let Err(close_err) = db.close().await {
            warn!(error = %close_err, "failed to close database after schema error");
        }
        return Err(e.into());
    }

    info!(driver = %target.driver(), "database ready");
    Ok(db)
}
