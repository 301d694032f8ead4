use db_infra::{ConnectionTarget, DbDriver, SqliteLocation, DEFAULT_DB_NAME};

use super::{keys, ConfigResolver};
use crate::error::BootstrapError;

/// Resolves the database target from configuration.
///
/// The driver is checked first so an unsupported driver is reported before
/// any driver-specific key is required.
pub fn connection_target(config: &dyn ConfigResolver) -> Result<ConnectionTarget, BootstrapError> {
    let driver: DbDriver = config.get_string(keys::DB_DRIVER_NAME)?.parse()?;

    match driver {
        DbDriver::Mysql => {
            let host = config.get_string(keys::MYSQL_SERVICE_HOST)?;
            let port = config.get_port(keys::MYSQL_SERVICE_PORT)?;
            let user = config.get_string_or(keys::DB_USER, "root");
            let password = config.lookup(keys::DB_PASSWORD).unwrap_or_default();
            let database = config.get_string_or(keys::DB_NAME, DEFAULT_DB_NAME);
            Ok(ConnectionTarget::mysql(host, port, user, password, database)?)
        }
        DbDriver::Sqlite => {
            let path = config.get_string_or(keys::DB_SQLITE_PATH, ":memory:");
            Ok(ConnectionTarget::sqlite(SqliteLocation::parse(&path)))
        }
    }
}
