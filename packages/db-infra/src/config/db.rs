use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};
use sea_orm::DatabaseBackend;

use crate::error::DbInfraError;

// Characters that would end or alter the path part of a sqlite URL.
const SQLITE_PATH: &AsciiSet = &CONTROLS.add(b' ').add(b'#').add(b'%').add(b'?');

/// Database created on first boot when none is configured.
pub const DEFAULT_DB_NAME: &str = "mlpipeline";

/// Supported database drivers. Anything else is rejected while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbDriver {
    /// Networked relational server; the production driver.
    Mysql,
    /// Embedded database for single-node and test deployments.
    Sqlite,
}

impl DbDriver {
    pub fn as_str(self) -> &'static str {
        match self {
            DbDriver::Mysql => "mysql",
            DbDriver::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DbDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DbDriver {
    type Err = DbInfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mysql" => Ok(DbDriver::Mysql),
            "sqlite" => Ok(DbDriver::Sqlite),
            other => Err(DbInfraError::UnsupportedDriver {
                driver: other.to_string(),
            }),
        }
    }
}

impl From<DbDriver> for DatabaseBackend {
    fn from(driver: DbDriver) -> Self {
        match driver {
            DbDriver::Mysql => DatabaseBackend::MySql,
            DbDriver::Sqlite => DatabaseBackend::Sqlite,
        }
    }
}

/// Where an embedded database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteLocation {
    Memory,
    File(PathBuf),
}

impl SqliteLocation {
    /// `:memory:` (or an empty string) selects the in-memory database.
    pub fn parse(spec: &str) -> Self {
        match spec.trim() {
            "" | ":memory:" => SqliteLocation::Memory,
            path => SqliteLocation::File(PathBuf::from(path)),
        }
    }
}

/// Resolved connection target, one variant per supported driver.
#[derive(Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    Mysql {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    },
    Sqlite {
        location: SqliteLocation,
    },
}

impl ConnectionTarget {
    /// Builds a MySQL target, rejecting values that cannot be used in a DSN or DDL.
    pub fn mysql(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Result<Self, DbInfraError> {
        let host = normalize_host(&host.into())?;
        let user = user.into();
        let database = database.into();

        if user.trim().is_empty() {
            return Err(DbInfraError::config("database user must not be empty"));
        }
        validate_db_name(&database)?;

        Ok(ConnectionTarget::Mysql {
            host,
            port,
            user,
            password: password.into(),
            database,
        })
    }

    pub fn sqlite(location: SqliteLocation) -> Self {
        ConnectionTarget::Sqlite { location }
    }

    pub fn driver(&self) -> DbDriver {
        match self {
            ConnectionTarget::Mysql { .. } => DbDriver::Mysql,
            ConnectionTarget::Sqlite { .. } => DbDriver::Sqlite,
        }
    }

    pub fn database_name(&self) -> Option<&str> {
        match self {
            ConnectionTarget::Mysql { database, .. } => Some(database),
            ConnectionTarget::Sqlite { .. } => None,
        }
    }

    /// URL of the server itself with no database selected.
    /// Embedded targets have no separate server.
    pub fn server_url(&self) -> Option<String> {
        match self {
            ConnectionTarget::Mysql {
                host,
                port,
                user,
                password,
                ..
            } => Some(mysql_url(host, *port, user, password, None)),
            ConnectionTarget::Sqlite { .. } => None,
        }
    }

    /// URL of the target database.
    pub fn database_url(&self) -> String {
        match self {
            ConnectionTarget::Mysql {
                host,
                port,
                user,
                password,
                database,
            } => mysql_url(host, *port, user, password, Some(database)),
            ConnectionTarget::Sqlite {
                location: SqliteLocation::Memory,
            } => "sqlite::memory:".to_string(),
            ConnectionTarget::Sqlite {
                location: SqliteLocation::File(path),
            } => format!(
                "sqlite://{}?mode=rwc",
                utf8_percent_encode(&path.to_string_lossy(), SQLITE_PATH)
            ),
        }
    }

    /// True when every pooled connection must share a single underlying database.
    pub fn is_single_connection(&self) -> bool {
        matches!(
            self,
            ConnectionTarget::Sqlite {
                location: SqliteLocation::Memory
            }
        )
    }
}

// Credentials never reach logs through Debug.
impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionTarget::Mysql {
                host,
                port,
                user,
                database,
                ..
            } => f
                .debug_struct("Mysql")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("password", &"***")
                .field("database", database)
                .finish(),
            ConnectionTarget::Sqlite { location } => f
                .debug_struct("Sqlite")
                .field("location", location)
                .finish(),
        }
    }
}

fn mysql_url(host: &str, port: u16, user: &str, password: &str, database: Option<&str>) -> String {
    let user = utf8_percent_encode(user, NON_ALPHANUMERIC);
    let auth = if password.is_empty() {
        user.to_string()
    } else {
        format!("{user}:{}", utf8_percent_encode(password, NON_ALPHANUMERIC))
    };
    // IPv6 literals need brackets in the authority.
    let host = if host.contains(':') {
        format!("[{host}]")
    } else {
        host.to_string()
    };
    match database {
        Some(db) => format!("mysql://{auth}@{host}:{port}/{db}"),
        None => format!("mysql://{auth}@{host}:{port}"),
    }
}

/// Accepts a DNS name, an IPv4 address or an IPv6 literal (bracketed or not).
/// Anything else would make the DSN unparseable.
fn normalize_host(raw: &str) -> Result<String, DbInfraError> {
    let host = raw.trim();
    if host.is_empty() {
        return Err(DbInfraError::config("database host must not be empty"));
    }
    let unbracketed = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    if unbracketed.contains(':') {
        if unbracketed.parse::<std::net::Ipv6Addr>().is_err() {
            return Err(DbInfraError::config(format!(
                "database host '{host}' is not a valid IPv6 address"
            )));
        }
        return Ok(unbracketed.to_string());
    }
    let valid = unbracketed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if !valid || unbracketed.is_empty() {
        return Err(DbInfraError::config(format!(
            "database host '{host}' may only contain letters, digits, '.', '-' and '_'"
        )));
    }
    Ok(unbracketed.to_string())
}

/// Database names are interpolated into DDL, so only plain identifiers pass.
pub fn validate_db_name(name: &str) -> Result<(), DbInfraError> {
    if name.is_empty() {
        return Err(DbInfraError::config("database name must not be empty"));
    }
    if name.len() > 64 {
        return Err(DbInfraError::config(format!(
            "database name '{name}' exceeds 64 characters"
        )));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DbInfraError::config(format!(
            "database name '{name}' may only contain ASCII letters, digits and '_'"
        )));
    }
    Ok(())
}
