use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use db_infra::DbConnector;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, RuntimeErr};

/// Refuses connections until an outage window has passed, then opens real
/// sea-orm connections. Every opened handle is remembered so tests can check
/// whether it was closed.
pub struct OutageConnector {
    reachable_at: Option<Instant>,
    calls: AtomicU32,
    opened: Mutex<Vec<DatabaseConnection>>,
}

impl OutageConnector {
    pub fn for_duration(outage: Duration) -> Arc<Self> {
        Arc::new(Self {
            reachable_at: Some(Instant::now() + outage),
            calls: AtomicU32::new(0),
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn healthy() -> Arc<Self> {
        Self::for_duration(Duration::ZERO)
    }

    pub fn never_reachable() -> Arc<Self> {
        Arc::new(Self {
            reachable_at: None,
            calls: AtomicU32::new(0),
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_opened(&self) -> Option<DatabaseConnection> {
        self.opened.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DbConnector for OutageConnector {
    async fn connect(&self, options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let reachable = self.reachable_at.is_some_and(|at| Instant::now() >= at);
        if !reachable {
            return Err(DbErr::Conn(RuntimeErr::Internal(
                "Connection refused (os error 111)".to_string(),
            )));
        }

        let db = Database::connect(options).await?;
        self.opened.lock().unwrap().push(db.clone());
        Ok(db)
    }
}
