//! One-shot selection between the durable and in-memory stores

use crate::ports::{RecordStore, StoreMode};
use crate::storage::{DurableRecordStore, InMemoryRecordStore};
use crate::{Result, StoreError};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Default bound on the initial connection attempt
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default pool size in durable mode
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Decides once, at startup, which backend serves the process.
///
/// `select_mode` consumes the supervisor, so there is no way to ask twice and
/// no background reconnection.
#[derive(Debug, Clone)]
pub struct ConnectionSupervisor {
    database_url: Option<String>,
    connect_timeout: Duration,
    max_connections: u32,
}

/// Outcome of [`ConnectionSupervisor::select_mode`]
#[derive(Debug)]
pub enum ModeSelection {
    Durable(DurableRecordStore),
    InMemory,
}

impl ModeSelection {
    pub fn mode(&self) -> StoreMode {
        match self {
            ModeSelection::Durable(_) => StoreMode::Durable,
            ModeSelection::InMemory => StoreMode::InMemory,
        }
    }

    /// Build the store for this mode. Seeding is the caller's job.
    pub fn into_store(self) -> Arc<dyn RecordStore> {
        match self {
            ModeSelection::Durable(store) => Arc::new(store),
            ModeSelection::InMemory => Arc::new(InMemoryRecordStore::new()),
        }
    }
}

impl ConnectionSupervisor {
    pub fn new(database_url: Option<String>) -> Self {
        Self {
            database_url,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Try the durable store within `connect_timeout`.
    ///
    /// Any failure (no URL, refused, timed out, schema setup failed) is
    /// logged and selects in-memory mode. Never returns an error.
    pub async fn select_mode(self) -> ModeSelection {
        let Some(url) = self.database_url.as_deref() else {
            info!("DATABASE_URL not set, using in-memory store");
            return ModeSelection::InMemory;
        };

        info!(
            "Connecting to PostgreSQL (timeout {}ms)...",
            self.connect_timeout.as_millis()
        );

        match tokio::time::timeout(self.connect_timeout, self.connect(url)).await {
            Ok(Ok(store)) => {
                info!("Connected to PostgreSQL, using durable store");
                ModeSelection::Durable(store)
            }
            Ok(Err(e)) => {
                warn!("PostgreSQL unavailable, falling back to in-memory store: {}", e);
                ModeSelection::InMemory
            }
            Err(_) => {
                warn!(
                    "PostgreSQL did not answer within {}ms, falling back to in-memory store",
                    self.connect_timeout.as_millis()
                );
                ModeSelection::InMemory
            }
        }
    }

    async fn connect(&self, url: &str) -> Result<DurableRecordStore> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.connect_timeout)
            .connect(url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        DurableRecordStore::new(pool).await
    }
}
