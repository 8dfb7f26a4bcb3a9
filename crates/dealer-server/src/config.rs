//! Server configuration from environment variables

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub database_url: Option<String>,
    pub connect_timeout_ms: u64,
    pub max_connections: u32,
    pub seed_dir: PathBuf,
}

impl ServerConfig {
    /// Defaults overridden by `BIND_ADDRESS`, `DATABASE_URL`,
    /// `CONNECT_TIMEOUT_MS`, `MAX_CONNECTIONS` and `SEED_DIR`.
    pub fn from_env() -> Result<Self> {
        Self::from_source(Environment::default().try_parsing(true))
    }

    fn from_source(env: Environment) -> Result<Self> {
        let mut config: ServerConfig = Config::builder()
            .set_default("bind_address", "0.0.0.0:3030")?
            .set_default("connect_timeout_ms", 3000_i64)?
            .set_default("max_connections", 5_i64)?
            .set_default("seed_dir", "data")?
            .add_source(env)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        // An empty DATABASE_URL means "no database", same as unset.
        if config
            .database_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            config.database_url = None;
        }

        Ok(config)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
