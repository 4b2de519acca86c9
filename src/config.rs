use anyhow::{Context, Result};
use compute::PaymentLedger;
use config::{Config as Cfg, Environment, File};
use moka::future::Cache;
use sea_orm::Database;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::schemas::{AppState, CachedData};

/// Runtime settings, read from `rentrust.toml` (optional) and the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// How long dashboard statistics stay cached
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

fn default_database_url() -> String {
    "sqlite://rentrust.db?mode=rwc".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_cache_capacity() -> u64 {
    1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            bind_address: default_bind_address(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl AppConfig {
    /// Loads `.env`, then layers the config file and environment variables
    /// (`DATABASE_URL`, `BIND_ADDRESS`, `CACHE_TTL_SECS`, `CACHE_CAPACITY`) over the defaults.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("rentrust").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        config.try_deserialize().context("Invalid configuration")
    }

    /// Command line values win over everything else.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        if let Some(address) = bind_address {
            self.bind_address = address;
        }
        self
    }

    pub fn build_cache(&self) -> Cache<String, CachedData> {
        Cache::builder()
            .max_capacity(self.cache_capacity)
            .time_to_live(Duration::from_secs(self.cache_ttl_secs))
            .build()
    }
}

/// Connect to the configured database and build the shared handler state
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    info!("Connecting to database: {}", config.database_url);
    let db = Database::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", config.database_url))?;

    debug!(
        "Statistics cache: capacity={}, ttl={}s",
        config.cache_capacity, config.cache_ttl_secs
    );

    Ok(AppState {
        ledger: PaymentLedger::new(db.clone()),
        db,
        cache: config.build_cache(),
    })
}
