use std::sync::Arc;

use anyhow::Context;

use crate::config::{AppConfig, StoreBackend};
use crate::store::{MemoryStore, PgStore, Store};
use crate::swapi::SwapiClient;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub swapi: SwapiClient,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let store = match config.store {
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is required for the postgres store")?;
                let pg = PgStore::connect(url, config.db_max_connections)
                    .await
                    .context("connect to database")?;
                if let Err(e) = pg.migrate().await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }
                Arc::new(pg) as Arc<dyn Store>
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                Arc::new(MemoryStore::new()) as Arc<dyn Store>
            }
        };

        Self::from_parts(store, config)
    }

    pub fn from_parts(store: Arc<dyn Store>, config: AppConfig) -> anyhow::Result<Self> {
        let swapi = SwapiClient::new(&config.swapi).context("build swapi client")?;
        Ok(Self {
            store,
            swapi,
            config: Arc::new(config),
        })
    }

    /// Fresh in-memory state whose SWAPI client targets `swapi_base_url`.
    pub fn in_memory(swapi_base_url: &str) -> anyhow::Result<Self> {
        Self::from_parts(Arc::new(MemoryStore::new()), AppConfig::memory(swapi_base_url))
    }
}
