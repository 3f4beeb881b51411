use serde::Deserialize;

pub const DEFAULT_SWAPI_BASE_URL: &str = "https://swapi.dev/api";
pub const DEFAULT_SWAPI_USER_AGENT: &str = "swapi-rust";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("unknown STORE_BACKEND {other:?}"),
        }
    }
}

/// Where the SWAPI client sends its requests.
#[derive(Debug, Clone, Deserialize)]
pub struct SwapiConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl SwapiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: DEFAULT_SWAPI_USER_AGENT.into(),
        }
    }
}

impl Default for SwapiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SWAPI_BASE_URL)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub swapi: SwapiConfig,
    /// Absolute base used for `url` fields; falls back to the Host header.
    pub public_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store = std::env::var("STORE_BACKEND")
            .ok()
            .map(|v| v.parse::<StoreBackend>())
            .transpose()?
            .unwrap_or(StoreBackend::Postgres);

        let database_url = std::env::var("DATABASE_URL").ok();
        if store == StoreBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set when STORE_BACKEND=postgres");
        }

        let swapi = SwapiConfig {
            base_url: std::env::var("SWAPI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SWAPI_BASE_URL.into()),
            user_agent: std::env::var("SWAPI_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_SWAPI_USER_AGENT.into()),
        };

        Ok(Self {
            store,
            database_url,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            swapi,
            public_url: std::env::var("PUBLIC_URL")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    /// In-memory configuration pointing the SWAPI client at `swapi_base_url`.
    pub fn memory(swapi_base_url: impl Into<String>) -> Self {
        Self {
            store: StoreBackend::Memory,
            database_url: None,
            db_max_connections: 1,
            swapi: SwapiConfig::new(swapi_base_url),
            public_url: None,
        }
    }
}
