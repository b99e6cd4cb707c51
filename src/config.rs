use serde::Deserialize;

/// Where the watchlist slot lives
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local; the watchlist is lost on restart
    Memory,
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OMDb API key
    pub omdb_api_key: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Backend used for the persisted watchlist
    #[serde(default = "default_storage_backend")]
    pub storage_backend: StorageBackend,

    /// Redis connection URL, only read when `storage_backend` is `redis`
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Storage key holding the serialized watchlist
    #[serde(default = "default_watchlist_key")]
    pub watchlist_key: String,

    /// Maximum number of related picks shown with a detail
    #[serde(default = "default_related_limit")]
    pub related_limit: usize,

    /// Timeout applied to every request to the movie API
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_omdb_api_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::Memory
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_watchlist_key() -> String {
    "watchlist".to_string()
}

fn default_related_limit() -> usize {
    6
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
