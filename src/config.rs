use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use snafu::{ResultExt, Snafu};

use crate::page::{PageConfig, Services};
use crate::service::backend::{Backend, BackendConfig, Unconfigured};
use crate::service::debounce::DEFAULT_DELAY;
use crate::service::tmdb::{self, FetchError, Tmdb, TmdbConfig};
use crate::service::trending::TrendingSource;

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("could not read the configuration from the environment: {source}"))]
    Load { source: envy::Error },
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address", default = "default_host")]
    pub host: SocketAddr,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    #[serde(default)]
    pub tmdb_api_key: String,
    #[serde(default = "default_tmdb_base_url")]
    pub tmdb_base_url: String,

    #[serde(default)]
    pub appwrite_endpoint: Option<String>,
    #[serde(default)]
    pub appwrite_project_id: Option<String>,
    #[serde(default)]
    pub appwrite_database_id: Option<String>,
    #[serde(default)]
    pub appwrite_collection_id: Option<String>,

    #[serde(default = "default_debounce", deserialize_with = "human_duration")]
    pub search_debounce: Duration,
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,
    #[serde(default)]
    pub trending_source: TrendingSource,
}

fn default_host() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_tmdb_base_url() -> String {
    tmdb::API_BASE_URL.to_string()
}

fn default_debounce() -> Duration {
    DEFAULT_DELAY
}

fn default_trending_limit() -> usize {
    5
}

/// Reads durations such as `500ms` or `1s`.
fn human_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(&text).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        envy::from_env::<Config>().context(LoadSnafu)
    }

    pub fn tmdb(&self) -> TmdbConfig {
        TmdbConfig {
            base_url: self.tmdb_base_url.clone(),
            api_key: self.tmdb_api_key.clone(),
        }
    }

    pub fn backend(&self) -> BackendConfig {
        BackendConfig {
            endpoint: self.appwrite_endpoint.clone(),
            project_id: self.appwrite_project_id.clone(),
            database_id: self.appwrite_database_id.clone(),
            collection_id: self.appwrite_collection_id.clone(),
        }
    }

    pub fn page(&self) -> PageConfig {
        PageConfig {
            debounce: self.search_debounce,
            trending_limit: self.trending_limit,
            trending_source: self.trending_source,
        }
    }

    /// Connection parameters that are unset or empty.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = self.backend().missing();
        if self.tmdb_api_key.is_empty() {
            missing.push("TMDB_API_KEY");
        }
        missing
    }

    /// Builds the clients the page needs. A backend that cannot be set up is
    /// replaced by one whose calls all fail, so the page runs without it.
    pub fn services(&self) -> Result<Services, FetchError> {
        let missing = self.missing();
        if !missing.is_empty() {
            tracing::warn!(?missing, "missing connection parameters, dependent features are disabled");
        }

        let movies = Arc::new(Tmdb::from_config(&self.tmdb())?);

        let services = match Backend::from_config(&self.backend()) {
            Ok(backend) => {
                let backend = Arc::new(backend);
                Services {
                    movies,
                    log_store: backend.clone(),
                    identity: backend,
                }
            }
            Err(error) => {
                tracing::warn!(%error, "search log and sessions are unavailable");
                let backend = Arc::new(Unconfigured::new(self.backend().missing()));
                Services {
                    movies,
                    log_store: backend.clone(),
                    identity: backend,
                }
            }
        };

        Ok(services)
    }
}
