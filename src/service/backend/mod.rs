//! Client for the hosted backend that stores the search log and hands out
//! anonymous identities. It speaks the Appwrite REST API.

use derive_new::new;
use futures::future::BoxFuture;
use futures::FutureExt as _;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snafu::{ensure, ResultExt};
use url::Url;

use crate::model::SearchLogEntry;

pub use error::*;

mod account;
mod documents;
mod error;

const PROJECT_HEADER: &str = "X-Appwrite-Project";

/// Append and read access to the search log.
pub trait LogStore: Send + Sync {
    fn append<'a>(&'a self, entry: &'a SearchLogEntry) -> BoxFuture<'a, Result<()>>;

    /// Most recently created entries first, at most `limit` of them.
    fn recent(&self, limit: usize) -> BoxFuture<'_, Result<Vec<SearchLogEntry>>>;
}

/// The identity writes to the log store are made under.
pub trait Identity: Send + Sync {
    /// Fails when there is no signed-in identity.
    fn current(&self) -> BoxFuture<'_, Result<Account>>;

    fn create_anonymous(&self) -> BoxFuture<'_, Result<Account>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, new)]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
}

#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    pub endpoint: Option<String>,
    pub project_id: Option<String>,
    pub database_id: Option<String>,
    pub collection_id: Option<String>,
}

impl BackendConfig {
    /// Names of the environment variables that are unset or empty.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("APPWRITE_ENDPOINT", &self.endpoint),
            ("APPWRITE_PROJECT_ID", &self.project_id),
            ("APPWRITE_DATABASE_ID", &self.database_id),
            ("APPWRITE_COLLECTION_ID", &self.collection_id),
        ]
        .into_iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

#[derive(Debug, Clone)]
struct Collection {
    database_id: String,
    collection_id: String,
}

#[derive(Debug, Clone)]
pub struct Backend {
    client: reqwest::Client,
    endpoint: Url,
    project_id: String,
    collection: Option<Collection>,
    missing: Vec<&'static str>,
}

impl Backend {
    /// Needs at least the endpoint and project. Without a database and
    /// collection only the identity calls work.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let missing = config.missing();

        let (Some(endpoint), Some(project_id)) =
            (present(&config.endpoint), present(&config.project_id))
        else {
            return ConfigMissingSnafu { names: missing }.fail();
        };

        let endpoint = Url::parse(endpoint).context(ParseEndpointSnafu { endpoint })?;
        ensure!(
            !endpoint.cannot_be_a_base(),
            EndpointNotBaseSnafu { endpoint }
        );

        let collection = match (present(&config.database_id), present(&config.collection_id)) {
            (Some(database_id), Some(collection_id)) => Some(Collection {
                database_id: database_id.to_string(),
                collection_id: collection_id.to_string(),
            }),
            _ => None,
        };

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context(HttpClientSnafu)?;

        Ok(Self {
            client,
            endpoint,
            project_id: project_id.to_string(),
            collection,
            missing,
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        // checked in `from_config`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(PROJECT_HEADER, &self.project_id)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: Url) -> Result<T> {
        let response = request
            .send()
            .await
            .context(TransportSnafu { url: url.clone() })?;

        let status = response.status();
        ensure!(status.is_success(), StatusSnafu { url, status });

        response.json().await.context(DecodeSnafu { url })
    }
}

impl LogStore for Backend {
    fn append<'a>(&'a self, entry: &'a SearchLogEntry) -> BoxFuture<'a, Result<()>> {
        self.create_document(entry).boxed()
    }

    fn recent(&self, limit: usize) -> BoxFuture<'_, Result<Vec<SearchLogEntry>>> {
        self.list_documents(limit).boxed()
    }
}

impl Identity for Backend {
    fn current(&self) -> BoxFuture<'_, Result<Account>> {
        self.account().boxed()
    }

    fn create_anonymous(&self) -> BoxFuture<'_, Result<Account>> {
        self.create_anonymous_session().boxed()
    }
}

/// Stands in for the backend when it is not configured. Every call fails
/// with [BackendError::ConfigMissing] so callers take their degraded path.
#[derive(Debug, Clone, new)]
pub struct Unconfigured {
    missing: Vec<&'static str>,
}

impl Unconfigured {
    fn fail<T>(&self) -> Result<T> {
        ConfigMissingSnafu {
            names: self.missing.clone(),
        }
        .fail()
    }
}

impl LogStore for Unconfigured {
    fn append<'a>(&'a self, _entry: &'a SearchLogEntry) -> BoxFuture<'a, Result<()>> {
        futures::future::ready(self.fail()).boxed()
    }

    fn recent(&self, _limit: usize) -> BoxFuture<'_, Result<Vec<SearchLogEntry>>> {
        futures::future::ready(self.fail()).boxed()
    }
}

impl Identity for Unconfigured {
    fn current(&self) -> BoxFuture<'_, Result<Account>> {
        futures::future::ready(self.fail()).boxed()
    }

    fn create_anonymous(&self) -> BoxFuture<'_, Result<Account>> {
        futures::future::ready(self.fail()).boxed()
    }
}
