use futures::future::BoxFuture;
use futures::FutureExt as _;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Deserialize;
use snafu::{ensure, ResultExt};
use tracing::instrument;

use crate::model::Movie;

pub use error::*;

mod error;

pub const API_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Which movie list to ask the provider for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing<'a> {
    /// Free-text search.
    Search(&'a str),
    /// Everything, most popular first.
    Discover,
    /// The provider's own popular list.
    Popular,
}

impl<'a> Listing<'a> {
    /// An empty query browses instead of searching.
    pub fn for_query(query: &'a str) -> Self {
        if query.is_empty() {
            Listing::Discover
        } else {
            Listing::Search(query)
        }
    }

    pub fn path(&self) -> String {
        match self {
            Listing::Search(query) => format!("/search/movie?query={}", urlencoding::encode(query)),
            Listing::Discover => "/discover/movie?sort_by=popularity.desc".to_string(),
            Listing::Popular => "/movie/popular".to_string(),
        }
    }
}

/// Anything that can list movies. The page only talks to this.
pub trait MovieSource: Send + Sync {
    fn movies<'a>(&'a self, listing: Listing<'a>) -> BoxFuture<'a, Result<Vec<Movie>>>;
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct Tmdb {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MovieList {
    #[serde(default)]
    results: Option<Vec<Movie>>,
}

impl Tmdb {
    pub fn from_config(config: &TmdbConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        // a key with bytes that cannot go into a header is sent as nothing; the provider rejects it
        if let Ok(mut bearer) = HeaderValue::from_str(&format!("Bearer {}", config.api_key)) {
            bearer.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, bearer);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context(HttpClientSnafu)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, listing: Listing<'_>) -> String {
        format!("{}{}", self.base_url, listing.path())
    }

    #[instrument(skip(self))]
    pub async fn list(&self, listing: Listing<'_>) -> Result<Vec<Movie>> {
        let url = self.url(listing);
        tracing::debug!(%url, "fetch movie list");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context(TransportSnafu { url: url.clone() })?;

        let status = response.status();
        ensure!(status.is_success(), StatusSnafu { url, status });

        let list: MovieList = response.json().await.context(DecodeSnafu { url })?;
        Ok(list.results.unwrap_or_default())
    }
}

impl MovieSource for Tmdb {
    fn movies<'a>(&'a self, listing: Listing<'a>) -> BoxFuture<'a, Result<Vec<Movie>>> {
        self.list(listing).boxed()
    }
}
