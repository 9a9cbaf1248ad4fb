//! The movie page: a search box whose settled input drives the movie list,
//! and a trending section loaded once.
//!
//! Each part of the page state lives in its own [watch] slot, written by one
//! task only:
//!
//! - `debounce_input` owns the [Debouncer] and feeds it raw input;
//! - [SearchFlow] fetches a movie list for every settled term that differs
//!   from the previous one, and logs successful searches in the background;
//! - `load_trending` fills the trending slot.
//!
//! There is one page per process. Every visitor sees the same state, and input
//! from any of them moves the search box for all.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::model::TrendingMovie;
use crate::service::background::Background;
use crate::service::backend::{Identity, LogStore};
use crate::service::debounce::{Debouncer, DEFAULT_DELAY};
use crate::service::tmdb::MovieSource;
use crate::service::trending::{self, TrendingSource};

pub use search::*;
pub use state::*;

mod search;
mod state;

/// Clients the page works with, built once by the application.
#[derive(Clone)]
pub struct Services {
    pub movies: Arc<dyn MovieSource>,
    pub log_store: Arc<dyn LogStore>,
    pub identity: Arc<dyn Identity>,
}

#[derive(Debug, Clone)]
pub struct PageConfig {
    pub debounce: Duration,
    pub trending_limit: usize,
    pub trending_source: TrendingSource,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DELAY,
            trending_limit: 5,
            trending_source: TrendingSource::default(),
        }
    }
}

pub struct Page {
    input: mpsc::UnboundedSender<String>,
    search: watch::Receiver<SearchState>,
    trending: watch::Receiver<Vec<TrendingMovie>>,
    background: Background,
}

impl Page {
    /// Starts the page on the current runtime. It runs until the page is dropped.
    pub fn load(services: Services, config: PageConfig) -> Self {
        let background = Background::new();
        let (input, inputs) = mpsc::unbounded_channel();
        let (search_slot, search) = watch::channel(SearchState::default());
        let (trending_slot, trending) = watch::channel(Vec::new());

        tokio::spawn(load_trending(services.clone(), config.clone(), trending_slot));

        let (debouncer, settled) = Debouncer::new(config.debounce);
        tokio::spawn(debounce_input(inputs, debouncer));

        let flow = SearchFlow::new(
            services.movies,
            services.log_store,
            background.clone(),
            search_slot,
        );
        tokio::spawn(flow.run(services.identity, settled));

        Self {
            input,
            search,
            trending,
            background,
        }
    }

    /// A new value of the search box.
    pub fn input(&self, term: impl Into<String>) {
        if self.input.send(term.into()).is_err() {
            tracing::warn!("search input is no longer read, dropping it");
        }
    }

    pub fn search(&self) -> SearchState {
        self.search.borrow().clone()
    }

    pub fn trending(&self) -> Vec<TrendingMovie> {
        self.trending.borrow().clone()
    }

    pub fn watch_search(&self) -> watch::Receiver<SearchState> {
        self.search.clone()
    }

    pub fn watch_trending(&self) -> watch::Receiver<Vec<TrendingMovie>> {
        self.trending.clone()
    }

    /// Waits for background work, such as search log appends, to finish.
    pub async fn settle(&self) {
        self.background.settle().await;
    }
}

async fn load_trending(
    services: Services, config: PageConfig, slot: watch::Sender<Vec<TrendingMovie>>,
) {
    let movies = trending::load(
        config.trending_source,
        services.log_store.as_ref(),
        services.movies.as_ref(),
        config.trending_limit,
    )
    .await;

    tracing::info!(count = movies.len(), source = ?config.trending_source, "loaded trending movies");
    slot.send_replace(movies);
}

/// Dropping the debouncer when input ends cancels a pending value.
async fn debounce_input(mut inputs: mpsc::UnboundedReceiver<String>, mut debouncer: Debouncer<String>) {
    while let Some(term) = inputs.recv().await {
        debouncer.push(term);
    }

    tracing::debug!(pending = debouncer.is_pending(), "search input closed");
}
