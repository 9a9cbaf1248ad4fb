use std::sync::Arc;

use derive_new::new;
use tokio::sync::{mpsc, watch};
use tracing::instrument;

use super::state::{SearchState, FETCH_FAILED};
use crate::model::{Movie, SearchLogEntry};
use crate::service::background::Background;
use crate::service::backend::{Identity, LogStore};
use crate::service::session::ensure_anonymous_session;
use crate::service::tmdb::{Listing, MovieSource};

/// Turns settled search terms into movie lists.
#[derive(new)]
pub struct SearchFlow {
    movies: Arc<dyn MovieSource>,
    log_store: Arc<dyn LogStore>,
    background: Background,
    state: watch::Sender<SearchState>,
}

impl SearchFlow {
    /// Browses once while signing in, then fetches for every settled term
    /// until the input side goes away. Browsing never logs, so only searches
    /// wait for the session.
    pub async fn run(self, identity: Arc<dyn Identity>, mut settled: mpsc::UnboundedReceiver<String>) {
        let mut current = String::new();
        tokio::join!(
            ensure_anonymous_session(identity.as_ref()),
            self.fetch(&current)
        );

        while let Some(term) = settled.recv().await {
            if term == current {
                tracing::debug!(%term, "search term settled unchanged");
                continue;
            }

            current = term;
            self.fetch(&current).await;
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, query: &str) {
        self.state.send_modify(|state| {
            state.query = query.to_string();
            state.is_loading = true;
            state.error_message = None;
        });

        match self.movies.movies(Listing::for_query(query)).await {
            Ok(movies) => {
                tracing::info!(count = movies.len(), "fetched movies");

                if let Some(top) = movies.first().filter(|_| !query.is_empty()) {
                    self.log_search(query, top);
                }

                self.state.send_modify(|state| {
                    state.movies = movies;
                    state.is_loading = false;
                    state.completed += 1;
                });
            }
            Err(error) => {
                tracing::error!(%error, "error fetching movies");

                self.state.send_modify(|state| {
                    state.error_message = Some(FETCH_FAILED.to_string());
                    state.is_loading = false;
                    state.completed += 1;
                });
            }
        }
    }

    fn log_search(&self, query: &str, top: &Movie) {
        let entry = SearchLogEntry::from_top_result(query, top);
        let store = self.log_store.clone();

        self.background
            .spawn("log search", async move { store.append(&entry).await });
    }
}
