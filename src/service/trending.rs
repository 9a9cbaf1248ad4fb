use std::collections::HashMap;

use serde::Deserialize;
use tracing::instrument;

use super::backend::LogStore;
use super::tmdb::{Listing, MovieSource};
use crate::model::{MovieStat, SearchLogEntry, TrendingMovie};

/// How many of the newest log entries an aggregation looks at.
pub const READ_WINDOW: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendingSource {
    /// Movies users searched for most, from the search log.
    #[default]
    SearchLog,
    /// The provider's popular list.
    Popular,
}

/// Counts how often each movie appears in `entries` and ranks them.
///
/// The first entry seen for a movie provides its title, poster and rating.
/// Movies with the same count keep the order in which they were first seen.
pub fn aggregate(entries: impl IntoIterator<Item = SearchLogEntry>, limit: usize) -> Vec<MovieStat> {
    let mut stats: Vec<MovieStat> = Vec::new();
    let mut index = HashMap::new();

    for entry in entries {
        let Some(movie_id) = entry.movie_id else {
            continue;
        };

        let position = *index.entry(movie_id).or_insert_with(|| {
            stats.push(MovieStat::first_seen(movie_id, &entry));
            stats.len() - 1
        });
        stats[position].count += 1;
    }

    // stable, so ties stay in first-seen order
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats.truncate(limit);
    stats
}

/// Ranks the movies of the newest [READ_WINDOW] log entries. Any failure to
/// read the log means there is nothing trending.
#[instrument(skip(store))]
pub async fn compute_trending(store: &dyn LogStore, limit: usize) -> Vec<MovieStat> {
    match store.recent(READ_WINDOW).await {
        Ok(entries) => aggregate(entries, limit),
        Err(error) => {
            tracing::warn!(%error, "failed to read the search log, no trending movies");
            Vec::new()
        }
    }
}

/// The first `limit` movies of the provider's popular list.
#[instrument(skip(movies))]
pub async fn popular(movies: &dyn MovieSource, limit: usize) -> Vec<TrendingMovie> {
    match movies.movies(Listing::Popular).await {
        Ok(movies) => movies.into_iter().take(limit).map(Into::into).collect(),
        Err(error) => {
            tracing::warn!(%error, "failed to load popular movies, no trending movies");
            Vec::new()
        }
    }
}

pub async fn load(
    source: TrendingSource, store: &dyn LogStore, movies: &dyn MovieSource, limit: usize,
) -> Vec<TrendingMovie> {
    match source {
        TrendingSource::SearchLog => compute_trending(store, limit)
            .await
            .into_iter()
            .map(Into::into)
            .collect(),
        TrendingSource::Popular => popular(movies, limit).await,
    }
}
