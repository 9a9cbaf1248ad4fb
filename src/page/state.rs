use serde::{Deserialize, Serialize};

use crate::model::Movie;

/// Shown instead of the movie list when fetching it failed.
pub const FETCH_FAILED: &str = "Failed to fetch movies. Please try again later.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    /// The debounced term the latest fetch was made for.
    pub query: String,
    pub is_loading: bool,
    pub error_message: Option<String>,
    /// Movies of the latest successful fetch.
    pub movies: Vec<Movie>,
    /// Number of fetches that have finished, successful or not. Only kept on
    /// the watch channel, never sent out.
    #[serde(skip)]
    pub completed: u64,
}
