use super::*;

/// One successful search, as it is written to the log store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct SearchLogEntry {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub movie_id: Option<MovieId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "super::number_or_null")]
    pub vote_average: Option<f64>,
    #[new(value = "now()")]
    pub created_at: Timestamp,
}

impl SearchLogEntry {
    /// Snapshots the top result of a search.
    pub fn from_top_result(search_term: &str, movie: &Movie) -> Self {
        Self::new(
            search_term.to_string(),
            Some(movie.id),
            movie.title.clone(),
            movie.poster_path.clone(),
            movie.vote_average,
        )
    }
}
