use super::*;

const NO_TRENDING_POSTER: &str = "/public/No-Poster.png";

/// How often a movie was the top result of a search within the read window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct MovieStat {
    pub movie_id: MovieId,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    #[new(value = "0")]
    pub count: u32,
}

impl MovieStat {
    pub fn first_seen(movie_id: MovieId, entry: &SearchLogEntry) -> Self {
        Self::new(
            movie_id,
            entry.title.clone(),
            entry.poster_path.clone(),
            entry.vote_average,
        )
    }
}

/// An entry of the trending section, whichever source produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingMovie {
    pub movie_id: MovieId,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    /// Number of logged searches, absent when the list comes from the provider.
    pub searches: Option<u32>,
}

impl TrendingMovie {
    pub fn poster_url(&self) -> String {
        poster_url("w200", self.poster_path.as_deref(), NO_TRENDING_POSTER)
    }
}

impl From<MovieStat> for TrendingMovie {
    fn from(stat: MovieStat) -> Self {
        Self {
            movie_id: stat.movie_id,
            title: stat.title,
            poster_path: stat.poster_path,
            searches: Some(stat.count),
        }
    }
}

impl From<Movie> for TrendingMovie {
    fn from(movie: Movie) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title,
            poster_path: movie.poster_path,
            searches: None,
        }
    }
}
