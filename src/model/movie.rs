use super::*;

pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

const NO_MOVIE_POSTER: &str = "/public/no-movie.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, new)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default)]
    pub title: Option<String>,
    #[new(default)]
    #[serde(default)]
    pub poster_path: Option<String>,
    #[new(default)]
    #[serde(default, deserialize_with = "super::number_or_null")]
    pub vote_average: Option<f64>,
    #[new(default)]
    #[serde(default)]
    pub original_language: Option<String>,
    #[new(default)]
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Builds the image URL for a poster, using `fallback` when the movie has none.
pub fn poster_url(size: &str, poster_path: Option<&str>, fallback: &str) -> String {
    match poster_path {
        Some(path) if !path.is_empty() => format!("{IMAGE_BASE_URL}/{size}{path}"),
        _ => fallback.to_string(),
    }
}

/// What a single entry of the movie list shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    pub id: MovieId,
    pub title: String,
    pub poster_url: String,
    pub rating: String,
    pub language: String,
    pub year: String,
}

impl From<&Movie> for MovieCard {
    fn from(movie: &Movie) -> Self {
        let rating = match movie.vote_average {
            Some(average) if average != 0.0 => format!("{average:.1}"),
            _ => "N/A".to_string(),
        };

        let year = movie
            .release_date
            .as_deref()
            .filter(|date| !date.is_empty())
            .and_then(|date| date.split('-').next())
            .unwrap_or("N/A")
            .to_string();

        Self {
            id: movie.id,
            title: movie.title.clone().unwrap_or_default(),
            poster_url: poster_url("w500", movie.poster_path.as_deref(), NO_MOVIE_POSTER),
            rating,
            language: movie.original_language.clone().unwrap_or_default(),
            year,
        }
    }
}
