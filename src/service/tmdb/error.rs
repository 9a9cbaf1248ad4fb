use reqwest::StatusCode;
use snafu::Snafu;

pub type Result<T, E = FetchError> = ::std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum FetchError {
    #[snafu(display("failed to build the TMDB client: {source}"))]
    HttpClient { source: reqwest::Error },

    #[snafu(display("request to `{url}` failed: {source}"))]
    Transport { url: String, source: reqwest::Error },

    #[snafu(display("`{url}` responded with {status}"))]
    Status { url: String, status: StatusCode },

    #[snafu(display("malformed movie list from `{url}`: {source}"))]
    Decode { url: String, source: reqwest::Error },
}
