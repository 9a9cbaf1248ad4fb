use reqwest::StatusCode;
use snafu::Snafu;
use url::Url;

pub type Result<T, E = BackendError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BackendError {
    #[snafu(display("missing connection parameters: {}", names.join(", ")))]
    ConfigMissing { names: Vec<&'static str> },

    #[snafu(display("invalid backend endpoint `{endpoint}`: {source}"))]
    ParseEndpoint {
        endpoint: String,
        source: url::ParseError,
    },

    #[snafu(display("backend endpoint `{endpoint}` cannot hold a path"))]
    EndpointNotBase { endpoint: Url },

    #[snafu(display("failed to build the backend client: {source}"))]
    HttpClient { source: reqwest::Error },

    #[snafu(display("request to `{url}` failed: {source}"))]
    Transport { url: Url, source: reqwest::Error },

    #[snafu(display("`{url}` responded with {status}"))]
    Status { url: Url, status: StatusCode },

    #[snafu(display("malformed response from `{url}`: {source}"))]
    Decode { url: Url, source: reqwest::Error },
}
