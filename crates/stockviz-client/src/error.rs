// File: crates/stockviz-client/src/error.rs
// Summary: Error type for API requests.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-2xx response.
    #[error("HTTP {0}")]
    Status(u16),
    /// The backend answered with an `error` field.
    #[error("{0}")]
    Api(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    /// Failure inside a non-HTTP data source.
    #[error("{0}")]
    Source(String),
}
