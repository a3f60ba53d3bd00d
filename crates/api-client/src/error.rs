// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("Deserialization failed for {url}: {source}")]
    DeserializationFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Request timed out for {url}")]
    Timeout { url: String },
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] core_types::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
