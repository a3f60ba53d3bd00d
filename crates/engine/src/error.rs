// In crates/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("API client error: {0}")]
    ApiClient(#[from] api_client::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
