// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid order book depth {0}: must be between 5 and 50 in steps of 5")]
    InvalidDepth(u32),

    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
