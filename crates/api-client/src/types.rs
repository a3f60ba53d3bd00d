// In crates/api-client/src/types.rs

use core_types::serde_util::null_as_default;
use core_types::{Candle, EquityPoint, Trade};
use reqwest::Client;
use serde::Deserialize;

/// The HTTP client for the bot backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// The base URL every endpoint path is appended to, without a trailing slash.
    pub base_url: String,
}

/// Body of `GET /candles`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CandlesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub candles: Vec<Candle>,
}

/// Body of `GET /equity`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EquityResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub equity: Vec<EquityPoint>,
}

/// Body of `GET /bot_trades`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TradesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub trades: Vec<Trade>,
}
