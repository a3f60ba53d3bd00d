// In crates/api-client/src/lib.rs

use app_config::BackendSettings;
use async_trait::async_trait;
use core_types::{
    Candle, EquityPoint, MarketMetrics, OrderBookDepth, OrderBookSnapshot, Resource,
    StatusSnapshot, StrategyParams, Trade,
};
use serde::de::DeserializeOwned;

pub mod error;
pub mod source;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use source::DashboardSource;
pub use types::*;

impl ApiClient {
    /// Constructs a new ApiClient from BackendSettings.
    ///
    /// The configured request timeout applies to every call, so a backend that
    /// never answers surfaces as `Error::Timeout` instead of hanging a poll cycle.
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        Ok(ApiClient {
            http_client,
            base_url,
        })
    }

    /// Issues a GET and decodes the JSON body.
    ///
    /// # Arguments
    ///
    /// * `path`: The endpoint path including its query string (e.g. `/candles?limit=200`).
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify(e, path))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: path.to_string(),
            });
        }

        let text = response.text().await.map_err(|e| classify(e, path))?;
        serde_json::from_str(&text).map_err(|source| Error::DeserializationFailed {
            url: path.to_string(),
            source,
        })
    }

    /// Fetches the scalar bot state.
    ///
    /// This corresponds to the `GET /status` endpoint.
    pub async fn get_status(&self) -> Result<StatusSnapshot> {
        self.get_json(Resource::Status.path()).await
    }

    /// Fetches the most recent candles, oldest first.
    ///
    /// This corresponds to the `GET /candles?limit=N` endpoint.
    pub async fn get_candles(&self, limit: usize) -> Result<Vec<Candle>> {
        let path = format!("{}?limit={}", Resource::Candles.path(), limit);
        let body: CandlesResponse = self.get_json(&path).await?;
        Ok(body.candles)
    }

    /// This corresponds to the `GET /equity?limit=N` endpoint.
    pub async fn get_equity(&self, limit: usize) -> Result<Vec<EquityPoint>> {
        let path = format!("{}?limit={}", Resource::Equity.path(), limit);
        let body: EquityResponse = self.get_json(&path).await?;
        Ok(body.equity)
    }

    /// This corresponds to the `GET /bot_trades?limit=N` endpoint.
    pub async fn get_trades(&self, limit: usize) -> Result<Vec<Trade>> {
        let path = format!("{}?limit={}", Resource::Trades.path(), limit);
        let body: TradesResponse = self.get_json(&path).await?;
        Ok(body.trades)
    }

    /// This corresponds to the `GET /orderbook?depth=N` endpoint.
    pub async fn get_orderbook(&self, depth: OrderBookDepth) -> Result<OrderBookSnapshot> {
        let path = format!("{}?depth={}", Resource::OrderBook.path(), depth.get());
        self.get_json(&path).await
    }

    /// This corresponds to the `GET /market_metrics?history=N` endpoint.
    /// A `null` body means no readings yet.
    pub async fn get_market_metrics(&self, history: usize) -> Result<MarketMetrics> {
        let path = format!("{}?history={}", Resource::MarketMetrics.path(), history);
        let body: Option<MarketMetrics> = self.get_json(&path).await?;
        Ok(body.unwrap_or_default())
    }

    /// Pushes new strategy parameters to the bot.
    /// Corresponds to `POST /config`. The response body is ignored.
    pub async fn post_config(&self, params: &StrategyParams) -> Result<()> {
        params.validate()?;

        let path = "/config";
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .post(&url)
            .json(params)
            .send()
            .await
            .map_err(|e| classify(e, path))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: path.to_string(),
            });
        }

        tracing::info!(?params, "Strategy parameters pushed to the bot.");
        Ok(())
    }
}

/// Splits timeouts out of the generic transport failures.
fn classify(error: reqwest::Error, path: &str) -> Error {
    if error.is_timeout() {
        Error::Timeout {
            url: path.to_string(),
        }
    } else {
        Error::RequestFailed(error)
    }
}

#[async_trait]
impl DashboardSource for ApiClient {
    async fn fetch_status(&self) -> Result<StatusSnapshot> {
        self.get_status().await
    }

    async fn fetch_candles(&self, limit: usize) -> Result<Vec<Candle>> {
        self.get_candles(limit).await
    }

    async fn fetch_equity(&self, limit: usize) -> Result<Vec<EquityPoint>> {
        self.get_equity(limit).await
    }

    async fn fetch_trades(&self, limit: usize) -> Result<Vec<Trade>> {
        self.get_trades(limit).await
    }

    async fn fetch_orderbook(&self, depth: OrderBookDepth) -> Result<OrderBookSnapshot> {
        self.get_orderbook(depth).await
    }

    async fn fetch_market_metrics(&self, history: usize) -> Result<MarketMetrics> {
        self.get_market_metrics(history).await
    }
}

// Free function to allow api_client::new usage
pub fn new(settings: &BackendSettings) -> Result<ApiClient> {
    ApiClient::new(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Signal;
    use mockito::Matcher;
    use rust_decimal_macros::dec;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(&BackendSettings {
            base_url: format!("{}/", server.url()),
            request_timeout_ms: 2_000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_status_decodes_scalars() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/status")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"initial_cash": 100.0, "pnl": -4.25, "n_trades": 3, "feed_status": "streaming"}"#)
            .create_async()
            .await;

        let status = client_for(&server).get_status().await.unwrap();
        assert_eq!(status.initial_cash, Some(dec!(100)));
        assert_eq!(status.pnl, Some(dec!(-4.25)));
        assert_eq!(status.n_trades, Some(3));
        assert_eq!(status.feed_status.as_deref(), Some("streaming"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_candles_sends_limit_and_unwraps_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/candles")
            .match_query(Matcher::UrlEncoded("limit".into(), "200".into()))
            .with_status(200)
            .with_body(
                r#"{"limit": 200, "count": 2, "candles": [
                    {"t0": "2024-05-01T10:00:00Z", "open": 100.0, "close": 101.5, "signal_candle": 1},
                    {"t0": "2024-05-01T10:01:00Z", "open": 101.5, "close": 99.0, "signal_combined": -1}
                ]}"#,
            )
            .create_async()
            .await;

        let candles = client_for(&server).get_candles(200).await.unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].close, Some(dec!(101.5)));
        assert_eq!(candles[0].effective_signal(), Signal::Long);
        assert_eq!(candles[1].effective_signal(), Signal::Short);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_envelope_field_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bot_trades")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"limit": 200, "count": 0}"#)
            .create_async()
            .await;

        let trades = client_for(&server).get_trades(200).await.unwrap();
        assert!(trades.is_empty());
    }

    #[tokio::test]
    async fn test_null_payloads_read_as_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/candles")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candles": null}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/orderbook")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"bids": null, "asks": [{"price": 101.0, "qty": 2.0}], "latency_ms": 8.0}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/market_metrics")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.get_candles(200).await.unwrap().is_empty());

        let book = client.get_orderbook(OrderBookDepth::default()).await.unwrap();
        assert!(book.bids.is_empty());
        assert_eq!(book.asks.len(), 1);
        assert_eq!(book.latency_ms, Some(8.0));

        let metrics = client.get_market_metrics(240).await.unwrap();
        assert_eq!(metrics, MarketMetrics::default());
    }

    #[tokio::test]
    async fn test_non_success_status_names_the_path() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/orderbook")
            .match_query(Matcher::UrlEncoded("depth".into(), "10".into()))
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let depth = OrderBookDepth::new(10).unwrap();
        let err = client_for(&server).get_orderbook(depth).await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
        assert_eq!(err.to_string(), "HTTP 503 for /orderbook?depth=10");
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_deserialization_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/market_metrics")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{not json")
            .create_async()
            .await;

        let err = client_for(&server).get_market_metrics(240).await.unwrap_err();
        assert!(matches!(err, Error::DeserializationFailed { .. }));
    }

    #[tokio::test]
    async fn test_post_config_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/config")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "stop_loss_pct": 0.02,
                "position_scale": 1.5
            })))
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        let params = StrategyParams {
            stop_loss_pct: 0.02,
            take_profit_pct: 0.04,
            trailing_stop_pct: 0.01,
            position_scale: 1.5,
        };
        client_for(&server).post_config(&params).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_config_rejects_out_of_range_params_without_a_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/config").expect(0).create_async().await;

        let params = StrategyParams {
            position_scale: 5.0,
            ..Default::default()
        };
        let err = client_for(&server).post_config(&params).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        mock.assert_async().await;
    }
}
