use super::PriceProvider;
use crate::models::PriceHistory;
use crate::Result;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::time::{sleep, Duration};

const ALPHA_VANTAGE_API_BASE: &str = "https://www.alphavantage.co/query";
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 1000;

type AlphaVantageRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Connection settings for Alpha Vantage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaVantageConfig {
    pub api_key: String,
    pub base_url: String,
    /// Intraday bar size: 1min, 5min, 15min, 30min or 60min
    pub interval: String,
    pub requests_per_minute: u32,
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: ALPHA_VANTAGE_API_BASE.to_string(),
            interval: "5min".to_string(),
            requests_per_minute: 5, // free tier
        }
    }
}

/// Alpha Vantage intraday quote client
///
/// Clones share the same rate limiter.
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    config: AlphaVantageConfig,
    rate_limiter: Arc<AlphaVantageRateLimiter>,
    retry_backoff: Duration,
}

impl AlphaVantageClient {
    pub fn new(config: AlphaVantageConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let rpm = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(rpm)));

        Ok(Self {
            client,
            config,
            rate_limiter,
            retry_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    /// Override the initial retry backoff (doubles on every attempt)
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Fetch the intraday time series for `ticker`
    ///
    /// Rejected requests and responses without a time series are logged
    /// and yield an empty history.
    pub async fn get_intraday(&self, ticker: &str) -> Result<PriceHistory> {
        let Some(body) = self.fetch_with_retry(ticker).await? else {
            return Ok(PriceHistory::new());
        };

        let history = parse_time_series(&body, &self.config.interval)?;
        tracing::debug!(ticker = %ticker, bars = history.len(), "Fetched intraday series");
        Ok(history)
    }

    async fn fetch_with_retry(&self, ticker: &str) -> Result<Option<Value>> {
        for attempt in 1..=MAX_RETRIES {
            self.rate_limiter.until_ready().await;

            let backoff = self.retry_backoff * 2_u32.pow(attempt - 1);

            match self.fetch_once(ticker).await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(Some(response.json().await?));
                    }

                    let retryable =
                        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
                    if retryable && attempt < MAX_RETRIES {
                        tracing::warn!(
                            "Alpha Vantage returned {} for {}, retrying in {}ms (attempt {}/{})",
                            status,
                            ticker,
                            backoff.as_millis(),
                            attempt,
                            MAX_RETRIES
                        );
                        sleep(backoff).await;
                        continue;
                    }

                    tracing::error!(ticker = %ticker, status = %status, "Error fetching Alpha Vantage data");
                    return Ok(None);
                }
                Err(e) if attempt < MAX_RETRIES => {
                    tracing::warn!(
                        "Network error: {}, retrying in {}ms (attempt {}/{})",
                        e,
                        backoff.as_millis(),
                        attempt,
                        MAX_RETRIES
                    );
                    sleep(backoff).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(None)
    }

    async fn fetch_once(&self, ticker: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(&self.config.base_url)
            .query(&[
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", ticker),
                ("interval", self.config.interval.as_str()),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await
    }
}

#[async_trait]
impl PriceProvider for AlphaVantageClient {
    async fn price_history(&self, ticker: &str) -> Result<PriceHistory> {
        self.get_intraday(ticker).await
    }
}

/// Pull the `Time Series (<interval>)` object out of a response body
fn parse_time_series(body: &Value, interval: &str) -> Result<PriceHistory> {
    let key = format!("Time Series ({})", interval);

    match body.get(&key) {
        Some(series) => Ok(serde_json::from_value(series.clone())?),
        None => {
            // API errors and throttling notices come back as 200 with a message
            let message = ["Error Message", "Note", "Information"]
                .iter()
                .find_map(|field| body.get(*field).and_then(Value::as_str))
                .unwrap_or("missing time series");
            tracing::warn!("Alpha Vantage response has no '{}': {}", key, message);
            Ok(PriceHistory::new())
        }
    }
}
