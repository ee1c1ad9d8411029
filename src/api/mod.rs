pub mod alpha_vantage;
pub mod sec;

pub use alpha_vantage::{AlphaVantageClient, AlphaVantageConfig};
pub use sec::{SecClient, SecConfig};

use crate::models::{Filing, PriceHistory};
use crate::Result;
use async_trait::async_trait;

/// Source of historical quotes for a ticker
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Quotes keyed by timestamp. An empty map means no data was available.
    async fn price_history(&self, ticker: &str) -> Result<PriceHistory>;
}

/// Source of regulatory filings for a ticker
#[async_trait]
pub trait FilingProvider: Send + Sync {
    /// Filings newest first, or `None` if the ticker is unknown to the provider
    async fn company_filings(&self, ticker: &str) -> Result<Option<Vec<Filing>>>;

    /// Registered company name, if the provider knows it
    async fn company_name(&self, _ticker: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Scores the polarity of a piece of text
pub trait TextScorer: Send + Sync {
    /// Polarity in [-1.0, 1.0]
    fn polarity(&self, text: &str) -> f64;
}
