// Sentiment orchestration
// Wires the providers into the indicator engine and builds a report

pub mod lexicon;

pub use lexicon::{average_polarity, LexiconScorer};

use crate::api::{FilingProvider, PriceProvider, TextScorer};
use crate::indicators::{detect_divergence, DivergenceSignal, MacdConfig};
use crate::models::{Filing, PriceSeries};
use crate::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;

/// Result of the MACD divergence analysis on price data
#[derive(Debug, Clone, Serialize)]
pub struct PriceSentiment {
    pub signal: DivergenceSignal,
    /// False when the provider had no price data
    pub available: bool,
    pub bars: usize,
    pub latest_close: Option<f64>,
    pub latest_timestamp: Option<NaiveDateTime>,
    pub latest_macd: Option<f64>,
    pub latest_signal_line: Option<f64>,
}

impl PriceSentiment {
    fn unavailable() -> Self {
        Self {
            signal: DivergenceSignal::None,
            available: false,
            bars: 0,
            latest_close: None,
            latest_timestamp: None,
            latest_macd: None,
            latest_signal_line: None,
        }
    }

    /// +1 bullish, -1 bearish, 0 otherwise
    pub fn score(&self) -> i8 {
        self.signal.as_i8()
    }
}

/// Summary of a company's recent filings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FilingAnalysis {
    Found {
        total_filings: usize,
        recent_filings: Vec<Filing>,
    },
    NoFilings,
    Unavailable {
        reason: String,
    },
}

impl FilingAnalysis {
    /// Keep the first `limit` filings (provider order, newest first)
    pub fn from_filings(filings: Vec<Filing>, limit: usize) -> Self {
        if filings.is_empty() {
            return FilingAnalysis::NoFilings;
        }

        let total_filings = filings.len();
        let recent_filings = filings.into_iter().take(limit).collect();
        FilingAnalysis::Found {
            total_filings,
            recent_filings,
        }
    }

    pub fn recent_filings(&self) -> &[Filing] {
        match self {
            FilingAnalysis::Found { recent_filings, .. } => recent_filings,
            _ => &[],
        }
    }
}

/// Everything the engine found for one ticker
#[derive(Debug, Clone, Serialize)]
pub struct SentimentReport {
    pub ticker: String,
    /// Registered company name, or the ticker when the lookup finds nothing
    pub company_name: String,
    pub price: PriceSentiment,
    pub filings: FilingAnalysis,
    /// Mean polarity of the recent filing descriptions
    pub filing_text_polarity: f64,
}

/// Combines price, filing and text sources into a sentiment report
pub struct SentimentEngine {
    prices: Arc<dyn PriceProvider>,
    filings: Arc<dyn FilingProvider>,
    scorer: Arc<dyn TextScorer>,
    macd: MacdConfig,
    recent_limit: usize,
}

impl SentimentEngine {
    pub fn new(
        prices: Arc<dyn PriceProvider>,
        filings: Arc<dyn FilingProvider>,
        scorer: Arc<dyn TextScorer>,
    ) -> Self {
        Self {
            prices,
            filings,
            scorer,
            macd: MacdConfig::default(),
            recent_limit: 5,
        }
    }

    pub fn with_macd_config(mut self, macd: MacdConfig) -> Self {
        self.macd = macd;
        self
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Classify MACD divergence on the ticker's price history
    ///
    /// No price data is reported as unavailable, not as an error.
    /// Malformed quotes are an error.
    pub async fn price_sentiment(&self, ticker: &str) -> Result<PriceSentiment> {
        let history = self.prices.price_history(ticker).await?;

        if history.is_empty() {
            tracing::warn!(ticker = %ticker, "No price data available for sentiment analysis");
            return Ok(PriceSentiment::unavailable());
        }

        let series = PriceSeries::try_from(&history)?;
        let macd = self.macd.calculate(series.closes());
        let signal = detect_divergence(series.closes(), &macd.macd_line);

        match signal {
            DivergenceSignal::Bullish => tracing::info!(ticker = %ticker, "Bullish divergence detected"),
            DivergenceSignal::Bearish => tracing::info!(ticker = %ticker, "Bearish divergence detected"),
            DivergenceSignal::None => {
                tracing::info!(ticker = %ticker, "No significant divergence detected")
            }
        }

        let latest = series.latest();
        Ok(PriceSentiment {
            signal,
            available: true,
            bars: series.len(),
            latest_close: latest.map(|(_, close)| close),
            latest_timestamp: latest.map(|(ts, _)| ts),
            latest_macd: macd.macd_line.last().copied(),
            latest_signal_line: macd.signal_line.last().copied(),
        })
    }

    /// Summarise the ticker's recent filings
    pub async fn filing_analysis(&self, ticker: &str) -> Result<FilingAnalysis> {
        match self.filings.company_filings(ticker).await? {
            Some(filings) => Ok(FilingAnalysis::from_filings(filings, self.recent_limit)),
            None => {
                tracing::warn!(ticker = %ticker, "No filings data available");
                Ok(FilingAnalysis::NoFilings)
            }
        }
    }

    /// Company name for display, falling back to the ticker
    pub async fn company_name(&self, ticker: &str) -> String {
        match self.filings.company_name(ticker).await {
            Ok(Some(name)) => name,
            Ok(None) => ticker.to_string(),
            Err(e) => {
                tracing::warn!(ticker = %ticker, "Error fetching company name: {}", e);
                ticker.to_string()
            }
        }
    }

    /// Mean polarity of `texts`
    pub fn text_sentiment(&self, texts: &[String]) -> f64 {
        average_polarity(self.scorer.as_ref(), texts)
    }

    /// Run the full analysis for one ticker
    ///
    /// Price failures propagate. Filing failures are recorded in the
    /// report since filings are supplementary.
    pub async fn run(&self, ticker: &str) -> Result<SentimentReport> {
        let ticker = ticker.trim().to_uppercase();
        let company_name = self.company_name(&ticker).await;

        tracing::info!(ticker = %ticker, "Fetching price data");
        let price = self.price_sentiment(&ticker).await?;

        tracing::info!(ticker = %ticker, "Fetching filings data");
        let filings = match self.filing_analysis(&ticker).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(ticker = %ticker, "Filing analysis failed: {}", e);
                FilingAnalysis::Unavailable {
                    reason: e.to_string(),
                }
            }
        };

        let descriptions: Vec<String> = filings
            .recent_filings()
            .iter()
            .map(|f| f.description.clone())
            .filter(|d| !d.trim().is_empty())
            .collect();
        let filing_text_polarity = self.text_sentiment(&descriptions);

        Ok(SentimentReport {
            ticker,
            company_name,
            price,
            filings,
            filing_text_polarity,
        })
    }
}
