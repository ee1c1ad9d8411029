use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Raw quote as delivered by a market data service
///
/// Numeric fields stay as strings until they cross into a `PriceSeries`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteRecord {
    #[serde(rename = "1. open", default)]
    pub open: Option<String>,
    #[serde(rename = "2. high", default)]
    pub high: Option<String>,
    #[serde(rename = "3. low", default)]
    pub low: Option<String>,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume", default)]
    pub volume: Option<String>,
}

impl QuoteRecord {
    pub fn with_close(close: impl Into<String>) -> Self {
        Self {
            open: None,
            high: None,
            low: None,
            close: close.into(),
            volume: None,
        }
    }
}

/// Timestamp -> quote mapping returned by a price provider
pub type PriceHistory = BTreeMap<String, QuoteRecord>;

/// Errors raised while turning provider records into a `PriceSeries`
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("invalid close price '{value}' at {timestamp}")]
    InvalidPrice { timestamp: String, value: String },

    #[error("non-finite close price at {timestamp}")]
    NonFinitePrice { timestamp: String },
}

/// Chronological closing prices (oldest first)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    timestamps: Vec<NaiveDateTime>,
    closes: Vec<f64>,
}

impl PriceSeries {
    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Most recent timestamp and close
    pub fn latest(&self) -> Option<(NaiveDateTime, f64)> {
        Some((*self.timestamps.last()?, *self.closes.last()?))
    }
}

impl TryFrom<&PriceHistory> for PriceSeries {
    type Error = DataError;

    fn try_from(history: &PriceHistory) -> Result<Self, Self::Error> {
        let mut points = history
            .iter()
            .map(|(timestamp, quote)| {
                let ts = parse_timestamp(timestamp)?;
                let close: f64 = quote.close.trim().parse().map_err(|_| DataError::InvalidPrice {
                    timestamp: timestamp.clone(),
                    value: quote.close.clone(),
                })?;
                if !close.is_finite() {
                    return Err(DataError::NonFinitePrice {
                        timestamp: timestamp.clone(),
                    });
                }
                Ok((ts, close))
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Keys are strings, so order by the parsed time instead
        points.sort_by_key(|(ts, _)| *ts);

        let (timestamps, closes) = points.into_iter().unzip();
        Ok(Self { timestamps, closes })
    }
}

/// Accepts intraday ("2024-01-05 16:00:00") and daily ("2024-01-05") keys
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, DataError> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| DataError::InvalidTimestamp(raw.to_string()))
}

/// A single regulatory filing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Filing {
    pub form_type: String,
    pub filing_date: String,
    pub description: String,
}

/// Company as registered with the SEC
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub ticker: String,
    /// Zero-padded 10 digit CIK
    pub cik: String,
    pub name: String,
}
