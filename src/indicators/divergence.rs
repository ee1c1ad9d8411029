use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the MACD divergence check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DivergenceSignal {
    /// Price falling while MACD rises
    Bullish,
    /// Price rising while MACD falls
    Bearish,
    None,
}

impl DivergenceSignal {
    /// +1 bullish, -1 bearish, 0 otherwise
    pub fn as_i8(self) -> i8 {
        match self {
            DivergenceSignal::Bullish => 1,
            DivergenceSignal::Bearish => -1,
            DivergenceSignal::None => 0,
        }
    }
}

impl fmt::Display for DivergenceSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivergenceSignal::Bullish => write!(f, "Bullish divergence"),
            DivergenceSignal::Bearish => write!(f, "Bearish divergence"),
            DivergenceSignal::None => write!(f, "No significant divergence"),
        }
    }
}

/// Detect MACD divergence from the last two points only
///
/// This is a naive two-point heuristic, not a windowed divergence detector:
/// - Bullish: last price lower than the one before, last MACD higher
/// - Bearish: last price higher than the one before, last MACD lower
///
/// Fewer than two values in either series yields `None`.
pub fn detect_divergence(prices: &[f64], macd_line: &[f64]) -> DivergenceSignal {
    let (Some(&[prev_price, last_price]), Some(&[prev_macd, last_macd])) =
        (last_pair(prices), last_pair(macd_line))
    else {
        return DivergenceSignal::None;
    };

    if last_price < prev_price && last_macd > prev_macd {
        DivergenceSignal::Bullish
    } else if last_price > prev_price && last_macd < prev_macd {
        DivergenceSignal::Bearish
    } else {
        DivergenceSignal::None
    }
}

fn last_pair(values: &[f64]) -> Option<&[f64; 2]> {
    values.len().checked_sub(2).and_then(|start| values[start..].try_into().ok())
}
