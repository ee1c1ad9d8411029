use super::moving_average::calculate_ema_series;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    #[error("{name} period must be greater than zero")]
    ZeroPeriod { name: &'static str },

    #[error("fast period ({fast}) must be shorter than slow period ({slow})")]
    FastNotShorterThanSlow { fast: usize, slow: usize },
}

/// Periods used for the MACD calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD line and its signal line, index-aligned with the input prices
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
}

impl MacdResult {
    /// True when there was no input to compute from
    pub fn is_empty(&self) -> bool {
        self.macd_line.is_empty()
    }

    /// MACD minus signal, per index
    pub fn histogram(&self) -> Vec<f64> {
        self.macd_line
            .iter()
            .zip(&self.signal_line)
            .map(|(macd, signal)| macd - signal)
            .collect()
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.macd_line, self.signal_line)
    }
}

impl MacdConfig {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        for (name, period) in [
            ("fast", self.fast_period),
            ("slow", self.slow_period),
            ("signal", self.signal_period),
        ] {
            if period == 0 {
                return Err(IndicatorError::ZeroPeriod { name });
            }
        }

        if self.fast_period >= self.slow_period {
            return Err(IndicatorError::FastNotShorterThanSlow {
                fast: self.fast_period,
                slow: self.slow_period,
            });
        }

        Ok(())
    }

    /// Compute the MACD and signal lines for `prices` (oldest first)
    ///
    /// Empty input yields an empty result rather than an error.
    pub fn calculate(&self, prices: &[f64]) -> MacdResult {
        let ema_fast = calculate_ema_series(prices, self.fast_period);
        let ema_slow = calculate_ema_series(prices, self.slow_period);

        if ema_fast.is_empty() {
            return MacdResult::default();
        }

        let macd_line: Vec<f64> = ema_fast
            .iter()
            .zip(&ema_slow)
            .map(|(fast, slow)| fast - slow)
            .collect();
        let signal_line = calculate_ema_series(&macd_line, self.signal_period);

        MacdResult {
            macd_line,
            signal_line,
        }
    }
}

/// Calculate MACD with the standard 12/26/9 periods
///
/// Returns `(macd_line, signal_line)`. Two empty vectors mean the
/// calculation was not possible.
pub fn calculate_macd(prices: &[f64]) -> (Vec<f64>, Vec<f64>) {
    MacdConfig::default().calculate(prices).into_parts()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < TOLERANCE, "{} != {}", a, e);
        }
    }

    #[test]
    fn test_macd_empty_input() {
        let (macd_line, signal_line) = calculate_macd(&[]);
        assert!(macd_line.is_empty());
        assert!(signal_line.is_empty());
    }

    #[test]
    fn test_macd_known_values() {
        let prices = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let (macd_line, signal_line) = calculate_macd(&prices);

        assert_close(
            &macd_line,
            &[
                0.0,
                0.0797720797720789,
                0.22113456871291426,
                0.4091406831968971,
                0.6315484289242708,
                0.8783744584380333,
            ],
        );
        assert_close(
            &signal_line,
            &[
                0.0,
                0.01595441595441578,
                0.05699044650611548,
                0.1274204938442718,
                0.2282460808602716,
                0.358271756375824,
            ],
        );
    }

    #[test]
    fn test_macd_flat_prices_are_zero() {
        let result = MacdConfig::default().calculate(&[50.0; 40]);
        assert!(result.macd_line.iter().all(|&v| v == 0.0));
        assert!(result.signal_line.iter().all(|&v| v == 0.0));
        assert_eq!(result.macd_line.len(), 40);
    }

    #[test]
    fn test_macd_lines_share_input_length() {
        let prices: Vec<f64> = (0..57).map(|i| (i as f64 * 0.3).sin() + 20.0).collect();
        let result = MacdConfig::default().calculate(&prices);
        assert_eq!(result.macd_line.len(), prices.len());
        assert_eq!(result.signal_line.len(), prices.len());
        assert_eq!(result.histogram().len(), prices.len());
    }

    #[test]
    fn test_histogram() {
        let result = MacdResult {
            macd_line: vec![1.0, 2.0, 0.5],
            signal_line: vec![0.5, 1.0, 1.5],
        };
        assert_eq!(result.histogram(), vec![0.5, 1.0, -1.0]);
    }

    #[test]
    fn test_custom_periods() {
        let config = MacdConfig {
            fast_period: 1,
            slow_period: 3,
            signal_period: 1,
        };
        // fast EMA == price, slow EMA (multiplier 0.5) == [100, 101, 101, 102]
        let result = config.calculate(&[100.0, 102.0, 101.0, 103.0]);
        assert_eq!(result.macd_line, vec![0.0, 1.0, 0.0, 1.0]);
        assert_eq!(result.signal_line, result.macd_line);
    }

    #[test]
    fn test_validate() {
        assert!(MacdConfig::default().validate().is_ok());

        let zero = MacdConfig {
            signal_period: 0,
            ..MacdConfig::default()
        };
        assert_eq!(
            zero.validate(),
            Err(IndicatorError::ZeroPeriod { name: "signal" })
        );

        let inverted = MacdConfig {
            fast_period: 26,
            slow_period: 12,
            signal_period: 9,
        };
        assert_eq!(
            inverted.validate(),
            Err(IndicatorError::FastNotShorterThanSlow { fast: 26, slow: 12 })
        );
    }
}
