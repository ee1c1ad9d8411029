// Technical indicators module
// Implements EMA, MACD and the two-point MACD divergence check

pub mod divergence;
pub mod macd;
pub mod moving_average;

pub use divergence::{detect_divergence, DivergenceSignal};
pub use macd::{calculate_macd, IndicatorError, MacdConfig, MacdResult};
pub use moving_average::calculate_ema_series;
