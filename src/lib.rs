// Core modules
pub mod api;
pub mod indicators;
pub mod models;
pub mod sentiment;
pub mod settings;

// Re-export commonly used types
pub use api::{FilingProvider, PriceProvider, TextScorer};
pub use indicators::{calculate_ema_series, calculate_macd, detect_divergence, DivergenceSignal};
pub use models::*;
pub use sentiment::{SentimentEngine, SentimentReport};
pub use settings::Settings;

// Error handling
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
