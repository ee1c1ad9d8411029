use crate::api::{AlphaVantageConfig, SecConfig};
use crate::indicators::MacdConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "SENTIMENT";

/// Application settings
///
/// Layered as: built-in defaults, then an optional config file, then
/// `SENTIMENT_*` environment variables (`__` separates sections, e.g.
/// `SENTIMENT_ALPHA_VANTAGE__API_KEY`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub indicators: MacdConfig,
    pub alpha_vantage: AlphaVantageConfig,
    pub sec: SecConfig,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.indicators
            .validate()
            .context("Invalid indicator periods")?;

        if self.alpha_vantage.api_key.trim().is_empty() {
            tracing::warn!(
                "No Alpha Vantage API key configured (set {}_ALPHA_VANTAGE__API_KEY)",
                ENV_PREFIX
            );
        }

        if self.sec.recent_limit == 0 {
            anyhow::bail!("sec.recent_limit must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with_env(None, env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.indicators.slow_period, 26);
        assert_eq!(settings.alpha_vantage.interval, "5min");
        assert_eq!(settings.sec.recent_limit, 5);
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::load_with_env(
            None,
            env(&[
                ("SENTIMENT_ALPHA_VANTAGE__API_KEY", "demo"),
                ("SENTIMENT_INDICATORS__FAST_PERIOD", "5"),
                ("SENTIMENT_SEC__USER_AGENT", "Jane Doe jane@example.com"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.alpha_vantage.api_key, "demo");
        assert_eq!(settings.indicators.fast_period, 5);
        assert_eq!(settings.indicators.slow_period, 26);
        assert_eq!(settings.sec.user_agent, "Jane Doe jane@example.com");
    }

    #[test]
    fn test_invalid_periods_rejected() {
        let result = Settings::load_with_env(
            None,
            env(&[("SENTIMENT_INDICATORS__FAST_PERIOD", "30")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file() {
        let path = std::env::temp_dir().join(format!(
            "sentiment-engine-test-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[alpha_vantage]\ninterval = \"15min\"\n\n[sec]\nrecent_limit = 3").unwrap();
        drop(file);

        let settings = Settings::load_with_env(Some(&path), env(&[])).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.alpha_vantage.interval, "15min");
        assert_eq!(settings.sec.recent_limit, 3);
        assert_eq!(settings.indicators, MacdConfig::default());
    }
}
