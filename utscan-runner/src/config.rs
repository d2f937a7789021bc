//! Serializable scan configuration.
//!
//! Loaded from TOML; every key is optional and falls back to the UT Bot
//! defaults (ATR window 6, multiplier 3, five days of 15-minute candles,
//! ten workers, Asia/Kolkata).

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use utscan_core::data::{Interval, Period};
use utscan_core::UtBotParams;

/// Errors loading or validating a scan configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything a scan run needs besides the data provider itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Symbols to scan, in report tiebreak order.
    pub symbols: Vec<String>,
    /// ATR window (`c`).
    pub atr_period: usize,
    /// Loss multiplier (`a`).
    pub multiplier: f64,
    /// Lookback range requested from the provider.
    pub period: Period,
    /// Candle width requested from the provider.
    pub interval: Interval,
    /// Maximum pipelines in flight.
    pub workers: usize,
    /// IANA timezone candles are reported in, e.g. "Asia/Kolkata".
    pub timezone: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let params = UtBotParams::default();
        Self {
            symbols: vec![
                "HDFCBANK.NS".to_string(),
                "RELIANCE.NS".to_string(),
                "TCS.NS".to_string(),
            ],
            atr_period: params.atr_period,
            multiplier: params.multiplier,
            period: Period::FiveDays,
            interval: Interval::FifteenMinutes,
            workers: 10,
            timezone: "Asia/Kolkata".to_string(),
        }
    }
}

impl ScanConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize the config to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Indicator parameters. Not validated here: a bad window or multiplier
    /// surfaces as a per-symbol computation error in the report.
    pub fn params(&self) -> UtBotParams {
        UtBotParams {
            atr_period: self.atr_period,
            multiplier: self.multiplier,
        }
    }

    /// Parsed exchange timezone.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::Invalid(format!("timezone '{}': {e}", self.timezone)))
    }

    /// Checks that would otherwise abort the whole batch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::Invalid("symbol list is empty".into()));
        }
        if let Some(blank) = self.symbols.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("symbol #{blank} is blank")));
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be >= 1".into()));
        }
        self.tz()?;
        Ok(())
    }
}
