//! Candle provider trait, lookback/interval vocabulary and structured errors.
//!
//! The CandleProvider trait abstracts over data sources (Yahoo Finance,
//! synthetic) so the scan can swap implementations and mock for tests.

use crate::domain::Candle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Structured error types for data operations.
///
/// Designed to be displayable as the cause in a report row.
#[derive(Debug, Clone, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

/// How far back to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    pub const ALL: [Period; 11] = [
        Period::OneDay,
        Period::FiveDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
        Period::TenYears,
        Period::YearToDate,
        Period::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::YearToDate => "ytd",
            Period::Max => "max",
        }
    }

    /// Rough trading-day count, used to size synthetic series.
    pub fn approx_trading_days(&self) -> usize {
        match self {
            Period::OneDay => 1,
            Period::FiveDays => 5,
            Period::OneMonth => 21,
            Period::ThreeMonths => 63,
            Period::SixMonths => 126,
            Period::OneYear | Period::YearToDate => 252,
            Period::TwoYears => 504,
            Period::FiveYears => 1_260,
            Period::TenYears | Period::Max => 2_520,
        }
    }
}

/// Candle width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "2m")]
    TwoMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "60m")]
    SixtyMinutes,
    #[serde(rename = "90m")]
    NinetyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
}

impl Interval {
    pub const ALL: [Interval; 13] = [
        Interval::OneMinute,
        Interval::TwoMinutes,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::ThirtyMinutes,
        Interval::SixtyMinutes,
        Interval::NinetyMinutes,
        Interval::OneHour,
        Interval::OneDay,
        Interval::FiveDays,
        Interval::OneWeek,
        Interval::OneMonth,
        Interval::ThreeMonths,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::TwoMinutes => "2m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::SixtyMinutes => "60m",
            Interval::NinetyMinutes => "90m",
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
            Interval::FiveDays => "5d",
            Interval::OneWeek => "1wk",
            Interval::OneMonth => "1mo",
            Interval::ThreeMonths => "3mo",
        }
    }

    /// Candle width in minutes (calendar approximation for month-based widths).
    pub fn minutes(&self) -> i64 {
        match self {
            Interval::OneMinute => 1,
            Interval::TwoMinutes => 2,
            Interval::FiveMinutes => 5,
            Interval::FifteenMinutes => 15,
            Interval::ThirtyMinutes => 30,
            Interval::SixtyMinutes | Interval::OneHour => 60,
            Interval::NinetyMinutes => 90,
            Interval::OneDay => 1_440,
            Interval::FiveDays => 5 * 1_440,
            Interval::OneWeek => 7 * 1_440,
            Interval::OneMonth => 30 * 1_440,
            Interval::ThreeMonths => 91 * 1_440,
        }
    }
}

/// Length of the regular session the synthetic provider assumes for intraday widths.
pub const SESSION_MINUTES: i64 = 375;

/// Unrecognized period/interval token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (valid: {valid})")]
pub struct ParseTokenError {
    pub kind: &'static str,
    pub value: String,
    pub valid: String,
}

impl FromStr for Period {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| ParseTokenError {
                kind: "period",
                value: s.to_string(),
                valid: Period::ALL.map(|p| p.as_str()).join(", "),
            })
    }
}

impl FromStr for Interval {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .iter()
            .find(|i| i.as_str() == s)
            .copied()
            .ok_or_else(|| ParseTokenError {
                kind: "interval",
                value: s.to_string(),
                valid: Interval::ALL.map(|i| i.as_str()).join(", "),
            })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for candle providers (Yahoo Finance, synthetic, test doubles).
///
/// One call is one attempt: providers do not retry.
pub trait CandleProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch candles for `symbol`, oldest first, strictly ascending.
    fn fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Candle>, DataError>;
}
