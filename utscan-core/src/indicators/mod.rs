//! Indicator trait and the concrete indicators behind the UT Bot signal.
//!
//! Indicators are pure functions: candle history in, numeric series out, one
//! value per candle. Undefined (warmup) positions are `f64::NAN`.

pub mod atr;
pub mod trailing_stop;

pub use atr::{true_range, Atr};
pub use trailing_stop::{trailing_stop, AtrTrailingStop};

use crate::domain::Candle;
use thiserror::Error;

/// Contract violations when configuring an indicator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("ATR window must be >= 1 (got {0})")]
    InvalidWindow(usize),

    #[error("ATR multiplier must be a positive finite number (got {0})")]
    InvalidMultiplier(f64),
}

/// Trait for indicators.
///
/// Indicators take a full candle series and produce an output series of the
/// same length. No value at index t may depend on candles after t.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "atr_6", "ut_stop_6_3").
    fn name(&self) -> &str;

    /// Number of candles before the indicator produces a volatility-adjusted value.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire candle series.
    fn compute(&self, candles: &[Candle]) -> Vec<f64>;
}

/// Create synthetic candles from close prices for testing.
///
/// high = close + 0.5, low = close - 0.5, open = previous close
/// (or close for the first candle), one candle every 15 minutes.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    use chrono::{Duration, FixedOffset, TimeZone};
    let tz = FixedOffset::east_opt(19_800).unwrap();
    let base = tz.with_ymd_and_hms(2024, 6, 3, 9, 15, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            timestamp: base + Duration::minutes(15 * i as i64),
            open: if i == 0 { close } else { closes[i - 1] },
            high: close + 0.5,
            low: close - 0.5,
            close,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
