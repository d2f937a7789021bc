//! OHLC candle and series validation.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLC candle for a single symbol at a single instant.
///
/// Timestamps carry the offset of the exchange timezone the provider normalized
/// them to. A candle series is a plain slice ordered oldest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<FixedOffset>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Returns true if any OHLC field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// All prices finite and non-negative, high >= low.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p >= 0.0)
            && self.high >= self.low
    }
}

/// Structural problems with a candle series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("candle {index} has invalid prices (o={open}, h={high}, l={low}, c={close})")]
    InvalidPrices {
        index: usize,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },

    #[error("timestamps not strictly increasing at candle {index} ({previous} then {current})")]
    NotAscending {
        index: usize,
        previous: DateTime<FixedOffset>,
        current: DateTime<FixedOffset>,
    },
}

/// Check that a series is strictly ascending by timestamp and every candle is sane.
pub fn validate_series(candles: &[Candle]) -> Result<(), SeriesError> {
    for (i, candle) in candles.iter().enumerate() {
        if !candle.is_sane() {
            return Err(SeriesError::InvalidPrices {
                index: i,
                open: candle.open,
                high: candle.high,
                low: candle.low,
                close: candle.close,
            });
        }
        if i > 0 && candles[i - 1].timestamp >= candle.timestamp {
            return Err(SeriesError::NotAscending {
                index: i,
                previous: candles[i - 1].timestamp,
                current: candle.timestamp,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
    }

    fn sample_candle(minutes: i64) -> Candle {
        Candle {
            timestamp: ist().with_ymd_and_hms(2024, 6, 3, 9, 15, 0).unwrap()
                + Duration::minutes(minutes),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
        }
    }

    #[test]
    fn candle_is_sane() {
        assert!(sample_candle(0).is_sane());
    }

    #[test]
    fn candle_detects_void() {
        let mut c = sample_candle(0);
        c.close = f64::NAN;
        assert!(c.is_void());
        assert!(!c.is_sane());
    }

    #[test]
    fn candle_rejects_negative_and_inverted() {
        let mut c = sample_candle(0);
        c.low = -1.0;
        assert!(!c.is_sane());

        let mut c = sample_candle(0);
        c.high = 90.0; // below low
        assert!(!c.is_sane());
    }

    #[test]
    fn empty_series_is_valid() {
        assert!(validate_series(&[]).is_ok());
    }

    #[test]
    fn ascending_series_is_valid() {
        let series: Vec<Candle> = (0..5).map(|i| sample_candle(i * 15)).collect();
        assert!(validate_series(&series).is_ok());
    }

    #[test]
    fn duplicate_timestamp_rejected() {
        let series = vec![sample_candle(0), sample_candle(15), sample_candle(15)];
        let err = validate_series(&series).unwrap_err();
        assert!(matches!(err, SeriesError::NotAscending { index: 2, .. }));
    }

    #[test]
    fn invalid_prices_reported_with_index() {
        let mut series = vec![sample_candle(0), sample_candle(15)];
        series[1].open = f64::INFINITY;
        let err = validate_series(&series).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidPrices { index: 1, .. }));
    }

    #[test]
    fn candle_serialization_roundtrip() {
        let c = sample_candle(30);
        let json = serde_json::to_string(&c).unwrap();
        let back: Candle = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
