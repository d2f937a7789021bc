//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR is the simple rolling mean of the last `period` true ranges.
//! TR[0] has no previous close and never enters the window, so the first
//! defined ATR is at index `period`.

use super::{Indicator, IndicatorError};
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period < 1 {
            return Err(IndicatorError::InvalidWindow(period));
        }
        Ok(Self {
            period,
            name: format!("atr_{period}"),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Compute the True Range series.
/// TR[0] = high[0] - low[0] (no previous close). [`Atr`] leaves TR[0] out of
/// its window, so `Atr::new(c)` is first defined at index `c`.
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    let Some(first) = candles.first() else {
        return Vec::new();
    };

    let mut tr = Vec::with_capacity(candles.len());
    tr.push(first.high - first.low);

    for pair in candles.windows(2) {
        let pc = pair[0].close;
        let (h, l) = (pair[1].high, pair[1].low);
        tr.push((h - l).max((h - pc).abs()).max((l - pc).abs()));
    }

    tr
}

/// Simple rolling mean. NaN until a full window of non-NaN values is available;
/// any NaN inside a window makes that position NaN.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if period == 0 {
        return result;
    }

    for (i, window) in values.windows(period).enumerate() {
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i + period - 1] = window.iter().sum::<f64>() / period as f64;
    }

    result
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let mut tr = true_range(candles);
        if let Some(first) = tr.first_mut() {
            *first = f64::NAN;
        }
        rolling_mean(&tr, self.period)
    }
}
