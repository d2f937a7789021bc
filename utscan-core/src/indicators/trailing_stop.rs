//! ATR trailing stop — the UT Bot stop level.
//!
//! Inherently sequential/stateful: each level depends on the previous one, so
//! the series is built in one ascending pass carrying `stop[i-1]` forward.
//!
//! Seed: `stop[0] = close[0]`. While ATR is still warming up the loss
//! distance is zero, which pins the stop to the close and keeps every
//! crossover test (strict inequalities) false until ATR is defined.

use super::atr::Atr;
use super::{Indicator, IndicatorError};
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct AtrTrailingStop {
    atr: Atr,
    multiplier: f64,
    name: String,
}

impl AtrTrailingStop {
    pub fn new(period: usize, multiplier: f64) -> Result<Self, IndicatorError> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(IndicatorError::InvalidMultiplier(multiplier));
        }
        let atr = Atr::new(period)?;
        Ok(Self {
            atr,
            multiplier,
            name: format!("ut_stop_{period}_{multiplier}"),
        })
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn atr(&self) -> &Atr {
        &self.atr
    }

    /// Compute the stop from an already computed ATR series.
    pub fn compute_with_atr(&self, candles: &[Candle], atr: &[f64]) -> Vec<f64> {
        trailing_stop(candles, atr, self.multiplier)
    }
}

/// Run the trailing-stop recurrence.
///
/// `atr` must be aligned with `candles`; NaN (or missing) entries count as a
/// zero loss distance.
pub fn trailing_stop(candles: &[Candle], atr: &[f64], multiplier: f64) -> Vec<f64> {
    let Some(first) = candles.first() else {
        return Vec::new();
    };

    let mut stops = Vec::with_capacity(candles.len());
    let mut prev = first.close;
    stops.push(prev);

    for i in 1..candles.len() {
        let close = candles[i].close;
        let prev_close = candles[i - 1].close;
        let n_loss = match atr.get(i) {
            Some(v) if !v.is_nan() => multiplier * v,
            _ => 0.0,
        };

        let stop = if close > prev && prev_close > prev {
            // Riding above: ratchet up only
            prev.max(close - n_loss)
        } else if close < prev && prev_close < prev {
            // Riding below: ratchet down only
            prev.min(close + n_loss)
        } else if close > prev {
            close - n_loss
        } else {
            close + n_loss
        };

        stops.push(stop);
        prev = stop;
    }

    stops
}

impl Indicator for AtrTrailingStop {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.atr.lookback()
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let atr = self.atr.compute(candles);
        self.compute_with_atr(candles, &atr)
    }
}
