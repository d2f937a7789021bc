//! UT Bot — ATR trailing stop plus crossover signals, composed per symbol.
//!
//! Stages run in order over one candle series: ATR, trailing stop, signal
//! extraction, last-signal resolution. Each stage is a pure function of the
//! previous ones.

use crate::domain::Candle;
use crate::indicators::{AtrTrailingStop, Indicator, IndicatorError};
use crate::signals::{extract_signals, resolve_last_signal, Resolution, SignalSeries};
use log::debug;
use serde::{Deserialize, Serialize};

/// Indicator parameters: ATR window `c` and loss multiplier `a`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtBotParams {
    pub atr_period: usize,
    pub multiplier: f64,
}

impl Default for UtBotParams {
    fn default() -> Self {
        Self {
            atr_period: 6,
            multiplier: 3.0,
        }
    }
}

/// Every intermediate series for one symbol, aligned with its candles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub atr: Vec<f64>,
    pub stops: Vec<f64>,
    pub signals: SignalSeries,
    pub resolution: Resolution,
}

/// Validated UT Bot configuration.
#[derive(Debug, Clone)]
pub struct UtBot {
    stop: AtrTrailingStop,
}

impl UtBot {
    pub fn new(params: UtBotParams) -> Result<Self, IndicatorError> {
        Ok(Self {
            stop: AtrTrailingStop::new(params.atr_period, params.multiplier)?,
        })
    }

    pub fn params(&self) -> UtBotParams {
        UtBotParams {
            atr_period: self.stop.atr().period(),
            multiplier: self.stop.multiplier(),
        }
    }

    /// Run all stages over `candles`.
    pub fn analyze(&self, candles: &[Candle]) -> Analysis {
        let atr = self.stop.atr().compute(candles);
        let stops = self.stop.compute_with_atr(candles, &atr);
        let signals = extract_signals(candles, &stops);
        let resolution = resolve_last_signal(&signals);

        debug!(
            "{}: {} candles, {} buys, {} sells -> {resolution}",
            self.stop.name(),
            candles.len(),
            signals.buy_count(),
            signals.sell_count(),
        );

        Analysis {
            atr,
            stops,
            signals,
            resolution,
        }
    }
}
