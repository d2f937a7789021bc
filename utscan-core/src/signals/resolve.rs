//! Resolve the most recent signal and how long ago it fired.

use super::crossover::SignalSeries;
use crate::domain::{CandlesAgo, SignalType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of [`resolve_last_signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub signal_type: SignalType,
    pub candles_ago: CandlesAgo,
    /// Candle index of the reported signal, if any.
    pub index: Option<usize>,
}

impl Resolution {
    pub fn no_signal() -> Self {
        Self {
            signal_type: SignalType::NoSignal,
            candles_ago: CandlesAgo::Infinite,
            index: None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.candles_ago {
            CandlesAgo::Finite(n) => {
                write!(f, "{} (last signal {n} candles ago)", self.signal_type)
            }
            CandlesAgo::Infinite => write!(f, "{}", self.signal_type),
        }
    }
}

/// Reverse scan for the newest `true`, counting the `false` entries passed on
/// the way. Returns `(index, count)`.
fn last_true_with_count(flags: &[bool]) -> Option<(usize, usize)> {
    let mut falses = 0;
    for (i, &flag) in flags.iter().enumerate().rev() {
        if flag {
            return Some((i, falses));
        }
        falses += 1;
    }
    None
}

/// Pick the most recent buy or sell.
///
/// When both exist the later index wins and reports its own count.
pub fn resolve_last_signal(signals: &SignalSeries) -> Resolution {
    let last_buy = last_true_with_count(&signals.buy);
    let last_sell = last_true_with_count(&signals.sell);

    let (signal_type, (index, count)) = match (last_buy, last_sell) {
        (None, None) => return Resolution::no_signal(),
        (Some(buy), None) => (SignalType::Buy, buy),
        (None, Some(sell)) => (SignalType::Sell, sell),
        (Some(buy), Some(sell)) => {
            if buy.0 > sell.0 {
                (SignalType::Buy, buy)
            } else {
                (SignalType::Sell, sell)
            }
        }
    };

    Resolution {
        signal_type,
        candles_ago: CandlesAgo::Finite(count),
        index: Some(index),
    }
}
