//! Crossover detection between close and trailing stop.

use crate::domain::Candle;
use serde::{Deserialize, Serialize};

/// Aligned buy/sell flags, one pair per candle.
///
/// At most one of `buy[i]`, `sell[i]` is true at any index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSeries {
    pub buy: Vec<bool>,
    pub sell: Vec<bool>,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.buy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buy.is_empty()
    }

    pub fn buy_count(&self) -> usize {
        self.buy.iter().filter(|b| **b).count()
    }

    pub fn sell_count(&self) -> usize {
        self.sell.iter().filter(|s| **s).count()
    }
}

/// Detect buy/sell crossovers.
///
/// For i >= 1:
/// - crossed_above = close[i] > stop[i] && close[i-1] <= stop[i-1]
/// - crossed_below = close[i] < stop[i] && close[i-1] >= stop[i-1]
/// - buy  = close[i] > stop[i] && crossed_above
/// - sell = close[i] < stop[i] && crossed_below
///
/// Index 0 never signals. `stops` must be aligned with `candles`; indices
/// beyond the shorter of the two never signal.
pub fn extract_signals(candles: &[Candle], stops: &[f64]) -> SignalSeries {
    let n = candles.len();
    let mut buy = vec![false; n];
    let mut sell = vec![false; n];

    for i in 1..n.min(stops.len()) {
        let (close, prev_close) = (candles[i].close, candles[i - 1].close);
        let (stop, prev_stop) = (stops[i], stops[i - 1]);

        let crossed_above = close > stop && prev_close <= prev_stop;
        let crossed_below = close < stop && prev_close >= prev_stop;

        buy[i] = close > stop && crossed_above;
        sell[i] = close < stop && crossed_below;
    }

    SignalSeries { buy, sell }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_candles;

    #[test]
    fn empty_input() {
        let s = extract_signals(&[], &[]);
        assert!(s.is_empty());
        assert_eq!(s.sell.len(), 0);
    }

    #[test]
    fn first_index_never_signals() {
        let candles = make_candles(&[10.0]);
        let s = extract_signals(&candles, &[5.0]);
        assert_eq!(s.buy, vec![false]);
        assert_eq!(s.sell, vec![false]);
    }

    #[test]
    fn cross_above_fires_buy() {
        let candles = make_candles(&[9.0, 11.0]);
        let s = extract_signals(&candles, &[10.0, 10.0]);
        assert_eq!(s.buy, vec![false, true]);
        assert_eq!(s.sell, vec![false, false]);
    }

    #[test]
    fn cross_below_fires_sell() {
        let candles = make_candles(&[11.0, 9.0]);
        let s = extract_signals(&candles, &[10.0, 10.0]);
        assert_eq!(s.buy, vec![false, false]);
        assert_eq!(s.sell, vec![false, true]);
    }

    #[test]
    fn touching_then_leaving_counts_as_cross() {
        // prev close == prev stop satisfies the non-strict side
        let candles = make_candles(&[10.0, 12.0, 10.0, 8.0]);
        let stops = [10.0, 11.0, 10.0, 9.0];
        let s = extract_signals(&candles, &stops);
        assert_eq!(s.buy, vec![false, true, false, false]);
        assert_eq!(s.sell, vec![false, false, false, true]);
    }

    #[test]
    fn equality_never_signals() {
        let candles = make_candles(&[10.0, 10.0, 10.0]);
        let s = extract_signals(&candles, &[10.0, 10.0, 10.0]);
        assert_eq!(s.buy_count() + s.sell_count(), 0);
    }

    #[test]
    fn staying_on_one_side_does_not_repeat() {
        let candles = make_candles(&[9.0, 11.0, 12.0, 13.0]);
        let s = extract_signals(&candles, &[10.0, 10.0, 10.5, 11.0]);
        assert_eq!(s.buy, vec![false, true, false, false]);
        assert_eq!(s.buy_count(), 1);
    }

    #[test]
    fn short_stop_series_is_tolerated() {
        let candles = make_candles(&[9.0, 11.0, 8.0]);
        let s = extract_signals(&candles, &[10.0, 10.0]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.buy, vec![false, true, false]);
        assert!(!s.sell[2]);
    }
}
