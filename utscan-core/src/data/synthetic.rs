//! Seeded random-walk candles for offline runs.
//!
//! The same (seed, symbol, period, interval) always yields the same series.
//! Results produced from this provider are not market data.

use super::provider::{CandleProvider, DataError, Interval, Period, SESSION_MINUTES};
use crate::domain::Candle;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Synthetic provider.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    tz: Tz,
    volatility: f64,
    len_override: Option<usize>,
    failing: HashSet<String>,
}

impl SyntheticProvider {
    pub fn new(seed: u64, tz: Tz) -> Self {
        Self {
            seed,
            tz,
            volatility: 0.004,
            len_override: None,
            failing: HashSet::new(),
        }
    }

    /// Per-candle volatility as a fraction of price.
    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    /// Fixed candle count regardless of period/interval.
    pub fn with_len(mut self, len: usize) -> Self {
        self.len_override = Some(len);
        self
    }

    /// Symbols that fail with `SymbolNotFound`.
    pub fn with_failing<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Number of candles a real provider would roughly return.
    pub fn candle_count(period: Period, interval: Interval) -> usize {
        let days = period.approx_trading_days() as i64;
        let minutes = interval.minutes();
        let count = if minutes < 1_440 {
            days * (SESSION_MINUTES / minutes).max(1)
        } else {
            days * 1_440 / minutes
        };
        count.max(1) as usize
    }

    fn symbol_seed(&self, symbol: &str) -> u64 {
        // FNV-1a, stable across platforms and toolchains
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in symbol.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        hash ^ self.seed
    }

    fn generate(&self, symbol: &str, len: usize, interval: Interval) -> Vec<Candle> {
        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));
        // 2024-01-01T03:45:00Z
        let start = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(1_704_080_700);
        let step = Duration::minutes(interval.minutes());

        let mut close: f64 = rng.gen_range(50.0..500.0);
        let mut candles = Vec::with_capacity(len);

        for i in 0..len {
            let open = close;
            let change = rng.gen_range(-1.0..1.0) * self.volatility;
            close = (open * (1.0 + change)).max(0.01);
            let wick_up = rng.gen_range(0.0..1.0) * self.volatility * 0.5;
            let wick_down = rng.gen_range(0.0..1.0) * self.volatility * 0.5;
            candles.push(Candle {
                timestamp: (start + step * i as i32).with_timezone(&self.tz).fixed_offset(),
                open,
                high: open.max(close) * (1.0 + wick_up),
                low: open.min(close) * (1.0 - wick_down),
                close,
            });
        }

        candles
    }
}

impl CandleProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Candle>, DataError> {
        if self.failing.contains(symbol) {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let len = self
            .len_override
            .unwrap_or_else(|| Self::candle_count(period, interval));
        Ok(self.generate(symbol, len, interval))
    }
}
