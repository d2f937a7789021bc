//! Symbol pipeline: fetch, validate, analyze, and wrap the outcome.
//!
//! Every failure for a symbol is turned into an `Error` row here; nothing
//! escapes to the orchestrator.

use log::{debug, warn};
use thiserror::Error;
use utscan_core::data::{CandleProvider, DataError, Interval, Period};
use utscan_core::domain::{validate_series, Candle, SeriesError, SymbolResult};
use utscan_core::indicators::IndicatorError;
use utscan_core::signals::Resolution;
use utscan_core::{Analysis, UtBot, UtBotParams};

/// Fewest candles a crossover can be observed on.
pub const MIN_CANDLES: usize = 2;

/// Reasons a single symbol produced no signal.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{0}")]
    Fetch(#[from] DataError),

    #[error("insufficient data: {len} candle(s), need at least {MIN_CANDLES}")]
    InsufficientData { len: usize },

    #[error("invalid candle series: {0}")]
    InvalidSeries(#[from] SeriesError),

    #[error("computation failed: {0}")]
    Computation(#[from] IndicatorError),
}

/// Coarse classification of a [`ScanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    InsufficientData,
    Computation,
}

impl ScanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::Fetch(_) => ErrorKind::Fetch,
            ScanError::InsufficientData { .. } => ErrorKind::InsufficientData,
            ScanError::InvalidSeries(_) | ScanError::Computation(_) => ErrorKind::Computation,
        }
    }
}

/// Runs the per-symbol pipeline with fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scanner {
    pub params: UtBotParams,
    pub period: Period,
    pub interval: Interval,
}

impl Scanner {
    pub fn new(params: UtBotParams, period: Period, interval: Interval) -> Self {
        Self {
            params,
            period,
            interval,
        }
    }

    /// Validate a fetched series and run the full analysis over it.
    ///
    /// Parameters are checked on every call so that a bad window or
    /// multiplier shows up per symbol instead of failing the batch.
    pub fn evaluate(&self, candles: &[Candle]) -> Result<Analysis, ScanError> {
        let bot = UtBot::new(self.params)?;
        if candles.len() < MIN_CANDLES {
            return Err(ScanError::InsufficientData { len: candles.len() });
        }
        validate_series(candles)?;
        Ok(bot.analyze(candles))
    }

    /// Fetch and evaluate one symbol, returning candles alongside the analysis.
    pub fn inspect(
        &self,
        provider: &dyn CandleProvider,
        symbol: &str,
    ) -> Result<(Vec<Candle>, Analysis), ScanError> {
        let candles = provider.fetch(symbol, self.period, self.interval)?;
        debug!("{symbol}: fetched {} candles from {}", candles.len(), provider.name());
        let analysis = self.evaluate(&candles)?;
        Ok((candles, analysis))
    }

    /// Fetch and evaluate one symbol, keeping only the resolution.
    pub fn scan(&self, provider: &dyn CandleProvider, symbol: &str) -> Result<Resolution, ScanError> {
        self.inspect(provider, symbol)
            .map(|(_, analysis)| analysis.resolution)
    }

    /// Run one symbol end to end. Never fails: errors become `Error` rows.
    pub fn run_symbol(
        &self,
        provider: &dyn CandleProvider,
        symbol: &str,
        index: usize,
    ) -> SymbolResult {
        match self.scan(provider, symbol) {
            Ok(resolution) => SymbolResult {
                symbol: symbol.to_string(),
                signal_type: resolution.signal_type,
                candles_ago: resolution.candles_ago,
                message: format!("{symbol}: Last signal was {resolution}"),
                index,
            },
            Err(e) => {
                warn!("{symbol}: {e}");
                SymbolResult::error(symbol, index, e)
            }
        }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(UtBotParams::default(), Period::FiveDays, Interval::FifteenMinutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, FixedOffset};
    use utscan_core::domain::{CandlesAgo, SignalType};

    fn candles(closes: &[f64]) -> Vec<Candle> {
        with_range(closes, 0.5)
    }

    fn with_range(closes: &[f64], half_range: f64) -> Vec<Candle> {
        let ist = FixedOffset::east_opt(19_800).unwrap();
        let start = DateTime::from_timestamp(1_717_386_300, 0)
            .unwrap()
            .with_timezone(&ist);
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle {
                timestamp: start + Duration::minutes(15 * i as i64),
                open: c,
                high: c + half_range,
                low: c - half_range,
                close: c,
            })
            .collect()
    }

    /// Serves a fixed series, or a fixed error, for every symbol.
    struct Fixed(Result<Vec<Candle>, DataError>);

    impl CandleProvider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self, _: &str, _: Period, _: Interval) -> Result<Vec<Candle>, DataError> {
            self.0.clone()
        }
    }

    fn tight() -> Scanner {
        Scanner::new(
            UtBotParams {
                atr_period: 1,
                multiplier: 1.0,
            },
            Period::FiveDays,
            Interval::FifteenMinutes,
        )
    }

    #[test]
    fn buy_row_message() {
        let provider = Fixed(Ok(candles(&[
            110.0, 108.0, 106.0, 104.0, 102.0, 115.0, 116.0, 117.0, 118.0, 119.0,
        ])));
        let r = tight().run_symbol(&provider, "TCS.NS", 0);
        assert_eq!(r.signal_type, SignalType::Buy);
        assert_eq!(r.candles_ago, CandlesAgo::Finite(4));
        assert_eq!(r.message, "TCS.NS: Last signal was Buy (last signal 4 candles ago)");
    }

    #[test]
    fn flat_series_is_no_signal_row() {
        let provider = Fixed(Ok(with_range(&[100.0; 20], 0.0)));
        let r = Scanner::default().run_symbol(&provider, "FLAT", 3);
        assert_eq!(r.signal_type, SignalType::NoSignal);
        assert_eq!(r.candles_ago, CandlesAgo::Infinite);
        assert_eq!(r.message, "FLAT: Last signal was No Signal");
        assert_eq!(r.index, 3);
    }

    #[test]
    fn fetch_failure_is_error_row() {
        let provider = Fixed(Err(DataError::NetworkUnreachable("connection refused".into())));
        let r = Scanner::default().run_symbol(&provider, "A", 0);
        assert_eq!(r.signal_type, SignalType::Error);
        assert_eq!(r.candles_ago, CandlesAgo::Infinite);
        assert_eq!(r.message, "A: network unreachable: connection refused");
    }

    #[test]
    fn short_series_is_insufficient_data() {
        for len in 0..MIN_CANDLES {
            let provider = Fixed(Ok(candles(&vec![100.0; len])));
            let err = Scanner::default().scan(&provider, "A").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InsufficientData);
        }
    }

    #[test]
    fn bad_params_are_computation_errors() {
        let provider = Fixed(Ok(candles(&[100.0; 10])));
        let scanner = Scanner::new(
            UtBotParams {
                atr_period: 6,
                multiplier: -1.0,
            },
            Period::FiveDays,
            Interval::FifteenMinutes,
        );
        let err = scanner.scan(&provider, "A").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Computation);

        let row = scanner.run_symbol(&provider, "A", 0);
        assert_eq!(row.signal_type, SignalType::Error);
    }

    #[test]
    fn unordered_series_is_rejected() {
        let mut series = candles(&[100.0, 101.0, 102.0]);
        series.swap(1, 2);
        let provider = Fixed(Ok(series));
        let err = Scanner::default().scan(&provider, "A").unwrap_err();
        assert!(matches!(err, ScanError::InvalidSeries(_)));
    }

    #[test]
    fn inspect_returns_aligned_series() {
        let provider = Fixed(Ok(candles(&[100.0, 101.0, 99.0, 103.0, 104.0, 102.0, 105.0, 106.0])));
        let (c, a) = Scanner::default().inspect(&provider, "A").unwrap();
        assert_eq!(c.len(), a.stops.len());
        assert_eq!(c.len(), a.atr.len());
    }
}
