//! UTScan Core — candles, indicators, signals and market data providers.
//!
//! This crate contains the per-symbol computation:
//! - Domain types (candles, signal types, per-symbol results)
//! - ATR and the path-dependent ATR trailing stop
//! - Crossover signal extraction and last-signal resolution
//! - Candle provider trait with Yahoo Finance and synthetic implementations

pub mod data;
pub mod domain;
pub mod indicators;
pub mod signals;
pub mod ut_bot;

pub use ut_bot::{Analysis, UtBot, UtBotParams};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything the scan hands across worker threads
    /// is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::SymbolResult>();
        require_sync::<domain::SymbolResult>();
        require_send::<signals::SignalSeries>();
        require_sync::<signals::SignalSeries>();
        require_send::<UtBot>();
        require_sync::<UtBot>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::SyntheticProvider>();
        require_sync::<data::SyntheticProvider>();
    }

    /// Providers are used through `&dyn CandleProvider` from pool threads.
    #[test]
    fn candle_provider_is_object_safe() {
        fn _check(p: &dyn data::CandleProvider) -> &str {
            p.name()
        }
    }
}
