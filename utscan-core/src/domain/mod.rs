//! Domain types for UTScan

pub mod candle;
pub mod signal;

pub use candle::{validate_series, Candle, SeriesError};
pub use signal::{CandlesAgo, SignalType, SymbolResult, INFINITE_TOKEN};
