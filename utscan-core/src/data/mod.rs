//! Market data acquisition: provider trait, Yahoo Finance and synthetic sources.

pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use provider::{CandleProvider, DataError, Interval, ParseTokenError, Period};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
