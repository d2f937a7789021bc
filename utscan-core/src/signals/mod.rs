//! Crossover detection and last-signal resolution.
//!
//! Signals compare the raw close against the trailing stop. A buy fires on the
//! candle where the close moves from at-or-below the stop to strictly above it;
//! a sell is the mirror image. Resolution then reports the most recent signal
//! and how many candles have passed since.

pub mod crossover;
pub mod resolve;

pub use crossover::{extract_signals, SignalSeries};
pub use resolve::{resolve_last_signal, Resolution};
