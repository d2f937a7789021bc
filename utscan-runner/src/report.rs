//! Result aggregation and export.
//!
//! A [`Report`] is the ranked list of per-symbol rows: most recent signal
//! first, "No Signal" and errors last, ties kept in symbol-list order.

use serde::Serialize;
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use thiserror::Error;
use utscan_core::domain::{SignalType, SymbolResult};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Row counts per signal type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub buy: usize,
    pub sell: usize,
    pub no_signal: usize,
    pub error: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.buy + self.sell + self.no_signal + self.error
    }
}

/// Ranked scan results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    rows: Vec<SymbolResult>,
}

impl Report {
    /// Rank results by `candles_ago`, breaking ties by symbol-list position.
    ///
    /// Arrival order never matters.
    pub fn from_results(mut results: Vec<SymbolResult>) -> Self {
        results.sort_by_key(|r| (r.candles_ago, r.index));
        Self { rows: results }
    }

    pub fn rows(&self) -> &[SymbolResult] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<SymbolResult> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> Summary {
        self.rows.iter().fold(Summary::default(), |mut s, r| {
            match r.signal_type {
                SignalType::Buy => s.buy += 1,
                SignalType::Sell => s.sell += 1,
                SignalType::NoSignal => s.no_signal += 1,
                SignalType::Error => s.error += 1,
            }
            s
        })
    }

    // ─── JSON export ─────────────────────────────────────────────────

    /// Pretty JSON array of `{symbol, signal_type, candles_ago, message}`.
    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(&self.rows)?)
    }

    /// Parse a report written by [`Report::to_json_pretty`].
    ///
    /// Rows are already ranked, so file position becomes the tiebreak index.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let rows: Vec<SymbolResult> = serde_json::from_str(json)?;
        Ok(Self::from_ranked(rows))
    }

    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    // ─── CSV export ──────────────────────────────────────────────────

    /// Write CSV with a header row and the same columns as the JSON form.
    pub fn write_csv_to<W: io::Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, ReportError> {
        let mut buf = Vec::new();
        self.write_csv_to(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), ReportError> {
        let file = std::fs::File::create(path)?;
        self.write_csv_to(io::BufWriter::new(file))
    }

    pub fn from_csv<R: io::Read>(reader: R) -> Result<Self, ReportError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let rows = rdr
            .deserialize::<SymbolResult>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_ranked(rows))
    }

    fn from_ranked(mut rows: Vec<SymbolResult>) -> Self {
        for (i, row) in rows.iter_mut().enumerate() {
            row.index = i;
        }
        Self { rows }
    }

    // ─── Terminal table ──────────────────────────────────────────────

    /// Fixed-width table for terminal output.
    pub fn render_table(&self) -> String {
        let sym_w = self
            .rows
            .iter()
            .map(|r| r.symbol.len())
            .max()
            .unwrap_or(0)
            .max("Symbol".len());

        let mut out = String::new();
        let _ = writeln!(out, "{:<sym_w$}  {:<9}  {:>11}  Message", "Symbol", "Signal", "Candles Ago");
        let _ = writeln!(out, "{}", "-".repeat(sym_w + 2 + 9 + 2 + 11 + 2 + 7));
        for r in &self.rows {
            let _ = writeln!(
                out,
                "{:<sym_w$}  {:<9}  {:>11}  {}",
                r.symbol,
                r.signal_type.as_str(),
                r.candles_ago.to_string(),
                r.message
            );
        }

        let s = self.summary();
        let _ = write!(
            out,
            "{} symbols: {} buy, {} sell, {} no signal, {} error",
            s.total(),
            s.buy,
            s.sell,
            s.no_signal,
            s.error
        );
        out
    }
}
