//! End-to-end scans over test-double providers.

use chrono::{DateTime, Duration, FixedOffset};
use std::collections::HashMap;
use utscan_core::data::{CandleProvider, DataError, Interval, Period};
use utscan_core::domain::{Candle, CandlesAgo, SignalType};
use utscan_runner::{run_scan, NoProgress, Report, ScanConfig};

/// Serves canned series per symbol; unknown symbols are not found.
struct Canned(HashMap<String, Vec<Candle>>);

impl Canned {
    fn new(entries: &[(&str, &[f64])]) -> Self {
        Self(
            entries
                .iter()
                .map(|(s, closes)| {
                    // A flat close series gets zero-range candles.
                    let half_range = if closes.windows(2).all(|w| w[0] == w[1]) {
                        0.0
                    } else {
                        0.5
                    };
                    (s.to_string(), candles(closes, half_range))
                })
                .collect(),
        )
    }
}

impl CandleProvider for Canned {
    fn name(&self) -> &str {
        "canned"
    }

    fn fetch(&self, symbol: &str, _: Period, _: Interval) -> Result<Vec<Candle>, DataError> {
        self.0
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }
}

fn candles(closes: &[f64], half_range: f64) -> Vec<Candle> {
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

fn config(symbols: &[&str]) -> ScanConfig {
    ScanConfig {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        atr_period: 1,
        multiplier: 1.0,
        workers: 2,
        ..ScanConfig::default()
    }
}

const CROSS_AT_END: &[f64] = &[110.0, 108.0, 106.0, 104.0, 102.0, 115.0];
const CROSS_AT_FIVE: &[f64] = &[
    110.0, 108.0, 106.0, 104.0, 102.0, 115.0, 116.0, 117.0, 118.0, 119.0,
];
const FLAT: &[f64] = &[100.0; 12];

// ── Failure isolation ──

#[test]
fn failed_fetch_ranks_after_fresh_buy() {
    let provider = Canned::new(&[("B", CROSS_AT_END)]);
    let report = run_scan(&config(&["A", "B"]), &provider, &NoProgress).unwrap();

    let rows = report.rows();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].symbol, "B");
    assert_eq!(rows[0].signal_type, SignalType::Buy);
    assert_eq!(rows[0].candles_ago, CandlesAgo::Finite(0));

    assert_eq!(rows[1].symbol, "A");
    assert_eq!(rows[1].signal_type, SignalType::Error);
    assert_eq!(rows[1].candles_ago, CandlesAgo::Infinite);
    assert_eq!(rows[1].message, "A: symbol not found: A");
}

#[test]
fn short_series_is_error_row() {
    let provider = Canned::new(&[("ONE", &[100.0]), ("B", CROSS_AT_FIVE)]);
    let report = run_scan(&config(&["ONE", "B"]), &provider, &NoProgress).unwrap();
    let one = &report.rows()[1];
    assert_eq!(one.symbol, "ONE");
    assert_eq!(one.signal_type, SignalType::Error);
    assert!(one.message.contains("insufficient data"));
}

#[test]
fn bad_parameters_fail_every_row_without_aborting() {
    let provider = Canned::new(&[("A", CROSS_AT_FIVE), ("B", FLAT)]);
    let mut cfg = config(&["A", "B"]);
    cfg.atr_period = 0;
    let report = run_scan(&cfg, &provider, &NoProgress).unwrap();
    assert_eq!(report.summary().error, 2);
    // Both infinite: list order decides.
    assert_eq!(report.rows()[0].symbol, "A");
}

// ── Ranking ──

#[test]
fn ranking_by_recency_then_list_order() {
    let provider = Canned::new(&[
        ("FLAT1", FLAT),
        ("OLD", CROSS_AT_FIVE),
        ("NEW", CROSS_AT_END),
        ("FLAT2", FLAT),
        ("OLD2", CROSS_AT_FIVE),
    ]);
    let cfg = config(&["FLAT1", "MISSING", "OLD", "NEW", "FLAT2", "OLD2"]);
    let report = run_scan(&cfg, &provider, &NoProgress).unwrap();

    let order: Vec<&str> = report.rows().iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(order, vec!["NEW", "OLD", "OLD2", "FLAT1", "MISSING", "FLAT2"]);

    let old = &report.rows()[1];
    assert_eq!(old.candles_ago, CandlesAgo::Finite(4));
    assert_eq!(old.message, "OLD: Last signal was Buy (last signal 4 candles ago)");

    let flat = &report.rows()[3];
    assert_eq!(flat.signal_type, SignalType::NoSignal);
    assert_eq!(flat.message, "FLAT1: Last signal was No Signal");
}

#[test]
fn worker_count_does_not_change_report() {
    let provider = Canned::new(&[("A", CROSS_AT_FIVE), ("B", CROSS_AT_END), ("C", FLAT)]);
    let symbols = ["C", "X", "A", "B"];
    let reports: Vec<Report> = [1, 2, 4, 16]
        .into_iter()
        .map(|workers| {
            let mut cfg = config(&symbols);
            cfg.workers = workers;
            run_scan(&cfg, &provider, &NoProgress).unwrap()
        })
        .collect();
    for r in &reports[1..] {
        assert_eq!(r, &reports[0]);
    }
}
