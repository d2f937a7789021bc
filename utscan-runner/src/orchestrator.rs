//! Bounded-concurrency fan-out over symbols and completion-order fan-in.
//!
//! Each symbol runs as one task on a private rayon pool so the scan never
//! competes with (or deadlocks on) the global pool. Tasks send their row
//! through a channel as they finish; the calling thread drains it.

use crate::config::{ConfigError, ScanConfig};
use crate::pipeline::Scanner;
use crate::report::Report;
use log::info;
use std::sync::mpsc;
use std::time::Instant;
use thiserror::Error;
use utscan_core::data::CandleProvider;
use utscan_core::domain::{SignalType, SymbolResult};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Progress callbacks for a running scan.
///
/// `on_start` is called from worker threads, `on_complete` from the thread
/// that called [`scan`], in completion order.
pub trait ScanProgress: Send + Sync {
    fn on_start(&self, symbol: &str, index: usize, total: usize);
    fn on_complete(&self, result: &SymbolResult, completed: usize, total: usize);
}

/// Reports progress through the `log` facade.
pub struct LogProgress;

impl ScanProgress for LogProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        log::debug!("[{}/{total}] scanning {symbol}", index + 1);
    }

    fn on_complete(&self, result: &SymbolResult, completed: usize, total: usize) {
        match result.signal_type {
            SignalType::Error => log::warn!("[{completed}/{total}] {}", result.message),
            _ => info!("[{completed}/{total}] {}", result.message),
        }
    }
}

/// Silent progress.
pub struct NoProgress;

impl ScanProgress for NoProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}
    fn on_complete(&self, _result: &SymbolResult, _completed: usize, _total: usize) {}
}

/// Scan every symbol with at most `workers` pipelines in flight.
///
/// Returns one row per symbol in completion order; rank them with
/// [`Report::from_results`].
pub fn scan(
    symbols: &[String],
    provider: &dyn CandleProvider,
    scanner: &Scanner,
    workers: usize,
    progress: &dyn ScanProgress,
) -> Result<Vec<SymbolResult>, OrchestratorError> {
    if workers == 0 {
        return Err(ConfigError::Invalid("workers must be >= 1".into()).into());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("utscan-worker-{i}"))
        .build()?;

    let total = symbols.len();
    let mut results = Vec::with_capacity(total);

    pool.in_place_scope(|s| {
        let (tx, rx) = mpsc::channel::<SymbolResult>();

        for (index, symbol) in symbols.iter().enumerate() {
            let tx = tx.clone();
            s.spawn(move |_| {
                progress.on_start(symbol, index, total);
                let result = scanner.run_symbol(provider, symbol, index);
                // The receiver lives until every sender is gone.
                let _ = tx.send(result);
            });
        }
        drop(tx);

        for result in rx {
            results.push(result);
            progress.on_complete(&results[results.len() - 1], results.len(), total);
        }
    });

    Ok(results)
}

/// Scan every symbol on the calling thread, in list order.
pub fn scan_sequential(
    symbols: &[String],
    provider: &dyn CandleProvider,
    scanner: &Scanner,
    progress: &dyn ScanProgress,
) -> Vec<SymbolResult> {
    let total = symbols.len();
    let mut results = Vec::with_capacity(total);
    for (index, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, index, total);
        results.push(scanner.run_symbol(provider, symbol, index));
        progress.on_complete(&results[index], index + 1, total);
    }
    results
}

/// Validate `config`, scan all of its symbols and rank the rows.
pub fn run_scan(
    config: &ScanConfig,
    provider: &dyn CandleProvider,
    progress: &dyn ScanProgress,
) -> Result<Report, OrchestratorError> {
    config.validate()?;
    let scanner = Scanner::new(config.params(), config.period, config.interval);

    info!(
        "scanning {} symbols via {} ({} x {}, ATR {} x {}) on {} workers",
        config.symbols.len(),
        provider.name(),
        config.period,
        config.interval,
        config.atr_period,
        config.multiplier,
        config.workers,
    );
    let started = Instant::now();

    let results = scan(&config.symbols, provider, &scanner, config.workers, progress)?;
    let report = Report::from_results(results);

    let summary = report.summary();
    info!(
        "scan finished in {:.2?}: {} buy, {} sell, {} no signal, {} error",
        started.elapsed(),
        summary.buy,
        summary.sell,
        summary.no_signal,
        summary.error
    );
    Ok(report)
}
