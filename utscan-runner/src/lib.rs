//! UTScan Runner — configuration, per-symbol pipeline, concurrent scan and reports.
//!
//! This crate turns a symbol list into a ranked report:
//! - `config`: TOML scan configuration
//! - `pipeline`: fetch + analyze one symbol, errors become rows
//! - `orchestrator`: bounded rayon pool, completion-order fan-in
//! - `report`: ranking, JSON / CSV export, terminal table

pub mod config;
pub mod orchestrator;
pub mod pipeline;
pub mod report;

pub use config::{ConfigError, ScanConfig};
pub use orchestrator::{
    run_scan, scan, scan_sequential, LogProgress, NoProgress, OrchestratorError, ScanProgress,
};
pub use pipeline::{ErrorKind, ScanError, Scanner, MIN_CANDLES};
pub use report::{Report, ReportError, Summary};

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Scanner>();
        require_sync::<Scanner>();
        require_send::<ScanConfig>();
        require_sync::<ScanConfig>();
        require_send::<Report>();
        require_sync::<Report>();
        require_send::<ScanError>();
        require_sync::<ScanError>();
        require_send::<LogProgress>();
        require_sync::<LogProgress>();
    }
}
