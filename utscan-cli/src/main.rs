//! UTScan CLI — UT Bot ATR trailing-stop signal scanner.
//!
//! Commands:
//! - `scan` — scan a symbol list concurrently and rank by signal recency
//! - `inspect` — print ATR, stop and crossover flags for one symbol

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::{Path, PathBuf};
use utscan_core::data::{CandleProvider, Interval, Period, SyntheticProvider, YahooProvider};
use utscan_runner::{run_scan, LogProgress, ScanConfig, Scanner};

#[derive(Parser)]
#[command(
    name = "utscan",
    version,
    about = "UTScan — UT Bot ATR trailing-stop signal scanner"
)]
struct Cli {
    /// Verbose logging (debug level). RUST_LOG overrides.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by `scan` and `inspect`; each overrides the config file.
#[derive(Args)]
struct ScanArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// ATR window.
    #[arg(long)]
    atr_period: Option<usize>,

    /// ATR multiplier.
    #[arg(long)]
    multiplier: Option<f64>,

    /// Lookback range (1d, 5d, 1mo, ...).
    #[arg(long)]
    period: Option<Period>,

    /// Candle width (1m, 5m, 15m, 1h, 1d, ...).
    #[arg(long)]
    interval: Option<Interval>,

    /// Exchange timezone, e.g. Asia/Kolkata.
    #[arg(long)]
    timezone: Option<String>,

    /// Use seeded synthetic candles instead of Yahoo Finance.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Seed for --synthetic.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan symbols and print the ranked report.
    Scan {
        /// Symbols to scan (e.g., HDFCBANK.NS TCS.NS). Defaults to the config list.
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,

        /// Maximum concurrent fetches.
        #[arg(long)]
        workers: Option<usize>,

        /// Write the report to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report format.
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        #[command(flatten)]
        args: ScanArgs,
    },
    /// Show the indicator series behind one symbol's signal.
    Inspect {
        /// Symbol to inspect.
        symbol: String,

        /// Number of most recent candles to print.
        #[arg(long, default_value_t = 20)]
        tail: usize,

        #[command(flatten)]
        args: ScanArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Scan {
            symbols,
            workers,
            output,
            format,
            args,
        } => run_scan_command(symbols, workers, output, format, args),
        Commands::Inspect { symbol, tail, args } => run_inspect(symbol, tail, args),
    }
}

/// Load the config file (or defaults) and apply flag overrides.
fn resolve_config(args: &ScanArgs) -> Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScanConfig::default(),
    };

    if let Some(v) = args.atr_period {
        config.atr_period = v;
    }
    if let Some(v) = args.multiplier {
        config.multiplier = v;
    }
    if let Some(v) = args.period {
        config.period = v;
    }
    if let Some(v) = args.interval {
        config.interval = v;
    }
    if let Some(v) = &args.timezone {
        config.timezone = v.clone();
    }
    Ok(config)
}

fn build_provider(args: &ScanArgs, config: &ScanConfig) -> Result<Box<dyn CandleProvider>> {
    let tz = config.tz()?;
    if args.synthetic {
        info!("using synthetic candles (seed {}); results are not market data", args.seed);
        Ok(Box::new(SyntheticProvider::new(args.seed, tz)))
    } else {
        Ok(Box::new(YahooProvider::new(tz)?))
    }
}

fn run_scan_command(
    symbols: Vec<String>,
    workers: Option<usize>,
    output: Option<PathBuf>,
    format: Format,
    args: ScanArgs,
) -> Result<()> {
    let mut config = resolve_config(&args)?;
    if !symbols.is_empty() {
        config.symbols = symbols;
    }
    if let Some(w) = workers {
        config.workers = w;
    }
    config.validate()?;

    let provider = build_provider(&args, &config)?;
    let report = run_scan(&config, provider.as_ref(), &LogProgress)?;

    match output {
        Some(path) => {
            println!("{}", report.render_table());
            write_report(&report, &path, format)?;
            info!("report written to {}", path.display());
        }
        None => {
            eprintln!("{}", report.render_table());
            match format {
                Format::Json => println!("{}", report.to_json_pretty()?),
                Format::Csv => print!("{}", report.to_csv_string()?),
            }
        }
    }

    Ok(())
}

fn write_report(report: &utscan_runner::Report, path: &Path, format: Format) -> Result<()> {
    match format {
        Format::Json => report.write_json(path)?,
        Format::Csv => report.write_csv(path)?,
    }
    Ok(())
}

fn run_inspect(symbol: String, tail: usize, args: ScanArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    if symbol.trim().is_empty() {
        bail!("symbol must not be blank");
    }

    let provider = build_provider(&args, &config)?;
    let scanner = Scanner::new(config.params(), config.period, config.interval);
    let (candles, analysis) = scanner
        .inspect(provider.as_ref(), &symbol)
        .with_context(|| format!("inspecting {symbol}"))?;

    println!(
        "{symbol} via {} ({} x {}, ATR {} x {}), {} candles",
        provider.name(),
        config.period,
        config.interval,
        config.atr_period,
        config.multiplier,
        candles.len()
    );
    println!(
        "{:<25}  {:>10}  {:>10}  {:>10}  Signal",
        "Timestamp", "Close", "ATR", "Stop"
    );

    let start = candles.len().saturating_sub(tail);
    for i in start..candles.len() {
        let c = &candles[i];
        let flag = if analysis.signals.buy[i] {
            "BUY"
        } else if analysis.signals.sell[i] {
            "SELL"
        } else {
            ""
        };
        let atr = if analysis.atr[i].is_nan() {
            "-".to_string()
        } else {
            format!("{:.4}", analysis.atr[i])
        };
        println!(
            "{:<25}  {:>10.2}  {:>10}  {:>10.2}  {flag}",
            c.timestamp.format("%Y-%m-%d %H:%M %:z"),
            c.close,
            atr,
            analysis.stops[i],
        );
    }

    println!("{symbol}: Last signal was {}", analysis.resolution);
    Ok(())
}
