//! ScanLab CLI — watchlist screening commands.
//!
//! Commands:
//! - `screen` — run the indicator/scoring screen over history + snapshot
//!   CSVs and write the artifact bundle (audit CSV, Markdown report, manifest)
//! - `check` — inspect a history CSV for per-ticker data-quality problems
//!   without running the screen

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use scanlab_core::store::{check_monotonic, TimeSeriesStore};
use scanlab_runner::config::{DataConfig, JobConfig, ReportConfig, ReportMode};
use scanlab_runner::{load_history, run_screen_job, save_artifacts, ScreenReport};

#[derive(Parser)]
#[command(name = "scanlab", about = "ScanLab CLI — watchlist indicator & scoring screen")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the screen and write the report artifacts.
    Screen {
        /// Path to a TOML job config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// History CSV (date,ticker,open,high,low,close,volume).
        #[arg(long)]
        history: Option<PathBuf>,

        /// Snapshot CSV (ticker plus quote columns).
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Optional watchlist CSV restricting the universe.
        #[arg(long)]
        watchlist: Option<PathBuf>,

        /// Report mode: daily or weekend (overrides the config file).
        #[arg(long)]
        mode: Option<String>,

        /// Output directory for the artifact bundle (overrides the config file).
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Override the microcap market-cap ceiling.
        #[arg(long)]
        micro_cap_max: Option<f64>,
    },
    /// Check a history CSV for duplicate dates and thin series.
    Check {
        /// History CSV to inspect.
        #[arg(long)]
        history: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Screen {
            config,
            history,
            snapshot,
            watchlist,
            mode,
            output_dir,
            micro_cap_max,
        } => run_screen_cmd(
            config, history, snapshot, watchlist, mode, output_dir, micro_cap_max,
        ),
        Commands::Check { history } => run_check_cmd(&history),
    }
}

fn run_screen_cmd(
    config_path: Option<PathBuf>,
    history: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    watchlist: Option<PathBuf>,
    mode: Option<String>,
    output_dir: Option<PathBuf>,
    micro_cap_max: Option<f64>,
) -> Result<()> {
    let mode = mode
        .map(|m| m.parse::<ReportMode>())
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let mut job = if let Some(path) = config_path {
        if history.is_some() || snapshot.is_some() {
            bail!("--config and --history/--snapshot are mutually exclusive");
        }
        JobConfig::from_file(&path)?
    } else {
        let (Some(history), Some(snapshot)) = (history, snapshot) else {
            bail!("either --config or both --history and --snapshot are required");
        };
        JobConfig {
            data: DataConfig {
                history,
                snapshot,
                watchlist,
            },
            screen: Default::default(),
            report: ReportConfig::default(),
        }
    };
    if let Some(mode) = mode {
        job.report.mode = mode;
    }
    if let Some(output_dir) = output_dir {
        job.report.output_dir = output_dir;
    }
    if let Some(cap) = micro_cap_max {
        job.screen.scoring.micro_cap_max = cap;
    }

    let report = run_screen_job(&job)?;
    print_summary(&report);

    let paths = save_artifacts(&report, &job.report.output_dir)?;
    println!("Wrote: {}", paths.scored_csv.display());
    println!("Wrote: {}", paths.report_md.display());
    println!("Wrote: {}", paths.manifest.display());

    Ok(())
}

fn run_check_cmd(history: &Path) -> Result<()> {
    let load = load_history(history)?;
    if load.skipped_rows > 0 {
        println!("Unusable rows dropped: {}", load.skipped_rows);
    }

    let store = TimeSeriesStore::from_bars(load.bars);
    if store.is_empty() {
        println!("No bars found in {}", history.display());
        return Ok(());
    }

    println!(
        "{:<8} {:>6} {:<25} {}",
        "Ticker", "Bars", "Date Range", "Status"
    );
    println!("{}", "-".repeat(60));

    let mut defects = 0usize;
    for (ticker, bars) in store.iter() {
        let range = format!(
            "{} to {}",
            bars.first().map(|b| b.date.to_string()).unwrap_or_default(),
            bars.last().map(|b| b.date.to_string()).unwrap_or_default(),
        );
        let status = match check_monotonic(ticker, bars) {
            Ok(()) if bars.len() < 50 => "thin (<50 bars)".to_string(),
            Ok(()) => "ok".to_string(),
            Err(err) => {
                defects += 1;
                err.to_string()
            }
        };
        println!("{:<8} {:>6} {:<25} {}", ticker, bars.len(), range, status);
    }

    if defects > 0 {
        bail!("{defects} ticker(s) have data-quality defects");
    }
    Ok(())
}

fn print_summary(report: &ScreenReport) {
    println!();
    println!("=== Screen Result ({} mode) ===", report.mode);
    println!("As of:          {}", report.as_of);
    println!("Tickers scored: {}", report.records.len());
    println!("Buys:           {}", report.ranked.buys.len());
    println!("Sells:          {}", report.ranked.sells.len());
    println!("Holds:          {}", report.ranked.holds.len());
    if !report.skipped.is_empty() {
        println!("Excluded:       {}", report.skipped.len());
        for skip in &report.skipped {
            println!("  {} — {}", skip.ticker, skip.reason);
        }
    }
    for buy in &report.ranked.buys {
        println!(
            "  BUY {:<6} score {}  close {:.2}",
            buy.ticker, buy.score, buy.close
        );
    }
    println!("Dataset hash:   {}", report.dataset_hash);
    println!();
}
