//! Screen job orchestration: load → filter → parallel screen → report.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rayon::prelude::*;
use scanlab_core::domain::QuoteRecord;
use scanlab_core::engine::{screen_ticker, ScreenOutcome, SkippedTicker};
use scanlab_core::report::ReportModel;
use scanlab_core::score::ScoreRecord;
use scanlab_core::store::TimeSeriesStore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{JobConfig, ReportMode};
use crate::loader;

/// Bumped whenever the persisted report layout changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything one screen run produced, in persistable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenReport {
    pub schema_version: u32,
    /// Report date — metadata only, never an input to scoring.
    pub as_of: NaiveDate,
    pub mode: ReportMode,
    /// BLAKE3 over the raw input files.
    pub dataset_hash: String,
    /// History rows the loader had to drop.
    pub history_rows_skipped: usize,
    /// Full audit table: one row per scored ticker, ordered by ticker.
    pub records: Vec<ScoreRecord>,
    /// Ranked Buy/Sell/Hold partitions.
    pub ranked: ReportModel,
    /// Tickers excluded by per-ticker data-quality errors.
    pub skipped: Vec<SkippedTicker>,
}

/// Run a screen job, stamping today as the report date.
pub fn run_screen_job(cfg: &JobConfig) -> Result<ScreenReport> {
    run_screen_job_as_of(cfg, chrono::Local::now().date_naive())
}

/// Run a screen job for a given report date (injectable for tests).
pub fn run_screen_job_as_of(cfg: &JobConfig, as_of: NaiveDate) -> Result<ScreenReport> {
    let history = loader::load_history(&cfg.data.history)
        .with_context(|| format!("loading history {}", cfg.data.history.display()))?;
    let quotes = loader::load_snapshot(&cfg.data.snapshot)
        .with_context(|| format!("loading snapshot {}", cfg.data.snapshot.display()))?;

    let mut store = TimeSeriesStore::from_bars(history.bars);
    if let Some(watchlist_path) = &cfg.data.watchlist {
        let watchlist = loader::load_watchlist(watchlist_path)
            .with_context(|| format!("loading watchlist {}", watchlist_path.display()))?;
        store.retain_tickers(&watchlist);
        info!(tickers = watchlist.len(), "watchlist filter applied");
    }

    info!(
        tickers = store.len(),
        quotes = quotes.len(),
        "screening universe loaded"
    );

    let outcome = screen_store_parallel(&store, &quotes, &cfg.screen);
    for skip in &outcome.skipped {
        warn!(ticker = %skip.ticker, reason = %skip.reason, "ticker excluded from screen");
    }

    let hash_inputs: Vec<&Path> = [
        Some(cfg.data.history.as_path()),
        Some(cfg.data.snapshot.as_path()),
        cfg.data.watchlist.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    let dataset_hash = loader::dataset_hash(&hash_inputs)?;

    Ok(ScreenReport {
        schema_version: SCHEMA_VERSION,
        as_of,
        mode: cfg.report.mode,
        dataset_hash,
        history_rows_skipped: history.skipped_rows,
        records: outcome.records,
        ranked: outcome.report,
        skipped: outcome.skipped,
    })
}

/// Fan tickers out across the rayon pool and merge deterministically.
///
/// Per-ticker screening is embarrassingly parallel (no shared state, no
/// cross-ticker windows); the merge step re-sorts by ticker, so this is
/// outcome-identical to the core's sequential `run_screen`.
pub fn screen_store_parallel(
    store: &TimeSeriesStore,
    quotes: &[QuoteRecord],
    cfg: &scanlab_core::engine::ScreenConfig,
) -> ScreenOutcome {
    let quote_map: HashMap<&str, &QuoteRecord> =
        quotes.iter().map(|q| (q.ticker.as_str(), q)).collect();

    let results: Vec<_> = store
        .iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(ticker, bars)| {
            let result = screen_ticker(ticker, bars, quote_map.get(ticker).copied(), cfg);
            (ticker.to_string(), result)
        })
        .collect();

    ScreenOutcome::from_results(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use scanlab_core::domain::PriceBar;
    use scanlab_core::engine::{run_screen, ScreenConfig};

    fn bars(ticker: &str, closes: &[f64]) -> Vec<PriceBar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                ticker: ticker.into(),
                date: base + chrono::Duration::days(i as i64),
                open: close,
                high: close + 0.1,
                low: (close - 0.1).max(0.01),
                close,
                volume: 80_000,
            })
            .collect()
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut all = Vec::new();
        for (i, ticker) in ["AAA", "BBB", "CCC", "DDD"].iter().enumerate() {
            let closes: Vec<f64> = (0..60).map(|j| 5.0 + i as f64 + (j % 3) as f64 * 0.1).collect();
            all.extend(bars(ticker, &closes));
        }
        let store = TimeSeriesStore::from_bars(all);
        let quotes = vec![
            QuoteRecord {
                ticker: "AAA".into(),
                price: Some(5.1),
                volume: Some(200_000.0),
                market_cap: Some(90_000_000.0),
                previous_close: Some(5.0),
            },
            QuoteRecord {
                ticker: "CCC".into(),
                price: Some(7.1),
                volume: Some(50_000.0),
                market_cap: Some(2_000_000_000.0),
                previous_close: Some(7.0),
            },
        ];
        let cfg = ScreenConfig::default();

        let parallel = screen_store_parallel(&store, &quotes, &cfg);
        let quote_map: HashMap<String, QuoteRecord> = quotes
            .iter()
            .map(|q| (q.ticker.clone(), q.clone()))
            .collect();
        let sequential = run_screen(&store, &quote_map, &cfg);

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn parallel_isolates_bad_ticker() {
        let mut all = bars("GOOD", &vec![4.0; 60]);
        let mut bad = bars("BAD", &[1.0, 1.1]);
        bad[1].date = bad[0].date;
        all.extend(bad);

        let store = TimeSeriesStore::from_bars(all);
        let outcome = screen_store_parallel(&store, &[], &ScreenConfig::default());

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].ticker, "BAD");
    }
}
