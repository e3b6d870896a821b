//! The screening engine: indicators → join → score → ranked report.
//!
//! [`screen_ticker`] is pure and per-ticker, so callers may fan tickers out
//! across threads freely; [`ScreenOutcome::from_results`] is the
//! deterministic merge step. [`run_screen`] is the sequential reference
//! pipeline built from those two pieces — a parallel run over the same
//! inputs produces an identical outcome.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{PriceBar, QuoteRecord};
use crate::indicators::{compute_indicators, IndicatorConfig};
use crate::report::ReportModel;
use crate::score::{score_ticker, ScoreConfig, ScoreRecord};
use crate::store::{check_monotonic, SeriesError, TimeSeriesStore};

/// Engine configuration: indicator windows plus scoring thresholds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub indicators: IndicatorConfig,
    pub scoring: ScoreConfig,
}

/// A ticker excluded from scoring by a per-ticker hard error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: String,
}

/// Everything one screening run produces: the full audit table, the ranked
/// report, and the tickers that were excluded (with reasons).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenOutcome {
    /// One audit row per scored ticker, ordered by ticker.
    pub records: Vec<ScoreRecord>,
    pub report: ReportModel,
    pub skipped: Vec<SkippedTicker>,
}

impl ScreenOutcome {
    /// Merge per-ticker results into one outcome.
    ///
    /// Results are re-sorted by ticker so the outcome is identical no matter
    /// what order (or thread) produced them; the report's tie-break order is
    /// therefore alphabetical.
    pub fn from_results(mut results: Vec<(String, Result<ScoreRecord, SeriesError>)>) -> Self {
        results.sort_by(|a, b| a.0.cmp(&b.0));

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        for (ticker, result) in results {
            match result {
                Ok(rec) => records.push(rec),
                Err(err) => skipped.push(SkippedTicker {
                    ticker,
                    reason: err.to_string(),
                }),
            }
        }

        let report = ReportModel::build(&records);
        Self {
            records,
            report,
            skipped,
        }
    }
}

/// Screen one ticker: validate its series, compute indicators, and score
/// the latest row against the live quote.
///
/// The series is stable-sorted by date here (defensive — input is expected
/// sorted but not assumed so). A duplicate date after the sort is a hard
/// error for this ticker only.
pub fn screen_ticker(
    ticker: &str,
    bars: &[PriceBar],
    quote: Option<&QuoteRecord>,
    cfg: &ScreenConfig,
) -> Result<ScoreRecord, SeriesError> {
    let mut sorted = bars.to_vec();
    sorted.sort_by_key(|b| b.date);
    check_monotonic(ticker, &sorted)?;

    let records = compute_indicators(&sorted, &cfg.indicators);
    // check_monotonic rejected the empty series, so a latest row exists
    let latest = records.last().expect("non-empty series has a latest record");

    Ok(score_ticker(ticker, latest, quote, &cfg.scoring))
}

/// Run the full screen sequentially over every ticker in the store.
///
/// Soft failures (thin history, missing quote) flow through as low scores;
/// hard per-ticker failures land in `skipped` without touching the rest of
/// the batch. An empty store yields an empty outcome, not an error.
pub fn run_screen(
    store: &TimeSeriesStore,
    quotes: &HashMap<String, QuoteRecord>,
    cfg: &ScreenConfig,
) -> ScreenOutcome {
    let results = store
        .iter()
        .map(|(ticker, bars)| {
            let result = screen_ticker(ticker, bars, quotes.get(ticker), cfg);
            (ticker.to_string(), result)
        })
        .collect();
    ScreenOutcome::from_results(results)
}
