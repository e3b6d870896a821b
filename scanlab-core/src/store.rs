//! TimeSeriesStore — per-ticker ordered daily bar sequences.
//!
//! The store is the only append-only entity in the pipeline: history grows
//! daily and is never mutated. Everything downstream (indicators, scores,
//! reports) is recomputed fresh from it on every run.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::PriceBar;

/// Per-ticker data-quality errors.
///
/// These are hard errors for the affected ticker only: the engine excludes
/// the ticker and continues the batch. A duplicate date is surfaced, never
/// resolved silently — a rolling window over a duplicated bar would be wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("duplicate bar date {date} for ticker {ticker}")]
    DuplicateDate { ticker: String, date: NaiveDate },

    #[error("empty bar series for ticker {ticker}")]
    EmptySeries { ticker: String },
}

/// In-memory map of ticker → date-ordered bar sequence.
///
/// `BTreeMap` keeps ticker iteration order deterministic, which makes the
/// sequential engine pass reproducible without any sorting downstream.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesStore {
    series: BTreeMap<String, Vec<PriceBar>>,
}

impl TimeSeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a flat bar list (e.g. a history CSV).
    ///
    /// Bars are grouped by ticker and each series is stable-sorted by date.
    /// Input is expected sorted but not assumed so; duplicates survive the
    /// sort and are detected later by [`check_monotonic`].
    pub fn from_bars(bars: Vec<PriceBar>) -> Self {
        let mut store = Self::new();
        for bar in bars {
            store.insert(bar);
        }
        for series in store.series.values_mut() {
            series.sort_by_key(|b| b.date);
        }
        store
    }

    /// Append one bar to its ticker's series. No ordering is enforced here;
    /// callers that bypass [`from_bars`] must sort before screening.
    pub fn insert(&mut self, bar: PriceBar) {
        self.series.entry(bar.ticker.clone()).or_default().push(bar);
    }

    pub fn get(&self, ticker: &str) -> Option<&[PriceBar]> {
        self.series.get(ticker).map(|v| v.as_slice())
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PriceBar])> {
        self.series.iter().map(|(t, v)| (t.as_str(), v.as_slice()))
    }

    /// Number of tickers in the store.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Drop every ticker not named in `keep`.
    pub fn retain_tickers(&mut self, keep: &[String]) {
        self.series.retain(|t, _| keep.iter().any(|k| k == t));
    }
}

/// Verify a date-sorted series is strictly increasing.
///
/// After the defensive sort the only possible violation is an adjacent
/// duplicate, which is exactly the data-quality defect we must surface.
pub fn check_monotonic(ticker: &str, bars: &[PriceBar]) -> Result<(), SeriesError> {
    if bars.is_empty() {
        return Err(SeriesError::EmptySeries {
            ticker: ticker.to_string(),
        });
    }
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(SeriesError::DuplicateDate {
                ticker: ticker.to_string(),
                date: pair[1].date,
            });
        }
    }
    Ok(())
}
