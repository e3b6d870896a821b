//! CSV ingestion for the screen: watchlist, history, snapshot.
//!
//! Input files come from an external acquisition step and are treated as
//! untrusted: numeric snapshot fields coerce to `None` on garbage (a partial
//! quote row is normal), history rows with unusable fields are skipped and
//! counted, and dates accept a `YYYY-MM-DD` prefix so timezone-suffixed
//! timestamps load as trading days.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use scanlab_core::domain::{PriceBar, QuoteRecord};
use thiserror::Error;
use tracing::warn;

/// Errors from the loading layer. These are hard, whole-run errors —
/// per-row problems degrade softly instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
}

/// History bars plus the number of rows the loader had to drop.
#[derive(Debug)]
pub struct HistoryLoad {
    pub bars: Vec<PriceBar>,
    pub skipped_rows: usize,
}

/// Load the per-day bar history (`date,ticker,open,high,low,close,volume`).
///
/// Rows with an unparseable date, ticker, or price are skipped and counted;
/// the date column tolerates trailing time/timezone text.
pub fn load_history(path: &Path) -> Result<HistoryLoad, LoadError> {
    let mut reader = open_csv(path)?;
    let headers = headers(&mut reader, path)?;

    let date_idx = require_column(&headers, "date", path)?;
    let ticker_idx = require_column(&headers, "ticker", path)?;
    let open_idx = require_column(&headers, "open", path)?;
    let high_idx = require_column(&headers, "high", path)?;
    let low_idx = require_column(&headers, "low", path)?;
    let close_idx = require_column(&headers, "close", path)?;
    let volume_idx = require_column(&headers, "volume", path)?;

    let mut bars = Vec::new();
    let mut skipped_rows = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                skipped_rows += 1;
                continue;
            }
        };

        let parsed = (|| {
            let date = parse_date_lenient(record.get(date_idx)?)?;
            let ticker = parse_ticker(record.get(ticker_idx)?)?;
            let open = parse_opt_f64(record.get(open_idx)?)?;
            let high = parse_opt_f64(record.get(high_idx)?)?;
            let low = parse_opt_f64(record.get(low_idx)?)?;
            let close = parse_opt_f64(record.get(close_idx)?)?;
            let volume = parse_opt_f64(record.get(volume_idx)?)?.max(0.0) as u64;
            Some(PriceBar {
                ticker,
                date,
                open,
                high,
                low,
                close,
                volume,
            })
        })();

        match parsed {
            Some(bar) => bars.push(bar),
            None => skipped_rows += 1,
        }
    }

    if skipped_rows > 0 {
        warn!(
            path = %path.display(),
            skipped_rows,
            "dropped unusable history rows"
        );
    }

    Ok(HistoryLoad { bars, skipped_rows })
}

/// Load the snapshot quotes. Only `ticker` is required; every numeric
/// column is optional and coerces to `None` on garbage, mirroring how
/// quote providers return partial rows. One quote per ticker (first wins).
pub fn load_snapshot(path: &Path) -> Result<Vec<QuoteRecord>, LoadError> {
    let mut reader = open_csv(path)?;
    let headers = headers(&mut reader, path)?;

    let ticker_idx = require_column(&headers, "ticker", path)?;
    let price_idx = find_column(&headers, "price");
    let volume_idx = find_column(&headers, "volume");
    let cap_idx = find_column(&headers, "marketCap");
    let prev_close_idx = find_column(&headers, "previousClose");

    let mut quotes = Vec::new();
    let mut seen = HashSet::new();

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => continue,
        };
        let Some(ticker) = record.get(ticker_idx).and_then(parse_ticker) else {
            continue;
        };
        if !seen.insert(ticker.clone()) {
            continue;
        }

        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).and_then(parse_opt_f64);
        quotes.push(QuoteRecord {
            ticker,
            price: field(price_idx),
            volume: field(volume_idx),
            market_cap: field(cap_idx),
            previous_close: field(prev_close_idx),
        });
    }

    Ok(quotes)
}

/// Load the watchlist tickers: uppercased, trimmed, deduped, input order kept.
pub fn load_watchlist(path: &Path) -> Result<Vec<String>, LoadError> {
    let mut reader = open_csv(path)?;
    let headers = headers(&mut reader, path)?;
    let ticker_idx = require_column(&headers, "ticker", path)?;

    let mut tickers = Vec::new();
    let mut seen = HashSet::new();
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => continue,
        };
        if let Some(ticker) = record.get(ticker_idx).and_then(parse_ticker) {
            let upper = ticker.to_uppercase();
            if seen.insert(upper.clone()) {
                tickers.push(upper);
            }
        }
    }
    Ok(tickers)
}

/// BLAKE3 fingerprint over the raw input files, in argument order.
///
/// Identical input bytes → identical hash → verifiably identical runs.
pub fn dataset_hash(paths: &[&Path]) -> Result<String, LoadError> {
    let mut hasher = blake3::Hasher::new();
    for path in paths {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        hasher.update(&bytes);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

// ─── Parsing helpers ────────────────────────────────────────────────

fn open_csv(path: &Path) -> Result<csv::Reader<std::fs::File>, LoadError> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

fn headers(
    reader: &mut csv::Reader<std::fs::File>,
    path: &Path,
) -> Result<Vec<String>, LoadError> {
    Ok(reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect())
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn require_column(headers: &[String], name: &str, path: &Path) -> Result<usize, LoadError> {
    find_column(headers, name).ok_or_else(|| LoadError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
    })
}

/// Accept `YYYY-MM-DD` or anything starting with it (timestamped exports).
fn parse_date_lenient(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let prefix = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn parse_ticker(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Lenient numeric coercion: empty, non-numeric, or non-finite → `None`.
fn parse_opt_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
