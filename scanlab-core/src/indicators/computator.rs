//! Per-ticker indicator computation.
//!
//! One [`IndicatorRecord`] per bar, aligned with the input series. Every
//! rolling statistic is trailing and per-ticker — window state never leaks
//! across ticker boundaries because the computation only ever sees one
//! ticker's series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;
use crate::indicators::{pct_change, rolling_max, rolling_mean, wilder_rsi};

/// Rolling-window lengths for the indicator set.
///
/// Field names on [`IndicatorRecord`] keep the default-window naming
/// (`sma20`, `rsi14`, ...) regardless of overrides — they are the audit
/// table's column names, not a promise about the configured window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Lookback for the momentum return (`ret_5d`).
    pub return_window: usize,
    /// Short trend SMA (`sma20`).
    pub sma_short: usize,
    /// Long trend SMA (`sma50`).
    pub sma_long: usize,
    /// Average-volume window (`avgvol20`).
    pub volume_window: usize,
    /// Wilder RSI period (`rsi14`).
    pub rsi_period: usize,
    /// Rolling-high window for the drawdown (`rolling_max_10`).
    pub drawdown_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            return_window: 5,
            sma_short: 20,
            sma_long: 50,
            volume_window: 20,
            rsi_period: 14,
            drawdown_window: 10,
        }
    }
}

/// Derived indicator row, aligned 1:1 with a ticker's bar sequence.
///
/// `None` means "window not yet filled" — it propagates through arithmetic
/// and makes every comparison false, never zero and never a panic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
    pub ret_5d: Option<f64>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub avgvol20: Option<f64>,
    pub rsi14: Option<f64>,
    pub rolling_max_10: Option<f64>,
    pub drawdown_10: Option<f64>,
}

/// Compute the full indicator set for one ticker's date-sorted bar series.
///
/// Returns one record per bar. A series shorter than a given window yields
/// `None` for that indicator on every row; the ticker still flows through
/// scoring and fails its gates there — short history is a soft error.
pub fn compute_indicators(bars: &[PriceBar], cfg: &IndicatorConfig) -> Vec<IndicatorRecord> {
    debug_assert!(
        bars.windows(2).all(|p| p[0].date < p[1].date),
        "compute_indicators requires a strictly date-sorted series"
    );

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();

    let ret = pct_change(&closes, cfg.return_window);
    let sma_short = rolling_mean(&closes, cfg.sma_short);
    let sma_long = rolling_mean(&closes, cfg.sma_long);
    let avgvol = rolling_mean(&volumes, cfg.volume_window);
    let rsi = wilder_rsi(&closes, cfg.rsi_period);
    let roll_max = rolling_max(&closes, cfg.drawdown_window);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let rolling_max_10 = roll_max[i];
            let drawdown_10 = rolling_max_10.map(|m| bar.close / m - 1.0);
            IndicatorRecord {
                date: bar.date,
                close: bar.close,
                volume: bar.volume,
                ret_5d: ret[i],
                sma20: sma_short[i],
                sma50: sma_long[i],
                avgvol20: avgvol[i],
                rsi14: rsi[i],
                rolling_max_10,
                drawdown_10,
            }
        })
        .collect()
}
