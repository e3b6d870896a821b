//! Rolling-window indicators.
//!
//! Primitives operate on plain `&[f64]` series and return `Vec<Option<f64>>`
//! aligned with the input: `None` marks an unfilled window, and it stays
//! `None` through downstream arithmetic — there is no NaN sentinel anywhere
//! in the pipeline. [`computator::compute_indicators`] assembles the full
//! per-bar record set for one ticker.

pub mod computator;
pub mod pct_change;
pub mod rolling;
pub mod rsi;

pub use computator::{compute_indicators, IndicatorConfig, IndicatorRecord};
pub use pct_change::pct_change;
pub use rolling::{rolling_max, rolling_mean};
pub use rsi::wilder_rsi;

/// Create synthetic bars from close prices for testing.
///
/// Plausible OHLV: open = previous close (or close for the first bar),
/// high/low bracket open and close, volume = 100_000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::PriceBar> {
    use crate::domain::PriceBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                ticker: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 0.5,
                low: (open.min(close) - 0.5).max(0.01),
                close,
                volume: 100_000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
