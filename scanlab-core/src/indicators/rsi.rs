//! Relative Strength Index (RSI), Wilder smoothing.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), seeded from the first
//! `period` price changes and smoothed with alpha = 1/period thereafter.
//! First defined value at index `period` (the seed needs `period` changes).
//!
//! Edge conventions, fixed and tested:
//! - avg_loss == 0, avg_gain > 0 → 100
//! - avg_gain == 0, avg_loss > 0 → 0
//! - both zero (flat window)     → 50

pub fn wilder_rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    assert!(period >= 1, "RSI period must be >= 1");
    let n = values.len();
    let mut result = vec![None; n];

    if n < period + 1 {
        return result;
    }

    // Seed: average gain and loss over the first `period` changes
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = values[i] - values[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    result[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    // Wilder smoothing for subsequent values
    let alpha = 1.0 / period as f64;
    for i in (period + 1)..n {
        let change = values[i] - values[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;

        result[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rsi_all_gains() {
        let values = [100.0, 101.0, 102.0, 103.0, 104.0, 105.0];
        let result = wilder_rsi(&values, 3);
        assert_approx(result[3].unwrap(), 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let values = [105.0, 104.0, 103.0, 102.0, 101.0, 100.0];
        let result = wilder_rsi(&values, 3);
        assert_approx(result[3].unwrap(), 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_series_is_50() {
        let values = [10.0; 20];
        let result = wilder_rsi(&values, 14);
        for v in result.iter().take(14) {
            assert!(v.is_none());
        }
        assert_approx(result[14].unwrap(), 50.0, DEFAULT_EPSILON);
        assert_approx(result[19].unwrap(), 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_mixed() {
        // Changes: +0.34, -0.25, -0.48, +0.72
        // Seed over the first 3 changes: avg_gain = 0.34/3, avg_loss = 0.73/3
        // RSI[3] = 100 - 100/(1 + 0.34/0.73) ≈ 31.78
        let values = [44.0, 44.34, 44.09, 43.61, 44.33];
        let result = wilder_rsi(&values, 3);

        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert!(result[2].is_none());
        assert_approx(result[3].unwrap(), 31.775, 1e-2);
        let last = result[4].unwrap();
        assert!(last > 31.775 && last < 100.0); // gain pushes RSI up
    }

    #[test]
    fn rsi_bounds() {
        let values = [100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0];
        let result = wilder_rsi(&values, 3);
        for (i, v) in result.iter().enumerate() {
            if let Some(v) = v {
                assert!((0.0..=100.0).contains(v), "RSI out of bounds at {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_too_few_values() {
        let values = [100.0, 101.0, 102.0];
        let result = wilder_rsi(&values, 14);
        assert!(result.iter().all(|v| v.is_none()));
    }

    #[test]
    fn rsi_recovers_from_zero_loss_run() {
        // A loss after a pure-gain seed must pull RSI below 100
        let values = [100.0, 101.0, 102.0, 103.0, 102.0];
        let result = wilder_rsi(&values, 3);
        assert_approx(result[3].unwrap(), 100.0, 1e-6);
        assert!(result[4].unwrap() < 100.0);
    }
}
