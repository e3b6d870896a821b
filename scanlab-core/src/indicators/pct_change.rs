//! N-bar percentage change.
//!
//! pct_change[t] = values[t] / values[t - period] - 1, as a fraction
//! (0.02 = +2%). `None` for the first `period` elements, and wherever the
//! reference value is zero.

pub fn pct_change(values: &[f64], period: usize) -> Vec<Option<f64>> {
    assert!(period >= 1, "pct_change period must be >= 1");
    let n = values.len();
    let mut result = vec![None; n];

    for i in period..n {
        let prev = values[i - period];
        if prev != 0.0 {
            result[i] = Some(values[i] / prev - 1.0);
        }
    }

    result
}
