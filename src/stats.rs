//! Mean and population standard deviation.
//!
//! Every fitness dimension in this crate scores evenness as
//! `mean − standard deviation`, so a candidate that serves students
//! unevenly is penalized even when its average looks good.

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation. Returns 0.0 for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// The variance-penalized score `mean(values) − std_dev(values)`.
pub fn mean_minus_std_dev(values: &[f64]) -> f64 {
    mean(values) - std_dev(values)
}
