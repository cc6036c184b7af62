//! Small robust-statistics helpers shared by the light-curve transforms.
//!
//! All functions ignore nothing: callers are expected to have removed null
//! samples first. Empty input yields NaN.

/// Median of a slice. NaN for an empty slice.
pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        0.5 * (sorted[mid - 1] + sorted[mid])
    }
}

/// Arithmetic mean. NaN for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation. NaN for an empty slice.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    if !m.is_finite() {
        return f64::NAN;
    }
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
