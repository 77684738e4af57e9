//! Sample statistics used across estimators.
//!
//! All functions take plain slices of observed (finite) values and return
//! `None` when the sample is too small for the statistic to exist.

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance with n-1 degrees of freedom.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let n = values.len() as f64;
    Some(values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0))
}

/// Sample standard deviation with n-1 degrees of freedom.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Empirical quantile at level `p` in [0, 1].
///
/// Linear interpolation between order statistics at position `(n - 1) * p`,
/// the same rule as the default of most numerical packages.
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, p)
}

/// [`quantile`] of an already ascending-sorted slice.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let weight = h - lo as f64;
    Some(sorted[lo] + weight * (sorted[hi] - sorted[lo]))
}
