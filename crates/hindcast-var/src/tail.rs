//! Tail statistics of a return sample.

use crate::measure::RiskMeasure;
use hindcast_core::stats;
use log::warn;

/// Fewest observations that can resolve the (1-c) quantile, `ceil(1/(1-c))`.
pub(crate) fn min_sample(confidence: f64) -> usize {
    // The offset absorbs the rounding of 1 - c (1 / (1 - 0.99) is not exactly 100)
    (1.0 / (1.0 - confidence) - 1e-9).ceil() as usize
}

pub(crate) fn warn_if_thin(sample_len: usize, confidence: f64) {
    let expected = sample_len as f64 * (1.0 - confidence);
    if expected < 10.0 {
        warn!(
            "only {expected:.1} tail observations expected from {sample_len} returns \
             at confidence {confidence}"
        );
    }
}

/// VaR or ES of a sample of returns, as a positive loss (zero when empty).
pub(crate) fn loss(measure: RiskMeasure, mut sample: Vec<f64>, confidence: f64) -> f64 {
    sample.sort_by(f64::total_cmp);
    let Some(q) = stats::quantile_sorted(&sample, 1.0 - confidence) else {
        return 0.0;
    };
    let value = match measure {
        RiskMeasure::ValueAtRisk => -q,
        RiskMeasure::ExpectedShortfall => {
            // The smallest return is always at or below q, so the tail is never empty
            let tail: Vec<f64> = sample.iter().copied().take_while(|&r| r <= q).collect();
            -stats::mean(&tail).unwrap_or(q)
        }
    };
    value.max(0.0)
}
