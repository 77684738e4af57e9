//! Backtest of a VaR forecast series against realized returns.

use crate::coverage::{ChristoffersenTest, KupiecTest, christoffersen_test, kupiec_test};
use crate::traffic_light::TrafficLight;
use hindcast_core::{Result, ReturnSeries, RiskError, validate_confidence};
use hindcast_var::{RiskMeasure, RiskMeasureEstimate};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Fewest counted positions a backtest accepts.
pub const MIN_OBSERVATIONS: usize = 20;

/// Outcome of [`backtest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Confidence level tested
    pub confidence: f64,
    /// Positions with both a forecast and a realized return
    pub observations: usize,
    /// Number of violations
    pub violations: usize,
    /// `observations * (1 - c)`
    pub expected_violations: f64,
    /// `violations / observations`
    pub violation_rate: f64,
    /// Index positions of the violations
    pub violation_positions: Vec<usize>,
    /// Unconditional coverage
    pub kupiec: KupiecTest,
    /// Independence and conditional coverage
    pub christoffersen: ChristoffersenTest,
    /// Basel zone of the violation count
    pub traffic_light: TrafficLight,
}

impl BacktestResult {
    /// Kupiec likelihood-ratio statistic.
    pub const fn kupiec_statistic(&self) -> f64 {
        self.kupiec.lr_statistic
    }

    /// Kupiec p-value.
    pub const fn p_value(&self) -> f64 {
        self.kupiec.p_value
    }
}

/// Backtest a time-indexed VaR forecast against `realized` returns.
///
/// The forecast at position `t` is compared with the return realized at
/// `t`; a violation is a loss `-r_t` strictly greater than `VaR_t`.
///
/// # Errors
/// - [`RiskError::Alignment`] if the forecast is a scalar or its index
///   differs from the realized series' index.
/// - [`RiskError::Parameter`] if the forecast is not a VaR or was made at a
///   different confidence.
/// - [`RiskError::Validation`] if fewer than [`MIN_OBSERVATIONS`] positions
///   remain after skipping undefined forecasts and missing returns.
pub fn backtest(
    realized: &ReturnSeries,
    forecast: &RiskMeasureEstimate,
    confidence: f64,
) -> Result<BacktestResult> {
    validate_confidence(confidence)?;
    if forecast.measure != RiskMeasure::ValueAtRisk {
        return Err(RiskError::parameter(
            "measure",
            format!("{} forecasts cannot be backtested for VaR coverage", forecast.measure),
        ));
    }
    if (forecast.confidence - confidence).abs() > 1e-12 {
        return Err(RiskError::parameter(
            "confidence",
            format!(
                "forecast was made at {} but the backtest tests {confidence}",
                forecast.confidence
            ),
        ));
    }
    let var = forecast.as_series().ok_or_else(|| {
        RiskError::Alignment("a scalar VaR has no index to align with realized returns".into())
    })?;
    realized.index().ensure_matches(var.index(), "VaR forecast")?;

    let (positions, indicators): (Vec<usize>, Vec<bool>) = var
        .defined()
        .filter_map(|(t, v)| realized.get(t).map(|r| (t, -r > v)))
        .unzip();

    let observations = indicators.len();
    if observations < MIN_OBSERVATIONS {
        return Err(RiskError::validation(format!(
            "{observations} aligned observations, at least {MIN_OBSERVATIONS} required"
        )));
    }
    debug!(
        "backtest: {} of {} positions counted",
        observations,
        realized.len()
    );

    let violation_positions: Vec<usize> = positions
        .iter()
        .zip(&indicators)
        .filter_map(|(&t, &hit)| hit.then_some(t))
        .collect();
    let violations = violation_positions.len();

    let kupiec = kupiec_test(observations, violations, confidence)?;
    let christoffersen = christoffersen_test(&indicators, confidence)?;
    let traffic_light = TrafficLight::classify(observations, violations, confidence)?;

    info!(
        "backtest: {violations} violations in {observations} observations \
         (expected {:.1}), Kupiec p = {:.4}, zone {traffic_light}",
        kupiec.expected_violations, kupiec.p_value
    );

    Ok(BacktestResult {
        confidence,
        observations,
        violations,
        expected_violations: kupiec.expected_violations,
        violation_rate: kupiec.violation_rate,
        violation_positions,
        kupiec,
        christoffersen,
        traffic_light,
    })
}
