//! Risk measures, the closed set of estimation methods, and the entry points.

use crate::historical::{HistoricalSimConfig, HistoricalSimulation};
use crate::monte_carlo::{MonteCarloConfig, MonteCarloSimulation};
use crate::parametric::{ParametricConfig, ParametricVar};
use hindcast_core::{Estimate, EstimateSeries, Result, ReturnSeries};
use hindcast_vol::{VolatilityEstimate, VolatilityModel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tail statistic to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskMeasure {
    /// Loss not exceeded with probability c
    ValueAtRisk,
    /// Mean loss given the loss is at or beyond the VaR
    ExpectedShortfall,
}

impl fmt::Display for RiskMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueAtRisk => write!(f, "VaR"),
            Self::ExpectedShortfall => write!(f, "ES"),
        }
    }
}

/// Trait for risk measure estimators
pub trait RiskEstimator {
    /// Estimate `measure` at `confidence` from a return series
    ///
    /// # Arguments
    /// * `measure` - VaR or ES
    /// * `series` - Periodic returns, oldest first
    /// * `confidence` - Confidence level in (0, 1), e.g. 0.99
    /// * `volatility` - Optional volatility estimate; only the methods that
    ///   model σ accept one
    fn estimate(
        &self,
        measure: RiskMeasure,
        series: &ReturnSeries,
        confidence: f64,
        volatility: Option<&VolatilityEstimate>,
    ) -> Result<RiskMeasureEstimate>;
}

/// Estimation method together with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum VarMethod {
    /// Gaussian closed form
    Parametric(ParametricConfig),
    /// Empirical quantile of past returns
    Historical(HistoricalSimConfig),
    /// Quantile of simulated outcomes
    MonteCarlo(MonteCarloConfig),
}

impl VarMethod {
    /// Short method name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Parametric(_) => "parametric",
            Self::Historical(_) => "historical",
            Self::MonteCarlo(_) => "monte_carlo",
        }
    }
}

impl RiskEstimator for VarMethod {
    fn estimate(
        &self,
        measure: RiskMeasure,
        series: &ReturnSeries,
        confidence: f64,
        volatility: Option<&VolatilityEstimate>,
    ) -> Result<RiskMeasureEstimate> {
        match self {
            Self::Parametric(config) => ParametricVar::new(config.clone())?
                .estimate(measure, series, confidence, volatility),
            Self::Historical(config) => HistoricalSimulation::new(config.clone())?
                .estimate(measure, series, confidence, volatility),
            Self::MonteCarlo(config) => MonteCarloSimulation::new(config.clone())?
                .estimate(measure, series, confidence, volatility),
        }
    }
}

/// A VaR or ES estimate tagged with how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMeasureEstimate {
    /// VaR or ES
    pub measure: RiskMeasure,
    /// Method and parameters
    pub method: VarMethod,
    /// Confidence level
    pub confidence: f64,
    /// Model of the volatility estimate used, if any
    pub volatility_model: Option<VolatilityModel>,
    /// Positive losses, never negative
    pub value: Estimate,
}

impl RiskMeasureEstimate {
    /// Most recent defined value.
    pub fn latest(&self) -> Option<f64> {
        self.value.latest()
    }

    /// The time-indexed estimate, if any.
    pub const fn as_series(&self) -> Option<&EstimateSeries> {
        self.value.as_series()
    }
}

/// Estimate Value-at-Risk.
///
/// # Errors
/// [`hindcast_core::RiskError::Parameter`] for an out-of-range confidence
/// or method parameter, [`hindcast_core::RiskError::Alignment`] when a
/// time-indexed volatility is indexed differently from `series`.
pub fn estimate_var(
    series: &ReturnSeries,
    confidence: f64,
    method: &VarMethod,
    volatility: Option<&VolatilityEstimate>,
) -> Result<RiskMeasureEstimate> {
    method.estimate(RiskMeasure::ValueAtRisk, series, confidence, volatility)
}

/// Estimate Expected Shortfall with the same methods as [`estimate_var`].
pub fn estimate_es(
    series: &ReturnSeries,
    confidence: f64,
    method: &VarMethod,
    volatility: Option<&VolatilityEstimate>,
) -> Result<RiskMeasureEstimate> {
    method.estimate(RiskMeasure::ExpectedShortfall, series, confidence, volatility)
}
