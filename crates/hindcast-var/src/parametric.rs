//! Parametric (Gaussian) VaR and ES
//!
//! With returns R ~ N(μ, σ²) and z_c = Φ⁻¹(c):
//!
//! VaR_c = σ·z_c − μ
//! ES_c  = σ·φ(z_c)/(1−c) − μ
//!
//! Over a horizon of h periods the mean scales with h and σ with √h.

use crate::measure::{RiskEstimator, RiskMeasure, RiskMeasureEstimate, VarMethod};
use hindcast_core::{Estimate, Result, ReturnSeries, RiskError, validate_confidence};
use hindcast_vol::VolatilityEstimate;
use log::debug;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Parametric VaR configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametricConfig {
    /// Assume μ = 0 instead of the sample mean (default: false)
    pub zero_mean: bool,

    /// Horizon in periods (default: 1)
    pub horizon: usize,
}

impl Default for ParametricConfig {
    fn default() -> Self {
        Self {
            zero_mean: false,
            horizon: 1,
        }
    }
}

/// Gaussian closed-form estimator
#[derive(Debug)]
pub struct ParametricVar {
    config: ParametricConfig,
}

impl ParametricVar {
    /// Create a new estimator with the given configuration
    ///
    /// # Errors
    /// [`RiskError::Parameter`] if the horizon is zero.
    pub fn new(config: ParametricConfig) -> Result<Self> {
        if config.horizon == 0 {
            return Err(RiskError::parameter("horizon", "must be at least 1 period"));
        }
        Ok(Self { config })
    }

    /// Create with default configuration.
    pub fn try_default() -> Result<Self> {
        Self::new(ParametricConfig::default())
    }
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| RiskError::parameter("distribution", e.to_string()))
}

impl RiskEstimator for ParametricVar {
    fn estimate(
        &self,
        measure: RiskMeasure,
        series: &ReturnSeries,
        confidence: f64,
        volatility: Option<&VolatilityEstimate>,
    ) -> Result<RiskMeasureEstimate> {
        validate_confidence(confidence)?;

        let normal = standard_normal()?;
        let z = normal.inverse_cdf(confidence);
        let factor = match measure {
            RiskMeasure::ValueAtRisk => z,
            RiskMeasure::ExpectedShortfall => normal.pdf(z) / (1.0 - confidence),
        };

        let h = self.config.horizon as f64;
        let mu = if self.config.zero_mean { 0.0 } else { series.mean() };
        let risk = |sigma: f64| (factor * sigma * h.sqrt() - mu * h).max(0.0);

        let value = match volatility.map(|v| &v.volatility) {
            None => {
                let sigma = series.std_dev().ok_or_else(|| {
                    RiskError::validation("fewer than 2 observed returns to estimate σ")
                })?;
                debug!("parametric {measure}: sample σ = {sigma:.6}, μ = {mu:.6}");
                Estimate::Scalar(risk(sigma))
            }
            Some(Estimate::Scalar(sigma)) => Estimate::Scalar(risk(*sigma)),
            Some(Estimate::Series(path)) => {
                series.index().ensure_matches(path.index(), "volatility estimate")?;
                Estimate::Series(path.map(risk))
            }
        };

        Ok(RiskMeasureEstimate {
            measure,
            method: VarMethod::Parametric(self.config.clone()),
            confidence,
            volatility_model: volatility.map(|v| v.model.clone()),
            value,
        })
    }
}
