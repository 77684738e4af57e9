//! Volatility estimator trait and the closed set of models.

use crate::ewma::{EwmaConfig, EwmaVolatility};
use crate::garch::{Garch11, GarchConfig};
use crate::historical::{HistoricalConfig, HistoricalVolatility};
use hindcast_core::{Estimate, EstimateSeries, Result, ReturnSeries};
use serde::{Deserialize, Serialize};

/// Trait for volatility estimators
pub trait VolatilityEstimator {
    /// Estimate volatility (standard deviation per period) from a return series
    ///
    /// # Arguments
    /// * `series` - Periodic returns, oldest first
    ///
    /// # Returns
    /// * A scalar, or a series aligned to the input index
    fn estimate(&self, series: &ReturnSeries) -> Result<VolatilityEstimate>;
}

/// Volatility model together with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum VolatilityModel {
    /// Sample standard deviation over a trailing window
    Historical(HistoricalConfig),
    /// Exponentially weighted moving average
    Ewma(EwmaConfig),
    /// GARCH(1,1)
    Garch(GarchConfig),
}

impl VolatilityModel {
    /// Short model name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Historical(_) => "historical",
            Self::Ewma(_) => "ewma",
            Self::Garch(_) => "garch",
        }
    }
}

impl VolatilityEstimator for VolatilityModel {
    fn estimate(&self, series: &ReturnSeries) -> Result<VolatilityEstimate> {
        match self {
            Self::Historical(config) => HistoricalVolatility::new(config.clone())?.estimate(series),
            Self::Ewma(config) => EwmaVolatility::new(config.clone())?.estimate(series),
            Self::Garch(config) => Garch11::new(config.clone())?.estimate(series),
        }
    }
}

/// Volatility estimate tagged with the model that produced it.
///
/// For GARCH the tag carries the fitted parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityEstimate {
    /// Model and parameters
    pub model: VolatilityModel,
    /// Standard deviations, never negative
    pub volatility: Estimate,
}

impl VolatilityEstimate {
    /// Most recent defined volatility.
    pub fn latest(&self) -> Option<f64> {
        self.volatility.latest()
    }

    /// The time-indexed estimate, if any.
    pub const fn as_series(&self) -> Option<&EstimateSeries> {
        self.volatility.as_series()
    }
}
