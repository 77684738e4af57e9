//! Historical (rolling window) volatility
//!
//! Sample standard deviation (n-1 degrees of freedom) of the returns in a
//! trailing window of fixed length W. In rolling mode the entry at `t`
//! covers positions `t-W+1..=t`, so the first W-1 entries are undefined.

use crate::model::{VolatilityEstimate, VolatilityEstimator, VolatilityModel};
use hindcast_core::{Estimate, EstimateSeries, Result, ReturnSeries, RiskError, stats};
use serde::{Deserialize, Serialize};

/// Historical volatility configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalConfig {
    /// Window length W (default: 21, about one trading month)
    pub window: usize,

    /// Produce one estimate per index entry instead of a single scalar
    /// over the last W observations (default: true)
    pub rolling: bool,
}

impl Default for HistoricalConfig {
    fn default() -> Self {
        Self {
            window: 21,
            rolling: true,
        }
    }
}

/// Rolling-window volatility estimator
#[derive(Debug)]
pub struct HistoricalVolatility {
    config: HistoricalConfig,
}

impl HistoricalVolatility {
    /// Create a new estimator with the given configuration
    ///
    /// # Errors
    /// [`RiskError::Parameter`] if the window is shorter than 2.
    pub fn new(config: HistoricalConfig) -> Result<Self> {
        if config.window < 2 {
            return Err(RiskError::parameter(
                "window",
                format!("{} (must be at least 2)", config.window),
            ));
        }
        Ok(Self { config })
    }

    /// Create with default configuration.
    pub fn try_default() -> Result<Self> {
        Self::new(HistoricalConfig::default())
    }

    fn window_volatility(series: &ReturnSeries, end: usize, window: usize) -> Option<f64> {
        // Windows with fewer than two observed values have no estimate
        stats::sample_std_dev(&series.observed_in(end + 1 - window..end + 1))
    }
}

impl VolatilityEstimator for HistoricalVolatility {
    fn estimate(&self, series: &ReturnSeries) -> Result<VolatilityEstimate> {
        let n = series.len();
        let w = self.config.window;

        if w > n {
            return Err(RiskError::parameter(
                "window",
                format!("{w} exceeds series length {n}"),
            ));
        }

        let volatility = if self.config.rolling {
            let values = (0..n)
                .map(|t| {
                    if t + 1 < w {
                        None
                    } else {
                        Self::window_volatility(series, t, w)
                    }
                })
                .collect();
            Estimate::Series(EstimateSeries::new(series.index().clone(), values)?)
        } else {
            let vol = Self::window_volatility(series, n - 1, w).ok_or_else(|| {
                RiskError::validation(format!(
                    "the last {w} entries hold fewer than 2 observed returns"
                ))
            })?;
            Estimate::Scalar(vol)
        };

        Ok(VolatilityEstimate {
            model: VolatilityModel::Historical(self.config.clone()),
            volatility,
        })
    }
}
