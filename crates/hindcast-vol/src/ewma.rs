//! Exponentially Weighted Moving Average (EWMA) volatility
//!
//! EWMA gives more weight to recent observations, making it responsive to
//! changing market conditions. This is the RiskMetrics approach:
//!
//! σ²_t = λ * σ²_{t-1} + (1-λ) * r²_{t-1}
//!
//! where λ is the decay factor (typically 0.94 for daily data). The
//! recursion runs on variances and the square root is taken only when the
//! estimate is reported.

use crate::model::{VolatilityEstimate, VolatilityEstimator, VolatilityModel};
use hindcast_core::{Estimate, EstimateSeries, Result, ReturnSeries, RiskError, stats};
use serde::{Deserialize, Serialize};

/// EWMA volatility configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EwmaConfig {
    /// Decay factor λ (default: 0.94)
    /// Higher values = more weight on past, slower adaptation
    /// Lower values = more weight on recent, faster adaptation
    pub decay: f64,

    /// Number of leading observations whose sample variance seeds σ²_0
    /// (default: None, the full series)
    pub seed_window: Option<usize>,
}

impl Default for EwmaConfig {
    fn default() -> Self {
        Self {
            decay: 0.94,
            seed_window: None,
        }
    }
}

/// EWMA volatility estimator
#[derive(Debug)]
pub struct EwmaVolatility {
    config: EwmaConfig,
}

impl EwmaVolatility {
    /// Create a new EWMA estimator with the given configuration
    ///
    /// # Errors
    /// [`RiskError::Parameter`] if the decay is outside (0, 1) or the seed
    /// window is shorter than 2.
    pub fn new(config: EwmaConfig) -> Result<Self> {
        if !(config.decay > 0.0 && config.decay < 1.0) {
            return Err(RiskError::parameter(
                "decay",
                format!("{} (must be between 0 and 1, exclusive)", config.decay),
            ));
        }
        if let Some(w) = config.seed_window.filter(|&w| w < 2) {
            return Err(RiskError::parameter(
                "seed_window",
                format!("{w} (must be at least 2)"),
            ));
        }
        Ok(Self { config })
    }

    /// Create with default configuration.
    ///
    /// # Errors
    /// Returns an error if the default configuration is invalid (should not happen).
    pub fn try_default() -> Result<Self> {
        Self::new(EwmaConfig::default())
    }

    /// Get the half-life of the EWMA (in periods)
    ///
    /// Half-life = ln(0.5) / ln(λ)
    pub fn half_life(&self) -> f64 {
        0.5_f64.ln() / self.config.decay.ln()
    }

    /// One-step-ahead volatility for the period after the last observation.
    pub fn forecast(&self, series: &ReturnSeries) -> Result<f64> {
        let variances = self.variances(series)?;
        Ok(variances[series.len()].sqrt())
    }

    /// Seed variance σ²_0.
    fn seed_variance(&self, series: &ReturnSeries) -> Result<f64> {
        let n = series.len();
        let w = self.config.seed_window.unwrap_or(n);
        if w > n {
            return Err(RiskError::parameter(
                "seed_window",
                format!("{w} exceeds series length {n}"),
            ));
        }
        stats::sample_variance(&series.observed_in(0..w)).ok_or_else(|| {
            RiskError::validation(format!(
                "seed window of {w} entries holds fewer than 2 observed returns"
            ))
        })
    }

    /// Variances σ²_0..=σ²_n; the last entry is the forecast past the end.
    fn variances(&self, series: &ReturnSeries) -> Result<Vec<f64>> {
        let lambda = self.config.decay;
        let one_minus_lambda = 1.0 - lambda;

        let mut variances = Vec::with_capacity(series.len() + 1);
        let mut variance = self.seed_variance(series)?;
        variances.push(variance);

        for r in series.values().iter() {
            // A missing return leaves the variance unchanged
            if !r.is_nan() {
                variance = lambda * variance + one_minus_lambda * r * r;
            }
            variances.push(variance);
        }

        Ok(variances)
    }
}

impl VolatilityEstimator for EwmaVolatility {
    fn estimate(&self, series: &ReturnSeries) -> Result<VolatilityEstimate> {
        let mut variances = self.variances(series)?;
        variances.truncate(series.len());

        let values = variances.into_iter().map(|v| Some(v.sqrt())).collect();

        Ok(VolatilityEstimate {
            model: VolatilityModel::Ewma(self.config.clone()),
            volatility: Estimate::Series(EstimateSeries::new(series.index().clone(), values)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hindcast_core::{MissingPolicy, SeriesIndex};

    #[test]
    fn test_ewma_config_default() {
        let config = EwmaConfig::default();
        assert_eq!(config.decay, 0.94);
        assert_eq!(config.seed_window, None);
    }

    #[test]
    fn test_invalid_decay() {
        for decay in [0.0, 1.0, 1.5, -0.2, f64::NAN] {
            let config = EwmaConfig {
                decay,
                ..Default::default()
            };
            assert!(matches!(
                EwmaVolatility::new(config),
                Err(RiskError::Parameter { name: "decay", .. })
            ));
        }
    }

    #[test]
    fn test_half_life() {
        let estimator = EwmaVolatility::try_default().unwrap();
        // For λ=0.94, half-life ≈ 11.2 periods
        assert_relative_eq!(estimator.half_life(), 11.2, epsilon = 0.1);
    }

    #[test]
    fn test_recursion_by_hand() {
        let estimator = EwmaVolatility::new(EwmaConfig {
            decay: 0.9,
            seed_window: Some(2),
        })
        .unwrap();
        let series = ReturnSeries::from_values(vec![0.01, -0.01, 0.02]).unwrap();
        let estimate = estimator.estimate(&series).unwrap();
        let path = estimate.as_series().unwrap();

        // Seed: sample variance of [0.01, -0.01] = 2e-4
        let s0 = 2e-4;
        let s1 = 0.9 * s0 + 0.1 * 0.01_f64.powi(2);
        let s2 = 0.9 * s1 + 0.1 * 0.01_f64.powi(2);
        let s3 = 0.9 * s2 + 0.1 * 0.02_f64.powi(2);

        assert_relative_eq!(path.get(0).unwrap(), s0.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(path.get(1).unwrap(), s1.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(path.get(2).unwrap(), s2.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(estimator.forecast(&series).unwrap(), s3.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_seed_window_longer_than_series() {
        let estimator = EwmaVolatility::new(EwmaConfig {
            decay: 0.94,
            seed_window: Some(50),
        })
        .unwrap();
        let series = ReturnSeries::from_values(vec![0.01, 0.02, 0.03]).unwrap();
        assert!(matches!(
            estimator.estimate(&series),
            Err(RiskError::Parameter { name: "seed_window", .. })
        ));
    }

    #[test]
    fn test_missing_return_carries_variance() {
        let estimator = EwmaVolatility::new(EwmaConfig {
            decay: 0.5,
            seed_window: None,
        })
        .unwrap();
        let series = ReturnSeries::with_policy(
            SeriesIndex::periods(4),
            vec![0.01, f64::NAN, 0.03, 0.02],
            MissingPolicy::Exclude,
        )
        .unwrap();
        let estimate = estimator.estimate(&series).unwrap();
        let path = estimate.as_series().unwrap();
        // σ²_2 would use r_1, which is missing
        assert_relative_eq!(path.get(2).unwrap(), path.get(1).unwrap());
    }
}
