//! Historical simulation
//!
//! VaR is the negated empirical (1−c) quantile of past returns; ES is the
//! mean loss over the returns at or below that quantile. In rolling mode the
//! entry at `t` uses the W returns strictly before `t`, so each entry is a
//! forecast that can be compared with the return realized at `t`.

use crate::measure::{RiskEstimator, RiskMeasure, RiskMeasureEstimate, VarMethod};
use crate::tail;
use hindcast_core::{
    Estimate, EstimateSeries, Result, ReturnSeries, RiskError, validate_confidence,
};
use hindcast_vol::VolatilityEstimate;
use serde::{Deserialize, Serialize};

/// Historical simulation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSimConfig {
    /// Trailing window length (default: None, the full series)
    pub window: Option<usize>,

    /// One estimate per index entry (default: false). Requires a window.
    pub rolling: bool,
}

/// Empirical-quantile estimator
#[derive(Debug)]
pub struct HistoricalSimulation {
    config: HistoricalSimConfig,
}

impl HistoricalSimulation {
    /// Create a new estimator with the given configuration
    ///
    /// # Errors
    /// [`RiskError::Parameter`] for a zero window, or rolling mode without
    /// a window.
    pub fn new(config: HistoricalSimConfig) -> Result<Self> {
        match config.window {
            Some(0) => Err(RiskError::parameter("window", "must be at least 1")),
            None if config.rolling => Err(RiskError::parameter(
                "window",
                "rolling estimates need a window length",
            )),
            _ => Ok(Self { config }),
        }
    }

    /// Create with default configuration.
    pub fn try_default() -> Result<Self> {
        Self::new(HistoricalSimConfig::default())
    }

    fn rolling(
        measure: RiskMeasure,
        series: &ReturnSeries,
        window: usize,
        confidence: f64,
    ) -> Result<Estimate> {
        let n = series.len();
        let min = tail::min_sample(confidence);
        if window < min {
            return Err(RiskError::parameter(
                "window",
                format!(
                    "{window} observations cannot resolve confidence {confidence}; \
                     need at least {min}"
                ),
            ));
        }
        if window >= n {
            return Err(RiskError::parameter(
                "window",
                format!("{window} leaves no forecast in a series of length {n}"),
            ));
        }
        tail::warn_if_thin(window, confidence);

        let values = (0..n)
            .map(|t| {
                if t < window {
                    return None;
                }
                // Missing returns may thin a window below the minimum
                let sample = series.observed_in(t - window..t);
                (sample.len() >= min).then(|| tail::loss(measure, sample, confidence))
            })
            .collect();

        Ok(Estimate::Series(EstimateSeries::new(series.index().clone(), values)?))
    }

    fn trailing(
        measure: RiskMeasure,
        series: &ReturnSeries,
        window: Option<usize>,
        confidence: f64,
    ) -> Result<Estimate> {
        let n = series.len();
        let w = window.unwrap_or(n);
        if w > n {
            return Err(RiskError::parameter(
                "window",
                format!("{w} exceeds series length {n}"),
            ));
        }

        let sample = series.observed_in(n - w..n);
        let min = tail::min_sample(confidence);
        if sample.len() < min {
            return Err(RiskError::parameter(
                "window",
                format!(
                    "{} observed returns cannot resolve confidence {confidence}; \
                     need at least {min}",
                    sample.len()
                ),
            ));
        }
        tail::warn_if_thin(sample.len(), confidence);

        Ok(Estimate::Scalar(tail::loss(measure, sample, confidence)))
    }
}

impl RiskEstimator for HistoricalSimulation {
    fn estimate(
        &self,
        measure: RiskMeasure,
        series: &ReturnSeries,
        confidence: f64,
        volatility: Option<&VolatilityEstimate>,
    ) -> Result<RiskMeasureEstimate> {
        validate_confidence(confidence)?;
        if volatility.is_some() {
            return Err(RiskError::parameter(
                "volatility",
                "historical simulation uses the empirical distribution only",
            ));
        }

        let value = match (self.config.rolling, self.config.window) {
            (true, Some(w)) => Self::rolling(measure, series, w, confidence)?,
            _ => Self::trailing(measure, series, self.config.window, confidence)?,
        };

        Ok(RiskMeasureEstimate {
            measure,
            method: VarMethod::Historical(self.config.clone()),
            confidence,
            volatility_model: None,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hindcast_core::{MissingPolicy, SeriesIndex};

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| (i as f64 - 10.0) / 1000.0).collect()
    }

    #[test]
    fn test_rolling_needs_window() {
        let config = HistoricalSimConfig {
            window: None,
            rolling: true,
        };
        assert!(matches!(
            HistoricalSimulation::new(config),
            Err(RiskError::Parameter { name: "window", .. })
        ));
    }

    #[test]
    fn test_too_few_observations_for_confidence() {
        let series = ReturnSeries::from_values(ramp(50)).unwrap();
        let estimator = HistoricalSimulation::try_default().unwrap();
        // 99% needs at least 100 returns
        assert!(matches!(
            estimator.estimate(RiskMeasure::ValueAtRisk, &series, 0.99, None),
            Err(RiskError::Parameter { name: "window", .. })
        ));
        assert!(estimator
            .estimate(RiskMeasure::ValueAtRisk, &series, 0.95, None)
            .is_ok());
    }

    #[test]
    fn test_volatility_rejected() {
        use hindcast_vol::{HistoricalConfig, VolatilityModel};
        let series = ReturnSeries::from_values(ramp(40)).unwrap();
        let vol = VolatilityEstimate {
            model: VolatilityModel::Historical(HistoricalConfig::default()),
            volatility: Estimate::Scalar(0.01),
        };
        let estimator = HistoricalSimulation::try_default().unwrap();
        assert!(matches!(
            estimator.estimate(RiskMeasure::ValueAtRisk, &series, 0.95, Some(&vol)),
            Err(RiskError::Parameter { name: "volatility", .. })
        ));
    }

    #[test]
    fn test_rolling_uses_returns_strictly_before() {
        let values = ramp(30);
        let series = ReturnSeries::from_values(values.clone()).unwrap();
        let estimator = HistoricalSimulation::new(HistoricalSimConfig {
            window: Some(20),
            rolling: true,
        })
        .unwrap();
        let estimate = estimator
            .estimate(RiskMeasure::ValueAtRisk, &series, 0.95, None)
            .unwrap();
        let path = estimate.as_series().unwrap();

        assert_eq!(path.len(), 30);
        assert!((0..20).all(|t| path.get(t).is_none()));

        // Entry 25 sees returns 5..25: q_0.05 at position 0.95
        let window = &values[5..25];
        let expected = -(window[0] + 0.95 * (window[1] - window[0]));
        assert_relative_eq!(path.get(25).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_rolling_window_thinned_by_missing() {
        let mut values = ramp(25);
        values[21] = f64::NAN;
        let series =
            ReturnSeries::with_policy(SeriesIndex::periods(25), values, MissingPolicy::Exclude)
                .unwrap();
        let estimator = HistoricalSimulation::new(HistoricalSimConfig {
            window: Some(20),
            rolling: true,
        })
        .unwrap();
        let estimate = estimator
            .estimate(RiskMeasure::ValueAtRisk, &series, 0.95, None)
            .unwrap();
        let path = estimate.as_series().unwrap();
        assert!(path.get(20).is_some());
        assert!(path.get(22).is_none());
    }

    #[test]
    fn test_shortfall_at_least_var() {
        let series = ReturnSeries::from_values(ramp(200)).unwrap();
        let estimator = HistoricalSimulation::try_default().unwrap();
        let var = estimator
            .estimate(RiskMeasure::ValueAtRisk, &series, 0.975, None)
            .unwrap();
        let es = estimator
            .estimate(RiskMeasure::ExpectedShortfall, &series, 0.975, None)
            .unwrap();
        assert!(es.latest().unwrap() >= var.latest().unwrap());
    }
}
