//! Monte Carlo VaR and ES
//!
//! Draws `simulations` paths of `horizon` periods from a single seeded
//! generator, aggregates each path into a horizon return, and reads the
//! tail statistic off the simulated outcomes. Simple returns compound over
//! the path, log returns add.

use crate::measure::{RiskEstimator, RiskMeasure, RiskMeasureEstimate, VarMethod};
use crate::tail;
use hindcast_core::{Estimate, Result, ReturnKind, ReturnSeries, RiskError, validate_confidence};
use hindcast_vol::VolatilityEstimate;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Where simulated period returns come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationSource {
    /// N(μ, σ²) with the sample mean and the supplied or sample σ
    #[default]
    Gaussian,
    /// Resampling observed returns with replacement
    Bootstrap,
}

/// Monte Carlo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Number of simulated paths (default: 10 000)
    pub simulations: usize,

    /// Smallest accepted number of paths (default: 1 000)
    pub min_simulations: usize,

    /// Generator seed; equal seeds give equal results (default: 42)
    pub seed: u64,

    /// Periods per path (default: 1)
    pub horizon: usize,

    /// Distribution of period returns (default: Gaussian)
    pub source: SimulationSource,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            simulations: 10_000,
            min_simulations: 1_000,
            seed: 42,
            horizon: 1,
            source: SimulationSource::Gaussian,
        }
    }
}

/// Seeded simulation estimator
#[derive(Debug)]
pub struct MonteCarloSimulation {
    config: MonteCarloConfig,
}

impl MonteCarloSimulation {
    /// Create a new estimator with the given configuration
    ///
    /// # Errors
    /// [`RiskError::Parameter`] if fewer than `min_simulations` paths are
    /// requested or the horizon is zero.
    pub fn new(config: MonteCarloConfig) -> Result<Self> {
        if config.simulations < config.min_simulations {
            return Err(RiskError::parameter(
                "simulations",
                format!(
                    "{} (must be at least {})",
                    config.simulations, config.min_simulations
                ),
            ));
        }
        if config.horizon == 0 {
            return Err(RiskError::parameter("horizon", "must be at least 1 period"));
        }
        Ok(Self { config })
    }

    /// Create with default configuration.
    pub fn try_default() -> Result<Self> {
        Self::new(MonteCarloConfig::default())
    }

    /// Simulated horizon returns.
    ///
    /// # Errors
    /// [`RiskError::Validation`] if σ cannot be determined for a Gaussian
    /// draw, [`RiskError::Parameter`] if a volatility is supplied to a
    /// bootstrap.
    pub fn simulate(
        &self,
        series: &ReturnSeries,
        volatility: Option<&VolatilityEstimate>,
    ) -> Result<Vec<f64>> {
        let kind = series.kind();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut outcomes = Vec::with_capacity(self.config.simulations);
        let mut path = vec![0.0; self.config.horizon];

        match self.config.source {
            SimulationSource::Gaussian => {
                let sigma = match volatility {
                    Some(v) => v.latest().ok_or_else(|| {
                        RiskError::validation("volatility estimate has no defined value")
                    })?,
                    None => series.std_dev().ok_or_else(|| {
                        RiskError::validation("fewer than 2 observed returns to estimate σ")
                    })?,
                };
                let mu = series.mean();
                let normal = Normal::new(mu, sigma)
                    .map_err(|e| RiskError::parameter("volatility", e.to_string()))?;
                debug!("monte carlo: N({mu:.6}, {sigma:.6}²), seed {}", self.config.seed);

                for _ in 0..self.config.simulations {
                    for r in &mut path {
                        *r = normal.sample(&mut rng);
                    }
                    outcomes.push(aggregate(kind, &path));
                }
            }
            SimulationSource::Bootstrap => {
                if volatility.is_some() {
                    return Err(RiskError::parameter(
                        "volatility",
                        "bootstrap draws resample observed returns and take no volatility",
                    ));
                }
                let observed = series.observed();
                debug!(
                    "monte carlo: bootstrap over {} returns, seed {}",
                    observed.len(),
                    self.config.seed
                );

                for _ in 0..self.config.simulations {
                    for r in &mut path {
                        *r = observed[rng.gen_range(0..observed.len())];
                    }
                    outcomes.push(aggregate(kind, &path));
                }
            }
        }

        Ok(outcomes)
    }
}

fn aggregate(kind: ReturnKind, path: &[f64]) -> f64 {
    match kind {
        ReturnKind::Log => path.iter().sum(),
        // (1 + acc)(1 + r) - 1, exact for a single period
        ReturnKind::Simple => path.iter().fold(0.0, |acc, r| acc + r + acc * r),
    }
}

impl RiskEstimator for MonteCarloSimulation {
    fn estimate(
        &self,
        measure: RiskMeasure,
        series: &ReturnSeries,
        confidence: f64,
        volatility: Option<&VolatilityEstimate>,
    ) -> Result<RiskMeasureEstimate> {
        validate_confidence(confidence)?;
        let min = tail::min_sample(confidence);
        if self.config.simulations < min {
            return Err(RiskError::parameter(
                "simulations",
                format!(
                    "{} paths cannot resolve confidence {confidence}; need at least {min}",
                    self.config.simulations
                ),
            ));
        }
        tail::warn_if_thin(self.config.simulations, confidence);

        let outcomes = self.simulate(series, volatility)?;

        Ok(RiskMeasureEstimate {
            measure,
            method: VarMethod::MonteCarlo(self.config.clone()),
            confidence,
            volatility_model: volatility.map(|v| v.model.clone()),
            value: Estimate::Scalar(tail::loss(measure, outcomes, confidence)),
        })
    }
}
