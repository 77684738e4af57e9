//! GARCH(1,1) volatility
//!
//! Conditional variance of the demeaned returns ε_t = r_t - μ:
//! ```text
//! σ²_t = ω + α * ε²_{t-1} + β * σ²_{t-1}
//! ```
//! with ω > 0, α ≥ 0, β ≥ 0 and α + β < 1 (covariance stationarity). The
//! recursion starts from the sample variance of ε.
//!
//! Parameters are either supplied directly or fitted by maximising the
//! Gaussian log-likelihood
//! ```text
//! ln L = -0.5 * Σ [ ln(2π) + ln σ²_t + ε²_t / σ²_t ]
//! ```
//! with a Nelder-Mead simplex over the unconstrained coordinates
//! `(ln ω, logit((α+β)/p_max), logit(α/(α+β)))`, which keeps every trial
//! point stationary. A likelihood that is still rising as α+β approaches 1
//! has no stationary maximum, and such a fit is reported as a convergence
//! failure.
//!
//! # References
//! - Bollerslev, T. (1986). "Generalized Autoregressive Conditional
//!   Heteroskedasticity." Journal of Econometrics, 31(3), 307-327.

mod simplex;

use crate::model::{VolatilityEstimate, VolatilityEstimator, VolatilityModel};
use hindcast_core::{Estimate, EstimateSeries, Result, ReturnSeries, RiskError, stats};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use simplex::SimplexOptions;
use std::f64::consts::PI;

/// Minimum number of observed returns needed to fit the model
pub const MIN_OBSERVATIONS: usize = 20;

/// Persistence above which a fit is reported as close to a unit root
const NEAR_UNIT_ROOT: f64 = 0.999;

/// Fitted persistence above this is treated as a unit root and rejected
const UNIT_ROOT: f64 = 0.9999;

/// Upper bound of the persistence reachable by the likelihood search
const MAX_PERSISTENCE: f64 = 1.0 - 1e-6;

/// Simplex stops once every vertex is this close to the centroid
const X_TOLERANCE: f64 = 1e-5;

/// GARCH(1,1) parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GarchParams {
    /// ω: constant term of the variance equation
    pub omega: f64,
    /// α: weight on the last squared shock
    pub alpha: f64,
    /// β: weight on the last variance
    pub beta: f64,
}

impl GarchParams {
    /// Validated parameters.
    ///
    /// # Errors
    /// [`RiskError::Parameter`] unless ω > 0, α ≥ 0, β ≥ 0 and α + β < 1.
    pub fn new(omega: f64, alpha: f64, beta: f64) -> Result<Self> {
        let params = Self { omega, alpha, beta };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        if !(self.omega.is_finite() && self.omega > 0.0) {
            return Err(RiskError::parameter(
                "omega",
                format!("{} (must be positive)", self.omega),
            ));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(RiskError::parameter(
                "alpha",
                format!("{} (must be non-negative)", self.alpha),
            ));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(RiskError::parameter(
                "beta",
                format!("{} (must be non-negative)", self.beta),
            ));
        }
        if self.persistence() >= 1.0 {
            return Err(RiskError::parameter(
                "alpha + beta",
                format!("{} (must be below 1 for a stationary model)", self.persistence()),
            ));
        }
        Ok(())
    }

    /// α + β
    pub fn persistence(&self) -> f64 {
        self.alpha + self.beta
    }

    /// Unconditional variance ω / (1 - α - β)
    pub fn long_run_variance(&self) -> f64 {
        self.omega / (1.0 - self.persistence())
    }

    fn from_unconstrained(theta: &[f64]) -> Self {
        let persistence = MAX_PERSISTENCE * sigmoid(theta[1]);
        let share = sigmoid(theta[2]);
        Self {
            omega: theta[0].exp(),
            alpha: persistence * share,
            beta: persistence * (1.0 - share),
        }
    }

    fn to_unconstrained(self) -> [f64; 3] {
        let persistence = self.persistence();
        [
            self.omega.ln(),
            logit(persistence / MAX_PERSISTENCE),
            logit(self.alpha / persistence),
        ]
    }
}

/// GARCH(1,1) configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarchConfig {
    /// Fixed parameters; when None they are fitted (default: None)
    pub params: Option<GarchParams>,

    /// Iteration budget of the likelihood search (default: 2000)
    pub max_iterations: usize,

    /// Relative spread of log-likelihood values at which the search is
    /// considered converged (default: 1e-9)
    pub tolerance: f64,
}

impl Default for GarchConfig {
    fn default() -> Self {
        Self {
            params: None,
            max_iterations: 2000,
            tolerance: 1e-9,
        }
    }
}

/// Result of a GARCH(1,1) fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GarchFit {
    /// Estimated (or supplied) parameters
    pub params: GarchParams,
    /// Mean removed from the returns
    pub mean: f64,
    /// Gaussian log-likelihood at `params`
    pub log_likelihood: f64,
    /// Simplex iterations used (0 for supplied parameters)
    pub iterations: usize,
}

/// GARCH(1,1) volatility estimator
#[derive(Debug)]
pub struct Garch11 {
    config: GarchConfig,
}

impl Garch11 {
    /// Create a new estimator with the given configuration
    ///
    /// # Errors
    /// [`RiskError::Parameter`] if supplied parameters are invalid or
    /// non-stationary, the iteration budget is zero, or the tolerance is not
    /// positive.
    pub fn new(config: GarchConfig) -> Result<Self> {
        if let Some(params) = &config.params {
            params.validate()?;
        }
        if config.max_iterations == 0 {
            return Err(RiskError::parameter("max_iterations", "must be at least 1"));
        }
        if !(config.tolerance.is_finite() && config.tolerance > 0.0) {
            return Err(RiskError::parameter(
                "tolerance",
                format!("{} (must be positive)", config.tolerance),
            ));
        }
        Ok(Self { config })
    }

    /// Create with default configuration (parameters fitted).
    pub fn try_default() -> Result<Self> {
        Self::new(GarchConfig::default())
    }

    /// Fit the model, or evaluate the supplied parameters.
    ///
    /// # Errors
    /// [`RiskError::Validation`] with fewer than [`MIN_OBSERVATIONS`]
    /// observed returns, [`RiskError::Convergence`] if the likelihood search
    /// exhausts its iteration budget or ends at a persistence indistinguishable
    /// from a unit root.
    pub fn fit(&self, series: &ReturnSeries) -> Result<GarchFit> {
        let data = Innovations::new(series)?;

        if let Some(params) = self.config.params {
            return Ok(GarchFit {
                params,
                mean: data.mean,
                log_likelihood: data.log_likelihood(&params),
                iterations: 0,
            });
        }

        let initial = GarchParams {
            omega: data.seed_variance * 0.05,
            alpha: 0.05,
            beta: 0.90,
        };
        let options = SimplexOptions {
            max_iterations: self.config.max_iterations,
            initial_step: 0.5,
            f_tolerance: self.config.tolerance,
            x_tolerance: X_TOLERANCE,
        };
        let result = simplex::minimize(&initial.to_unconstrained(), options, |theta| {
            -data.log_likelihood(&GarchParams::from_unconstrained(theta))
        });

        if !result.converged {
            return Err(RiskError::Convergence {
                iterations: result.iterations,
            });
        }

        let params = stationary(GarchParams::from_unconstrained(&result.x), result.iterations)?;
        debug!(
            "GARCH(1,1) fit: omega={:.3e} alpha={:.4} beta={:.4} after {} iterations",
            params.omega, params.alpha, params.beta, result.iterations
        );
        if params.persistence() > NEAR_UNIT_ROOT {
            warn!(
                "GARCH(1,1) persistence {:.5} is close to 1; long-run variance is unreliable",
                params.persistence()
            );
        }

        Ok(GarchFit {
            params,
            mean: data.mean,
            log_likelihood: -result.value,
            iterations: result.iterations,
        })
    }

    /// Variance forecasts for the next `horizon` periods past the series.
    ///
    /// σ²_{n+h} = σ²_∞ + (α+β)^(h-1) * (σ²_{n+1} - σ²_∞)
    pub fn forecast_variance(&self, series: &ReturnSeries, horizon: usize) -> Result<Vec<f64>> {
        let fit = self.fit(series)?;
        let data = Innovations::new(series)?;
        let next = data.conditional_variances(&fit.params)[series.len()];
        let long_run = fit.params.long_run_variance();
        let persistence = fit.params.persistence();

        Ok((0..horizon)
            .map(|h| long_run + persistence.powi(h as i32) * (next - long_run))
            .collect())
    }
}

impl VolatilityEstimator for Garch11 {
    fn estimate(&self, series: &ReturnSeries) -> Result<VolatilityEstimate> {
        let fit = self.fit(series)?;
        let data = Innovations::new(series)?;

        let mut variances = data.conditional_variances(&fit.params);
        variances.truncate(series.len());
        let values = variances.into_iter().map(|v| Some(v.sqrt())).collect();

        Ok(VolatilityEstimate {
            model: VolatilityModel::Garch(GarchConfig {
                params: Some(fit.params),
                ..self.config.clone()
            }),
            volatility: Estimate::Series(EstimateSeries::new(series.index().clone(), values)?),
        })
    }
}

/// Demeaned returns (NaN where missing) and the seed variance.
struct Innovations {
    eps: Vec<f64>,
    mean: f64,
    seed_variance: f64,
}

impl Innovations {
    fn new(series: &ReturnSeries) -> Result<Self> {
        let observed = series.observed();
        if observed.len() < MIN_OBSERVATIONS {
            return Err(RiskError::validation(format!(
                "GARCH(1,1) needs at least {MIN_OBSERVATIONS} observed returns, got {}",
                observed.len()
            )));
        }
        let mean = series.mean();
        let seed_variance = stats::sample_variance(&observed).unwrap_or(0.0);
        if seed_variance <= 0.0 {
            return Err(RiskError::validation(
                "returns have zero variance; GARCH(1,1) is undefined",
            ));
        }
        Ok(Self {
            eps: series.values().iter().map(|r| r - mean).collect(),
            mean,
            seed_variance,
        })
    }

    /// σ²_0..=σ²_n. A missing shock is replaced by its expectation σ²_{t-1}.
    fn conditional_variances(&self, params: &GarchParams) -> Vec<f64> {
        let mut variances = Vec::with_capacity(self.eps.len() + 1);
        let mut variance = self.seed_variance;
        variances.push(variance);
        for &e in &self.eps {
            let shock = if e.is_nan() { variance } else { e * e };
            variance = params.omega + params.alpha * shock + params.beta * variance;
            variances.push(variance);
        }
        variances
    }

    fn log_likelihood(&self, params: &GarchParams) -> f64 {
        let variances = self.conditional_variances(params);
        let ln_2pi = (2.0 * PI).ln();
        -0.5 * self
            .eps
            .iter()
            .zip(&variances)
            .filter(|(e, _)| !e.is_nan())
            .map(|(e, v)| ln_2pi + v.ln() + e * e / v)
            .sum::<f64>()
    }
}

/// Reject a fit pushed against the unit root, else re-validate it.
fn stationary(params: GarchParams, iterations: usize) -> Result<GarchParams> {
    if params.persistence() > UNIT_ROOT {
        warn!(
            "GARCH(1,1) likelihood rises towards a unit root (persistence {:.6}); \
             no stationary fit",
            params.persistence()
        );
        return Err(RiskError::Convergence { iterations });
    }
    GarchParams::new(params.omega, params.alpha, params.beta)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}
