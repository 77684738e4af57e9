//! Return series adapter
//!
//! Validates a raw numeric sequence and its time index and produces an
//! immutable [`ReturnSeries`]. Every transformation (log conversion,
//! differencing, slicing) returns a new series.

use crate::error::{Result, RiskError};
use crate::index::SeriesIndex;
use crate::stats;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// How non-finite observations are treated at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// Any NaN or infinity is a validation error
    #[default]
    Reject,
    /// NaN marks a missing observation, excluded from estimation windows
    Exclude,
}

/// Compounding convention of the returns in a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnKind {
    /// Simple returns, `P_t / P_{t-1} - 1`
    #[default]
    Simple,
    /// Continuously compounded returns, `ln(P_t / P_{t-1})`
    Log,
}

/// Ordered, validated sequence of periodic returns.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    index: SeriesIndex,
    values: Array1<f64>,
    kind: ReturnKind,
    policy: MissingPolicy,
}

impl ReturnSeries {
    /// Build a series, rejecting any non-finite value.
    ///
    /// # Errors
    /// [`RiskError::Validation`] if the series is empty, the index length
    /// differs from the number of values, a value is NaN or infinite, or the
    /// index is not strictly increasing.
    pub fn new(index: SeriesIndex, values: Vec<f64>) -> Result<Self> {
        Self::with_policy(index, values, MissingPolicy::Reject)
    }

    /// Build a series with an explicit missing-data policy.
    ///
    /// Under [`MissingPolicy::Exclude`], NaN values are kept as missing
    /// observations; infinities are still rejected, and so is a series with
    /// no observed value at all.
    pub fn with_policy(
        index: SeriesIndex,
        values: Vec<f64>,
        policy: MissingPolicy,
    ) -> Result<Self> {
        if values.is_empty() {
            return Err(RiskError::validation("return series is empty"));
        }
        if index.len() != values.len() {
            return Err(RiskError::validation(format!(
                "index has {} entries but there are {} values",
                index.len(),
                values.len()
            )));
        }

        for (i, &v) in values.iter().enumerate() {
            if v.is_nan() && policy == MissingPolicy::Exclude {
                continue;
            }
            if !v.is_finite() {
                return Err(RiskError::validation(format!(
                    "non-finite value {v} at position {i}"
                )));
            }
        }

        if values.iter().all(|v| v.is_nan()) {
            return Err(RiskError::validation("every observation is missing"));
        }

        if let Some(i) = index.first_unordered() {
            return Err(RiskError::validation(format!(
                "index is not strictly increasing at position {i} ({})",
                index.label(i).unwrap_or_default()
            )));
        }

        Ok(Self {
            index,
            values: Array1::from(values),
            kind: ReturnKind::default(),
            policy,
        })
    }

    /// Build a series indexed by periods `0..n`.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        Self::new(SeriesIndex::periods(values.len()), values)
    }

    /// Tag the series with its compounding convention.
    #[must_use]
    pub fn with_kind(mut self, kind: ReturnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Compounding convention of the returns.
    pub const fn kind(&self) -> ReturnKind {
        self.kind
    }

    /// Missing-data policy the series was built with.
    pub const fn policy(&self) -> MissingPolicy {
        self.policy
    }

    /// Time index.
    pub const fn index(&self) -> &SeriesIndex {
        &self.index
    }

    /// Raw values, NaN where an observation is missing.
    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Copy of the raw values.
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }

    /// Number of index entries, missing observations included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; an empty series cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Observation at position `i`, `None` when missing or out of range.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied().filter(|v| !v.is_nan())
    }

    /// All observed values, in order.
    pub fn observed(&self) -> Vec<f64> {
        self.observed_in(0..self.len())
    }

    /// Observed values at positions in `range`.
    pub fn observed_in(&self, range: Range<usize>) -> Vec<f64> {
        self.values
            .slice(ndarray::s![range])
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect()
    }

    /// Number of missing observations.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }

    /// Mean of the observed values.
    pub fn mean(&self) -> f64 {
        // At least one value is observed by construction
        stats::mean(&self.observed()).unwrap_or(0.0)
    }

    /// Sample standard deviation of the observed values.
    pub fn std_dev(&self) -> Option<f64> {
        stats::sample_std_dev(&self.observed())
    }

    /// Convert to continuously compounded returns, `ln(1 + r)`.
    ///
    /// # Errors
    /// [`RiskError::Validation`] if a simple return is -100% or worse.
    pub fn to_log_returns(&self) -> Result<Self> {
        match self.kind {
            ReturnKind::Log => Ok(self.clone()),
            ReturnKind::Simple => {
                if let Some(i) = self.values.iter().position(|&r| r <= -1.0) {
                    return Err(RiskError::validation(format!(
                        "simple return {} at position {i} has no log equivalent",
                        self.values[i]
                    )));
                }
                Ok(self.derive(self.index.clone(), self.values.mapv(f64::ln_1p), ReturnKind::Log))
            }
        }
    }

    /// Convert to simple returns, `exp(r) - 1`.
    pub fn to_simple_returns(&self) -> Self {
        match self.kind {
            ReturnKind::Simple => self.clone(),
            ReturnKind::Log => self.derive(
                self.index.clone(),
                self.values.mapv(f64::exp_m1),
                ReturnKind::Simple,
            ),
        }
    }

    /// First difference, indexed from the second entry.
    ///
    /// # Errors
    /// [`RiskError::Validation`] if the series has a single entry or the
    /// differenced series has no observed value.
    pub fn difference(&self) -> Result<Self> {
        if self.len() < 2 {
            return Err(RiskError::validation(
                "cannot difference a series with a single observation",
            ));
        }
        let n = self.len();
        let diffs =
            &self.values.slice(ndarray::s![1..]) - &self.values.slice(ndarray::s![..n - 1]);
        Self::with_policy(self.index.slice(1..n), diffs.to_vec(), self.policy)
            .map(|s| s.with_kind(self.kind))
    }

    /// Sub-series over the positions in `range`.
    ///
    /// # Errors
    /// [`RiskError::Parameter`] for an empty or out-of-bounds range, and
    /// [`RiskError::Validation`] if the slice holds only missing values.
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        if range.start >= range.end || range.end > self.len() {
            return Err(RiskError::parameter(
                "range",
                format!("{range:?} is empty or exceeds series length {}", self.len()),
            ));
        }
        let values = self.values.slice(ndarray::s![range.clone()]).to_vec();
        Self::with_policy(self.index.slice(range), values, self.policy)
            .map(|s| s.with_kind(self.kind))
    }

    /// The last `n` entries.
    pub fn tail(&self, n: usize) -> Result<Self> {
        let len = self.len();
        if n == 0 || n > len {
            return Err(RiskError::parameter(
                "n",
                format!("{n} must be between 1 and the series length {len}"),
            ));
        }
        self.slice(len - n..len)
    }

    /// Compound return over the whole period.
    ///
    /// `prod(1 + r) - 1` for simple returns, `sum(r)` for log returns.
    /// Missing observations contribute nothing.
    pub fn total_return(&self) -> f64 {
        let observed = self.observed();
        match self.kind {
            ReturnKind::Simple => observed.iter().map(|r| 1.0 + r).product::<f64>() - 1.0,
            ReturnKind::Log => observed.iter().sum(),
        }
    }

    fn derive(&self, index: SeriesIndex, values: Array1<f64>, kind: ReturnKind) -> Self {
        Self {
            index,
            values,
            kind,
            policy: self.policy,
        }
    }
}
