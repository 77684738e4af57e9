//! Scalar and time-indexed estimate containers.
//!
//! Estimators that cannot produce a value at some index entry (warm-up
//! windows, windows made only of missing data) store `None` there. An
//! undefined estimate is never reported as zero.

use crate::error::{Result, RiskError};
use crate::index::SeriesIndex;
use serde::{Deserialize, Serialize};

/// Estimate aligned entry-by-entry to a series index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateSeries {
    index: SeriesIndex,
    values: Vec<Option<f64>>,
}

impl EstimateSeries {
    /// Pair an index with one optional value per entry.
    ///
    /// # Errors
    /// [`RiskError::Alignment`] if the lengths differ.
    pub fn new(index: SeriesIndex, values: Vec<Option<f64>>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(RiskError::Alignment(format!(
                "estimate has {} values for an index of {} entries",
                values.len(),
                index.len()
            )));
        }
        Ok(Self { index, values })
    }

    /// Index the estimate is aligned to.
    pub const fn index(&self) -> &SeriesIndex {
        &self.index
    }

    /// Per-entry values.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Number of index entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at position `i`, if defined.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied().flatten()
    }

    /// Most recent defined value.
    pub fn latest(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }

    /// Positions and values of the defined entries.
    pub fn defined(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|x| (i, x)))
    }

    /// Number of defined entries.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Shift values forward by `periods` entries on the same index.
    ///
    /// The value estimated at `t` is reported at `t + periods`, turning an
    /// "as of t" estimate into a forecast for a later period. The first
    /// `periods` entries become undefined.
    #[must_use]
    pub fn lag(&self, periods: usize) -> Self {
        let n = self.values.len();
        let shift = periods.min(n);
        let mut values = vec![None; shift];
        values.extend_from_slice(&self.values[..n - shift]);
        Self {
            index: self.index.clone(),
            values,
        }
    }

    /// Apply `f` to every defined value.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            index: self.index.clone(),
            values: self.values.iter().map(|v| v.map(&f)).collect(),
        }
    }
}

/// Either a single number or a time-indexed sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Estimate {
    /// Single value (fixed window or whole sample)
    Scalar(f64),
    /// Value per index entry
    Series(EstimateSeries),
}

impl Estimate {
    /// The scalar, or the most recent defined value of a series.
    pub fn latest(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Series(s) => s.latest(),
        }
    }

    /// The scalar value, if this is a scalar estimate.
    pub const fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Series(_) => None,
        }
    }

    /// The series, if this is a time-indexed estimate.
    pub const fn as_series(&self) -> Option<&EstimateSeries> {
        match self {
            Self::Scalar(_) => None,
            Self::Series(s) => Some(s),
        }
    }

    /// Apply `f` to the scalar or to every defined series value.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            Self::Scalar(v) => Self::Scalar(f(*v)),
            Self::Series(s) => Self::Series(s.map(f)),
        }
    }
}
