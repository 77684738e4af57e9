//! Time index shared by return series and estimates.

use crate::error::{Result, RiskError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Ordered index of a series: calendar dates or plain period numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesIndex {
    /// Calendar dates (e.g. trading days)
    Dates(Vec<NaiveDate>),
    /// Integer period numbers
    Periods(Vec<u64>),
}

impl SeriesIndex {
    /// Period index `0..n`.
    pub fn periods(n: usize) -> Self {
        Self::Periods((0..n as u64).collect())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Dates(d) => d.len(),
            Self::Periods(p) => p.len(),
        }
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of the first entry that does not strictly follow its
    /// predecessor, if any.
    pub fn first_unordered(&self) -> Option<usize> {
        match self {
            Self::Dates(d) => d.windows(2).position(|w| w[1] <= w[0]).map(|i| i + 1),
            Self::Periods(p) => p.windows(2).position(|w| w[1] <= w[0]).map(|i| i + 1),
        }
    }

    /// Whether every entry strictly follows the previous one.
    pub fn is_strictly_increasing(&self) -> bool {
        self.first_unordered().is_none()
    }

    /// Sub-index over `range`.
    ///
    /// # Panics
    /// If `range` is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        match self {
            Self::Dates(d) => Self::Dates(d[range].to_vec()),
            Self::Periods(p) => Self::Periods(p[range].to_vec()),
        }
    }

    /// Fail with [`RiskError::Alignment`] unless `other` is the same index.
    ///
    /// `what` names the series being aligned, for the error message.
    pub fn ensure_matches(&self, other: &Self, what: &str) -> Result<()> {
        if self.len() != other.len() {
            return Err(RiskError::Alignment(format!(
                "{what} has {} entries, expected {}",
                other.len(),
                self.len()
            )));
        }
        let mismatch = match (self, other) {
            (Self::Dates(a), Self::Dates(b)) => a.iter().zip(b).position(|(x, y)| x != y),
            (Self::Periods(a), Self::Periods(b)) => a.iter().zip(b).position(|(x, y)| x != y),
            _ => {
                return Err(RiskError::Alignment(format!(
                    "{what} mixes a date index with a period index"
                )));
            }
        };
        match mismatch {
            Some(i) => Err(RiskError::Alignment(format!(
                "{what} differs at position {i}: {} vs {}",
                other.label(i).unwrap_or_default(),
                self.label(i).unwrap_or_default()
            ))),
            None => Ok(()),
        }
    }

    /// Human-readable label of entry `i`.
    pub fn label(&self, i: usize) -> Option<String> {
        match self {
            Self::Dates(d) => d.get(i).map(|date| date.format("%Y-%m-%d").to_string()),
            Self::Periods(p) => p.get(i).map(|period| period.to_string()),
        }
    }
}
