//! Basel traffic-light zones.

use hindcast_core::{Result, RiskError, validate_confidence};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Binomial, DiscreteCDF};
use std::fmt;

const YELLOW_THRESHOLD: f64 = 0.95;
const RED_THRESHOLD: f64 = 0.9999;

/// Zone of a violation count under Binomial(n, 1 − c).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLight {
    /// Cumulative probability below 95%
    Green,
    /// Cumulative probability below 99.99%
    Yellow,
    /// Everything above
    Red,
}

impl TrafficLight {
    /// Zone of `violations` out of `observations` at `confidence`.
    ///
    /// # Errors
    /// [`RiskError::Parameter`] for an invalid confidence or more
    /// violations than observations.
    pub fn classify(observations: usize, violations: usize, confidence: f64) -> Result<Self> {
        validate_confidence(confidence)?;
        if violations > observations {
            return Err(RiskError::parameter(
                "violations",
                format!("{violations} exceeds {observations} observations"),
            ));
        }
        let binomial = Binomial::new(1.0 - confidence, observations as u64)
            .map_err(|e| RiskError::parameter("observations", e.to_string()))?;
        let cumulative = binomial.cdf(violations as u64);

        Ok(if cumulative < YELLOW_THRESHOLD {
            Self::Green
        } else if cumulative < RED_THRESHOLD {
            Self::Yellow
        } else {
            Self::Red
        })
    }
}

impl fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green => write!(f, "green"),
            Self::Yellow => write!(f, "yellow"),
            Self::Red => write!(f, "red"),
        }
    }
}
