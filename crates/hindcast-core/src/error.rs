//! Error types shared by all estimators.

use thiserror::Error;

/// Result type for estimation operations.
pub type Result<T> = std::result::Result<T, RiskError>;

/// Errors that can occur while building series or running estimators.
///
/// Errors are raised where they are detected and returned unchanged; invalid
/// parameters are never clamped and misaligned series are never truncated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// Malformed input series (empty, non-finite values, unordered index)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Out-of-range or inconsistent model parameter
    #[error("Invalid parameter `{name}`: {reason}")]
    Parameter {
        /// Name of the offending parameter
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Index mismatch between two series
    #[error("Alignment error: {0}")]
    Alignment(String),

    /// Iterative fit did not converge within its budget
    #[error("Failed to converge after {iterations} iterations")]
    Convergence {
        /// Number of iterations performed
        iterations: usize,
    },
}

impl RiskError {
    /// Shorthand for a [`RiskError::Parameter`].
    pub fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Parameter {
            name,
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`RiskError::Validation`].
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }
}

/// Check that a confidence level lies strictly inside (0, 1).
pub fn validate_confidence(confidence: f64) -> Result<()> {
    if confidence.is_finite() && confidence > 0.0 && confidence < 1.0 {
        Ok(())
    } else {
        Err(RiskError::parameter(
            "confidence",
            format!("{confidence} (must be in (0, 1))"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_error_message() {
        let err = RiskError::parameter("window", "5 exceeds series length 3");
        assert_eq!(
            err.to_string(),
            "Invalid parameter `window`: 5 exceeds series length 3"
        );
    }

    #[test]
    fn test_confidence_bounds() {
        assert!(validate_confidence(0.99).is_ok());
        assert!(validate_confidence(0.0).is_err());
        assert!(validate_confidence(1.0).is_err());
        assert!(validate_confidence(f64::NAN).is_err());
    }
}
