//! Likelihood-ratio coverage tests on a violation sequence
//!
//! References:
//! - Kupiec (1995), "Techniques for Verifying the Accuracy of Risk
//!   Measurement Models".
//! - Christoffersen (1998), "Evaluating Interval Forecasts".

use hindcast_core::{Result, RiskError, validate_confidence};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Kupiec proportion-of-failures test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KupiecTest {
    /// Number of counted positions
    pub observations: usize,
    /// Number of violations
    pub violations: usize,
    /// `observations * (1 - c)`
    pub expected_violations: f64,
    /// `violations / observations`
    pub violation_rate: f64,
    /// Likelihood-ratio statistic, χ²(1) under the null
    pub lr_statistic: f64,
    /// Probability of a statistic at least this large under the null
    pub p_value: f64,
}

/// Christoffersen independence and conditional-coverage tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChristoffersenTest {
    /// `0 -> 0` transitions
    pub n00: usize,
    /// `0 -> 1` transitions
    pub n01: usize,
    /// `1 -> 0` transitions
    pub n10: usize,
    /// `1 -> 1` transitions
    pub n11: usize,
    /// Independence statistic, χ²(1)
    pub lr_independence: f64,
    /// POF + independence statistic, χ²(2)
    pub lr_conditional_coverage: f64,
    /// p-value of the independence test
    pub p_value_independence: f64,
    /// p-value of the conditional-coverage test
    pub p_value_conditional_coverage: f64,
}

/// Violation flags: realized loss `-r` strictly greater than the VaR.
///
/// # Errors
/// [`RiskError::Alignment`] if the slices differ in length,
/// [`RiskError::Validation`] if either holds a non-finite value.
pub fn violation_indicators(realized: &[f64], var: &[f64]) -> Result<Vec<bool>> {
    if realized.len() != var.len() {
        return Err(RiskError::Alignment(format!(
            "{} VaR values for {} realized returns",
            var.len(),
            realized.len()
        )));
    }
    if let Some(i) = realized
        .iter()
        .zip(var)
        .position(|(r, v)| !r.is_finite() || !v.is_finite())
    {
        return Err(RiskError::validation(format!(
            "non-finite value at position {i}"
        )));
    }
    Ok(realized.iter().zip(var).map(|(r, v)| -r > *v).collect())
}

/// Kupiec POF likelihood-ratio test.
///
/// LR = −2 ln[(1−p)^(n−x) p^x / ((1−π)^(n−x) π^x)] with p = 1 − c and
/// π = x / n.
///
/// # Errors
/// [`RiskError::Parameter`] for an invalid confidence or more violations
/// than observations, [`RiskError::Validation`] for zero observations.
pub fn kupiec_test(observations: usize, violations: usize, confidence: f64) -> Result<KupiecTest> {
    validate_confidence(confidence)?;
    if observations == 0 {
        return Err(RiskError::validation("no observations to test"));
    }
    if violations > observations {
        return Err(RiskError::parameter(
            "violations",
            format!("{violations} exceeds {observations} observations"),
        ));
    }

    let n = observations as f64;
    let x = violations as f64;
    let p = 1.0 - confidence;
    let pi = x / n;

    let ln_l0 = xlny(n - x, 1.0 - p) + xlny(x, p);
    let ln_l1 = xlny(n - x, 1.0 - pi) + xlny(x, pi);
    let lr = (2.0 * (ln_l1 - ln_l0)).max(0.0);

    Ok(KupiecTest {
        observations,
        violations,
        expected_violations: n * p,
        violation_rate: pi,
        lr_statistic: lr,
        p_value: chi_squared_sf(lr, 1.0)?,
    })
}

/// Christoffersen tests on a violation sequence.
///
/// # Errors
/// [`RiskError::Validation`] for fewer than two indicators.
pub fn christoffersen_test(indicators: &[bool], confidence: f64) -> Result<ChristoffersenTest> {
    validate_confidence(confidence)?;
    if indicators.len() < 2 {
        return Err(RiskError::validation(
            "independence test needs at least two observations",
        ));
    }

    let (mut n00, mut n01, mut n10, mut n11) = (0usize, 0usize, 0usize, 0usize);
    for pair in indicators.windows(2) {
        match (pair[0], pair[1]) {
            (false, false) => n00 += 1,
            (false, true) => n01 += 1,
            (true, false) => n10 += 1,
            (true, true) => n11 += 1,
        }
    }

    let [c00, c01, c10, c11] = [n00, n01, n10, n11].map(|c| c as f64);
    let pi01 = ratio(c01, c00 + c01);
    let pi11 = ratio(c11, c10 + c11);
    let pi = ratio(c01 + c11, c00 + c01 + c10 + c11);

    let ln_l0 = xlny(c00 + c10, 1.0 - pi) + xlny(c01 + c11, pi);
    let ln_l1 =
        xlny(c00, 1.0 - pi01) + xlny(c01, pi01) + xlny(c10, 1.0 - pi11) + xlny(c11, pi11);
    let lr_independence = (2.0 * (ln_l1 - ln_l0)).max(0.0);

    let violations = indicators.iter().filter(|&&v| v).count();
    let kupiec = kupiec_test(indicators.len(), violations, confidence)?;
    let lr_conditional_coverage = kupiec.lr_statistic + lr_independence;

    Ok(ChristoffersenTest {
        n00,
        n01,
        n10,
        n11,
        lr_independence,
        lr_conditional_coverage,
        p_value_independence: chi_squared_sf(lr_independence, 1.0)?,
        p_value_conditional_coverage: chi_squared_sf(lr_conditional_coverage, 2.0)?,
    })
}

/// `x * ln(y)` with `0 * ln(0) = 0`.
fn xlny(x: f64, y: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x * y.ln() }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

fn chi_squared_sf(statistic: f64, dof: f64) -> Result<f64> {
    let chi = ChiSquared::new(dof).map_err(|e| RiskError::parameter("dof", e.to_string()))?;
    Ok(1.0 - chi.cdf(statistic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_expected_rate_accepted() {
        let test = kupiec_test(100, 5, 0.95).unwrap();
        assert_relative_eq!(test.expected_violations, 5.0, epsilon = 1e-9);
        assert!(test.lr_statistic < 1e-9);
        assert!(test.p_value > 0.999);
    }

    #[test]
    fn test_excess_violations_rejected() {
        let test = kupiec_test(100, 30, 0.95).unwrap();
        // 2 * [70 ln(0.7/0.95) + 30 ln(0.3/0.05)]
        let expected = 2.0 * (70.0 * (0.7_f64 / 0.95).ln() + 30.0 * 6.0_f64.ln());
        assert_relative_eq!(test.lr_statistic, expected, epsilon = 1e-9);
        assert!(test.p_value < 1e-10);
    }

    #[test]
    fn test_zero_violations_is_finite() {
        let test = kupiec_test(250, 0, 0.99).unwrap();
        // LR = -2 * 250 * ln(0.99)
        assert_relative_eq!(test.lr_statistic, -500.0 * 0.99_f64.ln(), epsilon = 1e-9);
        assert!(test.p_value > 0.0 && test.p_value < 1.0);
    }

    #[test]
    fn test_all_violations_is_finite() {
        let test = kupiec_test(20, 20, 0.95).unwrap();
        assert!(test.lr_statistic.is_finite());
        assert!(test.p_value < 1e-10);
    }

    #[test]
    fn test_invalid_counts() {
        assert!(matches!(
            kupiec_test(0, 0, 0.99),
            Err(RiskError::Validation(_))
        ));
        assert!(matches!(
            kupiec_test(10, 11, 0.99),
            Err(RiskError::Parameter { name: "violations", .. })
        ));
        assert!(matches!(
            kupiec_test(10, 1, 1.0),
            Err(RiskError::Parameter { name: "confidence", .. })
        ));
    }

    #[test]
    fn test_indicators_strict_inequality() {
        let flags = violation_indicators(&[-0.02, -0.03, 0.01], &[0.02, 0.02, 0.02]).unwrap();
        assert_eq!(flags, vec![false, true, false]);
        assert!(matches!(
            violation_indicators(&[0.0; 3], &[0.0; 2]),
            Err(RiskError::Alignment(_))
        ));
    }

    #[test]
    fn test_clustered_violations_fail_independence() {
        // Same count as a spread-out sequence, but all in one block
        let mut clustered = vec![false; 200];
        clustered[100..110].fill(true);
        let mut spread = vec![false; 200];
        for i in 0..10 {
            spread[i * 20 + 7] = true;
        }

        let clustered = christoffersen_test(&clustered, 0.95).unwrap();
        let spread = christoffersen_test(&spread, 0.95).unwrap();

        assert_eq!(clustered.n11, 9);
        assert_eq!(spread.n11, 0);
        assert!(clustered.p_value_independence < 0.001);
        assert!(spread.p_value_independence > 0.05);
        assert!(clustered.lr_conditional_coverage >= clustered.lr_independence);
    }

    #[test]
    fn test_no_violations_independence() {
        let test = christoffersen_test(&[false; 50], 0.99).unwrap();
        assert_eq!(test.n00, 49);
        assert_relative_eq!(test.lr_independence, 0.0);
        assert_relative_eq!(test.p_value_independence, 1.0);
    }
}
