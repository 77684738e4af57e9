//! Price-to-return transforms.
//!
//! Both transforms drop the first index entry, which has no prior price.

use crate::error::{Result, RiskError};
use crate::index::SeriesIndex;
use crate::series::{ReturnKind, ReturnSeries};

/// Simple returns `P_t / P_{t-1} - 1` from a price series.
///
/// # Errors
/// [`RiskError::Validation`] if fewer than two prices are given, the index
/// length differs from the number of prices, or a price is not finite and
/// strictly positive.
pub fn simple_returns(index: &SeriesIndex, prices: &[f64]) -> Result<ReturnSeries> {
    validate_prices(index, prices)?;
    let returns = prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    ReturnSeries::new(index.slice(1..prices.len()), returns)
        .map(|s| s.with_kind(ReturnKind::Simple))
}

/// Continuously compounded returns `ln(P_t / P_{t-1})` from a price series.
///
/// # Errors
/// Same conditions as [`simple_returns`].
pub fn log_returns(index: &SeriesIndex, prices: &[f64]) -> Result<ReturnSeries> {
    validate_prices(index, prices)?;
    let returns = prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    ReturnSeries::new(index.slice(1..prices.len()), returns).map(|s| s.with_kind(ReturnKind::Log))
}

fn validate_prices(index: &SeriesIndex, prices: &[f64]) -> Result<()> {
    if prices.len() < 2 {
        return Err(RiskError::validation(format!(
            "need at least 2 prices, got {}",
            prices.len()
        )));
    }
    if index.len() != prices.len() {
        return Err(RiskError::validation(format!(
            "index has {} entries but there are {} prices",
            index.len(),
            prices.len()
        )));
    }
    if let Some((i, p)) = prices
        .iter()
        .enumerate()
        .find(|&(_, &p)| !p.is_finite() || p <= 0.0)
    {
        return Err(RiskError::validation(format!(
            "price {p} at position {i} must be finite and positive"
        )));
    }
    Ok(())
}
