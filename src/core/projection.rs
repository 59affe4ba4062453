//! Compounding of a return rate over a holding period.
use crate::core::error::ReturnsError;
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitProjection {
    pub capital: Decimal,
    pub rate_percent: Decimal,
    pub periods: i64,
    /// `(1 + rate/100)^periods`
    pub growth_factor: Decimal,
    pub ending_value: Decimal,
    /// Gain over the invested capital, principal excluded.
    pub profit: Decimal,
    /// Ending value as a percentage of the capital.
    pub percent_gain: Decimal,
}

/// Projects `capital` growing at `rate_percent` per period for `periods`
/// periods.
pub fn project(
    capital: Decimal,
    rate_percent: Decimal,
    periods: i64,
) -> Result<ProfitProjection, ReturnsError> {
    if periods < 1 {
        return Err(ReturnsError::InvalidPeriod(periods));
    }
    if capital <= Decimal::ZERO {
        return Err(ReturnsError::InvalidCapital(capital));
    }

    let hundred = Decimal::ONE_HUNDRED;
    let growth_factor = (Decimal::ONE + rate_percent / hundred)
        .checked_powi(periods)
        .ok_or(ReturnsError::ProjectionOverflow(periods))?;
    let profit = capital
        .checked_mul(growth_factor - Decimal::ONE)
        .ok_or(ReturnsError::ProjectionOverflow(periods))?;
    let ending_value = capital
        .checked_add(profit)
        .ok_or(ReturnsError::ProjectionOverflow(periods))?;
    let percent_gain = growth_factor
        .checked_mul(hundred)
        .ok_or(ReturnsError::ProjectionOverflow(periods))?;

    debug!("Projected {capital} at {rate_percent}% over {periods} periods: {growth_factor}");

    Ok(ProfitProjection {
        capital,
        rate_percent,
        periods,
        growth_factor,
        ending_value,
        profit,
        percent_gain,
    })
}
