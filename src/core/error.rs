//! Error kinds raised by the return calculations

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReturnsError {
    #[error("Number of symbols ({symbols}) does not match number of weights ({weights})")]
    DimensionMismatch { symbols: usize, weights: usize },

    #[error("No usable price data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("Projection needs at least one period, got {0}")]
    InvalidPeriod(i64),

    #[error("Invalid range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },

    #[error("Capital must be positive, got {0}")]
    InvalidCapital(Decimal),

    #[error("Growth factor overflowed after {0} periods")]
    ProjectionOverflow(i64),
}

impl ReturnsError {
    pub(crate) fn unavailable(symbol: &str, reason: impl Into<String>) -> Self {
        ReturnsError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_range(range: &str, reason: impl Into<String>) -> Self {
        ReturnsError::InvalidRange {
            range: range.to_string(),
            reason: reason.into(),
        }
    }
}
