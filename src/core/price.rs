//! Price history abstractions and core types

use crate::core::error::ReturnsError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Selects how much history is fetched and how it is shaped into returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeSpec {
    /// Full history, resampled to one observation per calendar year.
    #[default]
    Max,
    /// Daily observations of the current year.
    YearToDate,
    /// Provider shorthand such as `1y` or `6mo`, passed through unresampled.
    Window(String),
}

impl RangeSpec {
    /// Token understood by the price provider.
    pub fn as_token(&self) -> &str {
        match self {
            RangeSpec::Max => "max",
            RangeSpec::YearToDate => "ytd",
            RangeSpec::Window(token) => token,
        }
    }

    pub fn resamples_yearly(&self) -> bool {
        matches!(self, RangeSpec::Max)
    }
}

impl Display for RangeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

impl FromStr for RangeSpec {
    type Err = ReturnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        if token.is_empty() {
            return Err(ReturnsError::invalid_range(s, "range must not be empty"));
        }
        if !token.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ReturnsError::invalid_range(
                s,
                "range must only contain letters and digits",
            ));
        }

        Ok(match token.as_str() {
            "max" => RangeSpec::Max,
            "ytd" => RangeSpec::YearToDate,
            _ => RangeSpec::Window(token),
        })
    }
}

/// A single dated closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Returns the bars for `symbol` over `range`, ordered by date.
    async fn fetch_history(
        &self,
        symbol: &str,
        range: &RangeSpec,
    ) -> Result<Vec<PriceBar>, ReturnsError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tokens_case_insensitively() {
        assert_eq!("max".parse::<RangeSpec>().unwrap(), RangeSpec::Max);
        assert_eq!(" YTD ".parse::<RangeSpec>().unwrap(), RangeSpec::YearToDate);
        assert_eq!(
            "5Y".parse::<RangeSpec>().unwrap(),
            RangeSpec::Window("5y".to_string())
        );
    }

    #[test]
    fn rejects_empty_and_malformed_tokens() {
        assert!(matches!(
            "".parse::<RangeSpec>(),
            Err(ReturnsError::InvalidRange { .. })
        ));
        assert!(matches!(
            "1y&interval=1m".parse::<RangeSpec>(),
            Err(ReturnsError::InvalidRange { .. })
        ));
    }

    #[test]
    fn token_round_trips_through_display() {
        let range = RangeSpec::Window("6mo".to_string());
        assert_eq!(range.to_string(), "6mo");
        assert_eq!(RangeSpec::YearToDate.to_string(), "ytd");
        assert!(RangeSpec::Max.resamples_yearly());
        assert!(!range.resamples_yearly());
    }
}
