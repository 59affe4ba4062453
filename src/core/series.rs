//! Shapes raw price histories into periodic return observations.
use crate::core::error::ReturnsError;
use crate::core::price::{PriceBar, PriceHistoryProvider, RangeSpec};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

/// One closing price together with its change over the previous observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnObservation {
    pub date: NaiveDate,
    pub close: f64,
    /// Fractional change from the previous close. `None` for the first
    /// observation and when the previous close is not positive.
    pub period_return: Option<f64>,
}

/// An ordered, non-empty sequence of return observations for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnSeries {
    pub symbol: String,
    pub range: RangeSpec,
    observations: Vec<ReturnObservation>,
}

impl ReturnSeries {
    /// Builds a series from bars, resampling to year ends when `range` asks
    /// for it.
    pub fn from_bars(
        symbol: &str,
        range: &RangeSpec,
        mut bars: Vec<PriceBar>,
    ) -> Result<Self, ReturnsError> {
        if bars.is_empty() {
            return Err(ReturnsError::unavailable(symbol, "empty price history"));
        }
        if let Some(bar) = bars.iter().find(|b| !b.close.is_finite()) {
            return Err(ReturnsError::unavailable(
                symbol,
                format!("non-numeric close on {}", bar.date),
            ));
        }

        bars.sort_by_key(|b| b.date);
        let bars = if range.resamples_yearly() {
            resample_yearly(&bars)
        } else {
            bars
        };

        let observations = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| ReturnObservation {
                date: bar.date,
                close: bar.close,
                period_return: i
                    .checked_sub(1)
                    .and_then(|prev| pct_change(bars[prev].close, bar.close)),
            })
            .collect();

        Ok(Self {
            symbol: symbol.to_string(),
            range: range.clone(),
            observations,
        })
    }

    pub fn observations(&self) -> &[ReturnObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    // A series always holds at least one observation.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Last `n` observations, oldest first.
    pub fn tail(&self, n: usize) -> &[ReturnObservation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }

    pub fn defined_returns(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().filter_map(|o| o.period_return)
    }

    /// Arithmetic mean of the defined returns.
    pub fn mean_return(&self) -> Option<f64> {
        let (sum, count) = self
            .defined_returns()
            .fold((0.0, 0usize), |(sum, count), r| (sum + r, count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// Sum of the defined returns.
    pub fn total_return(&self) -> Option<f64> {
        let mut returns = self.defined_returns().peekable();
        returns.peek()?;
        Some(returns.sum())
    }
}

fn pct_change(previous: f64, current: f64) -> Option<f64> {
    if previous > 0.0 {
        Some((current - previous) / previous)
    } else {
        None
    }
}

/// Keeps the last bar of each calendar year. Expects bars sorted by date.
fn resample_yearly(bars: &[PriceBar]) -> Vec<PriceBar> {
    let mut yearly: Vec<PriceBar> = Vec::new();
    for bar in bars {
        match yearly.last_mut() {
            Some(last) if last.date.year() == bar.date.year() => *last = *bar,
            _ => yearly.push(*bar),
        }
    }
    yearly
}

/// Fetches the history for `symbol` and turns it into a return series.
pub async fn build_series(
    provider: &(dyn PriceHistoryProvider + Send + Sync),
    symbol: &str,
    range: &RangeSpec,
) -> Result<ReturnSeries, ReturnsError> {
    let bars = provider.fetch_history(symbol, range).await?;
    debug!("Fetched {} bars for {} over {}", bars.len(), symbol, range);

    let series = ReturnSeries::from_bars(symbol, range, bars)?;
    debug!(
        "Built series for {} with {} observations",
        symbol,
        series.len()
    );
    Ok(series)
}
