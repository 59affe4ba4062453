//! Weighted aggregation of per-symbol returns into a portfolio return.
use crate::core::error::ReturnsError;
use crate::core::price::{PriceHistoryProvider, RangeSpec};
use crate::core::series::{ReturnSeries, build_series};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PortfolioRequest {
    pub symbols: Vec<String>,
    pub weights: Vec<f64>,
    pub range: RangeSpec,
}

impl PortfolioRequest {
    pub fn new(symbols: Vec<String>, weights: Vec<f64>, range: RangeSpec) -> Self {
        Self {
            symbols,
            weights,
            range,
        }
    }

    fn validate(&self) -> Result<(), ReturnsError> {
        if self.symbols.len() != self.weights.len() {
            return Err(ReturnsError::DimensionMismatch {
                symbols: self.symbols.len(),
                weights: self.weights.len(),
            });
        }
        Ok(())
    }
}

/// How a symbol's period returns collapse into one figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReturnAggregation {
    /// Average periodic return.
    Mean,
    /// Cumulative return, approximated as the sum of daily returns.
    Sum,
}

impl ReturnAggregation {
    pub fn for_range(range: &RangeSpec) -> Self {
        match range {
            RangeSpec::YearToDate => ReturnAggregation::Sum,
            RangeSpec::Max | RangeSpec::Window(_) => ReturnAggregation::Mean,
        }
    }

    pub fn apply(&self, series: &ReturnSeries) -> Option<f64> {
        match self {
            ReturnAggregation::Mean => series.mean_return(),
            ReturnAggregation::Sum => series.total_return(),
        }
    }
}

/// The aggregated return of one portfolio constituent.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolReturn {
    pub symbol: String,
    pub weight: f64,
    /// Fractional return, `None` when the series had no defined returns.
    pub contributing_return: Option<f64>,
    pub observations: usize,
}

impl SymbolReturn {
    /// Percentage points this holding adds to the portfolio return.
    pub fn contribution(&self) -> f64 {
        self.weight * self.contributing_return.unwrap_or(0.0) * 100.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioResult {
    pub range: RangeSpec,
    pub aggregation: ReturnAggregation,
    /// One entry per requested symbol, in request order.
    pub holdings: Vec<SymbolReturn>,
    /// Weighted return in percent.
    pub portfolio_return: f64,
    pub message: String,
}

/// Narrative sentence describing the portfolio return for `range`.
pub fn narrative(range: &RangeSpec, portfolio_return: f64) -> String {
    match range {
        RangeSpec::Max => format!(
            "The average annual return of your portfolio is {portfolio_return:.2}%"
        ),
        RangeSpec::YearToDate => {
            format!("Your portfolio's return this year is {portfolio_return:.2}%")
        }
        RangeSpec::Window(since) => format!(
            "The average annual return of your portfolio since {since} is {portfolio_return:.2}%"
        ),
    }
}

/// Computes the weighted portfolio return for `request`.
///
/// Weights are applied as given; they are not normalized to sum to one.
/// Series are fetched concurrently and the first failing symbol aborts the
/// whole aggregation. `on_fetched` runs once per completed fetch.
pub async fn aggregate(
    provider: &(dyn PriceHistoryProvider + Send + Sync),
    request: &PortfolioRequest,
    on_fetched: &(dyn Fn() + Send + Sync),
) -> Result<PortfolioResult, ReturnsError> {
    request.validate()?;

    let fetches = request.symbols.iter().map(|symbol| async move {
        let series = build_series(provider, symbol, &request.range).await;
        on_fetched();
        series
    });
    let all_series = try_join_all(fetches).await?;

    let aggregation = ReturnAggregation::for_range(&request.range);
    let holdings: Vec<SymbolReturn> = all_series
        .iter()
        .zip(&request.weights)
        .map(|(series, weight)| {
            let contributing_return = aggregation.apply(series);
            debug!(
                "{}: {:?} return {:?} over {} observations",
                series.symbol,
                aggregation,
                contributing_return,
                series.len()
            );
            SymbolReturn {
                symbol: series.symbol.clone(),
                weight: *weight,
                contributing_return,
                observations: series.len(),
            }
        })
        .collect();

    let portfolio_return: f64 = holdings.iter().map(SymbolReturn::contribution).sum();
    debug!("Portfolio return over {}: {portfolio_return}", request.range);

    Ok(PortfolioResult {
        range: request.range.clone(),
        aggregation,
        holdings,
        portfolio_return,
        message: narrative(&request.range, portfolio_return),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::price::PriceBar;
    use crate::core::price::stub::{StubProvider, daily_bars, date};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(symbols: &[&str], weights: &[f64], range: RangeSpec) -> PortfolioRequest {
        PortfolioRequest::new(
            symbols.iter().map(|s| s.to_string()).collect(),
            weights.to_vec(),
            range,
        )
    }

    #[tokio::test]
    async fn mismatched_request_fails_before_fetching() {
        let provider = StubProvider::new()
            .with_history("AAPL", daily_bars(date(2024, 1, 2), &[1.0, 2.0]));
        let req = request(&["AAPL", "MSFT"], &[1.0], RangeSpec::Max);

        let result = aggregate(&provider, &req, &|| ()).await;

        assert_eq!(
            result.unwrap_err(),
            ReturnsError::DimensionMismatch {
                symbols: 2,
                weights: 1
            }
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn ytd_sums_daily_returns() {
        // A: +1% then -2%, B: +3%
        let provider = StubProvider::new()
            .with_history("A", daily_bars(date(2024, 1, 2), &[100.0, 101.0, 98.98]))
            .with_history("B", daily_bars(date(2024, 1, 2), &[100.0, 103.0]));
        let req = request(&["A", "B"], &[0.5, 0.5], RangeSpec::YearToDate);

        let result = aggregate(&provider, &req, &|| ()).await.unwrap();

        assert_eq!(result.aggregation, ReturnAggregation::Sum);
        assert!((result.holdings[0].contributing_return.unwrap() + 0.01).abs() < 1e-9);
        assert!((result.holdings[1].contributing_return.unwrap() - 0.03).abs() < 1e-9);
        assert!((result.portfolio_return - 1.0).abs() < 1e-9);
        assert_eq!(result.message, "Your portfolio's return this year is 1.00%");
    }

    #[tokio::test]
    async fn max_range_averages_yearly_returns() {
        let bars = vec![
            PriceBar::new(date(2021, 12, 31), 100.0),
            PriceBar::new(date(2022, 12, 30), 120.0),
            PriceBar::new(date(2023, 6, 1), 130.0),
            PriceBar::new(date(2023, 12, 29), 108.0),
        ];
        let provider = StubProvider::new().with_history("AAPL", bars);
        let req = request(&["AAPL"], &[1.0], RangeSpec::Max);

        let result = aggregate(&provider, &req, &|| ()).await.unwrap();

        // +20% then -10%
        assert_eq!(result.aggregation, ReturnAggregation::Mean);
        assert_eq!(result.holdings[0].observations, 3);
        assert!((result.portfolio_return - 5.0).abs() < 1e-9);
        assert_eq!(
            result.message,
            "The average annual return of your portfolio is 5.00%"
        );
    }

    #[tokio::test]
    async fn window_range_uses_mean_and_mentions_window() {
        let provider = StubProvider::new()
            .with_history("X", daily_bars(date(2024, 1, 2), &[100.0, 110.0, 99.0]));
        let req = request(&["X"], &[2.0], RangeSpec::Window("5y".to_string()));

        let result = aggregate(&provider, &req, &|| ()).await.unwrap();

        // mean of +10% and -10% is zero regardless of weight
        assert!(result.portfolio_return.abs() < 1e-9);
        assert_eq!(
            result.message,
            "The average annual return of your portfolio since 5y is 0.00%"
        );
    }

    #[tokio::test]
    async fn weights_are_not_normalized() {
        let provider = StubProvider::new()
            .with_history("A", daily_bars(date(2024, 1, 2), &[100.0, 110.0]))
            .with_history("B", daily_bars(date(2024, 1, 2), &[100.0, 110.0]));
        let req = request(&["A", "B"], &[1.0, 1.0], RangeSpec::YearToDate);

        let result = aggregate(&provider, &req, &|| ()).await.unwrap();

        assert!((result.portfolio_return - 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn single_bar_series_contributes_nothing() {
        let provider = StubProvider::new()
            .with_history("ONE", daily_bars(date(2024, 1, 2), &[100.0]))
            .with_history("TWO", daily_bars(date(2024, 1, 2), &[100.0, 105.0]));
        let req = request(&["ONE", "TWO"], &[0.5, 0.5], RangeSpec::Max);

        let result = aggregate(&provider, &req, &|| ()).await.unwrap();

        assert_eq!(result.holdings[0].contributing_return, None);
        assert_eq!(result.holdings[0].contribution(), 0.0);
        assert!(result.portfolio_return.is_finite());
    }

    #[tokio::test]
    async fn duplicate_symbols_are_kept_in_order() {
        let provider = StubProvider::new()
            .with_history("A", daily_bars(date(2024, 1, 2), &[100.0, 110.0]));
        let req = request(&["A", "A"], &[0.25, 0.75], RangeSpec::YearToDate);

        let result = aggregate(&provider, &req, &|| ()).await.unwrap();

        let weights: Vec<_> = result.holdings.iter().map(|h| h.weight).collect();
        assert_eq!(weights, vec![0.25, 0.75]);
        assert!((result.portfolio_return - 10.0).abs() < 1e-9);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn one_failing_symbol_aborts_aggregation() {
        let provider = StubProvider::new()
            .with_history("A", daily_bars(date(2024, 1, 2), &[100.0, 110.0]));
        let req = request(&["A", "MISSING"], &[0.5, 0.5], RangeSpec::Max);

        let result = aggregate(&provider, &req, &|| ()).await;

        assert!(matches!(
            result,
            Err(ReturnsError::DataUnavailable { ref symbol, .. }) if symbol == "MISSING"
        ));
    }

    #[tokio::test]
    async fn reports_each_completed_fetch() {
        let provider = StubProvider::new()
            .with_history("A", daily_bars(date(2024, 1, 2), &[100.0, 110.0]))
            .with_history("B", daily_bars(date(2024, 1, 2), &[100.0, 90.0]));
        let req = request(&["A", "B"], &[0.5, 0.5], RangeSpec::YearToDate);
        let fetched = AtomicUsize::new(0);

        aggregate(&provider, &req, &|| {
            fetched.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

        assert_eq!(fetched.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn narrative_rounds_to_two_decimals() {
        assert_eq!(
            narrative(&RangeSpec::Max, 7.456),
            "The average annual return of your portfolio is 7.46%"
        );
        assert_eq!(
            narrative(&RangeSpec::YearToDate, -1.0),
            "Your portfolio's return this year is -1.00%"
        );
    }
}
