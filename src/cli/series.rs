use super::ui;
use crate::core::{PriceHistoryProvider, RangeSpec, ReturnSeries, build_series};
use anyhow::Result;
use comfy_table::Cell;
use tracing::info;

/// Fetches a single symbol's return series and prints its latest rows.
pub async fn run(
    provider: &(dyn PriceHistoryProvider + Send + Sync),
    symbol: &str,
    range: &RangeSpec,
    rows: usize,
) -> Result<()> {
    info!("Fetching {symbol} over {range}");

    let series = build_series(provider, symbol, range).await?;
    println!("{}", render_series(&series, rows));
    Ok(())
}

pub fn render_series(series: &ReturnSeries, rows: usize) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Close"),
        ui::header_cell("Return"),
    ]);

    for observation in series.tail(rows) {
        let change = match observation.period_return {
            Some(r) => ui::change_cell(r * 100.0),
            None => ui::na_cell(false),
        };
        table.add_row(vec![
            Cell::new(observation.date.format("%Y-%m-%d").to_string()),
            ui::number_cell(format!("{:.2}", observation.close)),
            change,
        ]);
    }

    format!(
        "Symbol: {} {}\n\n{table}",
        ui::style_text(&series.symbol, ui::StyleType::Title),
        ui::style_text(&format!("({})", series.range), ui::StyleType::Subtle)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PriceBar;
    use chrono::NaiveDate;

    #[test]
    fn renders_only_requested_rows() {
        let bars = (1..=7)
            .map(|d| {
                PriceBar::new(
                    NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                    100.0 + d as f64,
                )
            })
            .collect();
        let series = ReturnSeries::from_bars("AAPL", &RangeSpec::YearToDate, bars).unwrap();

        let output = render_series(&series, 5);

        assert!(output.contains("AAPL"));
        assert!(output.contains("(ytd)"));
        assert!(output.contains("2024-01-07"));
        assert!(output.contains("2024-01-03"));
        assert!(!output.contains("2024-01-02"));
    }

    #[test]
    fn single_observation_shows_missing_return() {
        let bars = vec![PriceBar::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 9.5)];
        let series = ReturnSeries::from_bars("ONE", &RangeSpec::Max, bars).unwrap();

        let output = render_series(&series, 5);

        assert!(output.contains("9.50"));
        assert!(output.contains("N/A"));
    }
}
