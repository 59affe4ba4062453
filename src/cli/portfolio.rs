use super::ui;
use crate::core::{PortfolioRequest, PortfolioResult, PriceHistoryProvider, RangeSpec, aggregate};
use anyhow::{Result, anyhow, bail};
use comfy_table::{Attribute, Cell};
use tracing::info;

/// Trims and upper-cases comma separated symbols.
pub fn parse_symbols(raw: &[String]) -> Result<Vec<String>> {
    raw.iter()
        .flat_map(|entry| entry.split(','))
        .map(|s| {
            let symbol = s.trim().to_uppercase();
            if symbol.is_empty() {
                bail!("Symbol list contains an empty entry");
            }
            Ok(symbol)
        })
        .collect()
}

/// Parses comma separated weights such as `0.5, 0.25,0.25`.
pub fn parse_weights(raw: &[String]) -> Result<Vec<f64>> {
    raw.iter()
        .flat_map(|entry| entry.split(','))
        .map(|s| {
            let text = s.trim();
            let weight: f64 = text
                .parse()
                .map_err(|_| anyhow!("Invalid weight: '{text}'"))?;
            if !weight.is_finite() {
                bail!("Invalid weight: '{text}'");
            }
            Ok(weight)
        })
        .collect()
}

pub async fn run(
    provider: &(dyn PriceHistoryProvider + Send + Sync),
    symbols: Vec<String>,
    weights: Vec<f64>,
    range: RangeSpec,
) -> Result<()> {
    info!("Analyzing portfolio of {} symbols over {range}", symbols.len());

    let request = PortfolioRequest::new(symbols, weights, range);
    let pb = ui::new_progress_bar(request.symbols.len() as u64);
    let result = aggregate(provider, &request, &|| pb.inc(1)).await;
    pb.finish_and_clear();

    println!("{}", render_portfolio(&result?));
    Ok(())
}

pub fn render_portfolio(result: &PortfolioResult) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Weight"),
        ui::header_cell("Return"),
        ui::header_cell("Contribution"),
    ]);

    for holding in &result.holdings {
        let change = match holding.contributing_return {
            Some(r) => ui::change_cell(r * 100.0),
            None => ui::na_cell(false),
        };
        table.add_row(vec![
            Cell::new(&holding.symbol),
            ui::number_cell(format!("{:.2}", holding.weight)),
            change,
            ui::change_cell(holding.contribution()),
        ]);
    }

    table.add_row(vec![
        Cell::new("Portfolio").add_attribute(Attribute::Bold),
        ui::number_cell(format!(
            "{:.2}",
            result.holdings.iter().map(|h| h.weight).sum::<f64>()
        )),
        Cell::new(""),
        ui::change_cell(result.portfolio_return),
    ]);

    format!(
        "{}\n\n{table}",
        ui::style_text(&result.message, ui::StyleType::TotalValue)
    )
}
