use super::ui;
use crate::core::{ProfitProjection, project};
use anyhow::Result;
use rust_decimal::{Decimal, RoundingStrategy};

pub fn run(capital: Decimal, rate_percent: Decimal, years: i64) -> Result<()> {
    let projection = project(capital, rate_percent, years)?;
    println!("{}", render_projection(&projection));
    Ok(())
}

fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.prec$}", prec = dp as usize)
}

pub fn render_projection(projection: &ProfitProjection) -> String {
    let style = if projection.profit >= Decimal::ZERO {
        ui::StyleType::TotalValue
    } else {
        ui::StyleType::Error
    };

    format!(
        "{} {}\n{} {}\n{} {}",
        ui::style_text("Portfolio value:", ui::StyleType::TotalLabel),
        ui::style_text(&fixed(projection.ending_value, 1), ui::StyleType::TotalValue),
        ui::style_text("Profit:", ui::StyleType::TotalLabel),
        ui::style_text(&fixed(projection.profit, 1), style),
        ui::style_text("Percentage gain:", ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("{}%", fixed(projection.percent_gain, 2)),
            ui::StyleType::TotalValue
        ),
    )
}
