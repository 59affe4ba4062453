pub mod cli;
pub mod core;
pub mod providers;

use crate::core::RangeSpec;
use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::debug;

pub enum AppCommand {
    /// Return series of a single symbol
    Series {
        symbol: String,
        range: Option<String>,
        rows: Option<usize>,
    },
    /// Weighted portfolio return
    Portfolio {
        symbols: Vec<String>,
        weights: Vec<String>,
        range: Option<String>,
    },
    /// Compounded profit projection
    Profit {
        capital: Decimal,
        rate: Decimal,
        years: i64,
    },
}

fn resolve_range(range: Option<&str>, config: &AppConfig) -> Result<RangeSpec> {
    match range {
        Some(token) => token
            .parse()
            .with_context(|| format!("Invalid range: '{token}'")),
        None => config.defaults.range_spec(),
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = providers::YahooFinanceProvider::new(config.providers.yahoo_base_url());

    match command {
        AppCommand::Series {
            symbol,
            range,
            rows,
        } => {
            let symbol = symbol.trim().to_uppercase();
            if symbol.is_empty() {
                anyhow::bail!("Please provide a symbol");
            }
            let range = resolve_range(range.as_deref(), &config)?;
            let rows = rows.unwrap_or(config.defaults.rows);
            cli::series::run(&provider, &symbol, &range, rows).await
        }
        AppCommand::Portfolio {
            symbols,
            weights,
            range,
        } => {
            let symbols = cli::portfolio::parse_symbols(&symbols)?;
            let weights = cli::portfolio::parse_weights(&weights)?;
            let range = resolve_range(range.as_deref(), &config)?;
            cli::portfolio::run(&provider, symbols, weights, range).await
        }
        AppCommand::Profit {
            capital,
            rate,
            years,
        } => cli::profit::run(capital, rate, years),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_range_overrides_config_default() {
        let config = AppConfig::default();

        assert_eq!(
            resolve_range(Some("YTD"), &config).unwrap(),
            RangeSpec::YearToDate
        );
        assert_eq!(resolve_range(None, &config).unwrap(), RangeSpec::Max);
        assert!(resolve_range(Some("1 y"), &config).is_err());
    }
}
