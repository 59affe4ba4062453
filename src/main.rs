use clap::{CommandFactory, Parser, Subcommand};
use pfret::cli::ui;
use pfret::core::log::init_logging;
use rust_decimal::Decimal;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the latest return observations of a symbol
    Series {
        /// Ticker symbol, e.g. AAPL
        symbol: String,
        /// max, ytd or a provider window such as 1y or 5y
        #[arg(short, long)]
        range: Option<String>,
        /// Number of rows to show
        #[arg(short = 'n', long)]
        rows: Option<usize>,
    },
    /// Calculate the weighted return of a portfolio
    Portfolio {
        /// Comma separated symbols, e.g. AAPL,MSFT,AMZN
        #[arg(short, long, required = true, num_args = 1..)]
        symbols: Vec<String>,
        /// Comma separated weights in symbol order, e.g. 0.33,0.33,0.34
        #[arg(short, long, required = true, num_args = 1.., allow_negative_numbers = true)]
        weights: Vec<String>,
        /// max, ytd or a provider window such as 1y or 5y
        #[arg(short, long)]
        range: Option<String>,
    },
    /// Project profit from compounding a return rate
    Profit {
        /// Invested capital, e.g. 10000
        #[arg(long)]
        capital: Decimal,
        /// Return per year in percent, e.g. 5
        #[arg(long, allow_negative_numbers = true)]
        rate: Decimal,
        /// Holding period in years
        #[arg(long, allow_negative_numbers = true)]
        years: i64,
    },
}

impl From<Commands> for pfret::AppCommand {
    fn from(cmd: Commands) -> pfret::AppCommand {
        match cmd {
            Commands::Series {
                symbol,
                range,
                rows,
            } => pfret::AppCommand::Series {
                symbol,
                range,
                rows,
            },
            Commands::Portfolio {
                symbols,
                weights,
                range,
            } => pfret::AppCommand::Portfolio {
                symbols,
                weights,
                range,
            },
            Commands::Profit {
                capital,
                rate,
                years,
            } => pfret::AppCommand::Profit {
                capital,
                rate,
                years,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => pfret::cli::setup::setup(),
        Some(cmd) => pfret::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => Cli::command().print_help().map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("{}", ui::style_text(&format!("Error: {e:#}"), ui::StyleType::Error));
            ExitCode::FAILURE
        }
    }
}
