//! Core return calculations and their abstractions

pub mod config;
pub mod error;
pub mod log;
pub mod portfolio;
pub mod price;
pub mod projection;
pub mod series;

// Re-export main types for cleaner imports
pub use error::ReturnsError;
pub use portfolio::{PortfolioRequest, PortfolioResult, SymbolReturn, aggregate};
pub use price::{PriceBar, PriceHistoryProvider, RangeSpec};
pub use projection::{ProfitProjection, project};
pub use series::{ReturnObservation, ReturnSeries, build_series};
