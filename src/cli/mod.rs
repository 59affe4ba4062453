//! Command-line front end: argument shaping and terminal rendering

pub mod portfolio;
pub mod profit;
pub mod series;
pub mod setup;
pub mod ui;
