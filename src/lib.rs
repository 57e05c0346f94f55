//! `sales-dash` library crate.
//!
//! The binary (`sales`) is a thin wrapper around this library so that:
//!
//! - the filter/aggregate/KPI/forecast pipeline is testable without spawning processes
//! - other front-ends can call the same pure functions the CLI and TUI use
//! - code stays easy to navigate as the project grows

pub mod analysis;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
