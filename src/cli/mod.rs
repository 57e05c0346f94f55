//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analysis/forecast code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

use crate::analysis::GroupKey;
use crate::domain::{ForecastScope, HolidayMode, WeekAnchor};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sales", version, about = "Sales dashboard: KPIs, trends, and a linear forecast")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// KPIs, trend, store totals, forecast, and a plot in one report.
    Summary(DashArgs),
    /// Weekly sales summed per date for the filtered view.
    Trend(DashArgs),
    /// Weekly sales summed per store for the filtered view.
    Stores(DashArgs),
    /// Linear-trend forecast of weekly sales.
    Forecast(DashArgs),
    /// Sum any numeric column per date, store, or holiday flag.
    Group(GroupArgs),
    /// First rows, numeric summary, and missing-value counts.
    Describe(DescribeArgs),
    /// Launch the interactive dashboard.
    ///
    /// This uses the same underlying pipeline as `sales summary`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(DashArgs),
}

/// Common options for the dashboard commands.
#[derive(Debug, Parser, Clone)]
pub struct DashArgs {
    /// Sales CSV (defaults to `SALES_CSV`, then `data/sales.csv`).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// First date to include (YYYY-MM-DD). Defaults to the earliest date.
    #[arg(long, value_parser = parse_cli_date)]
    pub start: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD). Defaults to the latest date.
    #[arg(long, value_parser = parse_cli_date)]
    pub end: Option<NaiveDate>,

    /// Store to include (repeatable). Defaults to every store.
    #[arg(short = 's', long = "store", value_name = "ID")]
    pub stores: Vec<String>,

    /// Holiday filter.
    #[arg(long, value_enum, default_value_t = HolidayMode::All)]
    pub holiday: HolidayMode,

    /// Number of future weeks to forecast.
    #[arg(long, default_value_t = 8)]
    pub horizon: usize,

    /// Fit the forecast on the full history or on the filtered view.
    #[arg(long, value_enum, default_value_t = ForecastScope::Full)]
    pub forecast_scope: ForecastScope,

    /// Weekday that forecast dates fall on.
    #[arg(long, value_enum, default_value_t = WeekAnchor::Sun)]
    pub week_anchor: WeekAnchor,

    /// Show top-N stores in the summary.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the trend series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_trend: Option<PathBuf>,

    /// Export per-store totals to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_stores: Option<PathBuf>,

    /// Export forecast points to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_forecast: Option<PathBuf>,

    /// Export the full dashboard snapshot to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for `group`.
#[derive(Debug, Parser, Clone)]
pub struct GroupArgs {
    #[command(flatten)]
    pub dash: DashArgs,

    /// Column to group by.
    #[arg(long, value_enum, default_value_t = GroupKey::Date)]
    pub by: GroupKey,

    /// Column to sum (`Weekly_Sales` or any numeric pass-through column).
    #[arg(long, default_value = "Weekly_Sales")]
    pub measure: String,
}

/// Options for `describe`.
#[derive(Debug, Parser, Clone)]
pub struct DescribeArgs {
    /// Sales CSV (defaults to `SALES_CSV`, then `data/sales.csv`).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Number of leading rows to show.
    #[arg(long, default_value_t = 5)]
    pub head: usize,
}

fn parse_cli_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
