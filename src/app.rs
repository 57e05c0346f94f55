//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the dataset path and loads the sales table
//! - runs the dashboard pipeline
//! - prints reports/plots
//! - writes optional exports

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

use crate::analysis::{GroupKey, Measure};
use crate::cli::{Command, DashArgs, DescribeArgs, GroupArgs};
use crate::domain::{DashboardConfig, ForecastConfig, SalesTable, StoreId};
use crate::error::AppError;

pub mod pipeline;

use pipeline::DashboardOutput;

/// Dataset used when neither `--file` nor `SALES_CSV` is given.
pub const DEFAULT_CSV: &str = "data/sales.csv";

/// Entry point for the `sales` binary.
pub fn run() -> Result<(), AppError> {
    // `sales` and `sales -f x.csv` behave like `sales tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal; log lines would corrupt the screen.
    if !matches!(cli.command, Command::Tui(_)) {
        init_tracing(cli.verbose);
    }

    match cli.command {
        Command::Summary(args) => handle_summary(&args),
        Command::Trend(args) => handle_trend(&args),
        Command::Stores(args) => handle_stores(&args),
        Command::Forecast(args) => handle_forecast(&args),
        Command::Group(args) => handle_group(&args),
        Command::Describe(args) => handle_describe(&args),
        Command::Tui(args) => handle_tui(&args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // A second init (e.g. from an embedding binary) is not an error for us.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn handle_summary(args: &DashArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(args);
    let (table, out) = load_and_run(&config)?;

    if let Err(err) = &out.kpis {
        return Err((*err).into());
    }

    println!(
        "{}",
        crate::report::format_summary(&out, table.stores().len(), config.top_n)
    );
    if config.plot {
        println!("{}", plot_for(&out, &config));
    }

    write_exports(&config, &out)
}

fn handle_trend(args: &DashArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(args);
    let (table, out) = load_and_run(&config)?;

    println!("{}", crate::report::format_filters(&out.params, table.stores().len()));
    println!("{}", crate::report::format_trend_table(&out.trend));
    if config.plot {
        println!(
            "{}",
            crate::plot::render_ascii_plot(&out.trend, None, config.plot_width, config.plot_height)
        );
    }

    write_exports(&config, &out)
}

fn handle_stores(args: &DashArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(args);
    let (table, out) = load_and_run(&config)?;

    println!("{}", crate::report::format_filters(&out.params, table.stores().len()));
    println!("{}", crate::report::format_store_table(&out.store_sales));

    write_exports(&config, &out)
}

fn handle_forecast(args: &DashArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(args);
    let (_, out) = load_and_run(&config)?;

    let fc = out.forecast.as_ref().map_err(|e| AppError::from(e.clone()))?;
    println!("{}", crate::report::format_forecast_table(fc));
    if config.plot {
        println!("{}", plot_for(&out, &config));
    }

    write_exports(&config, &out)
}

fn handle_group(args: &GroupArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args.dash);
    let table = crate::io::load(&config.csv_path)?;
    let params = config.filter_params(&table);

    let measure = Measure::resolve(&table, &args.measure)?;
    let filtered = crate::analysis::apply(&table, &params);
    let groups = crate::analysis::group_sum(&filtered, args.by, measure);

    let key_name = match args.by {
        GroupKey::Date => "date",
        GroupKey::Store => "store",
        GroupKey::Holiday => "holiday",
    };
    println!("{}", crate::report::format_filters(&params, table.stores().len()));
    println!(
        "{}",
        crate::report::format_group_table(&groups, key_name, args.measure.trim())
    );
    Ok(())
}

fn handle_describe(args: &DescribeArgs) -> Result<(), AppError> {
    let path = resolve_csv_path(args.file.as_deref());
    let table = crate::io::load(&path)?;
    let profile = crate::analysis::profile(&table, args.head);
    println!("{}", crate::report::format_profile(&profile, table.extra_columns()));
    Ok(())
}

fn handle_tui(args: &DashArgs) -> Result<(), AppError> {
    crate::tui::run(dashboard_config_from_args(args))
}

fn load_and_run(config: &DashboardConfig) -> Result<(SalesTable, DashboardOutput), AppError> {
    let table = crate::io::load(&config.csv_path)?;
    if table.is_empty() {
        warn!(path = %config.csv_path.display(), "sales file has no data rows");
    }
    let params = config.filter_params(&table);
    let out = pipeline::run_dashboard(&table, &params, &config.forecast);
    Ok((table, out))
}

fn plot_for(out: &DashboardOutput, config: &DashboardConfig) -> String {
    let forecast = out.forecast.as_ref().ok().map(|fc| fc.points.as_slice());
    crate::plot::render_ascii_plot(&out.trend, forecast, config.plot_width, config.plot_height)
}

fn write_exports(config: &DashboardConfig, out: &DashboardOutput) -> Result<(), AppError> {
    if let Some(path) = &config.export_trend {
        crate::io::write_trend_csv(path, &out.trend)?;
    }
    if let Some(path) = &config.export_stores {
        crate::io::write_store_csv(path, &out.store_sales)?;
    }
    if let Some(path) = &config.export_forecast {
        match &out.forecast {
            Ok(fc) => crate::io::write_forecast_csv(path, &fc.points)?,
            Err(err) => warn!(path = %path.display(), %err, "forecast export skipped"),
        }
    }
    if let Some(path) = &config.export_json {
        crate::io::write_snapshot_json(path, out)?;
    }
    Ok(())
}

pub fn dashboard_config_from_args(args: &DashArgs) -> DashboardConfig {
    DashboardConfig {
        csv_path: resolve_csv_path(args.file.as_deref()),
        start: args.start,
        end: args.end,
        stores: args.stores.iter().map(|s| StoreId::new(s.as_str())).collect(),
        holiday: args.holiday,
        forecast: ForecastConfig {
            horizon: args.horizon,
            week_anchor: args.week_anchor,
            scope: args.forecast_scope,
        },
        top_n: args.top,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_trend: args.export_trend.clone(),
        export_stores: args.export_stores.clone(),
        export_forecast: args.export_forecast.clone(),
        export_json: args.export_json.clone(),
    }
}

/// `--file`, else `SALES_CSV` (a `.env` file is honored), else `data/sales.csv`.
pub fn resolve_csv_path(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if dotenvy::dotenv().is_ok() {
        info!("loaded .env");
    }
    csv_path_from(None, std::env::var_os("SALES_CSV"))
}

fn csv_path_from(flag: Option<&Path>, env: Option<OsString>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV))
}

/// Rewrite argv so `sales` defaults to `sales tui`.
///
/// Rules:
/// - `sales`                      -> `sales tui`
/// - `sales -f x.csv ...`         -> `sales tui -f x.csv ...`
/// - `sales --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "summary" | "trend" | "stores" | "forecast" | "group" | "describe" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
