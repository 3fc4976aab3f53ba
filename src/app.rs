//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the CSV datasets into a session store
//! - computes the derived series, forecasts and recommendations
//! - prints report sections
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ReportArgs};
use crate::domain::AnalyticsConfig;
use crate::error::AppError;

pub mod pipeline;

use pipeline::{RunConfig, RunOutput};

/// Entry point for the `sitemix` binary.
pub fn run() -> Result<(), AppError> {
    // We want `sitemix` and `sitemix -o orders.csv` to behave like
    // `sitemix report ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while keeping the zero-ceremony default.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args, OutputMode::Full),
        Command::Recommend(args) => handle_report(args, OutputMode::RecommendOnly),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    RecommendOnly,
}

fn handle_report(args: ReportArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_report(&config)?;

    if mode == OutputMode::Full {
        print_full_report(&run);
    }
    print_recommendations(&run);

    // Optional exports.
    if let Some(path) = &config.export_forecast {
        crate::io::export::write_forecast_csv(path, &run.demand)?;
    }
    if let Some(path) = &config.export_purchases {
        crate::io::export::write_purchase_plan_csv(path, &run.purchase_plan)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::export::write_json(path, &run)?;
    }

    Ok(())
}

fn print_full_report(run: &RunOutput) {
    println!("{}", crate::report::format_summary(&run.stats));
    println!(
        "{}",
        crate::report::format_series_table("Monthly revenue", &run.revenue_by_month)
    );
    println!(
        "{}",
        crate::report::format_group_table("Revenue by region", &run.revenue_by_region)
    );
    println!(
        "{}",
        crate::report::format_group_table("Orders by customer type", &run.orders_by_customer_type)
    );
    println!(
        "{}",
        crate::report::format_group_table("Orders by status", &run.orders_by_status)
    );
    println!(
        "{}",
        crate::report::format_group_table("Top products by revenue", &run.top_products)
    );
    println!(
        "{}",
        crate::report::format_material_costs(&run.material_costs)
    );
    println!(
        "{}",
        crate::report::format_series_table("Avg delivery days by month", &run.delivery_by_month)
    );
    println!(
        "{}",
        crate::report::format_delivery_table(&run.delivery_by_region)
    );
    println!(
        "{}",
        crate::report::format_demand_outlook(&run.demand, run.demand_source)
    );
    println!(
        "{}",
        crate::report::format_price_outlook(
            &run.price_outlook,
            run.price_insights.as_ref(),
            run.price_source
        )
    );
    println!("{}", crate::report::format_product_profit(&run.products));
}

fn print_recommendations(run: &RunOutput) {
    println!(
        "{}",
        crate::report::format_price_bands(&run.price_bands, run.best_band.as_ref())
    );
    println!("{}", crate::report::format_churn_table(&run.churn));
    println!("{}", crate::report::format_purchase_plan(&run.purchase_plan));
}

pub fn run_config_from_args(args: &ReportArgs) -> RunConfig {
    let analytics = AnalyticsConfig {
        forecast_window: args.window,
        forecast_horizon: args.horizon,
        top_products: args.top,
        ..AnalyticsConfig::default()
    };

    RunConfig {
        orders_path: args.orders.clone(),
        prices_path: args.prices.clone(),
        analytics,
        export_forecast: args.export_forecast.clone(),
        export_purchases: args.export_purchases.clone(),
        export_json: args.export_json.clone(),
    }
}

/// Rewrite argv so `sitemix` defaults to `sitemix report`.
///
/// Rules:
/// - `sitemix`                    -> `sitemix report`
/// - `sitemix -o orders.csv ...`  -> `sitemix report -o orders.csv ...`
/// - `sitemix --help/--version`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "recommend");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "report flags".
    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
