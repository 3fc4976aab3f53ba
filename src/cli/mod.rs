//! Command-line parsing for the construction sales insights tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analytics code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "sitemix",
    version,
    about = "Construction sales insights: demand forecasts, price trends, purchase timing"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the full report: summary cards, sales breakdowns, forecasts and
    /// recommendations.
    Report(ReportArgs),
    /// Print recommendations only (purchase timing, churn risk, pricing).
    ///
    /// This runs the same underlying pipeline as `sitemix report` but skips
    /// the descriptive tables, which is handier for scripting.
    Recommend(ReportArgs),
}

/// Common options for reporting and recommending.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Sales orders CSV. Built-in sample series are substituted when omitted.
    #[arg(short = 'o', long)]
    pub orders: Option<PathBuf>,

    /// Material prices CSV. Built-in sample series are substituted when omitted.
    #[arg(short = 'p', long)]
    pub prices: Option<PathBuf>,

    /// Trailing window (months) for the demand growth rate.
    #[arg(long, default_value_t = 6)]
    pub window: usize,

    /// Number of future months to project.
    #[arg(long, default_value_t = 6)]
    pub horizon: usize,

    /// Show top-N products in rankings.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Export the demand forecast series to CSV.
    #[arg(long = "export-forecast")]
    pub export_forecast: Option<PathBuf>,

    /// Export purchase recommendations to CSV.
    #[arg(long = "export-purchases")]
    pub export_purchases: Option<PathBuf>,

    /// Export the full computed bundle to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}
