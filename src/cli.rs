use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Kairos ARIMA vs SARIMA demand forecasting.
#[derive(Parser)]
#[command(
    name = "kairos",
    version,
    about = "ARIMA vs SARIMA demand forecasting with stepwise AIC order selection"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Select, fit and score ARIMA and SARIMA on a train/test split.
    Compare(CompareArgs),
    /// Run one order search on the training part and print the winner.
    Select(SelectArgs),
}

/// Arguments for the `compare` subcommand.
#[derive(clap::Args)]
pub struct CompareArgs {
    /// Path to TOML configuration file (defaults apply when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override input CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Write the comparison table as JSON to this path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write train/test data and both forecasts as CSV to this path.
    #[arg(long)]
    pub forecasts: Option<PathBuf>,

    /// Override the training fraction from config.
    #[arg(long = "train-ratio")]
    pub train_ratio: Option<f64>,
}

/// Arguments for the `select` subcommand.
#[derive(clap::Args)]
pub struct SelectArgs {
    /// Path to TOML configuration file (defaults apply when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override input CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Search seasonal ARIMA orders.
    #[arg(long)]
    pub seasonal: bool,

    /// Override the seasonal period from config.
    #[arg(long)]
    pub period: Option<usize>,

    /// Log every fitted candidate.
    #[arg(long)]
    pub trace: bool,

    /// Override the training fraction from config.
    #[arg(long = "train-ratio")]
    pub train_ratio: Option<f64>,
}
