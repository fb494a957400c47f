//! Command-line interface definitions.

pub mod check;
pub mod output;
pub mod run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Craftledger - crafting cost and profit resolution over live market data.
#[derive(Parser, Debug)]
#[command(name = "craftledger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve costs for recipes and print the profit table
    Run(RunArgs),

    /// Validate configuration file
    CheckConfig(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Print the ingredient breakdown of this recipe
    #[arg(long)]
    pub breakdown: Option<u32>,

    /// Override breakdown depth
    #[arg(long)]
    pub depth: Option<usize>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Recipe ids to resolve
    #[arg(required = true)]
    pub recipes: Vec<u32>,
}
