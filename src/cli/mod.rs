//! CLI interface for riskguard
//!
//! Provides subcommands for:
//! - `profiles`: List the built-in risk profiles
//! - `evaluate`: Run one candidate entry through a configured session
//! - `config`: Show the effective configuration

mod evaluate;
mod profiles;

pub use evaluate::EvaluateArgs;
pub use profiles::ProfilesArgs;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "riskguard")]
#[command(about = "Per-session trade and portfolio risk engine")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List built-in risk profiles
    Profiles(ProfilesArgs),
    /// Evaluate a candidate entry against the configured profile
    Evaluate(EvaluateArgs),
    /// Show the effective configuration
    Config,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
