//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulated-user load harness for CRUD APIs", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a load test against the configured target
    Run(RunArgs),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

/// Overrides applied on top of the loaded configuration
#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// Target base URL, e.g. http://localhost:3000
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Number of concurrent agents
    #[arg(long, short = 'n', value_name = "COUNT")]
    pub agents: Option<usize>,

    /// Test duration in seconds
    #[arg(long, short = 'd', value_name = "SECONDS")]
    pub duration: Option<u64>,

    /// Seed for reproducible action selection
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Write the aggregate report as JSON to this path
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Exit non-zero when the verdict is FAIL
    #[arg(long)]
    pub fail_on_verdict: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output file path
        #[arg(long, value_name = "PATH")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration in use
    Show {
        /// Path to configuration file (optional, uses default loading logic)
        #[arg(long, value_name = "PATH")]
        config_file: Option<PathBuf>,

        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: String,
    },
}
