use anyhow::{Context, Result};
use clap::Parser;
use stampede_config::domains::logging::LogLevel;
use stampede_logging::{init_logging, init_simple_tracing};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::{handle_config_generate, handle_config_show, handle_config_validate, load_config};
use commands::run::{apply_overrides, handle_run};

/// Exit status for a completed run whose verdict was FAIL
const VERDICT_FAILED_EXIT_CODE: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Run(args)) => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_overrides(&mut config, args);
            config.validate_all().context("Invalid configuration")?;

            let explicit_level = cli
                .log_level
                .as_deref()
                .map(str::parse::<LogLevel>)
                .transpose()
                .map_err(anyhow::Error::msg)?;
            init_logging(&config.logging, explicit_level)?;

            if !handle_run(config, args).await? {
                std::process::exit(VERDICT_FAILED_EXIT_CODE);
            }
            Ok(())
        }
        Some(Commands::Config { config_cmd }) => {
            init_simple_tracing(cli.log_level.as_deref())?;
            match config_cmd {
                ConfigCommands::Validate { config_file } => handle_config_validate(config_file),
                ConfigCommands::Generate { output, force } => handle_config_generate(output, *force),
                ConfigCommands::Show { config_file, format } => {
                    handle_config_show(config_file.as_deref().or(cli.config.as_deref()), format)
                }
            }
        }
        None => {
            // If no subcommand is provided, print help
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            cmd.print_help().context("Failed to print help")?;
            println!();
            Ok(())
        }
    }
}
