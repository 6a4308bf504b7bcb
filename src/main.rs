mod analyzer;
mod cli;
mod config;
mod error;
mod store;

use crate::cli::menu::run_menu;
use crate::cli::{Cli, Commands, ConfigCommands, output};
use crate::config::Config;
use crate::store::ActivityLog;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let data_path = cli
        .file
        .clone()
        .unwrap_or_else(|| config.data_path.clone());
    debug!(data_path = %data_path.display(), "resolved activity log path");

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let mut log = open_log(&data_path)?;
            run_menu(&mut log, &config)
        }
        Commands::Init => handle_init(&data_path),
        Commands::Log {
            activity_type,
            duration,
            calories,
        } => {
            let mut log = open_log(&data_path)?;
            let record = log.append(&activity_type, duration, calories)?;
            output::print_logged(record);
            Ok(())
        }
        Commands::Report { save } => output::print_report(&open_log(&data_path)?, &config, save),
        Commands::Filter { criterion, value } => {
            output::print_filtered(&open_log(&data_path)?, &criterion, &value);
            Ok(())
        }
        Commands::Chart { kind } => {
            output::print_chart(&open_log(&data_path)?, kind, config.chart_width);
            Ok(())
        }
        Commands::Status => handle_status(&data_path),
        Commands::Config { command } => handle_config_command(config, command),
    }
}

fn open_log(path: &Path) -> Result<ActivityLog> {
    Ok(ActivityLog::load(path)?)
}

fn handle_init(path: &Path) -> Result<()> {
    if ActivityLog::create(path)? {
        println!("Created activity log: {}", path.display());
    } else {
        println!("Activity log already exists: {}", path.display());
    }

    Ok(())
}

fn handle_status(path: &Path) -> Result<()> {
    let log = open_log(path)?;

    println!("FitLog status");
    println!("- data_path: {}", log.path().display());
    println!("- records: {}", log.len());
    println!(
        "- last_logged_at: {}",
        log.latest()
            .map(|record| record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    Ok(())
}

fn handle_config_command(mut config: Config, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Set { key, value } => {
            config.set_value(&key, &value)?;
            config.save()?;
            info!(key = %key, "config updated");
            println!("Config saved: {key} = {value}");
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let value = config
                .get_value(&key)
                .with_context(|| format!("Unsupported config key: {key}"))?;

            println!("{value}");
            Ok(())
        }
    }
}
