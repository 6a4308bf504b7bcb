pub mod menu;
pub mod output;

use crate::analyzer::charts::ChartKind;
use crate::error::InvalidInputError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fitlog", about = "Personal fitness activity logger & report tool")]
pub struct Cli {
    /// Activity log CSV to use instead of the configured data path
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive menu (default)
    Menu,
    /// Create an empty activity log if none exists
    Init,
    Log {
        #[arg(long)]
        activity_type: String,
        #[arg(long, value_parser = parse_positive)]
        duration: f64,
        #[arg(long, value_parser = parse_positive)]
        calories: f64,
    },
    Report {
        #[arg(long, default_value_t = false)]
        save: bool,
    },
    Filter {
        /// `type` or `date`; anything else is rejected as an invalid option
        criterion: String,
        value: String,
    },
    Chart {
        #[arg(value_enum)]
        kind: ChartKind,
    },
    Status,
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    Set { key: String, value: String },
    Get { key: String },
}

pub fn parse_positive(raw: &str) -> Result<f64, InvalidInputError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| InvalidInputError::NotNumeric(raw.to_string()))?;

    if value > 0.0 {
        Ok(value)
    } else {
        Err(InvalidInputError::NotPositive(value))
    }
}
