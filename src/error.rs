use std::path::PathBuf;
use thiserror::Error;

/// Fatal failure while reading the backing store at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Activity log not found: {}. Run `fitlog init` first.", .path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read activity log {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Activity log {} is missing required columns: {}", .path.display(), .missing.join(", "))]
    MissingColumns {
        path: PathBuf,
        missing: Vec<&'static str>,
    },

    #[error("Activity log {} line {line}: {reason}", .path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}

#[derive(Debug, Error)]
#[error("Failed to write activity log {}: {source}", .path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: csv::Error,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid date format: {value}. Use YYYY-MM-DD.")]
pub struct InvalidDateError {
    pub value: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidInputError {
    #[error("Invalid input. Please enter a numerical value.")]
    NotNumeric(String),

    #[error("Value must be a positive number.")]
    NotPositive(f64),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Need at least {required} entries for a {chart}.")]
pub struct InsufficientDataError {
    pub chart: &'static str,
    pub required: usize,
    pub found: usize,
}
