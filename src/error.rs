//! Error kinds surfaced by the loader, filter engine and statistics modules.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BikeshareError {
    /// The city has no configured source, or the configured file does not exist.
    #[error("No data source for {0}")]
    SourceNotFound(String),

    #[error("Could not parse timestamp {value:?} in column {column:?} at row {row}")]
    ParseError {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// An aggregate was requested over rows that cannot define it.
    #[error("No data available for {0}")]
    NoData(&'static str),

    /// A numeric aggregate hit a missing or non-finite value.
    #[error("Invalid value in {column:?} at row {row}")]
    InvalidData { row: usize, column: &'static str },

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BikeshareError>;
