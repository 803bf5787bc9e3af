use hga_align::AlignError;
use hga_common::DataError;
use thiserror::Error;

/// Failures of the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the problem or writing a dump failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The problem document is not valid JSON for the expected shape.
    #[error("invalid problem document: {0}")]
    Json(#[from] serde_json::Error),
    /// Writing a CSV dump failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// The problem document names inconsistent nodes.
    #[error("inconsistent problem: {0}")]
    Data(#[from] DataError),
    /// The alignment itself failed.
    #[error(transparent)]
    Align(#[from] AlignError),
}
