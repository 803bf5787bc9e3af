use hga_common::{ConfigError, DataError};
use hga_munkres::SolveError;
use thiserror::Error;

/// Anything that stops an alignment before it produces a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    /// Rejected configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Graphs and similarity matrix do not fit together.
    #[error("inconsistent input: {0}")]
    Data(#[from] DataError),
    /// The assignment solver refused its input.
    #[error("assignment failed: {0}")]
    Solve(#[from] SolveError),
}
