use thiserror::Error;

/// Input the solver refuses to work on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// Rows of differing lengths.
    #[error("row {row} has {actual} columns, expected {expected}")]
    Ragged {
        /// Offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// NaN or infinite cost.
    #[error("non-finite cost at ({row}, {col})")]
    NonFinite {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
    },
}
