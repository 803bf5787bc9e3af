//! Error types shared by the alignment crates.
//!
//! Both kinds are fatal: they are raised before any numeric work starts and
//! never carry a partial result.

use thiserror::Error;

/// Rejected alignment parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A weight or fraction fell outside of `[0, 1]`.
    #[error("{name} must lie in [0, 1], got {value}")]
    OutOfUnitRange {
        /// Parameter name as it appears in the configuration.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The convergence tolerance was zero, negative or not finite.
    #[error("tolerance must be a positive finite number, got {0}")]
    NonPositiveTolerance(f64),
    /// The iteration cap was zero.
    #[error("iteration cap must be greater than zero")]
    ZeroIterationCap,
    /// The per-edge reward was negative or not finite.
    #[error("edge reward must be a non-negative finite number, got {0}")]
    InvalidEdgeReward(f64),
}

/// Inconsistent graphs or similarity data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// A node name appeared twice on one axis, so the index map is not bijective.
    #[error("duplicate {axis} name '{name}'")]
    DuplicateName {
        /// `"row"` or `"column"`.
        axis: &'static str,
        /// The repeated node name.
        name: String,
    },
    /// The value grid does not match the declared axes.
    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch {
        /// `rows * cols`.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// A node name is unknown to the matrix axis it was looked up on.
    #[error("unknown {axis} node '{name}'")]
    UnknownNode {
        /// `"row"` or `"column"`.
        axis: &'static str,
        /// The missing node name.
        name: String,
    },
    /// A similarity value was NaN or infinite.
    #[error("non-finite similarity value at ({row}, {col})")]
    NonFinite {
        /// Row node name.
        row: String,
        /// Column node name.
        col: String,
    },
    /// The matrix rows reference a node missing from graph A, or the other way round.
    #[error("node '{name}' is in the similarity {axis}s but not in {graph}")]
    NotInGraph {
        /// `"row"` or `"column"`.
        axis: &'static str,
        /// Node name.
        name: String,
        /// Which graph was consulted.
        graph: &'static str,
    },
    /// A graph node has no row (or column) in the similarity matrix.
    #[error("node '{name}' of {graph} has no similarity {axis}")]
    MissingFromMatrix {
        /// `"row"` or `"column"`.
        axis: &'static str,
        /// Node name.
        name: String,
        /// Which graph holds the node.
        graph: &'static str,
    },
}
