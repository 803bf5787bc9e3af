//! HGA network alignment.
//!
//! Iteratively refines a similarity matrix between two graphs with
//! neighborhood topology, re-solving the node assignment each round until the
//! matrix settles. [`Aligner`] drives the loop; the other modules are its
//! steps, exposed for callers that want to run them on their own.

pub mod adjust;
pub mod aligner;
pub mod backend;
pub mod convergence;
mod error;
pub mod remap;
pub mod score;
pub mod topology;

pub use crate::aligner::{Aligner, AlignmentResult, IterationRecord, Termination, align};
pub use crate::backend::{BatchedTopology, CpuTopology, TopologyBackend, TopologyBatch};
pub use crate::convergence::{ConvergenceReason, ConvergenceWindow};
pub use crate::error::AlignError;
pub use crate::score::{ConservedEdge, MappingScore, conserved_edges, score_mapping};
pub use crate::topology::{NeighborhoodScorer, Neighborhoods};
