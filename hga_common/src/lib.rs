//! Shared data model for the HGA network aligner.
//!
//! Graphs, name-indexed similarity matrices, node mappings, the run
//! configuration and the error types every other crate in the workspace
//! builds on.

mod config;
mod error;
mod graph;
mod mapping;
mod matrix;
mod similarity;

pub mod profiling;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::graph::*;
pub use crate::mapping::*;
pub use crate::matrix::*;
pub use crate::similarity::*;
