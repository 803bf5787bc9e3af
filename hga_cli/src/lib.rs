//! Support code of the `hga` binary: problem loading and result reporting.

mod error;
pub mod problem;
pub mod report;

pub use crate::error::CliError;
pub use crate::problem::{Problem, ProblemDoc, load_problem};
