//! Optimal bipartite assignment (Munkres / Hungarian algorithm).
//!
//! ```ignore
//! use hga_common::DenseMatrix;
//! use hga_munkres::{Objective, solve};
//!
//! let cost = DenseMatrix::from_rows(&[[4.0, 1.0, 3.0], [2.0, 0.0, 5.0], [3.0, 2.0, 2.0]]).unwrap();
//! let assignment = solve(&cost, Objective::Minimize)?;
//! assert_eq!(assignment, vec![Some(1), Some(0), Some(2)]);
//! ```

mod error;
mod state;
mod step;

use std::collections::HashSet;

use hga_common::DenseMatrix;
use hga_common::profiling::Timer;
use tracing::debug;

pub use crate::error::SolveError;
use crate::state::CostState;

/// Row `r` is assigned to column `assignment[r]`, if any.
pub type Assignment = Vec<Option<usize>>;

/// Direction of the optimization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Objective {
    /// Smallest total cost.
    #[default]
    Minimize,
    /// Largest total value.
    Maximize,
}

/// Solves the assignment problem on `matrix`.
///
/// Exactly `min(rows, cols)` rows receive a column and no column is used
/// twice. Among optimal answers the one reached by row-major scanning wins.
///
/// # Errors
/// [`SolveError::NonFinite`] if any cost is NaN or infinite.
#[contracts::debug_ensures(ret.as_ref().is_err() || ret.as_ref().is_ok_and(|a| is_injective(a)))]
pub fn solve(matrix: &DenseMatrix, objective: Objective) -> Result<Assignment, SolveError> {
    let _t = Timer::new("munkres::solve");
    check_finite(matrix)?;
    debug!(
        "solving {}x{} assignment ({:?})",
        matrix.rows(),
        matrix.cols(),
        objective
    );

    if matrix.is_empty() {
        return Ok(vec![None; matrix.rows()]);
    }

    let cost = match objective {
        Objective::Minimize => matrix.clone(),
        Objective::Maximize => matrix.negated(),
    };

    if cost.rows() > cost.cols() {
        let by_col = minimize(cost.transposed());
        let mut out = vec![None; cost.rows()];
        for (c, r) in by_col.into_iter().enumerate() {
            if let Some(r) = r {
                out[r] = Some(c);
            }
        }
        return Ok(out);
    }
    Ok(minimize(cost))
}

/// [`solve`] over nested rows.
///
/// # Errors
/// [`SolveError::Ragged`] when the rows differ in length, otherwise as [`solve`].
pub fn solve_rows<R: AsRef<[f64]>>(
    rows: &[R],
    objective: Objective,
) -> Result<Assignment, SolveError> {
    let expected = rows.first().map_or(0, |r| r.as_ref().len());
    if let Some((row, r)) = rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.as_ref().len() != expected)
    {
        return Err(SolveError::Ragged {
            row,
            expected,
            actual: r.as_ref().len(),
        });
    }
    let matrix = DenseMatrix::from_rows(rows).unwrap_or_default();
    solve(&matrix, objective)
}

/// Sum of the assigned cells.
#[must_use]
pub fn total(matrix: &DenseMatrix, assignment: &[Option<usize>]) -> f64 {
    assignment
        .iter()
        .enumerate()
        .filter_map(|(r, c)| c.map(|c| matrix.get(r, c)))
        .sum()
}

fn minimize(cost: DenseMatrix) -> Assignment {
    let mut state = CostState::new(cost);
    step::run_to_completion(&mut state);
    state.assignment()
}

fn check_finite(matrix: &DenseMatrix) -> Result<(), SolveError> {
    if matrix.all_finite() {
        return Ok(());
    }
    let at = matrix
        .as_slice()
        .iter()
        .position(|v| !v.is_finite())
        .unwrap_or_default();
    let cols = matrix.cols().max(1);
    Err(SolveError::NonFinite {
        row: at / cols,
        col: at % cols,
    })
}

fn is_injective(assignment: &[Option<usize>]) -> bool {
    let mut seen = HashSet::new();
    assignment.iter().flatten().all(|c| seen.insert(*c))
}
