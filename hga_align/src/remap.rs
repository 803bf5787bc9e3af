//! Building a mapping from the current similarity matrix.
//!
//! Small problems are solved optimally in one shot. Larger ones are split:
//! the rows with the most non-zero candidates are solved optimally, and the
//! remaining rows pick their best free column greedily.

use std::collections::HashSet;

use hga_common::{AlignConfig, Mapping, SimilarityMatrix};
use hga_common::profiling::Timer;
use hga_munkres::{Objective, solve};
use tracing::debug;

use crate::error::AlignError;

/// What is fixed up front and what is re-solved every iteration.
#[derive(Clone, Debug, Default)]
pub struct RemapPlan {
    forced: Mapping,
    rows: Vec<String>,
    cols: Vec<String>,
}

impl RemapPlan {
    /// With `forced_same` every name present on both axes maps to itself and
    /// only the remaining rows and columns are re-solved. Otherwise the whole
    /// matrix is.
    #[must_use]
    pub fn new(matrix: &SimilarityMatrix, forced_same: bool) -> Self {
        if !forced_same {
            return Self {
                forced: Mapping::new(),
                rows: matrix.row_names().iter().cloned().collect(),
                cols: matrix.col_names().iter().cloned().collect(),
            };
        }
        let forced: Mapping = matrix.shared_names().into_iter().map(|n| (n, n)).collect();
        debug!("{} node(s) mapped onto themselves", forced.len());
        Self {
            forced,
            rows: matrix.row_only().into_iter().map(str::to_string).collect(),
            cols: matrix.col_only().into_iter().map(str::to_string).collect(),
        }
    }

    /// The fixed identity pairs.
    #[must_use]
    pub const fn forced(&self) -> &Mapping {
        &self.forced
    }

    /// Rows re-solved every iteration.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Columns re-solved every iteration.
    #[must_use]
    pub fn cols(&self) -> &[String] {
        &self.cols
    }
}

/// Maps the plan's free rows onto its free columns using the live matrix and
/// adds the forced pairs.
///
/// `solve_whole` selects the one-shot optimal solve; otherwise the
/// `hungarian_fraction` split applies.
///
/// # Errors
/// Propagates lookup and solver failures.
pub fn remap(
    live: &SimilarityMatrix,
    plan: &RemapPlan,
    config: &AlignConfig,
    solve_whole: bool,
) -> Result<Mapping, AlignError> {
    let _t = Timer::new("align::remap");
    let region = live.get_part(&plan.rows, &plan.cols)?;

    let mut mapping = plan.forced.clone();
    let solved = if solve_whole {
        solve_optimal(&region)?
    } else {
        solve_hybrid(&region, config.hungarian_fraction)?
    };
    let collisions = mapping.merge(&solved);
    debug_assert_eq!(collisions, 0, "forced pairs overlap the re-solved region");
    Ok(mapping)
}

/// Optimal maximum-similarity assignment of the whole matrix.
///
/// # Errors
/// [`AlignError::Solve`] on non-finite values.
pub fn solve_optimal(matrix: &SimilarityMatrix) -> Result<Mapping, AlignError> {
    let assignment = solve(matrix.values(), Objective::Maximize)?;
    Ok(assignment
        .into_iter()
        .enumerate()
        .filter_map(|(r, c)| Some((matrix.row_name(r)?, matrix.col_name(c?)?)))
        .collect())
}

/// Optimal assignment of the top `fraction` of rows, greedy for the rest.
///
/// # Errors
/// [`AlignError::Solve`] on non-finite values.
pub fn solve_hybrid(matrix: &SimilarityMatrix, fraction: f64) -> Result<Mapping, AlignError> {
    let (optimal, greedy) = matrix.split_by_fraction(fraction);
    debug!(
        "hybrid remap: {} optimal row(s), {} greedy row(s)",
        optimal.row_count(),
        greedy.row_count()
    );
    let mut mapping = solve_optimal(&optimal)?;
    fill_greedy(&greedy, &mut mapping);
    Ok(mapping)
}

/// Gives each row of `matrix`, in axis order, its best column not yet used
/// by `mapping`. Rows left without a free column stay unmapped.
pub fn fill_greedy(matrix: &SimilarityMatrix, mapping: &mut Mapping) {
    let mut used: HashSet<String> = mapping.iter().map(|(_, b)| b.to_string()).collect();
    for r in 0..matrix.row_count() {
        let Some(row) = matrix.row_name(r) else {
            continue;
        };
        if mapping.is_mapped(row) {
            continue;
        }
        if let Some(col) = matrix.get_max(r, &used) {
            used.insert(col.to_string());
            mapping.map(row.to_string(), col.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hga_common::DenseMatrix;

    fn matrix() -> SimilarityMatrix {
        SimilarityMatrix::from_values(
            ["a", "b", "s"],
            ["x", "s", "y"],
            DenseMatrix::from_rows(&[[0.9, 0.0, 0.1], [0.8, 0.7, 0.2], [0.0, 1.0, 0.0]]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_plan_without_forcing_covers_everything() {
        let plan = RemapPlan::new(&matrix(), false);
        assert!(plan.forced().is_empty());
        assert_eq!(plan.rows().len(), 3);
        assert_eq!(plan.cols().len(), 3);
    }

    #[test]
    fn test_forced_plan_pins_shared_names() {
        let plan = RemapPlan::new(&matrix(), true);
        assert_eq!(plan.forced().get("s"), Some("s"));
        assert_eq!(plan.rows(), &["a".to_string(), "b".to_string()]);
        assert_eq!(plan.cols(), &["x".to_string(), "y".to_string()]);

        let m = remap(&matrix(), &plan, &AlignConfig::default(), true).unwrap();
        assert_eq!(m.get("s"), Some("s"));
        assert_eq!(m.get("a"), Some("x"));
        assert_eq!(m.get("b"), Some("y"));
    }

    #[test]
    fn test_optimal_maximizes_total() {
        let m = solve_optimal(&matrix()).unwrap();
        // a-x, b-y, s-s
        let total: f64 = m
            .iter()
            .map(|(a, b)| matrix().get(a, b).unwrap())
            .sum();
        assert!((total - 2.1).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_fill_skips_used_columns() {
        let mut mapping: Mapping = [("s", "x")].into_iter().collect();
        fill_greedy(&matrix(), &mut mapping);
        assert_eq!(mapping.get("a"), Some("y"));
        assert_eq!(mapping.get("b"), Some("s"));
        assert_eq!(mapping.get("s"), Some("x"));
    }

    #[test]
    fn test_hybrid_with_zero_fraction_is_all_greedy() {
        let m = solve_hybrid(&matrix(), 0.0).unwrap();
        assert_eq!(m.get("a"), Some("x"));
        assert_eq!(m.get("b"), Some("s"));
        assert_eq!(m.get("s"), Some("y"));
    }
}
