use hga_common::{DenseMatrix, SimilarityMatrix};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use super::{TopologyBackend, assemble};
use crate::topology::NeighborhoodScorer;

/// Evaluates each pair directly against the prior.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuTopology;

impl TopologyBackend for CpuTopology {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn compute_topology_batch(
        &self,
        scorer: &NeighborhoodScorer<'_>,
        original: &SimilarityMatrix,
        bio: f64,
    ) -> DenseMatrix {
        let (rows, cols) = (original.row_count(), original.col_count());

        #[cfg(feature = "rayon")]
        let row_iter = (0..rows).into_par_iter();

        #[cfg(not(feature = "rayon"))]
        let row_iter = 0..rows;

        let per_row: Vec<Vec<f64>> = row_iter
            .map(|u| {
                (0..cols)
                    .map(|v| scorer.topology_blend(u, v, original.get_at(u, v), bio))
                    .collect()
            })
            .collect();
        assemble(rows, cols, per_row)
    }
}
