//! Interchangeable implementations of the topology pass.

mod batched;
mod cpu;

use hga_common::{DenseMatrix, SimilarityMatrix, TopologyBackendKind};

use crate::topology::NeighborhoodScorer;

pub use batched::{BatchedTopology, TopologyBatch};
pub use cpu::CpuTopology;

/// Recomputes every cell of a similarity matrix from its neighborhood terms.
///
/// `original` supplies the per-cell prior similarity, `scorer` the fixed prior
/// matrix and adjacency. The result has the shape of `original` and must not
/// depend on which implementation produced it.
pub trait TopologyBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Blends every `(u, v)` of `original` with its topology terms.
    fn compute_topology_batch(
        &self,
        scorer: &NeighborhoodScorer<'_>,
        original: &SimilarityMatrix,
        bio: f64,
    ) -> DenseMatrix;
}

/// The backend matching a configured kind.
#[must_use]
pub fn backend_for(kind: TopologyBackendKind) -> Box<dyn TopologyBackend> {
    match kind {
        TopologyBackendKind::Cpu => Box::new(CpuTopology),
        TopologyBackendKind::Batched => Box::new(BatchedTopology),
    }
}

/// Row-major values from per-row outputs.
pub(crate) fn assemble(rows: usize, cols: usize, per_row: Vec<Vec<f64>>) -> DenseMatrix {
    let data: Vec<f64> = per_row.into_iter().flatten().collect();
    DenseMatrix::from_vec(rows, cols, data).unwrap_or_else(|| DenseMatrix::zeros(rows, cols))
}
