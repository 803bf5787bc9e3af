use hga_common::{DenseMatrix, SimilarityMatrix};
use tracing::trace;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use super::{TopologyBackend, assemble};
use crate::topology::{NeighborhoodScorer, PairSets, average, blend};

/// Flattened inputs of the topology kernel for a run of node pairs.
///
/// Pair `i` owns two slots, `2i` for its neighbor term and `2i + 1` for its
/// non-neighbor term. Slot `s` averages `values[offsets[s]..offsets[s + 1]]`
/// over `sizes[s]`. The empty-set fallbacks are encoded as ordinary slots:
/// both sides empty becomes `([prior sum], cells)`, one side empty `([0], 1)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopologyBatch {
    /// Prior values of every slot back to back.
    pub values: Vec<f64>,
    /// Start of each slot in `values`, plus a final end marker.
    pub offsets: Vec<usize>,
    /// Divisor of each slot.
    pub sizes: Vec<usize>,
    /// Original similarity of each pair.
    pub originals: Vec<f64>,
}

impl TopologyBatch {
    fn new() -> Self {
        Self {
            offsets: vec![0],
            ..Self::default()
        }
    }

    /// Number of pairs in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    /// True when the batch holds no pair.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    fn push_slot(&mut self, scorer: &NeighborhoodScorer<'_>, left: &[usize], right: &[usize]) {
        let size = match PairSets::of(left.len(), right.len()) {
            PairSets::BothEmpty => {
                self.values.push(scorer.prior_sum());
                scorer.cells()
            }
            PairSets::OneEmpty => {
                self.values.push(0.0);
                1
            }
            PairSets::Cross => {
                let prior = scorer.prior();
                for &a in left {
                    self.values.extend(right.iter().map(|&b| prior.get_at(a, b)));
                }
                left.len() * right.len()
            }
        };
        self.sizes.push(size);
        self.offsets.push(self.values.len());
    }

    /// Appends pair `(u, v)`.
    pub fn push_pair(&mut self, scorer: &NeighborhoodScorer<'_>, u: usize, v: usize, original: f64) {
        let hoods = scorer.neighborhoods();
        self.push_slot(scorer, hoods.row_neighbors(u), hoods.col_neighbors(v));
        self.push_slot(scorer, hoods.row_non_neighbors(u), hoods.col_non_neighbors(v));
        self.originals.push(original);
    }

    fn slot_mean(&self, slot: usize) -> f64 {
        average(
            self.values[self.offsets[slot]..self.offsets[slot + 1]]
                .iter()
                .copied(),
            self.sizes[slot],
        )
    }

    /// One blended value per pair, in push order.
    #[must_use]
    pub fn evaluate(&self, bio: f64) -> Vec<f64> {
        self.originals
            .iter()
            .enumerate()
            .map(|(i, &original)| {
                blend(original, self.slot_mean(2 * i), self.slot_mean(2 * i + 1), bio)
            })
            .collect()
    }
}

/// Builds one [`TopologyBatch`] per row and runs the kernel over it.
#[derive(Clone, Copy, Debug, Default)]
pub struct BatchedTopology;

impl TopologyBackend for BatchedTopology {
    fn name(&self) -> &'static str {
        "batched"
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
                let mut batch = TopologyBatch::new();
                for v in 0..cols {
                    batch.push_pair(scorer, u, v, original.get_at(u, v));
                }
                trace!("row {} batch holds {} values", u, batch.values.len());
                batch.evaluate(bio)
            })
            .collect();
        assemble(rows, cols, per_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Neighborhoods;
    use hga_common::Graph;

    #[test]
    fn test_batch_layout_encodes_fallbacks() {
        let a = Graph::from_parts(["U", "I"], [("U", "U2")]);
        let b = Graph::from_edges([("V", "V2")]);
        let m = SimilarityMatrix::from_values(
            ["U", "I", "U2"],
            ["V", "V2"],
            DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap(),
        )
        .unwrap();
        let hoods = Neighborhoods::build(&a, &b, &m).unwrap();
        let scorer = NeighborhoodScorer::new(&m, &hoods);

        let mut batch = TopologyBatch::new();
        // I is isolated, V has a neighbor: one-sided neighbor slot
        batch.push_pair(&scorer, 1, 0, 3.0);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.sizes[0], 1);
        assert_eq!(&batch.values[batch.offsets[0]..batch.offsets[1]], &[0.0]);
        // non-neighbors: I -> {U, U2}, V -> {} : one-sided again
        assert_eq!(batch.sizes[1], 1);

        // U vs V: neighbors {U2} x {V2}, non-neighbors {I} x {} -> one-sided
        batch.push_pair(&scorer, 0, 0, 1.0);
        assert_eq!(batch.sizes[2], 1);
        assert_eq!(&batch.values[batch.offsets[2]..batch.offsets[3]], &[6.0]);

        let out = batch.evaluate(0.5);
        assert_eq!(out, vec![1.5, 0.5 + 1.5]);
    }
}
