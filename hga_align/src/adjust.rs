//! Rewards pairs whose neighbors are mapped onto each other.

use hga_common::{Mapping, SimilarityMatrix};
use tracing::trace;

use crate::topology::Neighborhoods;

/// For every mapped `(u, v)`, adds `S0[u][v] / deg(a)` to `S[a][b]` for each
/// neighbor `a` of `u` and `b` of `v`.
///
/// `S0` is the matrix as it was on entry, so the order in which pairs are
/// visited does not feed earlier increments into later ones.
pub fn reward_mapped_neighbors(
    matrix: &mut SimilarityMatrix,
    neighborhoods: &Neighborhoods,
    mapping: &Mapping,
) {
    let before = matrix.duplicate();
    for (a_name, b_name) in mapping.iter() {
        let (Some(u), Some(v)) = (before.row_index(a_name), before.col_index(b_name)) else {
            trace!("skipping unmapped axis pair ({}, {})", a_name, b_name);
            continue;
        };
        let weight = before.get_at(u, v);
        for &a in neighborhoods.row_neighbors(u) {
            let share = weight / neighborhoods.row_degree(a) as f64;
            for &b in neighborhoods.col_neighbors(v) {
                matrix.values_mut().add(a, b, share);
            }
        }
    }
}
