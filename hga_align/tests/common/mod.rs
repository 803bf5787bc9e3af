#![allow(dead_code)]

use std::sync::OnceLock;

use hga_common::{DenseMatrix, Graph, SimilarityMatrix};

pub fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    let _ = INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

lazy_static::lazy_static! {
    /// Path `A-B-C-D`.
    pub static ref PATH_A: Graph = Graph::from_edges([("A", "B"), ("B", "C"), ("C", "D")]);
    /// Path `W-X-Y-Z`.
    pub static ref PATH_B: Graph = Graph::from_edges([("W", "X"), ("X", "Y"), ("Y", "Z")]);
    /// A hub with two leaves, a tail and an isolated node.
    pub static ref IRREGULAR_A: Graph = Graph::from_parts(
        ["h", "l1", "l2", "t", "iso"],
        [("h", "l1"), ("h", "l2"), ("l2", "t")],
    );
    /// A triangle with a pendant.
    pub static ref IRREGULAR_B: Graph = Graph::from_edges([("p", "q"), ("q", "r"), ("r", "p"), ("r", "s")]);
}

/// Similarity over the two paths: `diag` on matching positions, `off` elsewhere.
pub fn path_similarity(diag: f64, off: f64) -> SimilarityMatrix {
    let mut values = DenseMatrix::filled(4, 4, off);
    for i in 0..4 {
        values.set(i, i, diag);
    }
    SimilarityMatrix::from_values(["A", "B", "C", "D"], ["W", "X", "Y", "Z"], values)
        .expect("valid fixture")
}

/// Uneven similarity over the irregular graphs.
pub fn irregular_similarity() -> SimilarityMatrix {
    let values = DenseMatrix::from_rows(&[
        [0.7, 0.1, 0.3, 0.0],
        [0.2, 0.6, 0.0, 0.1],
        [0.0, 0.4, 0.5, 0.2],
        [0.1, 0.0, 0.2, 0.9],
        [0.3, 0.3, 0.3, 0.3],
    ])
    .expect("rectangular");
    SimilarityMatrix::from_values(["h", "l1", "l2", "t", "iso"], ["p", "q", "r", "s"], values)
        .expect("valid fixture")
}
