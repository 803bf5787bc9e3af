#![allow(dead_code)]

use std::sync::OnceLock;

use hga_common::{DenseMatrix, Graph, SimilarityMatrix};

/// Assert that a condition holds, with detailed error message
#[macro_export]
macro_rules! assert_with_context {
    ($cond:expr, $context:expr) => {
        if !$cond {
            panic!(
                "Assertion failed: {}\nContext: {}",
                stringify!($cond),
                $context
            );
        }
    };
}

pub fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    let _ = INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Path `A-B-C-D`.
pub fn path_a() -> Graph {
    Graph::from_edges([("A", "B"), ("B", "C"), ("C", "D")])
}

/// Path `W-X-Y-Z`.
pub fn path_b() -> Graph {
    Graph::from_edges([("W", "X"), ("X", "Y"), ("Y", "Z")])
}

/// Similarity over the two paths: `diag` on the matching positions, `off` elsewhere.
pub fn path_similarity(diag: f64, off: f64) -> SimilarityMatrix {
    let mut values = DenseMatrix::filled(4, 4, off);
    for i in 0..4 {
        values.set(i, i, diag);
    }
    SimilarityMatrix::from_values(["A", "B", "C", "D"], ["W", "X", "Y", "Z"], values)
        .expect("valid fixture")
}
