#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use std::collections::HashSet;

use hga_align::{
    Aligner, BatchedTopology, CpuTopology, NeighborhoodScorer, Neighborhoods, TopologyBackend,
    align,
};
use hga_common::{AlignConfig, DenseMatrix, Graph, SimilarityMatrix, TopologyBackendKind};
use quickcheck::{Arbitrary, Gen, quickcheck};

mod common;

use common::{IRREGULAR_A, IRREGULAR_B, PATH_A, PATH_B, init_test_logger};

/// Two small random graphs with a matching similarity matrix.
#[derive(Clone, Debug)]
struct Problem {
    graph_a: Graph,
    graph_b: Graph,
    similarity: SimilarityMatrix,
}

fn random_graph(g: &mut Gen, prefix: &str) -> Graph {
    let n = usize::arbitrary(g) % 6 + 1;
    let nodes: Vec<String> = (0..n).map(|i| format!("{prefix}{i}")).collect();
    let edge_count = usize::arbitrary(g) % (n * 2);
    let edges: Vec<(String, String)> = (0..edge_count)
        .map(|_| {
            let a = usize::arbitrary(g) % n;
            let b = usize::arbitrary(g) % n;
            (nodes[a].clone(), nodes[b].clone())
        })
        .collect();
    Graph::from_parts(nodes, edges)
}

impl Arbitrary for Problem {
    fn arbitrary(g: &mut Gen) -> Self {
        let graph_a = random_graph(g, "a");
        let graph_b = random_graph(g, "b");
        let (rows, cols) = (graph_a.node_count(), graph_b.node_count());
        let data = (0..rows * cols)
            .map(|_| f64::from(u8::arbitrary(g) % 11) / 10.0)
            .collect();
        let values = DenseMatrix::from_vec(rows, cols, data).unwrap();
        let similarity =
            SimilarityMatrix::from_values(graph_a.nodes(), graph_b.nodes(), values).unwrap();
        Self {
            graph_a,
            graph_b,
            similarity,
        }
    }
}

fn one_pass(backend: &dyn TopologyBackend, a: &Graph, b: &Graph, m: &SimilarityMatrix) -> DenseMatrix {
    let hoods = Neighborhoods::build(a, b, m).unwrap();
    let scorer = NeighborhoodScorer::new(m, &hoods);
    backend.compute_topology_batch(&scorer, m, 0.3)
}

#[test]
fn test_backends_agree_on_one_pass() {
    let m = common::irregular_similarity();
    let cpu = one_pass(&CpuTopology, &IRREGULAR_A, &IRREGULAR_B, &m);
    let batched = one_pass(&BatchedTopology, &IRREGULAR_A, &IRREGULAR_B, &m);
    assert_eq!(cpu, batched);
}

#[test]
fn test_backends_agree_on_full_run() {
    init_test_logger();
    let m = common::path_similarity(0.9, 0.1);
    let cpu = align(&PATH_A, &PATH_B, &m, AlignConfig::default()).unwrap();
    let batched_cfg = AlignConfig::builder()
        .backend(TopologyBackendKind::Batched)
        .build()
        .unwrap();
    let batched = align(&PATH_A, &PATH_B, &m, batched_cfg).unwrap();
    assert_eq!(cpu.history, batched.history);
    assert_eq!(cpu.matrix, batched.matrix);
    assert_eq!(cpu.termination, batched.termination);
}

#[test]
fn test_neighbor_term_is_symmetric_under_role_swap() {
    let m = common::path_similarity(0.9, 0.1);
    let transposed = SimilarityMatrix::from_values(
        m.col_names().iter().cloned(),
        m.row_names().iter().cloned(),
        m.values().transposed(),
    )
    .unwrap();
    let forward = Neighborhoods::build(&PATH_A, &PATH_B, &m).unwrap();
    let backward = Neighborhoods::build(&PATH_B, &PATH_A, &transposed).unwrap();
    let fs = NeighborhoodScorer::new(&m, &forward);
    let bs = NeighborhoodScorer::new(&transposed, &backward);
    for u in 0..4 {
        for v in 0..4 {
            assert!((fs.neighbor_term(u, v) - bs.neighbor_term(v, u)).abs() < 1e-12);
            assert!((fs.non_neighbor_term(u, v) - bs.non_neighbor_term(v, u)).abs() < 1e-12);
        }
    }
}

#[test]
fn test_full_bio_pass_is_identity() {
    let m = common::irregular_similarity();
    let hoods = Neighborhoods::build(&IRREGULAR_A, &IRREGULAR_B, &m).unwrap();
    let mut prior = m.duplicate();
    prior.put("h", "p", 5.0).unwrap();
    let scorer = NeighborhoodScorer::new(&prior, &hoods);
    for backend in [&CpuTopology as &dyn TopologyBackend, &BatchedTopology] {
        assert_eq!(&backend.compute_topology_batch(&scorer, &m, 1.0), m.values());
    }
}

quickcheck! {
    fn prop_backends_give_identical_matrices(p: Problem) -> bool {
        one_pass(&CpuTopology, &p.graph_a, &p.graph_b, &p.similarity)
            == one_pass(&BatchedTopology, &p.graph_a, &p.graph_b, &p.similarity)
    }

    fn prop_loop_terminates_with_injective_best(p: Problem) -> bool {
        let config = AlignConfig::builder().iteration_cap(40).build().unwrap();
        let aligner = Aligner::new(&p.graph_a, &p.graph_b, config).unwrap();
        let result = aligner.run(&p.similarity).unwrap();
        let images: HashSet<&str> = result.mapping.iter().map(|(_, b)| b).collect();
        result.iterations <= 40
            && result.history.len() == result.iterations
            && images.len() == result.mapping.len()
            && result.mapping.len() == p.graph_a.node_count().min(p.graph_b.node_count())
            && result.score.total >= result.history[0].score.total
    }
}
