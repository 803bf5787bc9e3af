//! Quality of a mapping: edge correctness plus similarity evidence.

use hga_common::{Graph, Mapping, SimilarityMatrix};
use serde::{Deserialize, Serialize};

/// Score breakdown of one mapping.
///
/// - edge_correctness (EC): share of graph A's edges whose endpoints map onto
///   an edge of graph B.
/// - edge_score (ES): `edge_reward` for each such edge whose two endpoint
///   similarities are positive.
/// - pair_similarity (PS): the sum of those endpoint similarities.
/// - pair_evidence (PE): `ES / 2 + PS`.
/// - total: `100 * EC + PE`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingScore {
    /// Graph A edges preserved by the mapping.
    pub correct_edges: usize,
    /// EC in `[0, 1]`.
    pub edge_correctness: f64,
    /// ES.
    pub edge_score: f64,
    /// PS.
    pub pair_similarity: f64,
    /// PE.
    pub pair_evidence: f64,
    /// The value the loop maximizes.
    pub total: f64,
}

/// A graph A edge together with the graph B edge its endpoints map onto.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConservedEdge {
    /// Endpoints in graph A, in edge order.
    pub a: (String, String),
    /// Their images in graph B.
    pub b: (String, String),
}

fn mapped_edges<'a>(
    graph_a: &'a Graph,
    graph_b: &'a Graph,
    mapping: &'a Mapping,
) -> impl Iterator<Item = ((&'a str, &'a str), (&'a str, &'a str))> + 'a {
    graph_a.edges().filter_map(move |(u1, u2)| {
        let (v1, v2) = (mapping.get(u1)?, mapping.get(u2)?);
        graph_b.has_edge(v1, v2).then_some(((u1, u2), (v1, v2)))
    })
}

/// Every graph A edge whose endpoints `mapping` carries onto a graph B edge,
/// in graph A's edge order.
#[must_use]
pub fn conserved_edges(graph_a: &Graph, graph_b: &Graph, mapping: &Mapping) -> Vec<ConservedEdge> {
    mapped_edges(graph_a, graph_b, mapping)
        .map(|((u1, u2), (v1, v2))| ConservedEdge {
            a: (u1.to_string(), u2.to_string()),
            b: (v1.to_string(), v2.to_string()),
        })
        .collect()
}

/// Scores `mapping` against both graphs and the current similarity values.
///
/// Pairs whose names are missing from `matrix` contribute no similarity.
#[must_use]
pub fn score_mapping(
    graph_a: &Graph,
    graph_b: &Graph,
    mapping: &Mapping,
    matrix: &SimilarityMatrix,
    edge_reward: f64,
) -> MappingScore {
    let mut correct_edges = 0usize;
    let mut edge_score = 0.0;
    let mut pair_similarity = 0.0;

    for ((u1, u2), (v1, v2)) in mapped_edges(graph_a, graph_b, mapping) {
        correct_edges += 1;
        let s1 = matrix.get(u1, v1).unwrap_or(0.0);
        let s2 = matrix.get(u2, v2).unwrap_or(0.0);
        if s1 > 0.0 && s2 > 0.0 {
            edge_score += edge_reward;
            pair_similarity += s1 + s2;
        }
    }

    let edge_correctness = if graph_a.edge_count() == 0 {
        0.0
    } else {
        correct_edges as f64 / graph_a.edge_count() as f64
    };
    let pair_evidence = edge_score / 2.0 + pair_similarity;
    MappingScore {
        correct_edges,
        edge_correctness,
        edge_score,
        pair_similarity,
        pair_evidence,
        total: 100.0 * edge_correctness + pair_evidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hga_common::DenseMatrix;
    use rstest::rstest;

    fn triangle_and_path() -> (Graph, Graph, SimilarityMatrix) {
        let a = Graph::from_edges([("a", "b"), ("b", "c"), ("c", "a")]);
        let b = Graph::from_edges([("x", "y"), ("y", "z")]);
        let values = DenseMatrix::from_rows(&[
            [0.5, 0.0, 0.0],
            [0.0, 0.25, 0.0],
            [0.0, 0.0, 0.0],
        ])
        .unwrap();
        let m = SimilarityMatrix::from_values(["a", "b", "c"], ["x", "y", "z"], values).unwrap();
        (a, b, m)
    }

    #[test]
    fn test_score_breakdown() {
        let (a, b, m) = triangle_and_path();
        let mapping: Mapping = [("a", "x"), ("b", "y"), ("c", "z")].into_iter().collect();
        let s = score_mapping(&a, &b, &mapping, &m, 1.0);
        // a-b and b-c survive, c-a does not
        assert_eq!(s.correct_edges, 2);
        assert!((s.edge_correctness - 2.0 / 3.0).abs() < 1e-12);
        // only a-b has two positive endpoint similarities
        assert_eq!(s.edge_score, 1.0);
        assert_eq!(s.pair_similarity, 0.75);
        assert_eq!(s.pair_evidence, 1.25);
        assert!((s.total - (100.0 * 2.0 / 3.0 + 1.25)).abs() < 1e-9);
    }

    #[test]
    fn test_conserved_edges_pair_up_endpoints() {
        let (a, b, _) = triangle_and_path();
        let mapping: Mapping = [("a", "x"), ("b", "y"), ("c", "z")].into_iter().collect();
        let edges = conserved_edges(&a, &b, &mapping);
        let pairs: Vec<_> = edges
            .iter()
            .map(|e| ((e.a.0.as_str(), e.a.1.as_str()), (e.b.0.as_str(), e.b.1.as_str())))
            .collect();
        assert_eq!(pairs, vec![(("a", "b"), ("x", "y")), (("b", "c"), ("y", "z"))]);
    }

    #[rstest]
    #[case::reward_two(2.0, 2.0)]
    #[case::reward_zero(0.0, 0.0)]
    fn test_edge_reward_scales_es(#[case] reward: f64, #[case] expected: f64) {
        let (a, b, m) = triangle_and_path();
        let mapping: Mapping = [("a", "x"), ("b", "y")].into_iter().collect();
        let s = score_mapping(&a, &b, &mapping, &m, reward);
        assert_eq!(s.edge_score, expected);
    }

    #[test]
    fn test_edgeless_graph_scores_zero_ec() {
        let a = Graph::from_parts(["a"], std::iter::empty::<(&str, &str)>());
        let b = Graph::from_parts(["x"], std::iter::empty::<(&str, &str)>());
        let m = SimilarityMatrix::new(["a"], ["x"]).unwrap();
        let mapping: Mapping = [("a", "x")].into_iter().collect();
        let s = score_mapping(&a, &b, &mapping, &m, 1.0);
        assert_eq!(s, MappingScore::default());
    }
}
