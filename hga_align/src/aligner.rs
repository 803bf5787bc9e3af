//! The refinement loop.
//!
//! Each iteration maps the free rows onto the free columns (`MAP`), scores the
//! result (`SCORE`), rewards pairs whose neighbors were mapped onto each other
//! (`ADJUST`), recomputes every cell from neighborhood averages blended with the
//! original similarity (`TOPOLOGY`) and finally checks the convergence window
//! (`CHECK`). The best-scoring iteration is kept.

use hga_common::profiling::Timer;
use hga_common::{AlignConfig, Graph, Mapping, SimilarityMatrix};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::adjust::reward_mapped_neighbors;
use crate::backend::{TopologyBackend, backend_for};
use crate::convergence::{ConvergenceReason, ConvergenceWindow};
use crate::error::AlignError;
use crate::remap::{RemapPlan, remap};
use crate::score::{ConservedEdge, MappingScore, conserved_edges, score_mapping};
use crate::topology::{NeighborhoodScorer, Neighborhoods};

/// How the loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// A stopping rule fired.
    Converged(ConvergenceReason),
    /// The iteration cap was reached first.
    IterationCap,
    /// The topology pass produced a non-finite value. The result holds the
    /// best iteration seen before that.
    NumericOverflow,
}

/// Summary of one iteration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// One-based iteration number.
    pub iteration: usize,
    /// Score of the mapping found in this iteration.
    pub score: MappingScore,
    /// Max-abs change of the matrix against the previous iteration.
    pub matrix_change: Option<f64>,
    /// Number of mapped pairs.
    pub mapped_pairs: usize,
}

/// Outcome of a run.
#[derive(Clone, Debug)]
pub struct AlignmentResult {
    /// Best mapping found.
    pub mapping: Mapping,
    /// Its score.
    pub score: MappingScore,
    /// The similarity matrix at the end of the best iteration, after its
    /// topology pass.
    pub matrix: SimilarityMatrix,
    /// Graph A edges the best mapping carries onto graph B edges.
    pub conserved_edges: Vec<ConservedEdge>,
    /// Iteration that produced the best mapping.
    pub best_iteration: usize,
    /// Iterations executed.
    pub iterations: usize,
    /// Why the loop stopped.
    pub termination: Termination,
    /// One record per iteration, in order.
    pub history: Vec<IterationRecord>,
}

struct Best {
    mapping: Mapping,
    score: MappingScore,
    matrix: SimilarityMatrix,
    iteration: usize,
}

/// Aligns graph A onto graph B.
///
/// An aligner borrows both graphs and owns nothing mutable between runs, so
/// one instance can serve any number of [`Aligner::run`] calls.
pub struct Aligner<'g> {
    graph_a: &'g Graph,
    graph_b: &'g Graph,
    config: AlignConfig,
    backend: Box<dyn TopologyBackend>,
}

impl<'g> Aligner<'g> {
    /// Validates `config` and picks the configured topology backend.
    ///
    /// # Errors
    /// [`AlignError::Config`] if a parameter is out of range.
    pub fn new(
        graph_a: &'g Graph,
        graph_b: &'g Graph,
        config: AlignConfig,
    ) -> Result<Self, AlignError> {
        config.validate()?;
        let backend = backend_for(config.backend);
        Ok(Self {
            graph_a,
            graph_b,
            config,
            backend,
        })
    }

    /// Replaces the topology backend.
    #[must_use]
    pub fn with_backend(mut self, backend: Box<dyn TopologyBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &AlignConfig {
        &self.config
    }

    fn solve_whole(&self) -> bool {
        let threshold = self.config.size_threshold;
        self.graph_a.node_count() < threshold && self.graph_b.node_count() < threshold
    }

    /// Runs the loop on `similarity` (rows: graph A, columns: graph B).
    ///
    /// # Errors
    /// [`AlignError::Data`] if the matrix axes differ from the graph node sets
    /// or hold a non-finite value.
    pub fn run(&self, similarity: &SimilarityMatrix) -> Result<AlignmentResult, AlignError> {
        let _t = Timer::new("align::run");
        similarity.check_finite()?;
        let neighborhoods = Neighborhoods::build(self.graph_a, self.graph_b, similarity)?;
        let plan = RemapPlan::new(similarity, self.config.forced_mapping_for_same);
        let solve_whole = self.solve_whole();
        info!(
            "aligning {} x {} nodes ({} free rows, backend {}, {})",
            similarity.row_count(),
            similarity.col_count(),
            plan.rows().len(),
            self.backend.name(),
            if solve_whole { "optimal" } else { "hybrid" }
        );

        let original = similarity.duplicate();
        let mut live = similarity.duplicate();
        let mut window = ConvergenceWindow::new();
        let mut history = Vec::new();
        let mut best = Best {
            mapping: Mapping::new(),
            score: MappingScore::default(),
            matrix: similarity.duplicate(),
            iteration: 0,
        };

        let mut iteration = 0;
        let termination = loop {
            iteration += 1;

            let mapping = remap(&live, &plan, &self.config, solve_whole)?;
            let score = score_mapping(
                self.graph_a,
                self.graph_b,
                &mapping,
                &live,
                self.config.edge_reward,
            );
            let mapped_from = live.duplicate();

            {
                let _t = Timer::new("align::adjust");
                reward_mapped_neighbors(&mut live, &neighborhoods, &mapping);
            }
            {
                let _t = Timer::new("align::topology");
                let prior = live.duplicate();
                let scorer = NeighborhoodScorer::new(&prior, &neighborhoods);
                *live.values_mut() = self.backend.compute_topology_batch(
                    &scorer,
                    &original,
                    self.config.bio_factor,
                );
            }
            let overflowed = !live.values().all_finite();

            if !overflowed {
                window.push(live.duplicate(), score.total);
            }
            let record = IterationRecord {
                iteration,
                score,
                matrix_change: if overflowed { None } else { window.latest_change() },
                mapped_pairs: mapping.len(),
            };
            debug!(
                "iteration {}: score {:.4} (EC {:.4}), change {:?}",
                iteration, score.total, score.edge_correctness, record.matrix_change
            );
            history.push(record);

            // the first iteration always counts, later ones only if strictly better
            if best.iteration == 0 || score.total > best.score.total {
                best = Best {
                    mapping,
                    score,
                    // an overflowed pass leaves nothing usable, keep the matrix it started from
                    matrix: if overflowed { mapped_from } else { live.duplicate() },
                    iteration,
                };
            }

            if overflowed {
                warn!("non-finite similarity after iteration {}, stopping", iteration);
                break Termination::NumericOverflow;
            }
            if let Some(reason) = window.check(self.config.tolerance) {
                break Termination::Converged(reason);
            }
            if iteration >= self.config.iteration_cap {
                break Termination::IterationCap;
            }
        };

        info!(
            "stopped after {} iteration(s): {:?}",
            iteration, termination
        );
        let conserved_edges = conserved_edges(self.graph_a, self.graph_b, &best.mapping);
        Ok(AlignmentResult {
            conserved_edges,
            mapping: best.mapping,
            score: best.score,
            matrix: best.matrix,
            best_iteration: best.iteration,
            iterations: iteration,
            termination,
            history,
        })
    }
}

/// One-shot convenience over [`Aligner`].
///
/// # Errors
/// See [`Aligner::new`] and [`Aligner::run`].
pub fn align(
    graph_a: &Graph,
    graph_b: &Graph,
    similarity: &SimilarityMatrix,
    config: AlignConfig,
) -> Result<AlignmentResult, AlignError> {
    Aligner::new(graph_a, graph_b, config)?.run(similarity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hga_common::{ConfigError, DenseMatrix};

    fn edge() -> (Graph, Graph, SimilarityMatrix) {
        let a = Graph::from_edges([("A", "B")]);
        let b = Graph::from_edges([("X", "Y")]);
        let m = SimilarityMatrix::from_values(
            ["A", "B"],
            ["X", "Y"],
            DenseMatrix::from_rows(&[[0.9, 0.1], [0.1, 0.9]]).unwrap(),
        )
        .unwrap();
        (a, b, m)
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let (a, b, _) = edge();
        let config = AlignConfig {
            tolerance: 0.0,
            ..AlignConfig::default()
        };
        assert!(matches!(
            Aligner::new(&a, &b, config),
            Err(AlignError::Config(ConfigError::NonPositiveTolerance(_)))
        ));
    }

    #[test]
    fn test_single_edge_maps_straight() {
        let (a, b, m) = edge();
        let result = align(&a, &b, &m, AlignConfig::default()).unwrap();
        assert_eq!(result.mapping.get("A"), Some("X"));
        assert_eq!(result.mapping.get("B"), Some("Y"));
        assert_eq!(result.score.edge_correctness, 1.0);
        assert!(matches!(result.termination, Termination::Converged(_)));
        assert_eq!(result.history.len(), result.iterations);
        // the reward keeps pushing the matched pairs up, so later iterations score higher
        assert!(result.score.total > result.history[0].score.total);
    }

    #[test]
    fn test_cap_of_one_stops_immediately() {
        let (a, b, m) = edge();
        let config = AlignConfig::builder().iteration_cap(1).build().unwrap();
        let result = align(&a, &b, &m, config).unwrap();
        assert_eq!(result.iterations, 1);
        assert_eq!(result.termination, Termination::IterationCap);
        assert_eq!(result.history[0].matrix_change, None);
    }
}
