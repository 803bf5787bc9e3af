//! Sliding window of recent matrices and scores.

use std::collections::VecDeque;

use hga_common::SimilarityMatrix;
use serde::{Deserialize, Serialize};

/// Number of iterations the window remembers.
pub const WINDOW_LEN: usize = 3;

/// Why the loop decided it had converged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceReason {
    /// The matrix moved less than the tolerance since the previous iteration.
    MatrixStable,
    /// The matrix is within the tolerance of the one two iterations back,
    /// which catches a loop oscillating between two states.
    MatrixOscillating,
    /// The last three scores are identical.
    ScoreStable,
}

/// The last [`WINDOW_LEN`] (matrix, score) pairs, oldest first.
#[derive(Clone, Debug, Default)]
pub struct ConvergenceWindow {
    entries: VecDeque<(SimilarityMatrix, f64)>,
}

impl ConvergenceWindow {
    /// An empty window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers an iteration, evicting the oldest past [`WINDOW_LEN`].
    #[contracts::debug_ensures(self.len() <= WINDOW_LEN)]
    pub fn push(&mut self, matrix: SimilarityMatrix, score: f64) {
        self.entries.push_back((matrix, score));
        while self.entries.len() > WINDOW_LEN {
            self.entries.pop_front();
        }
    }

    /// Number of remembered iterations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first push.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Max-abs change between the two most recent matrices.
    #[must_use]
    pub fn latest_change(&self) -> Option<f64> {
        let n = self.entries.len();
        if n < 2 {
            return None;
        }
        self.entries[n - 1].0.max_abs_diff(&self.entries[n - 2].0)
    }

    /// Checks the stopping rules in order: one-step stability, two-step
    /// stability, then score stability.
    #[must_use]
    pub fn check(&self, tolerance: f64) -> Option<ConvergenceReason> {
        let n = self.entries.len();
        if n < 2 {
            return None;
        }
        let (latest, _) = &self.entries[n - 1];
        if self.latest_change().is_some_and(|d| d < tolerance) {
            return Some(ConvergenceReason::MatrixStable);
        }
        if n < WINDOW_LEN {
            return None;
        }
        let (oldest, _) = &self.entries[0];
        if latest.max_abs_diff(oldest).is_some_and(|d| d < tolerance) {
            return Some(ConvergenceReason::MatrixOscillating);
        }
        let scores: Vec<f64> = self.entries.iter().map(|(_, s)| *s).collect();
        if scores.windows(2).all(|w| w[0] == w[1]) {
            return Some(ConvergenceReason::ScoreStable);
        }
        None
    }
}
