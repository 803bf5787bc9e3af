//! Configuration for an alignment run.
//!
//! This module exposes a minimal, stable surface for consumers (for example,
//! the `hga_cli` binary) to parameterize how the refinement loop behaves.
//!
//! The main knobs are:
//! - bio_factor: how much of the prior (sequence) similarity survives each
//!   topology pass, versus the neighborhood-derived term.
//! - hungarian_fraction / size_threshold: when the matrix is solved optimally
//!   in one shot, and otherwise how many rows get the optimal solver before
//!   the rest are filled greedily.
//!
//! Quick examples
//!
//! Defaults (bio 0.5, half the rows optimal, tolerance 0.01):
//! ```ignore
//! use hga_common::AlignConfig;
//! let cfg = AlignConfig::default();
//! ```
//!
//! Sequence-heavy weighting with identical names pinned together:
//! ```ignore
//! use hga_common::AlignConfig;
//! let cfg = AlignConfig::builder()
//!     .bio_factor(0.8)
//!     .forced_mapping_for_same(true)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Global alignment configuration.
///
/// - bio_factor: weight of the original similarity in the topology blend,
///   `1.0` keeps the prior untouched, `0.0` is pure topology.
/// - forced_mapping_for_same: nodes that appear in both graphs under the same
///   name are mapped onto each other and removed from the assignment problem.
/// - hungarian_fraction: share of rows (ordered by non-zero count) solved by the
///   optimal assignment; the rest are mapped greedily.
/// - tolerance: the loop stops once the matrix moves less than this between
///   iterations (max-abs norm).
/// - iteration_cap: hard upper bound on loop iterations.
/// - size_threshold: when both graphs have fewer nodes than this the whole
///   matrix is solved optimally and hungarian_fraction is ignored.
/// - edge_reward: Edge Score contribution of every correctly mapped edge.
/// - backend: how the topology pass is evaluated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Prior-versus-topology weight in `[0, 1]`.
    pub bio_factor: f64,
    /// Force identically named nodes to map to each other.
    pub forced_mapping_for_same: bool,
    /// Share of rows solved optimally, in `[0, 1]`.
    pub hungarian_fraction: f64,
    /// Convergence threshold, strictly positive.
    pub tolerance: f64,
    /// Maximum number of iterations, strictly positive.
    pub iteration_cap: usize,
    /// Node count below which the matrix is always solved in one shot.
    pub size_threshold: usize,
    /// Reward per correctly mapped edge in the Edge Score.
    pub edge_reward: f64,
    /// Topology pass implementation.
    pub backend: TopologyBackendKind,
}

impl AlignConfig {
    /// Start a builder seeded with the defaults.
    #[must_use]
    pub fn builder() -> AlignConfigBuilder {
        AlignConfigBuilder::default()
    }

    /// Check every parameter against its allowed range.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_range("bio_factor", self.bio_factor)?;
        unit_range("hungarian_fraction", self.hungarian_fraction)?;
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::NonPositiveTolerance(self.tolerance));
        }
        if self.iteration_cap == 0 {
            return Err(ConfigError::ZeroIterationCap);
        }
        if !(self.edge_reward.is_finite() && self.edge_reward >= 0.0) {
            return Err(ConfigError::InvalidEdgeReward(self.edge_reward));
        }
        Ok(())
    }
}

fn unit_range(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}

impl Default for AlignConfig {
    /// Defaults mirror the published HGA runs: bio 0.5, half of the rows
    /// solved optimally, 1% tolerance.
    fn default() -> Self {
        Self {
            bio_factor: 0.5,
            forced_mapping_for_same: false,
            hungarian_fraction: 0.5,
            tolerance: 0.01,
            iteration_cap: 1000,
            size_threshold: 20,
            edge_reward: 1.0,
            backend: TopologyBackendKind::Cpu,
        }
    }
}

/// Selects the topology pass implementation.
///
/// - Cpu:
///     Evaluate each node pair directly (parallel over rows with `rayon`).
/// - Batched:
///     Flatten each row's neighbor and non-neighbor values into a batch with
///     per-pair offsets and evaluate a kernel over it, one batch per row.
///     Produces the same numbers as `Cpu`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopologyBackendKind {
    /// Direct per-pair evaluation.
    #[default]
    Cpu,
    /// Flattened batch evaluation.
    Batched,
}

/// Builder for [`AlignConfig`]; `build` validates.
#[derive(Clone, Debug, Default)]
pub struct AlignConfigBuilder {
    config: AlignConfig,
}

impl AlignConfigBuilder {
    /// Prior-versus-topology weight.
    #[must_use]
    pub fn bio_factor(mut self, value: f64) -> Self {
        self.config.bio_factor = value;
        self
    }

    /// Pin identically named nodes together.
    #[must_use]
    pub fn forced_mapping_for_same(mut self, value: bool) -> Self {
        self.config.forced_mapping_for_same = value;
        self
    }

    /// Share of rows solved optimally.
    #[must_use]
    pub fn hungarian_fraction(mut self, value: f64) -> Self {
        self.config.hungarian_fraction = value;
        self
    }

    /// Convergence threshold.
    #[must_use]
    pub fn tolerance(mut self, value: f64) -> Self {
        self.config.tolerance = value;
        self
    }

    /// Maximum number of iterations.
    #[must_use]
    pub fn iteration_cap(mut self, value: usize) -> Self {
        self.config.iteration_cap = value;
        self
    }

    /// Node count below which the matrix is solved in one shot.
    #[must_use]
    pub fn size_threshold(mut self, value: usize) -> Self {
        self.config.size_threshold = value;
        self
    }

    /// Reward per correctly mapped edge.
    #[must_use]
    pub fn edge_reward(mut self, value: f64) -> Self {
        self.config.edge_reward = value;
        self
    }

    /// Topology pass implementation.
    #[must_use]
    pub fn backend(mut self, value: TopologyBackendKind) -> Self {
        self.config.backend = value;
        self
    }

    /// Finish the builder.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if any parameter is out of range.
    pub fn build(self) -> Result<AlignConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
