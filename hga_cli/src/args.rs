use std::path::PathBuf;

use clap::Parser;
use hga_common::{AlignConfig, ConfigError, TopologyBackendKind};

/// HGA network aligner - align two graphs using sequence and topology similarity
#[derive(Parser, Debug)]
#[command(name = "hga")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON problem document (graphs and prior similarity)
    #[arg(short = 'p', long)]
    pub problem: PathBuf,

    /// Weight of the prior similarity in the topology blend
    #[arg(short = 'b', long, default_value_t = 0.5)]
    pub bio_factor: f64,
    /// Map identically named nodes onto each other
    #[arg(long, default_value_t = false)]
    pub forced: bool,
    /// Share of rows solved optimally when the graphs are large
    #[arg(long, default_value_t = 0.5)]
    pub hungarian_fraction: f64,
    /// Stop once the matrix moves less than this between iterations
    #[arg(short = 't', long, default_value_t = 0.01)]
    pub tolerance: f64,
    /// Maximum number of iterations
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub iteration_cap: usize,
    /// Graphs smaller than this are always solved optimally
    #[arg(long, default_value_t = 20)]
    pub size_threshold: usize,
    /// Edge Score reward per preserved edge
    #[arg(long, default_value_t = 1.0)]
    pub edge_reward: f64,
    /// Topology pass implementation
    #[arg(long, value_enum, default_value = "cpu")]
    pub backend: BackendArg,

    /// Worker threads (0 lets rayon decide)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub threads: usize,

    /// Write the best mapping as CSV
    #[arg(long)]
    pub mapping_out: Option<PathBuf>,
    /// Write per-iteration scores as CSV
    #[arg(long)]
    pub history_out: Option<PathBuf>,
    /// Write the best iteration's similarity matrix as CSV
    #[arg(long)]
    pub matrix_out: Option<PathBuf>,
    /// Write the conserved edge pairs as CSV
    #[arg(long)]
    pub edges_out: Option<PathBuf>,
}

impl Args {
    /// Convert command-line arguments into a validated alignment configuration
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if a flag is out of range.
    pub fn to_config(&self) -> Result<AlignConfig, ConfigError> {
        AlignConfig::builder()
            .bio_factor(self.bio_factor)
            .forced_mapping_for_same(self.forced)
            .hungarian_fraction(self.hungarian_fraction)
            .tolerance(self.tolerance)
            .iteration_cap(self.iteration_cap)
            .size_threshold(self.size_threshold)
            .edge_reward(self.edge_reward)
            .backend(self.backend.into())
            .build()
    }
}

/// Command-line argument wrapper for TopologyBackendKind
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum BackendArg {
    /// Direct per-pair evaluation
    #[value(name = "cpu")]
    Cpu,
    /// Flattened batch evaluation
    #[value(name = "batched")]
    Batched,
}

impl From<BackendArg> for TopologyBackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Cpu => Self::Cpu,
            BackendArg::Batched => Self::Batched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_align_config() {
        let args = Args::parse_from(["hga", "--problem", "p.json"]);
        assert_eq!(args.to_config().unwrap(), AlignConfig::default());
    }

    #[test]
    fn test_flags_reach_config() {
        let args = Args::parse_from([
            "hga",
            "-p",
            "p.json",
            "--bio-factor",
            "0.8",
            "--forced",
            "--backend",
            "batched",
            "-n",
            "5",
        ]);
        let cfg = args.to_config().unwrap();
        assert_eq!(cfg.bio_factor, 0.8);
        assert!(cfg.forced_mapping_for_same);
        assert_eq!(cfg.backend, TopologyBackendKind::Batched);
        assert_eq!(cfg.iteration_cap, 5);
    }

    #[test]
    fn test_dump_paths_are_optional() {
        let args = Args::parse_from(["hga", "-p", "p.json", "--matrix-out", "m.csv"]);
        assert_eq!(args.matrix_out, Some(PathBuf::from("m.csv")));
        assert_eq!(args.edges_out, None);
    }

    #[test]
    fn test_out_of_range_flag_is_a_config_error() {
        let args = Args::parse_from(["hga", "-p", "p.json", "--hungarian-fraction", "3"]);
        assert!(args.to_config().is_err());
    }
}
