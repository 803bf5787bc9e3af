//! HGA network aligner CLI
//!
//! Loads two graphs and a prior similarity from a JSON problem document, runs
//! the alignment loop and reports the best mapping.

#[global_allocator]
/// Global allocator using jemalloc for better performance in parallel workloads.
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;

use std::fs::File;
use std::io::BufWriter;

use clap::Parser;
use hga_align::Aligner;
use hga_cli::{load_problem, report};
use hga_common::profiling;
use tracing::info;

use args::Args;

/// Executes the aligner.
///
/// This function:
/// 1. Initializes logging
/// 2. Parses command-line arguments
/// 3. Loads the problem document
/// 4. Runs the alignment loop
/// 5. Prints the summary and writes the requested dumps
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()?;
    }
    let config = args.to_config()?;
    let problem = load_problem(&args.problem)?;

    info!("Running alignment with {:?}", config);
    let aligner = Aligner::new(&problem.graph_a, &problem.graph_b, config)?;
    let result = aligner.run(&problem.similarity)?;

    println!("{}", report::summary(&result));

    if let Some(path) = &args.mapping_out {
        report::write_mapping_csv(BufWriter::new(File::create(path)?), &result, &problem.similarity)?;
        info!("Wrote mapping to {}", path.display());
    }
    if let Some(path) = &args.history_out {
        report::write_history_csv(BufWriter::new(File::create(path)?), &result)?;
        info!("Wrote history to {}", path.display());
    }
    if let Some(path) = &args.matrix_out {
        report::write_matrix_csv(BufWriter::new(File::create(path)?), &result.matrix)?;
        info!("Wrote matrix to {}", path.display());
    }
    if let Some(path) = &args.edges_out {
        report::write_conserved_edges_csv(BufWriter::new(File::create(path)?), &result)?;
        info!("Wrote conserved edges to {}", path.display());
    }

    let profile = profiling::report();
    if !profile.is_empty() {
        println!("{profile}");
    }

    Ok(())
}
