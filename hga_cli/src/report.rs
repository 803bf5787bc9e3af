//! Human-readable summary and CSV dumps of an alignment.

use std::fmt::Write as _;
use std::io::Write;

use hga_align::{AlignmentResult, Termination};
use hga_common::SimilarityMatrix;
use serde::Serialize;

use crate::error::CliError;

#[derive(Serialize)]
struct MappingRow<'a> {
    a: &'a str,
    b: &'a str,
    similarity: f64,
}

#[derive(Serialize)]
struct HistoryRow {
    iteration: usize,
    edge_correctness: f64,
    edge_score: f64,
    pair_similarity: f64,
    pair_evidence: f64,
    score: f64,
    matrix_change: Option<f64>,
    mapped_pairs: usize,
}

/// Writes `a,b,similarity` for every pair of the best mapping.
///
/// `similarity` is the prior value from `original`, the matrix the run
/// started from.
///
/// # Errors
/// [`CliError::Csv`] if writing fails.
pub fn write_mapping_csv<W: Write>(
    writer: W,
    result: &AlignmentResult,
    original: &SimilarityMatrix,
) -> Result<(), CliError> {
    let mut out = csv::Writer::from_writer(writer);
    for (a, b) in result.mapping.iter() {
        out.serialize(MappingRow {
            a,
            b,
            similarity: original.get(a, b).unwrap_or(0.0),
        })?;
    }
    out.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct EdgeRow<'a> {
    a1: &'a str,
    a2: &'a str,
    b1: &'a str,
    b2: &'a str,
}

/// Writes the best iteration's similarity matrix.
///
/// The header is an empty corner cell followed by the column names; each row
/// starts with its row name.
///
/// # Errors
/// [`CliError::Csv`] if writing fails.
pub fn write_matrix_csv<W: Write>(writer: W, matrix: &SimilarityMatrix) -> Result<(), CliError> {
    let mut out = csv::Writer::from_writer(writer);
    let header = std::iter::once("").chain(matrix.col_names().iter().map(String::as_str));
    out.write_record(header)?;
    for (r, name) in matrix.row_names().iter().enumerate() {
        let cells = (0..matrix.col_count()).map(|c| matrix.get_at(r, c).to_string());
        out.write_record(std::iter::once(name.clone()).chain(cells))?;
    }
    out.flush()?;
    Ok(())
}

/// Writes `a1,a2,b1,b2` for every graph A edge the best mapping conserves.
///
/// # Errors
/// [`CliError::Csv`] if writing fails.
pub fn write_conserved_edges_csv<W: Write>(
    writer: W,
    result: &AlignmentResult,
) -> Result<(), CliError> {
    let mut out = csv::Writer::from_writer(writer);
    for edge in &result.conserved_edges {
        out.serialize(EdgeRow {
            a1: &edge.a.0,
            a2: &edge.a.1,
            b1: &edge.b.0,
            b2: &edge.b.1,
        })?;
    }
    out.flush()?;
    Ok(())
}

/// Writes one row per iteration.
///
/// # Errors
/// [`CliError::Csv`] if writing fails.
pub fn write_history_csv<W: Write>(writer: W, result: &AlignmentResult) -> Result<(), CliError> {
    let mut out = csv::Writer::from_writer(writer);
    for record in &result.history {
        out.serialize(HistoryRow {
            iteration: record.iteration,
            edge_correctness: record.score.edge_correctness,
            edge_score: record.score.edge_score,
            pair_similarity: record.score.pair_similarity,
            pair_evidence: record.score.pair_evidence,
            score: record.score.total,
            matrix_change: record.matrix_change,
            mapped_pairs: record.mapped_pairs,
        })?;
    }
    out.flush()?;
    Ok(())
}

/// Multi-line summary for the terminal.
#[must_use]
pub fn summary(result: &AlignmentResult) -> String {
    let termination = match result.termination {
        Termination::Converged(reason) => format!("converged ({reason:?})"),
        Termination::IterationCap => "iteration cap reached".to_string(),
        Termination::NumericOverflow => "stopped on numeric overflow".to_string(),
    };
    let s = &result.score;
    let mut out = String::new();
    let _ = writeln!(out, "iterations:     {}", result.iterations);
    let _ = writeln!(out, "termination:    {termination}");
    let _ = writeln!(out, "best iteration: {}", result.best_iteration);
    let _ = writeln!(out, "mapped pairs:   {}", result.mapping.len());
    let _ = writeln!(out, "conserved:      {}", result.conserved_edges.len());
    let _ = writeln!(
        out,
        "EC {:.4}  ES {:.4}  PS {:.4}  PE {:.4}",
        s.edge_correctness, s.edge_score, s.pair_similarity, s.pair_evidence
    );
    let _ = write!(out, "score:          {:.4}", s.total);
    out
}
