//! The JSON problem document.
//!
//! ```json
//! {
//!   "graph_a": { "nodes": ["A", "B"], "edges": [["A", "B"]] },
//!   "graph_b": { "nodes": ["X", "Y"], "edges": [["X", "Y"]] },
//!   "similarity": [{ "a": "A", "b": "X", "value": 0.9 }]
//! }
//! ```
//!
//! Nodes only named by an edge are added after the listed ones. Pairs without
//! a similarity entry start at zero.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hga_common::{DataError, Graph, SimilarityMatrix};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CliError;

/// One graph as written in the document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDoc {
    /// Node names, in order.
    #[serde(default)]
    pub nodes: Vec<String>,
    /// Undirected edges.
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

impl GraphDoc {
    /// Builds the graph.
    #[must_use]
    pub fn to_graph(&self) -> Graph {
        Graph::from_parts(
            self.nodes.iter().map(String::as_str),
            self.edges.iter().map(|(a, b)| (a.as_str(), b.as_str())),
        )
    }
}

/// One similarity entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEntry {
    /// Graph A node.
    pub a: String,
    /// Graph B node.
    pub b: String,
    /// Prior similarity.
    pub value: f64,
}

/// The whole document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemDoc {
    /// Graph whose nodes form the rows.
    pub graph_a: GraphDoc,
    /// Graph whose nodes form the columns.
    pub graph_b: GraphDoc,
    /// Sparse prior similarity.
    #[serde(default)]
    pub similarity: Vec<SimilarityEntry>,
}

/// Graphs and matrix ready for the aligner.
#[derive(Clone, Debug)]
pub struct Problem {
    /// Graph A.
    pub graph_a: Graph,
    /// Graph B.
    pub graph_b: Graph,
    /// Rows: graph A nodes, columns: graph B nodes.
    pub similarity: SimilarityMatrix,
}

impl ProblemDoc {
    /// Builds the graphs and the dense similarity matrix.
    ///
    /// # Errors
    /// [`DataError::UnknownNode`] for an entry naming a node outside its graph,
    /// [`DataError::NonFinite`] for a non-finite value.
    pub fn into_problem(self) -> Result<Problem, DataError> {
        let graph_a = self.graph_a.to_graph();
        let graph_b = self.graph_b.to_graph();
        let mut similarity = SimilarityMatrix::new(graph_a.nodes(), graph_b.nodes())?;
        for entry in &self.similarity {
            similarity.put(&entry.a, &entry.b, entry.value)?;
        }
        similarity.check_finite()?;
        Ok(Problem {
            graph_a,
            graph_b,
            similarity,
        })
    }
}

/// Reads and converts a problem document.
///
/// # Errors
/// IO, JSON or [`DataError`] failures.
pub fn load_problem(path: &Path) -> Result<Problem, CliError> {
    let reader = BufReader::new(File::open(path)?);
    let doc: ProblemDoc = serde_json::from_reader(reader)?;
    let problem = doc.into_problem()?;
    info!(
        "loaded {}: {} x {} nodes, {} + {} edges",
        path.display(),
        problem.graph_a.node_count(),
        problem.graph_b.node_count(),
        problem.graph_a.edge_count(),
        problem.graph_b.edge_count()
    );
    Ok(problem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entries_default_to_zero() {
        let doc: ProblemDoc = serde_json::from_str(
            r#"{
                "graph_a": { "nodes": ["A"], "edges": [["A", "B"]] },
                "graph_b": { "edges": [["X", "Y"]] },
                "similarity": [{ "a": "B", "b": "Y", "value": 0.5 }]
            }"#,
        )
        .unwrap();
        let p = doc.into_problem().unwrap();
        assert_eq!(p.similarity.row_names().len(), 2);
        assert_eq!(p.similarity.get("B", "Y"), Some(0.5));
        assert_eq!(p.similarity.get("A", "X"), Some(0.0));
    }

    #[test]
    fn test_unknown_node_is_rejected() {
        let doc = ProblemDoc {
            graph_a: GraphDoc {
                nodes: vec!["A".into()],
                edges: vec![],
            },
            graph_b: GraphDoc {
                nodes: vec!["X".into()],
                edges: vec![],
            },
            similarity: vec![SimilarityEntry {
                a: "A".into(),
                b: "Q".into(),
                value: 1.0,
            }],
        };
        assert!(matches!(
            doc.into_problem(),
            Err(DataError::UnknownNode { axis: "column", .. })
        ));
    }
}
