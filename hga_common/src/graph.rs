//! Undirected node-labelled graphs.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// An undirected graph keyed by node name.
///
/// Nodes keep their insertion order, which is the order every iteration over
/// the graph (and every tie-break derived from it) follows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    adjacency: IndexMap<String, IndexSet<String>>,
    edges: Vec<(String, String)>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a node list and an edge list.
    ///
    /// Edge endpoints missing from `nodes` are added after them.
    pub fn from_parts<N, E, S>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator<Item = S>,
        E: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Builds a graph from edges only.
    pub fn from_edges<E, S>(edges: E) -> Self
    where
        E: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self::from_parts(std::iter::empty::<S>(), edges)
    }

    /// Adds an isolated node; returns false if it already existed.
    pub fn add_node(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.adjacency.contains_key(&name) {
            return false;
        }
        self.adjacency.insert(name, IndexSet::new());
        true
    }

    /// Adds an undirected edge, creating missing endpoints.
    ///
    /// Self loops and repeated edges are ignored; returns whether an edge was added.
    pub fn add_edge(&mut self, a: impl Into<String>, b: impl Into<String>) -> bool {
        let (a, b) = (a.into(), b.into());
        self.add_node(a.clone());
        self.add_node(b.clone());
        if a == b {
            trace!("ignoring self loop on '{}'", a);
            return false;
        }
        let fresh = self
            .adjacency
            .get_mut(&a)
            .is_some_and(|nebs| nebs.insert(b.clone()));
        if !fresh {
            return false;
        }
        if let Some(nebs) = self.adjacency.get_mut(&b) {
            nebs.insert(a.clone());
        }
        self.edges.push((a, b));
        true
    }

    /// Node names in insertion order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.adjacency.keys().map(String::as_str)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges in insertion order, each reported once.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + '_ {
        self.edges.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Whether the graph holds `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.adjacency.contains_key(name)
    }

    /// Neighbors of `name`, or `None` for an unknown node.
    #[must_use]
    pub fn neighbors(&self, name: &str) -> Option<&IndexSet<String>> {
        self.adjacency.get(name)
    }

    /// Degree of `name`, zero for unknown nodes.
    #[must_use]
    pub fn degree(&self, name: &str) -> usize {
        self.adjacency.get(name).map_or(0, IndexSet::len)
    }

    /// Whether `a` and `b` are adjacent.
    #[must_use]
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.adjacency.get(a).is_some_and(|nebs| nebs.contains(b))
    }
}
