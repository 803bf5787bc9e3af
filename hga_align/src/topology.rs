//! Neighborhood similarity terms and the topology blend.
//!
//! Everything here works on matrix indices. [`Neighborhoods`] translates both
//! graphs onto the row and column axes of a similarity matrix once per run;
//! [`NeighborhoodScorer`] then answers per-pair questions against a fixed
//! prior matrix.

use std::collections::HashSet;

use hga_common::{DataError, Graph, SimilarityMatrix};
use itertools::Itertools;

/// Adjacency of graph A over row indices and of graph B over column indices.
///
/// Neighbor and non-neighbor lists are sorted ascending, which fixes the
/// summation order of every average taken over them.
#[derive(Clone, Debug)]
pub struct Neighborhoods {
    rows: Vec<Vec<usize>>,
    cols: Vec<Vec<usize>>,
    row_others: Vec<Vec<usize>>,
    col_others: Vec<Vec<usize>>,
}

impl Neighborhoods {
    /// Maps both graphs onto the axes of `matrix`.
    ///
    /// # Errors
    /// [`DataError::NotInGraph`] or [`DataError::MissingFromMatrix`] unless the
    /// rows are exactly graph A's nodes and the columns exactly graph B's.
    pub fn build(
        graph_a: &Graph,
        graph_b: &Graph,
        matrix: &SimilarityMatrix,
    ) -> Result<Self, DataError> {
        let rows = axis_adjacency(
            graph_a,
            "graph A",
            "row",
            matrix.row_count(),
            |n| matrix.row_index(n),
            |i| matrix.row_name(i),
        )?;
        let cols = axis_adjacency(
            graph_b,
            "graph B",
            "column",
            matrix.col_count(),
            |n| matrix.col_index(n),
            |i| matrix.col_name(i),
        )?;
        let row_others = complements(&rows);
        let col_others = complements(&cols);
        Ok(Self {
            rows,
            cols,
            row_others,
            col_others,
        })
    }

    /// Neighbors of row `r` in graph A.
    #[must_use]
    pub fn row_neighbors(&self, r: usize) -> &[usize] {
        &self.rows[r]
    }

    /// Neighbors of column `c` in graph B.
    #[must_use]
    pub fn col_neighbors(&self, c: usize) -> &[usize] {
        &self.cols[c]
    }

    /// Rows that are neither `r` nor adjacent to it.
    #[must_use]
    pub fn row_non_neighbors(&self, r: usize) -> &[usize] {
        &self.row_others[r]
    }

    /// Columns that are neither `c` nor adjacent to it.
    #[must_use]
    pub fn col_non_neighbors(&self, c: usize) -> &[usize] {
        &self.col_others[c]
    }

    /// Degree of row `r` in graph A.
    #[must_use]
    pub fn row_degree(&self, r: usize) -> usize {
        self.rows[r].len()
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.cols.len()
    }
}

fn axis_adjacency<'m>(
    graph: &Graph,
    graph_name: &'static str,
    axis: &'static str,
    len: usize,
    index_of: impl Fn(&str) -> Option<usize>,
    name_of: impl Fn(usize) -> Option<&'m str>,
) -> Result<Vec<Vec<usize>>, DataError> {
    let mut adjacency = vec![Vec::new(); len];
    for node in graph.nodes() {
        let idx = index_of(node).ok_or_else(|| DataError::MissingFromMatrix {
            axis,
            name: node.to_string(),
            graph: graph_name,
        })?;
        let neighbors = graph.neighbors(node).into_iter().flatten();
        // every neighbor is itself a graph node, so it was or will be checked above
        adjacency[idx] = neighbors.filter_map(|n| index_of(n)).sorted().collect();
    }
    if let Some(extra) = (0..len)
        .filter_map(&name_of)
        .find(|name| !graph.contains(name))
    {
        return Err(DataError::NotInGraph {
            axis,
            name: extra.to_string(),
            graph: graph_name,
        });
    }
    Ok(adjacency)
}

fn complements(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    adjacency
        .iter()
        .enumerate()
        .map(|(node, neighbors)| {
            let skip: HashSet<usize> = neighbors.iter().copied().collect();
            (0..n)
                .filter(|&other| other != node && !skip.contains(&other))
                .collect()
        })
        .collect()
}

/// Mean of `values` accumulated left to right, divided by `size`.
///
/// Both topology backends funnel every average through this function so they
/// produce the same bits.
#[inline]
pub fn average(values: impl IntoIterator<Item = f64>, size: usize) -> f64 {
    values.into_iter().fold(0.0, |acc, v| acc + v) / size as f64
}

/// `original * bio + mean(nt, nnt) * (1 - bio)`.
#[inline]
#[must_use]
pub fn blend(original: f64, neighbor_term: f64, non_neighbor_term: f64, bio: f64) -> f64 {
    original * bio + ((neighbor_term + non_neighbor_term) / 2.0) * (1.0 - bio)
}

/// Which of the fallbacks an average over two node sets falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairSets {
    /// Both sets are empty: use the global mean of the prior.
    BothEmpty,
    /// Exactly one set is empty: the term is zero.
    OneEmpty,
    /// Average over the cross product.
    Cross,
}

impl PairSets {
    /// Classifies a pair of set sizes.
    #[must_use]
    pub const fn of(left: usize, right: usize) -> Self {
        match (left == 0, right == 0) {
            (true, true) => Self::BothEmpty,
            (true, false) | (false, true) => Self::OneEmpty,
            (false, false) => Self::Cross,
        }
    }
}

/// Per-pair neighborhood terms against one fixed prior matrix.
pub struct NeighborhoodScorer<'a> {
    prior: &'a SimilarityMatrix,
    neighborhoods: &'a Neighborhoods,
    prior_sum: f64,
    cells: usize,
}

impl<'a> NeighborhoodScorer<'a> {
    /// Fixes `prior` for the whole pass and sums it once.
    #[must_use]
    pub fn new(prior: &'a SimilarityMatrix, neighborhoods: &'a Neighborhoods) -> Self {
        Self {
            prior,
            neighborhoods,
            prior_sum: prior.sum(),
            cells: prior.row_count() * prior.col_count(),
        }
    }

    /// The prior matrix.
    #[must_use]
    pub const fn prior(&self) -> &SimilarityMatrix {
        self.prior
    }

    /// The index adjacency.
    #[must_use]
    pub const fn neighborhoods(&self) -> &Neighborhoods {
        self.neighborhoods
    }

    /// Sum of every prior value.
    #[must_use]
    pub const fn prior_sum(&self) -> f64 {
        self.prior_sum
    }

    /// Number of cells in the prior.
    #[must_use]
    pub const fn cells(&self) -> usize {
        self.cells
    }

    /// Mean prior value over all node pairs.
    #[must_use]
    pub fn global_mean(&self) -> f64 {
        average([self.prior_sum], self.cells)
    }

    fn cross_mean(&self, left: &[usize], right: &[usize]) -> f64 {
        match PairSets::of(left.len(), right.len()) {
            PairSets::BothEmpty => self.global_mean(),
            PairSets::OneEmpty => 0.0,
            PairSets::Cross => average(
                left.iter()
                    .flat_map(|&a| right.iter().map(move |&b| self.prior.get_at(a, b))),
                left.len() * right.len(),
            ),
        }
    }

    /// Mean prior similarity between the neighbors of `u` and those of `v`.
    #[must_use]
    pub fn neighbor_term(&self, u: usize, v: usize) -> f64 {
        self.cross_mean(
            self.neighborhoods.row_neighbors(u),
            self.neighborhoods.col_neighbors(v),
        )
    }

    /// Mean prior similarity between the non-neighbors of `u` and those of `v`.
    #[must_use]
    pub fn non_neighbor_term(&self, u: usize, v: usize) -> f64 {
        self.cross_mean(
            self.neighborhoods.row_non_neighbors(u),
            self.neighborhoods.col_non_neighbors(v),
        )
    }

    /// The blended value of `(u, v)` given its original similarity.
    #[must_use]
    pub fn topology_blend(&self, u: usize, v: usize, original: f64, bio: f64) -> f64 {
        blend(
            original,
            self.neighbor_term(u, v),
            self.non_neighbor_term(u, v),
            bio,
        )
    }
}
