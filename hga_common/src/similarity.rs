//! Name-indexed similarity matrices.
//!
//! Rows are nodes of graph A, columns nodes of graph B. Both axes are
//! insertion-ordered sets, so an axis is its own bijective name <-> index map.
//! The axes are reference counted and never mutated, so [`SimilarityMatrix::duplicate`]
//! only copies the value grid.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexSet;
use itertools::Itertools;

use crate::error::DataError;
use crate::matrix::DenseMatrix;

/// An ordered, duplicate-free list of node names.
pub type Axis = IndexSet<String>;

/// Dense similarity scores between the nodes of two graphs.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityMatrix {
    rows: Arc<Axis>,
    cols: Arc<Axis>,
    values: DenseMatrix,
}

impl SimilarityMatrix {
    /// A zero matrix over the given axes.
    ///
    /// # Errors
    /// [`DataError::DuplicateName`] if a name repeats on either axis.
    pub fn new<R, C, S>(rows: R, cols: C) -> Result<Self, DataError>
    where
        R: IntoIterator<Item = S>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = build_axis("row", rows)?;
        let cols = build_axis("column", cols)?;
        let values = DenseMatrix::zeros(rows.len(), cols.len());
        Ok(Self {
            rows: Arc::new(rows),
            cols: Arc::new(cols),
            values,
        })
    }

    /// Wraps an existing grid.
    ///
    /// # Errors
    /// Duplicate names, a grid whose shape does not match the axes, or a
    /// non-finite value.
    pub fn from_values<R, C, S>(rows: R, cols: C, values: DenseMatrix) -> Result<Self, DataError>
    where
        R: IntoIterator<Item = S>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = build_axis("row", rows)?;
        let cols = build_axis("column", cols)?;
        if values.rows() != rows.len() || values.cols() != cols.len() {
            return Err(DataError::ShapeMismatch {
                expected: rows.len() * cols.len(),
                actual: values.rows() * values.cols(),
            });
        }
        let matrix = Self {
            rows: Arc::new(rows),
            cols: Arc::new(cols),
            values,
        };
        matrix.check_finite()?;
        Ok(matrix)
    }

    fn with_axes(rows: Axis, cols: Axis, values: DenseMatrix) -> Self {
        Self {
            rows: Arc::new(rows),
            cols: Arc::new(cols),
            values,
        }
    }

    /// Errors on the first NaN or infinite value, in row-major order.
    ///
    /// # Errors
    /// [`DataError::NonFinite`].
    pub fn check_finite(&self) -> Result<(), DataError> {
        for r in 0..self.row_count() {
            if let Some(c) = self.values.row(r).iter().position(|v| !v.is_finite()) {
                return Err(DataError::NonFinite {
                    row: self.rows[r].clone(),
                    col: self.cols[c].clone(),
                });
            }
        }
        Ok(())
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

    /// The row axis.
    #[must_use]
    pub fn row_names(&self) -> &Axis {
        &self.rows
    }

    /// The column axis.
    #[must_use]
    pub fn col_names(&self) -> &Axis {
        &self.cols
    }

    /// Index of a row name.
    #[must_use]
    pub fn row_index(&self, name: &str) -> Option<usize> {
        self.rows.get_index_of(name)
    }

    /// Index of a column name.
    #[must_use]
    pub fn col_index(&self, name: &str) -> Option<usize> {
        self.cols.get_index_of(name)
    }

    /// Name of a row index.
    #[must_use]
    pub fn row_name(&self, index: usize) -> Option<&str> {
        self.rows.get_index(index).map(String::as_str)
    }

    /// Name of a column index.
    #[must_use]
    pub fn col_name(&self, index: usize) -> Option<&str> {
        self.cols.get_index(index).map(String::as_str)
    }

    /// Similarity of a named pair.
    #[must_use]
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        Some(self.values.get(self.row_index(row)?, self.col_index(col)?))
    }

    /// Overwrites a named pair.
    ///
    /// # Errors
    /// [`DataError::UnknownNode`] if either name is not on its axis.
    pub fn put(&mut self, row: &str, col: &str, value: f64) -> Result<(), DataError> {
        let r = self.row_index(row).ok_or_else(|| DataError::UnknownNode {
            axis: "row",
            name: row.to_string(),
        })?;
        let c = self.col_index(col).ok_or_else(|| DataError::UnknownNode {
            axis: "column",
            name: col.to_string(),
        })?;
        self.values.set(r, c, value);
        Ok(())
    }

    /// Similarity at an index pair.
    #[must_use]
    pub fn get_at(&self, r: usize, c: usize) -> f64 {
        self.values.get(r, c)
    }

    /// Overwrites an index pair.
    pub fn put_at(&mut self, r: usize, c: usize, value: f64) {
        self.values.set(r, c, value);
    }

    /// The value grid.
    #[must_use]
    pub const fn values(&self) -> &DenseMatrix {
        &self.values
    }

    /// The value grid, mutably. The axes cannot be changed through it.
    pub fn values_mut(&mut self) -> &mut DenseMatrix {
        &mut self.values
    }

    /// Copies the value grid; the axes are shared with `self`.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            cols: Arc::clone(&self.cols),
            values: self.values.clone(),
        }
    }

    /// Whether `other` uses the very same axes (not merely equal ones).
    #[must_use]
    pub fn shares_axes_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows) && Arc::ptr_eq(&self.cols, &other.cols)
    }

    /// Sum of every value.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.values.sum()
    }

    /// Largest absolute difference from `other`; `None` if the shapes differ.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> Option<f64> {
        self.values.max_abs_diff(&other.values)
    }

    /// Number of non-zero entries in a row.
    #[must_use]
    pub fn non_zero_count(&self, row: usize) -> usize {
        self.values.row(row).iter().filter(|v| **v != 0.0).count()
    }

    /// The best column of `row` whose name is not in `excluded`.
    ///
    /// Ties go to the first column in axis order. `None` when every column is
    /// excluded (or the matrix has no columns).
    #[must_use]
    pub fn get_max(&self, row: usize, excluded: &HashSet<String>) -> Option<&str> {
        let mut best: Option<(usize, f64)> = None;
        for (c, &value) in self.values.row(row).iter().enumerate() {
            if excluded.contains(&self.cols[c]) {
                continue;
            }
            if best.is_none_or(|(_, top)| value > top) {
                best = Some((c, value));
            }
        }
        best.map(|(c, _)| self.cols[c].as_str())
    }

    /// Splits the rows into an optimally-solved part `H` and a greedy part `G`.
    ///
    /// Rows are ranked by their non-zero count (descending, stable on axis
    /// order) and the top `ceil(fraction * rows)` go to `H`. Both parts keep
    /// every column and list their rows in the original axis order.
    #[must_use]
    pub fn split_by_fraction(&self, fraction: f64) -> (Self, Self) {
        let fraction = fraction.clamp(0.0, 1.0);
        let total = self.row_count();
        let take = ((fraction * total as f64).ceil() as usize).min(total);

        let ranked: Vec<usize> = (0..total)
            .sorted_by_key(|&r| Reverse(self.non_zero_count(r)))
            .collect();
        let in_h: HashSet<usize> = ranked[..take].iter().copied().collect();

        let (h_rows, g_rows): (Vec<usize>, Vec<usize>) =
            (0..total).partition(|r| in_h.contains(r));
        let all_cols: Vec<usize> = (0..self.col_count()).collect();
        (
            self.extract(&h_rows, &all_cols),
            self.extract(&g_rows, &all_cols),
        )
    }

    /// A renumbered copy restricted to the named rows and columns.
    ///
    /// The result follows this matrix's axis order, whatever order the
    /// subsets were given in.
    ///
    /// # Errors
    /// [`DataError::UnknownNode`] if a subset names a node not on the axis.
    pub fn get_part<R, C, S>(&self, rows: R, cols: C) -> Result<Self, DataError>
    where
        R: IntoIterator<Item = S>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let row_idx = select("row", &self.rows, rows)?;
        let col_idx = select("column", &self.cols, cols)?;
        Ok(self.extract(&row_idx, &col_idx))
    }

    fn extract(&self, row_idx: &[usize], col_idx: &[usize]) -> Self {
        let rows: Axis = row_idx.iter().map(|&r| self.rows[r].clone()).collect();
        let cols: Axis = col_idx.iter().map(|&c| self.cols[c].clone()).collect();
        let mut values = DenseMatrix::zeros(rows.len(), cols.len());
        for (i, &r) in row_idx.iter().enumerate() {
            for (j, &c) in col_idx.iter().enumerate() {
                values.set(i, j, self.values.get(r, c));
            }
        }
        Self::with_axes(rows, cols, values)
    }

    /// Names present on both axes, in row order.
    #[must_use]
    pub fn shared_names(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|n| self.cols.contains(*n))
            .map(String::as_str)
            .collect()
    }

    /// Row names that are not column names.
    #[must_use]
    pub fn row_only(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|n| !self.cols.contains(*n))
            .map(String::as_str)
            .collect()
    }

    /// Column names that are not row names.
    #[must_use]
    pub fn col_only(&self) -> Vec<&str> {
        self.cols
            .iter()
            .filter(|n| !self.rows.contains(*n))
            .map(String::as_str)
            .collect()
    }
}

fn build_axis<I, S>(axis: &'static str, names: I) -> Result<Axis, DataError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = Axis::new();
    for name in names {
        let name = name.into();
        if out.contains(&name) {
            return Err(DataError::DuplicateName { axis, name });
        }
        out.insert(name);
    }
    Ok(out)
}

fn select<I, S>(axis: &'static str, names: &Axis, subset: I) -> Result<Vec<usize>, DataError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut wanted = HashSet::new();
    for name in subset {
        let name = name.as_ref();
        let idx = names.get_index_of(name).ok_or_else(|| DataError::UnknownNode {
            axis,
            name: name.to_string(),
        })?;
        wanted.insert(idx);
    }
    Ok((0..names.len()).filter(|i| wanted.contains(i)).collect())
}
