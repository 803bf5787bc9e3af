//! Row-major dense `f64` grid shared by the solver and the similarity matrix.

use serde::{Deserialize, Serialize};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// A dense row-major matrix of `f64`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// A `rows x cols` matrix filled with `value`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// A zero matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Wraps row-major data; `None` if the length does not match.
    #[must_use]
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        (data.len() == rows * cols).then_some(Self { rows, cols, data })
    }

    /// Builds from nested rows; `None` if the rows are ragged.
    #[must_use]
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Option<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return None;
            }
            data.extend_from_slice(row);
        }
        Some(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// True when either dimension is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Value at `(r, c)`.
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    #[must_use]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        debug_assert!(r < self.rows && c < self.cols);
        self.data[r * self.cols + c]
    }

    /// Overwrites `(r, c)`.
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        debug_assert!(r < self.rows && c < self.cols);
        self.data[r * self.cols + c] = value;
    }

    /// Adds `delta` to `(r, c)`.
    pub fn add(&mut self, r: usize, c: usize, delta: f64) {
        debug_assert!(r < self.rows && c < self.cols);
        self.data[r * self.cols + c] += delta;
    }

    /// One row as a slice.
    #[must_use]
    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Iterates the rows as slices.
    pub fn row_iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks(0) panics, and a zero-column matrix still has rows
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Raw row-major values.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable raw row-major values.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Every value negated.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| -v).collect(),
        }
    }

    /// The transposed matrix.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(c, r, self.get(r, c));
            }
        }
        out
    }

    /// Sum of all values, reduced from per-row partial sums.
    #[must_use]
    pub fn sum(&self) -> f64 {
        if self.cols == 0 {
            return 0.0;
        }

        #[cfg(feature = "rayon")]
        let rows = self.data.par_chunks(self.cols);

        #[cfg(not(feature = "rayon"))]
        let rows = self.data.chunks(self.cols);

        let partials: Vec<f64> = rows.map(|row| row.iter().sum::<f64>()).collect();
        partials.iter().sum()
    }

    /// Largest absolute element-wise difference; `None` if the shapes differ.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> Option<f64> {
        if self.rows != other.rows || self.cols != other.cols {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max),
        )
    }

    /// Whether every value is finite.
    #[must_use]
    pub fn all_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_none());
        let m = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert_eq!(m.get(1, 0), 3.0);
    }

    #[test]
    fn test_transpose_and_negate() {
        let m = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0]]).unwrap();
        let t = m.transposed();
        assert_eq!((t.rows(), t.cols()), (3, 1));
        assert_eq!(t.get(2, 0), 3.0);
        assert_eq!(m.negated().row(0), &[-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_sum_and_diff() {
        let a = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let mut b = a.clone();
        b.add(0, 1, -0.5);
        assert_eq!(a.sum(), 10.0);
        assert_eq!(a.max_abs_diff(&b), Some(0.5));
        assert_eq!(a.max_abs_diff(&DenseMatrix::zeros(1, 1)), None);
        assert_eq!(DenseMatrix::zeros(3, 0).sum(), 0.0);
    }
}
