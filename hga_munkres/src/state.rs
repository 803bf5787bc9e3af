//! Working state of one Munkres run.

use hga_common::DenseMatrix;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Costs at or below this magnitude count as zero.
pub(crate) const EPSILON: f64 = 1e-9;

/// Per-cell tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Mark {
    #[default]
    None,
    Starred,
    Primed,
}

/// Reduced costs, marks, covers and the augmenting path buffer.
///
/// Always oriented so that `rows <= cols`.
pub(crate) struct CostState {
    cost: DenseMatrix,
    marks: Vec<Mark>,
    row_covered: Vec<bool>,
    col_covered: Vec<bool>,
    path: Vec<(usize, usize)>,
}

impl CostState {
    #[contracts::debug_requires(cost.rows() <= cost.cols())]
    pub(crate) fn new(cost: DenseMatrix) -> Self {
        let (rows, cols) = (cost.rows(), cost.cols());
        Self {
            cost,
            marks: vec![Mark::None; rows * cols],
            row_covered: vec![false; rows],
            col_covered: vec![false; cols],
            path: Vec::new(),
        }
    }

    pub(crate) const fn rows(&self) -> usize {
        self.cost.rows()
    }

    pub(crate) const fn cols(&self) -> usize {
        self.cost.cols()
    }

    fn is_zero(&self, r: usize, c: usize) -> bool {
        self.cost.get(r, c).abs() <= EPSILON
    }

    fn mark(&self, r: usize, c: usize) -> Mark {
        self.marks[r * self.cols() + c]
    }

    fn set_mark(&mut self, r: usize, c: usize, mark: Mark) {
        let cols = self.cols();
        self.marks[r * cols + c] = mark;
    }

    fn star_in_row(&self, r: usize) -> Option<usize> {
        (0..self.cols()).find(|&c| self.mark(r, c) == Mark::Starred)
    }

    fn star_in_col(&self, c: usize) -> Option<usize> {
        (0..self.rows()).find(|&r| self.mark(r, c) == Mark::Starred)
    }

    fn prime_in_row(&self, r: usize) -> Option<usize> {
        (0..self.cols()).find(|&c| self.mark(r, c) == Mark::Primed)
    }

    fn clear_covers(&mut self) {
        self.row_covered.fill(false);
        self.col_covered.fill(false);
    }

    /// Subtracts each row's minimum from the row.
    pub(crate) fn reduce_rows(&mut self) {
        let cols = self.cols();
        if cols == 0 {
            return;
        }

        #[cfg(feature = "rayon")]
        let rows = self.cost.as_mut_slice().par_chunks_mut(cols);

        #[cfg(not(feature = "rayon"))]
        let rows = self.cost.as_mut_slice().chunks_mut(cols);

        rows.for_each(|row| {
            let min = row.iter().copied().fold(f64::INFINITY, f64::min);
            row.iter_mut().for_each(|v| *v -= min);
        });
    }

    /// Stars one zero per row and column, first come first served.
    pub(crate) fn star_zeros(&mut self) {
        for r in 0..self.rows() {
            for c in 0..self.cols() {
                if self.is_zero(r, c) && !self.row_covered[r] && !self.col_covered[c] {
                    self.set_mark(r, c, Mark::Starred);
                    self.row_covered[r] = true;
                    self.col_covered[c] = true;
                }
            }
        }
        self.clear_covers();
    }

    /// Covers every starred column; returns the number covered.
    pub(crate) fn cover_starred_columns(&mut self) -> usize {
        for c in 0..self.cols() {
            if self.star_in_col(c).is_some() {
                self.col_covered[c] = true;
            }
        }
        self.col_covered.iter().filter(|c| **c).count()
    }

    fn find_uncovered_zero(&self) -> Option<(usize, usize)> {
        (0..self.rows())
            .filter(|&r| !self.row_covered[r])
            .find_map(|r| {
                (0..self.cols())
                    .find(|&c| !self.col_covered[c] && self.is_zero(r, c))
                    .map(|c| (r, c))
            })
    }

    /// Primes uncovered zeros until one has no star in its row.
    ///
    /// Returns that prime, or `None` when no uncovered zero is left.
    pub(crate) fn prime_zeros(&mut self) -> Option<(usize, usize)> {
        while let Some((r, c)) = self.find_uncovered_zero() {
            self.set_mark(r, c, Mark::Primed);
            match self.star_in_row(r) {
                Some(star_col) => {
                    self.row_covered[r] = true;
                    self.col_covered[star_col] = false;
                }
                None => return Some((r, c)),
            }
        }
        None
    }

    /// Flips the alternating star/prime path that starts at `origin`.
    #[contracts::debug_requires(self.mark(origin.0, origin.1) == Mark::Primed)]
    pub(crate) fn augment(&mut self, origin: (usize, usize)) {
        self.path.clear();
        self.path.push(origin);
        while let Some(&(_, col)) = self.path.last() {
            let Some(star_row) = self.star_in_col(col) else {
                break;
            };
            self.path.push((star_row, col));
            let Some(prime_col) = self.prime_in_row(star_row) else {
                debug_assert!(false, "starred row {star_row} has no prime");
                break;
            };
            self.path.push((star_row, prime_col));
        }

        for i in 0..self.path.len() {
            let (r, c) = self.path[i];
            let flipped = match self.mark(r, c) {
                Mark::Starred => Mark::None,
                Mark::Primed | Mark::None => Mark::Starred,
            };
            self.set_mark(r, c, flipped);
        }
        for mark in &mut self.marks {
            if *mark == Mark::Primed {
                *mark = Mark::None;
            }
        }
        self.clear_covers();
    }

    /// Smallest cost over cells whose row and column are both uncovered.
    pub(crate) fn smallest_uncovered(&self) -> Option<f64> {
        (0..self.rows())
            .filter(|&r| !self.row_covered[r])
            .flat_map(|r| {
                (0..self.cols())
                    .filter(|&c| !self.col_covered[c])
                    .map(move |c| (r, c))
            })
            .map(|(r, c)| self.cost.get(r, c))
            .reduce(f64::min)
    }

    /// Adds `delta` to covered rows and subtracts it from uncovered columns.
    pub(crate) fn shift_costs(&mut self, delta: f64) {
        let cols = self.cols();
        let row_covered = &self.row_covered;
        let col_covered = &self.col_covered;

        #[cfg(feature = "rayon")]
        let rows = self.cost.as_mut_slice().par_chunks_mut(cols);

        #[cfg(not(feature = "rayon"))]
        let rows = self.cost.as_mut_slice().chunks_mut(cols);

        rows.enumerate().for_each(|(r, row)| {
            for (c, v) in row.iter_mut().enumerate() {
                if row_covered[r] {
                    *v += delta;
                }
                if !col_covered[c] {
                    *v -= delta;
                }
            }
        });
    }

    /// Each row's starred column.
    #[contracts::debug_ensures(ret.len() == self.rows())]
    pub(crate) fn assignment(&self) -> Vec<Option<usize>> {
        (0..self.rows()).map(|r| self.star_in_row(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(rows: &[[f64; 3]]) -> CostState {
        CostState::new(DenseMatrix::from_rows(rows).unwrap())
    }

    #[test]
    fn test_reduce_rows_zeroes_each_row() {
        let mut s = state(&[[4.0, 1.0, 3.0], [2.0, 0.0, 5.0], [3.0, 2.0, 2.0]]);
        s.reduce_rows();
        assert_eq!(s.cost.row(0), &[3.0, 0.0, 2.0]);
        assert_eq!(s.cost.row(2), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_star_zeros_one_per_line() {
        let mut s = state(&[[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0, 0.0]]);
        s.star_zeros();
        assert_eq!(s.assignment(), vec![Some(0), None, Some(2)]);
        assert!(s.row_covered.iter().all(|c| !c));
        assert_eq!(s.cover_starred_columns(), 2);
    }

    #[test]
    fn test_prime_then_augment() {
        let mut s = state(&[[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0, 0.0]]);
        s.star_zeros();
        s.cover_starred_columns();
        // (0,1) is primed and row 0 covered; (1,0) becomes reachable once col 0 is uncovered
        let origin = s.prime_zeros().unwrap();
        assert_eq!(origin, (1, 0));
        s.augment(origin);
        assert_eq!(s.assignment(), vec![Some(1), Some(0), Some(2)]);
    }

    #[test]
    fn test_shift_costs_hits_both_sides() {
        let mut s = state(&[[1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]]);
        s.row_covered[0] = true;
        s.col_covered[0] = true;
        assert_eq!(s.smallest_uncovered(), Some(1.0));
        s.shift_costs(0.5);
        assert_eq!(s.cost.row(0), &[1.5, 1.0, 1.0]);
        assert_eq!(s.cost.row(1), &[1.0, 0.5, 0.5]);
    }
}
