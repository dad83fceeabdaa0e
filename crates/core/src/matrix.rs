use std::ops::{Index, IndexMut};

use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView1, Axis};
use thiserror::Error;

/// Errors that can occur in dense matrix operations.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MatrixError {
    /// No usable pivot was found while eliminating a column.
    #[error("matrix is singular: pivot {pivot:e} in column {column}")]
    Singular { column: usize, pivot: f64 },

    /// The matrix or its inverse contains NaN or infinite entries.
    #[error("matrix contains non-finite values")]
    NonFinite,
}

/// A square matrix of `f64` values.
///
/// Indexing is `[(row, column)]` and 0-based. The view-factor and script-F
/// routines treat columns as sending surfaces and rows as receiving surfaces,
/// so the scaling helpers are named by the axis they act on.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix(Array2<f64>);

impl DenseMatrix {
    /// Creates an `n × n` matrix of zeros.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self(Array2::zeros((n, n)))
    }

    /// Creates an `n × n` identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self(Array2::eye(n))
    }

    /// Creates an `n × n` matrix from a function of `(row, column)`.
    pub fn from_fn(n: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        Self(Array2::from_shape_fn((n, n), |(r, c)| f(r, c)))
    }

    /// Creates a matrix from row arrays.
    #[must_use]
    pub fn from_rows<const N: usize>(rows: [[f64; N]; N]) -> Self {
        Self::from_fn(N, |r, c| rows[r][c])
    }

    /// Returns the number of rows (and columns).
    #[must_use]
    pub fn dim(&self) -> usize {
        self.0.nrows()
    }

    /// Returns the underlying array.
    #[must_use]
    pub fn as_array(&self) -> &Array2<f64> {
        &self.0
    }

    /// Returns a view of one column.
    #[must_use]
    pub fn column(&self, c: usize) -> ArrayView1<'_, f64> {
        self.0.column(c)
    }

    /// Returns a view of one row.
    #[must_use]
    pub fn row(&self, r: usize) -> ArrayView1<'_, f64> {
        self.0.row(r)
    }

    /// Returns the sum of every entry.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.0.sum()
    }

    /// Returns the sum of each column.
    #[must_use]
    pub fn column_sums(&self) -> Vec<f64> {
        self.0.sum_axis(Axis(0)).to_vec()
    }

    /// Returns the sum of each row.
    #[must_use]
    pub fn row_sums(&self) -> Vec<f64> {
        self.0.sum_axis(Axis(1)).to_vec()
    }

    /// Returns the largest absolute entry, or zero for an empty matrix.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.0.iter().fold(0.0, |max, v| max.max(v.abs()))
    }

    /// Returns a copy of the main diagonal.
    #[must_use]
    pub fn diagonal(&self) -> Vec<f64> {
        self.0.diag().to_vec()
    }

    /// Adds `values[i]` to entry `(i, i)`.
    pub fn add_to_diagonal(&mut self, values: &[f64]) {
        debug_assert_eq!(values.len(), self.dim());
        for (d, v) in self.0.diag_mut().iter_mut().zip(values) {
            *d += v;
        }
    }

    /// Multiplies column `c` by `factors[c]`.
    pub fn scale_columns(&mut self, factors: &[f64]) {
        debug_assert_eq!(factors.len(), self.dim());
        for (mut column, &f) in self.0.columns_mut().into_iter().zip(factors) {
            column *= f;
        }
    }

    /// Multiplies row `r` by `factors[r]`.
    pub fn scale_rows(&mut self, factors: &[f64]) {
        debug_assert_eq!(factors.len(), self.dim());
        for (mut row, &f) in self.0.rows_mut().into_iter().zip(factors) {
            row *= f;
        }
    }

    /// Multiplies every entry by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.0 *= factor;
    }

    /// Replaces the matrix with `(M + Mᵀ) / 2`.
    pub fn symmetrize(&mut self) {
        let transposed = self.0.t().to_owned();
        self.0 += &transposed;
        self.0 *= 0.5;
    }

    /// Sets entries with magnitude below `threshold` to zero.
    pub fn zero_below(&mut self, threshold: f64) {
        self.0
            .mapv_inplace(|v| if v.abs() < threshold { 0.0 } else { v });
    }

    /// Sets every entry to `value`.
    pub fn fill(&mut self, value: f64) {
        self.0.fill(value);
    }

    /// Returns the transpose.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self(self.0.t().to_owned())
    }

    /// Returns the largest `|M[r, c] - M[c, r]|`.
    #[must_use]
    pub fn max_asymmetry(&self) -> f64 {
        let n = self.dim();
        let mut max: f64 = 0.0;
        for r in 0..n {
            for c in (r + 1)..n {
                max = max.max((self.0[[r, c]] - self.0[[c, r]]).abs());
            }
        }
        max
    }

    /// Returns the inverse from an LU decomposition with partial pivoting.
    ///
    /// A pivot no larger than `n · ε · max|M|` is treated as zero.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Singular`] if the matrix has no usable pivot in
    /// some column, or [`MatrixError::NonFinite`] if the input or the computed
    /// inverse contains NaN or infinite values.
    pub fn invert(&self) -> Result<Self, MatrixError> {
        let n = self.dim();
        if self.0.iter().any(|v| !v.is_finite()) {
            return Err(MatrixError::NonFinite);
        }

        #[allow(clippy::cast_precision_loss)]
        let tolerance = self.max_abs() * f64::EPSILON * n as f64;

        let lu = DMatrix::from_fn(n, n, |r, c| self.0[[r, c]]).lu();
        if let Some((column, &pivot)) = lu
            .u()
            .diagonal()
            .iter()
            .enumerate()
            .find(|(_, pivot)| pivot.abs() <= tolerance)
        {
            return Err(MatrixError::Singular { column, pivot });
        }

        let inverse = lu.try_inverse().ok_or(MatrixError::Singular {
            column: n.saturating_sub(1),
            pivot: 0.0,
        })?;
        if inverse.iter().any(|v| !v.is_finite()) {
            return Err(MatrixError::NonFinite);
        }

        Ok(Self::from_fn(n, |r, c| inverse[(r, c)]))
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.0[[r, c]]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        &mut self.0[[r, c]]
    }
}
