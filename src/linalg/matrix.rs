//! Dense, bounds-checked matrix of `f64`
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Errors from constructing or indexing a [`Matrix`]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MatrixError {
    /// A `(row, column)` pair fell outside of the matrix
    #[error(
        "index ({row}, {column}) out of bounds for {rows}x{columns} matrix"
    )]
    IndexOutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },
    /// A row index fell outside of `[0, rows)`
    #[error("row {row} out of bounds for matrix with {rows} rows")]
    RowOutOfBounds { row: usize, rows: usize },
    /// A column index fell outside of `[0, columns)`
    #[error("column {column} out of bounds for matrix with {columns} columns")]
    ColumnOutOfBounds { column: usize, columns: usize },
    /// The rows of a nested array do not all have the same length
    #[error("row {row} has {found} elements, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Two operands have incompatible shapes
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// A dense, rectangular matrix of `f64`.
///
/// Every accessor is checked: reading or writing outside of
/// `[0, rows) x [0, columns)` is an error rather than a clamp. Row and
/// column getters return copies.
///
/// # Example
///
/// ```
/// use gpcomp::linalg::Matrix;
///
/// let m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
/// assert_eq!(m.rows(), 3);
/// assert_eq!(m.columns(), 2);
/// assert_eq!(m.get(2, 1).unwrap(), 6.0);
/// assert_eq!(m.column(0).unwrap(), vec![1.0, 3.0, 5.0]);
/// assert!(m.get(3, 0).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Matrix {
    data: DMatrix<f64>,
}

impl Matrix {
    /// A `rows` x `columns` matrix filled with zeros
    #[must_use]
    pub fn zeros(rows: usize, columns: usize) -> Self {
        Self {
            data: DMatrix::zeros(rows, columns),
        }
    }

    /// The `n` x `n` identity
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self {
            data: DMatrix::identity(n, n),
        }
    }

    /// Deep-copy a nested array into a new matrix.
    ///
    /// Every row must have the same length as the first. An empty slice
    /// gives a `0 x 0` matrix.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, MatrixError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.as_ref().len());

        for (row, r) in rows.iter().enumerate() {
            let found = r.as_ref().len();
            if found != n_cols {
                return Err(MatrixError::RaggedRows {
                    row,
                    expected: n_cols,
                    found,
                });
            }
        }

        let data = DMatrix::from_fn(n_rows, n_cols, |i, j| rows[i].as_ref()[j]);
        Ok(Self { data })
    }

    /// A single-column matrix, one row per value. Handy for 1-D index
    /// domains.
    #[must_use]
    pub fn from_column(values: &[f64]) -> Self {
        Self {
            data: DMatrix::from_column_slice(values.len(), 1, values),
        }
    }

    /// Build a matrix by evaluating `f(row, column)` for every entry
    pub fn from_fn<F>(rows: usize, columns: usize, f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        Self {
            data: DMatrix::from_fn(rows, columns, f),
        }
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    #[must_use]
    pub fn columns(&self) -> usize {
        self.data.ncols()
    }

    /// `true` if the matrix has the same number of rows and columns
    #[inline]
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.rows() == self.columns()
    }

    fn check_index(&self, row: usize, column: usize) -> Result<(), MatrixError> {
        if row < self.rows() && column < self.columns() {
            Ok(())
        } else {
            Err(MatrixError::IndexOutOfBounds {
                row,
                column,
                rows: self.rows(),
                columns: self.columns(),
            })
        }
    }

    /// Read the entry at `(row, column)`
    pub fn get(&self, row: usize, column: usize) -> Result<f64, MatrixError> {
        self.check_index(row, column)?;
        Ok(self.data[(row, column)])
    }

    /// Overwrite the entry at `(row, column)`
    pub fn set(
        &mut self,
        row: usize,
        column: usize,
        value: f64,
    ) -> Result<(), MatrixError> {
        self.check_index(row, column)?;
        self.data[(row, column)] = value;
        Ok(())
    }

    /// A copy of row `row`
    pub fn row(&self, row: usize) -> Result<Vec<f64>, MatrixError> {
        if row < self.rows() {
            Ok(self.data.row(row).iter().copied().collect())
        } else {
            Err(MatrixError::RowOutOfBounds {
                row,
                rows: self.rows(),
            })
        }
    }

    /// A copy of column `column`
    pub fn column(&self, column: usize) -> Result<Vec<f64>, MatrixError> {
        if column < self.columns() {
            Ok(self.data.column(column).iter().copied().collect())
        } else {
            Err(MatrixError::ColumnOutOfBounds {
                column,
                columns: self.columns(),
            })
        }
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        Self {
            data: self.data.transpose(),
        }
    }

    /// Copy the entries out as a nested, row-major array
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data
            .row_iter()
            .map(|r| r.iter().copied().collect())
            .collect()
    }

    /// The main diagonal
    #[must_use]
    pub fn diagonal(&self) -> Vec<f64> {
        self.data.diagonal().iter().copied().collect()
    }

    /// Add `values[i]` to entry `(i, i)`.
    pub fn add_to_diagonal(&mut self, values: &[f64]) -> Result<(), MatrixError> {
        let n = self.rows().min(self.columns());
        if values.len() != n {
            return Err(MatrixError::DimensionMismatch {
                expected: n,
                found: values.len(),
            });
        }
        values
            .iter()
            .enumerate()
            .for_each(|(i, v)| self.data[(i, i)] += v);
        Ok(())
    }

    /// Matrix-vector product `A x`
    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>, MatrixError> {
        if x.len() != self.columns() {
            return Err(MatrixError::DimensionMismatch {
                expected: self.columns(),
                found: x.len(),
            });
        }
        let x = DVector::from_column_slice(x);
        Ok((&self.data * x).iter().copied().collect())
    }

    /// Matrix-vector product with the transpose, `Aᵗ x`
    pub fn tr_mul_vec(&self, x: &[f64]) -> Result<Vec<f64>, MatrixError> {
        if x.len() != self.rows() {
            return Err(MatrixError::DimensionMismatch {
                expected: self.rows(),
                found: x.len(),
            });
        }
        let x = DVector::from_column_slice(x);
        Ok(self.data.tr_mul(&x).iter().copied().collect())
    }

    /// Matrix product `A B`
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        if self.columns() != other.rows() {
            return Err(MatrixError::DimensionMismatch {
                expected: self.columns(),
                found: other.rows(),
            });
        }
        Ok(Self {
            data: &self.data * &other.data,
        })
    }

    /// Borrow the underlying nalgebra storage
    #[inline]
    #[must_use]
    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    #[must_use]
    pub fn into_dmatrix(self) -> DMatrix<f64> {
        self.data
    }

    /// Unchecked read for the numeric kernels in this crate, which only
    /// index within shapes they have already validated.
    #[inline]
    pub(crate) fn at(&self, row: usize, column: usize) -> f64 {
        self.data[(row, column)]
    }

    #[inline]
    pub(crate) fn at_mut(&mut self, row: usize, column: usize) -> &mut f64 {
        &mut self.data[(row, column)]
    }
}

impl From<DMatrix<f64>> for Matrix {
    fn from(data: DMatrix<f64>) -> Self {
        Self { data }
    }
}

impl From<Matrix> for DMatrix<f64> {
    fn from(m: Matrix) -> Self {
        m.data
    }
}
