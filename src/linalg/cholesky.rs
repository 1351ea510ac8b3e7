//! Cholesky factorization and triangular solves
use thiserror::Error;

use super::{Matrix, MatrixError};

/// Errors from factorizing or solving
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LinalgError {
    /// Cholesky requires a square input
    #[error("matrix must be square, got {rows}x{columns}")]
    NotSquare { rows: usize, columns: usize },
    /// The radicand for the diagonal entry at `index` was not positive
    #[error(
        "matrix is not positive definite: diagonal entry {index} has \
         radicand {radicand}"
    )]
    NotPositiveDefinite { index: usize, radicand: f64 },
    /// A triangular solve hit a zero on the diagonal
    #[error("zero pivot at diagonal entry {index}")]
    ZeroPivot { index: usize },
    /// The right-hand side does not match the system size
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

fn check_square(a: &Matrix) -> Result<usize, LinalgError> {
    if a.is_square() {
        Ok(a.rows())
    } else {
        Err(LinalgError::NotSquare {
            rows: a.rows(),
            columns: a.columns(),
        })
    }
}

fn check_rhs(n: usize, b: &[f64]) -> Result<(), LinalgError> {
    if b.len() == n {
        Ok(())
    } else {
        Err(LinalgError::DimensionMismatch {
            expected: n,
            found: b.len(),
        })
    }
}

/// Factor a symmetric positive-definite `a` into lower-triangular `L` with
/// `L Lᵗ = a`.
///
/// Only the lower triangle of `a` is read. The upper triangle of the
/// returned factor is zero.
///
/// # Example
///
/// ```
/// use gpcomp::linalg::{cholesky_decomposition, Matrix};
///
/// let a = Matrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]]).unwrap();
/// let l = cholesky_decomposition(&a).unwrap();
///
/// assert_eq!(l.get(0, 0).unwrap(), 2.0);
/// assert_eq!(l.get(1, 0).unwrap(), 1.0);
/// assert_eq!(l.get(0, 1).unwrap(), 0.0);
/// assert!((l.get(1, 1).unwrap() - 2.0_f64.sqrt()).abs() < 1E-12);
/// ```
pub fn cholesky_decomposition(a: &Matrix) -> Result<Matrix, LinalgError> {
    let n = check_square(a)?;
    let mut l = Matrix::zeros(n, n);

    for j in 0..n {
        let radicand =
            a.at(j, j) - (0..j).map(|k| l.at(j, k).powi(2)).sum::<f64>();
        // Also catches NaN
        if !(radicand > 0.0) {
            return Err(LinalgError::NotPositiveDefinite { index: j, radicand });
        }
        let ljj = radicand.sqrt();
        *l.at_mut(j, j) = ljj;

        for i in (j + 1)..n {
            let s: f64 = (0..j).map(|k| l.at(i, k) * l.at(j, k)).sum();
            *l.at_mut(i, j) = (a.at(i, j) - s) / ljj;
        }
    }

    Ok(l)
}

/// Solve `L x = b` for lower-triangular `L`, top to bottom.
pub fn forward_substitution(
    l: &Matrix,
    b: &[f64],
) -> Result<Vec<f64>, LinalgError> {
    let n = check_square(l)?;
    check_rhs(n, b)?;

    let mut x = vec![0.0; n];
    for i in 0..n {
        let lii = l.at(i, i);
        if lii == 0.0 {
            return Err(LinalgError::ZeroPivot { index: i });
        }
        let s: f64 = (0..i).map(|j| l.at(i, j) * x[j]).sum();
        x[i] = (b[i] - s) / lii;
    }
    Ok(x)
}

/// Solve `Lᵗ x = b` for lower-triangular `L`, bottom to top.
///
/// `L` is read in place; the transpose is never formed.
pub fn back_substitution(
    l: &Matrix,
    b: &[f64],
) -> Result<Vec<f64>, LinalgError> {
    let n = check_square(l)?;
    check_rhs(n, b)?;

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let lii = l.at(i, i);
        if lii == 0.0 {
            return Err(LinalgError::ZeroPivot { index: i });
        }
        let s: f64 = ((i + 1)..n).map(|j| l.at(j, i) * x[j]).sum();
        x[i] = (b[i] - s) / lii;
    }
    Ok(x)
}

/// Solve `(L Lᵗ) x = y` given the Cholesky factor `L`.
pub fn solve_cholesky(l: &Matrix, y: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let z = forward_substitution(l, y)?;
    back_substitution(l, &z)
}

/// Cached Cholesky factor of a symmetric positive-definite matrix
#[derive(Clone, Debug, PartialEq)]
pub struct Cholesky {
    l: Matrix,
}

impl Cholesky {
    /// Factor `a`
    pub fn new(a: &Matrix) -> Result<Self, LinalgError> {
        cholesky_decomposition(a).map(|l| Self { l })
    }

    /// The lower-triangular factor `L`
    #[inline]
    #[must_use]
    pub fn l(&self) -> &Matrix {
        &self.l
    }

    #[must_use]
    pub fn into_l(self) -> Matrix {
        self.l
    }

    /// Dimension of the factored matrix
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.l.rows()
    }

    /// Solve `A x = y`
    pub fn solve(&self, y: &[f64]) -> Result<Vec<f64>, LinalgError> {
        solve_cholesky(&self.l, y)
    }

    /// Solve `L x = b`
    pub fn solve_lower(&self, b: &[f64]) -> Result<Vec<f64>, LinalgError> {
        forward_substitution(&self.l, b)
    }

    /// `Σ ln L[i][i]`, which is half of `ln |A|`
    #[must_use]
    pub fn half_ln_det(&self) -> f64 {
        self.l.diagonal().iter().map(|x| x.ln()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOL: f64 = 1E-9;

    fn reconstruct(l: &Matrix) -> Matrix {
        l.matmul(&l.transpose()).unwrap()
    }

    fn assert_matrix_close(a: &Matrix, b: &Matrix, tol: f64) {
        assert_eq!((a.rows(), a.columns()), (b.rows(), b.columns()));
        for i in 0..a.rows() {
            for j in 0..a.columns() {
                assert::close(a.at(i, j), b.at(i, j), tol);
            }
        }
    }

    #[test]
    fn cholesky_known_3x3() {
        let a = Matrix::from_rows(&[
            [4.0, 12.0, -16.0],
            [12.0, 37.0, -43.0],
            [-16.0, -43.0, 98.0],
        ])
        .unwrap();
        let l = cholesky_decomposition(&a).unwrap();
        let expected = Matrix::from_rows(&[
            [2.0, 0.0, 0.0],
            [6.0, 1.0, 0.0],
            [-8.0, 5.0, 3.0],
        ])
        .unwrap();
        assert_matrix_close(&l, &expected, 1E-12);
        assert_matrix_close(&reconstruct(&l), &a, 1E-12);
    }

    #[test]
    fn cholesky_agrees_with_nalgebra() {
        let a = Matrix::from_rows(&[
            [2.0, -1.0, 0.0],
            [-1.0, 2.0, -1.0],
            [0.0, -1.0, 2.0],
        ])
        .unwrap();
        let ours = cholesky_decomposition(&a).unwrap();
        let theirs: Matrix = a
            .as_dmatrix()
            .clone()
            .cholesky()
            .expect("SPD")
            .unpack()
            .into();
        assert_matrix_close(&ours, &theirs, 1E-12);
    }

    #[test]
    fn cholesky_rejects_non_square() {
        let a = Matrix::zeros(2, 3);
        assert_eq!(
            cholesky_decomposition(&a),
            Err(LinalgError::NotSquare {
                rows: 2,
                columns: 3
            })
        );
    }

    #[test]
    fn cholesky_reports_failing_entry() {
        // Singular: second row is a copy of the first
        let a = Matrix::from_rows(&[[1.0, 1.0], [1.0, 1.0]]).unwrap();
        match cholesky_decomposition(&a) {
            Err(LinalgError::NotPositiveDefinite { index, .. }) => {
                assert_eq!(index, 1)
            }
            other => panic!("expected NotPositiveDefinite, got {:?}", other),
        }

        let a = Matrix::from_rows(&[[-1.0]]).unwrap();
        assert!(matches!(
            cholesky_decomposition(&a),
            Err(LinalgError::NotPositiveDefinite { index: 0, .. })
        ));
    }

    #[test]
    fn empty_matrix_factors_to_empty() {
        let l = cholesky_decomposition(&Matrix::zeros(0, 0)).unwrap();
        assert_eq!(l.rows(), 0);
    }

    #[test]
    fn solves_reject_wrong_rhs_length() {
        let l = Matrix::identity(3);
        assert_eq!(
            forward_substitution(&l, &[1.0, 2.0]),
            Err(LinalgError::DimensionMismatch {
                expected: 3,
                found: 2
            })
        );
        assert!(back_substitution(&l, &[1.0]).is_err());
    }

    #[test]
    fn zero_pivot_is_an_error() {
        let l = Matrix::from_rows(&[[1.0, 0.0], [1.0, 0.0]]).unwrap();
        assert_eq!(
            forward_substitution(&l, &[1.0, 1.0]),
            Err(LinalgError::ZeroPivot { index: 1 })
        );
    }

    #[test]
    fn solve_cholesky_solves_full_system() {
        let a = Matrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]]).unwrap();
        let chol = Cholesky::new(&a).unwrap();
        let x = chol.solve(&[2.0, 1.0]).unwrap();
        let ax = a.mul_vec(&x).unwrap();
        assert::close(ax[0], 2.0, 1E-12);
        assert::close(ax[1], 1.0, 1E-12);

        // ln|A| = ln 8
        assert::close(2.0 * chol.half_ln_det(), 8.0_f64.ln(), 1E-12);
    }

    /// A random SPD matrix `B Bᵗ + n I`
    fn spd(n: usize) -> impl Strategy<Value = Matrix> {
        proptest::collection::vec(-2.0..2.0_f64, n * n).prop_map(move |v| {
            let b = Matrix::from_fn(n, n, |i, j| v[i * n + j]);
            let mut a = b.matmul(&b.transpose()).unwrap();
            a.add_to_diagonal(&vec![n as f64; n]).unwrap();
            a
        })
    }

    /// A random lower-triangular matrix with a well-conditioned diagonal
    fn lower(n: usize) -> impl Strategy<Value = Matrix> {
        proptest::collection::vec(-2.0..2.0_f64, n * n).prop_map(move |v| {
            Matrix::from_fn(n, n, |i, j| {
                if i == j {
                    1.0 + v[i * n + j].abs()
                } else if j < i {
                    v[i * n + j]
                } else {
                    0.0
                }
            })
        })
    }

    proptest! {
        #[test]
        fn cholesky_round_trip(a in (1_usize..8).prop_flat_map(spd)) {
            let l = cholesky_decomposition(&a).unwrap();
            let r = reconstruct(&l);
            for i in 0..a.rows() {
                for j in 0..a.columns() {
                    prop_assert!((r.at(i, j) - a.at(i, j)).abs() <= TOL * a.at(i, j).abs().max(1.0));
                    if j > i {
                        prop_assert_eq!(l.at(i, j), 0.0);
                    }
                }
            }
        }

        #[test]
        fn forward_substitution_solves_lower_system(
            (l, b) in (1_usize..8).prop_flat_map(|n| {
                (lower(n), proptest::collection::vec(-5.0..5.0_f64, n))
            })
        ) {
            let x = forward_substitution(&l, &b).unwrap();
            let lx = l.mul_vec(&x).unwrap();
            for (u, v) in lx.iter().zip(b.iter()) {
                prop_assert!((u - v).abs() < 1E-8);
            }
        }

        #[test]
        fn back_substitution_solves_transposed_system(
            (l, b) in (1_usize..8).prop_flat_map(|n| {
                (lower(n), proptest::collection::vec(-5.0..5.0_f64, n))
            })
        ) {
            let x = back_substitution(&l, &b).unwrap();
            let ltx = l.tr_mul_vec(&x).unwrap();
            for (u, v) in ltx.iter().zip(b.iter()) {
                prop_assert!((u - v).abs() < 1E-8);
            }
        }
    }
}
