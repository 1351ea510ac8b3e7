use rand::Rng;
use thiserror::Error;

use super::standard_normal_vec;
use crate::consts::{HALF_LN_2PI, LN_2PI};
use crate::linalg::{Cholesky, LinalgError, Matrix};
use crate::traits::Sampleable;

/// Errors from constructing an [`MvGaussian`]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MvGaussianError {
    /// The number of dimensions in μ and Σ differ
    #[error("number of dimensions in μ ({mu}) and Σ ({cov}) must match")]
    MuCovDimensionMismatch { mu: usize, cov: usize },
    /// Σ is not square
    #[error("Σ must be square, got {rows}x{columns}")]
    CovNotSquare { rows: usize, columns: usize },
    /// Requested zero dimensions
    #[error("ndims must be >= 1")]
    ZeroDimensions,
    /// Σ is not positive definite
    #[error("failed to compute Cholesky decomposition: {0}")]
    Cholesky(#[source] LinalgError),
}

/// [Multivariate Gaussian/Normal Distribution](https://en.wikipedia.org/wiki/Multivariate_normal_distribution),
/// 𝒩(μ, Σ).
///
/// The Cholesky factor of Σ is computed once, on construction, so repeated
/// draws cost a triangular matrix-vector product each.
///
/// # Example
///
/// ```
/// use gpcomp::dist::MvGaussian;
/// use gpcomp::linalg::Matrix;
/// use gpcomp::traits::Sampleable;
///
/// let cov = Matrix::from_rows(&[[1.0, 0.9], [0.9, 1.0]]).unwrap();
/// let mvg = MvGaussian::new(vec![0.0, 10.0], cov).unwrap();
///
/// let mut rng = rand::thread_rng();
/// let xs = mvg.sample(5, &mut rng);
/// assert!(xs.iter().all(|x| x.len() == 2));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MvGaussian {
    /// Mean vector
    mu: Vec<f64>,
    /// Covariance matrix
    cov: Matrix,
    /// Lower Cholesky factor of `cov`
    chol: Cholesky,
}

impl MvGaussian {
    pub fn new(mu: Vec<f64>, cov: Matrix) -> Result<Self, MvGaussianError> {
        if !cov.is_square() {
            Err(MvGaussianError::CovNotSquare {
                rows: cov.rows(),
                columns: cov.columns(),
            })
        } else if mu.len() != cov.rows() {
            Err(MvGaussianError::MuCovDimensionMismatch {
                mu: mu.len(),
                cov: cov.rows(),
            })
        } else {
            let chol = Cholesky::new(&cov).map_err(MvGaussianError::Cholesky)?;
            Ok(Self { mu, cov, chol })
        }
    }

    /// Standard multivariate normal, 𝒩(0, I), in `dims` dimensions
    pub fn standard(dims: usize) -> Result<Self, MvGaussianError> {
        if dims < 1 {
            Err(MvGaussianError::ZeroDimensions)
        } else {
            Self::new(vec![0.0; dims], Matrix::identity(dims))
        }
    }

    #[inline]
    #[must_use]
    pub fn ndims(&self) -> usize {
        self.mu.len()
    }

    #[inline]
    #[must_use]
    pub fn mu(&self) -> &[f64] {
        &self.mu
    }

    #[inline]
    #[must_use]
    pub fn cov(&self) -> &Matrix {
        &self.cov
    }

    /// Log density at `x`
    pub fn ln_f(&self, x: &[f64]) -> Result<f64, LinalgError> {
        if x.len() != self.ndims() {
            return Err(LinalgError::DimensionMismatch {
                expected: self.ndims(),
                found: x.len(),
            });
        }
        let diff: Vec<f64> =
            x.iter().zip(self.mu.iter()).map(|(a, b)| a - b).collect();
        let z = self.chol.solve_lower(&diff)?;
        let mahalanobis: f64 = z.iter().map(|v| v * v).sum();
        Ok(-(self.ndims() as f64) * HALF_LN_2PI
            - self.chol.half_ln_det()
            - 0.5 * mahalanobis)
    }

    /// Differential entropy
    #[must_use]
    pub fn entropy(&self) -> f64 {
        0.5 * (self.ndims() as f64) * (LN_2PI + 1.0) + self.chol.half_ln_det()
    }
}

impl Sampleable<Vec<f64>> for MvGaussian {
    fn draw<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        let z = standard_normal_vec(self.ndims(), rng);
        let l = self.chol.l();
        self.mu
            .iter()
            .enumerate()
            .map(|(i, m)| m + (0..=i).map(|k| l.at(i, k) * z[k]).sum::<f64>())
            .collect()
    }
}

/// Draw one vector from 𝒩(`mean`, `cov`) using the full covariance.
///
/// Factors `cov` on every call; build an [`MvGaussian`] to draw repeatedly.
pub fn sample_multivariate_normal<R: Rng>(
    mean: &[f64],
    cov: &Matrix,
    rng: &mut R,
) -> Result<Vec<f64>, MvGaussianError> {
    MvGaussian::new(mean.to_vec(), cov.clone()).map(|mvg| mvg.draw(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const TOL: f64 = 1E-12;

    fn nonstandard_cov() -> Matrix {
        Matrix::from_rows(&[
            [1.01742788, 0.36586652, -0.65620486],
            [0.36586652, 1.00564553, -0.42597261],
            [-0.65620486, -0.42597261, 1.27247972],
        ])
        .unwrap()
    }

    #[test]
    fn new() {
        assert!(MvGaussian::new(vec![0.0; 3], Matrix::identity(3)).is_ok());
    }

    #[test]
    fn new_should_reject_cov_too_big() {
        let mvg = MvGaussian::new(vec![0.0; 3], Matrix::identity(4));
        assert_eq!(
            mvg,
            Err(MvGaussianError::MuCovDimensionMismatch { mu: 3, cov: 4 })
        );
    }

    #[test]
    fn new_should_reject_cov_not_square() {
        let mvg = MvGaussian::new(vec![0.0; 3], Matrix::zeros(3, 2));
        assert!(matches!(mvg, Err(MvGaussianError::CovNotSquare { .. })));
    }

    #[test]
    fn new_should_reject_indefinite_cov() {
        let cov = Matrix::from_rows(&[[1.0, 2.0], [2.0, 1.0]]).unwrap();
        match MvGaussian::new(vec![0.0; 2], cov) {
            Err(err @ MvGaussianError::Cholesky(_)) => {
                assert!(err
                    .to_string()
                    .starts_with("failed to compute Cholesky decomposition"));
            }
            other => panic!("expected Cholesky error, got {:?}", other),
        }
    }

    #[test]
    fn standard_rejects_zero_dims() {
        assert_eq!(MvGaussian::standard(0), Err(MvGaussianError::ZeroDimensions));
    }

    #[test]
    fn ln_f_standard_x_zeros() {
        let mvg = MvGaussian::standard(3).unwrap();
        assert::close(mvg.ln_f(&[0.0; 3]).unwrap(), -2.756815599614018, TOL);
    }

    #[test]
    fn ln_f_standard_x_nonzeros() {
        let mvg = MvGaussian::standard(3).unwrap();
        assert::close(
            mvg.ln_f(&[0.5, 3.1, -6.2]).unwrap(),
            -26.906815599614021,
            TOL,
        );
    }

    #[test]
    fn ln_f_nonstandard_zeros() {
        let mvg = MvGaussian::new(vec![0.5, 3.1, -6.2], nonstandard_cov()).unwrap();
        assert::close(mvg.ln_f(&[0.0; 3]).unwrap(), -24.602370253215661, 1E-8);
    }

    #[test]
    fn ln_f_nonstandard_nonzeros() {
        let mvg = MvGaussian::new(vec![0.5, 3.1, -6.2], nonstandard_cov()).unwrap();
        assert::close(
            mvg.ln_f(&[0.5, 3.1, -6.2]).unwrap(),
            -2.5915350538112296,
            1E-8,
        );
    }

    #[test]
    fn ln_f_rejects_wrong_length() {
        let mvg = MvGaussian::standard(3).unwrap();
        assert!(mvg.ln_f(&[0.0, 1.0]).is_err());
    }

    #[test]
    fn standard_entropy() {
        let mvg = MvGaussian::standard(3).unwrap();
        assert::close(mvg.entropy(), 4.2568155996140185, TOL);
    }

    #[test]
    fn nonstandard_entropy() {
        let mvg = MvGaussian::new(vec![0.5, 3.1, -6.2], nonstandard_cov()).unwrap();
        assert::close(mvg.entropy(), 4.0915350538112305, 1E-8);
    }

    #[test]
    fn sample_returns_proper_number_of_draws() {
        let mvg = MvGaussian::new(vec![0.5, 3.1, -6.2], nonstandard_cov()).unwrap();
        let mut rng = SmallRng::seed_from_u64(0xABCD);
        let xs = mvg.sample(103, &mut rng);
        assert_eq!(xs.len(), 103);
        assert!(xs.iter().all(|x| x.len() == 3));
    }

    #[test]
    fn draws_reproduce_mean_and_covariance() {
        let cov = nonstandard_cov();
        let mu = vec![0.5, 3.1, -6.2];
        let mvg = MvGaussian::new(mu.clone(), cov.clone()).unwrap();
        let mut rng = SmallRng::seed_from_u64(0x1234);

        let n = 50_000;
        let xs = mvg.sample(n, &mut rng);
        let nf = n as f64;

        let mean: Vec<f64> = (0..3)
            .map(|i| xs.iter().map(|x| x[i]).sum::<f64>() / nf)
            .collect();
        for i in 0..3 {
            assert::close(mean[i], mu[i], 0.03);
            for j in 0..3 {
                let c = xs
                    .iter()
                    .map(|x| (x[i] - mean[i]) * (x[j] - mean[j]))
                    .sum::<f64>()
                    / nf;
                assert::close(c, cov.get(i, j).unwrap(), 0.04);
            }
        }
    }

    #[test]
    fn sample_multivariate_normal_degenerate_mean() {
        // Tiny covariance pins the draw to the mean
        let cov = Matrix::from_rows(&[[1E-16, 0.0], [0.0, 1E-16]]).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let x = sample_multivariate_normal(&[4.0, -2.0], &cov, &mut rng).unwrap();
        assert::close(x[0], 4.0, 1E-6);
        assert::close(x[1], -2.0, 1E-6);
    }
}
