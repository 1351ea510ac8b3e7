//! Gaussian Processes
//!
//! A [`GaussianProcessRegressor`] starts out unfitted. [`fit`] conditions it
//! on training data, after which it can predict a posterior mean and
//! uncertainty, draw posterior samples and score the fit. Draws from the
//! unconditioned prior are available in either state.
//!
//! There are two posterior samplers and they are not interchangeable:
//!
//! - [`sample_y`] draws every query point independently from its marginal
//!   posterior, N(mean, std²). Per-point distributions are right, but the
//!   correlation between query points is lost.
//! - [`sample_y_joint`] draws from the full posterior covariance, so
//!   neighboring query points move together.
//!
//! The prior samplers ([`sample_prior`], [`sample_prior_indices`]) always use
//! the full covariance.
//!
//! [`fit`]: GaussianProcessRegressor::fit
//! [`sample_y`]: GaussianProcessRegressor::sample_y
//! [`sample_y_joint`]: GaussianProcessRegressor::sample_y_joint
//! [`sample_prior`]: GaussianProcessRegressor::sample_prior
//! [`sample_prior_indices`]: GaussianProcessRegressor::sample_prior_indices
use log::{debug, warn};
use rand::Rng;
use thiserror::Error;

use crate::consts::HALF_LN_2PI;
use crate::dist::{sample_normal, MvGaussian, MvGaussianError};
use crate::linalg::{Cholesky, LinalgError, Matrix, MatrixError};
use crate::traits::Sampleable;

pub mod kernel;
use kernel::{Kernel, KernelError, KernelParams};

mod noise_model;
pub use noise_model::*;

/// Default diagonal jitter for full-covariance sampling
pub const DEFAULT_PRIOR_JITTER: f64 = 1E-6;

/// Predicted variances below this are reported before being clamped to zero
const NEGATIVE_VARIANCE_WARN: f64 = -1E-8;

/// Errors from fitting, predicting with or sampling from a Gaussian process
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GaussianProcessError {
    /// Prediction, posterior sampling or scoring before a successful `fit`
    #[error("the Gaussian process has not been fitted")]
    NotFitted,
    /// `fit` was given no training points
    #[error("training set must contain at least one point")]
    EmptyTrainingSet,
    /// `fit` was given different numbers of inputs and targets
    #[error("x has {x} rows but y has {y} values")]
    LengthMismatch { x: usize, y: usize },
    /// The regularized covariance is not positive definite
    #[error("failed to compute Cholesky decomposition: {0}")]
    Cholesky(#[source] LinalgError),
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error(transparent)]
    NoiseModel(#[from] NoiseModelError),
    #[error(transparent)]
    MvGaussian(#[from] MvGaussianError),
}

/// Posterior mean and standard deviation at a set of query points
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

/// Everything `fit` produces. Built whole and swapped in whole.
#[derive(Clone, Debug, PartialEq)]
struct Posterior {
    /// x values used in training
    x_train: Matrix,
    /// y values used in training
    y_train: Vec<f64>,
    /// Cholesky decomposition of K + noise
    chol: Cholesky,
    /// Dual coefficients of training data in kernel space
    alpha: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
enum FitState {
    Unfitted,
    Fitted(Posterior),
}

/// Gaussian process regression with a fixed kernel.
///
/// # Example
///
/// ```
/// use gpcomp::process::gaussian::GaussianProcessRegressor;
/// use gpcomp::process::gaussian::kernel::RbfKernel;
///
/// let kernel = RbfKernel::new(2.0, 1.0).unwrap();
/// let mut gp = GaussianProcessRegressor::new(kernel);
/// gp.fit(&[[0.0], [1.0], [2.0], [3.0]], &[0.0, 0.8, 1.6, 2.1]).unwrap();
///
/// let mean = gp.predict(&[[1.5]]).unwrap();
/// assert!(0.8 < mean[0] && mean[0] < 1.6);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianProcessRegressor {
    /// Covariance Kernel
    kernel: Kernel,
    /// Diagonal regularization of the training covariance
    noise_model: NoiseModel,
    /// Diagonal jitter for full-covariance sampling
    prior_jitter: f64,
    state: FitState,
}

impl GaussianProcessRegressor {
    /// An unfitted regressor with `alpha = 1e-10`
    pub fn new<K: Into<Kernel>>(kernel: K) -> Self {
        Self {
            kernel: kernel.into(),
            noise_model: NoiseModel::default(),
            prior_jitter: DEFAULT_PRIOR_JITTER,
            state: FitState::Unfitted,
        }
    }

    /// Add `alpha` to every diagonal entry of the training covariance
    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        self.with_noise_model(NoiseModel::Uniform(alpha))
    }

    #[must_use]
    pub fn with_noise_model(self, noise_model: NoiseModel) -> Self {
        Self {
            noise_model,
            ..self
        }
    }

    /// Diagonal jitter used when sampling from a full covariance
    #[must_use]
    pub fn with_prior_jitter(self, prior_jitter: f64) -> Self {
        Self {
            prior_jitter,
            ..self
        }
    }

    /// Return the kernel being used in this GP
    #[must_use]
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Replace some of the kernel's parameters.
    ///
    /// A successful update discards any fit, since the cached factor no
    /// longer matches the kernel. On error nothing changes.
    pub fn set_kernel_params(
        &mut self,
        params: KernelParams,
    ) -> Result<(), GaussianProcessError> {
        self.kernel.set_params(params)?;
        self.state = FitState::Unfitted;
        Ok(())
    }

    #[must_use]
    pub fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    #[must_use]
    pub fn prior_jitter(&self) -> f64 {
        self.prior_jitter
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        matches!(self.state, FitState::Fitted(_))
    }

    fn posterior(&self) -> Result<&Posterior, GaussianProcessError> {
        match &self.state {
            FitState::Fitted(posterior) => Ok(posterior),
            FitState::Unfitted => Err(GaussianProcessError::NotFitted),
        }
    }

    /// x values used in training
    pub fn x_train(&self) -> Result<&Matrix, GaussianProcessError> {
        self.posterior().map(|p| &p.x_train)
    }

    /// y values used in training
    pub fn y_train(&self) -> Result<&[f64], GaussianProcessError> {
        self.posterior().map(|p| p.y_train.as_slice())
    }

    /// Lower Cholesky factor of the regularized training covariance
    pub fn l(&self) -> Result<&Matrix, GaussianProcessError> {
        self.posterior().map(|p| p.chol.l())
    }

    /// Solution `v` of `(K + noise) v = y_train`
    pub fn alpha_vector(&self) -> Result<&[f64], GaussianProcessError> {
        self.posterior().map(|p| p.alpha.as_slice())
    }

    /// Condition on training inputs `x` (one feature vector per row) and
    /// targets `y`.
    ///
    /// Refitting discards the previous fit. If fitting fails, a previous
    /// fit is left in place.
    pub fn fit<X: AsRef<[f64]>>(
        &mut self,
        x: &[X],
        y: &[f64],
    ) -> Result<(), GaussianProcessError> {
        if x.is_empty() {
            return Err(GaussianProcessError::EmptyTrainingSet);
        }
        if x.len() != y.len() {
            return Err(GaussianProcessError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        let x_train = Matrix::from_rows(x)?;

        debug!(
            "fitting {} GP on {} points of dimension {}",
            self.kernel.name(),
            x_train.rows(),
            x_train.columns()
        );

        let mut k = self.kernel.call(&x_train, None)?;
        self.noise_model.add_noise_to_kernel(&mut k)?;

        let chol = Cholesky::new(&k).map_err(GaussianProcessError::Cholesky)?;
        let alpha = chol.solve(y).map_err(GaussianProcessError::Cholesky)?;

        self.state = FitState::Fitted(Posterior {
            x_train,
            y_train: y.to_vec(),
            chol,
            alpha,
        });
        Ok(())
    }

    fn test_matrix<X: AsRef<[f64]>>(
        posterior: &Posterior,
        x: &[X],
    ) -> Result<Matrix, GaussianProcessError> {
        let n_features = posterior.x_train.columns();
        if x.is_empty() {
            return Ok(Matrix::zeros(0, n_features));
        }
        let xs = Matrix::from_rows(x)?;
        if xs.columns() != n_features {
            return Err(
                KernelError::DimensionMismatch(n_features, xs.columns()).into()
            );
        }
        Ok(xs)
    }

    /// Posterior mean at each row of `x`
    pub fn predict<X: AsRef<[f64]>>(
        &self,
        x: &[X],
    ) -> Result<Vec<f64>, GaussianProcessError> {
        let posterior = self.posterior()?;
        let xs = Self::test_matrix(posterior, x)?;
        let k_star = self.kernel.call(&posterior.x_train, Some(&xs))?;
        Ok(k_star.tr_mul_vec(&posterior.alpha)?)
    }

    /// Posterior mean and standard deviation at each row of `x`
    pub fn predict_with_uncertainty<X: AsRef<[f64]>>(
        &self,
        x: &[X],
    ) -> Result<Prediction, GaussianProcessError> {
        let posterior = self.posterior()?;
        let xs = Self::test_matrix(posterior, x)?;
        let k_star = self.kernel.call(&posterior.x_train, Some(&xs))?;
        let mean = k_star.tr_mul_vec(&posterior.alpha)?;
        let std = self.compute_std(posterior, &xs, &k_star)?;
        Ok(Prediction { mean, std })
    }

    /// Marginal posterior standard deviation at each test point, from the
    /// cross-covariance `k_star` (training x test).
    fn compute_std(
        &self,
        posterior: &Posterior,
        xs: &Matrix,
        k_star: &Matrix,
    ) -> Result<Vec<f64>, GaussianProcessError> {
        let k_star_star = self.kernel.diag(xs);
        k_star_star
            .iter()
            .enumerate()
            .map(|(i, kss)| -> Result<f64, GaussianProcessError> {
                let v = posterior
                    .chol
                    .solve_lower(&k_star.column(i)?)
                    .map_err(GaussianProcessError::Cholesky)?;
                let variance = kss - v.iter().map(|x| x * x).sum::<f64>();
                if variance < NEGATIVE_VARIANCE_WARN {
                    warn!(
                        "clamping negative predictive variance {} at test \
                         point {}",
                        variance, i
                    );
                }
                Ok(variance.max(0.0).sqrt())
            })
            .collect()
    }

    /// Full posterior covariance between the rows of `x`:
    /// `K** - K*ᵗ (K + noise)⁻¹ K*`.
    pub fn predict_cov<X: AsRef<[f64]>>(
        &self,
        x: &[X],
    ) -> Result<Matrix, GaussianProcessError> {
        let posterior = self.posterior()?;
        let xs = Self::test_matrix(posterior, x)?;
        let k_star = self.kernel.call(&posterior.x_train, Some(&xs))?;

        // V = L⁻¹ K*, one column per test point
        let vs = (0..xs.rows())
            .map(|i| -> Result<Vec<f64>, GaussianProcessError> {
                posterior
                    .chol
                    .solve_lower(&k_star.column(i)?)
                    .map_err(GaussianProcessError::Cholesky)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let k_star_star = self.kernel.call(&xs, None)?;
        Ok(Matrix::from_fn(xs.rows(), xs.rows(), |i, j| {
            let vv: f64 = vs[i].iter().zip(vs[j].iter()).map(|(a, b)| a * b).sum();
            k_star_star.at(i, j) - vv
        }))
    }

    /// `n_samples` posterior draws at the rows of `x`, each point drawn
    /// independently from its marginal N(mean, std²).
    ///
    /// Samples have the right per-point distribution but no correlation
    /// between points; use [`sample_y_joint`](Self::sample_y_joint) for
    /// that.
    pub fn sample_y<X: AsRef<[f64]>, R: Rng>(
        &self,
        x: &[X],
        n_samples: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec<f64>>, GaussianProcessError> {
        let Prediction { mean, std } = self.predict_with_uncertainty(x)?;
        Ok((0..n_samples)
            .map(|_| {
                mean.iter()
                    .zip(std.iter())
                    .map(|(&m, &s)| sample_normal(m, s, rng))
                    .collect()
            })
            .collect())
    }

    /// `n_samples` posterior draws at the rows of `x` from the full
    /// posterior covariance, jittered by `prior_jitter`.
    pub fn sample_y_joint<X: AsRef<[f64]>, R: Rng>(
        &self,
        x: &[X],
        n_samples: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec<f64>>, GaussianProcessError> {
        let mean = self.predict(x)?;
        let mut cov = self.predict_cov(x)?;
        cov.add_to_diagonal(&vec![self.prior_jitter; cov.rows()])?;
        let mvg = MvGaussian::new(mean, cov)?;
        Ok(mvg.sample(n_samples, rng))
    }

    /// One draw from the zero-mean GP prior at the rows of `x`, using the
    /// full covariance plus `prior_jitter` on the diagonal. Does not require
    /// a fit.
    pub fn sample_prior<X: AsRef<[f64]>, R: Rng>(
        &self,
        x: &[X],
        rng: &mut R,
    ) -> Result<Vec<f64>, GaussianProcessError> {
        let xs = Matrix::from_rows(x)?;
        self.sample_prior_matrix(&xs, rng)
    }

    /// One draw from the GP prior over the index domain `[0, length)`.
    pub fn sample_prior_indices<R: Rng>(
        &self,
        length: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>, GaussianProcessError> {
        let indices: Vec<f64> = (0..length).map(|i| i as f64).collect();
        self.sample_prior_matrix(&Matrix::from_column(&indices), rng)
    }

    fn sample_prior_matrix<R: Rng>(
        &self,
        xs: &Matrix,
        rng: &mut R,
    ) -> Result<Vec<f64>, GaussianProcessError> {
        if xs.rows() == 0 {
            return Ok(Vec::new());
        }
        debug!(
            "sampling {} GP prior at {} points",
            self.kernel.name(),
            xs.rows()
        );
        let mut cov = self.kernel.call(xs, None)?;
        cov.add_to_diagonal(&vec![self.prior_jitter; xs.rows()])?;
        let mvg = MvGaussian::new(vec![0.0; xs.rows()], cov)?;
        Ok(mvg.draw(rng))
    }

    /// Log marginal likelihood of the training targets
    pub fn ln_marginal_likelihood(&self) -> Result<f64, GaussianProcessError> {
        let posterior = self.posterior()?;
        let n = posterior.y_train.len() as f64;
        let fit: f64 = posterior
            .y_train
            .iter()
            .zip(posterior.alpha.iter())
            .map(|(y, a)| y * a)
            .sum();
        Ok(-0.5 * fit - posterior.chol.half_ln_det() - n * HALF_LN_2PI)
    }
}
