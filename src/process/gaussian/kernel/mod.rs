//! Covariance kernels
//!
//! Every kernel here is stationary: its value depends only on the Euclidean
//! distance between the two points, and `k(x, x)` equals the kernel's
//! `variance`.

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::linalg::Matrix;

mod misc;
pub use self::misc::*;

mod rbf;
pub use self::rbf::*;
mod exp_sin_squared;
pub use self::exp_sin_squared::*;
mod rational_quadratic;
pub use self::rational_quadratic::*;

/// Errors from kernel construction and evaluation
#[derive(Clone, Debug, Error, PartialEq)]
pub enum KernelError {
    /// Parameter must be strictly positive and finite
    #[error("parameter {name} must be positive and finite, given: {given}")]
    ParameterOutOfBounds {
        /// Name of parameter
        name: &'static str,
        /// Value given
        given: f64,
    },
    /// The kernel does not have a parameter by this name
    #[error("{kernel} kernel has no parameter {name}")]
    UnsupportedParameter {
        kernel: &'static str,
        name: &'static str,
    },
    /// Inputs of different dimensionality
    #[error("points have different dimensions: {0} and {1}")]
    DimensionMismatch(usize, usize),
}

pub(crate) fn check_positive(
    name: &'static str,
    given: f64,
) -> Result<f64, KernelError> {
    if given > 0.0 && given.is_finite() {
        Ok(given)
    } else {
        Err(KernelError::ParameterOutOfBounds { name, given })
    }
}

/// A (possibly partial) set of named kernel parameters.
///
/// Returned in full by [`Kernel::params`]; passed with only the fields to
/// change to [`Kernel::set_params`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct KernelParams {
    pub length_scale: Option<f64>,
    pub variance: Option<f64>,
    pub periodicity: Option<f64>,
    pub alpha: Option<f64>,
}

impl KernelParams {
    #[must_use]
    pub fn with_length_scale(self, length_scale: f64) -> Self {
        Self {
            length_scale: Some(length_scale),
            ..self
        }
    }

    #[must_use]
    pub fn with_variance(self, variance: f64) -> Self {
        Self {
            variance: Some(variance),
            ..self
        }
    }

    #[must_use]
    pub fn with_periodicity(self, periodicity: f64) -> Self {
        Self {
            periodicity: Some(periodicity),
            ..self
        }
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: Some(alpha),
            ..self
        }
    }

    /// Reject any parameter set here that a kernel named `kernel` lacks.
    pub(crate) fn check_supported(
        &self,
        kernel: &'static str,
        has_periodicity: bool,
        has_alpha: bool,
    ) -> Result<(), KernelError> {
        if self.periodicity.is_some() && !has_periodicity {
            Err(KernelError::UnsupportedParameter {
                kernel,
                name: "periodicity",
            })
        } else if self.alpha.is_some() && !has_alpha {
            Err(KernelError::UnsupportedParameter {
                kernel,
                name: "alpha",
            })
        } else {
            Ok(())
        }
    }
}

/// Covariance function
///
/// # Example
///
/// ```
/// use gpcomp::linalg::Matrix;
/// use gpcomp::process::gaussian::kernel::{Kernel, RbfKernel};
///
/// let kernel: Kernel = RbfKernel::new(2.0, 1.0).unwrap().into();
/// assert_eq!(kernel.compute(&[1.0], &[1.0]), 1.0);
///
/// let xs = Matrix::from_column(&[0.0, 1.0, 2.0]);
/// let cov = kernel.call(&xs, None).unwrap();
/// assert_eq!((cov.rows(), cov.columns()), (3, 3));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum Kernel {
    /// Squared-exponential kernel
    Rbf(RbfKernel),
    /// Exp-sine-squared kernel
    Periodic(PeriodicKernel),
    /// Scale mixture of RBF kernels
    RationalQuadratic(RationalQuadratic),
}

impl Kernel {
    /// Name of the variant
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rbf(_) => RbfKernel::NAME,
            Self::Periodic(_) => PeriodicKernel::NAME,
            Self::RationalQuadratic(_) => RationalQuadratic::NAME,
        }
    }

    /// Evaluate the kernel at a squared distance
    #[inline]
    #[must_use]
    pub fn of_sq_distance(&self, d2: f64) -> f64 {
        match self {
            Self::Rbf(k) => k.of_sq_distance(d2),
            Self::Periodic(k) => k.of_sq_distance(d2),
            Self::RationalQuadratic(k) => k.of_sq_distance(d2),
        }
    }

    /// Covariance between two points.
    ///
    /// Points are assumed to have the same length; extra trailing
    /// coordinates of the longer point are ignored.
    #[must_use]
    pub fn compute(&self, x1: &[f64], x2: &[f64]) -> f64 {
        self.of_sq_distance(sq_euclidean(x1, x2))
    }

    /// `k(x, x)` for every `x`
    #[must_use]
    pub fn variance(&self) -> f64 {
        match self {
            Self::Rbf(k) => k.variance(),
            Self::Periodic(k) => k.variance(),
            Self::RationalQuadratic(k) => k.variance(),
        }
    }

    /// The full parameter set of this kernel
    #[must_use]
    pub fn params(&self) -> KernelParams {
        match self {
            Self::Rbf(k) => k.params(),
            Self::Periodic(k) => k.params(),
            Self::RationalQuadratic(k) => k.params(),
        }
    }

    /// Replace the parameters given in `params`, leaving the others as they
    /// are. Nothing changes unless every given value is valid.
    pub fn set_params(&mut self, params: KernelParams) -> Result<(), KernelError> {
        match self {
            Self::Rbf(k) => k.set_params(params),
            Self::Periodic(k) => k.set_params(params),
            Self::RationalQuadratic(k) => k.set_params(params),
        }
    }

    /// Cross-covariance matrix: entry `(i, j)` is `k(x1[i], x2[j])`.
    pub fn covariance(
        &self,
        x1: &Matrix,
        x2: &Matrix,
    ) -> Result<Matrix, KernelError> {
        if x1.columns() != x2.columns() {
            return Err(KernelError::DimensionMismatch(
                x1.columns(),
                x2.columns(),
            ));
        }
        let (a, b) = (x1.as_dmatrix(), x2.as_dmatrix());
        Ok(Matrix::from_fn(x1.rows(), x2.rows(), |i, j| {
            self.of_sq_distance(sq_euclidean_rows(a, i, b, j))
        }))
    }

    /// Covariance of `x1` against `x2`, or against itself when `x2` is
    /// `None`.
    pub fn call(
        &self,
        x1: &Matrix,
        x2: Option<&Matrix>,
    ) -> Result<Matrix, KernelError> {
        self.covariance(x1, x2.unwrap_or(x1))
    }

    /// The diagonal of `k(x, x)`
    #[must_use]
    pub fn diag(&self, x: &Matrix) -> Vec<f64> {
        vec![self.variance(); x.rows()]
    }
}

macro_rules! impl_from_variant {
    ($type: ty, $variant: ident) => {
        impl From<$type> for Kernel {
            fn from(k: $type) -> Self {
                Kernel::$variant(k)
            }
        }
    };
}

impl_from_variant!(RbfKernel, Rbf);
impl_from_variant!(PeriodicKernel, Periodic);
impl_from_variant!(RationalQuadratic, RationalQuadratic);
