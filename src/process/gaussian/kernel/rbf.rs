use super::{check_positive, KernelError, KernelParams};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Radial-basis function (RBF) kernel
/// The distance metric here is L2 (Euclidean).
///
/// ```math
///     K(\mathbf{x}, \mathbf{x'}) = \sigma^2 \exp\left(-\frac{\|\mathbf{x} - \mathbf{x'}\|^2}{2l^2}\right)
/// ```
///
/// # Parameters
/// * `length_scale` - Length scale, `l`.
/// * `variance` - Signal variance, `σ²`.
///
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct RbfKernel {
    length_scale: f64,
    variance: f64,
}

impl RbfKernel {
    pub(crate) const NAME: &'static str = "rbf";

    /// Create a new rbf kernel with the given length scale and variance
    pub fn new(length_scale: f64, variance: f64) -> Result<Self, KernelError> {
        Ok(Self {
            length_scale: check_positive("length_scale", length_scale)?,
            variance: check_positive("variance", variance)?,
        })
    }

    /// Create a new `RbfKernel` without checking parameters
    #[must_use]
    pub fn new_unchecked(length_scale: f64, variance: f64) -> Self {
        Self {
            length_scale,
            variance,
        }
    }

    #[inline]
    #[must_use]
    pub fn length_scale(&self) -> f64 {
        self.length_scale
    }

    #[inline]
    #[must_use]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    #[inline]
    pub(crate) fn of_sq_distance(&self, d2: f64) -> f64 {
        self.variance * (-0.5 * d2 / self.length_scale.powi(2)).exp()
    }

    pub(crate) fn params(&self) -> KernelParams {
        KernelParams::default()
            .with_length_scale(self.length_scale)
            .with_variance(self.variance)
    }

    pub(crate) fn set_params(
        &mut self,
        params: KernelParams,
    ) -> Result<(), KernelError> {
        params.check_supported(Self::NAME, false, false)?;
        *self = Self::new(
            params.length_scale.unwrap_or(self.length_scale),
            params.variance.unwrap_or(self.variance),
        )?;
        Ok(())
    }
}

impl Default for RbfKernel {
    fn default() -> Self {
        Self {
            length_scale: 1.0,
            variance: 1.0,
        }
    }
}
