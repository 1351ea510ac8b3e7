use super::{check_positive, KernelError, KernelParams};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Rational Quadratic Kernel
///
/// k(x_i, x_j) = variance * (1 + d(x_i, x_j)^2 / (2 alpha length_scale^2)) ^ -alpha
///
/// # Parameters
/// `length_scale` -- Length scale
/// `alpha` -- Mixture scale
/// `variance` -- Signal variance
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct RationalQuadratic {
    length_scale: f64,
    alpha: f64,
    variance: f64,
}

impl RationalQuadratic {
    pub(crate) const NAME: &'static str = "rational_quadratic";

    /// Create a new RationalQuadratic kernel
    pub fn new(
        length_scale: f64,
        alpha: f64,
        variance: f64,
    ) -> Result<Self, KernelError> {
        Ok(Self {
            length_scale: check_positive("length_scale", length_scale)?,
            alpha: check_positive("alpha", alpha)?,
            variance: check_positive("variance", variance)?,
        })
    }

    /// Create a new RationalQuadratic without checking values
    #[must_use]
    pub fn new_unchecked(length_scale: f64, alpha: f64, variance: f64) -> Self {
        Self {
            length_scale,
            alpha,
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
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[inline]
    #[must_use]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    #[inline]
    pub(crate) fn of_sq_distance(&self, d2: f64) -> f64 {
        let d = 2.0 * self.alpha * self.length_scale.powi(2);
        self.variance * (1.0 + d2 / d).powf(-self.alpha)
    }

    pub(crate) fn params(&self) -> KernelParams {
        KernelParams::default()
            .with_length_scale(self.length_scale)
            .with_alpha(self.alpha)
            .with_variance(self.variance)
    }

    pub(crate) fn set_params(
        &mut self,
        params: KernelParams,
    ) -> Result<(), KernelError> {
        params.check_supported(Self::NAME, false, true)?;
        *self = Self::new(
            params.length_scale.unwrap_or(self.length_scale),
            params.alpha.unwrap_or(self.alpha),
            params.variance.unwrap_or(self.variance),
        )?;
        Ok(())
    }
}

impl Default for RationalQuadratic {
    fn default() -> Self {
        Self {
            length_scale: 1.0,
            alpha: 1.0,
            variance: 1.0,
        }
    }
}
