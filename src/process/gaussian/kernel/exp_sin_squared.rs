use super::{check_positive, KernelError, KernelParams};
use std::f64::consts::PI;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Periodic (exp-sine-squared) kernel
///
/// k(x_i, x_j) = variance * exp(-2 (sin(pi / periodicity * d(x_i, x_j)) / length_scale) ^ 2)
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct PeriodicKernel {
    length_scale: f64,
    periodicity: f64,
    variance: f64,
}

impl PeriodicKernel {
    pub(crate) const NAME: &'static str = "periodic";

    /// Create a new PeriodicKernel
    pub fn new(
        length_scale: f64,
        periodicity: f64,
        variance: f64,
    ) -> Result<Self, KernelError> {
        Ok(Self {
            length_scale: check_positive("length_scale", length_scale)?,
            periodicity: check_positive("periodicity", periodicity)?,
            variance: check_positive("variance", variance)?,
        })
    }

    /// Create a new PeriodicKernel without checking values
    #[must_use]
    pub fn new_unchecked(
        length_scale: f64,
        periodicity: f64,
        variance: f64,
    ) -> Self {
        Self {
            length_scale,
            periodicity,
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
    pub fn periodicity(&self) -> f64 {
        self.periodicity
    }

    #[inline]
    #[must_use]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    #[inline]
    pub(crate) fn of_sq_distance(&self, d2: f64) -> f64 {
        let d = d2.sqrt();
        let s = (PI * d / self.periodicity).sin() / self.length_scale;
        self.variance * (-2.0 * s * s).exp()
    }

    pub(crate) fn params(&self) -> KernelParams {
        KernelParams::default()
            .with_length_scale(self.length_scale)
            .with_periodicity(self.periodicity)
            .with_variance(self.variance)
    }

    pub(crate) fn set_params(
        &mut self,
        params: KernelParams,
    ) -> Result<(), KernelError> {
        params.check_supported(Self::NAME, true, false)?;
        *self = Self::new(
            params.length_scale.unwrap_or(self.length_scale),
            params.periodicity.unwrap_or(self.periodicity),
            params.variance.unwrap_or(self.variance),
        )?;
        Ok(())
    }
}

impl Default for PeriodicKernel {
    fn default() -> Self {
        Self {
            length_scale: 1.0,
            periodicity: 1.0,
            variance: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Kernel;
    use super::*;
    use crate::linalg::Matrix;

    #[test]
    fn periodic_repeats_every_period() {
        let kernel: Kernel = PeriodicKernel::new(1.0, 4.0, 2.0).unwrap().into();
        for shift in [4.0, 8.0, 12.0] {
            assert::close(kernel.compute(&[0.0], &[shift]), 2.0, 1E-12);
            assert::close(
                kernel.compute(&[0.0], &[1.0]),
                kernel.compute(&[0.0], &[1.0 + shift]),
                1E-12,
            );
        }
    }

    #[test]
    fn periodic_matches_closed_form() {
        // sin(pi / 2)^2 = 1 at half a period
        let kernel = PeriodicKernel::new(0.5, 2.0, 1.5).unwrap();
        let expected = 1.5 * (-2.0_f64 / 0.25).exp();
        assert::close(kernel.of_sq_distance(1.0), expected, 1E-14);
    }

    #[test]
    fn periodic_cross_covariance() {
        let kernel: Kernel = PeriodicKernel::default().into();

        let x = Matrix::from_column(&[-4.0, -3.0, -2.0, -1.0, 1.0]);
        let y = Matrix::from_column(
            &[-4.0_f64, -3.0, -2.0, -1.0, 1.0].map(|z| z.sin()),
        );

        let cov = kernel.covariance(&x, &y).unwrap();
        let expected_row = [0.38393897, 0.69210748, 0.85381081, 0.6335651, 0.6335651];
        for i in 0..5 {
            for (j, e) in expected_row.iter().enumerate() {
                assert::close(cov.get(i, j).unwrap(), *e, 1E-7);
            }
        }
    }

    #[test]
    fn periodic_parameters() {
        let mut kernel = PeriodicKernel::default();
        kernel
            .set_params(KernelParams::default().with_periodicity(3.0))
            .unwrap();
        assert_eq!(kernel.periodicity(), 3.0);
        assert_eq!(kernel.length_scale(), 1.0);
        assert!(kernel
            .set_params(KernelParams::default().with_alpha(1.0))
            .is_err());
    }
}
