#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::linalg::Matrix;

/// Default diagonal regularization
pub const DEFAULT_ALPHA: f64 = 1E-10;

/// Errors from applying a [`NoiseModel`]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NoiseModelError {
    #[error(
        "per point noise must be the same size as y_train (expected: \
         {expected}, got: {found})"
    )]
    SizeMismatch { expected: usize, found: usize },
    #[error("noise must be non-negative and finite, given: {0}")]
    InvalidNoise(f64),
}

/// Model of noise to use in Gaussian Process
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum NoiseModel {
    /// The same value is added to every diagonal entry
    Uniform(f64),
    /// A different value is added for each training point
    PerPoint(Vec<f64>),
}

impl Default for NoiseModel {
    fn default() -> Self {
        NoiseModel::Uniform(DEFAULT_ALPHA)
    }
}

impl NoiseModel {
    fn check(value: f64) -> Result<f64, NoiseModelError> {
        if value >= 0.0 && value.is_finite() {
            Ok(value)
        } else {
            Err(NoiseModelError::InvalidNoise(value))
        }
    }

    /// The values to add to the diagonal of an `n` x `n` covariance
    pub fn diagonal(&self, n: usize) -> Result<Vec<f64>, NoiseModelError> {
        match self {
            NoiseModel::Uniform(noise) => Ok(vec![Self::check(*noise)?; n]),
            NoiseModel::PerPoint(noise) => {
                if noise.len() == n {
                    noise.iter().map(|&v| Self::check(v)).collect()
                } else {
                    Err(NoiseModelError::SizeMismatch {
                        expected: n,
                        found: noise.len(),
                    })
                }
            }
        }
    }

    /// Enact the given noise model onto the given covariance matrix
    pub fn add_noise_to_kernel(
        &self,
        cov: &mut Matrix,
    ) -> Result<(), NoiseModelError> {
        let diag = self.diagonal(cov.rows())?;
        cov.add_to_diagonal(&diag)
            .map_err(|_| NoiseModelError::SizeMismatch {
                expected: cov.rows().min(cov.columns()),
                found: diag.len(),
            })
    }
}
