//! Dense linear algebra: the [`Matrix`] container and Cholesky routines
mod cholesky;
mod matrix;

pub use cholesky::*;
pub use matrix::*;
