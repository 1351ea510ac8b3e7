//! Gaussian process regression and sampling for algorithmic composition.
//!
//! The engine works on plain `f64` vectors. A melody generator hands it an
//! index domain (`[0, 1, ..., n - 1]`) or `(index, value)` pairs from an
//! existing contour, and gets numbers back to quantize into pitches or
//! durations however it likes.
//!
//! # Example
//!
//! Interpolate a contour and draw a few variations of it.
//!
//! ```
//! use gpcomp::prelude::*;
//! use rand::SeedableRng;
//!
//! let kernel = RbfKernel::new(2.0, 4.0).unwrap();
//! let mut gp = GaussianProcessRegressor::new(kernel).with_alpha(1E-6);
//!
//! let x = [[0.0], [4.0], [8.0], [12.0]];
//! let y = [60.0, 64.0, 67.0, 72.0];
//! gp.fit(&x, &y).unwrap();
//!
//! let domain: Vec<[f64; 1]> = (0..16).map(|i| [i as f64]).collect();
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(0x1234);
//! let variations = gp.sample_y_joint(&domain, 3, &mut rng).unwrap();
//!
//! assert_eq!(variations.len(), 3);
//! assert!(variations.iter().all(|v| v.len() == 16));
//! ```

pub mod consts;
pub mod dist;
pub mod linalg;
pub mod prelude;
pub mod process;
pub mod traits;
