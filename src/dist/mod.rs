//! Probability distributions used for sampling
use rand::Rng;
use rand_distr::StandardNormal;

mod mvg;
pub use mvg::*;

/// Draw from N(`mean`, `std`²).
///
/// # Example
///
/// ```
/// use gpcomp::dist::sample_normal;
///
/// let mut rng = rand::thread_rng();
/// // A zero standard deviation always gives back the mean
/// assert_eq!(sample_normal(3.0, 0.0, &mut rng), 3.0);
/// ```
pub fn sample_normal<R: Rng>(mean: f64, std: f64, rng: &mut R) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    std.mul_add(z, mean)
}

/// `n` independent standard normal draws
pub fn standard_normal_vec<R: Rng>(n: usize, rng: &mut R) -> Vec<f64> {
    rng.sample_iter(StandardNormal).take(n).collect()
}
