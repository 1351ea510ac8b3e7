//! Trait definitions
use rand::Rng;

/// A random object that can be drawn from
pub trait Sampleable<X> {
    /// Single draw
    ///
    /// # Example
    ///
    /// ```
    /// use gpcomp::dist::MvGaussian;
    /// use gpcomp::traits::Sampleable;
    ///
    /// let mvg = MvGaussian::standard(3).unwrap();
    /// let mut rng = rand::thread_rng();
    /// let x: Vec<f64> = mvg.draw(&mut rng);
    ///
    /// assert_eq!(x.len(), 3);
    /// ```
    fn draw<R: Rng>(&self, rng: &mut R) -> X;

    /// Multiple draws
    ///
    /// # Example
    ///
    /// ```
    /// use gpcomp::dist::MvGaussian;
    /// use gpcomp::traits::Sampleable;
    ///
    /// let mvg = MvGaussian::standard(2).unwrap();
    /// let mut rng = rand::thread_rng();
    /// let xs: Vec<Vec<f64>> = mvg.sample(22, &mut rng);
    ///
    /// assert_eq!(xs.len(), 22);
    /// ```
    fn sample<R: Rng>(&self, n: usize, mut rng: &mut R) -> Vec<X> {
        (0..n).map(|_| self.draw(&mut rng)).collect()
    }

    /// Create a never-ending iterator of samples
    fn sample_stream<'r, R: Rng>(
        &'r self,
        mut rng: &'r mut R,
    ) -> Box<dyn Iterator<Item = X> + 'r> {
        Box::new(std::iter::repeat_with(move || self.draw(&mut rng)))
    }
}
