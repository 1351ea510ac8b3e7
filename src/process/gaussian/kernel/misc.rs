use nalgebra::DMatrix;

/// Squared Euclidean distance between two equal-length points
#[inline]
pub fn sq_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Squared Euclidean distance between row `i` of `x1` and row `j` of `x2`.
/// Both matrices must have the same number of columns.
#[inline]
pub(crate) fn sq_euclidean_rows(
    x1: &DMatrix<f64>,
    i: usize,
    x2: &DMatrix<f64>,
    j: usize,
) -> f64 {
    x1.row(i)
        .iter()
        .zip(x2.row(j).iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum()
}
