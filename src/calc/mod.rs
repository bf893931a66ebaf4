use nalgebra::*;
use crate::prob::{ProbError, Result};

/// Distances between normal distributions (Mahalanobis and Bhattacharyya).
pub mod distance;

pub use distance::*;

/// Frobenius norm of a - b. Matrices of different shapes yield a DimensionMismatch
/// over the number of entries.
pub fn frobenius_distance(a : &DMatrix<f64>, b : &DMatrix<f64>) -> Result<f64> {
    if a.shape() != b.shape() {
        return Err(ProbError::DimensionMismatch(a.len(), b.len()));
    }
    Ok((a - b).norm())
}
