use nalgebra::*;
use rand::Rng;
use std::fmt::{self, Display};
use super::*;

/// Multivariate normal parametrized by μ (px1) and Σ (pxp). The lower Cholesky
/// factor L of Σ is computed once at construction, which is also where the
/// positive-definiteness of Σ is verified; sampling afterwards cannot fail
/// for numerical reasons.
///
/// Realizations are produced by the exact linear map x = μ + L z, where z is a vector
/// of independent unit-variance components: Cov(L z) = L I L^T = Σ. Whether z is
/// exactly normal or a CLT approximation is decided by the informed NormalSource.
#[derive(Debug, Clone)]
pub struct MultiNormal {

    mu : DVector<f64>,

    sigma : DMatrix<f64>,

    /// Lower triangular factor of sigma (matrix square root).
    low : DMatrix<f64>

}

impl MultiNormal {

    /// Builds a new multivariate distribution from a mu vector and positive-definite
    /// covariance matrix sigma.
    pub fn new(mu : DVector<f64>, sigma : DMatrix<f64>) -> Result<Self> {
        check_shape(&mu, &sigma)?;
        let low = cholesky_lower(&sigma)?;
        Ok(Self { mu, sigma, low })
    }

    /// Creates a centered multinormal with identity covariance of size p.
    pub fn new_standard(p : usize) -> Self {
        let mu = DVector::zeros(p);
        let sigma = DMatrix::identity(p, p);
        let low = sigma.clone();
        Self { mu, sigma, low }
    }

    pub fn dim(&self) -> usize {
        self.mu.nrows()
    }

    pub fn mean(&self) -> &DVector<f64> {
        &self.mu
    }

    pub fn cov(&self) -> &DMatrix<f64> {
        &self.sigma
    }

    pub fn lower(&self) -> &DMatrix<f64> {
        &self.low
    }

    /// Draws n independent realizations, arranged over the rows of the output.
    pub fn sample<R>(&self, rng : &mut R, source : &NormalSource, n : usize) -> Result<DMatrix<f64>>
    where
        R : Rng + ?Sized
    {
        let mut dst = DMatrix::zeros(n, self.dim());
        self.sample_into(rng, source, &mut dst)?;
        Ok(dst)
    }

    /// Overwrites every row of dst with an independent realization. The destination
    /// must have as many columns as the distribution dimension; any number of rows is accepted.
    pub fn sample_into<R>(&self, rng : &mut R, source : &NormalSource, dst : &mut DMatrix<f64>) -> Result<()>
    where
        R : Rng + ?Sized
    {
        if dst.ncols() != self.dim() {
            return Err(ProbError::DimensionMismatch(self.dim(), dst.ncols()));
        }

        // Populate destination with independent standard normal draws
        source.fill(rng, dst.as_mut_slice())?;

        let mut z : DVector<f64> = DVector::zeros(self.dim());
        let mut x : DVector<f64> = DVector::zeros(self.dim());
        for mut row in dst.row_iter_mut() {
            row.transpose_to(&mut z);

            // Scale by the lower Cholesky factor, then offset by mu
            self.low.mul_to(&z, &mut x);
            x += &self.mu;
            row.copy_from(&x.transpose());
        }
        Ok(())
    }

}

impl Display for MultiNormal {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MNorm({})", self.mu.nrows())
    }

}
