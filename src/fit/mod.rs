use nalgebra::*;
use serde::{Serialize, Deserialize};
use std::fmt::{self, Display};
use crate::prob::{MultiNormal, ProbError, Result};

/// Normalization of the centered cross-product sum when estimating a covariance.
///
/// Unbiased divides by N-1 and is the default: it is the estimator reported by
/// the sampling experiments of this crate and requires at least two samples.
/// MaxLikelihood divides by N (the biased, maximum-likelihood estimator), which
/// is defined for a single sample (yielding a zero matrix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Divisor {
    Unbiased,
    MaxLikelihood
}

impl Default for Divisor {

    fn default() -> Self {
        Divisor::Unbiased
    }

}

impl Divisor {

    /// Smallest sample size for which the covariance estimate is defined.
    pub fn min_samples(&self) -> usize {
        match self {
            Divisor::Unbiased => 2,
            Divisor::MaxLikelihood => 1
        }
    }

    fn value(&self, n : usize) -> f64 {
        match self {
            Divisor::Unbiased => (n - 1) as f64,
            Divisor::MaxLikelihood => n as f64
        }
    }

}

/// Column-wise arithmetic average of the N x p sample matrix y (samples over rows).
pub fn mean(y : &DMatrix<f64>) -> Result<DVector<f64>> {
    if y.nrows() < 1 {
        return Err(ProbError::InsufficientSamples(1, y.nrows()));
    }
    let mut m : DVector<f64> = DVector::zeros(y.ncols());
    for row in y.row_iter() {
        m += row.transpose();
    }
    Ok(m.unscale(y.nrows() as f64))
}

/// Covariance estimate (1/D) sum (y_i - m)(y_i - m)^T, with D given by the divisor.
pub fn covariance(y : &DMatrix<f64>, divisor : Divisor) -> Result<DMatrix<f64>> {
    let m = mean(y)?;
    covariance_around(y, &m, divisor)
}

fn covariance_around(y : &DMatrix<f64>, m : &DVector<f64>, divisor : Divisor) -> Result<DMatrix<f64>> {
    if y.nrows() < divisor.min_samples() {
        return Err(ProbError::InsufficientSamples(divisor.min_samples(), y.nrows()));
    }
    let mut centered = y.clone();
    for mut row in centered.row_iter_mut() {
        row -= m.transpose();
    }
    let cross = centered.transpose() * &centered;
    Ok(cross.unscale(divisor.value(y.nrows())))
}

/// Mean and covariance estimated from a single sample matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {

    pub mean : DVector<f64>,

    pub cov : DMatrix<f64>,

    /// Number of samples the estimate was derived from.
    pub n : usize

}

impl Estimate {

    pub fn from_sample(y : &DMatrix<f64>, divisor : Divisor) -> Result<Self> {
        let mean = mean(y)?;
        let cov = covariance_around(y, &mean, divisor)?;
        Ok(Self { mean, cov, n : y.nrows() })
    }

    /// Average of the covariance estimates of self and other, used as the common
    /// covariance when two classes are assumed to share it.
    pub fn pooled(&self, other : &Estimate) -> Result<DMatrix<f64>> {
        if self.cov.shape() != other.cov.shape() {
            return Err(ProbError::DimensionMismatch(self.cov.nrows(), other.cov.nrows()));
        }
        Ok((&self.cov + &other.cov).unscale(2.))
    }

    /// Distribution with the estimated parameters. Fails if the covariance
    /// estimate is not positive-definite (e.g. collinear samples).
    pub fn to_multinormal(&self) -> Result<MultiNormal> {
        MultiNormal::new(self.mean.clone(), self.cov.clone())
    }

}

impl Display for Estimate {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Estimate(n = {}; mean = {:?})", self.n, self.mean.as_slice())
    }

}

/// Trait shared by estimation algorithms, parametrized by the resulting distribution summary.
pub trait Estimator<D> {

    /// Runs the estimation over the informed sample matrix (samples over rows),
    /// returning a reference to the stored result.
    fn fit<'a>(&'a mut self, y : &DMatrix<f64>) -> Result<&'a D>;

    /// If fit(.) has been called successfully at least once, returns its last result.
    fn estimate<'a>(&'a self) -> Option<&'a D>;

}

/// Method-of-moments (and, with the MaxLikelihood divisor, maximum likelihood)
/// estimator for the normal mean and covariance.
#[derive(Debug, Clone, Default)]
pub struct MomentEstimator {

    divisor : Divisor,

    last : Option<Estimate>

}

impl MomentEstimator {

    pub fn new(divisor : Divisor) -> Self {
        Self { divisor, last : None }
    }

    pub fn divisor(&self) -> Divisor {
        self.divisor
    }

}

impl Estimator<Estimate> for MomentEstimator {

    fn fit<'a>(&'a mut self, y : &DMatrix<f64>) -> Result<&'a Estimate> {
        let est = Estimate::from_sample(y, self.divisor)?;
        Ok(&*self.last.insert(est))
    }

    fn estimate<'a>(&'a self) -> Option<&'a Estimate> {
        self.last.as_ref()
    }

}
