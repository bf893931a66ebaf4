use nalgebra::*;
use rand::Rng;
use rand::distributions::{Bernoulli, Distribution};
use std::fmt::{self, Display};
use super::{ProbError, Result};

/// Random vector of independent Bernoulli(p) components sharing the same
/// success probability. Realizations are arranged over rows, with entries
/// exactly 0.0 or 1.0.
#[derive(Debug, Clone)]
pub struct BernoulliVector {

    prob : f64,

    n_components : usize,

    distr : Bernoulli

}

impl BernoulliVector {

    pub fn new(prob : f64, n_components : usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&prob) {
            return Err(ProbError::InvalidProbability(prob));
        }
        let distr = Bernoulli::new(prob).map_err(|_| ProbError::InvalidProbability(prob) )?;
        Ok(Self { prob, n_components, distr })
    }

    pub fn prob(&self) -> f64 {
        self.prob
    }

    pub fn dim(&self) -> usize {
        self.n_components
    }

    /// Expected value of every component.
    pub fn mean(&self) -> DVector<f64> {
        DVector::from_element(self.n_components, self.prob)
    }

    /// Variance p(1-p) of every component.
    pub fn var(&self) -> DVector<f64> {
        DVector::from_element(self.n_components, self.prob * (1. - self.prob))
    }

    pub fn sample<R>(&self, rng : &mut R, n : usize) -> DMatrix<f64>
    where
        R : Rng + ?Sized
    {
        DMatrix::from_fn(n, self.n_components, |_, _| {
            if self.distr.sample(rng) { 1.0 } else { 0.0 }
        })
    }

}

impl Display for BernoulliVector {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bern({}; p = {})", self.n_components, self.prob)
    }

}
