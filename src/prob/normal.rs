use rand::Rng;
use rand::distributions::{Distribution, Uniform};
use rand_distr::StandardNormal;
use serde::{Serialize, Deserialize};
use std::fmt::{self, Display};
use super::{ProbError, Result};

/// Number of uniform terms of the canonical CLT generator. With twelve terms the
/// rescaling factor sqrt(k/12) is unity, so the draw is just the centered sum.
pub const CLT_TERMS : usize = 12;

/// Strategy used to produce independent standard-normal scalars. The samplers
/// never assume exact normality: Direct delegates to the Ziggurat generator of
/// rand_distr, while Clt approximates N(0,1) by the rescaled sum of k uniform
/// variates over [0,1), which matches the first two moments exactly but has
/// bounded support [-sqrt(3k), sqrt(3k)] and lighter tails for any finite k.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NormalSource {
    Direct,
    Clt { k : usize }
}

impl Default for NormalSource {

    fn default() -> Self {
        NormalSource::Direct
    }

}

impl NormalSource {

    /// CLT generator with the canonical number of terms.
    pub fn clt() -> Self {
        NormalSource::Clt { k : CLT_TERMS }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            NormalSource::Clt { k : 0 } => Err(ProbError::InvalidTermCount(0)),
            _ => Ok(())
        }
    }

    /// Returns size independent standard-normal draws. A zero size yields an empty vector.
    pub fn draw<R>(&self, rng : &mut R, size : usize) -> Result<Vec<f64>>
    where
        R : Rng + ?Sized
    {
        let mut z = vec![0.0; size];
        self.fill(rng, &mut z[..])?;
        Ok(z)
    }

    /// Overwrites every entry of dst with an independent standard-normal draw.
    pub fn fill<R>(&self, rng : &mut R, dst : &mut [f64]) -> Result<()>
    where
        R : Rng + ?Sized
    {
        match *self {
            NormalSource::Direct => {
                for z in dst.iter_mut() {
                    *z = rng.sample(StandardNormal);
                }
            },
            NormalSource::Clt { k } => {
                let clt = CltNormal::new(k)?;
                for z in dst.iter_mut() {
                    *z = clt.sample(rng);
                }
            }
        }
        Ok(())
    }

}

impl Display for NormalSource {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalSource::Direct => write!(f, "Direct"),
            NormalSource::Clt { k } => write!(f, "CLT(k = {})", k)
        }
    }

}

/// Approximate standard normal built from the Central Limit Theorem (Lévy form):
/// z = (sum(u_i) - k/2) / sqrt(k/12), u_i ~ U[0,1).
#[derive(Debug, Clone)]
pub struct CltNormal {

    terms : usize,

    uniform : Uniform<f64>,

    center : f64,

    scale : f64

}

impl CltNormal {

    pub fn new(terms : usize) -> Result<Self> {
        if terms == 0 {
            return Err(ProbError::InvalidTermCount(terms));
        }
        let k = terms as f64;
        Ok(Self {
            terms,
            uniform : Uniform::new(0.0, 1.0),
            center : k / 2.,
            scale : (k / 12.).sqrt()
        })
    }

    pub fn terms(&self) -> usize {
        self.terms
    }

}

impl Distribution<f64> for CltNormal {

    fn sample<R>(&self, rng : &mut R) -> f64
    where
        R : Rng + ?Sized
    {
        let mut s = 0.0;
        for _ in 0..self.terms {
            s += self.uniform.sample(rng);
        }
        (s - self.center) / self.scale
    }

}
