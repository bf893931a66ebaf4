use thiserror::Error;

/// Dense linear algebra needed by the samplers and distance metrics
/// (Cholesky factor, LU determinant and inverse), with failures reported
/// as ProbError instead of NaN.
pub mod linalg;

pub use linalg::*;

mod normal;

pub use normal::*;

mod multinormal;

pub use multinormal::*;

mod bernoulli;

pub use bernoulli::*;

/// Failures of the sampling, estimation and distance routines. All of them are
/// deterministic functions of the informed arguments, so none is worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbError {

    #[error("Dimension mismatch: expected {0}, found {1}")]
    DimensionMismatch(usize, usize),

    #[error("Informed matrix is not symmetric positive-definite")]
    NotPositiveDefinite,

    #[error("Informed covariance matrix is singular")]
    SingularCovariance,

    #[error("Informed probability {0} outside [0, 1]")]
    InvalidProbability(f64),

    #[error("Insufficient samples: at least {0} required, found {1}")]
    InsufficientSamples(usize, usize),

    #[error("CLT generator requires at least one uniform term, found {0}")]
    InvalidTermCount(usize)

}

pub type Result<T> = std::result::Result<T, ProbError>;
