/// Random vector generation: standard-normal sources (direct or CLT-approximated),
/// correlated multivariate normals via Cholesky factors, independent Bernoulli vectors,
/// and the linear algebra they rest upon.
pub mod prob;

/// Estimation of mean vectors and covariance matrices from samples.
pub mod fit;

/// Distances between distributions (Mahalanobis and Bhattacharyya).
pub mod calc;

/// Sampling experiments: JSON configuration, sequencing of sampling, estimation
/// and distance computation over groups of classes.
pub mod lab;

/// Persistence of sample matrices as CSV files.
pub mod io;

/// Scatter plots of the generated samples (SVG).
pub mod plot;

/// Markdown rendering of experiment results.
pub mod report;
