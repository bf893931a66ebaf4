use nalgebra::*;
use crate::prob::*;

fn check_means(m1 : &DVector<f64>, m2 : &DVector<f64>) -> Result<()> {
    if m1.nrows() != m2.nrows() {
        return Err(ProbError::DimensionMismatch(m1.nrows(), m2.nrows()));
    }
    Ok(())
}

/// Mahalanobis distance sqrt((m1 - m2)^T Σ^{-1} (m1 - m2)) between two points relative
/// to the covariance Σ. The square-rooted form is returned (a true metric for a fixed Σ);
/// square it if the quadratic form is needed. A singular Σ fails with SingularCovariance;
/// an invertible Σ that is asymmetric or indefinite fails with NotPositiveDefinite.
pub fn mahalanobis(m1 : &DVector<f64>, m2 : &DVector<f64>, sigma : &DMatrix<f64>) -> Result<f64> {
    check_means(m1, m2)?;
    check_shape(m1, sigma)?;
    let prec = invert(sigma)?;
    cholesky_lower(sigma)?;
    let diff = m1 - m2;

    // Σ^{-1} is positive-definite here, so only rounding takes q below zero.
    Ok(quadratic_form(&diff, &prec).max(0.0).sqrt())
}

/// Whether sigma admits a Cholesky factor (finite, symmetric and positive-definite).
fn is_pd(sigma : &DMatrix<f64>) -> bool {
    cholesky_lower(sigma).is_ok()
}

/// Bhattacharyya distance between N(m1, Σ1) and N(m2, Σ2):
///
/// (1/8) (m1 - m2)^T Σ^{-1} (m1 - m2) + (1/2) ln( det Σ / sqrt(det Σ1 det Σ2) ), Σ = (Σ1 + Σ2) / 2.
///
/// Shape disagreements are errors. Degenerate covariances (any of Σ1, Σ2 or Σ not
/// positive-definite, a non-positive determinant, or Σ numerically singular) saturate
/// at +inf, the limit of the distance as the overlap of the two distributions vanishes.
pub fn bhattacharyya(
    m1 : &DVector<f64>,
    sigma1 : &DMatrix<f64>,
    m2 : &DVector<f64>,
    sigma2 : &DMatrix<f64>
) -> Result<f64> {
    check_means(m1, m2)?;
    check_shape(m1, sigma1)?;
    check_shape(m2, sigma2)?;
    let avg = (sigma1 + sigma2).unscale(2.);
    if !(is_pd(sigma1) && is_pd(sigma2) && is_pd(&avg)) {
        return Ok(f64::INFINITY);
    }
    let det1 = determinant(sigma1)?;
    let det2 = determinant(sigma2)?;
    let det_avg = determinant(&avg)?;
    if !(det1 > 0.0 && det2 > 0.0 && det_avg > 0.0) {
        return Ok(f64::INFINITY);
    }
    let prec = match invert(&avg) {
        Ok(prec) => prec,
        Err(ProbError::SingularCovariance) => return Ok(f64::INFINITY),
        Err(e) => return Err(e)
    };
    let diff = m1 - m2;
    let mean_term = 0.125 * quadratic_form(&diff, &prec);
    let cov_term = 0.5 * (det_avg / (det1 * det2).sqrt()).ln();
    let dist = mean_term + cov_term;
    if dist.is_nan() {
        return Ok(f64::INFINITY);
    }

    // Both terms are non-negative for positive-definite inputs; clamp rounding noise.
    Ok(dist.max(0.0))
}
