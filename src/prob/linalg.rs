use nalgebra::*;
use super::{ProbError, Result};

/// Relative tolerance under which mirrored entries (i,j) and (j,i) are taken as equal.
const SYMMETRY_TOL : f64 = 1E-9;

/// A matrix is taken as singular when the absolute value of its determinant falls below
/// this fraction of the product of its row norms (the Hadamard bound of the determinant).
const SINGULAR_TOL : f64 = 1E-12;

/// Returns the order of m, or a DimensionMismatch if m is not square.
pub fn check_square(m : &DMatrix<f64>) -> Result<usize> {
    if m.nrows() != m.ncols() {
        return Err(ProbError::DimensionMismatch(m.nrows(), m.ncols()));
    }
    Ok(m.nrows())
}

/// Verifies that sigma is a square matrix of the same order as the vector mu.
pub fn check_shape(mu : &DVector<f64>, sigma : &DMatrix<f64>) -> Result<()> {
    let n = check_square(sigma)?;
    if n != mu.nrows() {
        return Err(ProbError::DimensionMismatch(mu.nrows(), n));
    }
    Ok(())
}

pub fn is_symmetric(m : &DMatrix<f64>) -> bool {
    if m.nrows() != m.ncols() {
        return false;
    }
    for i in 0..m.nrows() {
        for j in (i+1)..m.ncols() {
            let (a, b) = (m[(i, j)], m[(j, i)]);
            let scale = a.abs().max(b.abs()).max(1.0);
            if (a - b).abs() > SYMMETRY_TOL * scale {
                return false;
            }
        }
    }
    true
}

/// Lower-triangular factor L satisfying L L^T = sigma. The Cholesky routine only reads
/// the lower triangle, so symmetry is verified separately: an asymmetric or indefinite
/// matrix (a pivot that would require the square root of a non-positive number)
/// yields NotPositiveDefinite.
pub fn cholesky_lower(sigma : &DMatrix<f64>) -> Result<DMatrix<f64>> {
    check_square(sigma)?;
    if sigma.iter().any(|s| !s.is_finite() ) || !is_symmetric(sigma) {
        return Err(ProbError::NotPositiveDefinite);
    }
    Cholesky::new(sigma.clone())
        .map(|chol| chol.unpack() )
        .ok_or(ProbError::NotPositiveDefinite)
}

/// Determinant via LU decomposition with partial pivoting.
pub fn determinant(m : &DMatrix<f64>) -> Result<f64> {
    check_square(m)?;
    Ok(LU::new(m.clone()).determinant())
}

/// Inverse via LU decomposition. Matrices whose determinant is numerically
/// zero relative to their scale are rejected with SingularCovariance, since
/// LU would otherwise happily return an inverse of enormous, meaningless entries.
pub fn invert(m : &DMatrix<f64>) -> Result<DMatrix<f64>> {
    check_square(m)?;
    if m.iter().any(|s| !s.is_finite() ) {
        return Err(ProbError::SingularCovariance);
    }
    let lu = LU::new(m.clone());
    let det = lu.determinant();
    let bound = m.row_iter().fold(1.0, |b, row| b * row.norm() );
    if !det.is_finite() || det.abs() <= SINGULAR_TOL * bound {
        return Err(ProbError::SingularCovariance);
    }
    lu.try_inverse().ok_or(ProbError::SingularCovariance)
}

/// Evaluates d^T m d.
pub fn quadratic_form(d : &DVector<f64>, m : &DMatrix<f64>) -> f64 {
    (d.transpose() * m * d)[0]
}

#[cfg(test)]
mod tests {

    use super::*;

    const EPS : f64 = 1E-10;

    #[test]
    fn cholesky_reconstructs_covariance() {
        let sigma = DMatrix::from_row_slice(3, 3, &[
            4.0, 2.0, 0.6,
            2.0, 2.0, 0.5,
            0.6, 0.5, 3.0
        ]);
        let low = cholesky_lower(&sigma).unwrap();
        for i in 0..3 {
            for j in (i+1)..3 {
                assert_eq!(low[(i, j)], 0.0);
            }
        }
        let rebuilt = &low * low.transpose();
        assert!((rebuilt - sigma).abs().max() < EPS);
    }

    #[test]
    fn cholesky_two_by_two_closed_form() {
        let sigma = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5, 1.0]);
        let low = cholesky_lower(&sigma).unwrap();
        assert!((low[(0, 0)] - 1.0).abs() < EPS);
        assert!((low[(1, 0)] - 0.5).abs() < EPS);
        assert!((low[(1, 1)] - 0.75f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn cholesky_rejects_invalid() {
        let indefinite = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert_eq!(cholesky_lower(&indefinite), Err(ProbError::NotPositiveDefinite));
        let asymmetric = DMatrix::from_row_slice(2, 2, &[0.3, 0.35, 0.1, 0.65]);
        assert_eq!(cholesky_lower(&asymmetric), Err(ProbError::NotPositiveDefinite));
        let nan = DMatrix::from_row_slice(2, 2, &[f64::NAN, 0.0, 0.0, 1.0]);
        assert_eq!(cholesky_lower(&nan), Err(ProbError::NotPositiveDefinite));
        let rect = DMatrix::zeros(2, 3);
        assert_eq!(cholesky_lower(&rect), Err(ProbError::DimensionMismatch(2, 3)));
    }

    #[test]
    fn inverse_and_determinant() {
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        assert!((determinant(&m).unwrap() - 5.0).abs() < EPS);
        let inv = invert(&m).unwrap();
        let ident = &m * inv;
        assert!((ident - DMatrix::identity(2, 2)).abs().max() < EPS);
    }

    #[test]
    fn singular_is_rejected() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(invert(&m), Err(ProbError::SingularCovariance));
        let zero = DMatrix::zeros(2, 2);
        assert_eq!(invert(&zero), Err(ProbError::SingularCovariance));
    }

    #[test]
    fn shape_checks() {
        let mu = DVector::zeros(3);
        let sigma = DMatrix::identity(2, 2);
        assert_eq!(check_shape(&mu, &sigma), Err(ProbError::DimensionMismatch(3, 2)));
        assert!(check_shape(&DVector::zeros(2), &sigma).is_ok());
    }

}
