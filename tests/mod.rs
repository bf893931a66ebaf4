use nalgebra::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use randvec::prob::*;
use randvec::fit::*;
use randvec::calc::*;

const EPS : f64 = 1E-10;

fn identity_scenario(source : NormalSource) -> Estimate {
    let mn = MultiNormal::new(DVector::zeros(2), DMatrix::identity(2, 2)).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    let y = mn.sample(&mut rng, &source, 100_000).unwrap();
    Estimate::from_sample(&y, Divisor::Unbiased).unwrap()
}

#[test]
fn standard_bivariate_recovered() {
    for source in [NormalSource::Direct, NormalSource::clt()].iter() {
        let est = identity_scenario(*source);
        assert!(est.mean.iter().all(|m| m.abs() <= 0.02 ), "{}: {}", source, est.mean);
        let diff = &est.cov - DMatrix::<f64>::identity(2, 2);
        assert!(diff.iter().all(|d| d.abs() <= 0.05 ), "{}: {}", source, est.cov);
    }
}

#[test]
fn covariance_error_shrinks_with_sample_size() {
    let sigma = DMatrix::from_row_slice(2, 2, &[1.0, 0.3, 0.3, 0.8]);
    let mn = MultiNormal::new(DVector::from_row_slice(&[0.0, 0.0]), sigma.clone()).unwrap();
    let err = |n : usize| -> f64 {
        // Average over replicates to smooth the comparison.
        let mut rng = StdRng::seed_from_u64(77);
        let reps = 20;
        let mut total = 0.0;
        for _ in 0..reps {
            let y = mn.sample(&mut rng, &NormalSource::Direct, n).unwrap();
            let est = Estimate::from_sample(&y, Divisor::Unbiased).unwrap();
            total += frobenius_distance(&est.cov, &sigma).unwrap();
        }
        total / reps as f64
    };
    let small = err(1_000);
    let large = err(10_000);
    // Expected ratio sqrt(10) ~ 3.16.
    assert!(large < small / 2.0, "error at 1000 = {}, at 10000 = {}", small, large);
    assert!(large < 0.03);
}

#[test]
fn estimation_recovers_parameters() {
    let mu = DVector::from_row_slice(&[4.0, 1.0]);
    let sigma = DMatrix::from_row_slice(2, 2, &[0.6, 0.1, 0.1, 1.2]);
    let mn = MultiNormal::new(mu.clone(), sigma.clone()).unwrap();
    let mut rng = StdRng::seed_from_u64(8);
    let y = mn.sample(&mut rng, &NormalSource::Clt { k : 50 }, 50_000).unwrap();
    let mut estimator = MomentEstimator::default();
    let first = estimator.fit(&y).unwrap().clone();
    assert!((&first.mean - &mu).abs().max() < 0.03);
    assert!((&first.cov - &sigma).abs().max() < 0.05);

    // Repeated estimation over the same sample is bit-identical.
    let second = estimator.fit(&y).unwrap();
    assert_eq!(&first, second);
}

#[test]
fn mahalanobis_scenario() {
    let d = mahalanobis(
        &DVector::from_row_slice(&[0.0, 0.0]),
        &DVector::from_row_slice(&[3.0, 0.0]),
        &DMatrix::identity(2, 2)
    ).unwrap();
    assert!((d - 3.0).abs() < EPS);
}

#[test]
fn mahalanobis_metric_for_fixed_covariance() {
    let sigma = DMatrix::from_row_slice(2, 2, &[1.5, -0.4, -0.4, 0.7]);
    let mut rng = StdRng::seed_from_u64(99);
    let points = MultiNormal::new_standard(2).sample(&mut rng, &NormalSource::Direct, 30).unwrap();
    let p : Vec<DVector<f64>> = points.row_iter().map(|r| r.transpose() ).collect();
    for a in p.iter() {
        for b in p.iter() {
            let ab = mahalanobis(a, b, &sigma).unwrap();
            let ba = mahalanobis(b, a, &sigma).unwrap();
            assert!((ab - ba).abs() < EPS);
            assert_eq!(ab == 0.0, a == b);
            for c in p.iter().take(5) {
                let ac = mahalanobis(a, c, &sigma).unwrap();
                let cb = mahalanobis(c, b, &sigma).unwrap();
                assert!(ab <= ac + cb + EPS);
            }
        }
    }
}

#[test]
fn bhattacharyya_scenarios() {
    let m = DVector::from_row_slice(&[-1.0, 1.0]);
    let sigma = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5, 1.0]);
    assert!(bhattacharyya(&m, &sigma, &m, &sigma).unwrap().abs() < EPS);

    let m2 = DVector::from_row_slice(&[0.0, 1.0]);
    let sigma2 = DMatrix::from_row_slice(2, 2, &[0.25, 0.3, 0.3, 0.45]);
    let ab = bhattacharyya(&m, &sigma, &m2, &sigma2).unwrap();
    let ba = bhattacharyya(&m2, &sigma2, &m, &sigma).unwrap();
    assert!((ab - ba).abs() < EPS);
    assert!(ab > 0.0);
}

#[test]
fn degenerate_covariances() {
    let m1 = DVector::from_row_slice(&[0.0, 0.0]);
    let m2 = DVector::from_row_slice(&[1.0, 1.0]);
    let singular = DMatrix::from_row_slice(2, 2, &[2.0, 2.0, 2.0, 2.0]);
    assert_eq!(mahalanobis(&m1, &m2, &singular), Err(ProbError::SingularCovariance));
    let d = bhattacharyya(&m1, &singular, &m2, &singular).unwrap();
    assert!(!d.is_nan());
    assert_eq!(d, f64::INFINITY);

    // Indefinite with a positive determinant: det(-I) = 1.
    let neg = -DMatrix::<f64>::identity(2, 2);
    assert_eq!(mahalanobis(&m1, &m2, &neg), Err(ProbError::NotPositiveDefinite));
    let far = DVector::from_row_slice(&[5.0, 0.0]);
    assert_eq!(bhattacharyya(&m1, &neg, &far, &neg).unwrap(), f64::INFINITY);

    // Indefinite with a negative determinant, invertible.
    let saddle = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, -1.0]);
    assert_eq!(
        mahalanobis(&m1, &DVector::from_row_slice(&[1.0, 0.0]), &saddle),
        Err(ProbError::NotPositiveDefinite)
    );

    // Asymmetric but invertible, with a positive-definite lower triangle.
    let asymmetric = DMatrix::from_row_slice(2, 2, &[2.0, 0.5, 0.0, 1.0]);
    assert_eq!(mahalanobis(&m1, &m2, &asymmetric), Err(ProbError::NotPositiveDefinite));
    let id = DMatrix::<f64>::identity(2, 2);
    assert_eq!(bhattacharyya(&m1, &asymmetric, &m2, &id).unwrap(), f64::INFINITY);
    assert_eq!(bhattacharyya(&m1, &id, &m2, &asymmetric).unwrap(), f64::INFINITY);
}

#[test]
fn estimated_distributions_distance() {
    // Two classes sharing a covariance: the Bhattacharyya distance of the estimates
    // approaches one eighth of the squared Mahalanobis distance of the true means.
    let sigma = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5, 1.0]);
    let (mu1, mu2) = (DVector::from_row_slice(&[1.0, 0.0]), DVector::from_row_slice(&[-1.0, 1.0]));
    let mut rng = StdRng::seed_from_u64(31);
    let mut estimates = Vec::new();
    for mu in [mu1.clone(), mu2.clone()].iter() {
        let mn = MultiNormal::new(mu.clone(), sigma.clone()).unwrap();
        let y = mn.sample(&mut rng, &NormalSource::Direct, 50_000).unwrap();
        estimates.push(Estimate::from_sample(&y, Divisor::Unbiased).unwrap());
    }
    let expected = mahalanobis(&mu1, &mu2, &sigma).unwrap().powi(2) / 8.;
    let got = bhattacharyya(&estimates[0].mean, &estimates[0].cov, &estimates[1].mean, &estimates[1].cov).unwrap();
    assert!((got - expected).abs() < 0.02, "expected {}, got {}", expected, got);
}
