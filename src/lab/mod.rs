use nalgebra::*;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use serde::{Serialize, Deserialize};
use std::fmt::{self, Display};
use log::{debug, info};
use anyhow::Context;
use crate::prob::*;
use crate::fit::*;
use crate::calc::*;

/// Experiment description (serde/JSON).
pub mod config;

pub use config::*;

/// Group of classes a sample or distance refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Group {
    EqualCov,
    UnequalCov
}

impl Display for Group {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::EqualCov => write!(f, "equal covariance"),
            Group::UnequalCov => write!(f, "unequal covariance")
        }
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {

    /// Mahalanobis distance between the estimated means, relative to the true shared covariance.
    MahalanobisTrue,

    /// Mahalanobis distance between the estimated means, relative to the average of the two estimated covariances.
    MahalanobisPooled,

    /// Bhattacharyya distance between the two estimated distributions.
    Bhattacharyya

}

impl Display for Metric {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::MahalanobisTrue => write!(f, "Mahalanobis (true covariance)"),
            Metric::MahalanobisPooled => write!(f, "Mahalanobis (pooled estimate)"),
            Metric::Bhattacharyya => write!(f, "Bhattacharyya")
        }
    }

}

/// Distance between classes i and j (zero-based) of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceRecord {

    pub group : Group,

    pub metric : Metric,

    pub i : usize,

    pub j : usize,

    pub value : f64

}

/// Realizations and estimates of one normal class.
#[derive(Debug, Clone)]
pub struct ClassResult {

    pub group : Group,

    pub distr : MultiNormal,

    pub sample : DMatrix<f64>,

    pub estimate : Estimate

}

#[derive(Debug, Clone, Default)]
pub struct LabOutput {

    pub classes : Vec<ClassResult>,

    pub distances : Vec<DistanceRecord>,

    pub binary : Vec<DMatrix<f64>>

}

impl LabOutput {

    pub fn group(&self, group : Group) -> impl Iterator<Item=&ClassResult> {
        self.classes.iter().filter(move |c| c.group == group )
    }

}

/// Runs a full experiment, seeding the generator from the configuration.
pub fn run(config : &LabConfig) -> anyhow::Result<LabOutput> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy()
    };
    run_with(config, &mut rng)
}

/// Runs a full experiment drawing from the informed generator: samples every class,
/// estimates its parameters, measures the pairwise distances within each group and
/// draws the binary vectors.
pub fn run_with<R>(config : &LabConfig, rng : &mut R) -> anyhow::Result<LabOutput>
where
    R : Rng + ?Sized
{
    config.source.validate()?;
    let mut out = LabOutput::default();
    let mut estimator = MomentEstimator::new(config.divisor);

    let equal = config.equal_cov.as_ref().map(|g| g.classes() ).unwrap_or_default();
    info!("Sampling {} classes with equal covariance ({} samples each, {} generator)", equal.len(), config.n_samples, config.source);
    for (i, spec) in equal.iter().enumerate() {
        let class = sample_class(spec, Group::EqualCov, config, &mut estimator, rng)
            .with_context(|| format!("Equal covariance class {}", i + 1) )?;
        out.classes.push(class);
    }

    info!("Sampling {} classes with unequal covariance", config.unequal_cov.len());
    for (i, spec) in config.unequal_cov.iter().enumerate() {
        let class = sample_class(spec, Group::UnequalCov, config, &mut estimator, rng)
            .with_context(|| format!("Unequal covariance class {}", i + 1) )?;
        out.classes.push(class);
    }

    info!("Computing distances");
    out.distances = distances(&out)?;

    if let Some(spec) = &config.binary {
        info!("Sampling {} binary vectors (p = {})", spec.n_vectors, spec.probability);
        let bern = BernoulliVector::new(spec.probability, spec.n_components)?;
        for _ in 0..spec.n_vectors {
            out.binary.push(bern.sample(rng, config.n_samples));
        }
    }
    Ok(out)
}

fn sample_class<R>(
    spec : &ClassSpec,
    group : Group,
    config : &LabConfig,
    estimator : &mut MomentEstimator,
    rng : &mut R
) -> anyhow::Result<ClassResult>
where
    R : Rng + ?Sized
{
    let distr = MultiNormal::new(spec.mean_vector(), spec.cov_matrix()?)?;
    let sample = distr.sample(rng, &config.source, config.n_samples)?;
    let estimate = estimator.fit(&sample)?.clone();
    debug!("{} ({}): {}", distr, group, estimate);
    Ok(ClassResult { group, distr, sample, estimate })
}

fn distances(out : &LabOutput) -> anyhow::Result<Vec<DistanceRecord>> {
    let mut dists = Vec::new();
    let equal : Vec<_> = out.group(Group::EqualCov).collect();
    for (i, j) in pairs(equal.len()) {
        let (a, b) = (&equal[i].estimate, &equal[j].estimate);
        let true_cov = equal[i].distr.cov();
        let value = mahalanobis(&a.mean, &b.mean, true_cov)?;
        dists.push(DistanceRecord { group : Group::EqualCov, metric : Metric::MahalanobisTrue, i, j, value });
        let value = mahalanobis(&a.mean, &b.mean, &a.pooled(b)?)?;
        dists.push(DistanceRecord { group : Group::EqualCov, metric : Metric::MahalanobisPooled, i, j, value });
    }
    let unequal : Vec<_> = out.group(Group::UnequalCov).collect();
    for (i, j) in pairs(unequal.len()) {
        let (a, b) = (&unequal[i].estimate, &unequal[j].estimate);
        let value = bhattacharyya(&a.mean, &a.cov, &b.mean, &b.cov)?;
        dists.push(DistanceRecord { group : Group::UnequalCov, metric : Metric::Bhattacharyya, i, j, value });
    }
    for d in dists.iter() {
        debug!("{} {}-{} ({}): {}", d.metric, d.i + 1, d.j + 1, d.group, d.value);
    }
    Ok(dists)
}

fn pairs(n : usize) -> impl Iterator<Item=(usize, usize)> {
    (0..n).flat_map(move |i| ((i+1)..n).map(move |j| (i, j) ) )
}

#[cfg(test)]
mod tests {

    use super::*;

    fn seeded() -> LabConfig {
        let mut cfg = LabConfig::default();
        cfg.seed = Some(1234);
        cfg
    }

    #[test]
    fn default_experiment_shapes() {
        let out = run(&seeded()).unwrap();
        assert_eq!(out.group(Group::EqualCov).count(), 2);
        assert_eq!(out.group(Group::UnequalCov).count(), 3);
        assert!(out.classes.iter().all(|c| c.sample.shape() == (200, 2) ));
        assert_eq!(out.binary.len(), 2);
        assert!(out.binary.iter().all(|b| b.shape() == (200, 2) ));

        // One pair with two Mahalanobis variants; three Bhattacharyya pairs.
        assert_eq!(out.distances.len(), 5);
        let bd : Vec<_> = out.distances.iter().filter(|d| d.metric == Metric::Bhattacharyya ).collect();
        assert_eq!(bd.iter().map(|d| (d.i, d.j) ).collect::<Vec<_>>(), vec![(0, 1), (0, 2), (1, 2)]);
        assert!(out.distances.iter().all(|d| d.value.is_finite() && d.value > 0.0 ));
    }

    #[test]
    fn seeded_runs_repeat() {
        let a = run(&seeded()).unwrap();
        let b = run(&seeded()).unwrap();
        assert_eq!(a.classes[0].sample, b.classes[0].sample);
        assert_eq!(a.distances, b.distances);
        assert_eq!(a.binary, b.binary);
    }

    #[test]
    fn invalid_class_is_reported() {
        let mut cfg = seeded();
        cfg.unequal_cov[1].cov = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
        let err = run(&cfg).unwrap_err();
        assert!(format!("{:#}", err).contains("Unequal covariance class 2"));
        assert_eq!(err.downcast_ref::<ProbError>(), Some(&ProbError::NotPositiveDefinite));
    }

    #[test]
    fn pair_enumeration() {
        assert_eq!(pairs(0).count(), 0);
        assert_eq!(pairs(1).count(), 0);
        assert_eq!(pairs(4).count(), 6);
    }

}
