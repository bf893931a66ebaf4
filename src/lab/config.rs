use nalgebra::*;
use serde::{Serialize, Deserialize};
use std::path::Path;
use std::fs;
use anyhow::Context;
use crate::prob::NormalSource;
use crate::fit::Divisor;

/// Parameters of one normal class: mean vector and covariance matrix given as rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSpec {

    pub mean : Vec<f64>,

    pub cov : Vec<Vec<f64>>

}

impl ClassSpec {

    pub fn new(mean : &[f64], cov : &[&[f64]]) -> Self {
        Self { mean : mean.to_vec(), cov : cov.iter().map(|r| r.to_vec() ).collect() }
    }

    pub fn mean_vector(&self) -> DVector<f64> {
        DVector::from_row_slice(&self.mean)
    }

    pub fn cov_matrix(&self) -> anyhow::Result<DMatrix<f64>> {
        rows_to_matrix(&self.cov)
    }

}

/// Classes sharing a single covariance matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedCovGroup {

    pub cov : Vec<Vec<f64>>,

    pub means : Vec<Vec<f64>>

}

impl SharedCovGroup {

    pub fn classes(&self) -> Vec<ClassSpec> {
        self.means.iter()
            .map(|m| ClassSpec { mean : m.clone(), cov : self.cov.clone() })
            .collect()
    }

}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinarySpec {

    pub probability : f64,

    pub n_vectors : usize,

    pub n_components : usize

}

/// Full description of a sampling experiment, usually read from a JSON file:
///
/// ```json
/// {
///   "n_samples": 200,
///   "seed": 42,
///   "source": { "Clt": { "k": 12 } },
///   "divisor": "Unbiased",
///   "equal_cov": { "cov": [[1.0, 0.5], [0.5, 1.0]], "means": [[1.0, 0.0], [-1.0, 1.0]] },
///   "unequal_cov": [ { "mean": [0.0, 0.0], "cov": [[1.0, 0.3], [0.3, 0.8]] } ],
///   "binary": { "probability": 0.3, "n_vectors": 2, "n_components": 2 }
/// }
/// ```
///
/// A missing seed draws the generator state from system entropy, making the run
/// irreproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabConfig {

    pub n_samples : usize,

    #[serde(default)]
    pub seed : Option<u64>,

    #[serde(default)]
    pub source : NormalSource,

    #[serde(default)]
    pub divisor : Divisor,

    pub equal_cov : Option<SharedCovGroup>,

    #[serde(default)]
    pub unequal_cov : Vec<ClassSpec>,

    pub binary : Option<BinarySpec>

}

impl Default for LabConfig {

    fn default() -> Self {
        Self {
            n_samples : 200,
            seed : None,
            source : NormalSource::Direct,
            divisor : Divisor::Unbiased,
            equal_cov : Some(SharedCovGroup {
                cov : vec![vec![1.0, 0.5], vec![0.5, 1.0]],
                means : vec![vec![1.0, 0.0], vec![-1.0, 1.0]]
            }),
            unequal_cov : vec![
                ClassSpec::new(&[0.0, 0.0], &[&[1.0, 0.3], &[0.3, 0.8]]),
                ClassSpec::new(&[4.0, 1.0], &[&[0.6, 0.1], &[0.1, 1.2]]),
                ClassSpec::new(&[-3.0, 2.0], &[&[1.5, -0.4], &[-0.4, 0.7]])
            ],
            binary : Some(BinarySpec { probability : 0.3, n_vectors : 2, n_components : 2 })
        }
    }

}

impl LabConfig {

    pub fn load_from_path<P>(path : P) -> anyhow::Result<Self>
    where
        P : AsRef<Path>
    {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Unable to read configuration at {}", path.display()) )?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid configuration at {}", path.display()) )
    }

    pub fn from_json(content : &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

}

/// Builds a matrix from a vector of rows, which must all share the same length.
pub fn rows_to_matrix(rows : &[Vec<f64>]) -> anyhow::Result<DMatrix<f64>> {
    let ncols = rows.first().map(|r| r.len() ).unwrap_or(0);
    if rows.iter().any(|r| r.len() != ncols ) {
        return Err(anyhow::Error::msg("Matrix rows have different lengths"));
    }
    let data : Vec<f64> = rows.iter().flat_map(|r| r.iter().cloned() ).collect();
    Ok(DMatrix::from_row_slice(rows.len(), ncols, &data))
}
