use nalgebra::DMatrix;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Context;
use log::debug;
use crate::lab::{LabOutput, Group};

const WIDTH : u32 = 800;

const HEIGHT : u32 = 600;

/// Fraction of the data range added on each side of the plotting area.
const PAD : f64 = 0.05;

/// Range covering column col of every sample, padded so that no point lies on the border.
fn bounds(samples : &[&DMatrix<f64>], col : usize) -> Range<f64> {
    let (lo, hi) = samples.iter()
        .flat_map(|y| y.column(col).iter().cloned().collect::<Vec<_>>() )
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)) );
    if !lo.is_finite() || !hi.is_finite() {
        return -1.0..1.0;
    }
    let pad = if hi > lo { PAD * (hi - lo) } else { 1.0 };
    (lo - pad)..(hi + pad)
}

/// Draws the first two coordinates of each sample as a scatter plot, one color per sample,
/// with the coordinate axes through the origin when they fall inside the plotting area.
/// Samples with fewer than two columns are rejected.
pub fn scatter<P>(path : P, samples : &[&DMatrix<f64>]) -> anyhow::Result<()>
where
    P : AsRef<Path>
{
    let path = path.as_ref();
    if let Some(y) = samples.iter().find(|y| y.ncols() < 2 ) {
        return Err(anyhow::anyhow!("Scatter plot requires two coordinates (found {})", y.ncols()));
    }
    let (xs, ys) = (bounds(samples, 0), bounds(samples, 1));
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(xs.clone(), ys.clone())?;
    if ys.contains(&0.0) {
        chart.draw_series(std::iter::once(PathElement::new(vec![(xs.start, 0.0), (xs.end, 0.0)], &BLACK)))?;
    }
    if xs.contains(&0.0) {
        chart.draw_series(std::iter::once(PathElement::new(vec![(0.0, ys.start), (0.0, ys.end)], &BLACK)))?;
    }
    for (i, y) in samples.iter().enumerate() {
        let style = Palette99::pick(i).mix(0.6).filled();
        chart.draw_series(y.row_iter().map(|r| Circle::new((r[0], r[1]), 3, style) ))?;
    }
    root.present()
        .with_context(|| format!("Unable to write plot to {}", path.display()) )?;
    debug!("Saved scatter plot of {} samples to {}", samples.len(), path.display());
    Ok(())
}

/// Saves one scatter plot per non-empty normal group under dir: scatter_equal.svg and
/// scatter_unequal.svg. Groups whose classes are not at least bivariate are skipped.
pub fn save_plots<P>(dir : P, out : &LabOutput) -> anyhow::Result<Vec<PathBuf>>
where
    P : AsRef<Path>
{
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("Unable to create directory {}", dir.display()) )?;
    let mut paths = Vec::new();
    for (group, name) in [(Group::EqualCov, "scatter_equal.svg"), (Group::UnequalCov, "scatter_unequal.svg")].iter() {
        let samples : Vec<&DMatrix<f64>> = out.group(*group).map(|c| &c.sample ).collect();
        if samples.is_empty() || samples.iter().any(|y| y.ncols() < 2 ) {
            continue;
        }
        let path = dir.join(name);
        scatter(&path, &samples)?;
        paths.push(path);
    }
    Ok(paths)
}
