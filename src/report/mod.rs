use nalgebra::*;
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Context;
use crate::lab::*;

fn fmt_vector(v : &DVector<f64>) -> String {
    let entries : Vec<String> = v.iter().map(|x| format!("{:.4}", x) ).collect();
    format!("[{}]", entries.join(", "))
}

fn fmt_matrix(m : &DMatrix<f64>) -> String {
    let rows : Vec<String> = m.row_iter()
        .map(|r| {
            let entries : Vec<String> = r.iter().map(|x| format!("{:.4}", x) ).collect();
            format!("[{}]", entries.join(", "))
        })
        .collect();
    format!("[{}]", rows.join(",\n "))
}

/// Renders the experiment as a Markdown document: generation parameters, parameter
/// estimates, distances, binary sample frequencies, embedded plots and the list of data
/// files. Plot paths are written as given, so they should be relative to the report.
pub fn render(
    config : &LabConfig,
    out : &LabOutput,
    files : &[PathBuf],
    plots : &[PathBuf]
) -> anyhow::Result<String> {
    let mut md = String::new();
    write_markdown(&mut md, config, out, files, plots)?;
    Ok(md)
}

/// Writes the Markdown report into any formatting sink.
pub fn write_markdown<W>(
    md : &mut W,
    config : &LabConfig,
    out : &LabOutput,
    files : &[PathBuf],
    plots : &[PathBuf]
) -> fmt::Result
where
    W : Write
{
    writeln!(md, "# Random vector sampling report\n")?;
    writeln!(md, "- Samples per class: {}", config.n_samples)?;
    writeln!(md, "- Normal generator: {}", config.source)?;
    writeln!(md, "- Covariance divisor: {:?}", config.divisor)?;
    match config.seed {
        Some(seed) => writeln!(md, "- Seed: {}\n", seed)?,
        None => writeln!(md, "- Seed: none (system entropy)\n")?
    }

    for group in [Group::EqualCov, Group::UnequalCov].iter() {
        if out.group(*group).next().is_none() {
            continue;
        }
        writeln!(md, "## Classes with {}\n", group)?;
        for (i, class) in out.group(*group).enumerate() {
            writeln!(md, "### Class {}\n", i + 1)?;
            writeln!(md, "| | True | Estimate |")?;
            writeln!(md, "|---|---|---|")?;
            writeln!(md, "| Mean | `{}` | `{}` |",
                fmt_vector(class.distr.mean()), fmt_vector(&class.estimate.mean))?;
            writeln!(md, "\n**Covariance (true):**\n```\n{}\n```\n", fmt_matrix(class.distr.cov()))?;
            writeln!(md, "**Covariance (estimate):**\n```\n{}\n```\n", fmt_matrix(&class.estimate.cov))?;
        }
    }

    if !out.distances.is_empty() {
        writeln!(md, "## Distances between distributions\n")?;
        for d in out.distances.iter() {
            writeln!(md, "- **{}**, classes {} and {} ({}): {:.4}",
                d.metric, d.i + 1, d.j + 1, d.group, d.value)?;
        }
        writeln!(md)?;
    }

    if !out.binary.is_empty() {
        writeln!(md, "## Binary vectors\n")?;
        if let Some(spec) = &config.binary {
            writeln!(md, "Success probability: {}\n", spec.probability)?;
        }
        for (i, b) in out.binary.iter().enumerate() {
            let freq = b.row_mean().transpose();
            writeln!(md, "- Vector {}: observed frequencies `{}`", i + 1, fmt_vector(&freq))?;
        }
        writeln!(md)?;
    }

    if !plots.is_empty() {
        writeln!(md, "## Plots\n")?;
        for p in plots {
            let name = p.file_stem().map(|s| s.to_string_lossy().into_owned() ).unwrap_or_default();
            writeln!(md, "![{}]({})\n", name, p.display())?;
        }
    }

    if !files.is_empty() {
        writeln!(md, "## Data files\n")?;
        for f in files {
            writeln!(md, "- `{}`", f.display())?;
        }
    }
    Ok(())
}

pub fn save<P>(path : P, content : &str) -> anyhow::Result<()>
where
    P : AsRef<Path>
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Unable to write report to {}", path.display()) )
}
