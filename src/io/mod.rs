use nalgebra::*;
use std::path::{Path, PathBuf};
use std::fs;
use std::io::{Read, Write};
use anyhow::Context;
use log::debug;
use crate::lab::{LabOutput, Group};

/// Column names written to the header of a sample file: x1, x2, ..., xp.
fn header(ncols : usize) -> Vec<String> {
    (1..=ncols).map(|i| format!("x{}", i) ).collect()
}

/// Writes the sample matrix as CSV, one realization per record, preceded by a header.
pub fn write_samples_to<W>(dst : W, y : &DMatrix<f64>) -> anyhow::Result<()>
where
    W : Write
{
    let mut wtr = csv::Writer::from_writer(dst);
    wtr.write_record(header(y.ncols()))?;
    for row in y.row_iter() {
        wtr.write_record(row.iter().map(|v| v.to_string() ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Parses a sample matrix written by write_samples_to. All records must have as many
/// fields as the header.
pub fn read_samples_from<R>(src : R) -> anyhow::Result<DMatrix<f64>>
where
    R : Read
{
    let mut rdr = csv::Reader::from_reader(src);
    let ncols = rdr.headers()?.len();
    let mut data = Vec::new();
    let mut nrows = 0;
    for (ix, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Error parsing CSV record (Line {})", ix + 2) )?;
        for entry in record.iter() {
            let v : f64 = entry.trim().parse()
                .with_context(|| format!("Invalid number '{}' (Line {})", entry, ix + 2) )?;
            data.push(v);
        }
        nrows += 1;
    }
    Ok(DMatrix::from_row_slice(nrows, ncols, &data))
}

pub fn write_samples<P>(path : P, y : &DMatrix<f64>) -> anyhow::Result<()>
where
    P : AsRef<Path>
{
    let path = path.as_ref();
    let f = fs::File::create(path)
        .with_context(|| format!("Unable to create {}", path.display()) )?;
    write_samples_to(f, y)?;
    debug!("Saved {}x{} sample to {}", y.nrows(), y.ncols(), path.display());
    Ok(())
}

pub fn read_samples<P>(path : P) -> anyhow::Result<DMatrix<f64>>
where
    P : AsRef<Path>
{
    let path = path.as_ref();
    let f = fs::File::open(path)
        .with_context(|| format!("Unable to open {}", path.display()) )?;
    read_samples_from(f).with_context(|| format!("Invalid sample file {}", path.display()) )
}

/// Saves every sample of the experiment output under dir (created if missing), returning
/// the written paths: normal_equal_{i}.csv, normal_unequal_{i}.csv and binary_{i}.csv,
/// with i starting at 1 within each group.
pub fn save_output<P>(dir : P, out : &LabOutput) -> anyhow::Result<Vec<PathBuf>>
where
    P : AsRef<Path>
{
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("Unable to create directory {}", dir.display()) )?;
    let mut paths = Vec::new();
    for (group, prefix) in [(Group::EqualCov, "normal_equal"), (Group::UnequalCov, "normal_unequal")].iter() {
        for (i, class) in out.group(*group).enumerate() {
            let path = dir.join(format!("{}_{}.csv", prefix, i + 1));
            write_samples(&path, &class.sample)?;
            paths.push(path);
        }
    }
    for (i, b) in out.binary.iter().enumerate() {
        let path = dir.join(format!("binary_{}.csv", i + 1));
        write_samples(&path, b)?;
        paths.push(path);
    }
    Ok(paths)
}
