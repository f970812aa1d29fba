// src/output.rs

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::pipeline::PipelineOutput;
use crate::process::Dataset;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write `dataset` as comma-separated UTF-8 with a BOM: canonical header
/// first, then one line per record. Atomic (tmp file + rename).
pub fn write_dataset_csv(path: impl AsRef<Path>, dataset: &Dataset) -> Result<()> {
    let path = path.as_ref();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset.csv".to_string());
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    file.write_all(UTF8_BOM)?;

    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
    wtr.write_record(dataset.header().cells())
        .with_context(|| format!("writing header to {}", tmp_path.display()))?;
    for rec in dataset.records() {
        wtr.write_record(rec.cells())
            .with_context(|| format!("writing record {} to {}", rec.id(), tmp_path.display()))?;
    }
    wtr.flush()?;
    drop(wtr);

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
    Ok(())
}

/// Persist every dataset of a run under `dir`: one file per category plus
/// the reconciled included/excluded files. Returns the written paths.
pub fn write_outputs(dir: impl AsRef<Path>, output: &PipelineOutput) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut written = Vec::new();

    for (category, dataset) in &output.datasets {
        let path = dir.join(format!("{}.csv", category.slug()));
        write_dataset_csv(&path, dataset)?;
        info!(path = %path.display(), records = dataset.len(), "wrote category file");
        written.push(path);
    }

    for (kind, dataset) in &output.combined {
        let path = dir.join(kind.combined_file_name());
        write_dataset_csv(&path, dataset)?;
        info!(path = %path.display(), records = dataset.len(), "wrote combined file");
        written.push(path);
    }

    Ok(written)
}
