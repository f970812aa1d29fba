// src/report.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fmt::Display,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::schema::{DocumentCategory, RecordKind};

pub const REPORT_FILE_NAME: &str = "run_report.json";

/// Outcome of one document category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryStatus {
    Ok { records: usize },
    Skipped { reason: String },
}

/// What a run did, category by category.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub categories: BTreeMap<DocumentCategory, CategoryStatus>,
    /// Record count of each reconciled output that was produced.
    pub combined: BTreeMap<RecordKind, usize>,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            categories: BTreeMap::new(),
            combined: BTreeMap::new(),
        }
    }

    pub fn record_ok(&mut self, category: DocumentCategory, records: usize) {
        self.categories
            .insert(category, CategoryStatus::Ok { records });
    }

    pub fn record_skipped(&mut self, category: DocumentCategory, reason: impl Display) {
        self.categories.insert(
            category,
            CategoryStatus::Skipped {
                reason: reason.to_string(),
            },
        );
    }

    pub fn record_combined(&mut self, kind: RecordKind, records: usize) {
        self.combined.insert(kind, records);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn skipped(&self) -> usize {
        self.categories
            .values()
            .filter(|s| matches!(s, CategoryStatus::Skipped { .. }))
            .count()
    }
}

/// Write `report` as pretty JSON into `dir`, atomically (tmp file + rename).
pub fn write_report(dir: impl AsRef<Path>, report: &RunReport) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(REPORT_FILE_NAME);
    let tmp_path = dir.join(format!(".{}.tmp", REPORT_FILE_NAME));

    let mut tmp = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    serde_json::to_writer_pretty(&mut tmp, report).context("serializing run report")?;
    tmp.write_all(b"\n")?;
    drop(tmp);

    fs::rename(&tmp_path, &path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
    Ok(path)
}
