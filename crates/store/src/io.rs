// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! I/O operations for dashboard data.
//!
//! This module reads and writes the data file consumed by the performance
//! dashboard, and moves its contents in and out of a [`SeriesStore`].
//!
//! The file is either plain JSON or a `data.js` script of the form
//! `window.BENCHMARK_DATA = {...}`. Both hold the same object:
//!
//! ```text
//! { "lastUpdate": <ms>, "repoUrl": "...", "entries": { "<suite>": [RunInput, ...] } }
//! ```

use crate::store::{AppendOutcome, SeriesStore};
use benchtrack_core::{RawBench, RunInput, SeriesPoint, TrackError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Assignment prefix of a `data.js` file.
pub const DATA_JS_PREFIX: &str = "window.BENCHMARK_DATA = ";

/// Errors that can occur while reading or writing dashboard data.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data could not be ingested
    #[error(transparent)]
    Track(#[from] TrackError),
}

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, IoError>;

/// Contents of the dashboard data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// Time of the last write in milliseconds since the Unix epoch.
    pub last_update: i64,
    /// Repository the runs belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    /// Runs grouped by suite name, in ingestion order.
    #[serde(default)]
    pub entries: BTreeMap<String, Vec<RunInput>>,
}

impl Default for DashboardData {
    fn default() -> Self {
        Self {
            last_update: Utc::now().timestamp_millis(),
            repo_url: None,
            entries: BTreeMap::new(),
        }
    }
}

impl DashboardData {
    /// Total number of runs across suites.
    pub fn run_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Summary of an import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    /// Runs ingested
    pub runs: usize,
    /// Points appended
    pub appended: usize,
    /// Records rejected by the normalizer
    pub rejected: usize,
}

/// Parse dashboard data from either a `data.js` script or plain JSON.
pub fn parse_data(content: &str) -> Result<DashboardData> {
    let trimmed = content.trim();
    let json = match trimmed.strip_prefix(DATA_JS_PREFIX.trim_end()) {
        Some(rest) => rest.trim().trim_end_matches(';'),
        None => trimmed,
    };
    Ok(serde_json::from_str(json)?)
}

/// Render dashboard data as a `data.js` script.
pub fn render_data_js(data: &DashboardData) -> Result<String> {
    let json = serde_json::to_string_pretty(data)?;
    Ok(format!("{DATA_JS_PREFIX}{json}\n"))
}

/// Read dashboard data from `path`.
pub fn read_data(path: impl AsRef<Path>) -> Result<DashboardData> {
    let content = fs::read_to_string(path)?;
    parse_data(&content)
}

/// Read dashboard data from `path`, or start empty if it does not exist.
pub fn read_data_or_default(path: impl AsRef<Path>) -> Result<DashboardData> {
    match fs::read_to_string(path) {
        Ok(content) => parse_data(&content),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(DashboardData::default()),
        Err(err) => Err(err.into()),
    }
}

/// Write dashboard data to `path`.
///
/// A `.js` extension selects the `data.js` form; anything else is written as
/// plain JSON. Parent directories are created as needed. The content goes to
/// a temporary file in the same directory that is then renamed over `path`,
/// so readers see either the old file or the new one.
pub fn write_data(data: &DashboardData, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let content = if path.extension().is_some_and(|ext| ext == "js") {
        render_data_js(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    tracing::debug!(path = %path.display(), runs = data.run_count(), "dashboard data written");
    Ok(())
}

/// Write series points to a JSON file.
pub fn write_series_json(points: &[SeriesPoint], path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(points)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read series points from a JSON file.
pub fn read_series_json(path: impl AsRef<Path>) -> Result<Vec<SeriesPoint>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Read a single run from a JSON file.
pub fn read_run(path: impl AsRef<Path>) -> Result<RunInput> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Ingest every run of `data` into `store`, suite by suite, oldest first.
///
/// Runs are passed to [`SeriesStore::ingest`] with `overwrite`, so a file
/// holding re-runs of a commit imports only when `overwrite` is set.
pub fn import(store: &SeriesStore, data: &DashboardData, overwrite: bool) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for (suite, runs) in &data.entries {
        for run in runs {
            let outcome: AppendOutcome = store.ingest(run.clone(), overwrite)?;
            summary.runs += 1;
            summary.appended += outcome.appended;
            summary.rejected += outcome.rejected.len();
        }
        tracing::debug!(%suite, runs = runs.len(), "suite imported");
    }

    tracing::info!(
        runs = summary.runs,
        appended = summary.appended,
        rejected = summary.rejected,
        "dashboard data imported"
    );
    Ok(summary)
}

/// Rebuild dashboard data from the contents of `store`.
///
/// Each ingested batch becomes one run, and runs are written in ingestion
/// order so that importing the result rebuilds every series in the same
/// order. Benches within a run are ordered by name. Everything lands under
/// `suite`.
pub fn export(store: &SeriesStore, suite: &str, repo_url: Option<String>) -> DashboardData {
    let mut runs: BTreeMap<u64, RunInput> = BTreeMap::new();

    for series in store.snapshot() {
        for (sequence, point) in series.entries() {
            runs.entry(sequence)
                .or_insert_with(|| RunInput {
                    commit: (*point.commit).clone(),
                    date: point.date,
                    tool: point.tool.clone(),
                    benches: Vec::new(),
                })
                .benches
                .push(RawBench::from(&point.bench));
        }
    }

    let mut entries = BTreeMap::new();
    if !runs.is_empty() {
        entries.insert(suite.to_string(), runs.into_values().collect());
    }

    DashboardData {
        last_update: Utc::now().timestamp_millis(),
        repo_url,
        entries,
    }
}
