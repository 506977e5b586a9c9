// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark series store for benchtrack.
//!
//! This crate keeps the per-benchmark history of harness runs, flags
//! regressions as runs are appended, and answers queries for reporting.
//!
//! # Quick Start
//!
//! ```
//! use benchtrack_core::{Author, CommitRef, DetectorConfig, RawBench, RunInput};
//! use benchtrack_store::SeriesStore;
//! use chrono::Utc;
//!
//! let store = SeriesStore::new(DetectorConfig::default());
//! let run = RunInput {
//!     commit: CommitRef::new("4f2a9c1", Utc::now(), Author::new("dev")),
//!     date: Utc::now().timestamp_millis(),
//!     tool: "cargo".to_string(),
//!     benches: vec![RawBench::new("verifying/bundle/1", 24535907.0, 311830.0, "ns/iter")],
//! };
//!
//! let outcome = store.ingest(run, false).unwrap();
//! assert_eq!(outcome.appended, 1);
//! assert_eq!(store.get_series("verifying/bundle/1").unwrap().len(), 1);
//! ```
//!
//! # Modules
//!
//! - [`store`] - The concurrent series store and its query operations
//! - [`io`] - Reading and writing the dashboard data file
//! - [`markdown`] - Markdown report generation

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod io;
pub mod markdown;
pub mod store;

pub use io::{DashboardData, ImportSummary, IoError};
pub use store::{AppendOutcome, RejectedRecord, RunMeta, Series, SeriesStore};

use benchtrack_core::Settings;

/// Build a store from settings and load the configured data file into it.
///
/// A missing data file yields an empty store. Runs already in the file are
/// imported with overwrite, since the file may legitimately hold re-runs.
pub fn open(settings: &Settings) -> io::Result<(SeriesStore, DashboardData)> {
    let store = SeriesStore::new(settings.detector);
    let data = io::read_data_or_default(&settings.storage.data_file)?;
    io::import(&store, &data, true)?;
    Ok((store, data))
}

/// Write the contents of `store` back to the configured data file.
pub fn save(store: &SeriesStore, settings: &Settings, repo_url: Option<String>) -> io::Result<()> {
    let data = io::export(store, &settings.storage.suite, repo_url);
    io::write_data(&data, &settings.storage.data_file)
}
