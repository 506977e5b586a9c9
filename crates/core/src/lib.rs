// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core types for benchtrack.
//!
//! This crate holds what every other benchtrack crate shares: the benchmark
//! domain types, the error taxonomy, the record normalizer, and settings.
//!
//! # Quick Start
//!
//! ```
//! use benchtrack_core::{normalize, RawBench, Unit};
//!
//! let raw = RawBench::new("verifying/bundle/1", 24535907.0, 311830.0, "ns/iter");
//! let record = normalize(&raw).unwrap();
//! assert_eq!(record.unit, Unit::NsPerIter);
//! ```
//!
//! # Modules
//!
//! - [`types`] - Commits, bench records, runs and series points
//! - [`error`] - Validation, duplicate-commit and not-found errors
//! - [`normalize`] - Raw record validation and canonicalization
//! - [`settings`] - Layered configuration
//! - [`telemetry`] - Tracing subscriber setup

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod normalize;
pub mod settings;
pub mod telemetry;
pub mod types;

pub use error::{DuplicateCommitError, Field, NotFoundError, Result, TrackError, ValidationError};
pub use normalize::normalize;
pub use settings::{DetectorConfig, Settings, SettingsError};
pub use types::{Author, BenchRecord, CommitRef, RawBench, RunInput, SeriesPoint, Unit};
