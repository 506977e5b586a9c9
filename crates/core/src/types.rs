// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark domain types.
//!
//! These types mirror the record shape consumed by the performance dashboard,
//! so a run that is ingested can be written back out without loss:
//!
//! ```text
//! RunInput
//!   ├─ commit: CommitRef
//!   ├─ date, tool
//!   └─ benches: [RawBench] ──normalize──▶ BenchRecord
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Field, ValidationError};

/// Author of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Email address, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Username on the hosting service, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Author {
    /// Create an author with only a display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            username: None,
        }
    }
}

/// Identifying metadata for the code revision a benchmark run was performed against.
///
/// A `CommitRef` is created once per ingestion and shared behind an [`Arc`] by
/// every point that ingestion produces. It is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    /// Commit hash.
    pub id: String,
    /// Commit timestamp.
    pub timestamp: DateTime<Utc>,
    /// Commit author.
    pub author: Author,
    /// Commit message.
    #[serde(default)]
    pub message: String,
    /// Link to the commit on the hosting service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CommitRef {
    /// Create a commit reference with an empty message.
    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>, author: Author) -> Self {
        Self {
            id: id.into(),
            timestamp,
            author,
            message: String::new(),
            url: None,
        }
    }

    /// Set the commit message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the commit URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Abbreviated hash for display.
    pub fn short_id(&self) -> &str {
        self.id.get(..7).unwrap_or(&self.id)
    }
}

/// Measurement unit of a benchmark value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Nanoseconds per iteration.
    #[serde(rename = "ns/iter")]
    NsPerIter,
    /// Bytes (allocation, size).
    #[serde(rename = "bytes")]
    Bytes,
    /// Operations per second.
    #[serde(rename = "ops/sec")]
    OpsPerSec,
}

impl Unit {
    /// Canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::NsPerIter => "ns/iter",
            Unit::Bytes => "bytes",
            Unit::OpsPerSec => "ops/sec",
        }
    }

    /// Whether a larger value is an improvement.
    pub fn bigger_is_better(&self) -> bool {
        matches!(self, Unit::OpsPerSec)
    }

    /// Parse a unit, accepting the canonical form and common aliases.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "ns/iter" | "ns" | "ns/op" => Some(Unit::NsPerIter),
            "bytes" | "byte" | "b" => Some(Unit::Bytes),
            "ops/sec" | "ops/s" | "op/s" => Some(Unit::OpsPerSec),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::parse(s).ok_or_else(|| {
            ValidationError::new(
                Field::Unit,
                format!("unrecognized unit {s:?} (expected ns/iter, bytes or ops/sec)"),
            )
        })
    }
}

/// One bench case as it arrives from a harness, before validation.
///
/// Fields are deliberately loose: `value` may be a number or a numeric string
/// and `range` may be a number, a numeric string, or a `"± x"` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBench {
    /// Bench case name.
    #[serde(default)]
    pub name: String,
    /// Measured value.
    #[serde(default)]
    pub value: Value,
    /// Error margin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Value>,
    /// Unit string.
    #[serde(default)]
    pub unit: String,
}

impl RawBench {
    /// Convenience constructor for numeric input.
    pub fn new(name: impl Into<String>, value: f64, margin: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: number(value),
            range: Some(Value::String(format_range(margin))),
            unit: unit.into(),
        }
    }
}

impl From<&BenchRecord> for RawBench {
    fn from(record: &BenchRecord) -> Self {
        RawBench::new(
            record.name.clone(),
            record.value,
            record.error_margin,
            record.unit.as_str(),
        )
    }
}

impl From<BenchRecord> for RawBench {
    fn from(record: BenchRecord) -> Self {
        RawBench::from(&record)
    }
}

/// A validated, canonical benchmark measurement.
///
/// Serializes in the dashboard shape `{name, value, range: "± x", unit}` and
/// deserializes through the normalizer, so malformed JSON never yields a
/// `BenchRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBench", into = "RawBench")]
pub struct BenchRecord {
    /// Bench case name, e.g. `verifying/bundle/1`.
    pub name: String,
    /// Measured value, finite and non-negative.
    pub value: f64,
    /// Error margin around `value`, finite and non-negative.
    pub error_margin: f64,
    /// Measurement unit.
    pub unit: Unit,
}

impl BenchRecord {
    /// Lower edge of the tolerance band.
    pub fn lower(&self) -> f64 {
        self.value - self.error_margin
    }

    /// Upper edge of the tolerance band.
    pub fn upper(&self) -> f64 {
        self.value + self.error_margin
    }
}

impl TryFrom<RawBench> for BenchRecord {
    type Error = ValidationError;

    fn try_from(raw: RawBench) -> Result<Self, Self::Error> {
        crate::normalize::normalize(&raw)
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// One harness run: a commit and the bench cases measured against it.
///
/// This is both the ingestion input and the entry shape of the dashboard
/// data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInput {
    /// Commit the run was performed against.
    pub commit: CommitRef,
    /// Time of the run in milliseconds since the Unix epoch.
    #[serde(default = "now_millis")]
    pub date: i64,
    /// Name of the harness that produced the run (e.g. `cargo`).
    #[serde(default)]
    pub tool: String,
    /// Raw bench cases.
    #[serde(default)]
    pub benches: Vec<RawBench>,
}

/// One point of a series: a normalized record and the commit it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Commit shared with every other point from the same ingestion.
    pub commit: Arc<CommitRef>,
    /// Time of the run in milliseconds since the Unix epoch.
    pub date: i64,
    /// Harness name.
    pub tool: String,
    /// The measurement.
    pub bench: BenchRecord,
}

/// Render an error margin the way the dashboard stores it.
pub fn format_range(margin: f64) -> String {
    format!("± {margin}")
}

/// JSON number for `v`, using an integer representation when it is exact.
fn number(v: f64) -> Value {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 {
        Value::from(v as i64)
    } else {
        Value::from(v)
    }
}
