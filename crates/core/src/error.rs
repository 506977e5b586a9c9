// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy.
//!
//! Every failure is scoped to a single operation and leaves the store intact:
//!
//! - [`ValidationError`]: a malformed bench record; the record is rejected and
//!   the rest of its batch continues.
//! - [`DuplicateCommitError`]: a commit already present in a series; the
//!   caller decides whether to re-run with overwrite or skip.
//! - [`NotFoundError`]: a query against an unknown series or commit.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Bench record field named by a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Bench case name
    Name,
    /// Measured value
    Value,
    /// Error margin (`range` on the wire)
    ErrorMargin,
    /// Measurement unit
    Unit,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Value => "value",
            Field::ErrorMargin => "range",
            Field::Unit => "unit",
        })
    }
}

/// A bench record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid `{field}`: {reason}")]
pub struct ValidationError {
    /// Offending field
    pub field: Field,
    /// Why the field was rejected
    pub reason: String,
}

impl ValidationError {
    /// Create a validation error for `field`.
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// A commit was appended twice to the same series.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("commit {commit_id} already recorded in series {series}")]
pub struct DuplicateCommitError {
    /// Series that already holds the commit
    pub series: String,
    /// Commit hash
    pub commit_id: String,
}

/// A query referenced something the store does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotFoundError {
    /// No series with this name
    #[error("series not found: {name}")]
    Series {
        /// Requested series name
        name: String,
    },

    /// Series exists but holds no point for this commit
    #[error("commit {commit_id} not found in series {series}")]
    Commit {
        /// Series that was searched
        series: String,
        /// Requested commit hash
        commit_id: String,
    },
}

/// Any benchtrack operation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// Malformed input record
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Commit already present
    #[error(transparent)]
    DuplicateCommit(#[from] DuplicateCommitError),

    /// Unknown series or commit
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

/// Result type for benchtrack operations.
pub type Result<T> = std::result::Result<T, TrackError>;
