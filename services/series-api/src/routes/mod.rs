// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

// HTTP routes
pub mod health;
pub mod runs;
pub mod series;

pub use runs::{IngestParams, IngestResponse};
pub use series::{SeriesNames, SeriesQuery};
