// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use benchtrack_core::{normalize, RawBench, SeriesPoint};
use benchtrack_detector::CheckOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::AppState;

/// Selects a slice of a series: a commit range or a timestamp window.
#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    /// First commit of a commit range.
    pub from: Option<String>,
    /// Last commit of a commit range.
    pub to: Option<String>,
    /// Earliest commit timestamp, inclusive.
    pub since: Option<DateTime<Utc>>,
    /// Latest commit timestamp, inclusive.
    pub until: Option<DateTime<Utc>>,
}

/// Body of `GET /api/v1/series`.
#[derive(Debug, Serialize)]
pub struct SeriesNames {
    /// Names of every non-empty series, sorted.
    pub series: Vec<String>,
    /// Number of names.
    pub total: usize,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/series", get(list_series))
        // Names contain slashes (`verifying/bundle/1`), hence the wildcard.
        .route("/api/v1/series/*name", get(get_series))
        .route("/api/v1/check", post(check_record))
}

async fn list_series(State(state): State<Arc<AppState>>) -> Json<SeriesNames> {
    let series = state.store.series_names();
    Json(SeriesNames {
        total: series.len(),
        series,
    })
}

async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    ApiQuery(query): ApiQuery<SeriesQuery>,
) -> ApiResult<Json<Vec<SeriesPoint>>> {
    let store = &state.store;
    let points = match query {
        SeriesQuery {
            from: Some(from),
            to: Some(to),
            since: None,
            until: None,
        } => store.get_range(&name, &from, &to)?,
        SeriesQuery {
            from: None,
            to: None,
            since: None,
            until: None,
        } => store.get_series(&name)?,
        SeriesQuery {
            from: None,
            to: None,
            since,
            until,
        } => store.get_time_range(
            &name,
            since.unwrap_or(DateTime::<Utc>::MIN_UTC),
            until.unwrap_or(DateTime::<Utc>::MAX_UTC),
        )?,
        _ => {
            return Err(ApiError::bad_request(
                "use either both `from` and `to`, or `since`/`until`",
            ))
        }
    };
    Ok(Json(points))
}

async fn check_record(
    State(state): State<Arc<AppState>>,
    ApiJson(raw): ApiJson<RawBench>,
) -> ApiResult<Json<CheckOutcome>> {
    let record = normalize(&raw)?;
    Ok(Json(state.store.check(&record)))
}
