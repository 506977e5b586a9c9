// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use benchtrack_core::RunInput;
use benchtrack_store::AppendOutcome;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::AppState;

/// Query parameters of `POST /api/v1/runs`.
#[derive(Debug, Default, Deserialize)]
pub struct IngestParams {
    /// Record a re-run of a commit that is already present.
    #[serde(default)]
    pub overwrite: bool,
}

/// Body of an accepted ingestion.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    /// What was appended, rejected and classified.
    #[serde(flatten)]
    pub outcome: AppendOutcome,
    /// Set when the run is held in memory but the data file could not be
    /// written. The next successful write includes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/v1/runs", post(ingest_run))
}

async fn ingest_run(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<IngestParams>,
    ApiJson(run): ApiJson<RunInput>,
) -> ApiResult<(StatusCode, Json<IngestResponse>)> {
    let submitted = run.benches.len();
    let outcome = state.store.ingest(run, params.overwrite)?;

    if submitted > 0 && outcome.appended == 0 {
        let reasons: Vec<String> = outcome
            .rejected
            .iter()
            .map(|r| format!("#{}: {}", r.index, r.error))
            .collect();
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            format!("every bench record was rejected ({})", reasons.join("; ")),
        ));
    }

    info!(
        commit = %outcome.commit_id,
        ingestion_id = %outcome.ingestion_id,
        appended = outcome.appended,
        rejected = outcome.rejected.len(),
        regressions = outcome.regressions().count(),
        "Run ingested"
    );

    // The run is already part of the store; a failed write must not turn
    // into an error response, or a retry would be refused as a duplicate.
    let persist_error = state.persist().await.err().map(|e| e.message);

    Ok((
        StatusCode::ACCEPTED,
        Json(IngestResponse {
            outcome,
            persist_error,
        }),
    ))
}
