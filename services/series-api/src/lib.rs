// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP service for benchtrack.
//!
//! Exposes run ingestion and the series query layer as JSON:
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `GET`  | `/health` | Liveness and store size |
//! | `GET`  | `/metrics` | Prometheus metrics |
//! | `POST` | `/api/v1/runs?overwrite=` | Ingest a run |
//! | `GET`  | `/api/v1/series` | List series names |
//! | `GET`  | `/api/v1/series/{name}?from=&to=&since=&until=` | Series, commit range or time range |
//! | `POST` | `/api/v1/check` | Classify a record without storing it |

pub mod error;
pub mod extract;
pub mod routes;

use axum::Router;
use benchtrack_core::Settings;
use benchtrack_store::SeriesStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

/// Shared state handed to every route.
pub struct AppState {
    /// The series store.
    pub store: SeriesStore,
    /// Loaded settings.
    pub settings: Settings,
    /// Repository URL written back into the data file.
    pub repo_url: Option<String>,
    /// Prometheus handle, if a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
    persist: bool,
    write_lock: Mutex<()>,
}

impl AppState {
    /// Create state over `store`; nothing is written back to disk.
    pub fn new(store: SeriesStore, settings: Settings) -> Self {
        Self {
            store,
            settings,
            repo_url: None,
            metrics: None,
            persist: false,
            write_lock: Mutex::new(()),
        }
    }

    /// Write the store back to the configured data file after every ingestion.
    pub fn with_persistence(mut self, repo_url: Option<String>) -> Self {
        self.persist = true;
        self.repo_url = repo_url;
        self
    }

    /// Serve `/metrics` from this handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Save the store to the data file, if persistence is enabled.
    ///
    /// Saves are serialized so concurrent ingestions never interleave writes.
    pub async fn persist(self: &Arc<Self>) -> Result<(), ApiError> {
        if !self.persist {
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            benchtrack_store::save(&state.store, &state.settings, state.repo_url.clone())
        })
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .map_err(|e| {
            tracing::error!(error = %e, "failed to write data file");
            ApiError::internal(e.to_string())
        })
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::runs::routes())
        .merge(routes::series::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
