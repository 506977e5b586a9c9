// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! series-api entry point.

use anyhow::Context;
use benchtrack_core::{telemetry, Settings};
use metrics_exporter_prometheus::PrometheusBuilder;
use series_api::{router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = std::env::var_os("BENCHTRACK_CONFIG").map(PathBuf::from);
    let settings = Settings::load(config.as_deref()).context("loading settings")?;
    telemetry::init_tracing(&settings.log).context("installing tracing subscriber")?;

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("installing metrics recorder")?;

    let (store, data) = benchtrack_store::open(&settings)
        .with_context(|| format!("loading {}", settings.storage.data_file.display()))?;
    info!(
        data_file = %settings.storage.data_file.display(),
        series = store.len(),
        points = store.total_points(),
        "Series store loaded"
    );

    let address = settings.server.address();
    let state = AppState::new(store, settings)
        .with_persistence(data.repo_url)
        .with_metrics(metrics);
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, "series-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("series-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
