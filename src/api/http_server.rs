// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::cek_bushing::cek_bushing_handler;
use crate::config::ServerConfig;
use crate::vision::{Detector, ImageFetcher};

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    /// Model loaded once at startup
    pub detector: Arc<dyn Detector>,
    pub fetcher: Arc<ImageFetcher>,
    pub damaged_class_id: u32,
    pub inference_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(detector: Arc<dyn Detector>, config: &ServerConfig) -> anyhow::Result<Self> {
        let fetcher = ImageFetcher::new(config.fetch_config())?;

        Ok(Self {
            detector,
            fetcher: Arc::new(fetcher),
            damaged_class_id: config.damaged_class_id,
            inference_timeout: config.inference_timeout(),
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness check
        .route("/", get(root_handler))
        // Bushing check endpoint
        .route("/cek_bushing", post(cek_bushing_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(listen_addr: &str, state: AppState) -> anyhow::Result<()> {
    let addr = listen_addr.parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        "API server listening on {} (detector: {})",
        addr,
        state.detector.name()
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    axum::response::Json(json!({"message": "SMART Bushing API is running"}))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
