// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use smart_bushing_api::{
    api::{start_server, AppState},
    config::ServerConfig,
    version,
    vision::{Detector, YoloDetector},
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServerConfig::parse();
    if let Err(e) = config.validate() {
        anyhow::bail!("Invalid configuration: {}", e);
    }

    tracing::info!("🚀 Starting {} v{}", version::SERVICE_NAME, version::VERSION);

    // The model must load before the listener binds; there is no degraded mode
    let model_path = config.model_path.clone();
    let params = config.yolo_params();
    let detector = tokio::task::spawn_blocking(move || YoloDetector::new(&model_path, params))
        .await
        .context("Model loading task failed")?
        .with_context(|| format!("Failed to load model {}", config.model_path.display()))?;

    let detector: Arc<dyn Detector> = Arc::new(detector);
    let state = AppState::new(detector, &config)?;

    start_server(&config.listen_addr, state).await
}
