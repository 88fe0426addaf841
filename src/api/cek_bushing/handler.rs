// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bushing check endpoint handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::request::CekBushingRequest;
use super::response::CekBushingResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::aggregate;

/// POST /cek_bushing - Classify a bushing photo as good or damaged
///
/// # Request
/// - `image_url`: http(s) URL of the photo (required)
///
/// # Response
/// - `status`: "Baik" (good) or "Rusak" (damaged)
/// - `has_rusak`: whether a damaged-class detection was found
/// - `confidence`: highest damaged-class confidence, `null` for "Baik"
///
/// # Errors
/// - 400 Bad Request: image could not be downloaded or decoded
/// - 422 Unprocessable Entity: body is not `{"image_url": <http(s) URL>}`
/// - 500 Internal Server Error: inference failed
/// - 504 Gateway Timeout: inference exceeded the configured limit
pub async fn cek_bushing_handler(
    State(state): State<AppState>,
    payload: Result<Json<CekBushingRequest>, JsonRejection>,
) -> Result<Json<CekBushingResponse>, ApiError> {
    let start = Instant::now();

    // 1. Validate request
    let Json(request) = payload.map_err(|rejection| {
        warn!("Bushing check rejected: {}", rejection.body_text());
        ApiError::ValidationError {
            field: "body".to_string(),
            message: rejection.body_text(),
        }
    })?;

    if let Err(e) = request.validate() {
        warn!("Bushing check validation failed: {}", e);
        return Err(e);
    }

    let url = request.image_url.as_str();
    debug!("Bushing check request received for: {}", url);

    // 2. Download the photo
    let image = state.fetcher.fetch(url).await.map_err(|e| {
        warn!("Failed to fetch image {}: {}", url, e);
        ApiError::from(e)
    })?;

    // 3. Run detection off the async workers
    let detector = Arc::clone(&state.detector);
    let task = tokio::task::spawn_blocking(move || detector.detect(&image));

    let joined = match state.inference_timeout {
        Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
            error!("Inference exceeded {}s for: {}", limit.as_secs(), url);
            ApiError::Timeout
        })?,
        None => task.await,
    };

    let detections = joined
        .map_err(|e| {
            error!("Inference task failed: {}", e);
            ApiError::InternalError(format!("Inference task failed: {}", e))
        })?
        .map_err(|e| {
            error!("Inference failed: {:#}", e);
            ApiError::InternalError(format!("Inference failed: {}", e))
        })?;

    // 4. Reduce to a verdict
    let aggregation = aggregate(&detections, state.damaged_class_id);
    let response = CekBushingResponse::from(aggregation);

    info!(
        "Bushing check complete: {:?}, {} detections, confidence {:?}, {}ms ({})",
        response.status,
        detections.len(),
        response.confidence,
        start.elapsed().as_millis(),
        url
    );

    Ok(Json(response))
}
