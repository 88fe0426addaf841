// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fixtures: a throwaway image host and scripted detectors

#![allow(dead_code)]

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use smart_bushing_api::{
    api::AppState,
    config::ServerConfig,
    vision::{BoundingBox, DetectedObject, Detector},
};
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([90, 90, 90]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Serve fixture images on an ephemeral loopback port
///
/// - `/bushing.png` - valid 32x24 PNG
/// - `/missing.png` - 404
/// - `/page.html` - 200 with an HTML body
/// - `/slow.png` - valid PNG after a 3s delay
pub async fn spawn_image_server() -> SocketAddr {
    let app = Router::new()
        .route(
            "/bushing.png",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], png_bytes(32, 24)) }),
        )
        .route(
            "/missing.png",
            get(|| async { (StatusCode::NOT_FOUND, "Not Found").into_response() }),
        )
        .route(
            "/page.html",
            get(|| async { Html("<!DOCTYPE html><html><body><h1>Login</h1></body></html>") }),
        )
        .route(
            "/slow.png",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                ([(header::CONTENT_TYPE, "image/png")], png_bytes(8, 8))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn det(class_id: u32, confidence: f32) -> DetectedObject {
    DetectedObject::new(
        class_id,
        confidence,
        BoundingBox {
            x: 1.0,
            y: 1.0,
            width: 10.0,
            height: 10.0,
        },
    )
}

/// Returns the same detections for every image
pub struct FixedDetector {
    detections: Vec<DetectedObject>,
    calls: AtomicUsize,
}

impl FixedDetector {
    pub fn new(detections: Vec<DetectedObject>) -> Self {
        Self {
            detections,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Detector for FixedDetector {
    fn detect(&self, _image: &RgbImage) -> anyhow::Result<Vec<DetectedObject>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.detections.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Always fails, like a model that hit a runtime error
pub struct FailingDetector;

impl Detector for FailingDetector {
    fn detect(&self, _image: &RgbImage) -> anyhow::Result<Vec<DetectedObject>> {
        anyhow::bail!("onnxruntime: invalid output tensor")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Blocks for a while before answering
pub struct SlowDetector(pub Duration);

impl Detector for SlowDetector {
    fn detect(&self, _image: &RgbImage) -> anyhow::Result<Vec<DetectedObject>> {
        std::thread::sleep(self.0);
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// App state with a short fetch timeout so failing tests stay fast
pub fn test_state(detector: Arc<dyn Detector>) -> AppState {
    let config = ServerConfig {
        fetch_timeout_secs: 1,
        ..Default::default()
    };
    AppState::new(detector, &config).unwrap()
}
