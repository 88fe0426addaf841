// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Image fetcher tests against a local fixture server
//!
//! Verifies that ImageFetcher:
//! - Decodes valid images into RGB buffers
//! - Treats non-success statuses, HTML bodies, oversized bodies and slow hosts as failures

use smart_bushing_api::vision::{FetchConfig, FetchError, ImageError, ImageFetcher};
use std::time::Duration;

use crate::common::{png_bytes, spawn_image_server};

fn fetcher(timeout: Duration, max_image_bytes: usize) -> ImageFetcher {
    ImageFetcher::new(FetchConfig {
        timeout,
        max_image_bytes,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_valid_png() {
    let addr = spawn_image_server().await;
    let fetcher = fetcher(Duration::from_secs(5), 1024 * 1024);

    let image = fetcher
        .fetch(&format!("http://{}/bushing.png", addr))
        .await
        .unwrap();

    assert_eq!(image.dimensions(), (32, 24));
    assert_eq!(image.get_pixel(0, 0).0, [90, 90, 90]);
}

#[tokio::test]
async fn test_fetch_404() {
    let addr = spawn_image_server().await;
    let fetcher = fetcher(Duration::from_secs(5), 1024 * 1024);

    let err = fetcher
        .fetch(&format!("http://{}/missing.png", addr))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::HttpStatus(404, _)));
}

#[tokio::test]
async fn test_fetch_html_body() {
    let addr = spawn_image_server().await;
    let fetcher = fetcher(Duration::from_secs(5), 1024 * 1024);

    let err = fetcher
        .fetch(&format!("http://{}/page.html", addr))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Image(ImageError::UnsupportedFormat)));
}

#[tokio::test]
async fn test_fetch_body_over_limit() {
    let addr = spawn_image_server().await;
    let limit = png_bytes(32, 24).len() - 1;
    let fetcher = fetcher(Duration::from_secs(5), limit);

    let err = fetcher
        .fetch(&format!("http://{}/bushing.png", addr))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::TooLarge(l) if l == limit));
}

#[tokio::test]
async fn test_fetch_timeout() {
    let addr = spawn_image_server().await;
    let fetcher = fetcher(Duration::from_millis(300), 1024 * 1024);
    assert_eq!(fetcher.timeout(), Duration::from_millis(300));

    let err = fetcher
        .fetch(&format!("http://{}/slow.png", addr))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Timeout(_)));
}
