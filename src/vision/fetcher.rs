// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP image fetching with a bounded timeout
//!
//! Downloads the photo referenced by a request and decodes it into RGB pixels.
//! Every failure here originates from caller-supplied input.

use image::RgbImage;
use reqwest::Client;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

use super::image_utils::{decode_image_bytes, format_to_extension, ImageError, DEFAULT_MAX_IMAGE_BYTES};

const USER_AGENT: &str = concat!("smart-bushing-api/", env!("CARGO_PKG_VERSION"));

/// Default per-request download timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Settings for the image fetcher
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Total time allowed for connecting and downloading
    pub timeout: Duration,
    /// Largest accepted body in bytes
    pub max_image_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// Image fetch error types
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request timed out
    #[error("Timeout fetching: {0}")]
    Timeout(String),
    /// Connection or transfer error
    #[error("HTTP error: {0}")]
    Http(String),
    /// HTTP non-success status
    #[error("HTTP {0} for: {1}")]
    HttpStatus(u16, String),
    /// Body exceeded the configured limit
    #[error("Image exceeds maximum size of {0} bytes")]
    TooLarge(usize),
    /// Body is not a decodable image
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl FetchError {
    fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(url.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

/// Downloads and decodes images over HTTP(S)
///
/// Holds one pooled `reqwest::Client`; cheap to share behind an `Arc`.
pub struct ImageFetcher {
    client: Client,
    config: FetchConfig,
}

impl ImageFetcher {
    /// Create a new fetcher
    pub fn new(config: FetchConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, config })
    }

    /// Configured download timeout
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Fetch `url` and decode the body as an RGB image
    ///
    /// No retries are attempted; the first failure is returned.
    pub async fn fetch(&self, url: &str) -> Result<RgbImage, FetchError> {
        let start = Instant::now();
        debug!("Fetching image from: {}", url);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16(), url.to_string()));
        }

        let limit = self.config.max_image_bytes;
        if let Some(len) = response.content_length() {
            if len as usize > limit {
                return Err(FetchError::TooLarge(limit));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(e, url))?
        {
            if body.len() + chunk.len() > limit {
                return Err(FetchError::TooLarge(limit));
            }
            body.extend_from_slice(&chunk);
        }

        let (image, info) = decode_image_bytes(&body, limit)?;

        info!(
            "Fetched {}x{} {} image ({} bytes) in {}ms from: {}",
            info.width,
            info.height,
            format_to_extension(info.format),
            info.size_bytes,
            start.elapsed().as_millis(),
            url
        );

        Ok(image)
    }
}
