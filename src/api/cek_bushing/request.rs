// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bushing check request types and validation

use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::errors::ApiError;

/// URL schemes the fetcher will download from
const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// Request for a bushing check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CekBushingRequest {
    /// Location of the bushing photo
    pub image_url: Url,
}

impl CekBushingRequest {
    /// Validate the request beyond what deserialization already checks
    pub fn validate(&self) -> Result<(), ApiError> {
        if !SUPPORTED_SCHEMES.contains(&self.image_url.scheme()) {
            return Err(ApiError::ValidationError {
                field: "image_url".to_string(),
                message: format!(
                    "unsupported URL scheme '{}', supported: {:?}",
                    self.image_url.scheme(),
                    SUPPORTED_SCHEMES
                ),
            });
        }

        if self.image_url.host_str().map(str::is_empty).unwrap_or(true) {
            return Err(ApiError::ValidationError {
                field: "image_url".to_string(),
                message: "URL must include a host".to_string(),
            });
        }

        Ok(())
    }
}
