// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bushing check response types

use serde::{Deserialize, Serialize};

use crate::vision::Aggregation;

/// Verdict for an inspected bushing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BushingStatus {
    /// Good
    Baik,
    /// Damaged
    Rusak,
}

/// Response from a bushing check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CekBushingResponse {
    pub status: BushingStatus,
    /// True when any damaged-class detection was found
    pub has_rusak: bool,
    /// Highest damaged-class confidence, `null` when nothing damaged was found
    pub confidence: Option<f32>,
}

impl CekBushingResponse {
    /// Build the response from an aggregation result
    ///
    /// `max_confidence` is dropped unless `has_match` is set.
    pub fn build(has_match: bool, max_confidence: f32) -> Self {
        if has_match {
            Self {
                status: BushingStatus::Rusak,
                has_rusak: true,
                confidence: Some(max_confidence),
            }
        } else {
            Self {
                status: BushingStatus::Baik,
                has_rusak: false,
                confidence: None,
            }
        }
    }
}

impl From<Aggregation> for CekBushingResponse {
    fn from(aggregation: Aggregation) -> Self {
        Self::build(aggregation.has_match, aggregation.max_confidence)
    }
}
