// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Reduces a detection list to a damaged / not-damaged verdict

use super::detection::DetectedObject;

/// Class id of the "rusak" (damaged) class in the trained bushing model
pub const DEFAULT_DAMAGED_CLASS_ID: u32 = 1;

/// Outcome of scanning detections for the target class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregation {
    /// At least one detection of the target class exists
    pub has_match: bool,
    /// Highest target-class confidence; meaningless when `has_match` is false
    pub max_confidence: f32,
}

impl Aggregation {
    /// Confidence only when a match was seen
    pub fn confidence(&self) -> Option<f32> {
        self.has_match.then_some(self.max_confidence)
    }
}

/// Scan `detections` for `target_class`
///
/// Other classes are ignored entirely. A matching detection with confidence
/// 0.0 still counts as a match.
pub fn aggregate(detections: &[DetectedObject], target_class: u32) -> Aggregation {
    detections
        .iter()
        .filter(|d| d.class_id == target_class)
        .fold(
            Aggregation {
                has_match: false,
                max_confidence: 0.0,
            },
            |acc, d| Aggregation {
                has_match: true,
                max_confidence: acc.max_confidence.max(d.confidence),
            },
        )
}
