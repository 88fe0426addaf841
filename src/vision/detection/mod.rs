// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLO object detection for bushing photos
//!
//! Components:
//! - `preprocessing` - Letterbox resize into the model input tensor
//! - `postprocess` - Output decoding and non-maximum suppression
//! - `model` - ONNX Runtime session wrapper

pub mod model;
pub mod postprocess;
pub mod preprocessing;

use image::RgbImage;
use serde::{Deserialize, Serialize};

pub use model::YoloDetector;
pub use postprocess::decode_output;
pub use preprocessing::{letterbox_tensor, Letterbox};

/// Axis-aligned box in original image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// One detection produced by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Class index as trained (0 = good, 1 = damaged for the bushing model)
    pub class_id: u32,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Region of the detection
    pub bbox: BoundingBox,
}

impl DetectedObject {
    pub fn new(class_id: u32, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            class_id,
            confidence,
            bbox,
        }
    }
}

/// Inference parameters for a YOLO model
#[derive(Debug, Clone, PartialEq)]
pub struct YoloParams {
    /// Square model input size in pixels
    pub input_size: u32,
    /// Minimum class score kept before NMS
    pub confidence_threshold: f32,
    /// Overlap above which a same-class box is suppressed
    pub iou_threshold: f32,
    /// Maximum detections returned per image
    pub max_detections: usize,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
}

impl Default for YoloParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            confidence_threshold: 0.25,
            iou_threshold: 0.7,
            max_detections: 300,
            intra_threads: 4,
        }
    }
}

/// Maps a decoded image to a set of detections
///
/// Implementations are loaded once and shared read-only by every request.
#[cfg_attr(test, mockall::automock)]
pub trait Detector: Send + Sync {
    /// Run detection on a single image
    fn detect(&self, image: &RgbImage) -> anyhow::Result<Vec<DetectedObject>>;

    /// Detector name (for logging)
    fn name(&self) -> &str;
}
