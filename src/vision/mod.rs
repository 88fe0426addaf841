// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision pipeline for bushing inspection
//!
//! This module provides:
//! - Image download and decoding
//! - YOLO object detection via ONNX Runtime
//! - Reduction of detections to a damaged / good verdict

pub mod aggregate;
pub mod detection;
pub mod fetcher;
pub mod image_utils;

pub use aggregate::{aggregate, Aggregation, DEFAULT_DAMAGED_CLASS_ID};
pub use detection::{BoundingBox, DetectedObject, Detector, YoloDetector, YoloParams};
pub use fetcher::{FetchConfig, FetchError, ImageFetcher};
pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo};
