// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Every setting can be given as a CLI flag or an environment variable
//! (a `.env` file is loaded first by `main`).

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::vision::{FetchConfig, YoloParams, DEFAULT_DAMAGED_CLASS_ID};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MODEL_PATH: &str = "best.onnx";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 60;

/// SMART Bushing API server
#[derive(Parser, Debug, Clone)]
#[command(name = "smart-bushing-api")]
#[command(version)]
#[command(about = "Classifies electrical bushings as good or damaged from an image URL", long_about = None)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[arg(long, env = "API_LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: String,

    /// Path to the ONNX export of the trained detector
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Class id the model uses for a damaged bushing
    #[arg(long, env = "DAMAGED_CLASS_ID", default_value_t = DEFAULT_DAMAGED_CLASS_ID)]
    pub damaged_class_id: u32,

    /// Square input size the model was exported with
    #[arg(long, env = "MODEL_INPUT_SIZE", default_value_t = 640)]
    pub input_size: u32,

    /// Minimum detection score
    #[arg(long, env = "CONFIDENCE_THRESHOLD", default_value_t = 0.25)]
    pub confidence_threshold: f32,

    /// NMS overlap threshold
    #[arg(long, env = "IOU_THRESHOLD", default_value_t = 0.7)]
    pub iou_threshold: f32,

    /// Maximum detections per image
    #[arg(long, env = "MAX_DETECTIONS", default_value_t = 300)]
    pub max_detections: usize,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "INFERENCE_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// Image download timeout in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,

    /// Largest accepted image in bytes
    #[arg(long, env = "MAX_IMAGE_BYTES", default_value_t = crate::vision::image_utils::DEFAULT_MAX_IMAGE_BYTES)]
    pub max_image_bytes: usize,

    /// Inference timeout in seconds (0 disables)
    #[arg(long, env = "INFERENCE_TIMEOUT_SECS", default_value_t = DEFAULT_INFERENCE_TIMEOUT_SECS)]
    pub inference_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let yolo = YoloParams::default();
        let fetch = FetchConfig::default();
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            damaged_class_id: DEFAULT_DAMAGED_CLASS_ID,
            input_size: yolo.input_size,
            confidence_threshold: yolo.confidence_threshold,
            iou_threshold: yolo.iou_threshold,
            max_detections: yolo.max_detections,
            intra_threads: yolo.intra_threads,
            fetch_timeout_secs: fetch.timeout.as_secs(),
            max_image_bytes: fetch.max_image_bytes,
            inference_timeout_secs: DEFAULT_INFERENCE_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(format!(
                "iou_threshold must be within [0, 1], got {}",
                self.iou_threshold
            ));
        }
        if self.input_size == 0 || self.input_size % 32 != 0 {
            return Err(format!(
                "input_size must be a positive multiple of 32, got {}",
                self.input_size
            ));
        }
        if self.max_detections == 0 {
            return Err("max_detections must be at least 1".to_string());
        }
        if self.intra_threads == 0 {
            return Err("intra_threads must be at least 1".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be at least 1".to_string());
        }
        if self.max_image_bytes == 0 {
            return Err("max_image_bytes must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn yolo_params(&self) -> YoloParams {
        YoloParams {
            input_size: self.input_size,
            confidence_threshold: self.confidence_threshold,
            iou_threshold: self.iou_threshold,
            max_detections: self.max_detections,
            intra_threads: self.intra_threads,
        }
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.fetch_timeout_secs),
            max_image_bytes: self.max_image_bytes,
        }
    }

    /// `None` when the inference timeout is disabled
    pub fn inference_timeout(&self) -> Option<Duration> {
        (self.inference_timeout_secs > 0).then(|| Duration::from_secs(self.inference_timeout_secs))
    }
}
