// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Startup loading of the bushing detector

use smart_bushing_api::vision::{Detector, YoloDetector, YoloParams};

// Trained model exported by `yolo export model=best.pt format=onnx`
const BUSHING_MODEL_PATH: &str = "best.onnx";

#[test]
fn test_missing_model_fails_to_load() {
    let err = YoloDetector::new("./models/does-not-exist.onnx", YoloParams::default()).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
#[ignore] // Only run if the trained model is present
fn test_real_model_detects_without_error() {
    let detector = YoloDetector::new(BUSHING_MODEL_PATH, YoloParams::default())
        .expect("best.onnx should load");

    let image = image::RgbImage::from_pixel(1280, 720, image::Rgb([30, 30, 30]));
    let detections = detector.detect(&image).unwrap();

    for d in &detections {
        assert!((0.0..=1.0).contains(&d.confidence));
        assert!(d.bbox.x >= 0.0 && d.bbox.x + d.bbox.width <= 1280.0 + 1e-3);
        assert!(d.bbox.y >= 0.0 && d.bbox.y + d.bbox.height <= 720.0 + 1e-3);
    }
    assert!(detections.len() <= detector.params().max_detections);
}
