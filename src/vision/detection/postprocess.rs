// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLO output decoding
//!
//! Ultralytics YOLOv8/v11 ONNX exports emit a single tensor of shape
//! `[1, 4 + C, N]`: for each of N anchors, a center-format box followed by
//! C class scores. Some exporters transpose it to `[1, N, 4 + C]`.

use anyhow::Result;
use ndarray::{ArrayViewD, IxDyn};
use std::cmp::Ordering;

use super::preprocessing::Letterbox;
use super::{BoundingBox, DetectedObject, YoloParams};

/// Candidate box in model input space, corner format
#[derive(Debug, Clone, Copy)]
struct Candidate {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    score: f32,
    class_id: usize,
}

impl Candidate {
    fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    fn iou(&self, other: &Candidate) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

/// Decode a raw YOLO output tensor into detections in original image space
pub fn decode_output(
    output: ArrayViewD<f32>,
    params: &YoloParams,
    letterbox: &Letterbox,
    orig_width: u32,
    orig_height: u32,
) -> Result<Vec<DetectedObject>> {
    let shape = output.shape().to_vec();
    if shape.len() != 3 || shape[0] != 1 {
        anyhow::bail!(
            "Unexpected detection output shape: {:?}, expected [1, 4 + C, N]",
            shape
        );
    }

    // The attribute axis is the short one: 4 + C is far below the anchor count
    let channels_first = shape[1] <= shape[2];
    let (num_attrs, num_anchors) = if channels_first {
        (shape[1], shape[2])
    } else {
        (shape[2], shape[1])
    };

    if num_attrs <= 4 {
        anyhow::bail!(
            "Detection output has {} attributes per anchor, expected at least 5",
            num_attrs
        );
    }

    let value = |attr: usize, anchor: usize| -> f32 {
        if channels_first {
            output[IxDyn(&[0, attr, anchor])]
        } else {
            output[IxDyn(&[0, anchor, attr])]
        }
    };

    let mut candidates = Vec::new();
    for anchor in 0..num_anchors {
        let (class_id, score) = (4..num_attrs)
            .map(|attr| (attr - 4, value(attr, anchor)))
            .fold((0, f32::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });

        if !score.is_finite() || score < params.confidence_threshold {
            continue;
        }

        let cx = value(0, anchor);
        let cy = value(1, anchor);
        let w = value(2, anchor);
        let h = value(3, anchor);

        candidates.push(Candidate {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
            score,
            class_id,
        });
    }

    let kept = non_max_suppression(candidates, params.iou_threshold, params.max_detections);

    let max_x = orig_width as f32;
    let max_y = orig_height as f32;
    let detections = kept
        .into_iter()
        .map(|c| {
            let (x1, y1) = letterbox.to_original(c.x1, c.y1);
            let (x2, y2) = letterbox.to_original(c.x2, c.y2);
            let x1 = x1.clamp(0.0, max_x);
            let y1 = y1.clamp(0.0, max_y);
            let x2 = x2.clamp(0.0, max_x);
            let y2 = y2.clamp(0.0, max_y);

            DetectedObject::new(
                c.class_id as u32,
                c.score.clamp(0.0, 1.0),
                BoundingBox {
                    x: x1,
                    y: y1,
                    width: x2 - x1,
                    height: y2 - y1,
                },
            )
        })
        .collect();

    Ok(detections)
}

/// Class-aware greedy NMS, highest score first
fn non_max_suppression(
    mut candidates: Vec<Candidate>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && k.iou(&candidate) > iou_threshold);
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}
