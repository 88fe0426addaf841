// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for YOLO detection

use image::{imageops, Rgb, RgbImage};
use ndarray::Array4;

/// Padding color used by YOLO letterboxing
pub const PAD_VALUE: u8 = 114;

/// Geometry of a letterbox transform
///
/// Needed to map boxes from model space back to the original image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Scale factor applied to the original image
    pub scale: f32,
    /// Horizontal padding (left side) in model pixels
    pub pad_x: f32,
    /// Vertical padding (top side) in model pixels
    pub pad_y: f32,
}

impl Letterbox {
    /// Map a point from model input space to original image space
    pub fn to_original(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pad_x) / self.scale, (y - self.pad_y) / self.scale)
    }
}

/// Resize with aspect ratio preservation, centered on a gray canvas
pub fn letterbox(image: &RgbImage, target_size: u32) -> (RgbImage, Letterbox) {
    let (orig_w, orig_h) = image.dimensions();
    let mut canvas = RgbImage::from_pixel(target_size, target_size, Rgb([PAD_VALUE; 3]));

    if orig_w == 0 || orig_h == 0 {
        let info = Letterbox {
            scale: 1.0,
            pad_x: 0.0,
            pad_y: 0.0,
        };
        return (canvas, info);
    }

    let scale = (target_size as f32 / orig_w as f32).min(target_size as f32 / orig_h as f32);

    let new_w = ((orig_w as f32 * scale).round() as u32).clamp(1, target_size);
    let new_h = ((orig_h as f32 * scale).round() as u32).clamp(1, target_size);

    let resized = imageops::resize(image, new_w, new_h, imageops::FilterType::Triangle);

    let offset_x = (target_size - new_w) / 2;
    let offset_y = (target_size - new_h) / 2;
    imageops::replace(&mut canvas, &resized, offset_x as i64, offset_y as i64);

    let info = Letterbox {
        scale,
        pad_x: offset_x as f32,
        pad_y: offset_y as f32,
    };
    (canvas, info)
}

/// Build the `[1, 3, S, S]` input tensor, pixels scaled to [0, 1]
pub fn letterbox_tensor(image: &RgbImage, target_size: u32) -> (Array4<f32>, Letterbox) {
    let (canvas, info) = letterbox(image, target_size);
    let size = target_size as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for (x, y, pixel) in canvas.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    (tensor, info)
}
