// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Candidate box detection used to seed a session.
//!
//! A fixed batch transform: grayscale, Gaussian blur, inverted Otsu
//! threshold, dilation with a tall rectangular kernel to merge nearby
//! strokes into blocks, then one bounding rectangle per outermost contour.
//! Regions nested inside another region's hole are ignored.

use crate::models::annotation::Rect;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contours::find_contours;
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{grayscale_dilate, Mask};

/// Tuning for [`detect_candidate_boxes`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Gaussian sigma; 2.6 matches a 15x15 kernel
    pub blur_sigma: f32,
    /// Width of the rectangular dilation kernel
    pub kernel_width: u8,
    /// Height of the rectangular dilation kernel
    pub kernel_height: u8,
    /// Number of dilation passes; 0 disables dilation
    pub dilate_iterations: u32,
    /// Regions must be strictly wider than this
    pub min_width: i32,
    /// Regions must be strictly taller than this
    pub min_height: i32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            blur_sigma: 2.6,
            kernel_width: 3,
            kernel_height: 13,
            dilate_iterations: 3,
            min_width: 20,
            min_height: 50,
        }
    }
}

/// Detect candidate boxes, sorted left to right.
pub fn detect_candidate_boxes(image: &DynamicImage, params: &DetectionParams) -> Vec<Rect> {
    let gray = image.to_luma8();
    if gray.width() == 0 || gray.height() == 0 {
        return Vec::new();
    }

    let blurred = if params.blur_sigma > 0.0 {
        gaussian_blur_f32(&gray, params.blur_sigma)
    } else {
        gray
    };
    let mut binary = threshold(&blurred, otsu_level(&blurred), ThresholdType::BinaryInverted);

    if params.dilate_iterations > 0 && params.kernel_width > 0 && params.kernel_height > 0 {
        let mask = rect_mask(params.kernel_width, params.kernel_height);
        for _ in 0..params.dilate_iterations {
            binary = grayscale_dilate(&binary, &mask);
        }
    }

    let mut boxes = outer_bounds(&binary)
        .into_iter()
        .filter(|r| r.w > params.min_width && r.h > params.min_height)
        .collect::<Vec<_>>();
    boxes.sort_by_key(|r| (r.x, r.y));
    log::debug!("Detected {} candidate boxes", boxes.len());
    boxes
}

/// Filled `width` x `height` structuring element anchored at its center.
fn rect_mask(width: u8, height: u8) -> Mask {
    let kernel = GrayImage::from_pixel(width as u32, height as u32, Luma([255]));
    Mask::from_image(&kernel, width / 2, height / 2)
}

/// Bounding rectangle of every outermost foreground contour.
fn outer_bounds(binary: &GrayImage) -> Vec<Rect> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|contour| contour.parent.is_none())
        .filter_map(|contour| {
            let first = contour.points.first()?;
            let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
            for p in &contour.points {
                min_x = min_x.min(p.x);
                min_y = min_y.min(p.y);
                max_x = max_x.max(p.x);
                max_y = max_y.max(p.y);
            }
            Some(Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
        })
        .collect()
}
