// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module converts between display coordinates (the possibly
//! downscaled surface shown on screen) and image coordinates (pixels of
//! the original image). Display = image * scale, with scale in (0, 1].

use crate::models::annotation::{Point, Rect};

/// Largest display dimension used when no other cap is configured.
pub const DEFAULT_MAX_DISPLAY_DIM: u32 = 1000;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of the surface the image is shown on at `scale`.
    pub fn scaled(&self, scale: f64) -> ImageSize {
        ImageSize {
            width: ((self.width as f64 * scale).round() as u32).max(1),
            height: ((self.height as f64 * scale).round() as u32).max(1),
        }
    }
}

/// Pick the display scale so the larger image side fits within `max_dim`.
///
/// Images already within the cap are shown at scale 1.
pub fn display_scale(size: ImageSize, max_dim: u32) -> f64 {
    let largest = size.width.max(size.height);
    if largest == 0 || largest <= max_dim {
        return 1.0;
    }
    max_dim as f64 / largest as f64
}

/// Convert a display point to image coordinates, clamped to `bounds`.
pub fn to_image(point: Point, scale: f64, bounds: ImageSize) -> Point {
    if scale == 0.0 {
        return point;
    }
    let x = (point.x as f64 / scale).round() as i64;
    let y = (point.y as f64 / scale).round() as i64;
    Point {
        x: clamp_axis(x, bounds.width),
        y: clamp_axis(y, bounds.height),
    }
}

/// Convert an image rectangle to display coordinates.
///
/// Each field is rounded on its own, so the result can be off by a pixel
/// from the exact scaled rectangle.
pub fn to_display(rect: &Rect, scale: f64) -> Rect {
    let s = |v: i32| (v as f64 * scale).round() as i32;
    Rect {
        x: s(rect.x),
        y: s(rect.y),
        w: s(rect.w),
        h: s(rect.h),
    }
}

fn clamp_axis(value: i64, dim: u32) -> i32 {
    let max = (dim as i64 - 1).max(0);
    value.clamp(0, max) as i32
}
