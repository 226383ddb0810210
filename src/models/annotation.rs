// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Box annotation data structures.
//!
//! Points and rectangles are integer pixel coordinates. Whether they are
//! in image space or display space depends on where they come from; the
//! session only ever stores image-space rectangles.

use serde::{Deserialize, Serialize};

/// A 2D integer point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle, serialized as `[x, y, w, h]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Normalized rectangle spanned by two corner points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (b.x - a.x).abs(),
            h: (b.y - a.y).abs(),
        }
    }

    /// Zero-width or zero-height rectangles are never stored.
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if a point lies inside the rectangle, edges included.
    pub fn contains(&self, point: Point) -> bool {
        let (px, py) = (point.x as i64, point.y as i64);
        let (x, y) = (self.x as i64, self.y as i64);
        px >= x && px <= x + self.w as i64 && py >= y && py <= y + self.h as i64
    }

    /// Whether the far corner fits in `i32` coordinates.
    pub fn far_corner_fits(&self) -> bool {
        self.x.checked_add(self.w).is_some() && self.y.checked_add(self.h).is_some()
    }

    #[cfg(test)]
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<[i32; 4]> for Rect {
    fn from([x, y, w, h]: [i32; 4]) -> Self {
        Self { x, y, w, h }
    }
}

impl From<Rect> for [i32; 4] {
    fn from(rect: Rect) -> Self {
        [rect.x, rect.y, rect.w, rect.h]
    }
}
