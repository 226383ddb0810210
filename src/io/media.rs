// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! This module loads the image being annotated and prepares the
//! downscaled RGBA buffer shown on the canvas.

use crate::error::{BoxError, Result};
use crate::util::geometry::ImageSize;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;

/// A decoded image ready for display.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixels, row major
    pub pixels: Vec<u8>,
    /// Decoded source, kept for candidate detection
    pub source: DynamicImage,
}

impl LoadedImage {
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    /// RGBA pixels resized to the display surface for `scale`.
    ///
    /// At scale 1 the original pixels are returned unchanged.
    pub fn display_pixels(&self, scale: f64) -> (ImageSize, Vec<u8>) {
        if scale >= 1.0 {
            return (self.size(), self.pixels.clone());
        }
        let target = self.size().scaled(scale);
        let resized = image::imageops::resize(
            &self.source.to_rgba8(),
            target.width,
            target.height,
            FilterType::Triangle,
        );
        (target, resized.into_raw())
    }
}

/// Load an image from disk.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let source = image::open(path).map_err(|e| BoxError::NotFound {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(from_dynamic(source))
}

/// Wrap an already decoded image.
pub fn from_dynamic(source: DynamicImage) -> LoadedImage {
    let rgba = source.to_rgba8();
    LoadedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_missing_image_is_not_found() {
        let err = load_image(Path::new("does/not/exist.png")).err().unwrap();
        assert!(matches!(err, BoxError::NotFound { .. }));
    }

    #[test]
    fn test_load_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        RgbaImage::from_pixel(30, 20, Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.size(), ImageSize::new(30, 20));
        assert_eq!(loaded.pixels.len(), 30 * 20 * 4);
    }

    #[test]
    fn test_display_pixels_downscale() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(200, 100));
        let loaded = from_dynamic(img);

        let (size, pixels) = loaded.display_pixels(0.5);
        assert_eq!(size, ImageSize::new(100, 50));
        assert_eq!(pixels.len(), 100 * 50 * 4);

        let (size, _) = loaded.display_pixels(1.0);
        assert_eq!(size, ImageSize::new(200, 100));
    }
}
