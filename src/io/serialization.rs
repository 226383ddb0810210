// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Box file serialization and deserialization.
//!
//! Box files are JSON documents of the form
//!
//! ```json
//! {
//!   "image": "path/to/image.jpg",
//!   "shape": [height, width],
//!   "boxes": [[x, y, w, h], ...]
//! }
//! ```
//!
//! Coordinates are always in original image pixels. Loading is tolerant:
//! malformed box entries are dropped one by one instead of failing the
//! whole file.

use crate::error::{BoxError, Result};
use crate::models::{annotation::Rect, session::BoxSession};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// On-disk layout. Field order is part of the file format.
#[derive(Serialize)]
struct BoxFileRef<'a> {
    image: &'a str,
    shape: [u32; 2],
    boxes: &'a [Rect],
}

/// Contents read back from a box file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedBoxes {
    pub image: Option<String>,
    /// `[height, width]` as recorded at save time
    pub shape: Option<[u32; 2]>,
    pub boxes: Vec<Rect>,
    /// Number of entries skipped because of their shape or values
    pub dropped: usize,
}

/// Write the session's boxes to `path`, replacing any existing file.
pub fn save(session: &BoxSession, path: &Path) -> Result<()> {
    let size = session.size();
    let file = BoxFileRef {
        image: session.image(),
        shape: [size.height, size.width],
        boxes: session.boxes(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(path, json)?;
    log::info!("Saved {} boxes to {}", session.boxes().len(), path.display());
    Ok(())
}

/// Read a box file from `path`.
pub fn load(path: &Path) -> Result<LoadedBoxes> {
    let json = std::fs::read_to_string(path).map_err(|e| BoxError::NotFound {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let loaded = parse(&json)?;
    log::info!("Loaded {} boxes from {}", loaded.boxes.len(), path.display());
    Ok(loaded)
}

/// Parse box file contents.
pub fn parse(json: &str) -> Result<LoadedBoxes> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(map) = value else {
        return Err(BoxError::format("top-level value is not an object"));
    };

    let image = map.get("image").and_then(Value::as_str).map(str::to_owned);
    let shape = map.get("shape").and_then(parse_shape);

    let Some(entries) = map.get("boxes") else {
        log::warn!("No 'boxes' key found in box file, nothing to load");
        return Ok(LoadedBoxes {
            image,
            shape,
            ..Default::default()
        });
    };
    let Some(entries) = entries.as_array() else {
        log::warn!("'boxes' is not an array, nothing to load");
        return Ok(LoadedBoxes {
            image,
            shape,
            ..Default::default()
        });
    };

    let mut boxes = Vec::with_capacity(entries.len());
    let mut dropped = 0;
    for (i, entry) in entries.iter().enumerate() {
        match parse_box(entry) {
            Some(rect) => boxes.push(rect),
            None => {
                log::warn!("Skipping malformed box entry #{}: {}", i, entry);
                dropped += 1;
            }
        }
    }

    Ok(LoadedBoxes {
        image,
        shape,
        boxes,
        dropped,
    })
}

fn parse_box(entry: &Value) -> Option<Rect> {
    let values = entry.as_array()?;
    if values.len() != 4 {
        return None;
    }
    let mut fields = [0i32; 4];
    for (field, value) in fields.iter_mut().zip(values) {
        *field = as_int(value)?;
    }
    let rect = Rect::from(fields);
    if rect.x < 0 || rect.y < 0 || rect.is_degenerate() || !rect.far_corner_fits() {
        return None;
    }
    Some(rect)
}

fn parse_shape(value: &Value) -> Option<[u32; 2]> {
    let values = value.as_array()?;
    match values.as_slice() {
        [h, w] => Some([
            u32::try_from(h.as_u64()?).ok()?,
            u32::try_from(w.as_u64()?).ok()?,
        ]),
        _ => None,
    }
}

/// Integers, or floats without a fractional part.
fn as_int(value: &Value) -> Option<i32> {
    if let Some(i) = value.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = value.as_f64()?;
    if f.fract() != 0.0 || f < i32::MIN as f64 || f > i32::MAX as f64 {
        return None;
    }
    Some(f as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Point;
    use crate::util::geometry::ImageSize;

    fn session_with(boxes: Vec<Rect>) -> BoxSession {
        let mut session = BoxSession::new("images/sample.png", ImageSize::new(640, 480), 1000);
        session.set_boxes(boxes);
        session
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boxes.json");
        let boxes = vec![Rect::new(10, 20, 30, 40), Rect::new(5, 5, 5, 5)];

        save(&session_with(boxes.clone()), &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.boxes, boxes);
        assert_eq!(loaded.image.as_deref(), Some("images/sample.png"));
        assert_eq!(loaded.shape, Some([480, 640]));
        assert_eq!(loaded.dropped, 0);
    }

    #[test]
    fn test_save_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boxes.json");
        save(&session_with(vec![Rect::new(1, 2, 3, 4)]), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let image_pos = text.find("\"image\"").unwrap();
        let shape_pos = text.find("\"shape\"").unwrap();
        let boxes_pos = text.find("\"boxes\"").unwrap();
        assert!(image_pos < shape_pos && shape_pos < boxes_pos);
        assert!(text.starts_with("{\n  \"image\""));

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "image": "images/sample.png",
                "shape": [480, 640],
                "boxes": [[1, 2, 3, 4]],
            })
        );
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boxes.json");
        std::fs::write(&path, "not json at all, and rather long").unwrap();

        save(&session_with(Vec::new()), &path).unwrap();
        assert!(load(&path).unwrap().boxes.is_empty());
    }

    #[test]
    fn test_malformed_entries_are_dropped() {
        let loaded = parse(r#"{"boxes": [[1, 2, 3, 4], ["a", 1, 2, 3]]}"#).unwrap();
        assert_eq!(loaded.boxes, vec![Rect::new(1, 2, 3, 4)]);
        assert_eq!(loaded.dropped, 1);
    }

    #[test]
    fn test_entry_shape_checks() {
        let json = r#"{"boxes": [
            [1, 2, 3],
            [1, 2, 3, 4, 5],
            {"x": 1},
            7,
            [1, 2, 3.5, 4],
            [1.0, 2.0, 3.0, 4.0],
            [-1, 2, 3, 4],
            [1, 2, 0, 4],
            [null, 2, 3, 4]
        ]}"#;
        let loaded = parse(json).unwrap();
        assert_eq!(loaded.boxes, vec![Rect::new(1, 2, 3, 4)]);
        assert_eq!(loaded.dropped, 8);
    }

    #[test]
    fn test_entry_past_coordinate_range_is_dropped() {
        let loaded = parse(r#"{"boxes": [[100, 0, 2147483600, 10], [0, 2147483000, 5, 1000], [1, 2, 3, 4]]}"#)
            .unwrap();
        assert_eq!(loaded.boxes, vec![Rect::new(1, 2, 3, 4)]);
        assert_eq!(loaded.dropped, 2);

        let session = session_with(loaded.boxes);
        assert_eq!(session.hit_test(Point::new(200, 5)), None);
        assert_eq!(session.hit_test(Point::new(2, 3)), Some(0));
    }

    #[test]
    fn test_missing_boxes_key_is_not_fatal() {
        let loaded = parse(r#"{"image": "a.png", "shape": [10, 20]}"#).unwrap();
        assert!(loaded.boxes.is_empty());
        assert_eq!(loaded.image.as_deref(), Some("a.png"));
        assert_eq!(loaded.shape, Some([10, 20]));
    }

    #[test]
    fn test_non_object_is_format_error() {
        let err = parse("[[1, 2, 3, 4]]").unwrap_err();
        assert!(matches!(err, BoxError::Format { .. }));
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(parse("{").unwrap_err(), BoxError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, BoxError::NotFound { .. }));
    }
}
