// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Box editing session state.
//!
//! A session owns the box list for one image together with the drag in
//! progress. Boxes are stored in image coordinates; the display scale is
//! fixed when the session is created and only used to translate pointer
//! input and to build render snapshots.

use super::annotation::{Point, Rect};
use crate::error::{BoxError, Result};
use crate::util::geometry::{self, ImageSize};

/// Pointer drag state, in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { start: Point, current: Point },
}

/// Render-ready view of a session, in display coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub boxes: Vec<Rect>,
    pub in_progress: Option<Rect>,
}

/// The editing session for a single image.
#[derive(Debug, Clone)]
pub struct BoxSession {
    /// Source image path or identifier, written to box files
    image: String,
    size: ImageSize,
    scale: f64,
    boxes: Vec<Rect>,
    drag: DragState,
}

impl BoxSession {
    /// Create an empty session for an image of the given size.
    ///
    /// The display scale is chosen so the larger side fits `max_display_dim`.
    pub fn new(image: impl Into<String>, size: ImageSize, max_display_dim: u32) -> Self {
        let scale = geometry::display_scale(size, max_display_dim);
        Self {
            image: image.into(),
            size,
            scale,
            boxes: Vec::new(),
            drag: DragState::Idle,
        }
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn boxes(&self) -> &[Rect] {
        &self.boxes
    }

    #[cfg(test)]
    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Replace the box list, e.g. after loading a box file or seeding.
    pub fn set_boxes(&mut self, boxes: Vec<Rect>) {
        self.boxes = boxes;
    }

    /// Start a drag at a display point.
    pub fn begin_drag(&mut self, point: Point) {
        self.drag = DragState::Dragging {
            start: point,
            current: point,
        };
    }

    /// Move the active drag's current corner. Ignored when idle.
    pub fn update_drag(&mut self, point: Point) {
        if let DragState::Dragging { current, .. } = &mut self.drag {
            *current = point;
        }
    }

    /// Finish the active drag and commit its rectangle.
    ///
    /// Returns the committed image-space box, or `None` when idle or when the
    /// rectangle has zero width or height after mapping.
    pub fn end_drag(&mut self, point: Point) -> Option<Rect> {
        let DragState::Dragging { start, .. } = std::mem::take(&mut self.drag) else {
            return None;
        };

        let a = geometry::to_image(start, self.scale, self.size);
        let b = geometry::to_image(point, self.scale, self.size);
        let rect = Rect::from_corners(a, b);
        if rect.is_degenerate() {
            log::debug!("Discarded degenerate drag {:?} -> {:?}", start, point);
            return None;
        }

        self.boxes.push(rect);
        log::info!("Added box: {:?} (image coords)", <[i32; 4]>::from(rect));
        Some(rect)
    }

    /// Remove the most recently added box.
    pub fn undo(&mut self) -> Option<Rect> {
        let removed = self.boxes.pop();
        match removed {
            Some(rect) => log::info!("Undone last box: {:?}", <[i32; 4]>::from(rect)),
            None => log::debug!("No boxes to undo"),
        }
        removed
    }

    /// Remove the box at `index`. Later boxes shift down by one.
    pub fn delete_at(&mut self, index: usize) -> Result<Rect> {
        if index >= self.boxes.len() {
            return Err(BoxError::Index {
                index,
                len: self.boxes.len(),
            });
        }
        let removed = self.boxes.remove(index);
        log::info!("Deleted box #{}: {:?}", index, <[i32; 4]>::from(removed));
        Ok(removed)
    }

    /// Index of the first box whose display rectangle contains `point`.
    ///
    /// Overlaps resolve to the earliest created box.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.boxes
            .iter()
            .position(|rect| geometry::to_display(rect, self.scale).contains(point))
    }

    /// Remove every box.
    pub fn reset(&mut self) {
        let count = self.boxes.len();
        self.boxes.clear();
        log::info!("All boxes removed ({})", count);
    }

    /// Display-space view of the session for drawing.
    pub fn snapshot(&self) -> Snapshot {
        let boxes = self
            .boxes
            .iter()
            .map(|rect| geometry::to_display(rect, self.scale))
            .collect();
        let in_progress = match self.drag {
            DragState::Dragging { start, current } => Some(Rect::from_corners(start, current)),
            DragState::Idle => None,
        };
        Snapshot { boxes, in_progress }
    }
}
