// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and box annotation.
//!
//! The canvas shows the display-scaled image at 1:1 and reports pointer
//! activity in display coordinates, relative to the image's top-left
//! corner. It never touches the session directly; it only draws a
//! snapshot and returns what the pointer did.

use crate::models::annotation::{Point, Rect};
use crate::models::session::Snapshot;

const BOX_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 255, 0);
const DRAG_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 0, 0);
const CROSSHAIR_COLOR: egui::Color32 = egui::Color32::from_gray(200);
const HEADER_COLOR: egui::Color32 = egui::Color32::from_gray(230);

/// Pointer activity on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasAction {
    None,
    BeginDrag(Point),
    UpdateDrag(Point),
    EndDrag(Point),
}

/// What happened on the canvas this frame.
pub struct CanvasOutput {
    pub action: CanvasAction,
    /// Pointer position over the image, in display coordinates
    pub hover: Option<Point>,
}

/// Display the canvas and handle mouse interactions.
pub fn show(ui: &mut egui::Ui, texture: &egui::TextureHandle, snapshot: &Snapshot) -> CanvasOutput {
    let size = texture.size_vec2();
    let (image_rect, response) = ui.allocate_exact_size(size, egui::Sense::drag());

    let to_display = |pos: egui::Pos2| {
        let rel = pos - image_rect.min;
        Point::new(rel.x.round() as i32, rel.y.round() as i32)
    };

    let mut action = CanvasAction::None;
    if response.drag_started() {
        // Start from where the button went down, not where egui decided
        // the press became a drag.
        let origin = ui
            .input(|i| i.pointer.press_origin())
            .or_else(|| response.interact_pointer_pos());
        if let Some(pos) = origin {
            action = CanvasAction::BeginDrag(to_display(pos));
        }
    } else if response.drag_stopped() {
        let pos = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.latest_pos()));
        if let Some(pos) = pos {
            action = CanvasAction::EndDrag(to_display(pos));
        }
    } else if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            action = CanvasAction::UpdateDrag(to_display(pos));
        }
    }

    let hover = response.hover_pos().map(to_display);

    let painter = ui.painter_at(image_rect);
    painter.image(
        texture.id(),
        image_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    for rect in &snapshot.boxes {
        painter.rect_stroke(
            screen_rect(image_rect, rect),
            0.0,
            egui::Stroke::new(2.0, BOX_COLOR),
        );
    }

    if let Some(rect) = &snapshot.in_progress {
        painter.rect_stroke(
            screen_rect(image_rect, rect),
            0.0,
            egui::Stroke::new(1.0, DRAG_COLOR),
        );
    }

    if let Some(p) = hover {
        let center = image_rect.min + egui::vec2(p.x as f32, p.y as f32);
        let stroke = egui::Stroke::new(1.0, CROSSHAIR_COLOR);
        painter.line_segment([center - egui::vec2(10.0, 0.0), center + egui::vec2(10.0, 0.0)], stroke);
        painter.line_segment([center - egui::vec2(0.0, 10.0), center + egui::vec2(0.0, 10.0)], stroke);
    }

    painter.text(
        image_rect.min + egui::vec2(10.0, 8.0),
        egui::Align2::LEFT_TOP,
        format!(
            "Boxes: {}  (s: save  u: undo  d: delete under mouse  r: reset  q: quit)",
            snapshot.boxes.len()
        ),
        egui::FontId::proportional(13.0),
        HEADER_COLOR,
    );

    CanvasOutput { action, hover }
}

/// Screen rectangle of a display-space box.
fn screen_rect(image_rect: egui::Rect, rect: &Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        image_rect.min + egui::vec2(rect.x as f32, rect.y as f32),
        egui::vec2(rect.w as f32, rect.h as f32),
    )
}
