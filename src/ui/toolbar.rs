// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Status bar shown under the canvas.

use crate::models::session::BoxSession;
use std::path::Path;

/// Display box count, scale, output file and the last message.
pub fn show(ui: &mut egui::Ui, session: &BoxSession, output_path: &Path, status: &str) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label(format!("Boxes: {}", session.boxes().len()));
        ui.separator();

        let size = session.size();
        ui.label(format!(
            "{}x{} @ {:.0}%",
            size.width,
            size.height,
            session.scale() * 100.0
        ));
        ui.separator();

        ui.label(format!("Output: {}", output_path.display()));

        if session.is_dragging() {
            ui.separator();
            ui.label("Drawing");
        }

        if !status.is_empty() {
            ui.separator();
            ui.label(egui::RichText::new(status).italics().weak());
        }
    });
}
