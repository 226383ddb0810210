// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module is the platform layer around a [`BoxSession`]: it owns the
//! only session instance, forwards canvas pointer activity and key presses
//! to it, and runs save/load on explicit commands. Confirmation for reset
//! lives here, not in the session.

use crate::config::EditorConfig;
use crate::error::Result;
use crate::io::{detect, media::LoadedImage, serialization};
use crate::models::annotation::Point;
use crate::models::session::BoxSession;
use crate::ui::{canvas, toolbar};
use std::path::{Path, PathBuf};

const HELP_TEXT: &str = "\
Left mouse button drag : draw a box
u                      : undo last box
d                      : delete box under mouse
r                      : reset (remove all boxes)
s                      : save boxes to output file
q or ESC               : quit without saving (if not saved)
h                      : show this help";

/// Main application state.
pub struct BoxEditorApp {
    session: BoxSession,

    /// Display-scaled RGBA pixels waiting to become a texture
    pending_pixels: Option<egui::ColorImage>,

    /// Display image texture
    texture: Option<egui::TextureHandle>,

    /// Where `s` writes the box file
    output_path: PathBuf,

    /// Whether any save succeeded this session
    saved: bool,

    /// Last pointer position over the image, display coordinates
    hover: Option<Point>,

    confirm_reset: bool,
    show_help: bool,

    /// Last user-facing message
    status: String,
}

impl BoxEditorApp {
    /// Load the image and optional box file named in `config`.
    ///
    /// An unreadable image is fatal; an unreadable box file is reported and
    /// the session starts empty.
    pub fn new(config: EditorConfig) -> Result<Self> {
        let image = crate::io::media::load_image(&config.image_path)?;
        log::info!(
            "Loaded image: {} ({}x{})",
            config.image_path.display(),
            image.width,
            image.height
        );
        Ok(Self::from_image(config, image))
    }

    /// Build the editor around an already decoded image.
    pub fn from_image(config: EditorConfig, image: LoadedImage) -> Self {
        let session = BoxSession::new(
            config.image_path.to_string_lossy(),
            image.size(),
            config.max_display_dim,
        );
        let (display, pixels) = image.display_pixels(session.scale());
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [display.width as usize, display.height as usize],
            &pixels,
        );

        let mut app = Self {
            session,
            pending_pixels: Some(color_image),
            texture: None,
            output_path: config.output_path,
            saved: false,
            hover: None,
            confirm_reset: false,
            show_help: false,
            status: String::new(),
        };

        if let Some(path) = &config.load_path {
            app.load_boxes(path);
        } else if config.detect {
            let boxes = detect::detect_candidate_boxes(&image.source, &config.detection);
            app.status = format!("Seeded {} detected boxes", boxes.len());
            log::info!("{}", app.status);
            app.session.set_boxes(boxes);
        }

        app
    }

    pub fn session(&self) -> &BoxSession {
        &self.session
    }

    /// Initial window size: the display image plus menu and status bars.
    pub fn window_size(&self) -> [f32; 2] {
        let display = self.session.size().scaled(self.session.scale());
        [display.width as f32 + 16.0, display.height as f32 + 64.0]
    }

    /// Save to `path`, or to the current output path.
    ///
    /// A failed save leaves the session and output path untouched.
    fn save(&mut self, path: Option<PathBuf>) {
        let path = path.unwrap_or_else(|| self.output_path.clone());
        match serialization::save(&self.session, &path) {
            Ok(()) => {
                self.status = format!("Saved {} boxes to {}", self.session.boxes().len(), path.display());
                self.output_path = path;
                self.saved = true;
            }
            Err(e) => {
                log::error!("Failed to save boxes to {}: {}", path.display(), e);
                self.status = format!("Save failed: {}", e);
            }
        }
    }

    /// Replace the session's boxes with the contents of a box file.
    fn load_boxes(&mut self, path: &Path) {
        match serialization::load(path) {
            Ok(loaded) => {
                if let Some(image) = &loaded.image {
                    if image != self.session.image() {
                        log::info!("Box file was saved for image {}", image);
                    }
                }
                let size = self.session.size();
                if let Some([h, w]) = loaded.shape {
                    if [h, w] != [size.height, size.width] {
                        log::warn!(
                            "Box file shape {}x{} differs from image {}x{}",
                            w,
                            h,
                            size.width,
                            size.height
                        );
                    }
                }
                self.status = if loaded.dropped > 0 {
                    format!("Loaded {} boxes ({} skipped)", loaded.boxes.len(), loaded.dropped)
                } else {
                    format!("Loaded {} boxes", loaded.boxes.len())
                };
                self.session.set_boxes(loaded.boxes);
            }
            Err(e) => {
                log::error!("Could not load boxes from {}: {}", path.display(), e);
                self.status = format!("Could not load boxes: {}", e);
            }
        }
    }

    fn undo(&mut self) {
        self.status = match self.session.undo() {
            Some(rect) => format!("Undone last box: {:?}", <[i32; 4]>::from(rect)),
            None => "No boxes to undo.".to_string(),
        };
    }

    /// Delete the first box under the pointer, if any.
    fn delete_under_pointer(&mut self) {
        let Some(index) = self.hover.and_then(|p| self.session.hit_test(p)) else {
            self.status = "No box under mouse to delete.".to_string();
            return;
        };
        self.status = match self.session.delete_at(index) {
            Ok(rect) => format!("Deleted box #{}: {:?}", index, <[i32; 4]>::from(rect)),
            Err(e) => {
                log::error!("{}", e);
                e.to_string()
            }
        };
    }

    fn reset(&mut self) {
        self.session.reset();
        self.status = "All boxes removed.".to_string();
    }

    fn handle_canvas(&mut self, output: canvas::CanvasOutput) {
        self.hover = output.hover.or(self.hover);
        match output.action {
            canvas::CanvasAction::BeginDrag(p) => self.session.begin_drag(p),
            canvas::CanvasAction::UpdateDrag(p) => self.session.update_drag(p),
            canvas::CanvasAction::EndDrag(p) => {
                if let Some(rect) = self.session.end_drag(p) {
                    self.status = format!("Added box: {:?}", <[i32; 4]>::from(rect));
                }
            }
            canvas::CanvasAction::None => {}
        }
    }

    fn quit(&self, ctx: &egui::Context) {
        self.log_unsaved();
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn log_unsaved(&self) {
        if !self.saved {
            log::warn!(
                "Boxes not explicitly saved. Press 's' before quitting or pass --output to choose a file."
            );
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() || self.confirm_reset {
            return;
        }
        let pressed = |key: egui::Key| ctx.input(|i| i.key_pressed(key));

        if pressed(egui::Key::Escape) || pressed(egui::Key::Q) {
            log::info!("Quit requested");
            self.quit(ctx);
            return;
        }
        if pressed(egui::Key::H) {
            log::info!("Controls:\n{}", HELP_TEXT);
            self.show_help = !self.show_help;
        }
        if pressed(egui::Key::S) {
            self.save(None);
        }
        if pressed(egui::Key::U) {
            self.undo();
        }
        if pressed(egui::Key::R) {
            self.confirm_reset = true;
        }
        if pressed(egui::Key::D) {
            self.delete_under_pointer();
        }
    }

    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if self.confirm_reset {
            egui::Window::new("Reset")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(format!("Remove all {} boxes?", self.session.boxes().len()));
                    ui.horizontal(|ui| {
                        if ui.button("Reset").clicked() || ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            self.reset();
                            self.confirm_reset = false;
                        }
                        if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                            self.status = "Reset cancelled.".to_string();
                            self.confirm_reset = false;
                        }
                    });
                });
        }

        if self.show_help {
            egui::Window::new("Help")
                .open(&mut self.show_help)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.monospace(HELP_TEXT);
                });
        }
    }
}

impl eframe::App for BoxEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(image) = self.pending_pixels.take() {
            self.texture = Some(ctx.load_texture("display_image", image, egui::TextureOptions::LINEAR));
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            self.log_unsaved();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save (s)").clicked() {
                        self.save(None);
                        ui.close_menu();
                    }
                    if ui.button("Save As...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_file_name(self.output_path.to_string_lossy())
                            .save_file()
                        {
                            self.save(Some(path));
                        }
                        ui.close_menu();
                    }
                    if ui.button("Load Boxes...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .pick_file()
                        {
                            self.load_boxes(&path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit (q)").clicked() {
                        self.quit(ctx);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let has_boxes = !self.session.boxes().is_empty();
                    if ui.add_enabled(has_boxes, egui::Button::new("Undo (u)")).clicked() {
                        self.undo();
                        ui.close_menu();
                    }
                    if ui.add_enabled(has_boxes, egui::Button::new("Reset... (r)")).clicked() {
                        self.confirm_reset = true;
                        ui.close_menu();
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("Controls (h)").clicked() {
                        self.show_help = true;
                        ui.close_menu();
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            toolbar::show(ui, &self.session, &self.output_path, &self.status);
        });

        let output = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let texture = self.texture.as_ref()?;
                let snapshot = self.session.snapshot();
                let output = egui::ScrollArea::both()
                    .show(ui, |ui| canvas::show(ui, texture, &snapshot))
                    .inner;
                Some(output)
            })
            .inner;

        if let Some(output) = output {
            self.handle_canvas(output);
        }

        self.handle_keys(ctx);
        self.show_dialogs(ctx);
    }
}
