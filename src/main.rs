// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! boxmark - interactive bounding box annotator
//!
//! Draw axis-aligned boxes on an image with the mouse and save them as
//! JSON in the original image's pixel coordinates.

mod app;
mod config;
mod error;
mod io;
mod models;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::BoxEditorApp;
use clap::Parser;
use config::{Cli, EditorConfig};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EditorConfig::from(Cli::parse());
    let image_path = config.image_path.clone();
    let app = BoxEditorApp::new(config)
        .with_context(|| format!("Could not start editor for {}", image_path.display()))?;

    log::info!("Draw boxes by clicking and dragging with the left mouse button.");
    log::info!("Press 'h' for help. 's' save, 'u' undo, 'd' delete under mouse, 'r' reset, 'q' or ESC quit.");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(app.window_size())
            .with_title("Draw Boxes - press 'h' for help"),
        ..Default::default()
    };

    eframe::run_native("boxmark", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
