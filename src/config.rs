// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Command line configuration.

use crate::io::detect::DetectionParams;
use crate::util::geometry::DEFAULT_MAX_DISPLAY_DIM;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Interactive bounding box annotator.
///
/// Drag with the left mouse button to draw a box. Keys: s save, u undo,
/// d delete box under mouse, r reset, h help, q or Esc quit.
#[derive(Parser, Debug, Clone)]
#[command(name = "boxmark", version, about, long_about = None)]
pub struct Cli {
    /// Path to image file
    pub image: PathBuf,

    /// Path to save boxes JSON (default: <image name>_boxes.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Load existing boxes JSON to edit
    #[arg(short, long)]
    pub load: Option<PathBuf>,

    /// Largest dimension of the display surface
    #[arg(long, default_value_t = DEFAULT_MAX_DISPLAY_DIM, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_display_dim: u32,

    /// Seed the session with detected candidate boxes when nothing is loaded
    #[arg(long)]
    pub detect: bool,
}

/// Resolved editor settings.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub image_path: PathBuf,
    pub output_path: PathBuf,
    pub load_path: Option<PathBuf>,
    pub max_display_dim: u32,
    pub detect: bool,
    pub detection: DetectionParams,
}

impl From<Cli> for EditorConfig {
    fn from(cli: Cli) -> Self {
        let output_path = cli
            .output
            .unwrap_or_else(|| default_output_name(&cli.image));
        Self {
            image_path: cli.image,
            output_path,
            load_path: cli.load,
            max_display_dim: cli.max_display_dim,
            detect: cli.detect,
            detection: DetectionParams::default(),
        }
    }
}

/// `<image stem>_boxes.json`, relative to the working directory.
pub fn default_output_name(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("{stem}_boxes.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output_name(Path::new("data/scans/page1.png")),
            PathBuf::from("page1_boxes.json")
        );
        assert_eq!(
            default_output_name(Path::new("archive.tar.gz")),
            PathBuf::from("archive.tar_boxes.json")
        );
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["boxmark", "scan.jpg"]).unwrap();
        let config = EditorConfig::from(cli);
        assert_eq!(config.image_path, PathBuf::from("scan.jpg"));
        assert_eq!(config.output_path, PathBuf::from("scan_boxes.json"));
        assert_eq!(config.load_path, None);
        assert_eq!(config.max_display_dim, 1000);
        assert!(!config.detect);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "boxmark",
            "scan.jpg",
            "-o",
            "out.json",
            "--load",
            "old.json",
            "--max-display-dim",
            "800",
            "--detect",
        ])
        .unwrap();
        let config = EditorConfig::from(cli);
        assert_eq!(config.output_path, PathBuf::from("out.json"));
        assert_eq!(config.load_path, Some(PathBuf::from("old.json")));
        assert_eq!(config.max_display_dim, 800);
        assert!(config.detect);
    }

    #[test]
    fn test_zero_display_dim_rejected() {
        assert!(Cli::try_parse_from(["boxmark", "a.png", "--max-display-dim", "0"]).is_err());
    }
}
