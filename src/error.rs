// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for box sessions and box files.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the editing session and its persistence layer.
#[derive(Error, Debug)]
pub enum BoxError {
    /// Image or box file could not be opened
    #[error("Could not open {path:?}: {reason}")]
    NotFound {
        /// Path that was requested
        path: PathBuf,
        /// Underlying failure description
        reason: String,
    },

    /// Persisted data does not follow the box file schema
    #[error("Invalid box file: {message}")]
    Format {
        /// Description of the problem
        message: String,
    },

    /// Delete requested for a box that does not exist
    #[error("Box index {index} out of range ({len} boxes)")]
    Index { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoxError {
    /// Create a format error with the given message.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BoxError>;
