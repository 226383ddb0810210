// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for images, box files and candidate detection.

pub mod detect;
pub mod media;
pub mod serialization;
