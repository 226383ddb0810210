// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: boxes and the editing session that owns them.

pub mod annotation;
pub mod session;
