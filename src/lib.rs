// SPDX-License-Identifier: GPL-3.0-or-later
// src/lib.rs
//
// Export frame for the Noctua image editor: an export rectangle locked to the
// original image size, a dimmed editing overlay and the final export render.

pub mod app;
pub mod config;
pub mod constant;
pub mod domain;

pub use app::{EditorEvent, EditorSession, ExportOverlay, Outcome};
pub use config::{AppConfig, Theme};
pub use domain::export::{ExportError, ExportFormat, ExportRegion};
pub use domain::geometry::{DisplayTransform, Rect};
