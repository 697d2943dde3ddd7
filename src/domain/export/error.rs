// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/export/error.rs
//
// Typed errors for export state and final rendering.

use thiserror::Error;

/// Errors raised while tracking, rendering or saving the export region.
#[derive(Error, Debug)]
pub enum ExportError {
    /// No base image has been loaded yet.
    #[error("Export state is uninitialized: load an image first")]
    Uninitialized,

    /// The export rectangle has zero area (e.g. after a zero scale transform).
    #[error("Invalid export state: export region is {width}x{height}")]
    InvalidExportState { width: f32, height: f32 },

    /// The render target could not be allocated.
    #[error("Failed to allocate a {width}x{height} render target")]
    Allocation { width: u32, height: u32 },

    /// Image encoding/decoding failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Writing the exported file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
