// SPDX-License-Identifier: GPL-3.0-or-later
// src/constant.rs
//
// Application constants that should not be changed by the user.

/// Export area background (RGBA), drawn below every scene layer.
pub const EXPORT_BACKGROUND: [u8; 4] = [255, 255, 255, 255];

/// Dim mask colour for the light theme (RGBA).
pub const MASK_COLOR_LIGHT: [u8; 4] = [0, 0, 0, 60];

/// Dim mask colour for the dark theme (RGBA).
pub const MASK_COLOR_DARK: [u8; 4] = [15, 11, 13, 140];

/// Canvas backdrop behind the export area in the editing preview (RGBA).
pub const CANVAS_BACKDROP: [u8; 4] = [128, 128, 128, 255];

/// Default longest side of the editing preview in pixels.
pub const MAX_PREVIEW_SIDE: u32 = 2048;

/// Minimum pixmap size for SVG rendering (prevents 0x0 images).
pub const MIN_PIXMAP_SIZE: u32 = 1;

/// Tolerance for scale comparisons (float precision in zoom synchronization).
pub const SCALE_EPSILON: f32 = 0.0001;

/// Lowest JPEG quality accepted by the encoder.
pub const JPEG_QUALITY_MIN: u8 = 1;

/// Highest JPEG quality accepted by the encoder.
pub const JPEG_QUALITY_MAX: u8 = 100;

/// Suffix appended to the source file stem for default export names.
pub const EXPORT_SUFFIX: &str = "export";
