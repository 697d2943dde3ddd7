// SPDX-License-Identifier: GPL-3.0-or-later
// src/config.rs
//
// Global configuration for the editor session.

use std::path::PathBuf;

use crate::constant::{MASK_COLOR_DARK, MASK_COLOR_LIGHT, MAX_PREVIEW_SIDE};

/// Colour theme of the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// RGBA colour of the dim mask drawn outside the export area.
    #[must_use]
    pub fn mask_color(self) -> [u8; 4] {
        match self {
            Theme::Light => MASK_COLOR_LIGHT,
            Theme::Dark => MASK_COLOR_DARK,
        }
    }
}

/// Global configuration for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Optional default directory exports are written to.
    pub default_export_dir: Option<PathBuf>,
    /// Theme of the editing surface (controls the mask colour).
    pub theme: Theme,
    /// Scale step factor for keyboard zoom (e.g., 1.1 = 10% per step).
    pub scale_step: f32,
    /// Pan step size in pixels per key press.
    pub pan_step: f32,
    /// Minimum zoom scale (e.g., 0.2 = 20%).
    pub min_scale: f32,
    /// Maximum zoom scale (e.g., 5.0 = 500%).
    pub max_scale: f32,
    /// Minimum padding in scene units around the export area when fitting the canvas.
    pub canvas_padding_min: f32,
    /// Padding around the export area relative to its longest side.
    pub canvas_padding_factor: f32,
    /// Longest side of the rendered editing preview in pixels.
    pub max_preview_side: u32,
    /// Default JPEG quality (1-100).
    pub jpeg_quality: u8,
    /// Maximum number of undo states kept.
    pub history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_export_dir: dirs::picture_dir().or_else(dirs::home_dir),
            theme: Theme::Light,
            scale_step: 1.1,
            pan_step: 50.0,
            min_scale: 0.2,
            max_scale: 5.0,
            canvas_padding_min: 2000.0,
            canvas_padding_factor: 2.0,
            max_preview_side: MAX_PREVIEW_SIDE,
            jpeg_quality: 90,
            history_limit: 30,
        }
    }
}

impl AppConfig {
    /// Zoom limits usable with `f32::clamp`; invalid bounds fall back to the
    /// defaults.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let valid = self.min_scale.is_finite()
            && self.max_scale.is_finite()
            && self.min_scale > 0.0
            && self.min_scale <= self.max_scale;
        if !valid {
            let defaults = Self::default();
            log::warn!(
                "Invalid zoom range {}..{}, using {}..{}",
                self.min_scale,
                self.max_scale,
                defaults.min_scale,
                defaults.max_scale
            );
            self.min_scale = defaults.min_scale;
            self.max_scale = defaults.max_scale;
        }
        self
    }
}
