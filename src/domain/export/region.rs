// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/export/region.rs
//
// Export region tracking: a rectangle locked to the original image size,
// projected into display space through the base layer transform.

use crate::domain::geometry::{DisplayTransform, Rect};

use super::error::{ExportError, ExportResult};

/// Original pixel size of the base image plus the transform the user applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseImageState {
    width: u32,
    height: u32,
    pub transform: DisplayTransform,
}

impl BaseImageState {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Tracks the export rectangle of one editor session.
///
/// Two coordinate frames are kept apart: `base_rect` lives in original image
/// pixels and only changes when a new image is loaded (or the base pixels are
/// resampled), `export_rect` is its projection into display space and is
/// always recomputed from scratch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportRegion {
    base: Option<BaseImageState>,
    base_rect: Option<Rect>,
    export_rect: Option<Rect>,
}

impl ExportRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the original dimensions of a freshly loaded base image.
    ///
    /// Resets the transform to identity, so the export rectangle equals
    /// `(0, 0, width, height)` until the next transform change.
    pub fn set_base_image(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Base image has zero size ({width}x{height}); export will be rejected");
        }

        let base_rect = Rect::from_size(width, height);
        self.base = Some(BaseImageState {
            width,
            height,
            transform: DisplayTransform::IDENTITY,
        });
        self.base_rect = Some(base_rect);
        self.export_rect = Some(base_rect);
    }

    /// Reproject the export rectangle through `transform`.
    ///
    /// No-op before a base image is set.
    pub fn on_base_transform_changed(&mut self, transform: DisplayTransform) -> Option<Rect> {
        let (Some(base), Some(base_rect)) = (self.base.as_mut(), self.base_rect) else {
            log::debug!("Ignoring transform change without a base image");
            return None;
        };

        base.transform = transform;
        let rect = transform.map_rect(&base_rect);
        self.export_rect = Some(rect);
        Some(rect)
    }

    /// Current export rectangle in display space.
    pub fn export_rect(&self) -> Option<Rect> {
        self.export_rect
    }

    /// Full original image bounds in original pixel space.
    pub fn base_rect(&self) -> Option<Rect> {
        self.base_rect
    }

    pub fn base(&self) -> Option<&BaseImageState> {
        self.base.as_ref()
    }

    pub fn original_size(&self) -> Option<(u32, u32)> {
        self.base.map(|b| b.dimensions())
    }

    pub fn transform(&self) -> Option<DisplayTransform> {
        self.base.map(|b| b.transform)
    }

    pub fn is_initialized(&self) -> bool {
        self.base.is_some()
    }

    /// The base pixels were resampled to `new_width x new_height`.
    ///
    /// The new size becomes the original size. The scale is kept and the
    /// translation moves so the export rectangle keeps its display center.
    /// Returns the adjusted transform.
    pub fn resize_base(&mut self, new_width: u32, new_height: u32) -> Option<DisplayTransform> {
        let base = self.base?;
        let old_rect = self.export_rect.unwrap_or_default();
        let (cx, cy) = old_rect.center();
        let scale = base.transform.scale;

        let transform = if base.transform.is_degenerate() {
            base.transform
        } else {
            DisplayTransform::new(
                scale,
                cx - new_width as f32 * scale / 2.0,
                cy - new_height as f32 * scale / 2.0,
            )
        };

        self.set_base_image(new_width, new_height);
        self.on_base_transform_changed(transform);
        Some(transform)
    }

    /// Forget the base image.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check the preconditions of a final render.
    ///
    /// Returns the export rectangle and original dimensions.
    pub fn require_export(&self) -> ExportResult<(Rect, u32, u32)> {
        let (Some(base), Some(rect)) = (self.base, self.export_rect) else {
            return Err(ExportError::Uninitialized);
        };

        if base.width == 0 || base.height == 0 || rect.is_empty() {
            return Err(ExportError::InvalidExportState {
                width: rect.width,
                height: rect.height,
            });
        }

        Ok((rect, base.width, base.height))
    }
}
