// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/export/format.rs
//
// Output file formats for exported images.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};

use super::error::ExportResult;
use crate::constant::{JPEG_QUALITY_MAX, JPEG_QUALITY_MIN};

/// Encoded file format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg { quality: u8 },
}

impl ExportFormat {
    /// JPEG with quality clamped to the encoder range.
    #[must_use]
    pub fn jpeg(quality: u8) -> Self {
        Self::Jpeg {
            quality: quality.clamp(JPEG_QUALITY_MIN, JPEG_QUALITY_MAX),
        }
    }

    /// Parse a format name (`png`, `jpg`, `jpeg`, case-insensitive).
    #[must_use]
    pub fn from_name(name: &str, jpeg_quality: u8) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::jpeg(jpeg_quality)),
            _ => None,
        }
    }

    /// Derive the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path, jpeg_quality: u8) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_name(ext, jpeg_quality)
    }

    /// Preferred file extension.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => write!(f, "PNG"),
            Self::Jpeg { quality } => write!(f, "JPG (quality {quality})"),
        }
    }
}

/// Encode `image` to `path` in the given format.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
pub fn save_image(image: &RgbaImage, path: &Path, format: ExportFormat) -> ExportResult<()> {
    match format {
        ExportFormat::Png => {
            image.save_with_format(path, ImageFormat::Png)?;
        }
        ExportFormat::Jpeg { quality } => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let writer = BufWriter::new(File::create(path)?);
            let mut encoder = JpegEncoder::new_with_quality(writer, quality);
            encoder.encode_image(&rgb)?;
        }
    }

    log::debug!("Saved {}x{} export as {format} to {}", image.width(), image.height(), path.display());
    Ok(())
}
