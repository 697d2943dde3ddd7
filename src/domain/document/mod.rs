// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/mod.rs
//
// Base image loading: format detection and decoding to RGBA pixels.

pub mod raster;
#[cfg(feature = "vector")]
pub mod vector;

use std::fmt;
use std::path::Path;

use anyhow::Context;
use image::{ImageFormat, RgbaImage};

/// Supported document kinds (for format detection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Raster,
    Vector,
}

impl DocumentKind {
    /// Detect document kind from file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();

        // SVG
        #[cfg(feature = "vector")]
        if ext == "svg" || ext == "svgz" {
            return Some(Self::Vector);
        }

        // Raster: check via image-rs
        if ImageFormat::from_extension(&ext).is_some() {
            return Some(Self::Raster);
        }

        None
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raster => write!(f, "Raster"),
            Self::Vector => write!(f, "Vector"),
        }
    }
}

/// Open a base image from disk as RGBA pixels.
pub fn open_document(path: &Path) -> anyhow::Result<RgbaImage> {
    let kind = DocumentKind::from_path(path)
        .ok_or_else(|| anyhow::anyhow!("Unsupported file type: {}", path.display()))?;

    let image = match kind {
        DocumentKind::Raster => raster::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?,
        #[cfg(feature = "vector")]
        DocumentKind::Vector => vector::open(path)?,
        #[cfg(not(feature = "vector"))]
        DocumentKind::Vector => anyhow::bail!("Vector support is disabled"),
    };

    log::debug!(
        "Opened {kind} document {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}
