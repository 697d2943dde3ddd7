// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/vector.rs
//
// Vector base images (SVG), rasterized once at their native size.

use std::path::Path;

use anyhow::Context;
use image::RgbaImage;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::constant::MIN_PIXMAP_SIZE;
use crate::domain::scene::render::rgba_from_pixmap;

/// Load an SVG from disk and rasterize it at native size.
pub fn open(path: &Path) -> anyhow::Result<RgbaImage> {
    let raw_data = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    rasterize(&raw_data)
}

/// Rasterize SVG data (plain or gzip-compressed) at native size.
pub fn rasterize(data: &[u8]) -> anyhow::Result<RgbaImage> {
    let document = Tree::from_data(data, &Options::default())?;

    let size = document.size();
    let width = (size.width().ceil() as u32).max(MIN_PIXMAP_SIZE);
    let height = (size.height().ceil() as u32).max(MIN_PIXMAP_SIZE);

    let mut pixmap =
        Pixmap::new(width, height).ok_or_else(|| anyhow::anyhow!("Failed to create pixmap"))?;
    resvg::render(&document, Transform::default(), &mut pixmap.as_mut());

    Ok(rgba_from_pixmap(&pixmap))
}
