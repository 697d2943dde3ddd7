// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/raster.rs
//
// Raster base images (PNG, JPEG, WebP, ...).

use std::path::Path;

use image::{ImageReader, RgbaImage};

/// Decode a raster image from disk into RGBA8 pixels.
pub fn open(path: &Path) -> image::ImageResult<RgbaImage> {
    let document = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(document.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_open_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.png");
        RgbaImage::from_pixel(5, 3, Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let image = open(&path).unwrap();
        assert_eq!(image.dimensions(), (5, 3));
        assert_eq!(image.get_pixel(4, 2), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_open_missing_file_fails() {
        assert!(open(Path::new("/nonexistent/base.png")).is_err());
    }
}
