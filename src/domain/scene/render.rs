// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/scene/render.rs
//
// Rasterize scene layers and render the final export image.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Color, ColorU8, FilterQuality, Pixmap, PixmapPaint, Transform};

use super::Scene;
use crate::constant::EXPORT_BACKGROUND;
use crate::domain::export::{ExportError, ExportResult};
use crate::domain::geometry::Rect;

/// Paint every visible layer onto `pixmap`, bottom to top.
///
/// `view` maps scene coordinates to pixmap pixels.
pub fn paint_scene(pixmap: &mut Pixmap, scene: &Scene, view: Transform) {
    for layer in scene.layers().iter().filter(|l| l.visible && l.opacity > 0.0) {
        let Some(source) = pixmap_from_rgba(&layer.image) else {
            log::warn!("Skipping empty layer {}", layer.id);
            continue;
        };

        let paint = PixmapPaint {
            opacity: layer.opacity,
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };

        pixmap.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &paint,
            view.pre_concat(layer.transform.to_skia()),
            None,
        );
    }
}

/// Render the scene content inside `export_rect` into a
/// `width x height` image.
///
/// The export rectangle is stretched over the whole target, so an export
/// rectangle that tracks the base layer yields the base at its original
/// resolution. The target starts white; overlay decoration is never part of
/// the scene and therefore never rendered here.
pub fn render_export(
    scene: &Scene,
    export_rect: Rect,
    width: u32,
    height: u32,
) -> ExportResult<RgbaImage> {
    let invalid = || ExportError::InvalidExportState {
        width: export_rect.width,
        height: export_rect.height,
    };
    if width == 0 || height == 0 || export_rect.is_empty() {
        return Err(invalid());
    }

    // A finite but tiny export rectangle can still overflow the view scale.
    let sx = width as f32 / export_rect.width;
    let sy = height as f32 / export_rect.height;
    if !sx.is_finite() || !sy.is_finite() {
        return Err(invalid());
    }
    let view = Transform::from_scale(sx, sy)
        .pre_concat(Transform::from_translate(-export_rect.x, -export_rect.y));
    if !view.is_finite() || view.invert().is_none() {
        return Err(invalid());
    }

    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Allocation { width, height })?;
    let [r, g, b, a] = EXPORT_BACKGROUND;
    pixmap.fill(Color::from_rgba8(r, g, b, a));

    paint_scene(&mut pixmap, scene, view);

    log::debug!(
        "Rendered export {width}x{height} from region {:?}",
        export_rect.as_tuple()
    );
    Ok(rgba_from_pixmap(&pixmap))
}

/// Convert straight-alpha RGBA pixels into a premultiplied pixmap.
pub fn pixmap_from_rgba(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Convert a premultiplied pixmap back into straight-alpha RGBA pixels.
pub fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}
