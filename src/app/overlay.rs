// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/overlay.rs
//
// Export overlay: white export-area background and dim mask with the export
// area cut out by even-odd fill. Editing feedback only, never exported.

use image::RgbaImage;
use resvg::tiny_skia::{self, Color, FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::config::Theme;
use crate::constant::{CANVAS_BACKDROP, EXPORT_BACKGROUND};
use crate::domain::export::{ExportError, ExportResult};
use crate::domain::geometry::Rect;
use crate::domain::scene::render::rgba_from_pixmap;
use crate::domain::scene::{Scene, paint_scene};

/// Dim mask made of rectangular sub-paths filled with one fill rule.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskShape {
    pub subpaths: Vec<Rect>,
    pub fill_rule: FillRule,
}

impl Default for MaskShape {
    fn default() -> Self {
        Self {
            subpaths: Vec::new(),
            fill_rule: FillRule::EvenOdd,
        }
    }
}

impl MaskShape {
    /// The first sub-path bounds the mask; inside it, even-odd counts how
    /// many sub-paths contain the point. Export area outside the canvas is
    /// therefore never masked.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        match self.subpaths.first() {
            Some(outer) if outer.contains(x, y) => {}
            _ => return false,
        }
        let hits = self.subpaths.iter().filter(|r| r.contains(x, y)).count();
        match self.fill_rule {
            FillRule::EvenOdd => hits % 2 == 1,
            FillRule::Winding => hits > 0,
        }
    }

    fn to_path(&self) -> Option<tiny_skia::Path> {
        let mut pb = PathBuilder::new();
        for rect in self.subpaths.iter().filter(|r| !r.is_empty()) {
            pb.push_rect(tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)?);
        }
        pb.finish()
    }
}

/// The two derived overlay shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOverlay {
    /// Opaque fill behind the export area; `None` when the area is degenerate.
    pub background: Option<Rect>,
    pub mask: MaskShape,
    pub mask_color: [u8; 4],
}

impl Default for ExportOverlay {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl ExportOverlay {
    pub fn new(theme: Theme) -> Self {
        Self {
            background: None,
            mask: MaskShape::default(),
            mask_color: theme.mask_color(),
        }
    }

    /// Rebuild both shapes from the export rectangle and canvas bounds.
    ///
    /// A degenerate export rectangle leaves no background and a mask over
    /// the whole canvas.
    pub fn update(&mut self, export_rect: Rect, canvas_bounds: Rect) {
        let mut subpaths = vec![canvas_bounds];
        if export_rect.is_empty() {
            self.background = None;
        } else {
            self.background = Some(export_rect);
            subpaths.push(export_rect);
        }

        self.mask = MaskShape {
            subpaths,
            fill_rule: FillRule::EvenOdd,
        };
    }

    /// Drop all shapes (no base image loaded).
    pub fn clear(&mut self) {
        self.background = None;
        self.mask = MaskShape::default();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.mask_color = theme.mask_color();
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.mask.subpaths.is_empty()
    }

    pub fn mask_contains(&self, x: f32, y: f32) -> bool {
        self.mask.contains(x, y)
    }
}

/// Rasterize the editing view of `canvas_bounds`: backdrop, export
/// background, scene layers, then the dim mask on top.
///
/// The canvas is drawn 1:1 when it fits in `max_side` pixels and scaled down
/// uniformly otherwise, so the longest preview side never exceeds `max_side`.
pub fn render_preview(
    scene: &Scene,
    overlay: &ExportOverlay,
    canvas_bounds: Rect,
    max_side: u32,
) -> ExportResult<RgbaImage> {
    if canvas_bounds.is_empty() || max_side == 0 {
        return Err(ExportError::InvalidExportState {
            width: canvas_bounds.width,
            height: canvas_bounds.height,
        });
    }

    let longest = canvas_bounds.width.max(canvas_bounds.height);
    let scale = (max_side as f32 / longest).min(1.0);
    let width = preview_extent(canvas_bounds.width * scale, max_side);
    let height = preview_extent(canvas_bounds.height * scale, max_side);
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Allocation { width, height })?;

    let [r, g, b, a] = CANVAS_BACKDROP;
    pixmap.fill(Color::from_rgba8(r, g, b, a));

    let view = Transform::from_scale(scale, scale)
        .pre_concat(Transform::from_translate(-canvas_bounds.x, -canvas_bounds.y));
    if scale < 1.0 {
        log::debug!(
            "Preview of {:?} scaled by {scale} to {width}x{height}",
            canvas_bounds.as_tuple()
        );
    }

    if let Some(bg) = overlay.background {
        if let Some(rect) = tiny_skia::Rect::from_xywh(bg.x, bg.y, bg.width, bg.height) {
            pixmap.fill_rect(rect, &solid_paint(EXPORT_BACKGROUND), view, None);
        }
    }

    paint_scene(&mut pixmap, scene, view);

    if let Some(path) = overlay.mask.to_path() {
        pixmap.fill_path(
            &path,
            &solid_paint(overlay.mask_color),
            overlay.mask.fill_rule,
            view,
            None,
        );
    }

    Ok(rgba_from_pixmap(&pixmap))
}

fn preview_extent(len: f32, max_side: u32) -> u32 {
    (len.ceil() as u32).clamp(1, max_side)
}

fn solid_paint(color: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    let [r, g, b, a] = color;
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = false;
    paint
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use image::Rgba;

    use super::*;
    use crate::constant::MASK_COLOR_DARK;

    #[test]
    fn test_update_builds_cutout() {
        let mut overlay = ExportOverlay::default();
        let export = Rect::new(10.0, 10.0, 20.0, 20.0);
        let canvas = Rect::new(0.0, 0.0, 100.0, 100.0);
        overlay.update(export, canvas);

        assert_eq!(overlay.background, Some(export));
        assert_eq!(overlay.mask.subpaths, vec![canvas, export]);
        assert_eq!(overlay.mask.fill_rule, FillRule::EvenOdd);
        assert!(overlay.mask_contains(5.0, 5.0));
        assert!(!overlay.mask_contains(15.0, 15.0));
        assert!(!overlay.mask_contains(150.0, 5.0));
    }

    #[test]
    fn test_update_is_idempotent() {
        let export = Rect::new(50.0, 50.0, 1600.0, 1200.0);
        let canvas = Rect::new(-3150.0, -3150.0, 7900.0, 7500.0);

        let mut a = ExportOverlay::default();
        a.update(export, canvas);
        let first = a.clone();
        a.update(export, canvas);
        assert_eq!(a, first);

        let mut b = ExportOverlay::default();
        b.update(export, canvas);
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_export_masks_whole_canvas() {
        let mut overlay = ExportOverlay::default();
        let canvas = Rect::new(0.0, 0.0, 100.0, 100.0);
        overlay.update(Rect::new(40.0, 40.0, 0.0, 0.0), canvas);

        assert_eq!(overlay.background, None);
        assert_eq!(overlay.mask.subpaths, vec![canvas]);
        assert!(overlay.mask_contains(40.0, 40.0));
    }

    #[test]
    fn test_export_partially_outside_canvas() {
        let mut overlay = ExportOverlay::default();
        overlay.update(Rect::new(80.0, 80.0, 40.0, 40.0), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(!overlay.mask_contains(90.0, 90.0));
        assert!(overlay.mask_contains(50.0, 50.0));
        // Export area beyond the canvas edge is not dimmed either.
        assert!(!overlay.mask_contains(110.0, 110.0));
    }

    #[test]
    fn test_clear_and_theme() {
        let mut overlay = ExportOverlay::default();
        overlay.update(Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(0.0, 0.0, 2.0, 2.0));
        overlay.clear();
        assert!(overlay.is_empty());

        overlay.set_theme(Theme::Dark);
        assert_eq!(overlay.mask_color, MASK_COLOR_DARK);
    }

    #[test]
    fn test_preview_dims_outside_only() {
        let mut scene = Scene::new();
        scene.set_base(Arc::new(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]))));

        let canvas = Rect::new(-10.0, -10.0, 30.0, 30.0);
        let mut overlay = ExportOverlay::new(Theme::Dark);
        overlay.update(Rect::from_size(10, 10), canvas);

        let preview = render_preview(&scene, &overlay, canvas, 1024).unwrap();
        assert_eq!(preview.dimensions(), (30, 30));

        // Inside the export area the base shows undimmed.
        assert_eq!(preview.get_pixel(15, 15), &Rgba([255, 0, 0, 255]));

        // Outside, the backdrop is darkened by the mask.
        let outside = preview.get_pixel(2, 2);
        assert!(outside.0[0] < CANVAS_BACKDROP[0]);
        assert_eq!(outside.0[3], 255);
    }

    #[test]
    fn test_preview_of_large_canvas_is_bounded() {
        let mut scene = Scene::new();
        scene.set_base(Arc::new(RgbaImage::from_pixel(1000, 1000, Rgba([255, 0, 0, 255]))));

        // Padding of a 4000x3000 photo.
        let canvas = Rect::new(-8000.0, -8000.0, 20000.0, 19000.0);
        let mut overlay = ExportOverlay::default();
        overlay.update(Rect::from_size(1000, 1000), canvas);

        let preview = render_preview(&scene, &overlay, canvas, 200).unwrap();
        assert_eq!(preview.dimensions(), (200, 190));

        // The export area lands on (80, 80)..(90, 90) in the scaled preview.
        assert_eq!(preview.get_pixel(85, 85), &Rgba([255, 0, 0, 255]));
        assert!(preview.get_pixel(10, 10).0[0] < CANVAS_BACKDROP[0]);
    }

    #[test]
    fn test_preview_of_empty_canvas_is_rejected() {
        let scene = Scene::new();
        let overlay = ExportOverlay::default();
        assert!(matches!(
            render_preview(&scene, &overlay, Rect::new(0.0, 0.0, 0.0, 10.0), 100),
            Err(ExportError::InvalidExportState { .. })
        ));
    }

    #[test]
    fn test_preview_background_is_white_under_transparent_base() {
        let mut scene = Scene::new();
        scene.set_base(Arc::new(RgbaImage::new(10, 10)));

        let canvas = Rect::new(0.0, 0.0, 20.0, 20.0);
        let mut overlay = ExportOverlay::default();
        overlay.update(Rect::from_size(10, 10), canvas);

        let preview = render_preview(&scene, &overlay, canvas, 1024).unwrap();
        assert_eq!(preview.get_pixel(5, 5), &Rgba([255, 255, 255, 255]));
    }
}
