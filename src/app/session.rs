// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/session.rs
//
// Editor session: owns export region, scene, overlay and history, and
// applies editor events to them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use image::imageops::{self, FilterType};

use super::history::History;
use super::message::{EditorEvent, Outcome};
use super::overlay::{ExportOverlay, render_preview};
use crate::config::{AppConfig, Theme};
use crate::constant::SCALE_EPSILON;
use crate::domain::export::{ExportError, ExportFormat, ExportRegion, ExportResult, save_image};
use crate::domain::geometry::{DisplayTransform, Rect};
use crate::domain::scene::{LayerId, LayerStep, LayerTransform, Scene, render_export};

/// Undoable editor state.
#[derive(Debug, Clone)]
struct Snapshot {
    scene: Scene,
    region: ExportRegion,
}

/// One editing session over one base image at a time.
pub struct EditorSession {
    config: AppConfig,
    region: ExportRegion,
    scene: Scene,
    canvas_bounds: Option<Rect>,
    overlay: ExportOverlay,
    history: History<Snapshot>,
    current_path: Option<PathBuf>,
}

impl EditorSession {
    pub fn new(config: AppConfig) -> Self {
        let config = config.validated();
        let overlay = ExportOverlay::new(config.theme);
        let history = History::new(config.history_limit);
        Self {
            config,
            region: ExportRegion::new(),
            scene: Scene::new(),
            canvas_bounds: None,
            overlay,
            history,
            current_path: None,
        }
    }

    /// Apply one event.
    pub fn handle(&mut self, event: EditorEvent) -> ExportResult<Outcome> {
        let changed = match event {
            EditorEvent::LoadBase { image, path } => {
                self.load_base(image, path);
                true
            }
            EditorEvent::TransformChanged(transform) => self.set_base_transform(transform),
            EditorEvent::Zoom { factor, anchor } => self.zoom(factor, anchor),
            EditorEvent::ZoomIn => self.zoom(self.config.scale_step, self.canvas_center()),
            EditorEvent::ZoomOut => self.zoom(1.0 / self.config.scale_step, self.canvas_center()),
            EditorEvent::Pan { dx, dy } => self.pan(dx, dy),
            EditorEvent::PanLeft => self.pan(-self.config.pan_step, 0.0),
            EditorEvent::PanRight => self.pan(self.config.pan_step, 0.0),
            EditorEvent::PanUp => self.pan(0.0, -self.config.pan_step),
            EditorEvent::PanDown => self.pan(0.0, self.config.pan_step),
            EditorEvent::CanvasResized(bounds) => {
                self.resize_canvas(bounds);
                true
            }
            EditorEvent::ResizeBase { width, height } => self.resize_base(width, height),
            EditorEvent::AddLayer { image } => self.add_layer(image).is_some(),
            EditorEvent::RemoveLayer(id) => self.remove_layer(id),
            EditorEvent::MoveLayer { id, step } => self.move_layer(id, step),
            EditorEvent::SetLayerVisible { id, visible } => self.set_layer_visible(id, visible),
            EditorEvent::SetLayerTransform {
                id,
                transform,
                opacity,
            } => self.set_layer_transform(id, transform, opacity),
            EditorEvent::Undo => self.undo(),
            EditorEvent::Redo => self.redo(),
            EditorEvent::SetTheme(theme) => {
                self.set_theme(theme);
                true
            }
            EditorEvent::ExportRequested => return self.render_export().map(Outcome::Exported),
        };

        Ok(if changed {
            Outcome::Redraw
        } else {
            Outcome::Ignored
        })
    }

    // -------------------------------------------------------------------------
    // Base image and view
    // -------------------------------------------------------------------------

    /// Replace the session content with a new base image.
    pub fn load_base(&mut self, image: RgbaImage, path: Option<PathBuf>) {
        let (width, height) = image.dimensions();
        self.scene.set_base(Arc::new(image));
        self.region.set_base_image(width, height);
        self.scene.sync_base_transform(DisplayTransform::IDENTITY);
        self.current_path = path;
        self.fit_canvas();
        let snapshot = self.snapshot();
        self.history.reset(snapshot);
        log::info!("Loaded base image {width}x{height}");
    }

    /// Apply a new display transform to the base layer.
    pub fn set_base_transform(&mut self, transform: DisplayTransform) -> bool {
        if self.region.on_base_transform_changed(transform).is_none() {
            return false;
        }
        if transform.is_degenerate() {
            log::warn!("Degenerate base transform (scale {}); export disabled", transform.scale);
        }
        self.scene.sync_base_transform(transform);
        self.refresh_overlay();
        true
    }

    /// Zoom the base layer around `anchor`, clamped to the configured range.
    pub fn zoom(&mut self, factor: f32, anchor: (f32, f32)) -> bool {
        let Some(current) = self.region.transform() else {
            return false;
        };
        let Some(next) =
            current.zoomed(factor, anchor, self.config.min_scale, self.config.max_scale)
        else {
            return false;
        };
        if (next.scale - current.scale).abs() < SCALE_EPSILON {
            return false;
        }
        self.set_base_transform(next)
    }

    pub fn pan(&mut self, dx: f32, dy: f32) -> bool {
        match self.region.transform() {
            Some(current) => self.set_base_transform(current.panned(dx, dy)),
            None => false,
        }
    }

    /// The visible canvas changed size or position.
    pub fn resize_canvas(&mut self, bounds: Rect) {
        self.canvas_bounds = Some(bounds);
        self.refresh_overlay();
    }

    /// Resample the base pixels and keep the export area centered.
    pub fn resize_base(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {width}x{height}");
            return false;
        }
        let Some(base) = self.scene.base() else {
            return false;
        };
        if base.dimensions() == (width, height) {
            return false;
        }

        let resized = imageops::resize(base.image.as_ref(), width, height, FilterType::Lanczos3);
        self.scene.replace_base_image(Arc::new(resized));

        let Some(transform) = self.region.resize_base(width, height) else {
            return false;
        };
        self.scene.sync_base_transform(transform);
        self.fit_canvas();
        self.push_history();
        true
    }

    // -------------------------------------------------------------------------
    // Layers
    // -------------------------------------------------------------------------

    /// Add an image layer centered on the canvas.
    pub fn add_layer(&mut self, image: RgbaImage) -> Option<LayerId> {
        if !self.region.is_initialized() {
            log::warn!("Cannot add a layer without a base image");
            return None;
        }
        let (cx, cy) = self.canvas_center();
        let id = self.scene.add_layer(Arc::new(image), cx, cy);
        self.push_history();
        Some(id)
    }

    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        let removed = self.scene.remove_layer(id);
        if removed {
            self.push_history();
        }
        removed
    }

    pub fn move_layer(&mut self, id: LayerId, step: LayerStep) -> bool {
        let moved = self.scene.move_layer(id, step);
        if moved {
            self.push_history();
        }
        moved
    }

    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> bool {
        self.scene.set_visible(id, visible)
    }

    pub fn set_layer_transform(
        &mut self,
        id: LayerId,
        transform: LayerTransform,
        opacity: f32,
    ) -> bool {
        let updated = self.scene.set_layer_transform(id, transform, opacity);
        if updated {
            self.push_history();
        }
        updated
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -------------------------------------------------------------------------
    // Appearance
    // -------------------------------------------------------------------------

    pub fn set_theme(&mut self, theme: Theme) {
        self.config.theme = theme;
        self.overlay.set_theme(theme);
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Render the final image at the original base size.
    pub fn render_export(&self) -> ExportResult<RgbaImage> {
        let (rect, width, height) = self.region.require_export()?;
        render_export(&self.scene, rect, width, height)
    }

    /// Render the editing view of the canvas including the overlay.
    pub fn render_preview(&self) -> ExportResult<RgbaImage> {
        let canvas = self.canvas_bounds().ok_or(ExportError::Uninitialized)?;
        render_preview(&self.scene, &self.overlay, canvas, self.config.max_preview_side)
    }

    /// Render and write the export to `path`.
    pub fn export_to(&mut self, path: &Path, format: ExportFormat) -> ExportResult<()> {
        let image = self.render_export()?;
        save_image(&image, path, format)?;
        log::info!("Exported {} as {format}", path.display());
        self.current_path = Some(path.to_path_buf());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn export_rect(&self) -> Option<Rect> {
        self.region.export_rect()
    }

    pub fn region(&self) -> &ExportRegion {
        &self.region
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn overlay(&self) -> &ExportOverlay {
        &self.overlay
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn canvas_bounds(&self) -> Option<Rect> {
        self.canvas_bounds
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Size the canvas around the export area with generous padding.
    fn fit_canvas(&mut self) {
        if let Some(rect) = self.region.export_rect() {
            let pad = self
                .config
                .canvas_padding_min
                .max(rect.width.max(rect.height) * self.config.canvas_padding_factor);
            self.canvas_bounds = Some(rect.padded(pad));
        }
        self.refresh_overlay();
    }

    fn refresh_overlay(&mut self) {
        match (self.region.export_rect(), self.canvas_bounds) {
            (Some(rect), Some(canvas)) => self.overlay.update(rect, canvas),
            _ => self.overlay.clear(),
        }
    }

    fn canvas_center(&self) -> (f32, f32) {
        self.canvas_bounds
            .or_else(|| self.region.export_rect())
            .map(|r| r.center())
            .unwrap_or_default()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            scene: self.scene.clone(),
            region: self.region.clone(),
        }
    }

    fn push_history(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.scene = snapshot.scene;
        self.region = snapshot.region;
        self.fit_canvas();
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn session_with_base(w: u32, h: u32) -> EditorSession {
        let mut session = EditorSession::new(AppConfig::default());
        session
            .handle(EditorEvent::LoadBase {
                image: RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 255])),
                path: None,
            })
            .unwrap();
        session
    }

    #[test]
    fn test_scenario_scale_and_translate() {
        let mut session = session_with_base(800, 600);
        assert_eq!(session.export_rect(), Some(Rect::new(0.0, 0.0, 800.0, 600.0)));

        session
            .handle(EditorEvent::TransformChanged(DisplayTransform::new(2.0, 50.0, 50.0)))
            .unwrap();
        assert_eq!(
            session.export_rect(),
            Some(Rect::new(50.0, 50.0, 1600.0, 1200.0))
        );

        let out = session.render_export().unwrap();
        assert_eq!(out.dimensions(), (800, 600));
        assert_eq!(out.get_pixel(400, 300), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_scenario_zero_scale() {
        let mut session = session_with_base(80, 60);
        session
            .handle(EditorEvent::TransformChanged(DisplayTransform::new(0.0, 0.0, 0.0)))
            .unwrap();

        let canvas = session.canvas_bounds().unwrap();
        let overlay = session.overlay();
        assert_eq!(overlay.background, None);
        assert_eq!(overlay.mask.subpaths, vec![canvas]);

        assert!(matches!(
            session.handle(EditorEvent::ExportRequested),
            Err(ExportError::InvalidExportState { .. })
        ));
    }

    #[test]
    fn test_scenario_before_load() {
        let mut session = EditorSession::new(AppConfig::default());
        assert_eq!(session.export_rect(), None);
        assert!(session.overlay().is_empty());
        assert!(matches!(
            session.handle(EditorEvent::ExportRequested),
            Err(ExportError::Uninitialized)
        ));
        assert!(matches!(
            session.handle(EditorEvent::TransformChanged(DisplayTransform::IDENTITY)),
            Ok(Outcome::Ignored)
        ));
        assert!(matches!(
            session.render_preview(),
            Err(ExportError::Uninitialized)
        ));
    }

    #[test]
    fn test_load_fits_padded_canvas() {
        let session = session_with_base(800, 600);
        // max(2000, 800 * 2.0) = 2000
        assert_eq!(
            session.canvas_bounds(),
            Some(Rect::new(-2000.0, -2000.0, 4800.0, 4600.0))
        );
        let overlay = session.overlay();
        assert_eq!(overlay.background, Some(Rect::new(0.0, 0.0, 800.0, 600.0)));
        assert!(overlay.mask_contains(-10.0, -10.0));
        assert!(!overlay.mask_contains(10.0, 10.0));
    }

    #[test]
    fn test_canvas_resize_updates_mask() {
        let mut session = session_with_base(10, 10);
        let canvas = Rect::new(-5.0, -5.0, 20.0, 20.0);
        session.handle(EditorEvent::CanvasResized(canvas)).unwrap();
        assert_eq!(session.overlay().mask.subpaths[0], canvas);

        let preview = session.render_preview().unwrap();
        assert_eq!(preview.dimensions(), (20, 20));
        assert_eq!(preview.get_pixel(10, 10), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_export_never_contains_mask() {
        let mut session = session_with_base(10, 10);
        session.set_theme(Theme::Dark);
        session
            .handle(EditorEvent::TransformChanged(DisplayTransform::new(3.0, -4.0, 9.0)))
            .unwrap();
        let out = session.render_export().unwrap();
        assert!(out.pixels().all(|p| *p == Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn test_zoom_is_clamped_and_anchored() {
        let mut session = session_with_base(100, 100);
        session
            .handle(EditorEvent::Zoom {
                factor: 100.0,
                anchor: (0.0, 0.0),
            })
            .unwrap();
        let t = session.region().transform().unwrap();
        assert_eq!(t.scale, session.config().max_scale);
        assert_eq!((t.translate_x, t.translate_y), (0.0, 0.0));

        // Already at the limit: nothing to do.
        assert!(matches!(
            session.handle(EditorEvent::Zoom {
                factor: 2.0,
                anchor: (0.0, 0.0)
            }),
            Ok(Outcome::Ignored)
        ));
    }

    #[test]
    fn test_zoom_in_and_out_use_scale_step() {
        let mut session = session_with_base(100, 100);
        session.handle(EditorEvent::ZoomIn).unwrap();
        let step = session.config().scale_step;
        let t = session.region().transform().unwrap();
        assert!((t.scale - step).abs() < 1e-5);

        session.handle(EditorEvent::ZoomOut).unwrap();
        let t = session.region().transform().unwrap();
        assert!((t.scale - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pan_moves_export_rect() {
        let mut session = session_with_base(100, 50);
        session.handle(EditorEvent::Pan { dx: 10.0, dy: -5.0 }).unwrap();
        assert_eq!(session.export_rect(), Some(Rect::new(10.0, -5.0, 100.0, 50.0)));

        let step = session.config().pan_step;
        session.handle(EditorEvent::PanLeft).unwrap();
        session.handle(EditorEvent::PanDown).unwrap();
        assert_eq!(
            session.export_rect(),
            Some(Rect::new(10.0 - step, -5.0 + step, 100.0, 50.0))
        );
    }

    #[test]
    fn test_resize_base_keeps_center_and_size() {
        let mut session = session_with_base(800, 600);
        session
            .handle(EditorEvent::TransformChanged(DisplayTransform::new(2.0, 50.0, 50.0)))
            .unwrap();
        let center = session.export_rect().unwrap().center();

        session
            .handle(EditorEvent::ResizeBase {
                width: 400,
                height: 300,
            })
            .unwrap();
        assert_eq!(session.export_rect().unwrap().center(), center);
        assert_eq!(session.region().original_size(), Some((400, 300)));
        assert_eq!(session.scene().base().unwrap().dimensions(), (400, 300));
        assert_eq!(session.render_export().unwrap().dimensions(), (400, 300));

        assert!(matches!(
            session.handle(EditorEvent::ResizeBase {
                width: 0,
                height: 300
            }),
            Ok(Outcome::Ignored)
        ));
    }

    #[test]
    fn test_layers_and_undo_redo() {
        let mut session = session_with_base(10, 10);
        session.resize_canvas(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!session.can_undo());

        let id = session
            .add_layer(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255])))
            .unwrap();
        assert_eq!(session.scene().layers().len(), 2);
        let out = session.render_export().unwrap();
        assert_eq!(out.get_pixel(5, 5), &Rgba([0, 0, 255, 255]));

        assert!(session.handle(EditorEvent::RemoveLayer(id)).is_ok());
        assert_eq!(session.scene().layers().len(), 1);

        assert!(session.undo());
        assert!(session.scene().layer(id).is_some());
        assert!(session.undo());
        assert_eq!(session.scene().layers().len(), 1);
        assert!(!session.undo());

        assert!(session.redo());
        assert!(session.redo());
        assert!(session.scene().layer(id).is_none());
        assert!(!session.redo());
    }

    #[test]
    fn test_undo_resize_refits_canvas() {
        let config = AppConfig {
            canvas_padding_min: 0.0,
            canvas_padding_factor: 0.1,
            ..AppConfig::default()
        };
        let mut session = EditorSession::new(config);
        session.load_base(RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255])), None);

        assert!(session.resize_base(10, 10));
        assert!(session.undo());

        let export = session.export_rect().unwrap();
        let canvas = session.canvas_bounds().unwrap();
        assert_eq!(export, Rect::from_size(100, 100));
        assert!(canvas.contains(export.x, export.y));
        assert!(canvas.right() >= export.right() && canvas.bottom() >= export.bottom());
        assert!(!session.overlay().mask_contains(10.0, 10.0));

        assert!(session.redo());
        let export = session.export_rect().unwrap();
        let canvas = session.canvas_bounds().unwrap();
        assert!(canvas.right() >= export.right() && canvas.x <= export.x);
    }

    #[test]
    fn test_near_zero_scale_export_is_rejected() {
        let mut session = session_with_base(80, 60);
        assert!(session.set_base_transform(DisplayTransform::new(1e-40, 0.0, 0.0)));
        assert!(matches!(
            session.render_export(),
            Err(ExportError::InvalidExportState { .. })
        ));
    }

    #[test]
    fn test_preview_size_is_capped() {
        let config = AppConfig {
            max_preview_side: 256,
            ..AppConfig::default()
        };
        let mut session = EditorSession::new(config);
        session.load_base(RgbaImage::from_pixel(400, 300, Rgba([255, 0, 0, 255])), None);

        let canvas = session.canvas_bounds().unwrap();
        assert!(canvas.width > 256.0);
        let preview = session.render_preview().unwrap();
        assert!(preview.width().max(preview.height()) <= 256);
    }

    #[test]
    fn test_zoom_in_above_max_scale_is_ignored() {
        let mut session = session_with_base(100, 100);
        session
            .handle(EditorEvent::TransformChanged(DisplayTransform::new(10.0, 0.0, 0.0)))
            .unwrap();
        assert!(matches!(session.handle(EditorEvent::ZoomIn), Ok(Outcome::Ignored)));
        assert_eq!(session.region().transform().unwrap().scale, 10.0);

        session.handle(EditorEvent::ZoomOut).unwrap();
        assert_eq!(session.region().transform().unwrap().scale, session.config().max_scale);
    }

    #[test]
    fn test_inverted_zoom_range_is_replaced() {
        let config = AppConfig {
            min_scale: 4.0,
            max_scale: 1.0,
            ..AppConfig::default()
        };
        let mut session = EditorSession::new(config);
        session.load_base(RgbaImage::new(10, 10), None);
        assert!(session.config().min_scale <= session.config().max_scale);
        session.handle(EditorEvent::ZoomIn).unwrap();
    }

    #[test]
    fn test_base_layer_cannot_be_removed() {
        let mut session = session_with_base(10, 10);
        let base = session.scene().base().unwrap().id;
        assert!(matches!(
            session.handle(EditorEvent::RemoveLayer(base)),
            Ok(Outcome::Ignored)
        ));
    }

    #[test]
    fn test_reload_resets_history_and_region() {
        let mut session = session_with_base(10, 10);
        session.add_layer(RgbaImage::new(2, 2));
        assert!(session.can_undo());

        session.load_base(RgbaImage::new(30, 20), Some(PathBuf::from("next.png")));
        assert!(!session.can_undo());
        assert_eq!(session.scene().layers().len(), 1);
        assert_eq!(session.export_rect(), Some(Rect::new(0.0, 0.0, 30.0, 20.0)));
        assert_eq!(session.current_path(), Some(Path::new("next.png")));
    }

    #[test]
    fn test_export_to_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.png");

        let mut session = session_with_base(12, 8);
        session
            .handle(EditorEvent::TransformChanged(DisplayTransform::new(0.5, 3.0, 3.0)))
            .unwrap();
        session.export_to(&path, ExportFormat::Png).unwrap();

        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (12, 8));
        assert_eq!(session.current_path(), Some(path.as_path()));
    }
}
