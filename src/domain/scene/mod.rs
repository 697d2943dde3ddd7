// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/scene/mod.rs
//
// Scene content: ordered image layers with a single base layer.

pub mod layer;
pub mod render;

use std::sync::Arc;

use image::RgbaImage;

pub use layer::{ImageLayer, LayerId, LayerKind, LayerTransform};
pub use render::{paint_scene, render_export};

use crate::domain::geometry::DisplayTransform;

/// Direction for reordering a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerStep {
    /// Towards the top (painted later).
    Up,
    /// Towards the bottom (painted earlier).
    Down,
}

/// Ordered layers; index 0 is painted first.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    layers: Vec<ImageLayer>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all content with a single base layer.
    pub fn set_base(&mut self, image: Arc<RgbaImage>) -> LayerId {
        self.layers.clear();
        let id = self.allocate_id();
        self.layers
            .push(ImageLayer::new(id, LayerKind::Base, image));
        id
    }

    pub fn base(&self) -> Option<&ImageLayer> {
        self.layers.iter().find(|l| l.is_base())
    }

    /// Swap the base pixels, keeping its position in the stack.
    pub fn replace_base_image(&mut self, image: Arc<RgbaImage>) -> bool {
        match self.layers.iter_mut().find(|l| l.is_base()) {
            Some(base) => {
                base.image = image;
                true
            }
            None => false,
        }
    }

    /// Mirror the display transform on the base layer.
    pub fn sync_base_transform(&mut self, transform: DisplayTransform) {
        if let Some(base) = self.layers.iter_mut().find(|l| l.is_base()) {
            base.transform = transform.into();
        }
    }

    /// Add an image layer on top, centered on `(cx, cy)` in scene space.
    pub fn add_layer(&mut self, image: Arc<RgbaImage>, cx: f32, cy: f32) -> LayerId {
        let id = self.allocate_id();
        let (w, h) = image.dimensions();
        let mut layer = ImageLayer::new(id, LayerKind::Image, image);
        layer.transform.x = cx - w as f32 / 2.0;
        layer.transform.y = cy - h as f32 / 2.0;
        self.layers.push(layer);
        id
    }

    /// Remove an image layer. The base layer cannot be removed.
    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        match self.index_of(id) {
            Some(index) if !self.layers[index].is_base() => {
                self.layers.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Swap a layer with its neighbour. Returns false at the ends of the stack.
    pub fn move_layer(&mut self, id: LayerId, step: LayerStep) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };

        let target = match step {
            LayerStep::Up => index + 1,
            LayerStep::Down => match index.checked_sub(1) {
                Some(i) => i,
                None => return false,
            },
        };

        if target >= self.layers.len() {
            return false;
        }

        self.layers.swap(index, target);
        true
    }

    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Update placement and opacity of an image layer.
    ///
    /// The base layer follows the display transform and is not placed here.
    pub fn set_layer_transform(
        &mut self,
        id: LayerId,
        transform: LayerTransform,
        opacity: f32,
    ) -> bool {
        match self.layer_mut(id) {
            Some(layer) if !layer.is_base() => {
                layer.transform = transform;
                layer.opacity = opacity.clamp(0.0, 1.0);
                true
            }
            _ => false,
        }
    }

    pub fn layer(&self, id: LayerId) -> Option<&ImageLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layers(&self) -> &[ImageLayer] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn layer_mut(&mut self, id: LayerId) -> Option<&mut ImageLayer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    fn allocate_id(&mut self) -> LayerId {
        self.next_id += 1;
        LayerId(self.next_id)
    }
}
