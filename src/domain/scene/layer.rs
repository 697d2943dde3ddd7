// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/scene/layer.rs
//
// Image layers placed in scene space.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use resvg::tiny_skia::Transform;

use crate::domain::geometry::{DisplayTransform, Rect};

/// Stable identifier of a layer within one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// The loaded image the export region is locked to.
    Base,
    /// An image added on top of the base.
    Image,
}

/// Placement of a layer: scale and rotation about the layer origin, then
/// translation to `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTransform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Clockwise rotation in degrees.
    pub rotation: f32,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl From<DisplayTransform> for LayerTransform {
    fn from(t: DisplayTransform) -> Self {
        Self {
            x: t.translate_x,
            y: t.translate_y,
            scale: t.scale,
            rotation: 0.0,
        }
    }
}

impl LayerTransform {
    /// Layer-local to scene transform.
    pub fn to_skia(&self) -> Transform {
        Transform::from_translate(self.x, self.y)
            .pre_concat(Transform::from_rotate(self.rotation))
            .pre_concat(Transform::from_scale(self.scale, self.scale))
    }
}

/// One image in the scene.
#[derive(Debug, Clone)]
pub struct ImageLayer {
    pub id: LayerId,
    pub kind: LayerKind,
    /// Shared pixels; snapshots clone the `Arc`, not the buffer.
    pub image: Arc<RgbaImage>,
    pub transform: LayerTransform,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    pub visible: bool,
}

impl ImageLayer {
    pub fn new(id: LayerId, kind: LayerKind, image: Arc<RgbaImage>) -> Self {
        Self {
            id,
            kind,
            image,
            transform: LayerTransform::default(),
            opacity: 1.0,
            visible: true,
        }
    }

    pub fn is_base(&self) -> bool {
        self.kind == LayerKind::Base
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Axis-aligned bounding box of the transformed layer in scene space.
    pub fn scene_bounds(&self) -> Rect {
        let (w, h) = self.dimensions();
        let ts = self.transform.to_skia();
        let corners = [(0.0, 0.0), (w as f32, 0.0), (0.0, h as f32), (w as f32, h as f32)];

        let mut min = (f32::INFINITY, f32::INFINITY);
        let mut max = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for (cx, cy) in corners {
            let x = ts.sx * cx + ts.kx * cy + ts.tx;
            let y = ts.ky * cx + ts.sy * cy + ts.ty;
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }

        Rect::new(min.0, min.1, max.0 - min.0, max.1 - min.1)
    }
}
