// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/message.rs
//
// Editor events: user actions and surface notifications.

use std::path::PathBuf;

use image::RgbaImage;

use crate::config::Theme;
use crate::domain::geometry::{DisplayTransform, Rect};
use crate::domain::scene::{LayerId, LayerStep, LayerTransform};

#[derive(Debug, Clone)]
pub enum EditorEvent {
    // Document.
    LoadBase {
        image: RgbaImage,
        path: Option<PathBuf>,
    },

    // Base layer view.
    TransformChanged(DisplayTransform),
    Zoom {
        factor: f32,
        anchor: (f32, f32),
    },
    ZoomIn,
    ZoomOut,
    Pan {
        dx: f32,
        dy: f32,
    },
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    CanvasResized(Rect),

    // Base pixels.
    ResizeBase {
        width: u32,
        height: u32,
    },

    // Layers.
    AddLayer {
        image: RgbaImage,
    },
    RemoveLayer(LayerId),
    MoveLayer {
        id: LayerId,
        step: LayerStep,
    },
    SetLayerVisible {
        id: LayerId,
        visible: bool,
    },
    SetLayerTransform {
        id: LayerId,
        transform: LayerTransform,
        opacity: f32,
    },

    // History.
    Undo,
    Redo,

    // Appearance.
    SetTheme(Theme),

    // Export.
    ExportRequested,
}

/// Result of handling one event.
#[derive(Debug)]
pub enum Outcome {
    /// State changed; the surface should redraw.
    Redraw,
    /// The final image rendered for an export request.
    Exported(RgbaImage),
    /// Nothing changed.
    Ignored,
}
