// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/mod.rs
//
// Application layer: editor session, events, overlay and history.

pub mod history;
pub mod message;
pub mod overlay;
pub mod session;

pub use message::{EditorEvent, Outcome};
pub use overlay::{ExportOverlay, MaskShape, render_preview};
pub use session::EditorSession;
