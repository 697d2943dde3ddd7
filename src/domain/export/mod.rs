// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/export/mod.rs
//
// Export region state, errors and output formats.

pub mod error;
pub mod format;
pub mod region;

pub use error::{ExportError, ExportResult};
pub use format::{ExportFormat, save_image};
pub use region::{BaseImageState, ExportRegion};
