// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/mod.rs
//
// Pure domain layer: geometry, export region, scene content, documents.

pub mod document;
pub mod export;
pub mod geometry;
pub mod scene;
