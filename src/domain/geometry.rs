// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/geometry.rs
//
// Rectangles and the base layer display transform.

/// Axis-aligned rectangle in floating point units.
///
/// Pure domain model - the unit (original pixels or scene units) depends on
/// the coordinate frame the rectangle lives in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin covering `width x height` pixels.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    pub fn as_tuple(&self) -> (f32, f32, f32, f32) {
        (self.x, self.y, self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True for zero-area or non-finite rectangles.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite())
    }

    /// Grow the rectangle by `pad` on every side.
    pub fn padded(&self, pad: f32) -> Self {
        Self::new(
            self.x - pad,
            self.y - pad,
            self.width + pad * 2.0,
            self.height + pad * 2.0,
        )
    }

    /// Half-open containment test (`[x, right) x [y, bottom)`).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Uniform scale followed by a translation: `display = original * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DisplayTransform {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0);

    pub const fn new(scale: f32, translate_x: f32, translate_y: f32) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Zero or non-finite scale collapses everything onto a single point.
    pub fn is_degenerate(&self) -> bool {
        !self.scale.is_finite() || self.scale == 0.0
    }

    /// Translation with non-finite components replaced by zero.
    pub fn translation(&self) -> (f32, f32) {
        (finite_or_zero(self.translate_x), finite_or_zero(self.translate_y))
    }

    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.scale + self.translate_x,
            y * self.scale + self.translate_y,
        )
    }

    /// Map a rectangle from original space into display space.
    ///
    /// Degenerate transforms and overflowing results yield a zero-area
    /// rectangle at the translation instead of NaN or infinite geometry.
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let (tx, ty) = self.translation();
        if self.is_degenerate() {
            return Rect::new(tx, ty, 0.0, 0.0);
        }

        let (x0, y0) = self.map_point(rect.x, rect.y);
        let (x1, y1) = self.map_point(rect.right(), rect.bottom());
        let mapped = Rect::new(x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs());

        if [mapped.x, mapped.y, mapped.width, mapped.height]
            .iter()
            .all(|v| v.is_finite())
        {
            mapped
        } else {
            Rect::new(tx, ty, 0.0, 0.0)
        }
    }

    /// Same transform shifted by `(dx, dy)` display units.
    pub fn panned(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.scale, self.translate_x + dx, self.translate_y + dy)
    }

    /// Multiply the scale by `factor`, clamped to `[min_scale, max_scale]`,
    /// keeping the display point `anchor` fixed.
    ///
    /// Returns `None` when the current scale or the factor cannot produce a
    /// meaningful zoom (zero or non-finite), when the bounds are unusable, or
    /// when clamping would move the scale against the direction of `factor`.
    pub fn zoomed(
        &self,
        factor: f32,
        anchor: (f32, f32),
        min_scale: f32,
        max_scale: f32,
    ) -> Option<Self> {
        if self.is_degenerate() || factor <= 0.0 || !factor.is_finite() {
            return None;
        }
        if min_scale.is_nan() || max_scale.is_nan() || min_scale > max_scale {
            return None;
        }

        let target = (self.scale * factor).clamp(min_scale, max_scale);
        // A scale already outside the range must not jump against the zoom direction.
        if (factor > 1.0 && target < self.scale) || (factor < 1.0 && target > self.scale) {
            return None;
        }
        let k = target / self.scale;
        let (ax, ay) = anchor;

        Some(Self::new(
            target,
            ax - (ax - self.translate_x) * k,
            ay - (ay - self.translate_y) * k,
        ))
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}
