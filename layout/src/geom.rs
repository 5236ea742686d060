//! Canvas geometry: points, rectangles, and the screen-to-canvas viewport.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in canvas px, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// The full canvas rectangle.
    #[must_use]
    pub fn canvas() -> Self {
        Self::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }

    /// Move this rect so it lies inside `bounds`, shrinking it first if it is
    /// larger than `bounds` in either dimension.
    #[must_use]
    pub fn clamp_within(&self, bounds: &Rect) -> Rect {
        let width = self.width.min(bounds.width);
        let height = self.height.min(bounds.height);
        let x = self.x.max(bounds.x).min(bounds.right() - width);
        let y = self.y.max(bounds.y).min(bounds.bottom() - height);
        Rect { x, y, width, height }
    }

    /// Largest rect with the given aspect ratio that fits inside `self`,
    /// centered. Returns `self` when the intrinsic size is degenerate.
    #[must_use]
    pub fn contain(&self, intrinsic_width: f64, intrinsic_height: f64) -> Rect {
        if intrinsic_width <= 0.0 || intrinsic_height <= 0.0 {
            return *self;
        }
        let scale = (self.width / intrinsic_width).min(self.height / intrinsic_height);
        let width = intrinsic_width * scale;
        let height = intrinsic_height * scale;
        Rect {
            x: self.x + (self.width - width) * 0.5,
            y: self.y + (self.height - height) * 0.5,
            width,
            height,
        }
    }
}

/// Maps host screen coordinates onto the fixed-size canvas.
///
/// The editor shows the page at some offset and scale inside the host
/// surface. `offset_x` / `offset_y` are the screen position of the canvas
/// origin; `scale` is screen px per canvas px (1.0 = actual size).
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { offset_x: 0.0, offset_y: 0.0, scale: 1.0 }
    }
}

impl Viewport {
    /// Convert a screen-space point to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset_x) / self.scale,
            y: (screen.y - self.offset_y) / self.scale,
        }
    }

    /// Convert a canvas point to screen coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.scale + self.offset_x,
            y: canvas.y * self.scale + self.offset_y,
        }
    }
}
