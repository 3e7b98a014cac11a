// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the rectangle a drag gesture selects, and the
//! coordinate transformation between screen positions and image pixels
//! for an image letterboxed into the canvas.

use crate::models::annotation::Point;

/// Rectangle selected by the operator, corners ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Region {
    /// Build a region from two drag corners given in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x1 == self.x2 || self.y1 == self.y2
    }
}

/// Maps between screen positions and image pixels for an aspect-preserving fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageTransform {
    /// Screen position of the image's top-left pixel.
    pub origin: (f32, f32),
    /// Screen units per image pixel.
    pub scale: f32,
    pub image_size: (u32, u32),
}

impl ImageTransform {
    /// Fit an image into the available screen rectangle, centered.
    pub fn fit(available_min: (f32, f32), available_size: (f32, f32), image_size: (u32, u32)) -> Self {
        let (img_w, img_h) = (image_size.0.max(1) as f32, image_size.1.max(1) as f32);
        let scale = (available_size.0 / img_w).min(available_size.1 / img_h);
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };

        let x_offset = (available_size.0 - img_w * scale) / 2.0;
        let y_offset = (available_size.1 - img_h * scale) / 2.0;

        Self {
            origin: (available_min.0 + x_offset, available_min.1 + y_offset),
            scale,
            image_size,
        }
    }

    /// On-screen size of the whole image.
    pub fn display_size(&self) -> (f32, f32) {
        (
            self.image_size.0 as f32 * self.scale,
            self.image_size.1 as f32 * self.scale,
        )
    }

    /// Convert a screen position to image pixels, clamped to the image.
    pub fn to_image(&self, screen_x: f32, screen_y: f32) -> Point {
        let x = ((screen_x - self.origin.0) / self.scale).round() as i32;
        let y = ((screen_y - self.origin.1) / self.scale).round() as i32;
        Point::new(
            x.clamp(0, self.image_size.0 as i32),
            y.clamp(0, self.image_size.1 as i32),
        )
    }

    /// Convert image pixels to a screen position.
    pub fn to_screen(&self, point: Point) -> (f32, f32) {
        (
            self.origin.0 + point.x as f32 * self.scale,
            self.origin.1 + point.y as f32 * self.scale,
        )
    }
}
