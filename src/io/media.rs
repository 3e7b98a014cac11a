// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! This module decodes image files into RGBA pixel buffers that the
//! shell uploads as an egui texture.

use anyhow::{Context, Result};
use std::path::Path;

/// Decoded image ready for texture upload.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub pixels: Vec<u8>,
}

/// Load an image file and convert it to RGBA8.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tiny.png");
        image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert_eq!(loaded.pixels.len(), 3 * 2 * 4);
        assert_eq!(&loaded.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_image(Path::new("/nonexistent/img.jpg")).is_err());
    }
}
