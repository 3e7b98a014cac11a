// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! COCO source annotation parsing.
//!
//! Only the parts of the COCO layout the labeler needs are modelled:
//!
//! ```json
//! {
//!   "images": [{ "id": 1, "file_name": "img001.jpg" }],
//!   "categories": [{ "id": 1, "name": "person" }],
//!   "annotations": [{ "id": 7, "image_id": 1, "category_id": 1, "bbox": [x, y, w, h] }]
//! }
//! ```
//!
//! Any other fields (`info`, `licenses`, `area`, `segmentation`, ...) are ignored.

use crate::error::{LabelerError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct CocoDataset {
    pub images: Vec<CocoImage>,
    pub categories: Vec<CocoCategory>,
    pub annotations: Vec<CocoAnnotation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CocoImage {
    pub id: i64,
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CocoCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CocoAnnotation {
    /// Annotation ids are optional in hand-made exports; only used in diagnostics.
    #[serde(default)]
    pub id: i64,
    pub image_id: i64,
    pub category_id: i64,
    /// `[x, y, width, height]` in pixels.
    pub bbox: [f64; 4],
}

/// Read and parse a COCO annotation file.
pub fn import_coco(path: &Path) -> Result<CocoDataset> {
    let json = std::fs::read_to_string(path).map_err(|source| LabelerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_coco(&json, path)
}

/// Parse COCO JSON text; `origin` is only used for error messages.
pub fn parse_coco(json: &str, origin: &Path) -> Result<CocoDataset> {
    serde_json::from_str(json).map_err(|source| LabelerError::Json {
        path: origin.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_extra_fields() {
        let json = r#"{
            "info": {"description": "site 4"},
            "images": [{"id": 3, "file_name": "a.jpg", "width": 640, "height": 480}],
            "categories": [{"id": 1, "name": "person", "supercategory": "human"}],
            "annotations": [
                {"id": 9, "image_id": 3, "category_id": 1, "bbox": [1.0, 2.0, 3.0, 4.0], "area": 12.0}
            ]
        }"#;

        let coco = parse_coco(json, Path::new("test.json")).unwrap();
        assert_eq!(coco.images[0].file_name, "a.jpg");
        assert_eq!(coco.categories[0].name, "person");
        assert_eq!(coco.annotations[0].bbox, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_parse_missing_bbox_is_an_error() {
        let json = r#"{
            "images": [{"id": 3, "file_name": "a.jpg"}],
            "categories": [{"id": 1, "name": "person"}],
            "annotations": [{"id": 9, "image_id": 3, "category_id": 1}]
        }"#;

        let err = parse_coco(json, Path::new("broken.json")).unwrap_err();
        assert!(matches!(err, LabelerError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_parse_missing_file_name_is_an_error() {
        let json = r#"{"images": [{"id": 3}], "categories": [], "annotations": []}"#;
        assert!(parse_coco(json, Path::new("x.json")).is_err());
    }

    #[test]
    fn test_import_missing_file() {
        let err = import_coco(Path::new("/nonexistent/instances.json")).unwrap_err();
        assert!(matches!(err, LabelerError::Io { .. }));
    }
}
