// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image output files and the resume cursor side file.
//!
//! Output files hold a JSON array of `[x1, y1, x2, y2, category_id]` rows.
//! The cursor side file lives next to the source annotations and holds
//! `{"last_image_id": N}`. Both are replaced whole through a temp file
//! and a rename.

use crate::error::{LabelerError, Result};
use crate::models::annotation::BBox;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Contents of the cursor side file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorState {
    pub last_image_id: i64,
}

/// Cursor side file path for an annotation file: `<stem>.cursor.json` in the same directory.
pub fn cursor_path_for(annotation_path: &Path) -> PathBuf {
    let stem = annotation_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "annotations".to_string());
    annotation_path.with_file_name(format!("{stem}.cursor.json"))
}

/// Load the persisted cursor, if any.
///
/// A missing or unreadable side file is not an error: the session just
/// starts from its default position.
pub fn read_cursor(path: &Path) -> Option<i64> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            log::warn!("Ignoring cursor file {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<CursorState>(&json) {
        Ok(state) => Some(state.last_image_id),
        Err(e) => {
            log::warn!("Ignoring malformed cursor file {}: {}", path.display(), e);
            None
        }
    }
}

/// Persist the cursor.
pub fn write_cursor(path: &Path, index: usize) -> Result<()> {
    let state = CursorState {
        last_image_id: index as i64,
    };
    write_json(path, &state)
}

/// Write one image's boxes as output rows.
pub fn export_bboxes(path: &Path, rows: &[[i32; 5]]) -> Result<()> {
    write_json(path, &rows)
}

/// Read back a previously written output file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn import_bboxes(path: &Path) -> Result<Option<Vec<BBox>>> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(LabelerError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let rows: Vec<[i32; 5]> = serde_json::from_str(&json).map_err(|source| LabelerError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut bboxes = Vec::with_capacity(rows.len());
    for row in rows {
        match BBox::from_row(row) {
            Some(bbox) => bboxes.push(bbox),
            None => log::warn!(
                "Dropping row {:?} in {}: unknown category id",
                row,
                path.display()
            ),
        }
    }
    Ok(Some(bboxes))
}

/// Serialize `value` into a temp file next to `path`, then rename it into place.
///
/// Readers see either the old file or the new one, never a partial write.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let persistence = |source: std::io::Error| LabelerError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string(value)
        .map_err(|e| persistence(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(persistence)?;
    file.write_all(json.as_bytes()).map_err(persistence)?;
    file.as_file().sync_all().map_err(persistence)?;
    file.persist(path).map_err(|e| persistence(e.error))?;
    Ok(())
}
