// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation store.
//!
//! Holds the read-only, name-sorted index of source images and their boxes,
//! the current image cursor, and the set of images that already have an
//! output file from an earlier session.

use super::annotation::{BBox, Label};
use crate::error::{LabelerError, Result};
use crate::io::coco::{self, CocoDataset};
use crate::io::serialization;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// One source image and its boxes, in source annotation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub file_name: String,
    pub bboxes: Vec<BBox>,
}

impl ImageRecord {
    /// File name without its extension, used to name output files.
    pub fn base_name(&self) -> &str {
        base_name(&self.file_name)
    }
}

/// Navigation direction for [`AnnotationStore::change_current_image_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

fn base_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

/// Build the sorted image records from a parsed COCO dataset.
pub fn build_records(dataset: &CocoDataset, origin: &Path) -> Result<Vec<ImageRecord>> {
    let mut labels: HashMap<i64, Label> = HashMap::new();
    for category in &dataset.categories {
        // unused extras such as "background" are fine; annotations using them are not
        match Label::from_name(&category.name) {
            Some(label) => {
                labels.insert(category.id, label);
            }
            None => log::warn!(
                "Ignoring category {} '{}' in {}: not one of the known classes",
                category.id,
                category.name,
                origin.display()
            ),
        }
    }

    let names: HashMap<i64, &str> = dataset
        .images
        .iter()
        .map(|img| (img.id, img.file_name.as_str()))
        .collect();

    // BTreeMap keeps the records sorted by file name
    let mut grouped: BTreeMap<String, Vec<BBox>> = dataset
        .images
        .iter()
        .map(|img| (img.file_name.clone(), Vec::new()))
        .collect();

    for ann in &dataset.annotations {
        let label = *labels
            .get(&ann.category_id)
            .ok_or(LabelerError::UnknownCategoryId {
                annotation_id: ann.id,
                category_id: ann.category_id,
            })?;
        let file_name = names
            .get(&ann.image_id)
            .ok_or(LabelerError::UnknownImageId {
                annotation_id: ann.id,
                image_id: ann.image_id,
            })?;
        let [x, y, w, h] = ann.bbox;
        if let Some(bboxes) = grouped.get_mut(*file_name) {
            bboxes.push(BBox::from_xywh(x, y, w, h, label));
        }
    }

    if grouped.is_empty() {
        return Err(LabelerError::EmptyDataset(origin.to_path_buf()));
    }

    Ok(grouped
        .into_iter()
        .map(|(file_name, bboxes)| ImageRecord { file_name, bboxes })
        .collect())
}

/// Indices of records whose base name matches a file in any of `dirs`.
///
/// A directory that does not exist yet contributes nothing.
pub fn find_completed(records: &[ImageRecord], dirs: &[&Path]) -> Result<BTreeSet<usize>> {
    let mut done: BTreeSet<String> = BTreeSet::new();
    for dir in dirs {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(source) => {
                return Err(LabelerError::Io {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        };
        for entry in entries {
            let entry = entry.map_err(|source| LabelerError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let name = entry.file_name();
            done.insert(base_name(&name.to_string_lossy()).to_string());
        }
    }

    Ok(records
        .iter()
        .enumerate()
        .filter(|(_, record)| done.contains(record.base_name()))
        .map(|(i, _)| i)
        .collect())
}

/// Pick the starting image.
///
/// Priority: an in-range explicit index, then an in-range persisted index,
/// then the first image not in `completed`. Only the last case skips
/// completed images.
pub fn resolve_start(
    explicit: Option<usize>,
    persisted: Option<i64>,
    completed: &BTreeSet<usize>,
    images_amount: usize,
) -> usize {
    if let Some(index) = explicit {
        if index < images_amount {
            return index;
        }
        log::warn!(
            "Start index {} is out of range (0..{}), ignoring it",
            index,
            images_amount
        );
    }

    if let Some(index) = persisted {
        if (0..images_amount as i64).contains(&index) {
            log::info!("Resuming at image {}", index);
            return index as usize;
        }
        log::warn!(
            "Saved cursor {} is out of range (0..{}), ignoring it",
            index,
            images_amount
        );
    }

    let mut index = 0;
    while completed.contains(&index) {
        index += 1;
    }
    index.min(images_amount.saturating_sub(1))
}

/// The loaded annotation set plus the current image cursor.
pub struct AnnotationStore {
    records: Vec<ImageRecord>,
    by_name: HashMap<String, usize>,
    completed: BTreeSet<usize>,
    current_image_id: usize,
    cursor_path: PathBuf,
}

impl AnnotationStore {
    /// Load the COCO file, scan the output directories and resolve the cursor.
    pub fn open(
        annotation_path: &Path,
        completed_dirs: &[&Path],
        explicit_start: Option<usize>,
    ) -> Result<Self> {
        let dataset = coco::import_coco(annotation_path)?;
        let records = build_records(&dataset, annotation_path)?;
        log::info!(
            "Loaded {} images with {} boxes from {}",
            records.len(),
            dataset.annotations.len(),
            annotation_path.display()
        );

        let completed = find_completed(&records, completed_dirs)?;
        log::info!("{} images already completed", completed.len());

        let cursor_path = serialization::cursor_path_for(annotation_path);
        let persisted = serialization::read_cursor(&cursor_path);
        let start = resolve_start(explicit_start, persisted, &completed, records.len());

        Self::from_parts(records, completed, start, cursor_path)
    }

    /// Assemble a store from already-built records.
    ///
    /// Fails with [`LabelerError::EmptyDataset`] when `records` is empty.
    pub fn from_parts(
        records: Vec<ImageRecord>,
        completed: BTreeSet<usize>,
        current_image_id: usize,
        cursor_path: PathBuf,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(LabelerError::EmptyDataset(cursor_path));
        }
        let by_name = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.file_name.clone(), i))
            .collect();
        let current_image_id = current_image_id.min(records.len().saturating_sub(1));

        Ok(Self {
            records,
            by_name,
            completed,
            current_image_id,
            cursor_path,
        })
    }

    pub fn images_amount(&self) -> usize {
        self.records.len()
    }

    pub fn current_image_id(&self) -> usize {
        self.current_image_id
    }

    pub fn current_record(&self) -> &ImageRecord {
        &self.records[self.current_image_id]
    }

    pub fn record(&self, index: usize) -> Option<&ImageRecord> {
        self.records.get(index)
    }

    pub fn record_by_name(&self, file_name: &str) -> Option<&ImageRecord> {
        self.by_name.get(file_name).map(|&i| &self.records[i])
    }

    pub fn image_name(&self, index: usize) -> Option<&str> {
        self.record(index).map(|r| r.file_name.as_str())
    }

    /// Deep copy of the stored boxes for an image.
    pub fn bboxes_for_image(&self, index: usize) -> Vec<BBox> {
        self.record(index)
            .map(|r| r.bboxes.clone())
            .unwrap_or_default()
    }

    /// Whether an output file existed for this image at startup.
    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    pub fn completed_indices(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    pub fn cursor_path(&self) -> &Path {
        &self.cursor_path
    }

    /// Move the cursor by `step` images, clamped to the valid range, and persist it.
    pub fn change_current_image_id(&mut self, direction: Direction, step: usize) -> Result<usize> {
        let last = self.images_amount().saturating_sub(1) as i64;
        let step = step as i64;
        let proposed = match direction {
            Direction::Forward => self.current_image_id as i64 + step,
            Direction::Backward => self.current_image_id as i64 - step,
        };

        self.current_image_id = proposed.clamp(0, last) as usize;
        serialization::write_cursor(&self.cursor_path, self.current_image_id)?;
        Ok(self.current_image_id)
    }
}
