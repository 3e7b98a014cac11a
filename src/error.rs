// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the labeling core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a labeling session.
///
/// Recoverable input problems (clicks outside any box, unknown digits,
/// out-of-range navigation) never produce one of these; they are logged
/// and ignored where they happen.
#[derive(Debug, Error)]
pub enum LabelerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("annotation {annotation_id} references unknown category id {category_id}")]
    UnknownCategoryId { annotation_id: i64, category_id: i64 },

    #[error("annotation {annotation_id} references unknown image id {image_id}")]
    UnknownImageId { annotation_id: i64, image_id: i64 },

    #[error("annotation set {0} contains no images")]
    EmptyDataset(PathBuf),

    #[error("failed to persist {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T, E = LabelerError> = std::result::Result<T, E>;
