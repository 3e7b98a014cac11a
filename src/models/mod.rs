// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: boxes, labels and the annotation store.

pub mod annotation;
pub mod dataset;
