// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for source annotations, output files and images.

pub mod coco;
pub mod media;
pub mod serialization;
