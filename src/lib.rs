// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! vestlabel - bounding box review tool for vest/hardhat datasets
//!
//! Walks through the images of a COCO annotation file, lets the operator
//! fix the boxes with mouse and keyboard, and writes one result file per
//! image. The position in the dataset is remembered between sessions.
//!
//! The labeling core ([`models`], [`session`], [`io`]) has no GUI
//! dependency; [`app`] and [`ui`] put an egui window around it.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod session;
pub mod ui;
pub mod util;

pub use error::{LabelerError, Result};
