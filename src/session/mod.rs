// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Labeling core: box editing canvas, operator commands and the session
//! that ties them to the annotation store.

pub mod canvas;
pub mod command;
pub mod controller;

pub use canvas::{Canvas, CanvasState, LabelingMode, Scene};
pub use command::{Command, Flow};
pub use controller::{Session, SessionOptions};
