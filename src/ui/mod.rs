// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the labeler window.

pub mod canvas;
pub mod input;
pub mod toolbar;
