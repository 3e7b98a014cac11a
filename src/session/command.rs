// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Operator commands consumed by the session.

use crate::models::annotation::Point;
use crate::util::geometry::Region;

/// One operator action, already translated from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch to drawing; the shell then collects a region by dragging.
    EnterDrawMode,
    EnterDeletionMode,
    EnterRelabelMode,
    /// Write the current boxes to the skipped directory and move on.
    SkipImage,
    /// Drop unsaved edits and reload the source boxes.
    Revert,
    /// Write the current boxes to the labeled directory and move on.
    SaveAndNext,
    NextImage,
    PreviousImage,
    Quit,
    /// A number key. Picks a class or a box depending on canvas state.
    SelectDigit(u8),
    /// Left click at an image pixel.
    Click(Point),
    /// A finished drag in drawing mode.
    RegionSelected(Region),
}

/// What the shell should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}
