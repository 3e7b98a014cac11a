// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the core data structures for representing
//! pixel points, labeled bounding boxes and the fixed class table
//! shared by the loader and the output writer.

use std::fmt;

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Class of a labeled person, describing vest and hardhat visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Label {
    NoVestNoHardhat,
    NoVestInHardhat,
    InVestNoHardhat,
    #[default]
    InVestInHardhat,
    InvisibleNoVest,
    InvisibleInVest,
}

/// Category names that older exports spelled wrong, with their fixes.
const MISSPELLING_CORRECTIONS: [(&str, &str); 2] = [
    ("unvisible_in_vest", "invisible_in_vest"),
    ("unvisible_not_in_vest", "invisible_no_vest"),
];

impl Label {
    /// All labels, ordered by category id.
    pub const ALL: [Label; 6] = [
        Label::NoVestNoHardhat,
        Label::NoVestInHardhat,
        Label::InVestNoHardhat,
        Label::InVestInHardhat,
        Label::InvisibleNoVest,
        Label::InvisibleInVest,
    ];

    /// Category id written to output files (1-based).
    pub fn category_id(self) -> u32 {
        match self {
            Label::NoVestNoHardhat => 1,
            Label::NoVestInHardhat => 2,
            Label::InVestNoHardhat => 3,
            Label::InVestInHardhat => 4,
            Label::InvisibleNoVest => 5,
            Label::InvisibleInVest => 6,
        }
    }

    pub fn from_category_id(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|label| label.category_id() == id)
    }

    /// Canonical category name as it appears in COCO sources.
    pub fn name(self) -> &'static str {
        match self {
            Label::NoVestNoHardhat => "person",
            Label::NoVestInHardhat => "with_helmet",
            Label::InVestNoHardhat => "with_vest",
            Label::InVestInHardhat => "with_vest_and_helmet",
            Label::InvisibleNoVest => "invisible_no_vest",
            Label::InvisibleInVest => "invisible_in_vest",
        }
    }

    /// Resolve a COCO category name, applying the known spelling fixes first.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = MISSPELLING_CORRECTIONS
            .iter()
            .find(|(wrong, _)| *wrong == name)
            .map(|(_, right)| *right)
            .unwrap_or(name);
        Self::ALL.iter().copied().find(|label| label.name() == name)
    }

    /// Keyboard digit that selects this label while no disambiguation is pending.
    pub fn hotkey_digit(self) -> u8 {
        (self.category_id() - 1) as u8
    }

    pub fn from_hotkey_digit(digit: u8) -> Option<Self> {
        Self::from_category_id(digit as u32 + 1)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Axis-aligned bounding box with a class label.
///
/// Corners are stored so that `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub label: Label,
}

impl BBox {
    /// Create a box from two corners in any order.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32, label: Label) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
            label,
        }
    }

    /// Build a box from a COCO `[x, y, width, height]` rectangle.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64, label: Label) -> Self {
        Self::new(
            x.round() as i32,
            y.round() as i32,
            (x + width).round() as i32,
            (y + height).round() as i32,
            label,
        )
    }

    /// Check whether the point lies inside the box, edges included.
    pub fn contains(&self, point: Point) -> bool {
        self.x1 <= point.x && point.x <= self.x2 && self.y1 <= point.y && point.y <= self.y2
    }

    /// Output row `[x1, y1, x2, y2, category_id]`.
    pub fn to_row(&self) -> [i32; 5] {
        [
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.label.category_id() as i32,
        ]
    }

    pub fn from_row(row: [i32; 5]) -> Option<Self> {
        let label = u32::try_from(row[4]).ok().and_then(Label::from_category_id)?;
        Some(Self::new(row[0], row[1], row[2], row[3], label))
    }
}
