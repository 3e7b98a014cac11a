// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Box editing state machine.
//!
//! The canvas owns the working copy of the open image's boxes and applies
//! draw, delete and relabel operations to it. When a click lands inside
//! several boxes at once it asks for a digit naming the intended box
//! before doing anything.

use crate::models::annotation::{BBox, Label, Point};
use crate::util::geometry::Region;
use std::collections::BTreeMap;

/// What a left click (or drag) does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelingMode {
    #[default]
    Drawing,
    Deletion,
    SetLabel,
}

/// Whether the canvas is waiting for a digit to pick one of several boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasState {
    #[default]
    Normal,
    AwaitingDisambiguationIndex,
}

/// Everything the shell needs to draw the current boxes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub bboxes: Vec<BBox>,
    /// `(digit, bbox id)` pairs to print next to candidate boxes.
    pub overlay: Vec<(u8, usize)>,
}

/// Keyboard digits available for picking a box.
const MAX_DISAMBIGUATION_KEYS: usize = 10;

/// Working copy of one image's boxes plus the editing mode.
#[derive(Debug, Default)]
pub struct Canvas {
    bboxes: Vec<BBox>,
    mode: LabelingMode,
    state: CanvasState,
    selected_class_label: Label,
    render_with_id: bool,
    /// digit on the keyboard -> bbox id
    keyboard_key_to_bbox_id: BTreeMap<u8, usize>,
    scene: Scene,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> LabelingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LabelingMode) {
        self.mode = mode;
    }

    pub fn state(&self) -> CanvasState {
        self.state
    }

    pub fn class_label(&self) -> Label {
        self.selected_class_label
    }

    /// Label used by later draws and relabels; existing boxes keep theirs.
    pub fn set_class_label(&mut self, class_label: Label) {
        self.selected_class_label = class_label;
    }

    pub fn bboxes(&self) -> &[BBox] {
        &self.bboxes
    }

    /// Pending digit -> bbox id choices while disambiguating.
    pub fn disambiguation_map(&self) -> &BTreeMap<u8, usize> {
        &self.keyboard_key_to_bbox_id
    }

    /// Replace the working set with a copy of `bboxes`.
    ///
    /// Any pending disambiguation refers to the old set and is dropped.
    pub fn set_bboxes(&mut self, bboxes: &[BBox]) {
        self.bboxes = bboxes.to_vec();
        self.state = CanvasState::Normal;
        self.keyboard_key_to_bbox_id.clear();
    }

    /// Output rows `[x1, y1, x2, y2, category_id]` in working set order.
    pub fn get_bboxes_json(&self) -> Vec<[i32; 5]> {
        self.bboxes.iter().map(BBox::to_row).collect()
    }

    /// Add a box with the active label. Zero-area regions are kept as-is.
    pub fn draw_bbox(&mut self, region: Region) {
        if region.is_empty() {
            log::debug!("adding zero-area bbox {:?}", region);
        }
        self.bboxes.push(BBox::new(
            region.x1,
            region.y1,
            region.x2,
            region.y2,
            self.selected_class_label,
        ));
        log::info!("bbox with class {} created", self.selected_class_label);
        self.refresh();
    }

    /// Apply the current mode to the box under `point`.
    pub fn click(&mut self, point: Point) {
        if self.state != CanvasState::Normal {
            log::info!(
                "press one of {:?} to pick a box first",
                self.keyboard_key_to_bbox_id.keys().collect::<Vec<_>>()
            );
            return;
        }

        match self.mode {
            LabelingMode::Drawing => return,
            LabelingMode::Deletion => self.delete_bbox_contains_point(point),
            LabelingMode::SetLabel => self.set_label_to_bbox_contains_point(point),
        }
        self.refresh();
    }

    /// Resolve a pending disambiguation with the digit the operator pressed.
    pub fn specify_bbox(&mut self, number: u8) {
        if self.state != CanvasState::AwaitingDisambiguationIndex {
            log::warn!("no box selection is pending, ignoring {}", number);
            return;
        }

        let Some(&bbox_id) = self.keyboard_key_to_bbox_id.get(&number) else {
            log::info!(
                "select number from list {:?}",
                self.keyboard_key_to_bbox_id.keys().collect::<Vec<_>>()
            );
            return;
        };

        match self.mode {
            LabelingMode::Deletion => {
                self.delete_bbox_by_id(bbox_id);
            }
            LabelingMode::SetLabel => {
                self.set_label_to_bbox_by_id(bbox_id);
            }
            LabelingMode::Drawing => {}
        }

        self.state = CanvasState::Normal;
        self.keyboard_key_to_bbox_id.clear();
        self.refresh();
    }

    /// Rebuild the scene. The box index overlay only survives one refresh.
    pub fn refresh(&mut self) -> &Scene {
        let overlay = if self.render_with_id {
            self.keyboard_key_to_bbox_id
                .iter()
                .map(|(&digit, &bbox_id)| (digit, bbox_id))
                .collect()
        } else {
            Vec::new()
        };

        self.scene = Scene {
            bboxes: self.bboxes.clone(),
            overlay,
        };
        self.render_with_id = false;
        &self.scene
    }

    /// The scene built by the last refresh.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Remove a box by id. Returns whether anything was removed.
    pub fn delete_bbox_by_id(&mut self, bbox_id: usize) -> bool {
        if bbox_id < self.bboxes.len() {
            self.bboxes.remove(bbox_id);
            log::info!("bbox with id {} deleted", bbox_id);
            true
        } else {
            log::warn!("no element with id {}", bbox_id);
            false
        }
    }

    /// Give a box the active label. Returns whether a box was changed.
    pub fn set_label_to_bbox_by_id(&mut self, bbox_id: usize) -> bool {
        match self.bboxes.get_mut(bbox_id) {
            Some(bbox) => {
                bbox.label = self.selected_class_label;
                log::info!(
                    "set label {} for bbox with id {}",
                    self.selected_class_label,
                    bbox_id
                );
                true
            }
            None => {
                log::warn!("no element with id {}", bbox_id);
                false
            }
        }
    }

    fn delete_bbox_contains_point(&mut self, point: Point) {
        if let Some(bbox_id) = self.selected_bbox_id(point) {
            self.delete_bbox_by_id(bbox_id);
        }
    }

    fn set_label_to_bbox_contains_point(&mut self, point: Point) {
        if let Some(bbox_id) = self.selected_bbox_id(point) {
            self.set_label_to_bbox_by_id(bbox_id);
        }
    }

    /// The single box under `point`, if exactly one matches.
    ///
    /// Several matches switch the canvas into disambiguation instead.
    fn selected_bbox_id(&mut self, point: Point) -> Option<usize> {
        let selected: Vec<usize> = self
            .bboxes
            .iter()
            .enumerate()
            .filter(|(_, bbox)| bbox.contains(point))
            .map(|(i, _)| i)
            .collect();

        match selected.as_slice() {
            [] => {
                log::debug!("no bbox at ({}, {})", point.x, point.y);
                None
            }
            [only] => Some(*only),
            _ => {
                log::info!("selected bboxes with id: {:?}", selected);
                if selected.len() > MAX_DISAMBIGUATION_KEYS {
                    log::warn!(
                        "{} boxes overlap here, only the first {} can be picked",
                        selected.len(),
                        MAX_DISAMBIGUATION_KEYS
                    );
                }

                self.state = CanvasState::AwaitingDisambiguationIndex;
                self.render_with_id = true;
                self.keyboard_key_to_bbox_id = selected
                    .iter()
                    .take(MAX_DISAMBIGUATION_KEYS)
                    .enumerate()
                    .map(|(key, &bbox_id)| (key as u8, bbox_id))
                    .collect();

                log::info!("press key with bbox id you want to select");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Label = Label::NoVestNoHardhat;
    const B: Label = Label::NoVestInHardhat;
    const C: Label = Label::InvisibleInVest;

    fn overlapping() -> Canvas {
        let mut canvas = Canvas::new();
        canvas.set_bboxes(&[BBox::new(0, 0, 10, 10, A), BBox::new(5, 5, 15, 15, B)]);
        canvas
    }

    #[test]
    fn test_defaults() {
        let canvas = Canvas::new();
        assert_eq!(canvas.mode(), LabelingMode::Drawing);
        assert_eq!(canvas.state(), CanvasState::Normal);
        assert_eq!(canvas.class_label(), Label::InVestInHardhat);
    }

    #[test]
    fn test_overlapping_click_enters_disambiguation() {
        let mut canvas = overlapping();
        canvas.set_mode(LabelingMode::Deletion);

        canvas.click(Point::new(7, 7));

        assert_eq!(canvas.state(), CanvasState::AwaitingDisambiguationIndex);
        let expected: BTreeMap<u8, usize> = [(0, 0), (1, 1)].into_iter().collect();
        assert_eq!(canvas.disambiguation_map(), &expected);
        assert_eq!(canvas.bboxes().len(), 2);
        assert_eq!(canvas.scene().overlay, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_digit_resolves_deletion() {
        let mut canvas = overlapping();
        canvas.set_mode(LabelingMode::Deletion);
        canvas.click(Point::new(7, 7));

        canvas.specify_bbox(1);

        assert_eq!(canvas.bboxes(), &[BBox::new(0, 0, 10, 10, A)]);
        assert_eq!(canvas.state(), CanvasState::Normal);
        assert!(canvas.disambiguation_map().is_empty());
        assert!(canvas.scene().overlay.is_empty());
    }

    #[test]
    fn test_digit_resolves_relabel() {
        let mut canvas = overlapping();
        canvas.set_mode(LabelingMode::SetLabel);
        canvas.set_class_label(C);
        canvas.click(Point::new(10, 10));

        canvas.specify_bbox(0);

        assert_eq!(
            canvas.bboxes(),
            &[BBox::new(0, 0, 10, 10, C), BBox::new(5, 5, 15, 15, B)]
        );
        assert_eq!(canvas.state(), CanvasState::Normal);
    }

    #[test]
    fn test_out_of_range_digit_keeps_waiting() {
        let mut canvas = overlapping();
        canvas.set_mode(LabelingMode::Deletion);
        canvas.click(Point::new(7, 7));

        canvas.specify_bbox(2);
        canvas.specify_bbox(9);

        assert_eq!(canvas.state(), CanvasState::AwaitingDisambiguationIndex);
        assert_eq!(canvas.disambiguation_map().len(), 2);
        assert_eq!(canvas.bboxes().len(), 2);

        canvas.specify_bbox(0);
        assert_eq!(canvas.bboxes(), &[BBox::new(5, 5, 15, 15, B)]);
    }

    #[test]
    fn test_clicks_ignored_while_waiting() {
        let mut canvas = overlapping();
        canvas.set_mode(LabelingMode::Deletion);
        canvas.click(Point::new(7, 7));

        canvas.click(Point::new(1, 1));

        assert_eq!(canvas.bboxes().len(), 2);
        assert_eq!(canvas.state(), CanvasState::AwaitingDisambiguationIndex);
    }

    #[test]
    fn test_single_match_relabels_immediately() {
        let mut canvas = overlapping();
        canvas.set_mode(LabelingMode::SetLabel);
        canvas.set_class_label(C);

        canvas.click(Point::new(2, 2));

        assert_eq!(canvas.state(), CanvasState::Normal);
        assert_eq!(
            canvas.bboxes(),
            &[BBox::new(0, 0, 10, 10, C), BBox::new(5, 5, 15, 15, B)]
        );
    }

    #[test]
    fn test_single_match_deletes_immediately() {
        let mut canvas = overlapping();
        canvas.set_mode(LabelingMode::Deletion);

        canvas.click(Point::new(14, 14));

        assert_eq!(canvas.bboxes(), &[BBox::new(0, 0, 10, 10, A)]);
    }

    #[test]
    fn test_click_outside_every_box_is_noop() {
        let mut canvas = overlapping();
        canvas.set_mode(LabelingMode::Deletion);

        canvas.click(Point::new(50, 50));

        assert_eq!(canvas.bboxes().len(), 2);
        assert_eq!(canvas.state(), CanvasState::Normal);
    }

    #[test]
    fn test_click_in_drawing_mode_changes_nothing() {
        let mut canvas = overlapping();

        canvas.click(Point::new(7, 7));

        assert_eq!(canvas.state(), CanvasState::Normal);
        assert_eq!(canvas.bboxes().len(), 2);
    }

    #[test]
    fn test_overlay_lasts_one_refresh() {
        let mut canvas = overlapping();
        canvas.set_mode(LabelingMode::Deletion);
        canvas.click(Point::new(7, 7));
        assert_eq!(canvas.scene().overlay.len(), 2);

        assert!(canvas.refresh().overlay.is_empty());
        assert_eq!(canvas.state(), CanvasState::AwaitingDisambiguationIndex);
    }

    #[test]
    fn test_draw_bbox_uses_active_label_and_accepts_zero_area() {
        let mut canvas = Canvas::new();
        canvas.set_class_label(B);

        canvas.draw_bbox(Region { x1: 3, y1: 3, x2: 3, y2: 3 });
        canvas.draw_bbox(Region { x1: 0, y1: 1, x2: 20, y2: 30 });

        assert_eq!(
            canvas.get_bboxes_json(),
            vec![[3, 3, 3, 3, 2], [0, 1, 20, 30, 2]]
        );
        assert_eq!(canvas.scene().bboxes.len(), 2);
    }

    #[test]
    fn test_set_class_label_is_not_retroactive() {
        let mut canvas = overlapping();
        canvas.set_class_label(C);
        assert_eq!(canvas.bboxes()[0].label, A);
        assert_eq!(canvas.bboxes()[1].label, B);
    }

    #[test]
    fn test_index_operations_out_of_range_are_noops() {
        let mut canvas = overlapping();
        assert!(!canvas.delete_bbox_by_id(2));
        assert!(!canvas.set_label_to_bbox_by_id(5));
        assert_eq!(canvas.bboxes().len(), 2);
    }

    #[test]
    fn test_set_bboxes_is_a_deep_copy() {
        let source = vec![BBox::new(0, 0, 10, 10, A)];
        let mut canvas = Canvas::new();
        canvas.set_bboxes(&source);
        canvas.set_mode(LabelingMode::SetLabel);
        canvas.set_class_label(C);

        canvas.click(Point::new(1, 1));

        assert_eq!(canvas.bboxes()[0].label, C);
        assert_eq!(source[0].label, A);
    }

    #[test]
    fn test_set_bboxes_drops_pending_disambiguation() {
        let mut canvas = overlapping();
        canvas.set_mode(LabelingMode::Deletion);
        canvas.click(Point::new(7, 7));

        canvas.set_bboxes(&[]);

        assert_eq!(canvas.state(), CanvasState::Normal);
        assert!(canvas.disambiguation_map().is_empty());
    }

    #[test]
    fn test_at_most_ten_candidates() {
        let mut canvas = Canvas::new();
        let boxes: Vec<BBox> = (0..12).map(|i| BBox::new(0, 0, 10 + i, 10 + i, A)).collect();
        canvas.set_bboxes(&boxes);
        canvas.set_mode(LabelingMode::Deletion);

        canvas.click(Point::new(1, 1));

        let map = canvas.disambiguation_map();
        assert_eq!(map.len(), 10);
        assert_eq!(map.get(&9), Some(&9));
    }

    #[test]
    fn test_mode_persists_after_disambiguation() {
        let mut canvas = overlapping();
        canvas.set_mode(LabelingMode::Deletion);
        canvas.click(Point::new(7, 7));
        canvas.specify_bbox(0);

        assert_eq!(canvas.mode(), LabelingMode::Deletion);
    }
}
