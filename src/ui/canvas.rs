// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and box interaction.
//!
//! This module paints the current image with its boxes, the digit overlay
//! used to pick one of several overlapping boxes, and the rubber band of a
//! box being dragged. Pointer input is turned into session commands in
//! image pixel coordinates.

use crate::models::annotation::{BBox, Label, Point};
use crate::session::{Command, LabelingMode, Scene};
use crate::util::geometry::{ImageTransform, Region};

const DEFAULT_BBOX_LINE_THICKNESS: f32 = 3.0;
const TEXT_SIZE_IM_HEIGHT_RATIO: f32 = 0.04;
const TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 255, 255);

/// Fallback canvas size when the image could not be loaded.
const PLACEHOLDER_SIZE: (u32, u32) = (640, 480);

/// Stroke color for each class.
pub fn class_color(label: Label) -> egui::Color32 {
    match label {
        Label::NoVestNoHardhat => egui::Color32::from_rgb(255, 0, 0),
        Label::NoVestInHardhat => egui::Color32::from_rgb(255, 255, 0),
        Label::InVestNoHardhat => egui::Color32::from_rgb(0, 0, 255),
        Label::InVestInHardhat => egui::Color32::from_rgb(0, 128, 0),
        Label::InvisibleNoVest => egui::Color32::from_rgb(0, 0, 0),
        Label::InvisibleInVest => egui::Color32::from_rgb(148, 0, 211),
    }
}

/// Pixel extent to show when there is no image: large enough for every box.
fn placeholder_size(bboxes: &[BBox]) -> (u32, u32) {
    bboxes.iter().fold(PLACEHOLDER_SIZE, |(w, h), bbox| {
        (w.max(bbox.x2.max(0) as u32), h.max(bbox.y2.max(0) as u32))
    })
}

/// Display the canvas and turn pointer input into at most one command.
///
/// `drag_start` carries the first corner of a box being drawn across frames.
pub fn show(
    ui: &mut egui::Ui,
    scene: &Scene,
    mode: LabelingMode,
    class_label: Label,
    image_texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
    drag_start: &mut Option<Point>,
) -> Option<Command> {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available = ui.available_rect_before_wrap();
    let size = image_size.unwrap_or_else(|| placeholder_size(&scene.bboxes));
    let transform = ImageTransform::fit(
        (available.min.x, available.min.y),
        (available.width(), available.height()),
        size,
    );
    let (display_width, display_height) = transform.display_size();
    let image_rect = egui::Rect::from_min_size(
        egui::pos2(transform.origin.0, transform.origin.1),
        egui::vec2(display_width, display_height),
    );

    let response = ui.allocate_rect(available, egui::Sense::click_and_drag());
    let painter = ui.painter_at(available);

    match image_texture {
        Some(texture) => {
            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            painter.rect_filled(image_rect, 0.0, egui::Color32::from_gray(60));
            painter.text(
                image_rect.center(),
                egui::Align2::CENTER_CENTER,
                "image not available",
                egui::FontId::proportional(16.0),
                egui::Color32::from_gray(160),
            );
        }
    }

    let to_screen = |point: Point| {
        let (x, y) = transform.to_screen(point);
        egui::pos2(x, y)
    };

    for bbox in &scene.bboxes {
        let rect = egui::Rect::from_two_pos(
            to_screen(Point::new(bbox.x1, bbox.y1)),
            to_screen(Point::new(bbox.x2, bbox.y2)),
        );
        painter.rect_stroke(
            rect,
            0.0,
            egui::Stroke::new(DEFAULT_BBOX_LINE_THICKNESS, class_color(bbox.label)),
        );
    }

    // keyboard digits for choosing one of the boxes under the last click
    let font_size = (display_height * TEXT_SIZE_IM_HEIGHT_RATIO).max(12.0);
    for &(digit, bbox_id) in &scene.overlay {
        if let Some(bbox) = scene.bboxes.get(bbox_id) {
            painter.text(
                to_screen(Point::new(bbox.x1, bbox.y1)),
                egui::Align2::LEFT_BOTTOM,
                digit.to_string(),
                egui::FontId::proportional(font_size),
                TEXT_COLOR,
            );
        }
    }

    let pointer = response
        .interact_pointer_pos()
        .or_else(|| ui.ctx().input(|i| i.pointer.latest_pos()))
        .map(|pos| transform.to_image(pos.x, pos.y));

    if mode != LabelingMode::Drawing {
        *drag_start = None;
    } else {
        if response.drag_started() {
            *drag_start = pointer;
        }

        if response.dragged() || response.drag_stopped() {
            if let (Some(start), Some(current)) = (*drag_start, pointer) {
                let region = Region::from_corners(start, current);
                painter.rect_stroke(
                    egui::Rect::from_two_pos(
                        to_screen(Point::new(region.x1, region.y1)),
                        to_screen(Point::new(region.x2, region.y2)),
                    ),
                    0.0,
                    egui::Stroke::new(1.5, class_color(class_label)),
                );

                if response.drag_stopped() {
                    *drag_start = None;
                    return Some(Command::RegionSelected(region));
                }
            }
        }
    }

    if response.clicked() {
        return pointer.map(Command::Click);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_grows_to_fit_boxes() {
        assert_eq!(placeholder_size(&[]), (640, 480));

        let bboxes = [
            BBox::new(0, 0, 1000, 20, Label::NoVestNoHardhat),
            BBox::new(-10, -10, 5, 700, Label::InVestInHardhat),
        ];
        assert_eq!(placeholder_size(&bboxes), (1000, 700));
    }

    #[test]
    fn test_show_paints_with_and_without_texture() {
        let ctx = egui::Context::default();
        let texture = ctx.load_texture(
            "test_image",
            egui::ColorImage::new([4, 3], egui::Color32::WHITE),
            egui::TextureOptions::LINEAR,
        );
        let scene = Scene {
            bboxes: vec![BBox::new(0, 0, 2, 2, Label::InVestInHardhat)],
            overlay: vec![(0, 0)],
        };

        for image in [Some(texture), None] {
            let mut drag_start = None;
            let mut command = None;
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    command = show(
                        ui,
                        &scene,
                        LabelingMode::Drawing,
                        Label::InVestInHardhat,
                        &image,
                        Some((4, 3)),
                        &mut drag_start,
                    );
                });
            });
            assert_eq!(command, None);
            assert_eq!(drag_start, None);
        }
    }

    #[test]
    fn test_every_class_has_a_distinct_color() {
        let colors: std::collections::HashSet<_> =
            Label::ALL.iter().map(|l| class_color(*l)).collect();
        assert_eq!(colors.len(), Label::ALL.len());
    }
}
