// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and status line.
//!
//! The toolbar mirrors the keyboard: mode and class buttons issue the same
//! commands as their hotkeys. The status line shows where the operator is
//! in the dataset.

use super::canvas::class_color;
use super::input::KeyMap;
use crate::models::annotation::Label;
use crate::session::{CanvasState, Command, LabelingMode, Session};

fn key_hint(keymap: &KeyMap, command: Command) -> String {
    keymap
        .key_for(command)
        .map(|key| format!(" ({})", key.name()))
        .unwrap_or_default()
}

/// Display the toolbar. Returns the command of a clicked button.
pub fn show(ui: &mut egui::Ui, session: &Session, keymap: &KeyMap) -> Option<Command> {
    let mut command = None;
    let canvas = session.canvas();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Mode:");

        let modes = [
            (LabelingMode::Drawing, "▭ Draw", Command::EnterDrawMode),
            (LabelingMode::Deletion, "✖ Delete", Command::EnterDeletionMode),
            (LabelingMode::SetLabel, "✏ Relabel", Command::EnterRelabelMode),
        ];
        for (mode, text, mode_command) in modes {
            let text = format!("{}{}", text, key_hint(keymap, mode_command));
            if ui.selectable_label(canvas.mode() == mode, text).clicked() {
                command = Some(mode_command);
            }
        }

        ui.separator();

        ui.label("Class:");
        // digits pick boxes while a selection is pending
        ui.add_enabled_ui(canvas.state() == CanvasState::Normal, |ui| {
            for label in Label::ALL {
                let text = egui::RichText::new(format!("{} {}", label.hotkey_digit(), label))
                    .color(class_color(label));
                if ui
                    .selectable_label(canvas.class_label() == label, text)
                    .clicked()
                {
                    command = Some(Command::SelectDigit(label.hotkey_digit()));
                }
            }
        });
    });

    ui.horizontal(|ui| {
        let hint = match (canvas.state(), canvas.mode()) {
            (CanvasState::AwaitingDisambiguationIndex, _) => {
                "Several boxes here: press the number shown next to the one you mean"
            }
            (_, LabelingMode::Drawing) => "Drag to draw a box with the selected class",
            (_, LabelingMode::Deletion) => "Click a box to delete it",
            (_, LabelingMode::SetLabel) => "Click a box to give it the selected class",
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    command
}

/// Display the status line for the open image.
pub fn status(ui: &mut egui::Ui, session: &Session, keymap: &KeyMap) {
    let store = session.store();
    let index = store.current_image_id();

    ui.horizontal(|ui| {
        ui.label(format!(
            "Image {}/{}: {}",
            index + 1,
            store.images_amount(),
            session.current_image_name()
        ));
        if store.is_completed(index) {
            ui.separator();
            ui.label(egui::RichText::new("done in an earlier session").weak());
        }
        ui.separator();
        ui.label(format!("{} boxes", session.scene().bboxes.len()));
        ui.separator();
        ui.label(
            egui::RichText::new(format!(
                "save{}  skip{}  revert{}  quit{}",
                key_hint(keymap, Command::SaveAndNext),
                key_hint(keymap, Command::SkipImage),
                key_hint(keymap, Command::Revert),
                key_hint(keymap, Command::Quit),
            ))
            .weak(),
        );
    });
}
