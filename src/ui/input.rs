// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keyboard translation.
//!
//! Turns egui key events into session commands using the configured
//! bindings. Number keys always become `SelectDigit`; the session decides
//! whether that picks a class or a box.

use crate::config::KeyBindingsConfig;
use crate::session::Command;

/// Resolved key bindings.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(egui::Key, Command)>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_config(&KeyBindingsConfig::default())
    }
}

impl KeyMap {
    /// Resolve configured key names. Unknown names fall back to the default key.
    pub fn from_config(config: &KeyBindingsConfig) -> Self {
        let defaults = KeyBindingsConfig::default();
        let entries = [
            (&config.draw, &defaults.draw, Command::EnterDrawMode),
            (&config.delete, &defaults.delete, Command::EnterDeletionMode),
            (&config.relabel, &defaults.relabel, Command::EnterRelabelMode),
            (&config.skip, &defaults.skip, Command::SkipImage),
            (&config.revert, &defaults.revert, Command::Revert),
            (&config.save_and_next, &defaults.save_and_next, Command::SaveAndNext),
            (&config.quit, &defaults.quit, Command::Quit),
            (&config.next_image, &defaults.next_image, Command::NextImage),
            (&config.previous_image, &defaults.previous_image, Command::PreviousImage),
        ];

        let bindings = entries
            .into_iter()
            .filter_map(|(name, default_name, command)| {
                let key = egui::Key::from_name(name).or_else(|| {
                    log::warn!("unknown key '{}' for {:?}, using '{}'", name, command, default_name);
                    egui::Key::from_name(default_name)
                })?;
                if digit_for_key(key).is_some() {
                    log::warn!("number keys are reserved, {:?} has no key", command);
                    return None;
                }
                Some((key, command))
            })
            .collect();

        Self { bindings }
    }

    /// Command bound to a single key press.
    pub fn command_for_key(&self, key: egui::Key) -> Option<Command> {
        if let Some(digit) = digit_for_key(key) {
            return Some(Command::SelectDigit(digit));
        }
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, command)| *command)
    }

    /// Key bound to a command, for help text.
    pub fn key_for(&self, command: Command) -> Option<egui::Key> {
        self.bindings
            .iter()
            .find(|(_, bound)| *bound == command)
            .map(|(key, _)| *key)
    }

    /// Commands for this frame's key presses, in the order they happened.
    pub fn translate(&self, events: &[egui::Event]) -> Vec<Command> {
        events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    ..
                } => self.command_for_key(*key),
                _ => None,
            })
            .collect()
    }
}

fn digit_for_key(key: egui::Key) -> Option<u8> {
    use egui::Key::*;
    match key {
        Num0 => Some(0),
        Num1 => Some(1),
        Num2 => Some(2),
        Num3 => Some(3),
        Num4 => Some(4),
        Num5 => Some(5),
        Num6 => Some(6),
        Num7 => Some(7),
        Num8 => Some(8),
        Num9 => Some(9),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: egui::Key) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::default(),
        }
    }

    #[test]
    fn test_default_bindings() {
        let keymap = KeyMap::default();

        assert_eq!(keymap.command_for_key(egui::Key::W), Some(Command::EnterDrawMode));
        assert_eq!(keymap.command_for_key(egui::Key::D), Some(Command::EnterDeletionMode));
        assert_eq!(keymap.command_for_key(egui::Key::I), Some(Command::EnterRelabelMode));
        assert_eq!(keymap.command_for_key(egui::Key::N), Some(Command::SkipImage));
        assert_eq!(keymap.command_for_key(egui::Key::R), Some(Command::Revert));
        assert_eq!(keymap.command_for_key(egui::Key::Y), Some(Command::SaveAndNext));
        assert_eq!(keymap.command_for_key(egui::Key::Q), Some(Command::Quit));
        assert_eq!(keymap.command_for_key(egui::Key::ArrowRight), Some(Command::NextImage));
        assert_eq!(keymap.command_for_key(egui::Key::ArrowLeft), Some(Command::PreviousImage));
        assert_eq!(keymap.command_for_key(egui::Key::Z), None);
    }

    #[test]
    fn test_number_keys_are_digits() {
        let keymap = KeyMap::default();
        assert_eq!(keymap.command_for_key(egui::Key::Num0), Some(Command::SelectDigit(0)));
        assert_eq!(keymap.command_for_key(egui::Key::Num9), Some(Command::SelectDigit(9)));
    }

    #[test]
    fn test_custom_and_unknown_names() {
        let config = KeyBindingsConfig {
            save_and_next: "Enter".to_string(),
            quit: "NoSuchKey".to_string(),
            skip: "5".to_string(),
            ..KeyBindingsConfig::default()
        };
        let keymap = KeyMap::from_config(&config);

        assert_eq!(keymap.command_for_key(egui::Key::Enter), Some(Command::SaveAndNext));
        assert_eq!(keymap.command_for_key(egui::Key::Y), None);
        assert_eq!(keymap.command_for_key(egui::Key::Q), Some(Command::Quit));
        assert_eq!(keymap.key_for(Command::SkipImage), None);
        assert_eq!(keymap.command_for_key(egui::Key::Num5), Some(Command::SelectDigit(5)));
    }

    #[test]
    fn test_translate_keeps_order_and_drops_releases() {
        let keymap = KeyMap::default();
        let mut release = press(egui::Key::Q);
        if let egui::Event::Key { pressed, .. } = &mut release {
            *pressed = false;
        }
        let events = vec![
            press(egui::Key::D),
            release,
            egui::Event::Text("d".to_string()),
            press(egui::Key::Num1),
        ];

        assert_eq!(
            keymap.translate(&events),
            vec![Command::EnterDeletionMode, Command::SelectDigit(1)]
        );
    }
}
