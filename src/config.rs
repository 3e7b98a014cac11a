// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Optional YAML configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```yaml
//! log_level: debug
//! skipped_dir_name: rejected
//! keybindings:
//!   save_and_next: Enter
//! ```

use crate::error::{LabelerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Key names for every command. Names follow egui's `Key::name` spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindingsConfig {
    pub draw: String,
    pub delete: String,
    pub relabel: String,
    pub skip: String,
    pub revert: String,
    pub save_and_next: String,
    pub quit: String,
    pub next_image: String,
    pub previous_image: String,
}

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self {
            draw: "W".to_string(),
            delete: "D".to_string(),
            relabel: "I".to_string(),
            skip: "N".to_string(),
            revert: "R".to_string(),
            save_and_next: "Y".to_string(),
            quit: "Q".to_string(),
            next_image: "ArrowRight".to_string(),
            previous_image: "ArrowLeft".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelerConfig {
    /// Initial window size in points
    pub window_size: [f32; 2],
    pub log_level: LogLevel,
    /// Subdirectory of the output root for finished images
    pub labeled_dir_name: String,
    /// Subdirectory of the output root for skipped images
    pub skipped_dir_name: String,
    pub keybindings: KeyBindingsConfig,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            window_size: [900.0, 600.0],
            log_level: LogLevel::default(),
            labeled_dir_name: "labeled".to_string(),
            skipped_dir_name: "skipped".to_string(),
            keybindings: KeyBindingsConfig::default(),
        }
    }
}

impl LabelerConfig {
    /// Load a config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let yaml = std::fs::read_to_string(path).map_err(|source| LabelerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml, path)
    }

    /// Parse YAML text; `origin` is only used for error messages.
    pub fn from_yaml(yaml: &str, origin: &Path) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|source| LabelerError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_path_gives_defaults() {
        let config = LabelerConfig::load(None).unwrap();
        assert_eq!(config, LabelerConfig::default());
        assert_eq!(config.keybindings.save_and_next, "Y");
        assert_eq!(config.labeled_dir_name, "labeled");
    }

    #[test]
    fn test_partial_yaml_overrides_only_given_keys() {
        let yaml = "log_level: debug\nskipped_dir_name: rejected\nkeybindings:\n  save_and_next: Enter\n";
        let config = LabelerConfig::from_yaml(yaml, Path::new("c.yaml")).unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.skipped_dir_name, "rejected");
        assert_eq!(config.labeled_dir_name, "labeled");
        assert_eq!(config.keybindings.save_and_next, "Enter");
        assert_eq!(config.keybindings.quit, "Q");
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = LabelerConfig::from_yaml("  \n", Path::new("c.yaml")).unwrap();
        assert_eq!(config, LabelerConfig::default());
    }

    #[test]
    fn test_bad_yaml_is_a_config_error() {
        let err = LabelerConfig::from_yaml("log_level: loud\n", Path::new("c.yaml")).unwrap_err();
        assert!(matches!(err, LabelerError::Config { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("labeler.yaml");
        std::fs::write(&path, "window_size: [1280.0, 720.0]\n").unwrap();

        let config = LabelerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.window_size, [1280.0, 720.0]);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(LabelerConfig::load(Some(Path::new("/nonexistent/labeler.yaml"))).is_err());
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Info);
    }
}
