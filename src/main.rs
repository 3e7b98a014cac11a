// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! vestlabel binary: argument handling, logging setup and the window.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use vestlabel::app::{FatalError, LabelerApp};
use vestlabel::config::LabelerConfig;
use vestlabel::session::{Session, SessionOptions};
use vestlabel::ui::input::KeyMap;

const USAGE: &str = "Usage: vestlabel --input_coco <annotations.json> --output_folder <dir> \
--images <dir> [--start <index>] [--config <labeler.yaml>]";

/// Command line arguments. Missing paths are asked for with file dialogs.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    input_coco: Option<PathBuf>,
    output_folder: Option<PathBuf>,
    images: Option<PathBuf>,
    start: Option<usize>,
    config: Option<PathBuf>,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            let mut value = || {
                args.next()
                    .with_context(|| format!("missing value for {flag}\n{USAGE}"))
            };
            match flag.as_str() {
                "--input_coco" | "--input-coco" => parsed.input_coco = Some(value()?.into()),
                "--output_folder" | "--output-folder" => {
                    parsed.output_folder = Some(value()?.into())
                }
                "--images" => parsed.images = Some(value()?.into()),
                "--config" => parsed.config = Some(value()?.into()),
                "--start" => {
                    let raw = value()?;
                    parsed.start = Some(
                        raw.parse()
                            .with_context(|| format!("--start expects an image index, got '{raw}'"))?,
                    );
                }
                "-h" | "--help" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                other => bail!("unexpected argument '{other}'\n{USAGE}"),
            }
        }

        Ok(parsed)
    }
}

fn pick_file_if_missing(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => rfd::FileDialog::new()
            .set_title("Open COCO annotations")
            .add_filter("COCO annotations", &["json"])
            .pick_file()
            .context("no annotation file selected"),
    }
}

fn pick_folder_if_missing(path: Option<PathBuf>, title: &str) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => rfd::FileDialog::new()
            .set_title(title)
            .pick_folder()
            .with_context(|| format!("no folder selected for: {title}")),
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse(std::env::args().skip(1))?;
    let config = LabelerConfig::load(args.config.as_deref())?;

    // Initialize logging; RUST_LOG still wins over the config file
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.to_level_filter().as_str()),
    )
    .init();

    let options = SessionOptions {
        annotations: pick_file_if_missing(args.input_coco)?,
        output_root: pick_folder_if_missing(args.output_folder, "Output folder")?,
        images: pick_folder_if_missing(args.images, "Image folder")?,
        start_index: args.start,
        labeled_dir_name: config.labeled_dir_name.clone(),
        skipped_dir_name: config.skipped_dir_name.clone(),
    };

    let session = Session::start(&options).context("starting labeling session")?;
    let keymap = KeyMap::from_config(&config.keybindings);
    let fatal: FatalError = Default::default();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title("Labeler"),
        ..Default::default()
    };

    let app_fatal = fatal.clone();
    eframe::run_native(
        "vestlabel",
        native_options,
        Box::new(move |_cc| Ok(Box::new(LabelerApp::new(session, keymap, app_fatal)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    let fatal = fatal.borrow_mut().take();
    match fatal {
        Some(e) => Err(e.context("labeling session stopped")),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_all_arguments() {
        let parsed = CliArgs::parse(args(&[
            "--input_coco",
            "data/instances.json",
            "--output-folder",
            "out",
            "--images",
            "data/images",
            "--start",
            "12",
            "--config",
            "labeler.yaml",
        ]))
        .unwrap();

        assert_eq!(
            parsed,
            CliArgs {
                input_coco: Some("data/instances.json".into()),
                output_folder: Some("out".into()),
                images: Some("data/images".into()),
                start: Some(12),
                config: Some("labeler.yaml".into()),
            }
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(CliArgs::parse(Vec::new()).unwrap(), CliArgs::default());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(CliArgs::parse(args(&["--start", "-1"])).is_err());
        assert!(CliArgs::parse(args(&["--images"])).is_err());
        assert!(CliArgs::parse(args(&["--verbose"])).is_err());
    }
}
