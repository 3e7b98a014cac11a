// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Labeling session: connects operator commands with the canvas and the store.
//!
//! The session owns the output directory layout. Each finished image is
//! written to `<output>/<labeled>/<base name>.txt`, each skipped one to
//! `<output>/<skipped>/<base name>.txt`.

use super::canvas::{Canvas, CanvasState, LabelingMode, Scene};
use super::command::{Command, Flow};
use crate::error::{LabelerError, Result};
use crate::io::serialization;
use crate::models::annotation::{BBox, Label};
use crate::models::dataset::{AnnotationStore, Direction};
use std::path::{Path, PathBuf};

/// Paths and options needed to start a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub annotations: PathBuf,
    pub output_root: PathBuf,
    pub images: PathBuf,
    pub start_index: Option<usize>,
    pub labeled_dir_name: String,
    pub skipped_dir_name: String,
}

/// Active labeling session.
pub struct Session {
    store: AnnotationStore,
    canvas: Canvas,
    image_dir: PathBuf,
    labeled_dir: PathBuf,
    skipped_dir: PathBuf,
}

impl Session {
    /// Create the output directories, load the annotations and open the first image.
    pub fn start(options: &SessionOptions) -> Result<Self> {
        let labeled_dir = options.output_root.join(&options.labeled_dir_name);
        let skipped_dir = options.output_root.join(&options.skipped_dir_name);
        for dir in [&labeled_dir, &skipped_dir] {
            std::fs::create_dir_all(dir).map_err(|source| LabelerError::Persistence {
                path: dir.clone(),
                source,
            })?;
        }

        let store = AnnotationStore::open(
            &options.annotations,
            &[labeled_dir.as_path(), skipped_dir.as_path()],
            options.start_index,
        )?;

        Ok(Self::new(
            store,
            options.images.clone(),
            labeled_dir,
            skipped_dir,
        ))
    }

    /// Wrap an already-loaded store. The output directories must exist.
    pub fn new(
        store: AnnotationStore,
        image_dir: PathBuf,
        labeled_dir: PathBuf,
        skipped_dir: PathBuf,
    ) -> Self {
        let mut session = Self {
            store,
            canvas: Canvas::new(),
            image_dir,
            labeled_dir,
            skipped_dir,
        };
        session.reload_canvas();
        session
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn scene(&self) -> &Scene {
        self.canvas.scene()
    }

    pub fn current_image_name(&self) -> &str {
        &self.store.current_record().file_name
    }

    pub fn current_image_path(&self) -> PathBuf {
        self.image_dir.join(self.current_image_name())
    }

    pub fn labeled_dir(&self) -> &Path {
        &self.labeled_dir
    }

    pub fn skipped_dir(&self) -> &Path {
        &self.skipped_dir
    }

    /// Handle one operator command.
    pub fn dispatch(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::EnterDrawMode => {
                self.canvas.set_mode(LabelingMode::Drawing);
                log::info!("drawing mode is set");
            }
            Command::EnterDeletionMode => {
                self.canvas.set_mode(LabelingMode::Deletion);
                log::info!("delete mode is set");
            }
            Command::EnterRelabelMode => {
                self.canvas.set_mode(LabelingMode::SetLabel);
                log::info!("name changing mode is set");
            }
            Command::SkipImage => {
                let name = self.current_image_name().to_string();
                self.save_to(&self.skipped_dir)?;
                self.iterate(Direction::Forward, 1)?;
                log::info!("image {} skipped", name);
            }
            Command::Revert => {
                self.undo_changes();
                log::info!("changes reverted");
            }
            Command::SaveAndNext => {
                self.save_to(&self.labeled_dir)?;
                self.iterate(Direction::Forward, 1)?;
                log::info!("opened image {}", self.current_image_name());
            }
            Command::NextImage => self.iterate(Direction::Forward, 1)?,
            Command::PreviousImage => self.iterate(Direction::Backward, 1)?,
            Command::Quit => {
                log::info!("exiting");
                return Ok(Flow::Quit);
            }
            Command::SelectDigit(digit) => self.handle_digit(digit),
            Command::Click(point) => self.canvas.click(point),
            Command::RegionSelected(region) => {
                if self.canvas.mode() == LabelingMode::Drawing {
                    self.canvas.draw_bbox(region);
                } else {
                    log::debug!("ignoring region outside drawing mode");
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Digits pick a class normally, and a box while a selection is pending.
    fn handle_digit(&mut self, digit: u8) {
        match self.canvas.state() {
            CanvasState::Normal => match Label::from_hotkey_digit(digit) {
                Some(class_label) => {
                    self.canvas.set_class_label(class_label);
                    log::info!("selected class {}", class_label);
                }
                None => log::debug!("no class bound to digit {}", digit),
            },
            CanvasState::AwaitingDisambiguationIndex => self.canvas.specify_bbox(digit),
        }
    }

    fn output_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.txt", self.store.current_record().base_name()))
    }

    fn save_to(&self, dir: &Path) -> Result<()> {
        let path = self.output_path(dir);
        serialization::export_bboxes(&path, &self.canvas.get_bboxes_json())?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    fn undo_changes(&mut self) {
        let bboxes = self.store.bboxes_for_image(self.store.current_image_id());
        self.canvas.set_bboxes(&bboxes);
        self.canvas.refresh();
    }

    fn iterate(&mut self, direction: Direction, step: usize) -> Result<()> {
        let before = self.store.current_image_id();
        let after = self.store.change_current_image_id(direction, step)?;
        if before == after {
            log::info!("no more images in this direction");
        }
        self.reload_canvas();
        Ok(())
    }

    /// Boxes to start editing from: an earlier output for this image if any, else the source.
    fn initial_bboxes(&self) -> Vec<BBox> {
        for dir in [&self.labeled_dir, &self.skipped_dir] {
            let path = self.output_path(dir);
            match serialization::import_bboxes(&path) {
                Ok(Some(bboxes)) => {
                    log::info!("loaded saved boxes from {}", path.display());
                    return bboxes;
                }
                Ok(None) => {}
                Err(e) => log::warn!("ignoring saved output: {}", e),
            }
        }
        self.store.bboxes_for_image(self.store.current_image_id())
    }

    fn reload_canvas(&mut self) {
        let bboxes = self.initial_bboxes();
        self.canvas.set_bboxes(&bboxes);
        self.canvas.refresh();
        log::info!(
            "image id: {}, image name: {}",
            self.store.current_image_id(),
            self.current_image_name()
        );
    }
}
