// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app is the shell around a labeling [`Session`]: it translates key
//! presses and pointer gestures into commands, hands them to the session
//! one at a time, and paints whatever scene the session ends up with.

use crate::io::media;
use crate::models::annotation::Point;
use crate::session::{Command, Flow, Session};
use crate::ui::{canvas, input::KeyMap, toolbar};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Shared slot for an error that ended the session, read by `main` after the window closes.
pub type FatalError = Rc<RefCell<Option<anyhow::Error>>>;

/// Main application state.
pub struct LabelerApp {
    session: Session,
    keymap: KeyMap,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Image dimensions (width, height)
    image_size: Option<(u32, u32)>,

    /// Path the texture was loaded from
    loaded_path: Option<PathBuf>,

    /// First corner of a box being dragged
    drag_start: Option<Point>,

    fatal: FatalError,
    closing: bool,
}

impl LabelerApp {
    pub fn new(session: Session, keymap: KeyMap, fatal: FatalError) -> Self {
        Self {
            session,
            keymap,
            image_texture: None,
            image_size: None,
            loaded_path: None,
            drag_start: None,
            fatal,
            closing: false,
        }
    }

    /// Make sure the texture shows the session's current image.
    fn sync_image(&mut self, ctx: &egui::Context) {
        let path = self.session.current_image_path();
        if self.loaded_path.as_ref() == Some(&path) {
            return;
        }

        self.drag_start = None;
        self.loaded_path = Some(path.clone());
        match media::load_image(&path) {
            Ok(loaded) => {
                let size = [loaded.width as usize, loaded.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                self.image_texture = Some(ctx.load_texture(
                    "current_image",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
                self.image_size = Some((loaded.width, loaded.height));
                log::debug!("Loaded image: {} ({}x{})", path.display(), loaded.width, loaded.height);
            }
            Err(e) => {
                log::error!("Failed to load image: {:#}", e);
                self.image_texture = None;
                self.image_size = None;
            }
        }
    }

    /// Run commands in order. Stops at quit or at the first fatal error.
    fn run_commands(&mut self, ctx: &egui::Context, commands: Vec<Command>) {
        for command in commands {
            if self.closing {
                return;
            }
            match self.session.dispatch(command) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => self.close(ctx),
                Err(e) => {
                    log::error!("{}", e);
                    *self.fatal.borrow_mut() = Some(e.into());
                    self.close(ctx);
                }
            }
        }
    }

    fn close(&mut self, ctx: &egui::Context) {
        self.closing = true;
        self.image_texture = None;
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

impl eframe::App for LabelerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.closing {
            return;
        }

        let mut commands = Vec::new();

        // Keyboard first, unless a widget has focus
        if !ctx.wants_keyboard_input() {
            let events = ctx.input(|i| i.events.clone());
            commands.extend(self.keymap.translate(&events));
        }

        self.sync_image(ctx);

        // Toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            if let Some(command) = toolbar::show(ui, &self.session, &self.keymap) {
                commands.push(command);
            }
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            toolbar::status(ui, &self.session, &self.keymap);
        });

        // Main canvas (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            let canvas_state = self.session.canvas();
            if let Some(command) = canvas::show(
                ui,
                self.session.scene(),
                canvas_state.mode(),
                canvas_state.class_label(),
                &self.image_texture,
                self.image_size,
                &mut self.drag_start,
            ) {
                commands.push(command);
            }
        });

        if !commands.is_empty() {
            self.run_commands(ctx, commands);
            ctx.request_repaint();
        }
    }
}
