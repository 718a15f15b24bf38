use egui::{Key, KeyboardShortcut, Modifiers};

use crate::config::SketchConfig;
use crate::export::{CONFIRM_PROMPT, Download};
use crate::panels::{self, CanvasView, ToolbarAction};
use crate::state::{ExportOutcome, Preferences, Sketchpad, ToolbarEvent};

const UNDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO: KeyboardShortcut =
    KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::Z);
const REDO_ALT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);

/// The sketchpad widget as an eframe application.
///
/// Only the toolbar settings are persisted; the drawing lives for one session.
pub struct SketchApp {
    pad: Sketchpad,
    canvas: CanvasView,
    /// Contents of the filename field
    filename: String,
    /// The "no changes" confirmation is open
    confirm_export: bool,
    status: Option<String>,
    download: Box<dyn Download>,
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: SketchConfig) -> Self {
        let mut app = Self::with_download(config.clone(), default_download(&config));
        if let Some(storage) = cc.storage {
            if let Some(prefs) = eframe::get_value::<Preferences>(storage, eframe::APP_KEY) {
                log::info!("Restoring toolbar preferences");
                app.filename = prefs.restore(&mut app.pad);
            }
        }
        app
    }

    /// An app that hands exports to `download`. The canvas takes its real size on the first
    /// frame.
    pub fn with_download(config: SketchConfig, download: Box<dyn Download>) -> Self {
        Self {
            pad: Sketchpad::new(&config, 1, 1),
            canvas: CanvasView::new(),
            filename: String::new(),
            confirm_export: false,
            status: None,
            download,
        }
    }

    pub fn sketchpad(&self) -> &Sketchpad {
        &self.pad
    }

    pub fn sketchpad_mut(&mut self) -> &mut Sketchpad {
        &mut self.pad
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = filename.into();
    }

    pub fn is_confirming_export(&self) -> bool {
        self.confirm_export
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Download button. Opens the confirmation if nothing changed since the last export.
    pub fn request_export(&mut self) {
        if self.pad.needs_confirmation() {
            log::debug!("Asking before exporting an unchanged sketch");
            self.confirm_export = true;
        } else {
            self.export_now();
        }
    }

    /// "Download anyway" in the confirmation
    pub fn accept_export(&mut self) {
        self.confirm_export = false;
        self.export_now();
    }

    /// "Cancel" in the confirmation
    pub fn decline_export(&mut self) {
        self.confirm_export = false;
        log::info!("Export declined");
    }

    fn export_now(&mut self) {
        // Any confirmation has already been given by the time we get here.
        let result = self
            .pad
            .export(&self.filename, &mut |_: &str| true, self.download.as_mut());
        self.status = match result {
            Ok(ExportOutcome::Delivered { filename }) => Some(format!("Saved {filename}")),
            Ok(ExportOutcome::Declined) => None,
            Err(err) => {
                log::warn!("Export failed: {err}");
                Some(format!("Export failed: {err}"))
            }
        };
    }

    fn handle_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::Event(event) => {
                self.pad.apply(event);
            }
            ToolbarAction::Download => self.request_export(),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Text fields keep Ctrl+Z for themselves
        if ctx.wants_keyboard_input() {
            return;
        }
        // Redo first: the undo shortcut also matches with shift held.
        let (redo, undo) = ctx.input_mut(|i| {
            let redo = i.consume_shortcut(&REDO) || i.consume_shortcut(&REDO_ALT);
            let undo = i.consume_shortcut(&UNDO);
            (redo, undo)
        });
        if redo {
            self.pad.apply(ToolbarEvent::Redo);
        }
        if undo {
            self.pad.apply(ToolbarEvent::Undo);
        }
    }

    /// Lay out one frame
    fn ui(&mut self, ctx: &egui::Context) {
        if !self.confirm_export {
            self.handle_shortcuts(ctx);
        }

        let actions = panels::toolbar_panel(ctx, &self.pad, &mut self.filename);
        if !self.confirm_export {
            for action in actions {
                self.handle_action(action);
            }
        }
        panels::status_bar(ctx, &self.pad, self.status.as_deref());

        self.canvas.show(ctx, &mut self.pad, !self.confirm_export);

        self.export_confirmation(ctx);
    }

    fn export_confirmation(&mut self, ctx: &egui::Context) {
        if !self.confirm_export {
            return;
        }

        let mut accepted = false;
        let mut declined = false;
        egui::Window::new("Download sketch")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(CONFIRM_PROMPT);
                ui.horizontal(|ui| {
                    accepted = ui.button("Download anyway").clicked();
                    declined = ui.button("Cancel").clicked();
                });
            });

        if accepted {
            self.accept_export();
        } else if declined || ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.decline_export();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_download(config: &SketchConfig) -> Box<dyn Download> {
    Box::new(crate::export::FileDownload::new(config.export_dir.clone()))
}

#[cfg(target_arch = "wasm32")]
fn default_download(_config: &SketchConfig) -> Box<dyn Download> {
    Box::new(crate::export::BrowserDownload)
}

impl eframe::App for SketchApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let prefs = Preferences::capture(&self.pad, &self.filename);
        eframe::set_value(storage, eframe::APP_KEY, &prefs);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}
