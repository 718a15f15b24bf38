//! The sketchpad controller: all widget state in one place, driven by method calls.
//!
//! `Sketchpad` owns the two layers (background and drawing), the tool settings, the undo
//! history, the stroke recorder and the dirty flag. Pointer samples and toolbar events are
//! translated into calls on it; nothing else mutates the layers.
//!
//! # Layers
//!
//! The background layer is repainted wholesale by the [`BackgroundRenderer`] whenever the
//! pattern or size changes. The drawing layer receives strokes and is the only layer the
//! history snapshots, so undo never reverts a pattern change; it reverts the drawing layer
//! to what it was when the pattern changed.
//!
//! # Example
//!
//! ```rust
//! use eframe_sketch::config::SketchConfig;
//! use eframe_sketch::input::PointerSample;
//! use eframe_sketch::state::Sketchpad;
//!
//! let mut pad = Sketchpad::new(&SketchConfig::default(), 64, 64);
//! pad.pointer(PointerSample::press(10.0, 10.0));
//! pad.pointer(PointerSample::moved(10.0, 50.0));
//! pad.pointer(PointerSample::release(10.0, 50.0));
//! assert!(pad.is_dirty());
//!
//! pad.undo();
//! assert!(pad.drawing().is_blank());
//! ```
use egui::{Color32, Pos2};
use image::RgbaImage;

use crate::background::{BackgroundPattern, BackgroundRenderer};
use crate::config::SketchConfig;
use crate::error::SketchResult;
use crate::export::{
    self, CONFIRM_PROMPT, Confirm, Download, ExportArtifact, ExportFormat, export_filename,
};
use crate::history::SnapshotHistory;
use crate::input::PointerSample;
use crate::stroke::{StrokeOutcome, StrokeRecorder};
use crate::surface::{PixelSurface, Surface};
use crate::tool::{ToolMode, ToolState};

/// A discrete toolbar interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolbarEvent {
    SelectMode(ToolMode),
    PenWidth(u32),
    PenColor(Color32),
    EraserWidth(u32),
    Pattern(BackgroundPattern),
    Undo,
    Redo,
    Clear,
}

/// How an export request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The artifact was handed to the download target
    Delivered { filename: String },
    /// The user declined the "no changes" prompt
    Declined,
}

/// Owns every piece of sketchpad state
#[derive(Debug)]
pub struct Sketchpad {
    background: PixelSurface,
    drawing: PixelSurface,
    renderer: BackgroundRenderer,
    pattern: BackgroundPattern,
    tools: ToolState,
    history: SnapshotHistory,
    recorder: StrokeRecorder,
    /// Set by anything that changes what an export would contain
    dirty: bool,
    /// Top-left corner of the drawing layer on screen
    surface_origin: Pos2,
    default_filename: String,
    format: ExportFormat,
    background_revision: u64,
    drawing_revision: u64,
}

impl Sketchpad {
    /// Creates a sketchpad of the given size with the configured tools and pattern
    pub fn new(config: &SketchConfig, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let mut pad = Self {
            background: PixelSurface::new(width, height),
            drawing: PixelSurface::new(width, height)
                .with_capture_limit(config.capture_limit_bytes),
            renderer: BackgroundRenderer::new(config.background),
            pattern: config.pattern,
            tools: config.tools.sanitized(),
            history: SnapshotHistory::with_max_depth(config.max_history),
            recorder: StrokeRecorder::new(),
            dirty: false,
            surface_origin: Pos2::ZERO,
            default_filename: config.default_filename.clone(),
            format: ExportFormat::default(),
            background_revision: 0,
            drawing_revision: 0,
        };
        pad.renderer.render(pad.pattern, &mut pad.background);
        pad
    }

    /// Reinitialise both layers at a new size.
    ///
    /// The drawing is lost and the background repainted. The history is kept, so undo still
    /// restores older drawings (clipped to the new size).
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        log::info!("Resizing sketchpad to {}x{}", width, height);
        self.recorder.reset();
        self.background.set_dimensions(width, height);
        self.drawing.set_dimensions(width, height);
        self.renderer.render(self.pattern, &mut self.background);
        self.background_revision += 1;
        self.drawing_revision += 1;
    }

    /// Switch the background pattern. The drawing layer is snapshotted first so the change is
    /// an undo step, but undo leaves the new pattern in place.
    ///
    /// Returns false if `pattern` is already selected.
    pub fn set_pattern(&mut self, pattern: BackgroundPattern) -> bool {
        if pattern == self.pattern {
            return false;
        }
        self.history.snapshot(&self.drawing);
        self.pattern = pattern;
        self.renderer.render(pattern, &mut self.background);
        self.background_revision += 1;
        self.dirty = true;
        true
    }

    /// Select a pattern without recording an undo step or dirtying the sketch
    pub fn restore_pattern(&mut self, pattern: BackgroundPattern) {
        if pattern != self.pattern {
            self.pattern = pattern;
            self.renderer.render(pattern, &mut self.background);
            self.background_revision += 1;
        }
    }

    /// Tell the sketchpad where the drawing layer sits on screen
    pub fn set_surface_origin(&mut self, origin: Pos2) {
        self.surface_origin = origin;
    }

    /// Feed a pointer sample in viewport coordinates
    pub fn pointer(&mut self, sample: PointerSample) -> StrokeOutcome {
        let sample = sample.relative_to(self.surface_origin);
        let outcome =
            self.recorder
                .handle(sample, &self.tools, &mut self.drawing, &mut self.history);
        if outcome == StrokeOutcome::Drew {
            self.dirty = true;
            self.drawing_revision += 1;
        }
        outcome
    }

    pub fn set_mode(&mut self, mode: ToolMode) {
        self.tools.set_mode(mode);
    }

    pub fn set_pen_width(&mut self, width: u32) {
        self.tools.set_pen_width(width);
    }

    pub fn set_pen_color(&mut self, color: Color32) {
        self.tools.set_pen_color(color);
    }

    pub fn set_eraser_width(&mut self, width: u32) {
        self.tools.set_eraser_width(width);
    }

    /// Replace all tool settings at once, e.g. from restored preferences
    pub fn set_tools(&mut self, tools: ToolState) {
        self.tools = tools.sanitized();
    }

    /// Returns true if the drawing layer changed
    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo(&mut self.drawing);
        if changed {
            self.mark_drawing_changed();
        }
        changed
    }

    /// Returns true if the drawing layer changed
    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo(&mut self.drawing);
        if changed {
            self.mark_drawing_changed();
        }
        changed
    }

    /// Erase the drawing layer. The background is untouched.
    pub fn clear(&mut self) {
        self.history.snapshot(&self.drawing);
        let rect = self.drawing.full_rect();
        self.drawing.clear_rect(rect);
        self.mark_drawing_changed();
    }

    /// Apply a toolbar event. Returns true if either layer changed.
    pub fn apply(&mut self, event: ToolbarEvent) -> bool {
        log::debug!("Toolbar event: {:?}", event);
        match event {
            ToolbarEvent::SelectMode(mode) => self.set_mode(mode),
            ToolbarEvent::PenWidth(width) => self.set_pen_width(width),
            ToolbarEvent::PenColor(color) => self.set_pen_color(color),
            ToolbarEvent::EraserWidth(width) => self.set_eraser_width(width),
            ToolbarEvent::Pattern(pattern) => return self.set_pattern(pattern),
            ToolbarEvent::Undo => return self.undo(),
            ToolbarEvent::Redo => return self.redo(),
            ToolbarEvent::Clear => {
                self.clear();
                return true;
            }
        }
        false
    }

    /// Background and drawing merged into one image
    pub fn compose(&self) -> RgbaImage {
        export::compose(&self.background, &self.drawing)
    }

    /// True if exporting now would first ask for confirmation
    pub fn needs_confirmation(&self) -> bool {
        !self.dirty
    }

    /// Compose, encode and deliver the sketch as `<name>.png`.
    ///
    /// If nothing changed since the last export the user is asked first; declining is not an
    /// error. The dirty flag is reset only once the download target accepted the artifact.
    pub fn export(
        &mut self,
        name: &str,
        confirm: &mut dyn Confirm,
        download: &mut dyn Download,
    ) -> SketchResult<ExportOutcome> {
        if self.needs_confirmation() && !confirm.confirm(CONFIRM_PROMPT) {
            log::info!("Export declined");
            return Ok(ExportOutcome::Declined);
        }

        let filename = export_filename(name, &self.default_filename, self.format);
        let bytes = self.format.encode(&self.compose())?;
        let artifact = ExportArtifact {
            filename: filename.clone(),
            format: self.format,
            bytes,
        };
        download.deliver(&artifact)?;

        self.dirty = false;
        log::info!("Exported {}", filename);
        Ok(ExportOutcome::Delivered { filename })
    }

    fn mark_drawing_changed(&mut self) {
        self.dirty = true;
        self.drawing_revision += 1;
    }

    pub fn background(&self) -> &PixelSurface {
        &self.background
    }

    pub fn drawing(&self) -> &PixelSurface {
        &self.drawing
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn pattern(&self) -> BackgroundPattern {
        self.pattern
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True while a stroke is in progress
    pub fn is_drawing(&self) -> bool {
        self.recorder.is_active()
    }

    pub fn size(&self) -> (u32, u32) {
        self.drawing.size()
    }

    pub fn surface_origin(&self) -> Pos2 {
        self.surface_origin
    }

    pub fn default_filename(&self) -> &str {
        &self.default_filename
    }

    /// Bumped whenever the background pixels change
    pub fn background_revision(&self) -> u64 {
        self.background_revision
    }

    /// Bumped whenever the drawing pixels change
    pub fn drawing_revision(&self) -> u64 {
        self.drawing_revision
    }
}
