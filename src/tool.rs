use std::ops::RangeInclusive;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::surface::{CompositeMode, LineStyle};

/// Range the width sliders allow
pub const WIDTH_RANGE: RangeInclusive<u32> = 1..=50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Pen,
    Eraser,
}

impl ToolMode {
    pub fn name(&self) -> &'static str {
        match self {
            ToolMode::Pen => "Pen",
            ToolMode::Eraser => "Eraser",
        }
    }
}

/// Current pen and eraser settings, read on every drawn segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolState {
    pub mode: ToolMode,
    pub pen_width: u32,
    #[serde(with = "crate::config::hex_color")]
    pub pen_color: Color32,
    pub eraser_width: u32,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            mode: ToolMode::Pen,
            pen_width: 4,
            pen_color: Color32::from_rgb(0x11, 0x18, 0x27),
            eraser_width: 20,
        }
    }
}

impl ToolState {
    pub fn set_mode(&mut self, mode: ToolMode) {
        self.mode = mode;
    }

    pub fn set_pen_width(&mut self, width: u32) {
        self.pen_width = clamp_width(width);
    }

    pub fn set_pen_color(&mut self, color: Color32) {
        self.pen_color = color;
    }

    pub fn set_eraser_width(&mut self, width: u32) {
        self.eraser_width = clamp_width(width);
    }

    /// Width of the active tool
    pub fn active_width(&self) -> u32 {
        match self.mode {
            ToolMode::Pen => self.pen_width,
            ToolMode::Eraser => self.eraser_width,
        }
    }

    /// The line style a stroke segment is drawn with under the current settings
    pub fn line_style(&self) -> LineStyle {
        match self.mode {
            ToolMode::Pen => LineStyle {
                width: self.pen_width as f32,
                color: self.pen_color,
                mode: CompositeMode::SourceOver,
            },
            // The eraser's color never reaches the surface under destination-out.
            ToolMode::Eraser => LineStyle {
                width: self.eraser_width as f32,
                color: Color32::BLACK,
                mode: CompositeMode::DestinationOut,
            },
        }
    }

    /// Clamp any out-of-range widths, e.g. after loading a hand-edited config
    pub fn sanitized(mut self) -> Self {
        self.pen_width = clamp_width(self.pen_width);
        self.eraser_width = clamp_width(self.eraser_width);
        self
    }
}

fn clamp_width(width: u32) -> u32 {
    width.clamp(*WIDTH_RANGE.start(), *WIDTH_RANGE.end())
}
