use std::fmt;
use std::str::FromStr;

use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use crate::error::SketchError;
use crate::surface::{CompositeMode, LineStyle, Surface};

/// Paper pattern painted on the background layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundPattern {
    #[default]
    Plain,
    Ruled,
    Graph,
    Dots,
}

impl BackgroundPattern {
    pub const ALL: [BackgroundPattern; 4] = [
        BackgroundPattern::Plain,
        BackgroundPattern::Ruled,
        BackgroundPattern::Graph,
        BackgroundPattern::Dots,
    ];

    /// Selector value, e.g. `"graph"`
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundPattern::Plain => "plain",
            BackgroundPattern::Ruled => "ruled",
            BackgroundPattern::Graph => "graph",
            BackgroundPattern::Dots => "dots",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BackgroundPattern::Plain => "Plain",
            BackgroundPattern::Ruled => "Ruled",
            BackgroundPattern::Graph => "Graph",
            BackgroundPattern::Dots => "Dots",
        }
    }

    /// Like `from_str`, but unknown selector values fall back to plain paper
    pub fn from_selector(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for BackgroundPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackgroundPattern {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pattern| pattern.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SketchError::InvalidPattern(s.to_owned()))
    }
}

/// Colors and geometry shared by all patterns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundStyle {
    #[serde(with = "crate::config::hex_color")]
    pub paper_color: Color32,
    #[serde(with = "crate::config::hex_color")]
    pub line_color: Color32,
    pub line_width: f32,
    #[serde(with = "crate::config::hex_color")]
    pub dot_color: Color32,
    /// Distance between rules, grid lines and dots
    pub spacing: f32,
    /// Offset of the first dot from the top-left corner
    pub dot_offset: f32,
    pub dot_radius: f32,
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        Self {
            paper_color: Color32::WHITE,
            line_color: Color32::from_rgb(0xd1, 0xd5, 0xdb),
            line_width: 1.0,
            dot_color: Color32::from_rgb(0x9c, 0xa3, 0xaf),
            spacing: 40.0,
            dot_offset: 20.0,
            dot_radius: 2.0,
        }
    }
}

/// Repaints the background layer. Stateless apart from its style.
#[derive(Debug, Clone, Default)]
pub struct BackgroundRenderer {
    style: BackgroundStyle,
}

impl BackgroundRenderer {
    pub fn new(style: BackgroundStyle) -> Self {
        Self { style }
    }

    /// Overwrite the whole surface with `pattern` at the surface's current size
    pub fn render(&self, pattern: BackgroundPattern, surface: &mut dyn Surface) {
        let width = surface.width() as f32;
        let height = surface.height() as f32;
        log::debug!("Rendering {} background at {}x{}", pattern, width, height);

        // Cleared first: a translucent paper must not blend over the previous pattern.
        let full = surface.full_rect();
        surface.clear_rect(full);
        surface.fill_rect(full, self.style.paper_color);

        // Zero or negative spacing would never advance.
        if self.style.spacing <= 0.0 {
            return;
        }

        match pattern {
            BackgroundPattern::Plain => {}
            BackgroundPattern::Ruled => self.draw_rules(surface, width, height),
            BackgroundPattern::Graph => {
                let line = self.line_style();
                for x in steps(self.style.spacing, self.style.spacing, width) {
                    surface.stroke_line(Pos2::new(x, 0.0), Pos2::new(x, height), &line);
                }
                self.draw_rules(surface, width, height);
            }
            BackgroundPattern::Dots => {
                for x in steps(self.style.dot_offset, self.style.spacing, width) {
                    for y in steps(self.style.dot_offset, self.style.spacing, height) {
                        surface.fill_circle(
                            Pos2::new(x, y),
                            self.style.dot_radius,
                            self.style.dot_color,
                        );
                    }
                }
            }
        }
    }

    fn draw_rules(&self, surface: &mut dyn Surface, width: f32, height: f32) {
        let line = self.line_style();
        for y in steps(self.style.spacing, self.style.spacing, height) {
            surface.stroke_line(Pos2::new(0.0, y), Pos2::new(width, y), &line);
        }
    }

    fn line_style(&self) -> LineStyle {
        LineStyle {
            width: self.style.line_width,
            color: self.style.line_color,
            mode: CompositeMode::SourceOver,
        }
    }
}

/// `start, start + step, …` while below `end`
fn steps(start: f32, step: f32, end: f32) -> impl Iterator<Item = f32> {
    (0..)
        .map(move |i| start + step * i as f32)
        .take_while(move |v| *v < end)
}
