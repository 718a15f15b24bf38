use std::fs;
use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::background::{BackgroundPattern, BackgroundStyle};
use crate::error::{SketchError, SketchResult};
use crate::tool::ToolState;

/// Name used for exports when the filename field is left empty
pub const DEFAULT_FILENAME: &str = "sketch";

/// Startup configuration for the sketchpad.
///
/// Every field has a default, so a config file only needs to name what it overrides:
///
/// ```json
/// { "tools": { "pen_color": "#dc2626" }, "max_history": 64 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Initial tool state
    pub tools: ToolState,
    /// Pattern shown at startup
    pub pattern: BackgroundPattern,
    /// Colors and spacing of the background patterns
    pub background: BackgroundStyle,
    /// Filename used when none is supplied at export time
    pub default_filename: String,
    /// Maximum number of undo snapshots kept. `None` keeps every snapshot.
    pub max_history: Option<usize>,
    /// Largest snapshot, in bytes, the drawing surface will capture
    pub capture_limit_bytes: Option<usize>,
    /// Directory native exports are written into
    pub export_dir: PathBuf,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            tools: ToolState::default(),
            pattern: BackgroundPattern::Plain,
            background: BackgroundStyle::default(),
            default_filename: DEFAULT_FILENAME.to_owned(),
            max_history: None,
            capture_limit_bytes: None,
            export_dir: PathBuf::from("."),
        }
    }
}

impl SketchConfig {
    /// Parse a config from JSON text
    pub fn from_json_str(json: &str) -> SketchResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> SketchResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded sketch config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> SketchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional)
pub fn parse_hex_color(text: &str) -> SketchResult<Color32> {
    let invalid = || SketchError::InvalidColor(text.to_owned());
    let hex = text.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    let a = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Color32::from_rgba_unmultiplied(r, g, b, a))
}

pub fn format_hex_color(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == 255 {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

/// Serde adapter storing colors as hex strings
pub(crate) mod hex_color {
    use egui::Color32;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hex_color(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_hex_color(&text).map_err(serde::de::Error::custom)
    }
}
