use serde::{Deserialize, Serialize};

use super::Sketchpad;
use crate::background::BackgroundPattern;
use crate::tool::ToolState;

/// Toolbar settings remembered between sessions.
///
/// Only the toolbar is persisted; drawings and their history live for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub tools: ToolState,
    pub pattern: BackgroundPattern,
    /// Contents of the filename field
    pub filename: String,
    /// Version of the application that saved these preferences
    pub version: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            tools: ToolState::default(),
            pattern: BackgroundPattern::default(),
            filename: String::new(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl Preferences {
    /// Capture the current toolbar state
    pub fn capture(pad: &Sketchpad, filename: &str) -> Self {
        Self {
            tools: *pad.tools(),
            pattern: pad.pattern(),
            filename: filename.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }

    /// Apply to a freshly created sketchpad. Returns the filename field contents.
    ///
    /// The pattern is applied without an undo step: nothing has been drawn yet.
    pub fn restore(self, pad: &mut Sketchpad) -> String {
        if self.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Preferences saved by version {} (current {})",
                self.version,
                env!("CARGO_PKG_VERSION")
            );
        }
        pad.set_tools(self.tools);
        pad.restore_pattern(self.pattern);
        self.filename
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SketchConfig;
    use crate::tool::ToolMode;

    #[test]
    fn test_capture_and_restore() {
        let mut pad = Sketchpad::new(&SketchConfig::default(), 32, 32);
        pad.set_mode(ToolMode::Eraser);
        pad.set_eraser_width(33);
        pad.set_pattern(BackgroundPattern::Ruled);
        let prefs = Preferences::capture(&pad, "notes");

        let json = serde_json::to_string(&prefs).unwrap();
        let loaded: Preferences = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, prefs);

        let mut fresh = Sketchpad::new(&SketchConfig::default(), 32, 32);
        let filename = loaded.restore(&mut fresh);
        assert_eq!(filename, "notes");
        assert_eq!(fresh.tools().mode, ToolMode::Eraser);
        assert_eq!(fresh.tools().eraser_width, 33);
        assert_eq!(fresh.pattern(), BackgroundPattern::Ruled);
        assert_eq!(fresh.background().image(), pad.background().image());
        assert!(!fresh.history().can_undo());
        assert!(!fresh.is_dirty());
    }

    #[test]
    fn test_missing_fields_default() {
        let prefs: Preferences = serde_json::from_str(r#"{ "pattern": "graph" }"#).unwrap();
        assert_eq!(prefs.pattern, BackgroundPattern::Graph);
        assert_eq!(prefs.tools, ToolState::default());
        assert!(prefs.filename.is_empty());
    }
}
