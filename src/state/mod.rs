mod preferences;
mod sketchpad;

pub use preferences::Preferences;
pub use sketchpad::{ExportOutcome, Sketchpad, ToolbarEvent};
