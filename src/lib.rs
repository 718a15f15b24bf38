#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod background;
pub mod components;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod input;
pub mod panels;
pub mod state;
pub mod stroke;
pub mod surface;
pub mod texture;
pub mod tool;

pub use app::SketchApp;
pub use background::{BackgroundPattern, BackgroundRenderer};
pub use config::SketchConfig;
pub use error::{SketchError, SketchResult};
pub use history::SnapshotHistory;
pub use state::Sketchpad;
pub use stroke::StrokeRecorder;
pub use surface::{PixelSurface, Surface};
pub use tool::{ToolMode, ToolState};
