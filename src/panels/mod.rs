mod canvas;
mod toolbar;

pub use canvas::{CanvasView, surface_size};
pub use toolbar::{ToolbarAction, status_bar, toolbar_panel};
