use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

use crate::input::{InputHandler, PointerPhase};
use crate::state::Sketchpad;
use crate::texture::{Layer, TextureCache};

/// Surface size in pixels for a canvas area in points
pub fn surface_size(rect: Rect) -> (u32, u32) {
    let width = rect.width().max(1.0).round() as u32;
    let height = rect.height().max(1.0).round() as u32;
    (width, height)
}

/// The drawing area: routes pointer input into the sketchpad and paints both layers.
///
/// Resizing wipes the drawing, so the surfaces follow the window, not the panel. Panels
/// around the canvas growing or shrinking only moves the origin and the clip rect.
#[derive(Default)]
pub struct CanvasView {
    input: InputHandler,
    textures: TextureCache,
    /// Viewport size the surfaces were last sized for
    viewport: Option<Vec2>,
}

impl CanvasView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    /// With `accept_input` false (e.g. while a modal is open) samples are dropped.
    pub fn show(&mut self, ctx: &egui::Context, pad: &mut Sketchpad, accept_input: bool) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::from_gray(64)))
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                let response = ui.allocate_rect(rect, Sense::drag());

                let viewport = ctx.screen_rect().size();
                if self.viewport != Some(viewport) {
                    self.viewport = Some(viewport);
                    let size = surface_size(rect);
                    if pad.size() != size {
                        pad.resize(size.0, size.1);
                        self.textures.clear();
                    }
                }
                pad.set_surface_origin(rect.min);

                let samples = self.input.process_input(ctx, rect);
                if accept_input {
                    for sample in samples {
                        // Presses under a popup or another window belong to that window
                        if sample.phase == PointerPhase::Press && !response.hovered() {
                            continue;
                        }
                        pad.pointer(sample);
                    }
                }

                let (width, height) = pad.size();
                let paint_rect =
                    Rect::from_min_size(rect.min, egui::vec2(width as f32, height as f32));
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));

                let background = self.textures.texture_for(
                    ctx,
                    Layer::Background,
                    pad.background_revision(),
                    || pad.background().to_color_image(),
                );
                let drawing =
                    self.textures
                        .texture_for(ctx, Layer::Drawing, pad.drawing_revision(), || {
                            pad.drawing().to_color_image()
                        });

                let painter = ui.painter_at(rect);
                painter.image(background, paint_rect, uv, Color32::WHITE);
                painter.image(drawing, paint_rect, uv, Color32::WHITE);

                // Brush outline under the pointer
                if let Some(pos) = response.hover_pos() {
                    let radius = pad.tools().active_width() as f32 / 2.0;
                    painter.circle_stroke(pos, radius, Stroke::new(1.0, Color32::from_gray(128)));
                }

                if pad.is_drawing() {
                    ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
                }
            });
    }
}
