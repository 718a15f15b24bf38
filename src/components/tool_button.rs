use crate::tool::ToolMode;

/// Square toggle button for choosing between pen and eraser
pub struct ToolButton {
    pub mode: ToolMode,
    pub selected: bool,
}

impl ToolButton {
    pub fn new(mode: ToolMode, selected: bool) -> Self {
        Self { mode, selected }
    }

    pub fn icon(&self) -> &'static str {
        match self.mode {
            ToolMode::Pen => "✏",
            ToolMode::Eraser => "⌫",
        }
    }

    /// Painted with the theme's selectable-widget visuals, so it matches `selectable_label`
    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let size = egui::Vec2::splat(ui.spacing().interact_size.y * 1.6);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let visuals = ui.style().interact_selectable(&response, self.selected);
            let rect = rect.expand(visuals.expansion);
            ui.painter()
                .rect(rect, visuals.rounding, visuals.weak_bg_fill, visuals.bg_stroke);
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.icon(),
                egui::FontId::proportional(rect.height() * 0.6),
                visuals.text_color(),
            );
        }

        response.on_hover_text(self.mode.name())
    }
}
