use egui::color_picker::{self, Alpha};

use crate::background::BackgroundPattern;
use crate::components::ToolButton;
use crate::state::{Sketchpad, ToolbarEvent};
use crate::tool::{ToolMode, WIDTH_RANGE};

/// Something the user asked for from the toolbar this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolbarAction {
    Event(ToolbarEvent),
    Download,
}

/// Top toolbar. Reads the sketchpad and reports what the user changed; the caller applies it.
pub fn toolbar_panel(
    ctx: &egui::Context,
    pad: &Sketchpad,
    filename: &mut String,
) -> Vec<ToolbarAction> {
    let mut actions = Vec::new();
    let mut download = false;
    let mut emit = |event: ToolbarEvent| actions.push(ToolbarAction::Event(event));

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            let tools = *pad.tools();

            for mode in [ToolMode::Pen, ToolMode::Eraser] {
                if ToolButton::new(mode, tools.mode == mode).show(ui).clicked() {
                    log::info!("Tool selected from UI: {}", mode.name());
                    emit(ToolbarEvent::SelectMode(mode));
                }
            }
            ui.separator();

            let mut pen_width = tools.pen_width;
            if ui
                .add(egui::Slider::new(&mut pen_width, WIDTH_RANGE).text("Pen"))
                .changed()
            {
                emit(ToolbarEvent::PenWidth(pen_width));
            }

            let mut pen_color = tools.pen_color;
            if color_picker::color_edit_button_srgba(ui, &mut pen_color, Alpha::Opaque).changed() {
                emit(ToolbarEvent::PenColor(pen_color));
            }

            let mut eraser_width = tools.eraser_width;
            if ui
                .add(egui::Slider::new(&mut eraser_width, WIDTH_RANGE).text("Eraser"))
                .changed()
            {
                emit(ToolbarEvent::EraserWidth(eraser_width));
            }
            ui.separator();

            let mut pattern = pad.pattern();
            egui::ComboBox::from_id_salt("background_pattern")
                .selected_text(pattern.label())
                .show_ui(ui, |ui| {
                    for option in BackgroundPattern::ALL {
                        ui.selectable_value(&mut pattern, option, option.label());
                    }
                });
            if pattern != pad.pattern() {
                emit(ToolbarEvent::Pattern(pattern));
            }
            ui.separator();

            let history = pad.history();
            if ui
                .add_enabled(history.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                emit(ToolbarEvent::Undo);
            }
            if ui
                .add_enabled(history.can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                emit(ToolbarEvent::Redo);
            }
            if ui.button("Clear").clicked() {
                emit(ToolbarEvent::Clear);
            }
            ui.separator();

            ui.add(
                egui::TextEdit::singleline(filename)
                    .hint_text(pad.default_filename())
                    .desired_width(120.0),
            );
            download = ui.button("Download").clicked();
        });
    });

    if download {
        actions.push(ToolbarAction::Download);
    }
    actions
}

/// One-line status bar along the bottom. Always shown, so the canvas above keeps its height
/// whether or not there is a message.
pub fn status_bar(ctx: &egui::Context, pad: &Sketchpad, status: Option<&str>) {
    egui::TopBottomPanel::bottom("status_bar")
        .exact_height(22.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (width, height) = pad.size();
                ui.weak(format!("{width}×{height}"));
                ui.separator();
                ui.weak(pad.tools().mode.name());
                if let Some(status) = status {
                    ui.separator();
                    ui.add(egui::Label::new(status).truncate());
                }
            });
        });
}
