use crate::draw::controller::CanvasCommand;
use crate::draw::model::Color;
use crate::settings::PaletteEntry;
use eframe::egui;

pub struct ToolbarView<'a> {
    pub can_undo: bool,
    pub can_redo: bool,
    pub palette: &'a [PaletteEntry],
    pub active_color: Color,
}

pub fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Black or white, whichever reads better on `background`.
pub fn label_color_for(background: Color) -> Color {
    let luma = 0.299 * background.r as f32 + 0.587 * background.g as f32 + 0.114 * background.b as f32;
    if luma > 140.0 {
        Color::BLACK
    } else {
        Color::rgb(255, 255, 255)
    }
}

/// Draws the history buttons and the palette, returning what was clicked.
pub fn toolbar_ui(ui: &mut egui::Ui, view: &ToolbarView<'_>) -> Vec<CanvasCommand> {
    let mut commands = Vec::new();
    ui.horizontal(|ui| {
        let text = |label: &str| egui::RichText::new(label).size(20.0);
        if ui
            .add_enabled(view.can_undo, egui::Button::new(text("Undo")))
            .on_hover_text("Ctrl+Z")
            .clicked()
        {
            commands.push(CanvasCommand::Undo);
        }
        if ui
            .add_enabled(view.can_redo, egui::Button::new(text("Redo")))
            .on_hover_text("Ctrl+Y")
            .clicked()
        {
            commands.push(CanvasCommand::Redo);
        }
        if ui.button(text("Clear")).clicked() {
            commands.push(CanvasCommand::Clear);
        }

        ui.separator();

        for entry in view.palette {
            let active = entry.color == view.active_color;
            let label = egui::RichText::new(&entry.label)
                .size(20.0)
                .color(to_color32(label_color_for(entry.color)));
            let mut button = egui::Button::new(label).fill(to_color32(entry.color));
            if active {
                button = button.stroke(egui::Stroke::new(3.0, egui::Color32::GOLD));
            }
            if ui.add(button).on_hover_text(entry.color.to_hex()).clicked() && !active {
                commands.push(CanvasCommand::SelectColor(entry.color));
            }
        }
    });
    commands
}
