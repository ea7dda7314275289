use crate::draw::controller::CanvasCommand;
use eframe::egui;

/// Keyboard shortcuts understood by the canvas.
///
/// Ctrl+Z undoes, Ctrl+Y and Ctrl+Shift+Z redo, Delete clears. `command`
/// stands for Ctrl on Windows/Linux and Cmd on macOS.
pub fn command_for_key(key: egui::Key, modifiers: egui::Modifiers) -> Option<CanvasCommand> {
    match key {
        egui::Key::Z if modifiers.command && modifiers.shift => Some(CanvasCommand::Redo),
        egui::Key::Z if modifiers.command => Some(CanvasCommand::Undo),
        egui::Key::Y if modifiers.command => Some(CanvasCommand::Redo),
        egui::Key::Delete if !modifiers.any() => Some(CanvasCommand::Clear),
        _ => None,
    }
}

/// Commands for every key press in this frame's input, in arrival order.
pub fn commands_from_input(input: &egui::InputState) -> Vec<CanvasCommand> {
    input
        .events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => command_for_key(*key, *modifiers),
            _ => None,
        })
        .collect()
}
