use anyhow::anyhow;
use eframe::egui;
use sketchpad::gui::SketchApp;
use sketchpad::settings::Settings;
use std::path::PathBuf;

const DEFAULT_SETTINGS_PATH: &str = "settings.json";

fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let settings = Settings::load(&settings_path)?;
    sketchpad::logging::init(
        settings.debug_logging,
        settings.log_file.as_ref().map(PathBuf::from),
    );
    tracing::info!(path = %settings_path, "settings loaded");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        "Sketchpad",
        native_options,
        Box::new(move |cc| Box::new(SketchApp::new(&cc.egui_ctx, settings))),
    )
    .map_err(|err| anyhow!("window event loop failed: {err}"))
}
