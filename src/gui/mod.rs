pub mod intro_dialog;
pub mod toolbar;

use crate::draw::controller::{CanvasCommand, SketchController};
use crate::draw::input::commands_from_input;
use crate::draw::model::Point;
use crate::draw::render::{DirtyRect, RasterSurface};
use crate::settings::Settings;
use eframe::egui;
use intro_dialog::IntroDialog;
use toolbar::{toolbar_ui, ToolbarView};

const CANVAS_TEXTURE_NAME: &str = "sketchpad_canvas";

/// Converts a screen position to canvas-local logical units.
pub fn to_canvas_point(canvas_origin: egui::Pos2, pos: egui::Pos2) -> Point {
    let local = pos - canvas_origin;
    Point::new(local.x, local.y)
}

/// Copies the pixels of `rect` out of a tightly packed RGBA buffer `width` pixels wide.
pub fn crop_rgba(pixels: &[u8], width: u32, rect: DirtyRect) -> Vec<u8> {
    let row_len = rect.width() * 4;
    let mut out = Vec::with_capacity(row_len * rect.height());
    for y in rect.min_y..rect.max_y {
        let start = (y as usize * width as usize + rect.min_x as usize) * 4;
        out.extend_from_slice(&pixels[start..start + row_len]);
    }
    out
}

pub struct SketchApp {
    settings: Settings,
    controller: Option<SketchController<RasterSurface>>,
    texture: Option<egui::TextureHandle>,
    uploaded_revision: u64,
    intro: IntroDialog,
}

impl SketchApp {
    pub fn new(ctx: &egui::Context, settings: Settings) -> Self {
        ctx.set_visuals(egui::Visuals::light());
        Self {
            intro: IntroDialog::new(settings.show_intro),
            settings,
            controller: None,
            texture: None,
            uploaded_revision: 0,
        }
    }

    pub fn controller(&self) -> Option<&SketchController<RasterSurface>> {
        self.controller.as_ref()
    }

    pub fn intro_open(&self) -> bool {
        self.intro.is_open()
    }

    pub fn apply(&mut self, command: CanvasCommand) {
        if let Some(controller) = self.controller.as_mut() {
            controller.apply(command);
        }
    }

    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let settings = &self.settings;
        let controller = self.controller.get_or_insert_with(|| {
            let available = ui.available_size();
            let logical = (available.x.max(1.0) as u32, available.y.max(1.0) as u32);
            tracing::info!(
                width = logical.0,
                height = logical.1,
                scale = settings.backing_scale,
                "canvas created"
            );
            SketchController::new(
                RasterSurface::new(logical, settings.backing_scale, settings.pen_width),
                settings.pen(),
            )
        });

        let logical = controller.surface().logical_size();
        let (rect, _response) = ui.allocate_exact_size(
            egui::vec2(logical.0 as f32, logical.1 as f32),
            egui::Sense::drag(),
        );

        if !self.intro.is_open() {
            handle_pointer(ui, rect, controller);
        }

        let texture = upload_canvas(
            ui.ctx(),
            &mut self.texture,
            &mut self.uploaded_revision,
            controller.surface_mut(),
        );
        ui.painter().image(
            texture.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }
}

fn handle_pointer(
    ui: &egui::Ui,
    rect: egui::Rect,
    controller: &mut SketchController<RasterSurface>,
) {
    let (pressed, released, moving, pos) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.is_moving(),
            i.pointer.interact_pos(),
        )
    });

    if pressed {
        if let Some(pos) = pos.filter(|pos| rect.contains(*pos)) {
            controller.pointer_down(to_canvas_point(rect.min, pos));
        }
    } else if moving && controller.is_recording() {
        if let Some(pos) = pos {
            controller.pointer_move(to_canvas_point(rect.min, pos));
        }
    }

    if released {
        controller.pointer_up();
    }
}

fn upload_canvas<'a>(
    ctx: &egui::Context,
    texture: &'a mut Option<egui::TextureHandle>,
    uploaded_revision: &mut u64,
    surface: &mut RasterSurface,
) -> &'a egui::TextureHandle {
    let (width, height) = surface.size();
    let options = egui::TextureOptions::LINEAR;
    let mut created = false;

    let handle = texture.get_or_insert_with(|| {
        created = true;
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            surface.rgba_pixels(),
        );
        ctx.load_texture(CANVAS_TEXTURE_NAME, image, options)
    });

    if created {
        surface.take_dirty();
    } else if surface.revision() != *uploaded_revision {
        if let Some(dirty) = surface.take_dirty() {
            let patch = egui::ColorImage::from_rgba_unmultiplied(
                [dirty.width(), dirty.height()],
                &crop_rgba(surface.rgba_pixels(), width, dirty),
            );
            handle.set_partial([dirty.min_x as usize, dirty.min_y as usize], patch, options);
        }
    }
    *uploaded_revision = surface.revision();
    handle
}

impl eframe::App for SketchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

impl SketchApp {
    /// One frame: toolbar, pending commands, then the canvas, so the texture
    /// uploaded this frame already reflects the commands.
    pub fn show(&mut self, ctx: &egui::Context) {
        let intro_open = self.intro.is_open();
        let mut commands = if intro_open {
            Vec::new()
        } else {
            ctx.input(commands_from_input)
        };

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let (can_undo, can_redo, active_color) = match &self.controller {
                Some(controller) => (
                    controller.history().can_undo(),
                    controller.history().can_redo(),
                    controller.pen().color,
                ),
                None => (false, false, self.settings.default_color),
            };
            ui.add_enabled_ui(!intro_open, |ui| {
                commands.extend(toolbar_ui(
                    ui,
                    &ToolbarView {
                        can_undo,
                        can_redo,
                        palette: &self.settings.palette,
                        active_color,
                    },
                ));
            });
        });

        for command in commands {
            self.apply(command);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::WHITE))
            .show(ctx, |ui| self.canvas_ui(ui));

        self.intro.ui(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_point_is_relative_to_origin() {
        let point = to_canvas_point(egui::pos2(10.0, 40.0), egui::pos2(15.5, 42.0));
        assert_eq!(point, Point::new(5.5, 2.0));
    }

    #[test]
    fn crop_extracts_sub_rectangle() {
        // 3x2 image, each pixel tagged with its index in the red channel.
        let pixels: Vec<u8> = (0..6u8).flat_map(|i| [i, 0, 0, 255]).collect();
        let rect = DirtyRect {
            min_x: 1,
            min_y: 0,
            max_x: 3,
            max_y: 2,
        };
        let cropped = crop_rgba(&pixels, 3, rect);
        let reds: Vec<u8> = cropped.chunks_exact(4).map(|px| px[0]).collect();
        assert_eq!(reds, vec![1, 2, 4, 5]);
    }

    #[test]
    fn app_starts_with_intro_and_no_canvas() {
        let ctx = egui::Context::default();
        let app = SketchApp::new(&ctx, Settings::default());
        assert!(app.intro_open());
        assert!(app.controller().is_none());
    }

    #[test]
    fn intro_can_be_disabled_in_settings() {
        let ctx = egui::Context::default();
        let settings = Settings {
            show_intro: false,
            ..Settings::default()
        };
        let app = SketchApp::new(&ctx, settings);
        assert!(!app.intro_open());
    }

    fn frame_input(events: Vec<egui::Event>) -> egui::RawInput {
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(160.0, 120.0),
            )),
            events,
            ..Default::default()
        }
    }

    #[test]
    fn keyboard_undo_is_uploaded_in_the_same_frame() {
        let ctx = egui::Context::default();
        let mut app = SketchApp::new(
            &ctx,
            Settings {
                show_intro: false,
                ..Settings::default()
            },
        );
        let _ = ctx.run(frame_input(Vec::new()), |ctx| app.show(ctx));

        let controller = app.controller.as_mut().expect("canvas created on first frame");
        controller.pointer_down(Point::new(10.0, 10.0));
        controller.pointer_move(Point::new(30.0, 10.0));
        controller.pointer_up();
        let _ = ctx.run(frame_input(Vec::new()), |ctx| app.show(ctx));
        let drawn_revision = app.uploaded_revision;

        let ctrl_z = egui::Event::Key {
            key: egui::Key::Z,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers {
                ctrl: true,
                command: true,
                ..Default::default()
            },
        };
        let _ = ctx.run(frame_input(vec![ctrl_z]), |ctx| app.show(ctx));

        let surface = app.controller().expect("canvas").surface();
        assert!(surface.is_blank());
        assert_ne!(app.uploaded_revision, drawn_revision);
        assert_eq!(app.uploaded_revision, surface.revision());
    }
}
