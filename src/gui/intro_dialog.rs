use eframe::egui;

pub const INTRO_MESSAGE: &str = "Hello! This is my simple drawing application. Have fun!";

/// Welcome window shown over the canvas until the user closes it.
#[derive(Debug, Clone)]
pub struct IntroDialog {
    open: bool,
}

impl IntroDialog {
    pub fn new(open: bool) -> Self {
        Self { open }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        if self.open {
            tracing::debug!("intro dialog dismissed");
        }
        self.open = false;
    }

    pub fn ui(&mut self, ctx: &egui::Context) {
        if !self.open {
            return;
        }
        let mut close_clicked = false;
        egui::Window::new("Welcome")
            .collapsible(false)
            .resizable(false)
            .title_bar(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(INTRO_MESSAGE);
                    ui.add_space(16.0);
                    if ui.button("Close").clicked() {
                        close_clicked = true;
                    }
                });
            });
        if close_clicked {
            self.close();
        }
    }
}
