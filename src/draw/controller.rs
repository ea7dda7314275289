use crate::draw::history::DrawHistory;
use crate::draw::model::{Color, PenState, Point};
use crate::draw::recorder::StrokeRecorder;
use crate::draw::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasCommand {
    Undo,
    Redo,
    Clear,
    SelectColor(Color),
}

/// Everything the canvas remembers between events.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanvasState {
    pub recorder: StrokeRecorder,
    pub history: DrawHistory,
    pub pen: PenState,
}

impl CanvasState {
    pub fn new(pen: PenState) -> Self {
        Self {
            pen,
            ..Self::default()
        }
    }
}

/// Routes pointer and toolbar events to the recorder and the history.
///
/// Events are handled one at a time in the order they arrive.
#[derive(Debug)]
pub struct SketchController<S> {
    surface: S,
    state: CanvasState,
}

impl<S: Surface> SketchController<S> {
    pub fn new(mut surface: S, pen: PenState) -> Self {
        surface.set_pen_color(pen.color);
        Self {
            surface,
            state: CanvasState::new(pen),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn history(&self) -> &DrawHistory {
        &self.state.history
    }

    pub fn pen(&self) -> PenState {
        self.state.pen
    }

    pub fn is_recording(&self) -> bool {
        self.state.recorder.is_recording()
    }

    pub fn pointer_down(&mut self, point: Point) {
        let color = self.state.pen.color;
        self.state.recorder.start(point, color, &mut self.surface);
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.state.recorder.append(point, &mut self.surface);
    }

    pub fn pointer_up(&mut self) {
        let Some(stroke) = self.state.recorder.finish(&mut self.surface) else {
            return;
        };
        tracing::debug!(points = stroke.len(), color = %stroke.color, "stroke committed");
        self.state.history.commit(stroke);
    }

    /// Undo and redo are ignored while a gesture is in progress: the repaint
    /// would erase the live stroke and move the open path.
    pub fn apply(&mut self, command: CanvasCommand) {
        let pen = self.state.pen.color;
        if self.state.recorder.is_recording()
            && matches!(command, CanvasCommand::Undo | CanvasCommand::Redo)
        {
            tracing::debug!(?command, "history command ignored during stroke");
            return;
        }
        match command {
            CanvasCommand::Undo => {
                if self.state.history.undo(&mut self.surface, pen) {
                    tracing::debug!(remaining = self.state.history.undo_len(), "undo");
                }
            }
            CanvasCommand::Redo => {
                if self.state.history.redo(&mut self.surface, pen) {
                    tracing::debug!(visible = self.state.history.undo_len(), "redo");
                }
            }
            CanvasCommand::Clear => {
                self.state.recorder.reset();
                self.state.history.clear(&mut self.surface);
                tracing::debug!("canvas cleared");
            }
            CanvasCommand::SelectColor(color) => {
                self.state.pen.color = color;
                self.surface.set_pen_color(color);
                tracing::debug!(%color, "pen color selected");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::surface::{CommandLog, SurfaceCall};

    fn controller() -> SketchController<CommandLog> {
        SketchController::new(CommandLog::new(), PenState::default())
    }

    fn draw(controller: &mut SketchController<CommandLog>, points: &[(f32, f32)]) {
        let mut iter = points.iter().copied().map(Point::from);
        if let Some(first) = iter.next() {
            controller.pointer_down(first);
        }
        for point in iter {
            controller.pointer_move(point);
        }
        controller.pointer_up();
    }

    #[test]
    fn new_controller_selects_initial_pen() {
        let controller = controller();
        assert_eq!(
            controller.surface().calls(),
            &[SurfaceCall::SetPenColor(Color::BLACK)]
        );
    }

    #[test]
    fn gesture_commits_one_stroke() {
        let mut controller = controller();
        draw(&mut controller, &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(controller.history().undo_len(), 1);
        assert_eq!(controller.history().strokes()[0].points.len(), 2);
        assert!(!controller.is_recording());
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut controller = controller();
        controller.surface_mut().take();
        controller.pointer_move(Point::new(3.0, 3.0));
        controller.pointer_up();
        assert!(controller.surface().is_empty());
        assert_eq!(controller.history().undo_len(), 0);
    }

    #[test]
    fn selected_color_applies_to_next_stroke_only() {
        let mut controller = controller();
        draw(&mut controller, &[(0.0, 0.0), (1.0, 0.0)]);
        controller.apply(CanvasCommand::SelectColor(Color::BLUE));
        draw(&mut controller, &[(0.0, 5.0), (1.0, 5.0)]);

        let strokes = controller.history().strokes();
        assert_eq!(strokes[0].color, Color::BLACK);
        assert_eq!(strokes[1].color, Color::BLUE);
        assert_eq!(controller.pen().color, Color::BLUE);
    }

    #[test]
    fn clear_mid_gesture_drops_pending_stroke() {
        let mut controller = controller();
        controller.pointer_down(Point::new(0.0, 0.0));
        controller.pointer_move(Point::new(4.0, 4.0));
        controller.apply(CanvasCommand::Clear);
        controller.pointer_up();

        assert_eq!(controller.history().undo_len(), 0);
        assert_eq!(controller.history().redo_len(), 0);
        assert!(!controller.is_recording());
    }

    #[test]
    fn history_commands_wait_for_gesture_to_finish() {
        let mut controller = controller();
        draw(&mut controller, &[(5.0, 5.0), (20.0, 5.0)]);
        draw(&mut controller, &[(5.0, 30.0), (20.0, 30.0)]);
        controller.apply(CanvasCommand::Undo);
        controller.surface_mut().take();

        controller.pointer_down(Point::new(40.0, 60.0));
        controller.pointer_move(Point::new(50.0, 60.0));
        controller.apply(CanvasCommand::Undo);
        controller.apply(CanvasCommand::Redo);
        controller.pointer_move(Point::new(55.0, 60.0));

        assert!(!controller.surface().calls().contains(&SurfaceCall::Clear));
        assert_eq!(controller.history().undo_len(), 1);
        assert_eq!(controller.history().redo_len(), 1);

        controller.pointer_up();
        assert_eq!(controller.history().undo_len(), 2);
        assert_eq!(controller.history().redo_len(), 0);
    }
}
