use crate::draw::model::{Color, Point, Stroke};
use crate::draw::surface::Surface;

#[derive(Debug, Clone, PartialEq)]
enum RecorderState {
    Idle,
    Recording(Stroke),
}

/// Buffers the points of the gesture currently in progress.
///
/// The pointer-down position becomes the stroke's anchor and is not counted
/// as a recorded point, so a press released without any movement yields no
/// stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeRecorder {
    state: RecorderState,
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self {
            state: RecorderState::Idle,
        }
    }
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording(_))
    }

    /// The stroke being buffered, if any.
    pub fn pending(&self) -> Option<&Stroke> {
        match &self.state {
            RecorderState::Recording(stroke) => Some(stroke),
            RecorderState::Idle => None,
        }
    }

    pub fn start<S: Surface + ?Sized>(&mut self, point: Point, color: Color, surface: &mut S) {
        if let RecorderState::Recording(stroke) = &self.state {
            tracing::debug!(points = stroke.len(), "discarding unfinished stroke");
        }
        surface.begin_path();
        surface.move_to(point);
        self.state = RecorderState::Recording(Stroke::new(point, color));
    }

    pub fn append<S: Surface + ?Sized>(&mut self, point: Point, surface: &mut S) {
        let RecorderState::Recording(stroke) = &mut self.state else {
            return;
        };
        stroke.points.push(point);
        surface.line_to(point);
        surface.stroke();
    }

    pub fn finish<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<Stroke> {
        let RecorderState::Recording(stroke) = std::mem::replace(&mut self.state, RecorderState::Idle)
        else {
            return None;
        };
        surface.close_path();
        (!stroke.is_empty()).then_some(stroke)
    }

    /// Drops the buffer without touching the surface.
    pub fn reset(&mut self) {
        self.state = RecorderState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::surface::{CommandLog, SurfaceCall};

    #[test]
    fn press_move_release_yields_buffered_points() {
        let mut log = CommandLog::new();
        let mut recorder = StrokeRecorder::new();

        recorder.start(Point::new(0.0, 0.0), Color::RED, &mut log);
        assert!(recorder.is_recording());
        recorder.append(Point::new(1.0, 0.0), &mut log);
        recorder.append(Point::new(2.0, 1.0), &mut log);
        let stroke = recorder.finish(&mut log).expect("stroke with points");

        assert!(!recorder.is_recording());
        assert_eq!(stroke.color, Color::RED);
        assert_eq!(stroke.anchor, Point::new(0.0, 0.0));
        assert_eq!(
            stroke.points,
            vec![Point::new(1.0, 0.0), Point::new(2.0, 1.0)]
        );
        assert_eq!(
            log.calls(),
            &[
                SurfaceCall::BeginPath,
                SurfaceCall::MoveTo(Point::new(0.0, 0.0)),
                SurfaceCall::LineTo(Point::new(1.0, 0.0)),
                SurfaceCall::Stroke,
                SurfaceCall::LineTo(Point::new(2.0, 1.0)),
                SurfaceCall::Stroke,
                SurfaceCall::ClosePath,
            ]
        );
    }

    #[test]
    fn click_without_movement_yields_nothing() {
        let mut log = CommandLog::new();
        let mut recorder = StrokeRecorder::new();

        recorder.start(Point::new(3.0, 3.0), Color::BLACK, &mut log);
        assert_eq!(recorder.finish(&mut log), None);
        assert_eq!(log.calls().last(), Some(&SurfaceCall::ClosePath));
    }

    #[test]
    fn idle_append_and_finish_are_noops() {
        let mut log = CommandLog::new();
        let mut recorder = StrokeRecorder::new();

        recorder.append(Point::new(1.0, 1.0), &mut log);
        assert_eq!(recorder.finish(&mut log), None);
        assert!(log.is_empty());
    }

    #[test]
    fn restart_discards_previous_buffer() {
        let mut log = CommandLog::new();
        let mut recorder = StrokeRecorder::new();

        recorder.start(Point::new(0.0, 0.0), Color::BLACK, &mut log);
        recorder.append(Point::new(5.0, 5.0), &mut log);
        recorder.start(Point::new(9.0, 9.0), Color::BLUE, &mut log);
        recorder.append(Point::new(10.0, 10.0), &mut log);

        let stroke = recorder.finish(&mut log).expect("second stroke");
        assert_eq!(stroke.color, Color::BLUE);
        assert_eq!(stroke.anchor, Point::new(9.0, 9.0));
        assert_eq!(stroke.points, vec![Point::new(10.0, 10.0)]);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut log = CommandLog::new();
        let mut recorder = StrokeRecorder::new();
        recorder.start(Point::new(0.0, 0.0), Color::BLACK, &mut log);
        recorder.append(Point::new(1.0, 1.0), &mut log);

        recorder.reset();
        assert!(!recorder.is_recording());
        assert_eq!(recorder.pending(), None);
    }
}
