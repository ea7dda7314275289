use crate::draw::model::{Color, Point, Stroke};

/// Write-only 2D drawing target.
///
/// Mirrors the path API of a raster canvas: a subpath is opened with
/// [`Surface::begin_path`], positioned with [`Surface::move_to`], extended
/// with [`Surface::line_to`] and made visible with [`Surface::stroke`].
/// None of the calls can fail.
pub trait Surface {
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point);
    fn line_to(&mut self, point: Point);
    fn stroke(&mut self);
    fn close_path(&mut self);
    /// Erases every pixel. Path state and pen color are left alone.
    fn clear(&mut self);
    fn set_pen_color(&mut self, color: Color);
}

/// Paints a committed stroke in its own color, issuing the same path calls
/// the live gesture did.
///
/// The anchor opens the subpath and every recorded point is joined to it and
/// stroked. The surface is left with the stroke's color selected.
pub fn replay_stroke<S: Surface + ?Sized>(surface: &mut S, stroke: &Stroke) {
    if stroke.is_empty() {
        return;
    }
    surface.set_pen_color(stroke.color);
    surface.begin_path();
    surface.move_to(stroke.anchor);
    for point in &stroke.points {
        surface.line_to(*point);
        surface.stroke();
    }
    surface.close_path();
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceCall {
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    Stroke,
    ClosePath,
    Clear,
    SetPenColor(Color),
}

/// Surface that only records what was asked of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandLog {
    calls: Vec<SurfaceCall>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn take(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Calls issued after the most recent [`SurfaceCall::Clear`], i.e. what
    /// is currently visible.
    pub fn since_last_clear(&self) -> &[SurfaceCall] {
        match self
            .calls
            .iter()
            .rposition(|call| matches!(call, SurfaceCall::Clear))
        {
            Some(idx) => &self.calls[idx + 1..],
            None => &self.calls,
        }
    }
}

impl Surface for CommandLog {
    fn begin_path(&mut self) {
        self.calls.push(SurfaceCall::BeginPath);
    }

    fn move_to(&mut self, point: Point) {
        self.calls.push(SurfaceCall::MoveTo(point));
    }

    fn line_to(&mut self, point: Point) {
        self.calls.push(SurfaceCall::LineTo(point));
    }

    fn stroke(&mut self) {
        self.calls.push(SurfaceCall::Stroke);
    }

    fn close_path(&mut self) {
        self.calls.push(SurfaceCall::ClosePath);
    }

    fn clear(&mut self) {
        self.calls.push(SurfaceCall::Clear);
    }

    fn set_pen_color(&mut self, color: Color) {
        self.calls.push(SurfaceCall::SetPenColor(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(color: Color, anchor: (f32, f32), points: &[(f32, f32)]) -> Stroke {
        Stroke {
            color,
            anchor: anchor.into(),
            points: points.iter().copied().map(Point::from).collect(),
        }
    }

    #[test]
    fn replay_opens_path_at_anchor() {
        let mut log = CommandLog::new();
        replay_stroke(&mut log, &stroke(Color::RED, (1.0, 1.0), &[(2.0, 2.0), (3.0, 1.0)]));

        assert_eq!(
            log.calls(),
            &[
                SurfaceCall::SetPenColor(Color::RED),
                SurfaceCall::BeginPath,
                SurfaceCall::MoveTo(Point::new(1.0, 1.0)),
                SurfaceCall::LineTo(Point::new(2.0, 2.0)),
                SurfaceCall::Stroke,
                SurfaceCall::LineTo(Point::new(3.0, 1.0)),
                SurfaceCall::Stroke,
                SurfaceCall::ClosePath,
            ]
        );
    }

    #[test]
    fn replay_of_empty_stroke_is_silent() {
        let mut log = CommandLog::new();
        replay_stroke(&mut log, &Stroke::new(Point::new(4.0, 4.0), Color::BLACK));
        assert!(log.is_empty());
    }

    #[test]
    fn since_last_clear_skips_erased_calls() {
        let mut log = CommandLog::new();
        log.begin_path();
        log.clear();
        log.stroke();
        assert_eq!(log.since_last_clear(), &[SurfaceCall::Stroke]);
    }
}
