use crate::draw::model::{Color, Stroke};
use crate::draw::surface::{replay_stroke, Surface};

/// Committed strokes and the strokes undone since the last commit.
///
/// Both stacks are plain `Vec`s mutated in place; a stroke is moved from one
/// to the other, never cloned. The top of each stack is its last element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawHistory {
    undo_stack: Vec<Stroke>,
    redo_stack: Vec<Stroke>,
}

impl DrawHistory {
    pub fn commit(&mut self, stroke: Stroke) {
        self.undo_stack.push(stroke);
        self.redo_stack.clear();
    }

    /// Removes the newest stroke and repaints what remains.
    ///
    /// A raster surface cannot subtract one stroke, so the surface is cleared
    /// and every remaining stroke replayed oldest first. `pen` is reselected
    /// afterwards. Returns `false` without touching the surface when there is
    /// nothing to undo.
    pub fn undo<S: Surface + ?Sized>(&mut self, surface: &mut S, pen: Color) -> bool {
        let Some(stroke) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(stroke);

        surface.clear();
        for stroke in &self.undo_stack {
            replay_stroke(surface, stroke);
        }
        surface.set_pen_color(pen);
        true
    }

    /// Restores the most recently undone stroke by painting only that stroke
    /// on top of the current surface.
    pub fn redo<S: Surface + ?Sized>(&mut self, surface: &mut S, pen: Color) -> bool {
        let Some(stroke) = self.redo_stack.pop() else {
            return false;
        };
        replay_stroke(surface, &stroke);
        surface.set_pen_color(pen);
        self.undo_stack.push(stroke);
        true
    }

    pub fn clear<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        surface.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Visible strokes, oldest first.
    pub fn strokes(&self) -> &[Stroke] {
        &self.undo_stack
    }

    /// Undone strokes, bottom first; the next redo takes the last one.
    pub fn redo_strokes(&self) -> &[Stroke] {
        &self.redo_stack
    }
}
