#![forbid(unsafe_code)]

//! Drawing context handed to screens while they paint.
//!
//! The runtime never draws pixels itself. It only needs coordinate
//! translation (so it can undo whatever a screen left behind) and a text
//! primitive for the ticker strip.

/// Drawing context for one paint pass.
pub trait Graphics {
    /// Shift the origin by `(dx, dy)`; translations accumulate.
    fn translate(&mut self, dx: i32, dy: i32);

    /// Accumulated horizontal translation.
    fn translate_x(&self) -> i32;

    /// Accumulated vertical translation.
    fn translate_y(&self) -> i32;

    /// Draw `text` with its top-left corner at `(x, y)` in translated space.
    fn draw_text(&mut self, text: &str, x: i32, y: i32);
}

/// Undo any accumulated translation so the origin is back at `(0, 0)`.
pub fn reset_translation(g: &mut dyn Graphics) {
    let (x, y) = (g.translate_x(), g.translate_y());
    if x != 0 || y != 0 {
        g.translate(-x, -y);
    }
}
