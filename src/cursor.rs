// Absolute cursor from relative motion.
// Positions are stored unsigned but every update is done in i32 and clamped
// before narrowing, so a large leftward move pins at 0 instead of wrapping.

use crate::types::Point;

#[derive(Debug, Clone)]
pub struct CursorTracker {
    pos: Point,
    max_x: u32,
    max_y: u32,
}

impl CursorTracker {
    /// Cursor at (0,0), free to move within [0, max_x] x [0, max_y].
    pub fn new(max_x: u32, max_y: u32) -> Self {
        Self {
            pos: Point::default(),
            max_x,
            max_y,
        }
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    /// Apply a device-convention delta: `dy > 0` moves up, so it is subtracted.
    pub fn apply(&mut self, dx: i32, dy: i32) -> Point {
        self.pos.x = clamp_axis(self.pos.x as i64 + dx as i64, self.max_x);
        self.pos.y = clamp_axis(self.pos.y as i64 - dy as i64, self.max_y);
        self.pos
    }
}

fn clamp_axis(value: i64, max: u32) -> u32 {
    value.clamp(0, max as i64) as u32
}
