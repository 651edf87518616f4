// Drawing engine: the per-event state machine over canvas, mask and cursor.
//
// Every event runs the same sequence:
// 1. erase the old cursor marker, except cells the mask holds
// 2. move the cursor
// 3. toggle a cell or stamp a pattern, depending on buttons and mode
// 4. draw the new cursor marker
//
// Step 1 is what keeps a moving cursor from eating stamped or toggled
// cells, and what keeps it from leaving a trail.

use crate::canvas::Canvas;
use crate::config::MarkerStyle;
use crate::cursor::CursorTracker;
use crate::drawn::DrawnMask;
use crate::input::{MouseEvent, PacketSource};
use crate::stamp::{self, GLYPH, GUN, Pattern};
use crate::types::{Color, Mode, Point};

/// Half-width of the box marker (5x5 box).
const BOX_RADIUS: i32 = 2;

/// What a button did on one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    None,
    /// Toggle mode turned the cell on.
    Lit,
    /// Toggle mode turned the cell off.
    Unlit,
    Stamped { pattern: &'static str, cells: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub cursor: Point,
    pub primary: Action,
    pub secondary: Action,
}

pub struct Engine<'a> {
    canvas: Canvas<'a>,
    mask: DrawnMask,
    cursor: CursorTracker,
    marker: MarkerStyle,
    /// Name and newly held cells of the most recent stamp.
    last_stamp: Option<(&'static str, Vec<(i32, i32)>)>,
}

impl<'a> Engine<'a> {
    pub fn new(canvas: Canvas<'a>, marker: MarkerStyle) -> Self {
        let (w, h) = (canvas.width(), canvas.height());
        Self {
            canvas,
            mask: DrawnMask::new(w, h),
            cursor: CursorTracker::new(w, h),
            marker,
            last_stamp: None,
        }
    }

    pub fn canvas(&self) -> &Canvas<'a> {
        &self.canvas
    }

    #[cfg(test)]
    pub fn mask(&self) -> &DrawnMask {
        &self.mask
    }

    pub fn cursor(&self) -> Point {
        self.cursor.position()
    }

    /// Wipe the plane and forget every held cell. The marker is redrawn.
    pub fn clear(&mut self) {
        let held = self.mask.count();
        self.canvas.clear(Color::BACKGROUND);
        self.mask.clear();
        self.last_stamp = None;
        self.draw_marker();
        log::info!("canvas cleared, {held} held cells dropped");
    }

    /// Poll `source` once and handle the packet if there was one.
    /// `mode` is only consulted when an event arrives.
    pub fn poll_once<S, M>(&mut self, source: &mut S, mode: M) -> Option<Outcome>
    where
        S: PacketSource + ?Sized,
        M: FnOnce() -> Mode,
    {
        let packet = source.poll_packet()?;
        Some(self.handle(MouseEvent::decode(&packet), mode()))
    }

    pub fn handle(&mut self, event: MouseEvent, mode: Mode) -> Outcome {
        self.erase_marker();

        let Point { x, y } = self.cursor.apply(event.dx, event.dy);
        let (x, y) = (x as i32, y as i32);

        let mut primary = Action::None;
        if event.buttons.primary {
            primary = match mode {
                Mode::Toggle => self.toggle(x, y),
                Mode::Stamp => self.stamp(&GLYPH, x, y),
            };
        }
        let mut secondary = Action::None;
        if event.buttons.secondary {
            secondary = self.stamp(&GUN, x, y);
        }

        self.draw_marker();

        let outcome = Outcome {
            cursor: self.cursor.position(),
            primary,
            secondary,
        };
        log::trace!("{event:?} in {mode:?} -> {outcome:?}");
        outcome
    }

    fn toggle(&mut self, x: i32, y: i32) -> Action {
        if !self.canvas.contains(x, y) {
            return Action::None;
        }
        if self.mask.is_set(x, y) {
            self.mask.mark(x, y, false);
            self.canvas.set(x, y, Color::BACKGROUND);
            Action::Unlit
        } else {
            self.mask.mark(x, y, true);
            self.canvas.set(x, y, Color::FOREGROUND);
            Action::Lit
        }
    }

    pub fn stamp(&mut self, pattern: &Pattern, x: i32, y: i32) -> Action {
        let out = stamp::stamp(&mut self.canvas, &mut self.mask, pattern, x, y);
        if out.written > 0 {
            self.last_stamp = Some((pattern.name, out.fresh));
        }
        Action::Stamped {
            pattern: pattern.name,
            cells: out.written,
        }
    }

    /// Take back the most recent stamp. Only cells it turned on come off;
    /// anything already held underneath stays. Returns the number cleared.
    pub fn undo_stamp(&mut self) -> usize {
        let Some((name, cells)) = self.last_stamp.take() else {
            return 0;
        };
        let cleared = stamp::unstamp(&mut self.canvas, &mut self.mask, &cells);
        self.draw_marker();
        log::info!("undid {name}: {cleared} cells");
        cleared
    }

    /// Write background to (x, y) unless the mask holds it. Returns whether
    /// a store happened.
    pub fn erase_if_unmarked(&mut self, x: i32, y: i32) -> bool {
        if self.mask.is_set(x, y) {
            return false;
        }
        self.canvas.set(x, y, Color::BACKGROUND)
    }

    fn marker_extent(&self) -> (i32, i32, i32, i32) {
        let Point { x, y } = self.cursor.position();
        let (x, y) = (x as i32, y as i32);
        match self.marker {
            MarkerStyle::Dot => (x, y, x + 1, y + 1),
            MarkerStyle::Box => (
                x - BOX_RADIUS,
                y - BOX_RADIUS,
                x + BOX_RADIUS + 1,
                y + BOX_RADIUS + 1,
            ),
        }
    }

    fn erase_marker(&mut self) {
        let (x1, y1, x2, y2) = self.marker_extent();
        for y in y1..y2 {
            for x in x1..x2 {
                self.erase_if_unmarked(x, y);
            }
        }
    }

    fn draw_marker(&mut self) {
        let (x1, y1, x2, y2) = self.marker_extent();
        self.canvas.fill_rect(x1, y1, x2, y2, Color::FOREGROUND);
    }
}
