// The pixel plane as the drawing code sees it.
// Cells live at `x + (y << row_shift)`; the stride is a power of two wider
// than the visible width, so the tail of every row is padding the display
// never shows. Nothing here ever writes padding or anything past the plane.

use crate::mapped::MappedView;
use crate::types::Color;

pub struct Canvas<'a> {
    view: MappedView<'a>,
    width: u32,
    height: u32,
    row_shift: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(view: MappedView<'a>, width: u32, height: u32, row_shift: u32) -> Self {
        debug_assert!(1u64 << row_shift >= width as u64, "row stride narrower than the plane");
        let needed = ((height as usize).saturating_sub(1) << row_shift) + width as usize;
        if view.len() < needed {
            log::warn!(
                "pixel region is {:#x} bytes, plane needs {:#x}; lower rows will be dropped",
                view.len(),
                needed
            );
        }
        Self {
            view,
            width,
            height,
            row_shift,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        Some(x as usize + ((y as usize) << self.row_shift))
    }

    /// Write one cell. Off-canvas coordinates are clipped, not errors.
    /// Returns whether a store happened.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) -> bool {
        match self.offset(x, y) {
            Some(ofs) => self.view.write(ofs, color.0),
            None => false,
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.offset(x, y).and_then(|ofs| self.view.read(ofs)).map(Color)
    }

    /// Fill the half-open rectangle [x1, x2) x [y1, y2) after clamping it to
    /// the plane. An empty or inverted range writes nothing.
    pub fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) -> usize {
        let x1 = x1.max(0);
        let y1 = y1.max(0);
        let x2 = x2.min(self.width as i32);
        let y2 = y2.min(self.height as i32);

        let mut written = 0;
        for y in y1..y2 {
            for x in x1..x2 {
                if self.set(x, y, color) {
                    written += 1;
                }
            }
        }
        written
    }

    /// Paint every visible cell.
    pub fn clear(&mut self, color: Color) {
        self.fill_rect(0, 0, self.width as i32, self.height as i32, color);
    }
}
