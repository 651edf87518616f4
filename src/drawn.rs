// Which cells are held "on" by a toggle or a stamp.
// Same cell space as the canvas, indexed row-major by x + y * width.
// The cursor marker is transient and never recorded here.

pub struct DrawnMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl DrawnMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(x as usize + y as usize * self.width as usize)
    }

    /// Off-plane cells are never set.
    pub fn is_set(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    /// Off-plane cells are ignored.
    pub fn mark(&mut self, x: i32, y: i32, on: bool) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = on;
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&on| on).count()
    }
}
