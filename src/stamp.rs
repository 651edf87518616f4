// Fixed shapes stamped around the cursor.
// Each pattern is a table of offsets from its anchor, always drawn in the
// foreground colour. A stamp that fits is blitted straight; one that hangs
// over an edge goes through the clipped path, which tests only the axes that
// actually straddle and drops the offending offsets one by one.

use crate::canvas::Canvas;
use crate::drawn::DrawnMask;
use crate::types::Color;

/// Inclusive offset extents of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

#[derive(Debug)]
pub struct Pattern {
    pub name: &'static str,
    offsets: &'static [(i32, i32)],
    bounds: Bounds,
}

impl Pattern {
    pub const fn new(name: &'static str, offsets: &'static [(i32, i32)]) -> Self {
        Self {
            name,
            offsets,
            bounds: bounds_of(offsets),
        }
    }

    pub fn offsets(&self) -> &'static [(i32, i32)] {
        self.offsets
    }
}

const fn bounds_of(offsets: &[(i32, i32)]) -> Bounds {
    let mut b = Bounds {
        min_x: 0,
        min_y: 0,
        max_x: 0,
        max_y: 0,
    };
    let mut i = 0;
    while i < offsets.len() {
        let (dx, dy) = offsets[i];
        if i == 0 || dx < b.min_x {
            b.min_x = dx;
        }
        if i == 0 || dy < b.min_y {
            b.min_y = dy;
        }
        if i == 0 || dx > b.max_x {
            b.max_x = dx;
        }
        if i == 0 || dy > b.max_y {
            b.max_y = dy;
        }
        i += 1;
    }
    b
}

/// The small "pi" glyph: a bar over two legs, anchored top-left.
#[rustfmt::skip]
const GLYPH_OFFSETS: [(i32, i32); 7] = [
    (0, 0), (1, 0), (2, 0),
    (0, 1),         (2, 1),
    (0, 2),         (2, 2),
];

/// Gosper glider gun seed, anchored at the top-left of its bounding box.
#[rustfmt::skip]
const GUN_OFFSETS: [(i32, i32); 36] = [
    (24, 0),
    (22, 1), (24, 1),
    (12, 2), (13, 2), (20, 2), (21, 2), (34, 2), (35, 2),
    (11, 3), (15, 3), (20, 3), (21, 3), (34, 3), (35, 3),
    (0, 4), (1, 4), (10, 4), (16, 4), (20, 4), (21, 4),
    (0, 5), (1, 5), (10, 5), (14, 5), (16, 5), (17, 5), (22, 5), (24, 5),
    (10, 6), (16, 6), (24, 6),
    (11, 7), (15, 7),
    (12, 8), (13, 8),
];

pub static GLYPH: Pattern = Pattern::new("glyph", &GLYPH_OFFSETS);
pub static GUN: Pattern = Pattern::new("gun", &GUN_OFFSETS);

/// Where a stamp lands relative to the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Inside,
    /// Hangs over the left/right edge, top/bottom edge, or both (a corner).
    Clipped { x: bool, y: bool },
    Outside,
}

pub fn placement(pattern: &Pattern, ax: i32, ay: i32, width: u32, height: u32) -> Placement {
    let b = pattern.bounds;
    let (w, h) = (width as i64, height as i64);
    let (x0, x1) = (ax as i64 + b.min_x as i64, ax as i64 + b.max_x as i64);
    let (y0, y1) = (ay as i64 + b.min_y as i64, ay as i64 + b.max_y as i64);

    if x1 < 0 || y1 < 0 || x0 >= w || y0 >= h {
        return Placement::Outside;
    }
    let x = x0 < 0 || x1 >= w;
    let y = y0 < 0 || y1 >= h;
    if x || y {
        Placement::Clipped { x, y }
    } else {
        Placement::Inside
    }
}

/// What one stamp did to the plane.
#[derive(Debug, Default)]
pub struct Stamped {
    /// Cells written, including ones that were already held.
    pub written: usize,
    /// Cells this stamp turned from unheld to held, in table order.
    pub fresh: Vec<(i32, i32)>,
}

/// Draw `pattern` anchored at (ax, ay) and mark every drawn cell.
pub fn stamp(canvas: &mut Canvas, mask: &mut DrawnMask, pattern: &Pattern, ax: i32, ay: i32) -> Stamped {
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    let place = placement(pattern, ax, ay, canvas.width(), canvas.height());

    let mut out = Stamped::default();
    let mut plot = |x: i32, y: i32| {
        if !mask.is_set(x, y) {
            out.fresh.push((x, y));
        }
        canvas.set(x, y, Color::FOREGROUND);
        mask.mark(x, y, true);
        out.written += 1;
    };

    match place {
        Placement::Inside => {
            for &(dx, dy) in pattern.offsets() {
                plot(ax + dx, ay + dy);
            }
        }
        Placement::Clipped { x: clip_x, y: clip_y } => {
            for &(dx, dy) in pattern.offsets() {
                let x = ax.saturating_add(dx);
                let y = ay.saturating_add(dy);
                if clip_x && !(0..w).contains(&x) {
                    continue;
                }
                if clip_y && !(0..h).contains(&y) {
                    continue;
                }
                plot(x, y);
            }
        }
        Placement::Outside => {}
    }

    log::debug!(
        "stamped {} at ({ax},{ay}): {place:?}, {} cells, {} new",
        pattern.name,
        out.written,
        out.fresh.len()
    );
    out
}

/// Take back the cells a stamp added: each goes back to background and is
/// unmarked. Returns how many were still held.
pub fn unstamp(canvas: &mut Canvas, mask: &mut DrawnMask, cells: &[(i32, i32)]) -> usize {
    let mut cleared = 0;
    for &(x, y) in cells {
        if mask.is_set(x, y) {
            cleared += 1;
        }
        canvas.set(x, y, Color::BACKGROUND);
        mask.mark(x, y, false);
    }
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PIXEL_COLS, PIXEL_ROWS, ROW_SHIFT};
    use crate::mapped::MappedView;
    use std::collections::HashSet;

    const SPAN: usize = (PIXEL_ROWS as usize) << ROW_SHIFT;
    const W: i32 = PIXEL_COLS as i32;
    const H: i32 = PIXEL_ROWS as i32;

    fn lit_cells(canvas: &Canvas) -> usize {
        let mut n = 0;
        for y in 0..H {
            for x in 0..W {
                if canvas.get(x, y) == Some(Color::FOREGROUND) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_pattern_tables() {
        assert_eq!(GLYPH.offsets().len(), 7);
        assert_eq!(GUN.offsets().len(), 36);
        assert_eq!(GLYPH.bounds, Bounds { min_x: 0, min_y: 0, max_x: 2, max_y: 2 });
        assert_eq!(GUN.bounds, Bounds { min_x: 0, min_y: 0, max_x: 35, max_y: 8 });

        for p in [&GLYPH, &GUN] {
            let unique: HashSet<_> = p.offsets().iter().collect();
            assert_eq!(unique.len(), p.offsets().len(), "{} has duplicate offsets", p.name);
        }
        assert!(GLYPH.offsets().contains(&(0, 0)));
    }

    #[test]
    fn test_placement_cases() {
        assert_eq!(placement(&GLYPH, 10, 10, 640, 480), Placement::Inside);
        assert_eq!(placement(&GLYPH, 637, 477, 640, 480), Placement::Inside);
        assert_eq!(placement(&GLYPH, 639, 10, 640, 480), Placement::Clipped { x: true, y: false });
        assert_eq!(placement(&GLYPH, 10, 479, 640, 480), Placement::Clipped { x: false, y: true });
        assert_eq!(placement(&GLYPH, 639, 479, 640, 480), Placement::Clipped { x: true, y: true });
        assert_eq!(placement(&GLYPH, -1, 10, 640, 480), Placement::Clipped { x: true, y: false });
        assert_eq!(placement(&GLYPH, 640, 480, 640, 480), Placement::Outside);
        assert_eq!(placement(&GLYPH, -3, 0, 640, 480), Placement::Outside);
    }

    #[test]
    fn test_stamp_inside_draws_and_marks_everything() {
        let mut bytes = vec![0u8; SPAN];
        let mut canvas = Canvas::new(MappedView::from_slice(&mut bytes), PIXEL_COLS, PIXEL_ROWS, ROW_SHIFT);
        let mut mask = DrawnMask::new(PIXEL_COLS, PIXEL_ROWS);

        assert_eq!(stamp(&mut canvas, &mut mask, &GUN, 100, 100).written, 36);
        for &(dx, dy) in GUN.offsets() {
            assert_eq!(canvas.get(100 + dx, 100 + dy), Some(Color::FOREGROUND));
            assert!(mask.is_set(100 + dx, 100 + dy));
        }
        assert_eq!(lit_cells(&canvas), 36);
        assert_eq!(mask.count(), 36);
    }

    #[test]
    fn test_glyph_near_right_edge_writes_fewer() {
        let mut bytes = vec![0u8; SPAN];
        let mut canvas = Canvas::new(MappedView::from_slice(&mut bytes), PIXEL_COLS, PIXEL_ROWS, ROW_SHIFT);
        let mut mask = DrawnMask::new(PIXEL_COLS, PIXEL_ROWS);

        let centre = stamp(&mut canvas, &mut mask, &GLYPH, W / 2, H / 2).written;
        canvas.clear(Color::BACKGROUND);
        mask.clear();

        // One cell in from the right edge the dx = 2 leg falls off: 3 + 1 cells remain.
        let edge = stamp(&mut canvas, &mut mask, &GLYPH, W - 2, H / 2).written;
        assert_eq!(centre, 7);
        assert_eq!(edge, 4);
        assert!(edge < centre);
        // Every write landed on the plane and matches the mask.
        assert_eq!(lit_cells(&canvas), edge);
        assert_eq!(mask.count(), edge);
        // The anchor is drawn on the clipped path too.
        assert_eq!(canvas.get(W - 2, H / 2), Some(Color::FOREGROUND));
    }

    #[test]
    fn test_gun_clipped_at_corner() {
        let mut bytes = vec![0u8; SPAN];
        let mut canvas = Canvas::new(MappedView::from_slice(&mut bytes), PIXEL_COLS, PIXEL_ROWS, ROW_SHIFT);
        let mut mask = DrawnMask::new(PIXEL_COLS, PIXEL_ROWS);

        let (ax, ay) = (W - 20, H - 5);
        let expected = GUN
            .offsets()
            .iter()
            .filter(|&&(dx, dy)| ax + dx < W && ay + dy < H)
            .count();
        assert_eq!(placement(&GUN, ax, ay, PIXEL_COLS, PIXEL_ROWS), Placement::Clipped { x: true, y: true });
        assert_eq!(stamp(&mut canvas, &mut mask, &GUN, ax, ay).written, expected);
        assert_eq!(lit_cells(&canvas), expected);
        assert_eq!(mask.count(), expected);
    }

    #[test]
    fn test_stamp_outside_writes_nothing() {
        let mut bytes = vec![0u8; SPAN];
        let mut canvas = Canvas::new(MappedView::from_slice(&mut bytes), PIXEL_COLS, PIXEL_ROWS, ROW_SHIFT);
        let mut mask = DrawnMask::new(PIXEL_COLS, PIXEL_ROWS);
        assert_eq!(stamp(&mut canvas, &mut mask, &GUN, W, H).written, 0);
        assert_eq!(stamp(&mut canvas, &mut mask, &GLYPH, i32::MAX, 0).written, 0);
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn test_glyph_clipped_at_top_left() {
        let mut bytes = vec![0u8; SPAN];
        let mut canvas = Canvas::new(MappedView::from_slice(&mut bytes), PIXEL_COLS, PIXEL_ROWS, ROW_SHIFT);
        let mut mask = DrawnMask::new(PIXEL_COLS, PIXEL_ROWS);

        // One cell up and left of the origin: the bar and the left leg fall
        // off, only the right leg lands at x = 1.
        assert_eq!(placement(&GLYPH, -1, -1, PIXEL_COLS, PIXEL_ROWS), Placement::Clipped { x: true, y: true });
        let out = stamp(&mut canvas, &mut mask, &GLYPH, -1, -1);
        assert_eq!(out.written, 2);
        assert_eq!(out.fresh, vec![(1, 0), (1, 1)]);
        for (x, y) in [(1, 0), (1, 1)] {
            assert_eq!(canvas.get(x, y), Some(Color::FOREGROUND), "({x},{y}) not lit");
            assert!(mask.is_set(x, y));
        }
        assert_eq!(lit_cells(&canvas), 2);
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_unstamp_restores_background() {
        let mut bytes = vec![0u8; SPAN];
        let mut canvas = Canvas::new(MappedView::from_slice(&mut bytes), PIXEL_COLS, PIXEL_ROWS, ROW_SHIFT);
        let mut mask = DrawnMask::new(PIXEL_COLS, PIXEL_ROWS);

        let gun = stamp(&mut canvas, &mut mask, &GUN, 300, 200);
        let glyph = stamp(&mut canvas, &mut mask, &GLYPH, 10, 10);
        assert_eq!(unstamp(&mut canvas, &mut mask, &gun.fresh), 36);
        assert_eq!(unstamp(&mut canvas, &mut mask, &glyph.fresh), 7);

        for &(dx, dy) in GUN.offsets() {
            assert_eq!(canvas.get(300 + dx, 200 + dy), Some(Color::BACKGROUND));
        }
        assert_eq!(lit_cells(&canvas), 0);
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn test_overlapping_stamp_only_owns_new_cells() {
        let mut bytes = vec![0u8; SPAN];
        let mut canvas = Canvas::new(MappedView::from_slice(&mut bytes), PIXEL_COLS, PIXEL_ROWS, ROW_SHIFT);
        let mut mask = DrawnMask::new(PIXEL_COLS, PIXEL_ROWS);

        stamp(&mut canvas, &mut mask, &GLYPH, 100, 100);
        // The gun's left block covers (100,100), (101,100) and (100,101).
        let gun = stamp(&mut canvas, &mut mask, &GUN, 100, 96);
        assert_eq!(gun.written, 36);
        assert_eq!(gun.fresh.len(), 33);

        assert_eq!(unstamp(&mut canvas, &mut mask, &gun.fresh), 33);
        for &(dx, dy) in GLYPH.offsets() {
            assert!(mask.is_set(100 + dx, 100 + dy));
            assert_eq!(canvas.get(100 + dx, 100 + dy), Some(Color::FOREGROUND));
        }
        assert_eq!(mask.count(), 7);
        assert_eq!(lit_cells(&canvas), 7);
    }
}
