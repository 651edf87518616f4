// Desktop stand-in for the DE1-SoC.
// The window plays the VGA controller: every frame it reads the same plane
// the engine writes and shows it. Pointer motion inside the window is turned
// into the same 3-byte packets the mouse multiplexer produces, and the S key
// stands in for the slide switches.
//
// Keys: S toggles stamp mode, U undoes the last stamp, C clears,
// P writes a snapshot, Esc quits.

use std::collections::VecDeque;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Scale, Window, WindowOptions};

use crate::canvas::Canvas;
use crate::config::{Config, FPGA_ONCHIP_SPAN, PIXEL_COLS, PIXEL_ROWS, ROW_SHIFT};
use crate::engine::Engine;
use crate::error::Error;
use crate::input::{Buttons, MouseEvent, Packet, PacketSource};
use crate::mapped::MappedView;
use crate::snapshot;
use crate::types::{Color, Mode, Point};

const HUD_COLOR: u32 = 0x00_FF_CC_33;

pub struct Drawer {
    window: Window,
}

impl Drawer {
    pub fn new(title: &str, width: usize, height: usize, scale: u8) -> Result<Self, Error> {
        let scale = match scale {
            1 => Scale::X1,
            4 => Scale::X4,
            _ => Scale::X2,
        };
        let options = WindowOptions {
            scale,
            ..WindowOptions::default()
        };
        let mut window =
            Window::new(title, width, height, options).map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        window.set_cursor_visibility(false);
        Ok(Self { window })
    }

    pub fn present(&mut self, pixels: &[u32], width: usize, height: usize) -> Result<(), Error> {
        self.window
            .update_with_buffer(pixels, width, height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    pub fn pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// Pointer position in plane coordinates, clamped to the window.
    pub fn mouse_pos(&self) -> Option<(i32, i32)> {
        self.window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x.round() as i32, y.round() as i32))
    }

    pub fn buttons(&self) -> Buttons {
        Buttons {
            primary: self.window.get_mouse_down(MouseButton::Left),
            secondary: self.window.get_mouse_down(MouseButton::Right),
            tertiary: self.window.get_mouse_down(MouseButton::Middle),
        }
    }
}

/// Turns absolute window positions into relative-motion packets.
/// Like the real device it only reports when something changed, and splits
/// long moves into several packets so no delta overflows a signed byte.
#[derive(Debug, Default)]
pub struct WindowPointer {
    last: Option<(i32, i32)>,
    last_buttons: Buttons,
    pending: VecDeque<Packet>,
}

impl WindowPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, pos: Option<(i32, i32)>, buttons: Buttons) {
        let Some((x, y)) = pos else {
            return;
        };
        let (dx, dy) = match self.last {
            Some((lx, ly)) => (x - lx, y - ly),
            None => (0, 0),
        };
        self.last = Some((x, y));
        if dx == 0 && dy == 0 && buttons == self.last_buttons {
            return;
        }
        self.last_buttons = buttons;

        // Window y grows downward; the device reports up as positive.
        let (mut dx, mut dy) = (dx, -dy);
        loop {
            let step_x = dx.clamp(-127, 127);
            let step_y = dy.clamp(-127, 127);
            self.pending.push_back(MouseEvent::encode(step_x, step_y, buttons));
            dx -= step_x;
            dy -= step_y;
            if dx == 0 && dy == 0 {
                break;
            }
        }
    }
}

impl PacketSource for WindowPointer {
    fn poll_packet(&mut self) -> Option<Packet> {
        self.pending.pop_front()
    }
}

pub fn run(config: &Config) -> Result<(), Error> {
    /* --- Window ---
       Plane-sized, scaled up, OS cursor hidden so only the marker shows. */
    let (w, h) = (PIXEL_COLS as usize, PIXEL_ROWS as usize);
    let mut drawer = Drawer::new("vga-life (simulator)", w, h, config.scale)?;
    log::info!("simulator window open: {w}x{h} at scale {}", config.scale);

    /* --- Plane + engine ---
       Same span as the on-chip buffer so the canvas sees the real layout. */
    let mut plane = vec![0u8; FPGA_ONCHIP_SPAN];
    let canvas = Canvas::new(MappedView::from_slice(&mut plane), PIXEL_COLS, PIXEL_ROWS, ROW_SHIFT);
    let mut engine = Engine::new(canvas, config.marker);
    if config.clear {
        engine.clear();
    }

    /* --- Stand-ins for the board ---
       `pointer` plays the mouse, `switches` the slide switch register,
       `screen` is the image the VGA controller would scan out. */
    let mut pointer = WindowPointer::new();
    let mut switches: u8 = 0;
    let mut screen = vec![0u32; w * h];

    while drawer.is_open() && !drawer.esc_pressed() {
        /* --- Keys ---
           S flips between toggle (0) and stamp (2). */
        if drawer.pressed_once(Key::S) {
            switches = if switches == Mode::STAMP_REGISTER_VALUE { 0 } else { Mode::STAMP_REGISTER_VALUE };
            log::info!("switches = {switches} ({:?})", Mode::from_register(switches));
        }
        if drawer.pressed_once(Key::U) {
            engine.undo_stamp();
        }
        if drawer.pressed_once(Key::C) {
            engine.clear();
        }
        if drawer.pressed_once(Key::P) {
            if let Err(e) = snapshot::save(engine.canvas(), &config.snapshot) {
                log::error!("{e}");
            }
        }

        /* --- Pointer ---
           One sample per frame may queue several packets; drain them all. */
        pointer.sample(drawer.mouse_pos(), drawer.buttons());
        while engine
            .poll_once(&mut pointer, || Mode::from_register(switches))
            .is_some()
        {}

        /* --- Present ---
           Plane first, then the status line on top of the window image. */
        scan_out(engine.canvas(), &mut screen);
        let hud = format!(
            "{}  X:{} Y:{}",
            match Mode::from_register(switches) {
                Mode::Toggle => "TOGGLE",
                Mode::Stamp => "STAMP",
            },
            engine.cursor().x,
            engine.cursor().y
        );
        draw_text_5x7(&mut screen, w, h, 4, h as i32 - 11, &hud, HUD_COLOR);
        drawer.present(&screen, w, h)?;
    }

    log::info!("simulator closed at cursor {:?}", engine.cursor());
    Ok(())
}

/// What the VGA controller does on the board: read every visible cell.
fn scan_out(canvas: &Canvas, screen: &mut [u32]) {
    let w = canvas.width() as usize;
    for (i, px) in screen.iter_mut().enumerate() {
        let p = Point::new((i % w) as u32, (i / w) as u32);
        *px = canvas
            .get(p.x as i32, p.y as i32)
            .unwrap_or(Color::BACKGROUND)
            .to_rgb888();
    }
}

/* ---------- 5x7 HUD font, drawn over the window image only ---------- */

/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),

        ' ' => g!(0,0,0,0,0,0,0),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),

        _ => None,
    }
}

fn draw_text_5x7(screen: &mut [u32], w: usize, h: usize, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        if let Some(rows) = glyph5x7(ch) {
            for (ry, bits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if bits & (1 << (4 - rx)) == 0 {
                        continue;
                    }
                    let (px, py) = (x + rx, y + ry as i32);
                    if px < 0 || py < 0 || px as usize >= w || py as usize >= h {
                        continue;
                    }
                    screen[py as usize * w + px as usize] = color;
                }
            }
        }
        x += 6;
    }
}
