// Core value types shared by the canvas, the engine and both backends.

/// One 8-bit pixel sample as the VGA controller reads it (RGB332).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color(pub u8);

impl Color {
    pub const BACKGROUND: Color = Color(0x00);
    pub const FOREGROUND: Color = Color(0xFF);

    /// Expand to 0x00RRGGBB for the simulator window and PNG export.
    /// Each channel is scaled so the top code maps to 0xFF.
    pub fn to_rgb888(self) -> u32 {
        let r = ((self.0 >> 5) & 0x07) as u32;
        let g = ((self.0 >> 2) & 0x07) as u32;
        let b = (self.0 & 0x03) as u32;
        let r = r * 255 / 7;
        let g = g * 255 / 7;
        let b = b * 255 / 3;
        (r << 16) | (g << 8) | b
    }
}

/// Behaviour selected by the switch register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Primary button flips the cell under the cursor.
    Toggle,
    /// Primary button stamps the glyph.
    Stamp,
}

impl Mode {
    pub const STAMP_REGISTER_VALUE: u8 = 2;

    pub fn from_register(value: u8) -> Self {
        if value == Self::STAMP_REGISTER_VALUE {
            Mode::Stamp
        } else {
            Mode::Toggle
        }
    }
}

/// Absolute cursor position. Always within [0, W] x [0, H].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_register() {
        assert_eq!(Mode::from_register(2), Mode::Stamp);
        assert_eq!(Mode::from_register(0), Mode::Toggle);
        assert_eq!(Mode::from_register(3), Mode::Toggle);
        assert_eq!(Mode::from_register(0xFF), Mode::Toggle);
    }

    #[test]
    fn test_rgb332_expansion() {
        assert_eq!(Color::BACKGROUND.to_rgb888(), 0x00_00_00_00);
        assert_eq!(Color::FOREGROUND.to_rgb888(), 0x00_FF_FF_FF);
        assert_eq!(Color(0b111_000_00).to_rgb888(), 0x00_FF_00_00);
        assert_eq!(Color(0b000_111_00).to_rgb888(), 0x00_00_FF_00);
        assert_eq!(Color(0b000_000_11).to_rgb888(), 0x00_00_00_FF);
    }
}
