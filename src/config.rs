// Command line configuration and the DE1-SoC address map.

use std::path::PathBuf;

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Parser, ValueEnum};

/// Visible pixel columns.
pub const PIXEL_COLS: u32 = 640;
/// Visible pixel rows.
pub const PIXEL_ROWS: u32 = 480;
/// Row stride of the on-chip pixel buffer is 1 << ROW_SHIFT bytes.
pub const ROW_SHIFT: u32 = 10;

/// FPGA on-chip memory holding the pixel plane.
pub const FPGA_ONCHIP_BASE: usize = 0xC800_0000;
pub const FPGA_ONCHIP_SPAN: usize = 0x0008_0000;

/// Lightweight HPS-to-FPGA bridge (switches, LEDs, ...).
pub const HW_REGS_BASE: usize = 0xFF20_0000;
pub const HW_REGS_SPAN: usize = 0x0000_5000;
/// Slide switch register, relative to HW_REGS_BASE.
pub const SW_OFFSET: usize = 0x40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Map /dev/mem and read /dev/input/mice on the board
    Hardware,
    /// Draw into a desktop window instead of the VGA plane
    Sim,
}

/// Footprint of the cursor marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MarkerStyle {
    /// Single cell under the cursor
    #[default]
    Dot,
    /// 5x5 box centred on the cursor
    Box,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "vga-life", version, about = "Mouse-driven glyph stamping on the DE1-SoC VGA plane")]
pub struct Config {
    /// Where to draw
    #[arg(long, value_enum, default_value_t = Backend::Hardware)]
    pub backend: Backend,

    /// Physical memory device to map the pixel plane and switches from
    #[arg(long, default_value = "/dev/mem")]
    pub mem_device: PathBuf,

    /// Relative-motion pointer device (3-byte packets)
    #[arg(long, default_value = "/dev/input/mice")]
    pub mouse_device: PathBuf,

    /// Cursor marker footprint
    #[arg(long, value_enum, default_value_t = MarkerStyle::Dot)]
    pub marker: MarkerStyle,

    /// Fill the plane with background before drawing
    #[arg(long)]
    pub clear: bool,

    /// PNG written when P is pressed in the simulator
    #[arg(long, default_value = "vga-life.png")]
    pub snapshot: PathBuf,

    /// Simulator window scale
    #[arg(long, default_value_t = 2, value_parser = PossibleValuesParser::new(["1", "2", "4"]).map(|s| s.parse::<u8>().unwrap_or(1)))]
    pub scale: u8,
}
