// vga-life: stamp glyphs and Game-of-Life seeds onto the DE1-SoC VGA plane
// with a mouse.
// • Move the mouse: a marker follows the cursor and never leaves a trail.
// • Left click, switches = 2: stamp the glyph. Other switch values: toggle one cell.
// • Right click: stamp a Gosper glider gun.
// • `--backend sim` runs the same engine in a desktop window.

mod canvas;
mod config;
mod cursor;
mod drawn;
mod engine;
mod error;
mod input;
mod mapped;
mod sim;
mod snapshot;
mod stamp;
mod types;

use clap::Parser;
use config::{Backend, Config};
use error::Error;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    log::debug!("{config:?}");

    let result = match config.backend {
        Backend::Hardware => run_hardware(&config),
        Backend::Sim => sim::run(&config),
    };
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(unix)]
fn run_hardware(config: &Config) -> Result<(), Error> {
    use canvas::Canvas;
    use config::{
        FPGA_ONCHIP_BASE, FPGA_ONCHIP_SPAN, HW_REGS_BASE, HW_REGS_SPAN, PIXEL_COLS, PIXEL_ROWS,
        ROW_SHIFT, SW_OFFSET,
    };
    use engine::Engine;
    use input::MouseDevice;
    use mapped::{DevMem, Register};
    use types::Mode;

    /* --- Physical windows ---
       The pixel plane and the switch bank are separate mappings; both are
       released when this function returns. */
    let mem = DevMem::open(&config.mem_device)?;
    let mut plane = mem.map(FPGA_ONCHIP_BASE, FPGA_ONCHIP_SPAN)?;
    let mut regs = mem.map(HW_REGS_BASE, HW_REGS_SPAN)?;
    let switches = Register::new(regs.view(), SW_OFFSET);

    let mut mouse = MouseDevice::open(&config.mouse_device)?;

    let canvas = Canvas::new(plane.view(), PIXEL_COLS, PIXEL_ROWS, ROW_SHIFT);
    let mut engine = Engine::new(canvas, config.marker);
    if config.clear {
        engine.clear();
    }

    log::info!(
        "drawing on {}x{} plane, mouse {}",
        PIXEL_COLS,
        PIXEL_ROWS,
        config.mouse_device.display()
    );

    /* --- Event loop ---
       Switches are sampled per event, so flipping them mid-drag takes
       effect on the next packet. */
    loop {
        if engine
            .poll_once(&mut mouse, || Mode::from_register(switches.read()))
            .is_none()
        {
            std::hint::spin_loop();
        }
    }
}

#[cfg(not(unix))]
fn run_hardware(_config: &Config) -> Result<(), Error> {
    Err(Error::Unsupported("the hardware backend needs /dev/mem; try --backend sim"))
}
