// PNG export of the visible plane.
// Reads back through the canvas, so stride padding never ends up in the file.

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::canvas::Canvas;
use crate::error::Error;
use crate::types::Color;

/// Copy the visible W x H cells into an RGB image.
pub fn capture(canvas: &Canvas) -> RgbImage {
    ImageBuffer::from_fn(canvas.width(), canvas.height(), |x, y| {
        let sample = canvas.get(x as i32, y as i32).unwrap_or(Color::BACKGROUND);
        let rgb = sample.to_rgb888();
        Rgb([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8])
    })
}

/// Write the plane to `path`; the format follows the extension.
pub fn save(canvas: &Canvas, path: &Path) -> Result<(), Error> {
    capture(canvas).save(path)?;
    log::info!("snapshot written to {}", path.display());
    Ok(())
}
