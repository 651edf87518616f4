// Fatal setup errors. Everything inside the drawing core is absorbed
// (clipped or ignored) and never shows up here.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Opening /dev/mem or the mouse device failed
    #[error("failed to open {path}: {source}")]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// fcntl on the mouse descriptor failed
    #[error("failed to make {path} non-blocking: {source}")]
    NonBlocking {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// mmap of a physical window failed
    #[error("failed to map {span:#x} bytes at {base:#x}: {source}")]
    Map {
        base: usize,
        span: usize,
        #[source]
        source: io::Error,
    },

    /// Creating the simulator window failed
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Updating the simulator window buffer failed
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// Writing a PNG snapshot failed
    #[error("snapshot error: {0}")]
    Snapshot(#[from] image::ImageError),

    /// The selected backend needs a platform we are not running on
    #[cfg(not(unix))]
    #[error("backend unsupported on this platform: {0}")]
    Unsupported(&'static str),
}
