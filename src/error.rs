// Every variant states *where* things went wrong.
// Visual: none of these crash the editor; the shell shows them on the HUD line.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Programmatic pixel access outside the buffer. Pointer input clips instead.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds { x: i64, y: i64, width: usize, height: usize },

    /// Create/resize asked for a zero-sized canvas.
    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Raw RGB snapshot does not match width * height * 3.
    #[error("raw buffer has {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    #[error("tolerance must be a finite, non-negative number (got {0})")]
    InvalidTolerance(f64),

    /// Magic wand gave up after visiting `cap` pixels.
    #[error("flood fill exceeded the visit cap of {cap} pixels")]
    FillTooLarge { cap: usize },

    #[error("could not read or write {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),
}
