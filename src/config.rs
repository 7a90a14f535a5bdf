// Startup settings: editor defaults plus the command line that can override them.

use std::path::PathBuf;

use clap::Parser;

use crate::color::Tolerance;
use crate::error::Error;
use crate::types::Pixel;

/// Brush slider range offered by the shell.
pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub width: usize,
    pub height: usize,
    pub brush_size: u32,
    pub color: Pixel,
    pub tolerance: Tolerance,
    /// Abort magic-wand fills after this many pixel visits (None = unbounded).
    pub max_fill_visits: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            brush_size: 5,
            color: Pixel::BLACK,
            tolerance: Tolerance::DEFAULT,
            max_fill_visits: None,
        }
    }
}

/// Minimal raster editor: brush, rectangle select, magic wand, erase, PNG save.
#[derive(Debug, Parser)]
#[command(name = "paint-light", version, about)]
pub struct Cli {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: usize,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: usize,

    /// Initial brush size (1-20)
    #[arg(long, default_value_t = 5)]
    pub brush_size: u32,

    /// Magic-wand colour tolerance (Euclidean RGB distance, 0-442)
    #[arg(long, default_value_t = 30.0)]
    pub tolerance: f64,

    /// Give up on magic-wand regions larger than this many pixels
    #[arg(long)]
    pub max_fill_visits: Option<usize>,

    /// Where `S` saves the canvas (always PNG)
    #[arg(long, short, default_value = "canvas.png")]
    pub output: PathBuf,

    /// Image to open at startup
    #[arg(long)]
    pub open: Option<PathBuf>,
}

impl Cli {
    pub fn editor_config(&self) -> Result<EditorConfig, Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        Ok(EditorConfig {
            width: self.width,
            height: self.height,
            brush_size: self.brush_size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE),
            color: Pixel::BLACK,
            tolerance: Tolerance::new(self.tolerance)?,
            max_fill_visits: self.max_fill_visits,
        })
    }
}
