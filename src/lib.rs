//! Minimal raster image editor core.
//!
//! A white RGB canvas you can scribble on with a round brush, select from
//! (rectangle drag or colour-tolerance magic wand), erase within the selection,
//! resize, and save as PNG. Windowing lives in the `paint-light` binary; this
//! library only mutates pixels and selection state and tells observers when
//! something needs redrawing.

pub mod buffer;
pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod flood;
pub mod io;
pub mod selection;
pub mod tools;
pub mod types;

pub use buffer::PixelBuffer;
pub use canvas::{Canvas, CanvasObserver, Damage, Notice, RenderFrame};
pub use color::{Tolerance, distance};
pub use config::{Cli, EditorConfig};
pub use error::Error;
pub use flood::{FillResult, FloodFill};
pub use selection::SelectionModel;
pub use tools::ToolMode;
pub use types::{FrameBuffer, Mask, Pixel, Point, Rect};
