//! The canvas controller: owns the pixels, the selection and the active tool,
//! dispatches pointer events, and tells subscribed observers when to re-render.
//!
//! Everything runs synchronously on the caller's thread, one event at a time.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::buffer::PixelBuffer;
use crate::color::Tolerance;
use crate::config::{EditorConfig, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use crate::error::Error;
use crate::flood::FloodFill;
use crate::io;
use crate::selection::SelectionModel;
use crate::tools::{BrushSettings, Tool, ToolContext, ToolMode, ToolOutcome, WandOutcome};
use crate::types::{Pixel, Point, Rect};

/// Which part of the buffer changed since the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Damage {
    /// Only the overlays (selection / preview) changed.
    None,
    Region(Rect),
    Full,
}

/// Everything the shell needs to draw one frame.
pub struct RenderFrame<'a> {
    pub buffer: &'a PixelBuffer,
    pub damage: Damage,
    pub selection: Option<Rect>,
    /// Rubber-band rectangle of a drag in progress.
    pub preview: Option<Rect>,
}

/// Non-fatal things the shell may want to show the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    ToolChanged(ToolMode),
    WandSelected { seed: Point, pixels: usize, bbox: Rect },
    SeedOutsideCanvas { seed: Point },
    FillTooLarge { cap: usize },
    Saved(String),
    Loaded(String),
    PersistenceFailed(String),
    /// The wand query failed for a reason other than the ones above.
    WandFailed(String),
}

pub trait CanvasObserver {
    fn render(&mut self, frame: &RenderFrame<'_>);

    fn notice(&mut self, _notice: &Notice) {}
}

pub struct Canvas {
    buffer: PixelBuffer,
    selection: SelectionModel,
    tool: Box<dyn Tool>,
    brush: BrushSettings,
    wand: FloodFill,
    observers: Vec<Box<dyn CanvasObserver>>,
}

impl Canvas {
    pub fn new(config: &EditorConfig) -> Result<Self, Error> {
        let buffer = PixelBuffer::blank(config.width, config.height)?;
        Ok(Self::with_buffer(buffer, config))
    }

    /// Start from existing pixels (e.g. an opened file) instead of a blank sheet.
    pub fn with_buffer(buffer: PixelBuffer, config: &EditorConfig) -> Self {
        Self {
            buffer,
            selection: SelectionModel::new(),
            tool: ToolMode::Brush.tool(),
            brush: BrushSettings {
                color: config.color,
                size: config.brush_size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE),
            },
            wand: FloodFill::new(config.tolerance).with_max_visits(config.max_fill_visits),
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn CanvasObserver>) {
        self.observers.push(observer);
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn selection(&self) -> Option<Rect> {
        self.selection.get()
    }

    pub fn tool_mode(&self) -> ToolMode {
        self.tool.mode()
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    pub fn tolerance(&self) -> Tolerance {
        self.wand.tolerance
    }

    // ----------------------------- pointer events -----------------------------

    pub fn pointer_down(&mut self, x: i32, y: i32) {
        let outcome = self.with_tool(|tool, ctx| tool.pointer_down(ctx, Point::new(x, y)));
        self.apply(outcome);
    }

    pub fn pointer_move(&mut self, x: i32, y: i32) {
        let outcome = self.with_tool(|tool, ctx| tool.pointer_move(ctx, Point::new(x, y)));
        self.apply(outcome);
    }

    pub fn pointer_up(&mut self, x: i32, y: i32) {
        let outcome = self.with_tool(|tool, ctx| tool.pointer_up(ctx, Point::new(x, y)));
        self.apply(outcome);
    }

    fn with_tool<F>(&mut self, f: F) -> ToolOutcome
    where
        F: FnOnce(&mut dyn Tool, &mut ToolContext<'_>) -> ToolOutcome,
    {
        let mut ctx = ToolContext {
            buffer: &mut self.buffer,
            selection: &mut self.selection,
            brush: self.brush,
            wand: self.wand,
        };
        f(&mut *self.tool, &mut ctx)
    }

    fn apply(&mut self, outcome: ToolOutcome) {
        match outcome {
            ToolOutcome::Idle => {}
            ToolOutcome::Painted(dirty) => self.render(Damage::Region(dirty), None),
            ToolOutcome::Preview(rect) => self.render(Damage::None, Some(rect)),
            ToolOutcome::Selected(_) => self.render(Damage::None, None),
            ToolOutcome::Wand(wand) => {
                let notice = match wand {
                    WandOutcome::Selected { seed, pixels, bbox } => {
                        Some(Notice::WandSelected { seed, pixels, bbox })
                    }
                    WandOutcome::SeedOutside { seed } => Some(Notice::SeedOutsideCanvas { seed }),
                    WandOutcome::TooLarge { cap } => Some(Notice::FillTooLarge { cap }),
                    WandOutcome::Failed(err) => Some(Notice::WandFailed(err.to_string())),
                };
                if let Some(notice) = notice {
                    self.notify(&notice);
                }
                self.render(Damage::None, None);
            }
        }
    }

    // ----------------------------- shell commands -----------------------------

    /// Switch tools. Always drops the current selection and any half-done gesture.
    pub fn select_tool(&mut self, mode: ToolMode) {
        self.tool = mode.tool();
        self.selection.clear();
        debug!(%mode, "tool selected");
        self.notify(&Notice::ToolChanged(mode));
        self.render(Damage::None, None);
    }

    /// Paint the selected rectangle white and drop the selection.
    /// Returns false (and does nothing) when there is no selection.
    pub fn erase_selection(&mut self) -> bool {
        let Some(rect) = self.selection.get() else {
            return false;
        };
        let dirty = self.buffer.fill_rect(
            rect.x_min as i64,
            rect.y_min as i64,
            rect.x_max as i64,
            rect.y_max as i64,
            Pixel::WHITE,
        );
        self.selection.clear();
        info!(?rect, "erased selection");
        self.render(dirty.map_or(Damage::None, Damage::Region), None);
        true
    }

    /// Replace everything with a fresh white sheet of the given size.
    pub fn clear_canvas(&mut self, width: usize, height: usize) -> Result<(), Error> {
        self.buffer = PixelBuffer::blank(width, height)?;
        self.selection.clear();
        self.tool = self.tool.mode().tool();
        self.render(Damage::Full, None);
        Ok(())
    }

    /// Resample the drawing to a new size. The selection no longer lines up
    /// with the resampled pixels, so it is dropped.
    pub fn resize_canvas(&mut self, width: usize, height: usize) -> Result<(), Error> {
        if (width, height) == self.buffer.dimensions() {
            return Ok(());
        }
        self.buffer = self.buffer.resized(width, height)?;
        self.selection.clear();
        debug!(width, height, "canvas resized");
        self.render(Damage::Full, None);
        Ok(())
    }

    pub fn set_color(&mut self, color: Pixel) {
        self.brush.color = color;
    }

    /// Clamped to `MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE`.
    pub fn set_brush_size(&mut self, size: u32) {
        self.brush.size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    pub fn set_tolerance(&mut self, tolerance: Tolerance) {
        self.wand.tolerance = tolerance;
    }

    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        match io::save_png(&self.buffer, path) {
            Ok(()) => {
                info!(path = %path.display(), "canvas saved");
                self.notify(&Notice::Saved(path.display().to_string()));
                Ok(())
            }
            Err(err) => {
                warn!(%err, "save failed");
                self.notify(&Notice::PersistenceFailed(err.to_string()));
                Err(err)
            }
        }
    }

    /// Replace the canvas with an image file. Nothing changes if loading fails.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        match io::load_image(path) {
            Ok(buffer) => {
                self.buffer = buffer;
                self.selection.clear();
                self.tool = self.tool.mode().tool();
                info!(path = %path.display(), width = self.buffer.width(), height = self.buffer.height(), "canvas loaded");
                self.notify(&Notice::Loaded(path.display().to_string()));
                self.render(Damage::Full, None);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "load failed");
                self.notify(&Notice::PersistenceFailed(err.to_string()));
                Err(err)
            }
        }
    }

    // ----------------------------- observers -----------------------------

    fn render(&mut self, damage: Damage, preview: Option<Rect>) {
        let frame = RenderFrame {
            buffer: &self.buffer,
            damage,
            selection: self.selection.get(),
            preview,
        };
        for observer in &mut self.observers {
            observer.render(&frame);
        }
    }

    fn notify(&mut self, notice: &Notice) {
        for observer in &mut self.observers {
            observer.notice(notice);
        }
    }
}
