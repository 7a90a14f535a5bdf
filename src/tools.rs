//! Tool modes and the pointer-event handling for each.
//!
//! Exactly one tool is active. Each tool turns down/move/up events into buffer
//! strokes, selection changes or wand queries and reports what happened as a
//! [`ToolOutcome`]; the canvas decides what to re-render and what to tell the shell.

use std::fmt;

use tracing::{debug, info, warn};

use crate::buffer::PixelBuffer;
use crate::error::Error;
use crate::flood::{FillResult, FloodFill};
use crate::selection::{SelectionModel, clamped_rect};
use crate::types::{Pixel, Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolMode {
    /// Freehand drawing with the current colour and size (initial mode).
    #[default]
    Brush,
    /// Drag out a rectangular selection.
    RectSelect,
    /// Click to select the similar-coloured region under the pointer.
    MagicWand,
}

impl ToolMode {
    /// Fresh tool for this mode, with no gesture in progress.
    pub fn tool(self) -> Box<dyn Tool> {
        match self {
            ToolMode::Brush => Box::new(StrokeTool::default()),
            ToolMode::RectSelect => Box::new(RectSelectTool::default()),
            ToolMode::MagicWand => Box::new(MagicWandTool::default()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ToolMode::Brush => "BRUSH",
            ToolMode::RectSelect => "SELECT",
            ToolMode::MagicWand => "WAND",
        }
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Colour and thickness the brush paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushSettings {
    pub color: Pixel,
    pub size: u32, // always >= 1
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self { color: Pixel::BLACK, size: 5 }
    }
}

/// What a tool may touch while handling one event.
pub struct ToolContext<'a> {
    pub buffer: &'a mut PixelBuffer,
    pub selection: &'a mut SelectionModel,
    pub brush: BrushSettings,
    pub wand: FloodFill,
}

#[derive(Debug)]
pub enum WandOutcome {
    Selected { seed: Point, pixels: usize, bbox: Rect },
    /// Seed fell outside the canvas; selection was cleared.
    SeedOutside { seed: Point },
    /// Visit cap hit; selection left as it was.
    TooLarge { cap: usize },
    Failed(Error),
}

#[derive(Debug)]
pub enum ToolOutcome {
    Idle,
    /// Pixels changed inside this area.
    Painted(Rect),
    /// Rubber-band rectangle moved; nothing committed yet.
    Preview(Rect),
    /// Rectangle selection committed.
    Selected(Rect),
    Wand(WandOutcome),
}

pub trait Tool {
    fn mode(&self) -> ToolMode;
    fn pointer_down(&mut self, ctx: &mut ToolContext<'_>, p: Point) -> ToolOutcome;
    fn pointer_move(&mut self, ctx: &mut ToolContext<'_>, p: Point) -> ToolOutcome;
    fn pointer_up(&mut self, ctx: &mut ToolContext<'_>, p: Point) -> ToolOutcome;
}

// ----------------------------- brush -----------------------------

/// Freehand strokes. `last` is Some while the button is held ("drawing").
#[derive(Debug, Default)]
pub struct StrokeTool {
    last: Option<Point>,
}

impl Tool for StrokeTool {
    fn mode(&self) -> ToolMode {
        ToolMode::Brush
    }

    fn pointer_down(&mut self, _ctx: &mut ToolContext<'_>, p: Point) -> ToolOutcome {
        self.last = Some(p);
        ToolOutcome::Idle
    }

    /// Visual: the stroke follows the mouse as one connected polyline.
    fn pointer_move(&mut self, ctx: &mut ToolContext<'_>, p: Point) -> ToolOutcome {
        let Some(prev) = self.last else {
            return ToolOutcome::Idle;
        };
        self.last = Some(p);
        let BrushSettings { color, size } = ctx.brush;
        debug!(from = ?prev, to = ?p, size, "brush segment");
        match ctx.buffer.set_line(prev, p, color, size) {
            Some(dirty) => ToolOutcome::Painted(dirty),
            None => ToolOutcome::Idle,
        }
    }

    fn pointer_up(&mut self, _ctx: &mut ToolContext<'_>, _p: Point) -> ToolOutcome {
        self.last = None;
        ToolOutcome::Idle
    }
}

// ----------------------------- rectangle select -----------------------------

#[derive(Debug, Default)]
pub struct RectSelectTool {
    anchor: Option<Point>,
}

impl Tool for RectSelectTool {
    fn mode(&self) -> ToolMode {
        ToolMode::RectSelect
    }

    fn pointer_down(&mut self, _ctx: &mut ToolContext<'_>, p: Point) -> ToolOutcome {
        self.anchor = Some(p);
        ToolOutcome::Idle
    }

    fn pointer_move(&mut self, ctx: &mut ToolContext<'_>, p: Point) -> ToolOutcome {
        match self.anchor {
            Some(anchor) => {
                let (w, h) = ctx.buffer.dimensions();
                ToolOutcome::Preview(clamped_rect(anchor, p, w, h))
            }
            None => ToolOutcome::Idle,
        }
    }

    /// Visual: the dashed preview becomes the committed marquee.
    fn pointer_up(&mut self, ctx: &mut ToolContext<'_>, p: Point) -> ToolOutcome {
        let Some(anchor) = self.anchor.take() else {
            return ToolOutcome::Idle;
        };
        let (w, h) = ctx.buffer.dimensions();
        ctx.selection.set_from_rect(anchor, p, w, h);
        match ctx.selection.get() {
            Some(rect) => ToolOutcome::Selected(rect),
            None => ToolOutcome::Idle,
        }
    }
}

// ----------------------------- magic wand -----------------------------

/// Selects on release, seeded at the press point. Dragging has no effect.
#[derive(Debug, Default)]
pub struct MagicWandTool {
    pressed: Option<Point>,
}

impl Tool for MagicWandTool {
    fn mode(&self) -> ToolMode {
        ToolMode::MagicWand
    }

    fn pointer_down(&mut self, _ctx: &mut ToolContext<'_>, p: Point) -> ToolOutcome {
        self.pressed = Some(p);
        ToolOutcome::Idle
    }

    fn pointer_move(&mut self, _ctx: &mut ToolContext<'_>, _p: Point) -> ToolOutcome {
        ToolOutcome::Idle
    }

    fn pointer_up(&mut self, ctx: &mut ToolContext<'_>, p: Point) -> ToolOutcome {
        let seed = self.pressed.take().unwrap_or(p);
        let outcome = match ctx.wand.select(&*ctx.buffer, seed.x as i64, seed.y as i64) {
            Ok(FillResult { bbox: Some(bbox), pixel_count, .. }) => {
                ctx.selection.set_from_flood_fill(bbox);
                info!(?seed, pixels = pixel_count, ?bbox, "magic wand selected region");
                WandOutcome::Selected { seed, pixels: pixel_count, bbox }
            }
            Ok(_) => {
                ctx.selection.clear();
                warn!(?seed, "magic wand clicked outside canvas");
                WandOutcome::SeedOutside { seed }
            }
            Err(Error::FillTooLarge { cap }) => {
                warn!(?seed, cap, "magic wand region too large; selection unchanged");
                WandOutcome::TooLarge { cap }
            }
            Err(err) => {
                warn!(?seed, %err, "magic wand failed");
                WandOutcome::Failed(err)
            }
        };
        ToolOutcome::Wand(outcome)
    }
}
