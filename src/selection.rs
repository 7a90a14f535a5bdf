// The active selection. Only the three operations below change it.
// Visual: what the dashed marquee outlines, and what Delete erases.
use crate::types::{Point, Rect};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    current: Option<Rect>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rectangle from two drag corners in any order, each clamped onto a
    /// `width` x `height` canvas first.
    pub fn set_from_rect(&mut self, p0: Point, p1: Point, width: usize, height: usize) {
        self.current = Some(clamped_rect(p0, p1, width, height));
    }

    /// Adopt a magic-wand bounding box as-is.
    pub fn set_from_flood_fill(&mut self, bbox: Rect) {
        self.current = Some(bbox);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn get(&self) -> Option<Rect> {
        self.current
    }
}

/// Normalize two corners into a box that lies on a `width` x `height` canvas.
/// Also used for the live rubber-band preview while dragging.
pub fn clamped_rect(p0: Point, p1: Point, width: usize, height: usize) -> Rect {
    let clamp = |p: Point| {
        (
            (p.x.max(0) as usize).min(width.saturating_sub(1)),
            (p.y.max(0) as usize).min(height.saturating_sub(1)),
        )
    };
    let (x0, y0) = clamp(p0);
    let (x1, y1) = clamp(p1);
    Rect::from_corners(x0, y0, x1, y1)
}
