//! Magic wand region growing.
//!
//! Starting at a seed pixel, collects every 4-connected pixel whose colour is
//! within the tolerance of the *seed* colour. Iterative: an explicit work-list
//! plus a visited grid, so each pixel is evaluated at most once and deep regions
//! cannot blow the call stack.

use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::color::Tolerance;
use crate::error::Error;
use crate::types::{Mask, Rect};

/// Up, down, left, right. No diagonals.
const NEIGHBOURS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Wand result with metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillResult {
    /// Selected cells; empty (0x0) when the seed was off-canvas.
    pub mask: Mask,
    /// Tight box around `mask`, None only when the seed was off-canvas.
    pub bbox: Option<Rect>,
    /// Number of selected pixels.
    pub pixel_count: usize,
    /// Pixels whose colour was evaluated; never exceeds width * height.
    pub visited: usize,
}

impl FillResult {
    fn outside() -> Self {
        Self { mask: Mask::empty(), bbox: None, pixel_count: 0, visited: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloodFill {
    pub tolerance: Tolerance,
    /// Give up with `FillTooLarge` after evaluating this many pixels.
    pub max_visits: Option<usize>,
}

impl FloodFill {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance, max_visits: None }
    }

    pub fn with_max_visits(mut self, cap: Option<usize>) -> Self {
        self.max_visits = cap;
        self
    }

    /// Grow the region around (seed_x, seed_y).
    ///
    /// A seed outside the canvas is a no-op: empty mask, `None` bbox, `Ok`.
    /// Otherwise the seed itself is always selected (its distance to itself is
    /// 0), so `bbox` is always `Some`. Membership depends only on per-pixel
    /// distance to the seed colour, so the result does not depend on the order
    /// the work-list is drained in.
    pub fn select(&self, buffer: &PixelBuffer, seed_x: i64, seed_y: i64) -> Result<FillResult, Error> {
        if !buffer.in_bounds(seed_x, seed_y) {
            debug!(seed_x, seed_y, "wand seed outside canvas");
            return Ok(FillResult::outside());
        }
        let (width, height) = buffer.dimensions();
        let (sx, sy) = (seed_x as usize, seed_y as usize);
        let target = buffer.at(sx, sy);

        let mut mask = Mask::new(width, height);
        let mut visited = vec![false; width * height];
        let mut stack = vec![(sx, sy)];
        visited[sy * width + sx] = true;

        let mut visit_count = 0usize;
        let mut pixel_count = 0usize;

        while let Some((x, y)) = stack.pop() {
            visit_count += 1;
            if let Some(cap) = self.max_visits
                && visit_count > cap
            {
                return Err(Error::FillTooLarge { cap });
            }

            if !self.tolerance.accepts(buffer.at(x, y), target) {
                continue;
            }
            mask.cells[y * width + x] = true;
            pixel_count += 1;

            // Queue unvisited in-bounds neighbours; marking on push keeps
            // every pixel on the stack at most once.
            for (dx, dy) in NEIGHBOURS {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if !buffer.in_bounds(nx, ny) {
                    continue;
                }
                let nidx = ny as usize * width + nx as usize;
                if !visited[nidx] {
                    visited[nidx] = true;
                    stack.push((nx as usize, ny as usize));
                }
            }
        }

        let bbox = mask.bounding_box();
        Ok(FillResult { mask, bbox, pixel_count, visited: visit_count })
    }
}

impl Default for FloodFill {
    fn default() -> Self {
        Self::new(Tolerance::default())
    }
}
