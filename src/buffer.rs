// The canvas pixels: a dense row-major RGB grid plus the drawing primitives
// the tools need (thick lines, rectangle fill, resampling).
// Visual: whatever is in here is what the window shows under the overlays.

use image::{ImageBuffer, Rgb, RgbImage, imageops};

use crate::error::Error;
use crate::types::{FrameBuffer, Pixel, Point, Rect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>, // length = width * height
}

impl PixelBuffer {
    /// New canvas with every pixel set to `fill`.
    pub fn new(width: usize, height: usize, fill: Pixel) -> Result<Self, Error> {
        check_dimensions(width, height)?;
        Ok(Self { width, height, pixels: vec![fill; width * height] })
    }

    /// Blank (white) canvas.
    pub fn blank(width: usize, height: usize) -> Result<Self, Error> {
        Self::new(width, height, Pixel::WHITE)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    /// Read one pixel; programmatic misuse gets `OutOfBounds`.
    pub fn get(&self, x: i64, y: i64) -> Result<Pixel, Error> {
        if !self.in_bounds(x, y) {
            return Err(Error::OutOfBounds { x, y, width: self.width, height: self.height });
        }
        Ok(self.pixels[y as usize * self.width + x as usize])
    }

    /// Unchecked-by-contract read for callers that already validated (x, y).
    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize) -> Pixel {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: i64, y: i64, color: Pixel) -> Result<(), Error> {
        if !self.in_bounds(x, y) {
            return Err(Error::OutOfBounds { x, y, width: self.width, height: self.height });
        }
        self.pixels[y as usize * self.width + x as usize] = color;
        Ok(())
    }

    /// Put a pixel if (x,y) is inside bounds; silently clip otherwise.
    #[inline]
    fn put_pixel(&mut self, x: i64, y: i64, color: Pixel) {
        if !self.in_bounds(x, y) {
            return;
        }
        self.pixels[y as usize * self.width + x as usize] = color;
    }

    /// Stroke from `p0` to `p1` with a round brush `thickness` pixels wide.
    /// The segment is first clipped to the band where the brush can still reach
    /// the canvas, then walked with Bresenham, stamping the brush at every step.
    /// Off-canvas parts cost nothing. Returns the touched area (None if fully clipped).
    /// Visual: one piece of the freehand polyline appears.
    pub fn set_line(&mut self, p0: Point, p1: Point, color: Pixel, thickness: u32) -> Option<Rect> {
        let stamp = BrushStamp::round(thickness);
        let (min, max) = (stamp.min as i64, stamp.max as i64);
        let reach = (-max, -max, self.width as i64 - 1 - min, self.height as i64 - 1 - min);
        let ((mut x0, mut y0), (x1, y1)) =
            clip_segment((p0.x as i64, p0.y as i64), (p1.x as i64, p1.y as i64), reach)?;

        // Dirty area = clipped segment box grown by the stamp reach.
        let dirty = self.clip_rect(x0.min(x1) + min, y0.min(y1) + min, x0.max(x1) + max, y0.max(y1) + max);

        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            for &(ox, oy) in &stamp.offsets {
                self.put_pixel(x0 + ox as i64, y0 + oy as i64, color);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
        dirty
    }

    /// Inclusive rectangle fill. Corners may come in any order and may hang
    /// off the canvas; only the on-canvas part is painted.
    pub fn fill_rect(&mut self, x1: i64, y1: i64, x2: i64, y2: i64, color: Pixel) -> Option<Rect> {
        let area = self.clip_rect(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))?;
        for y in area.y_min..=area.y_max {
            let row = y * self.width;
            self.pixels[row + area.x_min..=row + area.x_max].fill(color);
        }
        Some(area)
    }

    /// Intersect a normalized box with the canvas; None when they do not overlap.
    fn clip_rect(&self, x_min: i64, y_min: i64, x_max: i64, y_max: i64) -> Option<Rect> {
        let x_lo = x_min.max(0);
        let y_lo = y_min.max(0);
        let x_hi = x_max.min(self.width as i64 - 1);
        let y_hi = y_max.min(self.height as i64 - 1);
        if x_lo > x_hi || y_lo > y_hi {
            return None;
        }
        Some(Rect::from_corners(x_lo as usize, y_lo as usize, x_hi as usize, y_hi as usize))
    }

    /// Resampled copy at the new size (triangle filter, which widens into an
    /// area average when shrinking). The old buffer is left untouched.
    /// Visual: drawing keeps its shape, just stretched/squeezed to the window.
    pub fn resized(&self, new_width: usize, new_height: usize) -> Result<PixelBuffer, Error> {
        check_dimensions(new_width, new_height)?;
        if (new_width, new_height) == (self.width, self.height) {
            return Ok(self.clone());
        }
        let src = self.to_image();
        let out = imageops::resize(
            &src,
            new_width as u32,
            new_height as u32,
            imageops::FilterType::Triangle,
        );
        Ok(Self::from_image(&out))
    }

    /// Full snapshot as interleaved R,G,B bytes (row-major).
    pub fn to_raw(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.channels()).collect()
    }

    /// Rebuild from interleaved R,G,B bytes. Length must be width * height * 3.
    pub fn from_raw(width: usize, height: usize, raw: &[u8]) -> Result<Self, Error> {
        check_dimensions(width, height)?;
        let expected = width * height * 3;
        if raw.len() != expected {
            return Err(Error::BufferLength { expected, actual: raw.len() });
        }
        let pixels = raw.chunks_exact(3).map(|c| Pixel::new(c[0], c[1], c[2])).collect();
        Ok(Self { width, height, pixels })
    }

    pub fn to_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            Rgb(self.at(x as usize, y as usize).channels())
        })
    }

    pub fn from_image(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let pixels = img.pixels().map(|p| Pixel::new(p[0], p[1], p[2])).collect();
        Self { width: w as usize, height: h as usize, pixels }
    }

    /// Copy into the packed 0x00RRGGBB surface the window presents.
    /// Reuses `fb`'s allocation when the size already matches.
    pub fn write_frame(&self, fb: &mut FrameBuffer) {
        fb.width = self.width;
        fb.height = self.height;
        fb.pixels.clear();
        fb.pixels.extend(self.pixels.iter().map(|p| p.to_u32()));
    }
}

/// Liang-Barsky: cut the segment down to the part inside the inclusive box
/// `(x_min, y_min, x_max, y_max)`. None when it misses the box entirely.
fn clip_segment(
    p0: (i64, i64),
    p1: (i64, i64),
    (x_min, y_min, x_max, y_max): (i64, i64, i64, i64),
) -> Option<((i64, i64), (i64, i64))> {
    let (dx, dy) = ((p1.0 - p0.0) as f64, (p1.1 - p0.1) as f64);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let edges = [
        (-dx, (p0.0 - x_min) as f64),
        (dx, (x_max - p0.0) as f64),
        (-dy, (p0.1 - y_min) as f64),
        (dy, (y_max - p0.1) as f64),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None; // parallel to this edge and outside it
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    // Rounding can nudge an endpoint one pixel out; pull it back in.
    let at = |t: f64| {
        let x = (p0.0 as f64 + t * dx).round() as i64;
        let y = (p0.1 as f64 + t * dy).round() as i64;
        (x.clamp(x_min, x_max), y.clamp(y_min, y_max))
    };
    Some((at(t0), at(t1)))
}

fn check_dimensions(width: usize, height: usize) -> Result<(), Error> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Widest stroke the buffer will stamp; larger requests are narrowed to this.
pub const MAX_STROKE_WIDTH: u32 = 256;

/// Round brush footprint: the pixel offsets painted around each line step.
/// Visual: defines how fat and how round the stroke looks.
pub struct BrushStamp {
    pub offsets: Vec<(i32, i32)>,
    pub min: i32, // smallest offset on either axis
    pub max: i32, // largest offset on either axis
}

impl BrushStamp {
    /// A `thickness`-wide disc, thickness clamped to 1..=MAX_STROKE_WIDTH.
    /// Even sizes are centred half a pixel down-right of the path.
    pub fn round(thickness: u32) -> Self {
        let t = thickness.clamp(1, MAX_STROKE_WIDTH) as i32;
        let min = -((t - 1) / 2);
        let max = t / 2;
        let centre = (min + max) as f32 / 2.0;
        let r2 = (t as f32 / 2.0) * (t as f32 / 2.0);

        let mut offsets = Vec::with_capacity((t * t) as usize);
        for oy in min..=max {
            for ox in min..=max {
                let dx = ox as f32 - centre;
                let dy = oy as f32 - centre;
                if dx * dx + dy * dy <= r2 {
                    offsets.push((ox, oy));
                }
            }
        }
        Self { offsets, min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(buf: &PixelBuffer, color: Pixel) -> usize {
        buf.pixels().iter().filter(|&&p| p == color).count()
    }

    #[test]
    fn create_fills_every_pixel() {
        let buf = PixelBuffer::new(4, 3, Pixel::BLACK).unwrap();
        assert_eq!(buf.dimensions(), (4, 3));
        assert_eq!(count(&buf, Pixel::BLACK), 12);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(PixelBuffer::blank(0, 5), Err(Error::InvalidDimensions { .. })));
        assert!(PixelBuffer::blank(5, 0).is_err());
    }

    #[test]
    fn get_is_bounds_checked() {
        let buf = PixelBuffer::blank(3, 3).unwrap();
        assert_eq!(buf.get(2, 2).unwrap(), Pixel::WHITE);
        assert!(matches!(buf.get(3, 0), Err(Error::OutOfBounds { x: 3, y: 0, .. })));
        assert!(buf.get(-1, 0).is_err());
    }

    #[test]
    fn thin_horizontal_line() {
        let mut buf = PixelBuffer::blank(10, 5).unwrap();
        let dirty = buf.set_line(Point::new(1, 2), Point::new(6, 2), Pixel::BLACK, 1);
        assert_eq!(count(&buf, Pixel::BLACK), 6);
        assert_eq!(dirty, Some(Rect::from_corners(1, 2, 6, 2)));
    }

    #[test]
    fn thick_line_is_wider() {
        let mut buf = PixelBuffer::blank(20, 20).unwrap();
        buf.set_line(Point::new(5, 10), Point::new(15, 10), Pixel::BLACK, 3);
        for y in 9..=11 {
            assert_eq!(buf.get(10, y).unwrap(), Pixel::BLACK);
        }
        assert_eq!(buf.get(10, 8).unwrap(), Pixel::WHITE);
    }

    #[test]
    fn line_is_clipped_off_canvas() {
        let mut buf = PixelBuffer::blank(5, 5).unwrap();
        let dirty = buf.set_line(Point::new(-10, 2), Point::new(20, 2), Pixel::BLACK, 1);
        assert_eq!(count(&buf, Pixel::BLACK), 5);
        assert_eq!(dirty, Some(Rect::from_corners(0, 2, 4, 2)));

        let none = buf.set_line(Point::new(-10, -10), Point::new(-3, -3), Pixel::BLACK, 2);
        assert_eq!(none, None);
    }

    #[test]
    fn extreme_pointer_coordinates_clip_without_overflow() {
        let mut buf = PixelBuffer::blank(10, 10).unwrap();
        let (from, to) = (Point::new(-2_000_000_000, 5), Point::new(2_000_000_000, 5));
        let dirty = buf.set_line(from, to, Pixel::BLACK, 1);
        assert_eq!(dirty, Some(Rect::from_corners(0, 5, 9, 5)));
        assert_eq!(count(&buf, Pixel::BLACK), 10);

        let (from, to) = (Point::new(i32::MIN, i32::MIN), Point::new(i32::MAX, i32::MAX));
        let diag = buf.set_line(from, to, Pixel::BLACK, 3);
        assert!(diag.is_some());
        assert_eq!(buf.get(0, 0).unwrap(), Pixel::BLACK);
        assert_eq!(buf.get(9, 9).unwrap(), Pixel::BLACK);
    }

    #[test]
    fn far_off_canvas_segment_is_skipped() {
        let mut buf = PixelBuffer::blank(10, 10).unwrap();
        let (from, to) = (Point::new(-500_000_000, 5), Point::new(-400_000_000, 5));
        let dirty = buf.set_line(from, to, Pixel::BLACK, 20);
        assert_eq!(dirty, None);
        assert_eq!(count(&buf, Pixel::BLACK), 0);
    }

    #[test]
    fn brush_just_off_the_edge_still_reaches_in() {
        let mut buf = PixelBuffer::blank(10, 10).unwrap();
        // Path runs one pixel above the canvas; a 3-wide brush touches row 0.
        let dirty = buf.set_line(Point::new(2, -1), Point::new(6, -1), Pixel::BLACK, 3);
        assert_eq!(dirty, Some(Rect::from_corners(1, 0, 7, 0)));
        assert_eq!(count(&buf, Pixel::BLACK), 7);
    }

    #[test]
    fn oversized_brush_is_narrowed() {
        let stamp = BrushStamp::round(u32::MAX);
        assert_eq!(stamp.max - stamp.min + 1, MAX_STROKE_WIDTH as i32);
        let mut buf = PixelBuffer::blank(20, 20).unwrap();
        let dirty = buf.set_line(Point::new(5, 5), Point::new(6, 5), Pixel::BLACK, 50_000);
        assert_eq!(dirty, Some(Rect::from_corners(0, 0, 19, 19)));
        assert_eq!(count(&buf, Pixel::BLACK), 400);
    }

    #[test]
    fn fill_rect_normalizes_and_clamps() {
        let mut buf = PixelBuffer::blank(6, 6).unwrap();
        let area = buf.fill_rect(8, 3, 4, -2, Pixel::BLACK);
        assert_eq!(area, Some(Rect::from_corners(4, 0, 5, 3)));
        assert_eq!(count(&buf, Pixel::BLACK), 8);

        assert_eq!(buf.fill_rect(10, 10, 12, 12, Pixel::BLACK), None);
    }

    #[test]
    fn brush_stamp_sizes() {
        assert_eq!(BrushStamp::round(1).offsets, vec![(0, 0)]);
        assert_eq!(BrushStamp::round(2).offsets.len(), 4);
        assert_eq!(BrushStamp::round(3).offsets.len(), 9);
        let five = BrushStamp::round(5);
        assert!(!five.offsets.contains(&(2, 2)));
        assert!(five.offsets.contains(&(2, 1)));
    }

    #[test]
    fn resize_keeps_structure() {
        let mut buf = PixelBuffer::blank(40, 40).unwrap();
        buf.fill_rect(0, 0, 19, 39, Pixel::BLACK);
        let half = buf.resized(20, 20).unwrap();
        assert_eq!(half.dimensions(), (20, 20));
        // Far left stays dark, far right stays light.
        assert!(half.get(1, 10).unwrap().r < 64);
        assert!(half.get(18, 10).unwrap().r > 192);
    }

    #[test]
    fn resize_down_to_one_pixel() {
        let buf = PixelBuffer::blank(33, 17).unwrap();
        let tiny = buf.resized(1, 1).unwrap();
        assert_eq!(tiny.dimensions(), (1, 1));
        let line = buf.resized(1, 17).unwrap();
        assert_eq!(line.dimensions(), (1, 17));
        assert!(matches!(buf.resized(0, 4), Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn raw_snapshot_round_trips() {
        let mut buf = PixelBuffer::blank(3, 2).unwrap();
        buf.set(1, 1, Pixel::new(1, 2, 3)).unwrap();
        let raw = buf.to_raw();
        assert_eq!(raw.len(), 18);
        assert_eq!(PixelBuffer::from_raw(3, 2, &raw).unwrap(), buf);
        assert!(matches!(
            PixelBuffer::from_raw(3, 2, &raw[..17]),
            Err(Error::BufferLength { expected: 18, actual: 17 })
        ));
    }

    #[test]
    fn frame_is_packed_rgb() {
        let mut buf = PixelBuffer::blank(2, 1).unwrap();
        buf.set(0, 0, Pixel::new(0xAA, 0xBB, 0xCC)).unwrap();
        let mut fb = FrameBuffer { width: 0, height: 0, pixels: Vec::new() };
        buf.write_frame(&mut fb);
        assert_eq!(fb.pixels, vec![0x00AA_BBCC, 0x00FF_FFFF]);
        assert_eq!((fb.width, fb.height), (2, 1));
    }
}
