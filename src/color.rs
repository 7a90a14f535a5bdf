// Colour distance for the magic wand.
// Visual: decides whether a neighbouring pixel "looks the same" as the clicked one.
use crate::error::Error;
use crate::types::Pixel;

/// Largest possible distance, between black and white: sqrt(3 * 255^2).
pub const MAX_DISTANCE: f64 = 441.672_955_930_063_7;

/// Euclidean distance in RGB space.
/// Channel differences are squared in i32 so 8-bit values cannot overflow.
#[inline]
pub fn distance(c1: Pixel, c2: Pixel) -> f64 {
    let sum: i32 = c1
        .channels()
        .iter()
        .zip(c2.channels())
        .map(|(&a, b)| {
            let d = a as i32 - b as i32;
            d * d
        })
        .sum();
    (sum as f64).sqrt()
}

/// Maximum colour distance a pixel may have from the seed and still join the region.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tolerance(f64);

impl Tolerance {
    pub const DEFAULT: Tolerance = Tolerance(30.0);

    pub fn new(value: f64) -> Result<Self, Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidTolerance(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Membership test used by the flood fill: `distance <= tolerance`.
    #[inline]
    pub fn accepts(self, c1: Pixel, c2: Pixel) -> bool {
        distance(c1, c2) <= self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        for v in [0u8, 1, 127, 254, 255] {
            let c = Pixel::new(v, 255 - v, v / 2);
            assert_eq!(distance(c, c), 0.0);
        }
    }

    #[test]
    fn black_to_white_is_the_maximum() {
        assert!((distance(Pixel::BLACK, Pixel::WHITE) - MAX_DISTANCE).abs() < 1e-9);
    }

    #[test]
    fn distance_is_euclidean_and_symmetric() {
        let a = Pixel::new(10, 20, 30);
        let b = Pixel::new(13, 24, 30);
        assert_eq!(distance(a, b), 5.0);
        assert_eq!(distance(b, a), 5.0);
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let a = Pixel::new(0, 0, 0);
        let b = Pixel::new(3, 4, 0);
        assert!(Tolerance::new(5.0).unwrap().accepts(a, b));
        assert!(!Tolerance::new(4.999).unwrap().accepts(a, b));
    }

    #[test]
    fn rejects_negative_and_nan_tolerance() {
        assert!(matches!(Tolerance::new(-1.0), Err(Error::InvalidTolerance(_))));
        assert!(Tolerance::new(f64::NAN).is_err());
        assert_eq!(Tolerance::new(0.0).unwrap().value(), 0.0);
    }
}
