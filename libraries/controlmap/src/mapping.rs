use bitflags::bitflags;

use crate::OutputType;

bitflags! {
    /// Per-mapping transform options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MapOptions: u8 {
        /// Drive the left and right sides differentially: the right side
        /// receives the negated contribution.
        const SPLIT = 0x01;
        /// Negate the contribution after range mapping.
        const INVERT = 0x02;
        /// Signed square (`v * |v|`) after range mapping.
        const SQUARE = 0x04;
    }
}

/// Piecewise-linear transform from an input interval onto an output interval.
///
/// Inputs are clamped to `[min(src0, src1), max(src0, src1)]` and mapped so
/// that `src0` lands on `dst0` and `src1` on `dst1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRange {
    pub src0: f32,
    pub src1: f32,
    pub dst0: f32,
    pub dst1: f32,
}

impl MapRange {
    pub fn new(src0: f32, src1: f32, dst0: f32, dst1: f32) -> Self {
        Self { src0, src1, dst0, dst1 }
    }

    /// Identity over the natural range of `output`.
    pub fn natural(output: OutputType) -> Self {
        let (min, max) = (output.range_min(), output.range_max());
        Self::new(min, max, min, max)
    }

    pub fn is_finite(&self) -> bool {
        self.src0.is_finite()
            && self.src1.is_finite()
            && self.dst0.is_finite()
            && self.dst1.is_finite()
    }

    pub fn apply(&self, value: f32) -> f32 {
        // Zero-width source: step at src0, which itself maps to dst0.
        if self.src0 == self.src1 {
            return if value > self.src0 { self.dst1 } else { self.dst0 };
        }

        let value = value.clamp(self.src0.min(self.src1), self.src0.max(self.src1));
        let t = (value - self.src0) / (self.src1 - self.src0);
        // Weighted form so both endpoints come out exact.
        self.dst0 * (1.0 - t) + self.dst1 * t
    }
}

/// One input-to-output association and the raw value set this frame.
#[derive(Debug, Clone)]
pub(crate) struct MapRec {
    pub(crate) options: MapOptions,
    pub(crate) range: MapRange,
    pub(crate) value: f32,
}

impl MapRec {
    pub(crate) fn new(options: MapOptions, range: MapRange) -> Self {
        Self { options, range, value: 0.0 }
    }

    /// Contribution of this mapping to its output's sum.
    pub(crate) fn contribution(&self) -> f32 {
        let mut value = self.range.apply(self.value);
        if self.options.contains(MapOptions::SQUARE) {
            value *= value.abs();
        }
        if self.options.contains(MapOptions::INVERT) {
            value = -value;
        }
        value
    }

    pub(crate) fn is_split(&self) -> bool {
        self.options.contains(MapOptions::SPLIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_range_endpoints_are_exact() {
        let range = MapRange::new(0.0, 1.0, 0.1, 0.7);
        assert_eq!(range.apply(0.0), 0.1, "src0 should map exactly to dst0");
        assert_eq!(range.apply(1.0), 0.7, "src1 should map exactly to dst1");
        assert_relative_eq!(range.apply(0.5), 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_range_clamps_input() {
        let range = MapRange::new(-1.0, 1.0, 0.0, 1.0);
        assert_eq!(range.apply(5.0), 1.0, "inputs above src1 clamp to dst1");
        assert_eq!(range.apply(-5.0), 0.0, "inputs below src0 clamp to dst0");
        assert_eq!(range.apply(0.0), 0.5);
    }

    #[test]
    fn test_reversed_source_interval() {
        // src0 > src1 still clamps with min/max and keeps the endpoint pairing.
        let range = MapRange::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(range.apply(1.0), 0.0);
        assert_eq!(range.apply(0.0), 1.0);
        assert_eq!(range.apply(2.0), 0.0);
        assert_eq!(range.apply(-2.0), 1.0);
        assert_relative_eq!(range.apply(0.25), 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_range_is_a_step() {
        let range = MapRange::new(0.5, 0.5, 0.0, 1.0);
        assert_eq!(range.apply(0.4), 0.0, "below the step maps to dst0");
        assert_eq!(range.apply(0.6), 1.0, "above the step maps to dst1");
        assert_eq!(range.apply(0.5), 0.0, "the step point itself maps to dst0");
    }

    #[test]
    fn test_square_keeps_sign_and_invert_negates() {
        let range = MapRange::natural(OutputType::Flap0);

        let mut square = MapRec::new(MapOptions::SQUARE, range);
        square.value = -0.5;
        assert_eq!(square.contribution(), -0.25, "square must preserve the sign");

        let mut both = MapRec::new(MapOptions::SQUARE | MapOptions::INVERT, range);
        both.value = 0.5;
        assert_eq!(both.contribution(), -0.25);

        // Squaring happens after range mapping, not before.
        let mut mapped = MapRec::new(MapOptions::SQUARE, MapRange::new(0.0, 1.0, 0.0, 0.5));
        mapped.value = 1.0;
        assert_eq!(mapped.contribution(), 0.25);
    }

    #[test]
    fn test_finite_check() {
        assert!(MapRange::new(0.0, 1.0, -1.0, 1.0).is_finite());
        assert!(!MapRange::new(0.0, f32::NAN, -1.0, 1.0).is_finite());
        assert!(!MapRange::new(0.0, 1.0, f32::INFINITY, 1.0).is_finite());
    }
}
