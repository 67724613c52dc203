use crate::{OutputHandle, Side};

/// A read-out of one side of an output, optionally rescaled from the
/// output type's natural range onto `[min, max]`.
///
/// Instruments and animations bind to these instead of to raw outputs, e.g.
/// a flap indicator reading `FLAP1` in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputProbe {
    pub handle: OutputHandle,
    pub side: Side,
    pub range: Option<(f32, f32)>,
}

impl OutputProbe {
    pub fn new(handle: OutputHandle, side: Side) -> Self {
        Self { handle, side, range: None }
    }

    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.range = Some((min, max));
        self
    }
}
