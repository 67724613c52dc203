/// Normalized pilot controls for one frame.
///
/// Sticks and pedals are in [-1, 1], levers and brakes in [0, 1].
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct ControlInput {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub throttle: f32,
    pub flap: f32,
    pub brake_left: f32,
    pub brake_right: f32,
}

impl ControlInput {
    /// Full-scale RC stick deflection.
    pub const RC_FULL_SCALE: f32 = 1000.0;

    /// Convert a raw ±1000 stick reading.
    pub fn scale_stick(raw: i16) -> f32 {
        (raw as f32 / Self::RC_FULL_SCALE).clamp(-1.0, 1.0)
    }

    /// Convert a raw 0..1000 lever reading.
    pub fn scale_lever(raw: i16) -> f32 {
        (raw as f32 / Self::RC_FULL_SCALE).clamp(0.0, 1.0)
    }
}
