/// Aircraft attitude in radians and radians per second.
#[derive(Default, Debug, Clone, Copy)]
pub struct Attitude {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,

    pub roll_rate: f32,
    pub pitch_rate: f32,
    pub yaw_rate: f32,
}

impl Attitude {
    /// Advance the angles by the current rates.
    pub fn integrate(&mut self, dt: f32) {
        self.roll += self.roll_rate * dt;
        self.pitch += self.pitch_rate * dt;
        self.yaw += self.yaw_rate * dt;
    }
}
