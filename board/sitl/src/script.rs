use autopilot::{Attitude, ControlInput, Vehicle};

/// One step of the scripted pilot: hold `input` from `at` seconds onward.
#[derive(Debug, Clone, Copy)]
pub struct Keyframe {
    pub at: f32,
    pub input: ControlInput,
    pub parking_brake: bool,
}

/// A taxi, takeoff roll and climbing turn, long enough to exercise every
/// mapped control.
pub struct Script {
    keyframes: Vec<Keyframe>,
}

impl Script {
    pub fn departure() -> Self {
        let hold = ControlInput::default();
        let taxi = ControlInput {
            throttle: 0.3,
            yaw: -0.4,
            ..hold
        };
        let line_up = ControlInput {
            throttle: 0.1,
            brake_left: 0.8,
            brake_right: 0.8,
            flap: 0.5,
            ..hold
        };
        let roll = ControlInput {
            throttle: 1.0,
            flap: 0.5,
            ..hold
        };
        let rotate = ControlInput {
            pitch: -0.4,
            ..roll
        };
        let turn = ControlInput {
            throttle: 0.9,
            roll: 0.3,
            pitch: -0.2,
            flap: 0.0,
            ..hold
        };
        let level = ControlInput {
            throttle: 0.8,
            ..hold
        };

        Script {
            keyframes: vec![
                Keyframe { at: 0.0, input: hold, parking_brake: true },
                Keyframe { at: 1.0, input: taxi, parking_brake: false },
                Keyframe { at: 3.0, input: line_up, parking_brake: false },
                Keyframe { at: 5.0, input: roll, parking_brake: false },
                Keyframe { at: 8.0, input: rotate, parking_brake: false },
                Keyframe { at: 9.0, input: turn, parking_brake: false },
                Keyframe { at: 12.0, input: level, parking_brake: false },
            ],
        }
    }

    pub fn sample(&self, time: f32) -> Keyframe {
        self.keyframes
            .iter()
            .rev()
            .find(|k| k.at <= time)
            .or(self.keyframes.first())
            .copied()
            .unwrap_or(Keyframe {
                at: 0.0,
                input: ControlInput::default(),
                parking_brake: false,
            })
    }
}

/// Rad/s of roll at full aileron.
const ROLL_AUTHORITY: f32 = 0.8;
/// Rad/s of pitch at full elevator.
const PITCH_AUTHORITY: f32 = 0.4;

/// Crude rate response so the wing leveler has something to level.
pub fn step_attitude(vehicle: &Vehicle, attitude: &mut Attitude, dt: f32) {
    attitude.roll_rate = vehicle.wing().flap0.left * ROLL_AUTHORITY;
    attitude.pitch_rate = -vehicle.hstab().flap0.left * PITCH_AUTHORITY;
    attitude.integrate(dt);
}
