mod actuators;
mod attitude;
mod control;
mod error;
mod pid;
mod rc;
mod vehicle;

pub use actuators::{Deflection, Engine, Gear, Surface};
pub use attitude::Attitude;
pub use control::ControlInput;
pub use error::VehicleError;
pub use pid::PID;
pub use rc::{ChannelLayout, RcInput, RcMapper};
pub use vehicle::{Outputs, Vehicle, VehicleConfig};
pub use vehicle::{
    AILERON, AUTOPILOT_AILERON, BRAKE_LEFT, BRAKE_PARKING, BRAKE_RIGHT, ELEVATOR, ELEVATOR_TRIM,
    FLAPS, RUDDER, THROTTLE,
};
