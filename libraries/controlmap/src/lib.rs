//! # ControlMap
//!
//! Runtime mapping from named control inputs (pilot sticks, autopilot
//! channels, switches) onto actuator outputs of a flight dynamics model.
//!
//! Each simulation frame follows the same sequence:
//!
//! 1. [`ControlMap::reset`] clears the raw value of every mapping.
//! 2. [`ControlMap::set_input`] records this frame's value for each input.
//! 3. [`ControlMap::apply_controls`] range-maps, sums, clamps and rate-limits
//!    every output, then writes the result to the bound [`ActuatorSink`].

mod control_map;
mod error;
mod mapping;
mod output;
mod probe;
mod sink;

pub use control_map::{ControlMap, ObjectHandle, OutputHandle, PropertyHandle, SOLVE_DT};
pub use error::ControlMapError;
pub use mapping::{MapOptions, MapRange};
pub use output::{range_max, range_min, OutputType};
pub use probe::OutputProbe;
pub use sink::{ActuatorSink, Side};
