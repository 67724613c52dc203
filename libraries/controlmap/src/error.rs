use thiserror::Error;

use crate::OutputType;

/// Configuration errors raised while building a [`crate::ControlMap`].
///
/// Per-frame calls never return these; lookups that miss during a frame
/// report `None` or `false` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlMapError {
    #[error("Unknown input property handle {0}")]
    UnknownProperty(usize),

    #[error("No actuator registered under object handle {0}")]
    UnknownObject(usize),

    #[error("Unknown output handle {0}")]
    UnknownOutput(usize),

    #[error("Unknown control output type \"{0}\"")]
    UnknownOutputType(String),

    #[error("Actuator {object} does not accept {output} outputs")]
    UnsupportedOutput { object: usize, output: OutputType },

    #[error("Actuator {0} is already borrowed by the host")]
    SinkBusy(usize),

    #[error("Invalid mapping range: [{src0}, {src1}] -> [{dst0}, {dst1}] must be finite")]
    InvalidRange {
        src0: f32,
        src1: f32,
        dst0: f32,
        dst1: f32,
    },

    #[error("Invalid transition time: {0} is not a number")]
    InvalidTransitionTime(f32),
}
