use controlmap::ControlMapError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VehicleError {
    #[error("Control mapping failed: {0}")]
    Mapping(#[from] ControlMapError),

    #[error("Invalid vehicle configuration: {0}")]
    InvalidConfig(String),
}
