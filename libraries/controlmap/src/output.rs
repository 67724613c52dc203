use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::ControlMapError;

/// Every actuator setting a mapping can drive.
///
/// The textual form is the upper-case name used by aircraft configuration
/// files (`THROTTLE`, `FLAP0`, `REVERSE_THRUST`, ...). Parsing ignores case.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum OutputType {
    Throttle,
    Mixture,
    CondLever,
    Starter,
    Magnetos,
    Advance,
    Reheat,
    Prop,
    Brake,
    Steer,
    Extend,
    HExtend,
    LExtend,
    LAccel,
    Incidence,
    Flap0,
    Flap1,
    Slat,
    Spoiler,
    Vector,
    Flap0Effectiveness,
    Flap1Effectiveness,
    Boost,
    Castering,
    PropPitch,
    PropFeather,
    Collective,
    CyclicAil,
    CyclicEle,
    RotorEngineOn,
    TiltYaw,
    TiltPitch,
    TiltRoll,
    RotorBrake,
    RotorEngineMaxRelTorque,
    RotorRelTarget,
    RotorBalance,
    #[strum(serialize = "REVERSE_THRUST")]
    ReverseThrust,
    Wastegate,
    WinchRelSpeed,
    HitchOpen,
    PlaceWinch,
    FindAiTow,
}

impl OutputType {
    /// Resolve a configuration name such as `"flap0"` or `"REVERSE_THRUST"`.
    pub fn from_name(name: &str) -> Result<Self, ControlMapError> {
        name.trim()
            .parse()
            .map_err(|_| ControlMapError::UnknownOutputType(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Lower bound of the natural range. Ailerons and other bidirectional
    /// surfaces go down to -1, throttles never go below zero.
    pub fn range_min(self) -> f32 {
        use OutputType::*;
        match self {
            Flap0 | Flap1 | Steer | CyclicAil | CyclicEle | Collective | WinchRelSpeed
            | TiltYaw | TiltPitch | TiltRoll | RotorBalance => -1.0,
            Flap0Effectiveness | Flap1Effectiveness => 1.0,
            _ => 0.0,
        }
    }

    pub fn range_max(self) -> f32 {
        use OutputType::*;
        match self {
            Magnetos => 3.0,
            Flap0Effectiveness | Flap1Effectiveness => 10.0,
            _ => 1.0,
        }
    }

    /// Width of the natural range, i.e. the distance a full sweep covers.
    pub fn span(self) -> f32 {
        self.range_max() - self.range_min()
    }
}

pub fn range_min(output: OutputType) -> f32 {
    output.range_min()
}

pub fn range_max(output: OutputType) -> f32 {
    output.range_max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_names_round_trip() {
        assert_eq!(OutputType::Flap0.name(), "FLAP0");
        assert_eq!(OutputType::Flap0Effectiveness.name(), "FLAP0EFFECTIVENESS");
        assert_eq!(OutputType::ReverseThrust.name(), "REVERSE_THRUST");
        assert_eq!(OutputType::FindAiTow.to_string(), "FINDAITOW");

        for output in OutputType::iter() {
            assert_eq!(
                OutputType::from_name(output.name()),
                Ok(output),
                "{output} should parse from its own name"
            );
        }
    }

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!(OutputType::from_name("throttle"), Ok(OutputType::Throttle));
        assert_eq!(OutputType::from_name(" Spoiler "), Ok(OutputType::Spoiler));
        assert_eq!(OutputType::from_name("reverse_thrust"), Ok(OutputType::ReverseThrust));
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert_eq!(
            OutputType::from_name("AILERON"),
            Err(ControlMapError::UnknownOutputType("AILERON".to_string()))
        );
    }

    #[test]
    fn test_natural_ranges() {
        assert_eq!((range_min(OutputType::Throttle), range_max(OutputType::Throttle)), (0.0, 1.0));
        assert_eq!((range_min(OutputType::Flap0), range_max(OutputType::Flap0)), (-1.0, 1.0));
        assert_eq!((range_min(OutputType::Steer), range_max(OutputType::Steer)), (-1.0, 1.0));
        assert_eq!((range_min(OutputType::Magnetos), range_max(OutputType::Magnetos)), (0.0, 3.0));
        assert_eq!(OutputType::Flap1Effectiveness.span(), 9.0);

        for output in OutputType::iter() {
            assert!(output.span() > 0.0, "{output} must have a non-empty range");
        }
    }
}
