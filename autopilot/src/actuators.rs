use controlmap::{ActuatorSink, OutputType, Side};

/// Left/right pair of a split setting. Unsplit settings read the same on
/// both sides.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Deflection {
    pub left: f32,
    pub right: f32,
}

impl Deflection {
    fn set(&mut self, side: Side, value: f32) {
        match side {
            Side::Left => self.left = value,
            Side::Right => self.right = value,
        }
    }
}

/// A lifting surface: wing, horizontal or vertical stabilizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub flap0: Deflection,
    pub flap1: Deflection,
    pub slat: Deflection,
    pub spoiler: Deflection,
    pub incidence: f32,
    pub flap0_effectiveness: f32,
    pub flap1_effectiveness: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            flap0: Deflection::default(),
            flap1: Deflection::default(),
            slat: Deflection::default(),
            spoiler: Deflection::default(),
            incidence: 0.0,
            flap0_effectiveness: 1.0,
            flap1_effectiveness: 1.0,
        }
    }
}

impl ActuatorSink for Surface {
    fn set_value(&mut self, output: OutputType, side: Side, value: f32) {
        match output {
            OutputType::Flap0 => self.flap0.set(side, value),
            OutputType::Flap1 => self.flap1.set(side, value),
            OutputType::Slat => self.slat.set(side, value),
            OutputType::Spoiler => self.spoiler.set(side, value),
            OutputType::Incidence if side == Side::Left => self.incidence = value,
            OutputType::Flap0Effectiveness if side == Side::Left => {
                self.flap0_effectiveness = value
            }
            OutputType::Flap1Effectiveness if side == Side::Left => {
                self.flap1_effectiveness = value
            }
            _ => {}
        }
    }

    fn accepts(&self, output: OutputType) -> bool {
        matches!(
            output,
            OutputType::Flap0
                | OutputType::Flap1
                | OutputType::Slat
                | OutputType::Spoiler
                | OutputType::Incidence
                | OutputType::Flap0Effectiveness
                | OutputType::Flap1Effectiveness
        )
    }
}

/// A piston or turbine engine with its propeller.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Engine {
    pub throttle: f32,
    pub mixture: f32,
    pub cond_lever: f32,
    pub starter: bool,
    pub magnetos: u8,
    pub advance: f32,
    pub reheat: f32,
    pub boost: f32,
    pub prop_pitch: f32,
    pub prop_feather: bool,
    pub reverse: bool,
    pub wastegate: f32,
}

impl ActuatorSink for Engine {
    fn set_value(&mut self, output: OutputType, side: Side, value: f32) {
        if side != Side::Left {
            return;
        }
        match output {
            OutputType::Throttle => self.throttle = value,
            OutputType::Mixture => self.mixture = value,
            OutputType::CondLever => self.cond_lever = value,
            OutputType::Starter => self.starter = value != 0.0,
            OutputType::Magnetos => self.magnetos = value.round() as u8,
            OutputType::Advance | OutputType::Prop => self.advance = value,
            OutputType::Reheat => self.reheat = value,
            OutputType::Boost => self.boost = value,
            OutputType::PropPitch => self.prop_pitch = value,
            OutputType::PropFeather => self.prop_feather = value != 0.0,
            OutputType::ReverseThrust => self.reverse = value != 0.0,
            OutputType::Wastegate => self.wastegate = value,
            _ => {}
        }
    }

    fn accepts(&self, output: OutputType) -> bool {
        matches!(
            output,
            OutputType::Throttle
                | OutputType::Mixture
                | OutputType::CondLever
                | OutputType::Starter
                | OutputType::Magnetos
                | OutputType::Advance
                | OutputType::Prop
                | OutputType::Reheat
                | OutputType::Boost
                | OutputType::PropPitch
                | OutputType::PropFeather
                | OutputType::ReverseThrust
                | OutputType::Wastegate
        )
    }
}

/// One landing gear leg.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Gear {
    pub brake: f32,
    pub steer: f32,
    pub extension: f32,
    pub castering: bool,
}

impl ActuatorSink for Gear {
    fn set_value(&mut self, output: OutputType, side: Side, value: f32) {
        if side != Side::Left {
            return;
        }
        match output {
            OutputType::Brake => self.brake = value,
            OutputType::Steer => self.steer = value,
            OutputType::Extend => self.extension = value,
            OutputType::Castering => self.castering = value != 0.0,
            _ => {}
        }
    }

    fn accepts(&self, output: OutputType) -> bool {
        matches!(
            output,
            OutputType::Brake | OutputType::Steer | OutputType::Extend | OutputType::Castering
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_split_sides() {
        let mut wing = Surface::default();
        wing.set_value(OutputType::Flap0, Side::Left, 0.3);
        wing.set_value(OutputType::Flap0, Side::Right, -0.3);
        wing.set_value(OutputType::Incidence, Side::Right, 5.0);

        assert_eq!(wing.flap0, Deflection { left: 0.3, right: -0.3 });
        assert_eq!(wing.incidence, 0.0, "incidence only follows the left side");
        assert_eq!(wing.flap1_effectiveness, 1.0);
    }

    #[test]
    fn test_engine_switches() {
        let mut engine = Engine::default();
        engine.set_value(OutputType::Magnetos, Side::Left, 2.6);
        engine.set_value(OutputType::Starter, Side::Left, 1.0);
        engine.set_value(OutputType::Throttle, Side::Right, 0.9);

        assert_eq!(engine.magnetos, 3);
        assert!(engine.starter);
        assert_eq!(engine.throttle, 0.0, "engines ignore the right side");
        assert!(!engine.accepts(OutputType::Flap0));
    }

    #[test]
    fn test_gear_accepts_only_gear_settings() {
        let gear = Gear::default();
        assert!(gear.accepts(OutputType::Brake));
        assert!(gear.accepts(OutputType::Steer));
        assert!(!gear.accepts(OutputType::Throttle));
    }
}
