use std::cell::{Ref, RefCell};
use std::rc::Rc;

use controlmap::{
    ControlMap, MapOptions, MapRange, ObjectHandle, OutputHandle, OutputProbe, OutputType,
    PropertyHandle, Side,
};
use log::{debug, info};

use crate::{Attitude, ControlInput, Engine, Gear, RcInput, RcMapper, Surface, VehicleError, PID};

pub const AILERON: &str = "/controls/flight/aileron";
pub const ELEVATOR: &str = "/controls/flight/elevator";
pub const ELEVATOR_TRIM: &str = "/controls/flight/elevator-trim";
pub const RUDDER: &str = "/controls/flight/rudder";
pub const FLAPS: &str = "/controls/flight/flaps";
pub const THROTTLE: &str = "/controls/engines/engine[0]/throttle";
pub const BRAKE_LEFT: &str = "/controls/gear/brake-left";
pub const BRAKE_RIGHT: &str = "/controls/gear/brake-right";
pub const BRAKE_PARKING: &str = "/controls/gear/brake-parking";
pub const AUTOPILOT_AILERON: &str = "/autopilot/internal/aileron";

/// Tunables for the built-in airplane.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleConfig {
    /// Seconds for the flaps to run full travel.
    pub flap_transition: f32,
    /// Seconds for primary surfaces to run full travel; zero for instant.
    pub surface_transition: f32,
    /// Authority of the elevator trim as a fraction of full elevator.
    pub trim_authority: f32,
    /// Maximum nose wheel deflection as a fraction of full steering.
    pub steering_authority: f32,
    /// Wing leveler gains and output limit.
    pub leveler_gains: (f32, f32, f32),
    pub leveler_limit: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        VehicleConfig {
            flap_transition: 4.0,
            surface_transition: 0.0,
            trim_authority: 0.3,
            steering_authority: 0.6,
            leveler_gains: (1.5, 0.1, 0.05),
            leveler_limit: 0.5,
        }
    }
}

impl VehicleConfig {
    fn validate(&self) -> Result<(), VehicleError> {
        let fractions = [self.trim_authority, self.steering_authority, self.leveler_limit];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(VehicleError::InvalidConfig(format!(
                "authorities and limits must be within [0, 1], got {fractions:?}"
            )));
        }
        if self.flap_transition.is_nan() || self.surface_transition.is_nan() {
            return Err(VehicleError::InvalidConfig(
                "transition times must be numbers".to_string(),
            ));
        }
        Ok(())
    }
}

struct Inputs {
    aileron: PropertyHandle,
    elevator: PropertyHandle,
    elevator_trim: PropertyHandle,
    rudder: PropertyHandle,
    flaps: PropertyHandle,
    throttle: PropertyHandle,
    brake_left: PropertyHandle,
    brake_right: PropertyHandle,
    brake_parking: PropertyHandle,
    autopilot_aileron: PropertyHandle,
}

/// Output handles the host reads back for instruments.
#[derive(Debug, Clone, Copy)]
pub struct Outputs {
    pub aileron: OutputHandle,
    pub elevator: OutputHandle,
    pub rudder: OutputHandle,
    pub flaps: OutputHandle,
    pub throttle: OutputHandle,
    pub steering: OutputHandle,
    pub brake_left: OutputHandle,
    pub brake_right: OutputHandle,
}

/// A conventional single-engine airplane driven through a [`ControlMap`].
pub struct Vehicle {
    controls: ControlMap,
    inputs: Inputs,
    outputs: Outputs,

    wing: Rc<RefCell<Surface>>,
    hstab: Rc<RefCell<Surface>>,
    vstab: Rc<RefCell<Surface>>,
    engine: Rc<RefCell<Engine>>,
    nose_gear: Rc<RefCell<Gear>>,
    left_gear: Rc<RefCell<Gear>>,
    right_gear: Rc<RefCell<Gear>>,

    rc_mapper: RcMapper,
    control_input: ControlInput,
    elevator_trim: f32,
    parking_brake: bool,

    attitude: Attitude,
    wing_leveler: PID,
    autopilot_engaged: bool,
}

impl Vehicle {
    pub fn new(config: VehicleConfig) -> Result<Self, VehicleError> {
        config.validate()?;

        let mut controls = ControlMap::new();
        let inputs = Inputs {
            aileron: controls.property_handle(AILERON),
            elevator: controls.property_handle(ELEVATOR),
            elevator_trim: controls.property_handle(ELEVATOR_TRIM),
            rudder: controls.property_handle(RUDDER),
            flaps: controls.property_handle(FLAPS),
            throttle: controls.property_handle(THROTTLE),
            brake_left: controls.property_handle(BRAKE_LEFT),
            brake_right: controls.property_handle(BRAKE_RIGHT),
            brake_parking: controls.property_handle(BRAKE_PARKING),
            autopilot_aileron: controls.property_handle(AUTOPILOT_AILERON),
        };

        let wing = Rc::new(RefCell::new(Surface::default()));
        let hstab = Rc::new(RefCell::new(Surface::default()));
        let vstab = Rc::new(RefCell::new(Surface::default()));
        let engine = Rc::new(RefCell::new(Engine::default()));
        let nose_gear = Rc::new(RefCell::new(Gear::default()));
        let left_gear = Rc::new(RefCell::new(Gear::default()));
        let right_gear = Rc::new(RefCell::new(Gear::default()));

        let wing_id = controls.register_sink(wing.clone());
        let hstab_id = controls.register_sink(hstab.clone());
        let vstab_id = controls.register_sink(vstab.clone());
        let engine_id = controls.register_sink(engine.clone());
        let nose_id = controls.register_sink(nose_gear.clone());
        let left_id = controls.register_sink(left_gear.clone());
        let right_id = controls.register_sink(right_gear.clone());

        let objects = [wing_id, hstab_id, vstab_id, engine_id, nose_id, left_id, right_id];
        let outputs = Self::map_controls(&mut controls, &inputs, &config, objects)?;

        let (kp, ki, kd) = config.leveler_gains;
        info!(
            "vehicle configured: {} properties, {} outputs",
            controls.num_properties(),
            controls.num_outputs()
        );

        Ok(Vehicle {
            controls,
            inputs,
            outputs,
            wing,
            hstab,
            vstab,
            engine,
            nose_gear,
            left_gear,
            right_gear,
            rc_mapper: RcMapper::default(),
            control_input: ControlInput::default(),
            elevator_trim: 0.0,
            parking_brake: false,
            attitude: Attitude::default(),
            wing_leveler: PID::new(kp, ki, kd, config.leveler_limit),
            autopilot_engaged: false,
        })
    }

    fn map_controls(
        controls: &mut ControlMap,
        inputs: &Inputs,
        config: &VehicleConfig,
        objects: [ObjectHandle; 7],
    ) -> Result<Outputs, VehicleError> {
        let [wing, hstab, vstab, engine, nose, left, right] = objects;
        let none = MapOptions::empty();

        // Pilot and autopilot ailerons sum on the same split output.
        let aileron =
            controls.add_mapping(inputs.aileron, OutputType::Flap0, wing, MapOptions::SPLIT)?;
        controls.add_mapping(
            inputs.autopilot_aileron,
            OutputType::Flap0,
            wing,
            MapOptions::SPLIT,
        )?;

        let elevator =
            controls.add_mapping(inputs.elevator, OutputType::Flap0, hstab, MapOptions::INVERT)?;
        let trim = config.trim_authority;
        controls.add_mapping_range(
            inputs.elevator_trim,
            OutputType::Flap0,
            hstab,
            MapOptions::INVERT,
            MapRange::new(-1.0, 1.0, -trim, trim),
        )?;

        let rudder =
            controls.add_mapping(inputs.rudder, OutputType::Flap0, vstab, MapOptions::INVERT)?;
        let steer = config.steering_authority;
        let steering = controls.add_mapping_range(
            inputs.rudder,
            OutputType::Steer,
            nose,
            none,
            MapRange::new(-1.0, 1.0, -steer, steer),
        )?;

        let flaps = controls.add_mapping_range(
            inputs.flaps,
            OutputType::Flap1,
            wing,
            none,
            MapRange::new(0.0, 1.0, 0.0, 1.0),
        )?;
        let throttle = controls.add_mapping(inputs.throttle, OutputType::Throttle, engine, none)?;

        let brake_left = controls.add_mapping(inputs.brake_left, OutputType::Brake, left, none)?;
        let brake_right = controls.add_mapping(inputs.brake_right, OutputType::Brake, right, none)?;
        controls.add_mapping(inputs.brake_parking, OutputType::Brake, left, none)?;
        controls.add_mapping(inputs.brake_parking, OutputType::Brake, right, none)?;

        controls.set_transition_time(flaps, config.flap_transition)?;
        for surface in [aileron, elevator, rudder] {
            controls.set_transition_time(surface, config.surface_transition)?;
        }

        Ok(Outputs {
            aileron,
            elevator,
            rudder,
            flaps,
            throttle,
            steering,
            brake_left,
            brake_right,
        })
    }

    pub fn update_rc_input(&mut self, rc_input: &RcInput) {
        self.control_input = self.rc_mapper.map(rc_input);
    }

    pub fn set_control_input(&mut self, input: ControlInput) {
        self.control_input = input;
    }

    pub fn get_control_input(&self) -> &ControlInput {
        &self.control_input
    }

    pub fn set_elevator_trim(&mut self, trim: f32) {
        self.elevator_trim = trim.clamp(-1.0, 1.0);
    }

    pub fn set_parking_brake(&mut self, engaged: bool) {
        self.parking_brake = engaged;
    }

    pub fn set_attitude(&mut self, attitude: Attitude) {
        self.attitude = attitude;
    }

    pub fn get_attitude(&self) -> &Attitude {
        &self.attitude
    }

    pub fn set_autopilot(&mut self, engaged: bool) {
        if engaged != self.autopilot_engaged {
            debug!("wing leveler {}", if engaged { "engaged" } else { "released" });
            self.wing_leveler.reset();
        }
        self.autopilot_engaged = engaged;
    }

    pub fn autopilot_engaged(&self) -> bool {
        self.autopilot_engaged
    }

    /// Run one frame: collect inputs, then apply them to the actuators.
    pub fn update(&mut self, dt: f32) {
        let input = self.control_input;
        let inputs = &self.inputs;
        let controls = &mut self.controls;

        controls.reset();
        controls.set_input(inputs.aileron, input.roll);
        controls.set_input(inputs.elevator, input.pitch);
        controls.set_input(inputs.elevator_trim, self.elevator_trim);
        controls.set_input(inputs.rudder, input.yaw);
        controls.set_input(inputs.flaps, input.flap);
        controls.set_input(inputs.throttle, input.throttle);
        controls.set_input(inputs.brake_left, input.brake_left);
        controls.set_input(inputs.brake_right, input.brake_right);
        controls.set_input(inputs.brake_parking, if self.parking_brake { 1.0 } else { 0.0 });

        if self.autopilot_engaged {
            let command = self.wing_leveler.update(-self.attitude.roll, dt);
            controls.set_input(inputs.autopilot_aileron, command);
        }

        controls.apply_controls(dt);
    }

    pub fn controls(&self) -> &ControlMap {
        &self.controls
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Flap position in degrees for the flap indicator.
    pub fn flap_indicator(&self, max_degrees: f32) -> f32 {
        let probe = OutputProbe::new(self.outputs.flaps, Side::Left)
            .with_range(-max_degrees, max_degrees);
        self.controls.probe(&probe).unwrap_or(0.0)
    }

    pub fn wing(&self) -> Ref<'_, Surface> {
        self.wing.borrow()
    }

    pub fn hstab(&self) -> Ref<'_, Surface> {
        self.hstab.borrow()
    }

    pub fn vstab(&self) -> Ref<'_, Surface> {
        self.vstab.borrow()
    }

    pub fn engine(&self) -> Ref<'_, Engine> {
        self.engine.borrow()
    }

    pub fn nose_gear(&self) -> Ref<'_, Gear> {
        self.nose_gear.borrow()
    }

    pub fn main_gear(&self) -> (Ref<'_, Gear>, Ref<'_, Gear>) {
        (self.left_gear.borrow(), self.right_gear.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vehicle() -> Vehicle {
        Vehicle::new(VehicleConfig::default()).expect("default config should be valid")
    }

    #[test]
    fn test_properties_are_registered() {
        let vehicle = vehicle();
        let names: Vec<&str> = vehicle.controls().properties().map(|(_, name)| name).collect();
        assert_eq!(names.len(), 10);
        assert_eq!(names[0], AILERON);
        assert_eq!(names[9], AUTOPILOT_AILERON);
        assert_eq!(vehicle.controls().num_outputs(), 8);
    }

    #[test]
    fn test_aileron_deflects_wing_differentially() {
        let mut vehicle = vehicle();
        vehicle.set_control_input(ControlInput {
            roll: 0.4,
            ..Default::default()
        });
        vehicle.update(0.02);

        let wing = vehicle.wing();
        assert_relative_eq!(wing.flap0.left, 0.4, epsilon = 1e-6);
        assert_eq!(
            wing.flap0.right, -wing.flap0.left,
            "split aileron should drive the right side opposite"
        );
    }

    #[test]
    fn test_elevator_and_trim_are_inverted() {
        let mut vehicle = vehicle();
        vehicle.set_control_input(ControlInput {
            pitch: 0.5,
            ..Default::default()
        });
        vehicle.set_elevator_trim(1.0);
        vehicle.update(0.02);

        assert_relative_eq!(vehicle.hstab().flap0.left, -0.8, epsilon = 1e-6);
        let elevator = vehicle.outputs().elevator;
        assert_relative_eq!(vehicle.controls().output(elevator).unwrap(), -0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_rudder_fans_out_to_steering() {
        let mut vehicle = vehicle();
        vehicle.set_control_input(ControlInput {
            yaw: 1.0,
            ..Default::default()
        });
        vehicle.update(0.02);

        assert_eq!(vehicle.vstab().flap0.left, -1.0);
        assert_eq!(vehicle.nose_gear().steer, 0.6);
    }

    #[test]
    fn test_flaps_travel_at_transition_rate() {
        let mut vehicle = vehicle();
        vehicle.set_control_input(ControlInput {
            flap: 1.0,
            ..Default::default()
        });

        // FLAP1 spans [-1, 1], so a four second sweep covers 0.5 per second.
        vehicle.update(1.0);
        assert_eq!(vehicle.wing().flap1.left, 0.5);
        assert_eq!(vehicle.flap_indicator(40.0), 20.0);

        vehicle.update(1.0);
        assert_eq!(vehicle.wing().flap1.left, 1.0);
        assert_eq!(vehicle.flap_indicator(40.0), 40.0);
    }

    #[test]
    fn test_brakes_sum_and_clamp() {
        let mut vehicle = vehicle();
        vehicle.set_control_input(ControlInput {
            brake_left: 0.7,
            ..Default::default()
        });
        vehicle.update(0.02);
        {
            let (left, right) = vehicle.main_gear();
            assert_eq!(left.brake, 0.7);
            assert_eq!(right.brake, 0.0);
        }

        vehicle.set_parking_brake(true);
        vehicle.update(0.02);
        let (left, right) = vehicle.main_gear();
        assert_eq!(left.brake, 1.0, "parking brake plus toe brake clamps at full");
        assert_eq!(right.brake, 1.0);
    }

    #[test]
    fn test_wing_leveler_counters_bank() {
        let mut vehicle = vehicle();
        vehicle.set_attitude(Attitude {
            roll: 0.2,
            ..Default::default()
        });
        vehicle.set_autopilot(true);
        vehicle.update(0.02);

        let wing = vehicle.wing();
        assert!(wing.flap0.left < 0.0, "right bank should command left aileron");
        assert!(wing.flap0.left >= -0.5, "leveler output is limited");
        assert_eq!(wing.flap0.right, -wing.flap0.left);
    }

    #[test]
    fn test_autopilot_released_stops_commanding() {
        let mut vehicle = vehicle();
        vehicle.set_attitude(Attitude {
            roll: 0.2,
            ..Default::default()
        });
        vehicle.set_autopilot(true);
        vehicle.update(0.02);
        vehicle.set_autopilot(false);
        vehicle.update(0.02);

        assert!(!vehicle.autopilot_engaged());
        assert_eq!(vehicle.wing().flap0.left, 0.0, "reset clears the stale autopilot command");
    }

    #[test]
    fn test_rc_input_drives_throttle() {
        let mut vehicle = vehicle();
        let mut rc = RcInput::default();
        rc.channels[3] = 600;
        vehicle.update_rc_input(&rc);
        vehicle.update(0.02);

        assert_relative_eq!(vehicle.engine().throttle, 0.6, epsilon = 1e-6);
        assert_eq!(vehicle.get_control_input().throttle, 0.6);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = VehicleConfig {
            trim_authority: 1.5,
            ..Default::default()
        };
        assert!(matches!(Vehicle::new(config), Err(VehicleError::InvalidConfig(_))));
    }
}
