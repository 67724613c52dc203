use anyhow::{bail, Context};
use autopilot::{Attitude, Vehicle, VehicleConfig};
use clap::Parser;
use controlmap::OutputHandle;
use log::{debug, info};

mod script;

use script::Script;

#[derive(Parser, Debug)]
#[clap(version, about = "Headless software-in-the-loop run of the control mapping")]
struct Options {
    /// Number of frames to simulate.
    #[clap(long, default_value_t = 750)]
    frames: u32,

    /// Frame rate in Hz.
    #[clap(long, default_value_t = 50.0)]
    rate: f32,

    /// Seconds for the flaps to run full travel.
    #[clap(long, default_value_t = 4.0)]
    flap_transition: f32,

    /// Seconds for ailerons, elevator and rudder to run full travel.
    #[clap(long, default_value_t = 0.0)]
    surface_transition: f32,

    /// Engage the wing leveler once airborne.
    #[clap(long)]
    autopilot: bool,

    /// Log actuator positions every this many frames.
    #[clap(long, default_value_t = 25)]
    log_every: u32,
}

enum State {
    Initializing,
    Running,
    Stopping,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = Options::parse();
    run(&options)?;
    Ok(())
}

/// Steps the vehicle through the scripted departure and returns the number
/// of frames simulated.
fn run(options: &Options) -> anyhow::Result<u32> {
    if !(options.rate > 0.0) {
        bail!("frame rate must be positive, got {}", options.rate);
    }
    let dt = 1.0 / options.rate;

    let script = Script::departure();
    let mut state = State::Initializing;
    let mut vehicle = Option::None;
    let mut attitude = Attitude::default();
    let mut frame = 0;

    loop {
        match state {
            State::Initializing => {
                info!("Initializing...");
                let config = VehicleConfig {
                    flap_transition: options.flap_transition,
                    surface_transition: options.surface_transition,
                    ..Default::default()
                };
                vehicle = Some(Vehicle::new(config).context("failed to configure vehicle")?);
                state = State::Running;
            }
            State::Running => {
                if frame >= options.frames {
                    state = State::Stopping;
                    continue;
                }
                let vehicle = vehicle.as_mut().context("vehicle not initialized")?;
                let time = frame as f32 * dt;
                let keyframe = script.sample(time);

                vehicle.set_control_input(keyframe.input);
                vehicle.set_parking_brake(keyframe.parking_brake);
                if options.autopilot && time >= 12.0 && !vehicle.autopilot_engaged() {
                    let bank = attitude.roll.to_degrees();
                    info!("t={time:.2}s engaging wing leveler at {bank:.1} deg bank");
                    vehicle.set_autopilot(true);
                }
                vehicle.set_attitude(attitude);
                vehicle.update(dt);
                script::step_attitude(vehicle, &mut attitude, dt);

                if frame % options.log_every.max(1) == 0 {
                    log_frame(vehicle, time);
                } else {
                    debug!("t={time:.2}s roll {:.3} rad", attitude.roll);
                }

                frame += 1;
            }
            State::Stopping => {
                info!("Stopping after {frame} frames");
                break;
            }
        }
    }
    Ok(frame)
}

fn log_frame(vehicle: &Vehicle, time: f32) {
    let controls = vehicle.controls();
    let outputs = vehicle.outputs();
    let value = |handle: OutputHandle| controls.output(handle).unwrap_or(0.0);

    info!(
        "t={time:6.2}s thr {:.2} ail {:+.2}/{:+.2} elev {:+.2} rud {:+.2}",
        value(outputs.throttle),
        value(outputs.aileron),
        controls.output_r(outputs.aileron).unwrap_or(0.0),
        value(outputs.elevator),
        value(outputs.rudder),
    );
    info!(
        "t={time:6.2}s flap {:4.1} deg steer {:+.2} brakes {:.2}/{:.2}",
        vehicle.flap_indicator(40.0),
        value(outputs.steering),
        value(outputs.brake_left),
        value(outputs.brake_right),
    );
}
