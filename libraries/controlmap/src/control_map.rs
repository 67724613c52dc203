use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

use crate::mapping::MapRec;
use crate::{ActuatorSink, ControlMapError, MapOptions, MapRange, OutputProbe, OutputType, Side};

/// Time step used when solving for trim: large enough that every output
/// reaches its target in one call regardless of transition time.
pub const SOLVE_DT: f32 = 1e6;

/// Handle of a named input property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyHandle(usize);

/// Handle of an output record, i.e. one (object, type) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputHandle(usize);

/// Handle of a registered actuator sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(usize);

impl PropertyHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

impl OutputHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ObjectHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

struct Property {
    name: String,
    maps: Vec<usize>,
}

struct OutRec {
    output_type: OutputType,
    object: ObjectHandle,
    // Indices into `ControlMap::maps`, in registration order.
    maps: Vec<usize>,
    left: f32,
    right: f32,
    time: f32,
}

/// Aggregates control inputs into rate-limited actuator outputs.
///
/// Mappings live in a single arena; properties and outputs refer to them by
/// index, so one input can fan out to several outputs and one output can sum
/// several inputs.
#[derive(Default)]
pub struct ControlMap {
    properties: Vec<Property>,
    property_names: HashMap<String, PropertyHandle>,
    maps: Vec<MapRec>,
    outputs: Vec<OutRec>,
    output_index: HashMap<(ObjectHandle, OutputType), OutputHandle>,
    sinks: Vec<Rc<RefCell<dyn ActuatorSink>>>,
}

impl ControlMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an input property by name, or return the existing handle.
    pub fn property_handle(&mut self, name: &str) -> PropertyHandle {
        if let Some(&handle) = self.property_names.get(name) {
            return handle;
        }

        let handle = PropertyHandle(self.properties.len());
        self.properties.push(Property {
            name: name.to_string(),
            maps: Vec::new(),
        });
        self.property_names.insert(name.to_string(), handle);
        debug!("registered control property {name} as {}", handle.0);
        handle
    }

    pub fn num_properties(&self) -> usize {
        self.properties.len()
    }

    pub fn property_name(&self, handle: PropertyHandle) -> Option<&str> {
        self.properties.get(handle.0).map(|p| p.name.as_str())
    }

    /// All properties in registration order.
    pub fn properties(&self) -> impl Iterator<Item = (PropertyHandle, &str)> + '_ {
        self.properties
            .iter()
            .enumerate()
            .map(|(i, p)| (PropertyHandle(i), p.name.as_str()))
    }

    /// Bind an actuator object. The host keeps its own clone of the `Rc` to
    /// read the values written by [`ControlMap::apply_controls`].
    pub fn register_sink<S: ActuatorSink + 'static>(
        &mut self,
        sink: Rc<RefCell<S>>,
    ) -> ObjectHandle {
        let handle = ObjectHandle(self.sinks.len());
        self.sinks.push(sink);
        handle
    }

    /// Map `input` onto `output` of `object` over the output's natural range.
    pub fn add_mapping(
        &mut self,
        input: PropertyHandle,
        output: OutputType,
        object: ObjectHandle,
        options: MapOptions,
    ) -> Result<OutputHandle, ControlMapError> {
        self.add_mapping_range(input, output, object, options, MapRange::natural(output))
    }

    /// Map `input` onto `output` of `object` through an explicit range
    /// transform.
    ///
    /// Rejected mappings are logged and leave the map unchanged.
    pub fn add_mapping_range(
        &mut self,
        input: PropertyHandle,
        output: OutputType,
        object: ObjectHandle,
        options: MapOptions,
        range: MapRange,
    ) -> Result<OutputHandle, ControlMapError> {
        if let Err(err) = self.validate_mapping(input, output, object, &range) {
            warn!("rejected {output} mapping for property {}: {err}", input.0);
            return Err(err);
        }

        let handle = match self.output_index.get(&(object, output)) {
            Some(&handle) => handle,
            None => {
                let handle = OutputHandle(self.outputs.len());
                self.outputs.push(OutRec {
                    output_type: output,
                    object,
                    maps: Vec::new(),
                    left: 0.0,
                    right: 0.0,
                    time: 0.0,
                });
                self.output_index.insert((object, output), handle);
                handle
            }
        };

        let map = self.maps.len();
        self.maps.push(MapRec::new(options, range));
        self.outputs[handle.0].maps.push(map);
        self.properties[input.0].maps.push(map);

        debug!(
            "mapped {} -> {output} on object {} (output {}, {:?}, {range:?})",
            self.properties[input.0].name, object.0, handle.0, options
        );
        Ok(handle)
    }

    fn validate_mapping(
        &self,
        input: PropertyHandle,
        output: OutputType,
        object: ObjectHandle,
        range: &MapRange,
    ) -> Result<(), ControlMapError> {
        if input.0 >= self.properties.len() {
            return Err(ControlMapError::UnknownProperty(input.0));
        }

        let sink = self
            .sinks
            .get(object.0)
            .ok_or(ControlMapError::UnknownObject(object.0))?;
        let accepts = sink
            .try_borrow()
            .map_err(|_| ControlMapError::SinkBusy(object.0))?
            .accepts(output);
        if !accepts {
            return Err(ControlMapError::UnsupportedOutput { object: object.0, output });
        }

        if !range.is_finite() {
            return Err(ControlMapError::InvalidRange {
                src0: range.src0,
                src1: range.src1,
                dst0: range.dst0,
                dst1: range.dst1,
            });
        }
        Ok(())
    }

    /// Zero the raw value of every mapping. Call once per frame before the
    /// first [`ControlMap::set_input`]; skipping it carries last frame's
    /// inputs over.
    pub fn reset(&mut self) {
        for map in &mut self.maps {
            map.value = 0.0;
        }
    }

    /// Record this frame's value for `input`. A later call for the same
    /// input overwrites, it does not add.
    ///
    /// Returns `false` for an unknown handle or a non-finite value.
    pub fn set_input(&mut self, input: PropertyHandle, value: f32) -> bool {
        let Some(property) = self.properties.get(input.0) else {
            debug!("set_input on unknown property {}", input.0);
            return false;
        };
        if !value.is_finite() {
            debug!("ignoring non-finite value for {}", property.name);
            return false;
        }

        for &map in &property.maps {
            self.maps[map].value = value;
        }
        true
    }

    /// Compute and apply every output from the inputs set since the last
    /// [`ControlMap::reset`], moving at most one full-range sweep per
    /// transition time.
    ///
    /// A negative or non-finite `dt` counts as zero: rate-limited outputs
    /// hold their previous value.
    pub fn apply_controls(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            debug!("treating invalid time step {dt} as zero");
            0.0
        };

        for out in &mut self.outputs {
            let (min, max) = (out.output_type.range_min(), out.output_type.range_max());

            let mut left = 0.0;
            let mut right = 0.0;
            for &map in &out.maps {
                let rec = &self.maps[map];
                let value = rec.contribution();
                left += value;
                right += if rec.is_split() { -value } else { value };
            }
            let mut left = f32::clamp(left, min, max);
            let mut right = f32::clamp(right, min, max);

            if out.time > 0.0 {
                let max_step = (max - min) / out.time * dt;
                left = approach(out.left, left, max_step);
                right = approach(out.right, right, max_step);
            }
            out.left = left;
            out.right = right;

            match self.sinks[out.object.0].try_borrow_mut() {
                Ok(mut sink) => {
                    sink.set_value(out.output_type, Side::Left, left);
                    sink.set_value(out.output_type, Side::Right, right);
                }
                Err(_) => warn!(
                    "actuator {} busy, skipped {} update",
                    out.object.0, out.output_type
                ),
            }
        }
    }

    /// Apply with [`SOLVE_DT`] so every output lands on its target.
    pub fn settle(&mut self) {
        self.apply_controls(SOLVE_DT);
    }

    pub fn output_handle(&self, object: ObjectHandle, output: OutputType) -> Option<OutputHandle> {
        self.output_index.get(&(object, output)).copied()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn output_type(&self, handle: OutputHandle) -> Option<OutputType> {
        self.outputs.get(handle.0).map(|o| o.output_type)
    }

    /// Number of mappings summed into `handle`.
    pub fn mapping_count(&self, handle: OutputHandle) -> Option<usize> {
        self.outputs.get(handle.0).map(|o| o.maps.len())
    }

    /// Set the time for `handle` to sweep its full range. Zero or negative
    /// disables rate limiting.
    pub fn set_transition_time(
        &mut self,
        handle: OutputHandle,
        time: f32,
    ) -> Result<(), ControlMapError> {
        if time.is_nan() {
            return Err(ControlMapError::InvalidTransitionTime(time));
        }
        let out = self
            .outputs
            .get_mut(handle.0)
            .ok_or(ControlMapError::UnknownOutput(handle.0))?;
        out.time = time;
        Ok(())
    }

    pub fn transition_time(&self, handle: OutputHandle) -> Option<f32> {
        self.outputs.get(handle.0).map(|o| o.time)
    }

    /// Left (or only) value as of the last [`ControlMap::apply_controls`].
    pub fn output(&self, handle: OutputHandle) -> Option<f32> {
        self.outputs.get(handle.0).map(|o| o.left)
    }

    /// Right value; differs from [`ControlMap::output`] only when SPLIT
    /// mappings feed the output.
    pub fn output_r(&self, handle: OutputHandle) -> Option<f32> {
        self.outputs.get(handle.0).map(|o| o.right)
    }

    pub fn probe(&self, probe: &OutputProbe) -> Option<f32> {
        let out = self.outputs.get(probe.handle.0)?;
        let value = match probe.side {
            Side::Left => out.left,
            Side::Right => out.right,
        };
        Some(match probe.range {
            Some((lo, hi)) => {
                let frac = (value - out.output_type.range_min()) / out.output_type.span();
                lo + frac * (hi - lo)
            }
            None => value,
        })
    }
}

fn approach(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = target - current;
    if delta.abs() > max_step {
        current + max_step.copysign(delta)
    } else {
        target
    }
}
