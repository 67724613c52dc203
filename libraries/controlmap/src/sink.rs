use crate::OutputType;

/// Which half of a split output a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// An external object whose settings a [`crate::ControlMap`] drives.
///
/// The map writes both sides of every bound output once per
/// `apply_controls`, left first. Objects without a notion of left/right can
/// ignore [`Side::Right`].
///
/// Once a mapping is registered the map assumes it is the only writer of that
/// setting; nothing enforces this.
pub trait ActuatorSink {
    /// Set the value of `output` on this object.
    fn set_value(&mut self, output: OutputType, side: Side, value: f32);

    /// Whether this object has a setting for `output`. Mappings for types an
    /// object does not accept are rejected at registration time.
    fn accepts(&self, _output: OutputType) -> bool {
        true
    }
}
