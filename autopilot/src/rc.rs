use crate::ControlInput;

#[derive(Debug, Clone, Copy)]
pub struct RcInput {
    pub channels: [i16; 32],
}

impl Default for RcInput {
    fn default() -> Self {
        RcInput { channels: [0; 32] }
    }
}

/// Receiver channel assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelLayout {
    pub roll: usize,
    pub pitch: usize,
    pub yaw: usize,
    pub throttle: usize,
    pub flap: usize,
    pub brake_left: usize,
    pub brake_right: usize,
}

impl Default for ChannelLayout {
    fn default() -> Self {
        ChannelLayout {
            roll: 0,
            pitch: 1,
            yaw: 2,
            throttle: 3,
            flap: 5,
            brake_left: 6,
            brake_right: 7,
        }
    }
}

#[derive(Default, Debug)]
pub struct RcMapper {
    layout: ChannelLayout,
}

impl RcMapper {
    pub fn new(layout: ChannelLayout) -> Self {
        RcMapper { layout }
    }

    pub fn map(&self, input: &RcInput) -> ControlInput {
        let channel = |index: usize| input.channels.get(index).copied().unwrap_or(0);
        ControlInput {
            roll: ControlInput::scale_stick(channel(self.layout.roll)),
            pitch: ControlInput::scale_stick(channel(self.layout.pitch)),
            yaw: ControlInput::scale_stick(channel(self.layout.yaw)),
            throttle: ControlInput::scale_lever(channel(self.layout.throttle)),
            flap: ControlInput::scale_lever(channel(self.layout.flap)),
            brake_left: ControlInput::scale_lever(channel(self.layout.brake_left)),
            brake_right: ControlInput::scale_lever(channel(self.layout.brake_right)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let mut rc = RcInput::default();
        rc.channels[0] = -500;
        rc.channels[3] = 750;
        rc.channels[5] = 1000;
        rc.channels[7] = 200;

        let input = RcMapper::default().map(&rc);
        assert_eq!(input.roll, -0.5);
        assert_eq!(input.throttle, 0.75);
        assert_eq!(input.flap, 1.0);
        assert_eq!(input.brake_left, 0.0);
        assert_eq!(input.brake_right, 0.2);
    }

    #[test]
    fn test_out_of_range_channel_reads_zero() {
        let layout = ChannelLayout {
            flap: 40,
            ..ChannelLayout::default()
        };
        let mut rc = RcInput::default();
        rc.channels[5] = 1000;

        assert_eq!(RcMapper::new(layout).map(&rc).flap, 0.0);
    }
}
