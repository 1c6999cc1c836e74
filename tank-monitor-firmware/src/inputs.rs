use defmt::{debug, warn};
use embassy_rp::{
    Peri,
    gpio::{AnyPin, Input, Pull},
};
use tank_level::{Channel, ChannelReader, MAX_CHANNELS, ReadError};

/// Reads probe channels from GPIO, channel `n` being the `n`th pin given.
///
/// Only channels a tank uses are configured as inputs, with the pull that
/// holds the line at its inactive level.
pub(crate) struct GpioChannelReader {
    inputs: [Option<Input<'static>>; MAX_CHANNELS],
}

impl GpioChannelReader {
    pub(crate) fn new(
        pins: [Peri<'static, AnyPin>; MAX_CHANNELS],
        channels: impl Iterator<Item = Channel>,
    ) -> Self {
        let mut pins = pins.map(Some);
        let mut inputs: [Option<Input<'static>>; MAX_CHANNELS] = core::array::from_fn(|_| None);

        for channel in channels {
            let idx = channel.id().index();

            match pins.get_mut(idx).and_then(Option::take) {
                Some(pin) => {
                    let pull = match channel.polarity().pull() {
                        tank_level::Pull::Up => Pull::Up,
                        tank_level::Pull::Down => Pull::Down,
                    };
                    debug!("Channel {} is an input with pull {}", channel.id(), pull);
                    inputs[idx] = Some(Input::new(pin, pull));
                }
                None => warn!("No input pin for channel {}", channel.id()),
            }
        }

        Self { inputs }
    }
}

impl ChannelReader for GpioChannelReader {
    fn read_channel(&mut self, channel: &Channel) -> Result<bool, ReadError> {
        self.inputs
            .get(channel.id().index())
            .and_then(Option::as_ref)
            .map(|input| channel.polarity().is_active(input.is_high()))
            .ok_or(ReadError::Unavailable(channel.id()))
    }
}
