use crate::error::ReadError;
use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

/// Identifies one digital input line, e.g. the GPIO number or optocoupler channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
#[serde(transparent)]
pub struct ChannelId(pub u8);

impl ChannelId {
    pub const fn value(&self) -> u8 {
        self.0
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl Display for ChannelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Electrical level at which a channel reports an active probe.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::IntoStaticStr,
    strum::EnumString,
)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Polarity {
    #[default]
    ActiveHigh,
    ActiveLow,
}

/// Pull resistor that holds an inactive line at its idle level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub enum Pull {
    Up,
    Down,
}

impl Polarity {
    /// Normalises an electrical level to "probe active".
    pub const fn is_active(&self, electrically_high: bool) -> bool {
        match self {
            Self::ActiveHigh => electrically_high,
            Self::ActiveLow => !electrically_high,
        }
    }

    pub const fn pull(&self) -> Pull {
        match self {
            Self::ActiveHigh => Pull::Down,
            Self::ActiveLow => Pull::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct Channel {
    id: ChannelId,
    polarity: Polarity,
}

impl Channel {
    pub const fn new(id: ChannelId, polarity: Polarity) -> Self {
        Self { id, polarity }
    }

    pub const fn active_high(id: u8) -> Self {
        Self::new(ChannelId(id), Polarity::ActiveHigh)
    }

    pub const fn active_low(id: u8) -> Self {
        Self::new(ChannelId(id), Polarity::ActiveLow)
    }

    pub const fn id(&self) -> ChannelId {
        self.id
    }

    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }
}

/// Source of the current state of input channels.
///
/// Implementations apply the channel's [`Polarity`] before returning, so
/// `true` always means the probe is active. Any timeout handling is also the
/// implementation's concern.
pub trait ChannelReader {
    fn read_channel(&mut self, channel: &Channel) -> Result<bool, ReadError>;
}

impl<F> ChannelReader for F
where
    F: FnMut(&Channel) -> Result<bool, ReadError>,
{
    fn read_channel(&mut self, channel: &Channel) -> Result<bool, ReadError> {
        self(channel)
    }
}
