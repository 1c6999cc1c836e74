use crate::{channel::ChannelId, monitor::TankId};

/// Problems found while resolving or validating tank configuration.
///
/// A monitor is never constructed when one of these is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub enum ConfigurationError {
    #[error("A tank must have at least one probe")]
    EmptyProbeSet,

    #[error("Probe rank {rank} does not increase on the previous probe")]
    DuplicateRank { rank: u8 },

    #[error("Channel {0} is assigned to more than one probe")]
    ChannelReused(ChannelId),

    #[error("Tank \"{0}\" is configured more than once")]
    DuplicateTank(TankId),

    #[error("Too many tanks (max {max})")]
    TooManyTanks { max: usize },

    #[error("Too many channels across all tanks (max {max})")]
    TooManyChannels { max: usize },

    #[error("Too many probes in one tank (max {max})")]
    TooManyProbes { max: usize },

    #[error("Tank identifier is too long (max {max} bytes)")]
    TankIdTooLong { max: usize },

    #[error("Probe label is too long (max {max} bytes)")]
    LabelTooLong { max: usize },

    #[error("Expected {expected} labels, got {actual}")]
    LabelCountMismatch { expected: usize, actual: usize },

    #[error("No reading for channel {0}")]
    MissingReading(ChannelId),
}

/// Failure to obtain the state of an input channel.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub enum ReadError {
    #[error("Hardware fault reading channel {0}")]
    HardwareFault(ChannelId),

    #[error("Timeout reading channel {0}")]
    Timeout(ChannelId),

    #[error("Channel {0} is not available")]
    Unavailable(ChannelId),
}

impl ReadError {
    /// The channel that could not be read.
    pub fn channel(&self) -> ChannelId {
        match self {
            Self::HardwareFault(c) | Self::Timeout(c) | Self::Unavailable(c) => *c,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Read error: {0}")]
    Read(#[from] ReadError),
}
