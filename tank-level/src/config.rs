use crate::{
    channel::{Channel, ChannelId, Polarity},
    error::ConfigurationError,
    monitor::{TankId, TankMonitor},
    probe_set::{Label, ProbeSet, DEFAULT_LABELS},
    MAX_CHANNELS, MAX_TANKS, MAX_TANK_ID_LEN,
};
use heapless::Vec;
use serde::{Deserialize, Serialize};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// Tank layout and timing for a monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct MonitorConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Time an input must hold a new state before it is accepted, 0 to disable.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    pub tanks: Vec<TankConfig, MAX_TANKS>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct TankConfig {
    pub id: TankId,

    /// Probes from lowest to highest.
    pub probes: Vec<ProbeConfig, MAX_CHANNELS>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Label, MAX_CHANNELS>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct ProbeConfig {
    pub channel: ChannelId,

    #[serde(default)]
    pub polarity: Polarity,
}

impl From<ProbeConfig> for Channel {
    fn from(probe: ProbeConfig) -> Self {
        Channel::new(probe.channel, probe.polarity)
    }
}

impl MonitorConfig {
    /// A fresh water tank on channels 0 to 3 and a grey water tank on 4 to 7,
    /// each with empty, one third, two thirds and full probes.
    pub fn fresh_and_grey() -> Result<Self, ConfigurationError> {
        let mut tanks = Vec::new();

        for (id, first) in [("fresh", 0u8), ("grey", 4u8)] {
            let channels: [Channel; 4] =
                core::array::from_fn(|i| Channel::active_high(first + i as u8));
            tanks
                .push(TankConfig::new(id, &channels)?)
                .map_err(|_| ConfigurationError::TooManyTanks { max: MAX_TANKS })?;
        }

        Ok(Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            tanks,
        })
    }

    /// Resolves every tank into a [`ProbeSet`] and configures a monitor from them.
    pub fn build(&self) -> Result<TankMonitor, ConfigurationError> {
        let mut tanks = Vec::<(&str, ProbeSet), MAX_TANKS>::new();

        for tank in &self.tanks {
            tanks
                .push((tank.id.as_str(), tank.probe_set()?))
                .map_err(|_| ConfigurationError::TooManyTanks { max: MAX_TANKS })?;
        }

        TankMonitor::configure(tanks)
    }

    /// Every channel used by any tank, with its polarity.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.tanks
            .iter()
            .flat_map(|t| t.probes.iter().map(|p| Channel::from(*p)))
    }
}

impl TankConfig {
    pub fn new(id: &str, channels: &[Channel]) -> Result<Self, ConfigurationError> {
        let id = id
            .try_into()
            .map_err(|_| ConfigurationError::TankIdTooLong {
                max: MAX_TANK_ID_LEN,
            })?;

        let mut probes = Vec::new();
        for channel in channels {
            probes
                .push(ProbeConfig {
                    channel: channel.id(),
                    polarity: channel.polarity(),
                })
                .map_err(|_| ConfigurationError::TooManyProbes { max: MAX_CHANNELS })?;
        }

        Ok(Self {
            id,
            probes,
            labels: None,
        })
    }

    /// Ranks follow the order of `probes`. Four probe tanks without labels
    /// get the empty, one third, two thirds and full labels.
    pub fn probe_set(&self) -> Result<ProbeSet, ConfigurationError> {
        let channels: Vec<Channel, MAX_CHANNELS> =
            self.probes.iter().map(|p| Channel::from(*p)).collect();
        let set = ProbeSet::from_channels(&channels)?;

        match &self.labels {
            Some(labels) => {
                let labels: Vec<&str, MAX_CHANNELS> =
                    labels.iter().map(|l| l.as_str()).collect();
                set.with_labels(&labels)
            }
            None if set.probe_count() == DEFAULT_LABELS.len() => {
                set.with_labels(&DEFAULT_LABELS)
            }
            None => Ok(set),
        }
    }
}
