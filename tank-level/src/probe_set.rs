use crate::{
    channel::{Channel, ChannelId, ChannelReader},
    error::{ConfigurationError, Error},
    level::Level,
    MAX_CHANNELS, MAX_LABEL_LEN,
};
use heapless::{LinearMap, String, Vec};
use serde::{Deserialize, Serialize};

/// Labels given to a four probe tank when none are configured.
pub const DEFAULT_LABELS: [&str; 4] = ["empty", "one_third", "two_thirds", "full"];

pub type Label = String<MAX_LABEL_LEN>;

/// A single level sensor at a fixed height in a tank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct Probe {
    rank: u8,
    channel: Channel,
    pub(crate) label: Option<Label>,
}

impl Probe {
    /// `rank` is the probe's height order in the tank, 0 being the lowest.
    pub const fn new(rank: u8, channel: Channel) -> Self {
        Self {
            rank,
            channel,
            label: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Result<Self, ConfigurationError> {
        self.label = Some(
            label
                .try_into()
                .map_err(|_| ConfigurationError::LabelTooLong { max: MAX_LABEL_LEN })?,
        );
        Ok(self)
    }

    pub const fn rank(&self) -> u8 {
        self.rank
    }

    pub const fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Probe activations for one sampling cycle, keyed by channel.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reading {
    states: LinearMap<ChannelId, bool, MAX_CHANNELS>,
}

impl Reading {
    pub fn set(&mut self, channel: ChannelId, active: bool) -> Result<(), ConfigurationError> {
        self.states
            .insert(channel, active)
            .map(|_| ())
            .map_err(|_| ConfigurationError::TooManyProbes { max: MAX_CHANNELS })
    }

    pub fn get(&self, channel: ChannelId) -> Option<bool> {
        self.states.get(&channel).copied()
    }
}

/// The ordered probes of one tank.
///
/// Ranks strictly increase in the order the probes were given, and each
/// probe uses its own channel. There is always at least one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct ProbeSet {
    probes: Vec<Probe, MAX_CHANNELS>,
}

impl ProbeSet {
    pub fn new<I: IntoIterator<Item = Probe>>(probes: I) -> Result<Self, ConfigurationError> {
        let mut set = Vec::<Probe, MAX_CHANNELS>::new();

        for probe in probes {
            if let Some(previous) = set.last() {
                if probe.rank <= previous.rank {
                    return Err(ConfigurationError::DuplicateRank { rank: probe.rank });
                }
            }

            if set.iter().any(|p| p.channel.id() == probe.channel.id()) {
                return Err(ConfigurationError::ChannelReused(probe.channel.id()));
            }

            set.push(probe)
                .map_err(|_| ConfigurationError::TooManyProbes { max: MAX_CHANNELS })?;
        }

        if set.is_empty() {
            Err(ConfigurationError::EmptyProbeSet)
        } else {
            Ok(Self { probes: set })
        }
    }

    /// Builds a set from channels listed lowest first, ranked by position.
    pub fn from_channels(channels: &[Channel]) -> Result<Self, ConfigurationError> {
        if channels.len() > MAX_CHANNELS {
            return Err(ConfigurationError::TooManyProbes { max: MAX_CHANNELS });
        }

        Self::new(
            channels
                .iter()
                .enumerate()
                .map(|(rank, channel)| Probe::new(rank as u8, *channel)),
        )
    }

    /// Replaces every probe's label, lowest probe first.
    pub fn with_labels(mut self, labels: &[&str]) -> Result<Self, ConfigurationError> {
        if labels.len() != self.probes.len() {
            return Err(ConfigurationError::LabelCountMismatch {
                expected: self.probes.len(),
                actual: labels.len(),
            });
        }

        for (probe, label) in self.probes.iter_mut().zip(labels) {
            *probe = probe.clone().with_label(label)?;
        }

        Ok(self)
    }

    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> + '_ {
        self.probes.iter().map(|p| &p.channel)
    }

    /// Reads every probe's channel exactly once.
    pub fn read<R: ChannelReader>(&self, reader: &mut R) -> Result<Reading, Error> {
        let mut reading = Reading::default();
        for probe in &self.probes {
            let active = reader.read_channel(&probe.channel)?;
            reading.set(probe.channel.id(), active)?;
        }
        Ok(reading)
    }

    /// The highest probe reading active, which is the one that decides the level.
    pub fn highest_active(&self, reading: &Reading) -> Result<Option<&Probe>, ConfigurationError> {
        let mut highest = None;

        for probe in &self.probes {
            let id = probe.channel.id();
            if reading.get(id).ok_or(ConfigurationError::MissingReading(id))? {
                highest = Some(probe);
            }
        }

        Ok(highest)
    }

    /// Derives the tank level from a set of probe activations.
    ///
    /// The highest active probe decides the level, so a lower probe reading
    /// dry underneath a wet one is ignored rather than lowering the level.
    pub fn derive_level(&self, reading: &Reading) -> Result<Level, ConfigurationError> {
        Ok(self.level_of(self.highest_active(reading)?))
    }

    /// Level reported when `probe` is the highest active one, clamped to the probe count.
    pub fn level_of(&self, probe: Option<&Probe>) -> Level {
        let level = match probe {
            Some(p) => (p.rank as usize + 1).min(self.probes.len()),
            None => 0,
        };

        Level::new(level as u8)
    }
}
