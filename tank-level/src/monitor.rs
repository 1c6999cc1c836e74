use crate::{
    channel::ChannelReader,
    debug,
    error::{ConfigurationError, Error},
    level::Level,
    probe_set::{Label, ProbeSet},
    reported::{Changed, LastReported},
    warn, MAX_CHANNELS, MAX_TANKS, MAX_TANK_ID_LEN,
};
use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

pub type TankId = String<MAX_TANK_ID_LEN>;

/// Emitted by [`TankMonitor::sample`] when a tank's level differs from the last one reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct ChangeEvent {
    pub tank_id: TankId,

    /// `None` for the first reading after the monitor was configured.
    pub previous_level: Option<Level>,

    pub new_level: Level,

    pub probe_count: usize,

    /// Label of the highest active probe, the one that set `new_level`.
    pub label: Option<Label>,
}

impl ChangeEvent {
    pub fn fill_percentage(&self) -> u8 {
        self.new_level.fill_percentage(self.probe_count)
    }
}

#[derive(Debug)]
struct TankState {
    id: TankId,
    probes: ProbeSet,
    level: LastReported<Level>,
}

/// Samples every configured tank and reports level transitions.
#[derive(Debug)]
pub struct TankMonitor {
    tanks: Vec<TankState, MAX_TANKS>,
}

impl TankMonitor {
    /// Validates the tanks and creates a monitor with every level unset.
    ///
    /// Tank identifiers must be unique, and no channel may be used by more
    /// than one probe anywhere in the monitor. At most [`MAX_CHANNELS`]
    /// channels may be used in total.
    pub fn configure<I, S>(tanks: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (S, ProbeSet)>,
        S: AsRef<str>,
    {
        let mut states = Vec::<TankState, MAX_TANKS>::new();
        let mut channel_count = 0;

        for (id, probes) in tanks {
            if states.is_full() {
                return Err(ConfigurationError::TooManyTanks { max: MAX_TANKS });
            }

            let id: TankId = id.as_ref().try_into().map_err(|_| {
                ConfigurationError::TankIdTooLong {
                    max: MAX_TANK_ID_LEN,
                }
            })?;

            if states.iter().any(|t| t.id == id) {
                return Err(ConfigurationError::DuplicateTank(id));
            }

            for channel in probes.channels() {
                if states
                    .iter()
                    .flat_map(|t| t.probes.channels())
                    .any(|c| c.id() == channel.id())
                {
                    return Err(ConfigurationError::ChannelReused(channel.id()));
                }
            }

            channel_count += probes.probe_count();
            if channel_count > MAX_CHANNELS {
                return Err(ConfigurationError::TooManyChannels { max: MAX_CHANNELS });
            }

            states
                .push(TankState {
                    id,
                    probes,
                    level: LastReported::default(),
                })
                .map_err(|_| ConfigurationError::TooManyTanks { max: MAX_TANKS })?;
        }

        Ok(Self { tanks: states })
    }

    /// Runs one sampling cycle.
    ///
    /// Every channel of every tank is read once, in configuration order.
    /// Events are returned for tanks whose level changed, which on the first
    /// cycle is all of them. If any read fails the error is returned and no
    /// tank's stored level is touched.
    pub fn sample<R: ChannelReader>(
        &mut self,
        reader: &mut R,
    ) -> Result<Vec<ChangeEvent, MAX_TANKS>, Error> {
        let mut levels = Vec::<Level, MAX_TANKS>::new();
        let mut events = Vec::<ChangeEvent, MAX_TANKS>::new();

        for tank in &self.tanks {
            let reading = tank.probes.read(reader).inspect_err(|e| {
                warn!("Failed to sample tank {}: {}", tank.id.as_str(), e);
            })?;
            let top = tank.probes.highest_active(&reading)?;
            let level = tank.probes.level_of(top);

            if tank.level.differs(level) {
                events
                    .push(ChangeEvent {
                        tank_id: tank.id.clone(),
                        previous_level: tank.level.get(),
                        new_level: level,
                        probe_count: tank.probes.probe_count(),
                        label: top.and_then(|p| p.label.clone()),
                    })
                    .map_err(|_| ConfigurationError::TooManyTanks { max: MAX_TANKS })?;
            }

            levels
                .push(level)
                .map_err(|_| ConfigurationError::TooManyTanks { max: MAX_TANKS })?;
        }

        for (tank, level) in self.tanks.iter_mut().zip(levels) {
            if tank.level.record(level) == Changed::Yes {
                debug!("Tank {} now at level {}", tank.id.as_str(), level.value());
            }
        }

        Ok(events)
    }

    pub fn tank_count(&self) -> usize {
        self.tanks.len()
    }

    /// Last reported level of every tank, in configuration order.
    pub fn levels(&self) -> impl Iterator<Item = (&str, Option<Level>, usize)> + '_ {
        self.tanks
            .iter()
            .map(|t| (t.id.as_str(), t.level.get(), t.probes.probe_count()))
    }

    pub fn probe_set(&self, tank_id: &str) -> Option<&ProbeSet> {
        self.tanks
            .iter()
            .find(|t| t.id.as_str() == tank_id)
            .map(|t| &t.probes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        channel::{Channel, ChannelId},
        error::ReadError,
        probe_set::Probe,
    };

    fn tank(first_channel: u8) -> ProbeSet {
        ProbeSet::from_channels(&[
            Channel::active_high(first_channel),
            Channel::active_high(first_channel + 1),
            Channel::active_high(first_channel + 2),
            Channel::active_high(first_channel + 3),
        ])
        .unwrap()
    }

    fn reader(states: [bool; 8]) -> impl FnMut(&Channel) -> Result<bool, ReadError> {
        move |c: &Channel| {
            states
                .get(c.id().index())
                .copied()
                .ok_or(ReadError::Unavailable(c.id()))
        }
    }

    #[test]
    fn first_sample_reports_every_tank() {
        let mut monitor = TankMonitor::configure([("fresh", tank(0)), ("grey", tank(4))])
            .unwrap();

        let events = monitor.sample(&mut reader([false; 8])).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tank_id, "fresh");
        assert_eq!(events[0].previous_level, None);
        assert_eq!(events[0].new_level, Level::EMPTY);
        assert_eq!(events[0].probe_count, 4);
        assert_eq!(events[1].tank_id, "grey");
    }

    #[test]
    fn identical_samples_report_nothing() {
        let mut monitor = TankMonitor::configure([("fresh", tank(0))]).unwrap();
        let states = [true, false, false, false, false, false, false, false];

        assert_eq!(monitor.sample(&mut reader(states)).unwrap().len(), 1);
        assert!(monitor.sample(&mut reader(states)).unwrap().is_empty());
        assert!(monitor.sample(&mut reader(states)).unwrap().is_empty());
    }

    #[test]
    fn only_changed_tanks_are_reported() {
        let mut monitor = TankMonitor::configure([("fresh", tank(0)), ("grey", tank(4))])
            .unwrap();
        monitor.sample(&mut reader([false; 8])).unwrap();

        let events = monitor
            .sample(&mut reader([false, false, false, false, true, true, false, false]))
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tank_id, "grey");
        assert_eq!(events[0].previous_level, Some(Level::EMPTY));
        assert_eq!(events[0].new_level, Level::new(2));
        assert_eq!(events[0].fill_percentage(), 33);
    }

    #[test]
    fn read_failure_leaves_state_untouched() {
        let mut monitor = TankMonitor::configure([("fresh", tank(0)), ("grey", tank(4))])
            .unwrap();
        monitor.sample(&mut reader([false; 8])).unwrap();

        // The first tank reads fine, the second fails part way through
        let mut faulty = |c: &Channel| -> Result<bool, ReadError> {
            if c.id() == ChannelId(6) {
                Err(ReadError::HardwareFault(c.id()))
            } else {
                Ok(true)
            }
        };
        assert_eq!(
            monitor.sample(&mut faulty),
            Err(Error::Read(ReadError::HardwareFault(ChannelId(6))))
        );

        let levels: std::vec::Vec<_> = monitor.levels().collect();
        assert_eq!(
            levels,
            [("fresh", Some(Level::EMPTY), 4), ("grey", Some(Level::EMPTY), 4)]
        );

        // Both tanks change once reads succeed again
        let events = monitor.sample(&mut reader([true; 8])).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].previous_level, Some(Level::EMPTY));
        assert_eq!(events[0].new_level, Level::new(4));
    }

    #[test]
    fn failure_on_first_sample_keeps_levels_unset() {
        let mut monitor = TankMonitor::configure([("fresh", tank(0))]).unwrap();

        let mut short = reader([true, true, true, false, false, false, false, false]);
        let mut dead =
            |c: &Channel| -> Result<bool, ReadError> { Err(ReadError::Timeout(c.id())) };
        assert!(monitor.sample(&mut dead).is_err());
        assert_eq!(monitor.levels().next(), Some(("fresh", None, 4)));

        let events = monitor.sample(&mut short).unwrap();
        assert_eq!(events[0].previous_level, None);
        assert_eq!(events[0].new_level, Level::new(3));
    }

    #[test]
    fn channel_shared_between_tanks() {
        let result = TankMonitor::configure([("fresh", tank(0)), ("grey", tank(3))]);
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::ChannelReused(ChannelId(3))
        );
    }

    #[test]
    fn duplicate_tank() {
        let result = TankMonitor::configure([("fresh", tank(0)), ("fresh", tank(4))]);
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::DuplicateTank("fresh".try_into().unwrap())
        );
    }

    #[test]
    fn tank_id_too_long() {
        let result = TankMonitor::configure([("a_very_long_tank_name", tank(0))]);
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::TankIdTooLong {
                max: MAX_TANK_ID_LEN
            }
        );
    }

    #[test]
    fn too_many_tanks() {
        let tanks = (0..9u8).map(|i| {
            let name = ["t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8"][i as usize];
            (
                name,
                ProbeSet::from_channels(&[Channel::active_high(i)]).unwrap(),
            )
        });
        assert_eq!(
            TankMonitor::configure(tanks).unwrap_err(),
            ConfigurationError::TooManyTanks { max: MAX_TANKS }
        );
    }

    #[test]
    fn channels_limited_across_tanks() {
        // Twelve channels in total, more than the input board or a debounced reader can carry
        let result = TankMonitor::configure([
            ("fresh", tank(0)),
            ("grey", tank(4)),
            ("black", tank(8)),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::TooManyChannels { max: MAX_CHANNELS }
        );
    }

    #[test]
    fn event_carries_label_of_active_probe() {
        let probes = ProbeSet::new([
            Probe::new(0, Channel::active_high(0)).with_label("low").unwrap(),
            Probe::new(4, Channel::active_high(1)).with_label("high").unwrap(),
        ])
        .unwrap();
        let mut monitor = TankMonitor::configure([("black", probes)]).unwrap();

        let events = monitor
            .sample(&mut reader([false, true, false, false, false, false, false, false]))
            .unwrap();
        assert_eq!(events[0].new_level, Level::new(2));
        assert_eq!(events[0].label.as_deref(), Some("high"));

        let events = monitor.sample(&mut reader([false; 8])).unwrap();
        assert_eq!(events[0].new_level, Level::EMPTY);
        assert_eq!(events[0].label, None);
    }

    #[test]
    fn probe_set_lookup() {
        let monitor = TankMonitor::configure([("fresh", tank(0)), ("grey", tank(4))])
            .unwrap();
        assert_eq!(monitor.tank_count(), 2);
        assert_eq!(monitor.probe_set("grey"), Some(&tank(4)));
        assert!(monitor.probe_set("black").is_none());
    }
}
