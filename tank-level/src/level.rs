use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

/// Derived fill level of a tank, from 0 (no probe wet) up to the tank's probe count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
#[serde(transparent)]
pub struct Level(u8);

impl Level {
    pub const EMPTY: Self = Self(0);

    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    pub const fn value(&self) -> u8 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_full(&self, probe_count: usize) -> bool {
        self.0 as usize >= probe_count
    }

    /// Coarse fill percentage for a tank with `probe_count` probes.
    ///
    /// The lowest probe being wet reads as 0% and the highest as 100%.
    pub fn fill_percentage(&self, probe_count: usize) -> u8 {
        match (self.0 as usize, probe_count) {
            (0, _) | (_, 0) => 0,
            (_, 1) => 100,
            (level, count) => {
                let step = level.min(count) - 1;
                (100 * step / (count - 1)) as u8
            }
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}
