#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub enum Changed {
    Yes,
    No,
}

impl From<bool> for Changed {
    fn from(changed: bool) -> Self {
        if changed {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// The last value reported for something sampled repeatedly, unset until the first report.
#[derive(Debug, Clone, Copy)]
pub struct LastReported<T> {
    value: Option<T>,
}

impl<T> Default for LastReported<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T: Copy + PartialEq> LastReported<T> {
    pub fn get(&self) -> Option<T> {
        self.value
    }

    /// Whether reporting `candidate` would be a change. Always true while unset.
    pub fn differs(&self, candidate: T) -> bool {
        self.value != Some(candidate)
    }

    pub fn record(&mut self, value: T) -> Changed {
        let changed = Changed::from(self.differs(value));
        self.value = Some(value);
        changed
    }
}
