//! Tank level derivation for RV holding tanks.
//!
//! Each tank has a set of binary probes mounted at increasing heights. Every
//! polling cycle the [`TankMonitor`] reads the probes through a
//! [`ChannelReader`], turns each tank's probe pattern into a [`Level`] and
//! reports a [`ChangeEvent`] only for tanks whose level moved.
//!
//! The crate does no I/O of its own, reading hardware and scheduling cycles
//! is left to the caller.

#![cfg_attr(feature = "no-std", no_std)]

pub mod channel;
pub mod config;
pub mod debounce;
pub mod error;
pub mod level;
pub mod monitor;
pub mod probe_set;
pub mod reported;


#[cfg(feature = "no-std")]
use defmt::{debug, warn};
#[cfg(feature = "std")]
use log::{debug, warn};

pub use channel::{Channel, ChannelId, ChannelReader, Polarity, Pull};
pub use config::MonitorConfig;
pub use debounce::{Clock, DebouncedReader, Debouncer};
pub use error::{ConfigurationError, Error, ReadError};
pub use level::Level;
pub use monitor::{ChangeEvent, TankId, TankMonitor};
pub use probe_set::{Probe, ProbeSet, Reading};

/// Number of inputs on the optocoupler board, which also bounds the probes in a single tank.
pub const MAX_CHANNELS: usize = 8;

/// Maximum number of tanks a monitor can track.
pub const MAX_TANKS: usize = 8;

/// Maximum length in bytes of a tank identifier.
pub const MAX_TANK_ID_LEN: usize = 16;

/// Maximum length in bytes of a probe label.
pub const MAX_LABEL_LEN: usize = 16;
