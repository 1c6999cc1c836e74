use crate::{
    channel::{Channel, ChannelId, ChannelReader},
    error::ReadError,
    MAX_CHANNELS,
};
use heapless::LinearMap;

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<F: Fn() -> u64> Clock for F {
    fn now_ms(&self) -> u64 {
        self()
    }
}

/// Filters bounce on a single input.
///
/// A new raw value is only accepted once it has been observed unchanged for
/// at least the debounce interval.
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval_ms: u64,
    last_raw: bool,
    stable: bool,
    last_change_ms: u64,
}

impl Debouncer {
    pub fn new(initial: bool, now_ms: u64, interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_raw: initial,
            stable: initial,
            last_change_ms: now_ms,
        }
    }

    pub fn update(&mut self, raw: bool, now_ms: u64) -> bool {
        if raw != self.last_raw {
            self.last_raw = raw;
            self.last_change_ms = now_ms;
        } else if now_ms.saturating_sub(self.last_change_ms) >= self.interval_ms {
            self.stable = self.last_raw;
        }

        self.stable
    }

    pub fn stable(&self) -> bool {
        self.stable
    }
}

/// Debounces every channel read through an inner [`ChannelReader`].
///
/// The first read of a channel is taken as its stable state. A zero interval
/// disables filtering.
pub struct DebouncedReader<R, C> {
    inner: R,
    clock: C,
    interval_ms: u64,
    debouncers: LinearMap<ChannelId, Debouncer, MAX_CHANNELS>,
}

impl<R: ChannelReader, C: Clock> DebouncedReader<R, C> {
    pub fn new(inner: R, clock: C, interval_ms: u64) -> Self {
        Self {
            inner,
            clock,
            interval_ms,
            debouncers: LinearMap::new(),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }
}

impl<R: ChannelReader, C: Clock> ChannelReader for DebouncedReader<R, C> {
    fn read_channel(&mut self, channel: &Channel) -> Result<bool, ReadError> {
        let raw = self.inner.read_channel(channel)?;

        if self.interval_ms == 0 {
            return Ok(raw);
        }

        let now = self.clock.now_ms();

        match self.debouncers.get_mut(&channel.id()) {
            Some(debouncer) => Ok(debouncer.update(raw, now)),
            None => {
                self.debouncers
                    .insert(channel.id(), Debouncer::new(raw, now, self.interval_ms))
                    .map_err(|_| ReadError::Unavailable(channel.id()))?;
                Ok(raw)
            }
        }
    }
}
