//! Tick driven watchdog.
//!
//! The tick interrupt calls [`Watchdog::tick`]; the command loop calls the
//! [`Control`] operations through a [`Lock`](crate::hal::Lock), which keeps
//! the tick interrupt out while it runs. Once more ticks than the timeout
//! have elapsed without a `reset`, the last timestamp is written to the
//! store and the monitored device gets a reset pulse.

use core::sync::atomic::{AtomicU32, Ordering};

use embedded_hal::{
    blocking::delay::DelayMs,
    digital::v2::{OutputPin, ToggleableOutputPin},
};

use crate::config::{secs_to_ticks, ticks_to_secs, RESET_PULSE_MS, TIMESTAMP_LEN};
use crate::hal::{NvStore, TickSource};
use crate::nvstore::{self, Timestamp};

/// Ticks seen since the watchdog was last fed.
///
/// thumbv6 has atomic load and store but no read-modify-write, so the
/// increment is a load followed by a store. That is sound as long as the
/// tick handler is the only place that increments; everything else only
/// stores, from inside the lock.
pub struct ElapsedTicks(AtomicU32);

impl ElapsedTicks {
    pub const fn new() -> Self {
        ElapsedTicks(AtomicU32::new(0))
    }

    /// Count one tick and return the new total.
    pub fn advance(&self) -> u32 {
        let now = self.0.load(Ordering::Acquire).saturating_add(1);
        self.0.store(now, Ordering::Release);
        now
    }

    pub fn snapshot(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.0.store(0, Ordering::Release);
    }

    fn clamp(&self, max: u32) {
        if self.snapshot() > max {
            self.0.store(max, Ordering::Release);
        }
    }
}

impl Default for ElapsedTicks {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum State {
    Stopped,
    Running,
}

/// What a call to [`Watchdog::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// The interrupt is masked; stray tick, nothing counted.
    Ignored,

    /// Counted; the watchdog is still within its timeout.
    Counted(u32),

    /// The timeout was exceeded and the reset pulse has been sent.
    Expired,
}

/// The timeout is zero, so the watchdog stays stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disabled;

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub state: State,
    pub elapsed_secs: u32,
    pub timeout_secs: u32,
    /// Timestamp read back from the store, i.e. the one recorded at the
    /// last expiry.
    pub persisted: Timestamp,
}

/// Operations offered to the command loop.
pub trait Control {
    type StoreError;

    fn configure_timeout(&mut self, secs: u32);

    fn start(&mut self) -> Result<(), Disabled>;

    fn stop(&mut self);

    /// Record `stamp`, restart the count and arm the watchdog.
    fn feed(&mut self, stamp: &[u8]) -> Result<(), Disabled>;

    fn status(&mut self) -> Result<Status, Self::StoreError>;
}

pub struct Watchdog<IND, RST, TIM, NV, DLY> {
    indicator: IND,
    reset_line: RST,
    timer: TIM,
    store: NV,
    delay: DLY,
    timeout_ticks: u32,
    elapsed: ElapsedTicks,
    last_timestamp: Timestamp,
}

impl<IND, RST, TIM, NV, DLY> Watchdog<IND, RST, TIM, NV, DLY>
where
    IND: OutputPin + ToggleableOutputPin,
    RST: OutputPin,
    TIM: TickSource,
    NV: NvStore,
    DLY: DelayMs<u32>,
{
    /// Takes the pins in their idle state: indicator low, reset line
    /// released. The watchdog starts out stopped.
    pub fn new(
        indicator: IND,
        reset_line: RST,
        mut timer: TIM,
        store: NV,
        delay: DLY,
        timeout_secs: u32,
    ) -> Self {
        timer.disarm();

        Watchdog {
            indicator,
            reset_line,
            timer,
            store,
            delay,
            timeout_ticks: secs_to_ticks(timeout_secs),
            elapsed: ElapsedTicks::new(),
            last_timestamp: Timestamp::new(),
        }
    }

    pub fn state(&self) -> State {
        if self.timer.is_armed() {
            State::Running
        } else {
            State::Stopped
        }
    }

    pub fn timeout_ticks(&self) -> u32 {
        self.timeout_ticks
    }

    pub fn elapsed(&self) -> &ElapsedTicks {
        &self.elapsed
    }

    pub fn last_timestamp(&self) -> &[u8] {
        &self.last_timestamp
    }

    /// Body of the tick interrupt handler.
    pub fn tick(&mut self) -> Tick {
        self.timer.acknowledge();

        if !self.timer.is_armed() {
            return Tick::Ignored;
        }

        self.indicator.toggle().ok();

        let elapsed = self.elapsed.advance();
        if elapsed > self.timeout_ticks {
            self.expire();
            Tick::Expired
        } else {
            Tick::Counted(elapsed)
        }
    }

    fn expire(&mut self) {
        // Mask first, nothing below may run twice
        self.timer.disarm();
        self.elapsed.clamp(self.timeout_ticks);

        // Nowhere to report a store failure from here; the reset pulse
        // matters more.
        nvstore::persist(&mut self.store, &self.last_timestamp).ok();

        // Latched "tripped" indication
        self.indicator.set_high().ok();

        self.reset_line.set_low().ok();
        self.delay.delay_ms(RESET_PULSE_MS);
        self.reset_line.set_high().ok();
    }

    /// Give back the hardware.
    pub fn free(self) -> (IND, RST, TIM, NV, DLY) {
        (
            self.indicator,
            self.reset_line,
            self.timer,
            self.store,
            self.delay,
        )
    }
}

impl<IND, RST, TIM, NV, DLY> Control for Watchdog<IND, RST, TIM, NV, DLY>
where
    IND: OutputPin + ToggleableOutputPin,
    RST: OutputPin,
    TIM: TickSource,
    NV: NvStore,
    DLY: DelayMs<u32>,
{
    type StoreError = NV::Error;

    fn configure_timeout(&mut self, secs: u32) {
        self.timeout_ticks = secs_to_ticks(secs);
    }

    fn start(&mut self) -> Result<(), Disabled> {
        if self.timeout_ticks == 0 {
            return Err(Disabled);
        }

        self.timer.arm();
        self.indicator.set_low().ok();
        Ok(())
    }

    fn stop(&mut self) {
        self.timer.disarm();
        self.indicator.set_low().ok();
    }

    fn feed(&mut self, stamp: &[u8]) -> Result<(), Disabled> {
        self.last_timestamp = Timestamp::new();
        let stamp = &stamp[..stamp.len().min(TIMESTAMP_LEN)];
        // Fits, truncated above
        self.last_timestamp.extend_from_slice(stamp).ok();

        self.elapsed.clear();
        self.start()
    }

    fn status(&mut self) -> Result<Status, NV::Error> {
        Ok(Status {
            state: self.state(),
            elapsed_secs: ticks_to_secs(self.elapsed.snapshot()),
            timeout_secs: ticks_to_secs(self.timeout_ticks),
            persisted: nvstore::recall(&mut self.store)?,
        })
    }
}
