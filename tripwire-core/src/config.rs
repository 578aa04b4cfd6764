//! Compile time configuration shared by both device images.

use heapless::consts::*;

/// Period of the watchdog tick interrupt, in microseconds.
pub const TICK_PERIOD_US: u32 = 500_000;

/// Timeout armed at boot, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u32 = 60;

/// How long the reset line is held asserted on expiry.
pub const RESET_PULSE_MS: u32 = 1_000;

/// Pulse length of `blink default`.
pub const BLINK_DEFAULT_MS: u32 = 1_333;

/// Visible characters of the timestamp token.
pub const TIMESTAMP_LEN: usize = 14;

/// Non-volatile "initialized" flag. Sits right behind the timestamp
/// and its terminator.
pub const SENTINEL_ADDR: u16 = (TIMESTAMP_LEN + 1) as u16;

/// Storage for the timestamp token.
pub type TimestampCap = U14;

/// Line buffer of the main command prompt.
pub type LineCap = U16;

/// Line buffer of the `blink` prompt.
pub type BlinkLineCap = U10;

/// Room in the command table.
pub type TableCap = U8;

/// Convert a timeout in seconds into watchdog ticks.
pub const fn secs_to_ticks(secs: u32) -> u32 {
    let ticks = (secs as u64 * 1_000_000) / TICK_PERIOD_US as u64;
    if ticks > u32::MAX as u64 {
        u32::MAX
    } else {
        ticks as u32
    }
}

/// Convert watchdog ticks into whole elapsed seconds.
pub const fn ticks_to_secs(ticks: u32) -> u32 {
    ((ticks as u64 * TICK_PERIOD_US as u64) / 1_000_000) as u32
}
