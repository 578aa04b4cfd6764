//! Capabilities the watchdog needs from the board.
//!
//! Pins and delays come straight from `embedded-hal`. The pieces that
//! `embedded-hal` 0.2 has no trait for live here.

use embedded_hal::serial;
use nb::block;

/// Blocking byte transport.
///
/// Every `embedded-hal` serial port is one. Receive errors (overrun,
/// framing, noise) drop the byte and keep waiting, and transmit errors are
/// dropped: the operator link has no way to report either.
pub trait Port {
    /// Wait for the next byte. There is no timeout.
    fn read_byte(&mut self) -> u8;

    fn write_bytes(&mut self, bytes: &[u8]);

    fn write_str(&mut self, msg: &str) {
        self.write_bytes(msg.as_bytes())
    }

    fn write_line(&mut self, msg: &str) {
        self.write_bytes(msg.as_bytes());
        self.write_bytes(b"\r\n");
    }
}

impl<S> Port for S
where
    S: serial::Read<u8> + serial::Write<u8>,
{
    fn read_byte(&mut self) -> u8 {
        loop {
            if let Ok(byte) = block!(self.read()) {
                return byte;
            }
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            block!(self.write(*byte)).ok();
        }
        block!(self.flush()).ok();
    }
}

/// The periodic interrupt that drives the watchdog.
pub trait TickSource {
    /// Zero the hardware counter and unmask the interrupt.
    fn arm(&mut self);

    /// Mask the interrupt. The counter may keep running.
    fn disarm(&mut self);

    fn is_armed(&self) -> bool;

    /// Clear the pending flag. Called first thing in the handler.
    fn acknowledge(&mut self);
}

/// Byte addressable storage that survives a power cycle.
pub trait NvStore {
    type Error;

    fn read_byte(&mut self, addr: u16) -> Result<u8, Self::Error>;

    /// Write `bytes` starting at `addr`. Returns once every byte has been
    /// committed.
    fn write_bytes(&mut self, addr: u16, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Exclusive access to state shared with the tick interrupt.
///
/// While the closure runs the tick interrupt cannot preempt it, so every
/// read-modify-write of the shared counters is indivisible.
pub trait Lock {
    type T;

    fn lock<R>(&mut self, f: impl FnOnce(&mut Self::T) -> R) -> R;
}

/// Access from the only context that touches the data.
impl<'a, T> Lock for &'a mut T {
    type T = T;

    fn lock<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut **self)
    }
}
