#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;
use std::string::String;
use std::sync::Mutex;

use embedded_hal::{
    blocking::delay::DelayMs,
    digital::v2::{OutputPin, ToggleableOutputPin},
    serial,
};
use tripwire_core::{
    hal::{Lock, NvStore, TickSource},
    Watchdog,
};

/// Serial port fed from a script; panics when the script runs out so a
/// handler waiting for more input fails the test instead of hanging it.
#[derive(Default)]
pub struct Wire {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
}

impl Wire {
    pub fn send(&mut self, text: &str) {
        self.rx.extend(text.bytes());
    }

    pub fn take_output(&mut self) -> String {
        let out = String::from_utf8_lossy(&self.tx).into_owned();
        self.tx.clear();
        out
    }
}

impl serial::Read<u8> for Wire {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        Ok(self.rx.pop_front().expect("console read past the end of the script"))
    }
}

impl serial::Write<u8> for Wire {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        self.tx.push(word);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        Ok(())
    }
}

#[derive(Default)]
pub struct Led {
    pub high: bool,
    pub toggles: u32,
}

impl OutputPin for Led {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}

impl ToggleableOutputPin for Led {
    type Error = Infallible;

    fn toggle(&mut self) -> Result<(), Infallible> {
        self.high = !self.high;
        self.toggles += 1;
        Ok(())
    }
}

/// Open drain reset line; counts the pulses it sent.
#[derive(Default)]
pub struct ResetLine {
    pub driven: bool,
    pub pulses: u32,
}

impl OutputPin for ResetLine {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.driven = true;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        if self.driven {
            self.pulses += 1;
        }
        self.driven = false;
        Ok(())
    }
}

#[derive(Default)]
pub struct Timer {
    pub armed: bool,
}

impl TickSource for Timer {
    fn arm(&mut self) {
        self.armed = true;
    }

    fn disarm(&mut self) {
        self.armed = false;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn acknowledge(&mut self) {}
}

/// Erased EEPROM contents.
pub struct Rom(pub [u8; 32]);

impl Default for Rom {
    fn default() -> Self {
        Rom([0xFF; 32])
    }
}

impl NvStore for Rom {
    type Error = ();

    fn read_byte(&mut self, addr: u16) -> Result<u8, ()> {
        self.0.get(addr as usize).copied().ok_or(())
    }

    fn write_bytes(&mut self, addr: u16, bytes: &[u8]) -> Result<(), ()> {
        let start = addr as usize;
        self.0
            .get_mut(start..start + bytes.len())
            .ok_or(())?
            .copy_from_slice(bytes);
        Ok(())
    }
}

/// Store that always fails.
pub struct DeadRom;

impl NvStore for DeadRom {
    type Error = ();

    fn read_byte(&mut self, _addr: u16) -> Result<u8, ()> {
        Err(())
    }

    fn write_bytes(&mut self, _addr: u16, _bytes: &[u8]) -> Result<(), ()> {
        Err(())
    }
}

#[derive(Default)]
pub struct Delay {
    pub total_ms: u64,
}

impl DelayMs<u32> for Delay {
    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }
}

pub type Dog<NV = Rom> = Watchdog<Led, ResetLine, Timer, NV, Delay>;

pub fn dog<NV: NvStore>(store: NV, timeout_secs: u32) -> Dog<NV> {
    Watchdog::new(
        Led::default(),
        ResetLine::default(),
        Timer::default(),
        store,
        Delay::default(),
        timeout_secs,
    )
}

/// Stands in for the interrupt masking lock on the target.
pub struct Shared<'a, T>(pub &'a Mutex<T>);

impl<'a, T> Lock for Shared<'a, T> {
    type T = T;

    fn lock<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.0.lock().unwrap();
        f(&mut *guard)
    }
}
