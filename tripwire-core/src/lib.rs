//! Portable core of the tripwire serial watchdog.
//!
//! Everything in here is hardware agnostic: the firmware crates hand in
//! their pins, timers, serial ports and storage through the traits in
//! [`hal`] and the `embedded-hal` traits, and the host runs the same code
//! against mocks in the test suite.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod console;
pub mod eeprom;
pub mod hal;
pub mod nvstore;
pub mod parse;
pub mod recognizer;
pub mod watchdog;

pub use recognizer::{Command, Outcome, Recognizer, TableFull};
pub use watchdog::{Control, State, Status, Tick, Watchdog};
