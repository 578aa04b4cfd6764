//! Operator console over the serial port.
//!
//! Both device images share the same shape: a table of `(name, handler)`
//! pairs registered into a [`Recognizer`], and a loop that reads one line,
//! runs the matching handler and starts over.

use core::fmt::Write;

use heapless::{consts::*, ArrayLength, String};

use crate::hal::Port;
use crate::recognizer::{Command, Recognizer};

pub mod led;
pub mod watchdog;

pub const INVALID: &str = "Invalid command!";

/// Register `table` in order. Entries past the recognizer's capacity are
/// dropped; the tables are sized to fit at compile time.
pub fn install<H, N, M>(rx: &mut Recognizer<H, N, M>, table: &[Command<H>])
where
    H: Copy,
    N: ArrayLength<u8>,
    M: ArrayLength<Command<H>>,
{
    for cmd in table {
        if rx.register(cmd.name, cmd.handler).is_err() {
            break;
        }
    }
}

/// Greeting listing every registered command.
pub fn banner<P, H, N, M>(port: &mut P, rx: &Recognizer<H, N, M>)
where
    P: Port,
    H: Copy,
    N: ArrayLength<u8>,
    M: ArrayLength<Command<H>>,
{
    let mut line: String<U32> = String::new();
    write!(&mut line, "Commands: {}", rx.commands().len()).ok();
    port.write_line(&line);

    for cmd in rx.commands() {
        port.write_str("   ");
        port.write_line(cmd.name);
    }
    port.write_line("You should enable local echo.");
    port.write_line("");
}
