//! Commands of the watchdog device.

use core::fmt::Write;

use heapless::{consts::*, String};

use crate::config::{LineCap, TableCap};
use crate::hal::{Lock, Port};
use crate::nvstore::Timestamp;
use crate::parse::parse_int;
use crate::recognizer::{Command, Outcome, Recognizer};
use crate::watchdog::{Control, Disabled, State};

pub type Handler<P, L> = fn(&mut P, &mut L);

pub type Console<P, L> = Recognizer<Handler<P, L>, LineCap, TableCap>;

pub fn commands<P, L>() -> [Command<Handler<P, L>>; 5]
where
    P: Port,
    L: Lock,
    L::T: Control,
{
    [
        Command { name: "timeout", handler: set_timeout::<P, L> },
        Command { name: "start", handler: start::<P, L> },
        Command { name: "stop", handler: stop::<P, L> },
        Command { name: "reset", handler: feed::<P, L> },
        Command { name: "status", handler: status::<P, L> },
    ]
}

/// Build the console with every command installed.
pub fn console<P, L>() -> Console<P, L>
where
    P: Port,
    L: Lock,
    L::T: Control,
{
    let mut rx = Console::new();
    super::install(&mut rx, &commands::<P, L>());
    rx
}

/// Read and handle one line.
pub fn serve<P, L>(port: &mut P, shared: &mut L, rx: &mut Console<P, L>)
where
    P: Port,
    L: Lock,
    L::T: Control,
{
    match rx.read_line(port) {
        Outcome::Matched { handler, .. } => handler(port, shared),
        _ => port.write_line(super::INVALID),
    }
    rx.reset();
}

pub fn run<P, L>(port: &mut P, shared: &mut L) -> !
where
    P: Port,
    L: Lock,
    L::T: Control,
{
    let mut rx = console::<P, L>();
    super::banner(port, &rx);

    loop {
        serve(port, shared, &mut rx);
    }
}

fn report_start(port: &mut impl Port, started: Result<(), Disabled>) {
    match started {
        Ok(()) => port.write_line("Watchdog started."),
        Err(Disabled) => port.write_line("Timeout not set."),
    }
}

fn set_timeout<P, L>(port: &mut P, shared: &mut L)
where
    P: Port,
    L: Lock,
    L::T: Control,
{
    port.write_str("Timeout in seconds: ");

    let mut rx: Recognizer<(), LineCap, U0> = Recognizer::new();
    rx.read_line(port);
    port.write_line("");

    let secs = parse_int(rx.buffer());
    if secs < 0 {
        port.write_line("Timeout must not be negative.");
        return;
    }

    shared.lock(|wd| wd.configure_timeout(secs as u32));

    let mut line: String<U32> = String::new();
    write!(&mut line, "Timeout set to {}s.", secs).ok();
    port.write_line(&line);
}

fn start<P, L>(port: &mut P, shared: &mut L)
where
    P: Port,
    L: Lock,
    L::T: Control,
{
    let started = shared.lock(|wd| wd.start());
    report_start(port, started);
}

fn stop<P, L>(port: &mut P, shared: &mut L)
where
    P: Port,
    L: Lock,
    L::T: Control,
{
    shared.lock(|wd| wd.stop());
    port.write_line("Watchdog stopped.");
}

fn feed<P, L>(port: &mut P, shared: &mut L)
where
    P: Port,
    L: Lock,
    L::T: Control,
{
    port.write_str("Timestamp: ");
    let stamp = read_token(port);
    port.write_line("");

    let started = shared.lock(|wd| wd.feed(&stamp));
    report_start(port, started);
}

/// Read one raw line, keeping only as much of it as fits a timestamp.
fn read_token<P: Port>(port: &mut P) -> Timestamp {
    let mut token = Timestamp::new();
    loop {
        match port.read_byte() {
            b'\n' => {}
            b'\r' => return token,
            // Past the end the rest of the line is dropped
            byte => {
                token.push(byte).ok();
            }
        }
    }
}

fn status<P, L>(port: &mut P, shared: &mut L)
where
    P: Port,
    L: Lock,
    L::T: Control,
{
    let status = match shared.lock(|wd| wd.status()) {
        Ok(status) => status,
        Err(_) => {
            port.write_line("Storage error!");
            return;
        }
    };

    let state = match status.state {
        State::Running => "running",
        State::Stopped => "stopped",
    };

    let mut line: String<U64> = String::new();
    write!(
        &mut line,
        "Elapsed: {}s of {}s ({})",
        status.elapsed_secs, status.timeout_secs, state
    )
    .ok();
    port.write_line(&line);

    port.write_str("Last timestamp: ");
    port.write_bytes(&status.persisted);
    port.write_line("");
}
