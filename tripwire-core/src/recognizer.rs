//! Line oriented command recognizer.
//!
//! Bytes are fed in one at a time. A carriage return completes the line,
//! which is then compared byte for byte against the registered commands.
//! Line feeds are ignored wherever they appear, so both `\r` and `\r\n`
//! terminals work.

use heapless::{ArrayLength, Vec};

use crate::hal::Port;

/// One entry of the command table.
#[derive(Clone, Copy)]
pub struct Command<H> {
    pub name: &'static str,
    pub handler: H,
}

/// Result of feeding one byte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome<H> {
    /// The line is not finished yet.
    Incomplete,

    /// The line is finished but matches no command. Its text is still
    /// available through [`Recognizer::buffer`].
    Invalid,

    /// The line matched the command registered at `index`.
    Matched { index: usize, handler: H },
}

/// The command table has no room left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableFull;

/// Line buffer of `N` bytes plus a table of up to `M` commands.
///
/// Once `N` bytes have been received without a carriage return, further
/// bytes wrap around and silently overwrite the start of the line.
///
/// A completed line is kept until the next byte other than a line feed
/// arrives, which starts a new line. Callers that want the buffer cleared
/// earlier call [`Recognizer::reset`].
pub struct Recognizer<H, N, M>
where
    N: ArrayLength<u8>,
    M: ArrayLength<Command<H>>,
{
    line: Vec<u8, N>,
    cursor: usize,
    complete: bool,
    commands: Vec<Command<H>, M>,
}

impl<H, N, M> Recognizer<H, N, M>
where
    H: Copy,
    N: ArrayLength<u8>,
    M: ArrayLength<Command<H>>,
{
    pub fn new() -> Self {
        Recognizer {
            line: Vec::new(),
            cursor: 0,
            complete: false,
            commands: Vec::new(),
        }
    }

    /// Append a command to the table. Returns the index that
    /// [`Outcome::Matched`] will report for it.
    pub fn register(&mut self, name: &'static str, handler: H) -> Result<usize, TableFull> {
        let index = self.commands.len();
        self.commands
            .push(Command { name, handler })
            .map_err(|_| TableFull)?;
        Ok(index)
    }

    /// The registered commands, in registration order.
    pub fn commands(&self) -> &[Command<H>] {
        &self.commands
    }

    /// Clear the line buffer.
    pub fn reset(&mut self) {
        // heapless 0.5 `Vec::clear` indexes past the new length
        self.line = Vec::new();
        self.cursor = 0;
        self.complete = false;
    }

    /// Consume one received byte.
    pub fn feed(&mut self, byte: u8) -> Outcome<H> {
        if byte == b'\n' {
            return Outcome::Incomplete;
        }

        if self.complete {
            self.reset();
        }

        if byte == b'\r' {
            self.complete = true;
            return self.lookup();
        }

        self.push(byte);
        Outcome::Incomplete
    }

    /// Block on `port` until a line is complete.
    pub fn read_line<P: Port>(&mut self, port: &mut P) -> Outcome<H> {
        loop {
            match self.feed(port.read_byte()) {
                Outcome::Incomplete => continue,
                done => return done,
            }
        }
    }

    /// The current line, without any terminator.
    pub fn buffer(&self) -> &[u8] {
        &self.line
    }

    fn push(&mut self, byte: u8) {
        let cap = N::to_usize();
        if cap == 0 {
            return;
        }

        if self.line.len() < cap {
            // Cannot fail, checked above
            self.line.push(byte).ok();
        } else {
            self.line[self.cursor] = byte;
        }
        self.cursor = (self.cursor + 1) % cap;
    }

    fn lookup(&self) -> Outcome<H> {
        let line = self.buffer();
        self.commands
            .iter()
            .enumerate()
            .find(|(_, cmd)| cmd.name.as_bytes() == line)
            .map(|(index, cmd)| Outcome::Matched {
                index,
                handler: cmd.handler,
            })
            .unwrap_or(Outcome::Invalid)
    }
}

impl<H, N, M> Default for Recognizer<H, N, M>
where
    H: Copy,
    N: ArrayLength<u8>,
    M: ArrayLength<Command<H>>,
{
    fn default() -> Self {
        Self::new()
    }
}
