//! The device's line protocol, seen from the host.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::{Error, Result};

/// Longest timestamp token the device keeps.
pub const TIMESTAMP_LEN: usize = 14;

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Timeout(u32),
    Start,
    Stop,
    Reset(String),
    Status,
}

impl Request {
    /// A `reset` carrying `token`, which the device stores verbatim.
    pub fn reset(token: &str) -> Result<Self> {
        if token.len() > TIMESTAMP_LEN {
            return Err(Error::from(format!(
                "timestamp {:?} is longer than {} bytes",
                token, TIMESTAMP_LEN
            )));
        }
        if token.bytes().any(|b| b == b'\r' || b == b'\n') {
            return Err(Error::from("timestamp must not contain line breaks"));
        }
        Ok(Request::Reset(token.into()))
    }

    /// Bytes to put on the wire, including the parameter line of the
    /// commands that prompt for one.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Request::Timeout(secs) => format!("timeout\r{}\r", secs).into_bytes(),
            Request::Start => b"start\r".to_vec(),
            Request::Stop => b"stop\r".to_vec(),
            Request::Reset(token) => format!("reset\r{}\r", token).into_bytes(),
            Request::Status => b"status\r".to_vec(),
        }
    }
}

/// Timestamp token for `now`: `YYMMDDhhmmss`.
pub fn timestamp<Tz>(now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%y%m%d%H%M%S").to_string()
}

/// Split device output into lines, dropping prompts' empty remainders.
pub fn split_lines(raw: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(raw)
        .split(|c| c == '\r' || c == '\n')
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
