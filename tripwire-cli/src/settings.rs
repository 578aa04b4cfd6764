use serde::Deserialize;
use std::{fs::read_to_string, io, path::Path};

use crate::Result;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub port: String,
    pub baud_rate: u32,
    /// Seconds between two `reset` commands in `feed` mode. Keep it well
    /// below the device timeout.
    pub feed_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            port: "/dev/ttyUSB0".into(),
            baud_rate: 115_200,
            feed_interval_secs: 10,
        }
    }
}

impl Settings {
    /// Load from `path`. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "no settings file, using defaults");
                Ok(Settings::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
