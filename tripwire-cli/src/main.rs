use chrono::Local;
use serialport::prelude::*;
use std::{
    io::{self, prelude::*},
    path::PathBuf,
    thread::sleep,
    time::{Duration, Instant},
};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

mod protocol;
mod settings;

use protocol::{split_lines, timestamp, Request};
use settings::Settings;

pub type Error = Box<dyn std::error::Error>;
pub type Result<T> = std::result::Result<T, Error>;

/// How long the device may stay quiet before its reply is considered done.
const REPLY_QUIET: Duration = Duration::from_millis(300);

#[derive(StructOpt, Debug)]
#[structopt(rename_all = "kebab-case", about = "Talk to a tripwire serial watchdog")]
struct Opt {
    /// Settings file
    #[structopt(long, default_value = "./tripwire-settings.toml", parse(from_os_str))]
    config: PathBuf,

    /// Serial port, overrides the settings file
    #[structopt(long)]
    port: Option<String>,

    /// Baud rate, overrides the settings file
    #[structopt(long)]
    baud_rate: Option<u32>,

    #[structopt(subcommand)]
    cmd: SubCommands,
}

#[derive(StructOpt, Debug)]
#[structopt(rename_all = "kebab-case")]
enum SubCommands {
    /// Keep the watchdog fed with the current time
    Feed {
        /// Seconds between resets, overrides the settings file
        #[structopt(long)]
        interval: Option<u64>,

        /// Send one reset and exit
        #[structopt(long)]
        once: bool,
    },
    /// Print elapsed time and the timestamp stored at the last expiry
    Status,
    /// Set the timeout in seconds
    Timeout { secs: u32 },
    Start,
    Stop,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opt = Opt::from_args();
    let mut config = Settings::load(&opt.config)?;
    if let Some(port) = opt.port {
        config.port = port;
    }
    if let Some(baud_rate) = opt.baud_rate {
        config.baud_rate = baud_rate;
    }

    let mut settings: SerialPortSettings = Default::default();
    settings.timeout = Duration::from_millis(100);
    settings.baud_rate = config.baud_rate;

    let mut port = match serialport::open_with_settings(&config.port, &settings) {
        Ok(port) => port,
        Err(e) => {
            tracing::error!(port = %config.port, "failed to open: {}", e);
            ::std::process::exit(1);
        }
    };

    match opt.cmd {
        SubCommands::Feed { interval, once } => {
            let interval = Duration::from_secs(interval.unwrap_or(config.feed_interval_secs));
            feed(&mut port, interval, once)
        }
        SubCommands::Status => transact(&mut port, &Request::Status).map(drop),
        SubCommands::Timeout { secs } => transact(&mut port, &Request::Timeout(secs)).map(drop),
        SubCommands::Start => transact(&mut port, &Request::Start).map(drop),
        SubCommands::Stop => transact(&mut port, &Request::Stop).map(drop),
    }
}

fn feed(port: &mut Box<dyn SerialPort>, interval: Duration, once: bool) -> Result<()> {
    loop {
        let started = Instant::now();
        let request = Request::reset(&timestamp(Local::now()))?;
        transact(port, &request)?;

        if once {
            return Ok(());
        }

        if let Some(rest) = interval.checked_sub(started.elapsed()) {
            sleep(rest);
        }
    }
}

/// Send `request` and log whatever the device answers.
fn transact(port: &mut Box<dyn SerialPort>, request: &Request) -> Result<Vec<String>> {
    tracing::debug!(?request, "sending");
    port.write_all(&request.encode())?;
    port.flush()?;

    let reply = read_reply(port)?;
    for line in &reply {
        tracing::info!("{}", line);
    }

    if reply.iter().any(|l| l.contains("Invalid command!")) {
        return Err(Error::from("device rejected the command"));
    }
    Ok(reply)
}

/// Collect output until the device has been quiet for `REPLY_QUIET`.
fn read_reply(port: &mut Box<dyn SerialPort>) -> Result<Vec<String>> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 256];
    let mut last_rx = Instant::now();

    while last_rx.elapsed() < REPLY_QUIET {
        match port.read(&mut buf) {
            Ok(ct) => {
                raw.extend_from_slice(&buf[..ct]);
                last_rx = Instant::now();
            }
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(split_lines(&raw))
}
