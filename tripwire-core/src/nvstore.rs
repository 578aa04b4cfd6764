//! Layout of the persisted timestamp.
//!
//! ```text
//! 0 ........ 13   14     15
//! [ timestamp ]  [NUL]  [sentinel]
//! ```
//!
//! The timestamp is NUL terminated when shorter than its capacity. The
//! sentinel reads non-zero on a freshly flashed (erased) part, which is how
//! the first boot is detected.

use heapless::Vec;

use crate::config::{TimestampCap, SENTINEL_ADDR, TIMESTAMP_LEN};
use crate::hal::NvStore;

pub type Timestamp = Vec<u8, TimestampCap>;

/// Clear the stored timestamp on the first boot after flashing.
///
/// Returns `true` if the store had to be initialized.
pub fn prepare<S: NvStore>(store: &mut S) -> Result<bool, S::Error> {
    if store.read_byte(SENTINEL_ADDR)? == 0 {
        return Ok(false);
    }

    store.write_bytes(SENTINEL_ADDR, &[0])?;
    store.write_bytes(0, &[0])?;
    Ok(true)
}

/// Store `stamp`, followed by its terminator.
pub fn persist<S: NvStore>(store: &mut S, stamp: &[u8]) -> Result<(), S::Error> {
    let stamp = &stamp[..stamp.len().min(TIMESTAMP_LEN)];
    store.write_bytes(0, stamp)?;
    store.write_bytes(stamp.len() as u16, &[0])
}

/// Read the stored timestamp back.
pub fn recall<S: NvStore>(store: &mut S) -> Result<Timestamp, S::Error> {
    let mut stamp = Timestamp::new();

    for addr in 0..TIMESTAMP_LEN as u16 {
        match store.read_byte(addr)? {
            0 => break,
            byte => {
                stamp.push(byte).ok();
            }
        }
    }

    Ok(stamp)
}
