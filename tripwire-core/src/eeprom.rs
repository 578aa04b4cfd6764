//! Driver for 24C01/24C02 style I2C EEPROMs.

use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::hal::NvStore;

/// Default 7-bit address with A0..A2 tied low.
pub const DEFAULT_ADDRESS: u8 = 0x50;

/// Acknowledge polls before a write cycle is given up on. The datasheet
/// write cycle is 5ms; at 100kHz one poll takes roughly 100us.
pub const COMMIT_POLL_LIMIT: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    I2c,
    CommitTimeout,
    OutOfRange,
}

pub struct Eeprom<I2C> {
    pub i2c: I2C,
    pub address: u8,
    /// Size of the part in bytes, 128 for a 24C01, 256 for a 24C02.
    pub size: u16,
}

impl<I2C> Eeprom<I2C>
where
    I2C: Write + WriteRead,
{
    pub fn new(i2c: I2C, address: u8, size: u16) -> Self {
        Eeprom { i2c, address, size }
    }

    fn check(&self, addr: u16, len: usize) -> Result<u8, Error> {
        if (addr as usize) + len > self.size as usize {
            Err(Error::OutOfRange)
        } else {
            Ok(addr as u8)
        }
    }

    /// The part ignores its address while a write cycle is in progress.
    fn wait_commit(&mut self) -> Result<(), Error> {
        for _ in 0..COMMIT_POLL_LIMIT {
            if self.i2c.write(self.address, &[]).is_ok() {
                return Ok(());
            }
        }
        Err(Error::CommitTimeout)
    }
}

impl<I2C> NvStore for Eeprom<I2C>
where
    I2C: Write + WriteRead,
{
    type Error = Error;

    fn read_byte(&mut self, addr: u16) -> Result<u8, Error> {
        let word = self.check(addr, 1)?;
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[word], &mut buf)
            .map_err(|_| Error::I2c)?;
        Ok(buf[0])
    }

    fn write_bytes(&mut self, addr: u16, bytes: &[u8]) -> Result<(), Error> {
        let start = self.check(addr, bytes.len())?;

        // Byte writes only: page boundaries differ between parts
        for (offset, byte) in bytes.iter().enumerate() {
            self.i2c
                .write(self.address, &[start + offset as u8, *byte])
                .map_err(|_| Error::I2c)?;
            self.wait_commit()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 24C02 that stays busy for `cycle` polls after every write.
    struct Part {
        mem: [u8; 256],
        cycle: u32,
        busy: u32,
        writes: u32,
    }

    impl Part {
        fn new(cycle: u32) -> Self {
            Part {
                mem: [0xFF; 256],
                cycle,
                busy: 0,
                writes: 0,
            }
        }
    }

    impl Write for Part {
        type Error = ();

        fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), ()> {
            if address != DEFAULT_ADDRESS {
                return Err(());
            }
            if self.busy > 0 {
                self.busy -= 1;
                return Err(());
            }
            if let [word, data] = bytes {
                self.mem[*word as usize] = *data;
                self.busy = self.cycle;
                self.writes += 1;
            }
            Ok(())
        }
    }

    impl WriteRead for Part {
        type Error = ();

        fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), ()> {
            if address != DEFAULT_ADDRESS || self.busy > 0 {
                return Err(());
            }
            let start = bytes[0] as usize;
            buffer.copy_from_slice(&self.mem[start..start + buffer.len()]);
            Ok(())
        }
    }

    #[test]
    fn writes_wait_for_each_commit() {
        let mut rom = Eeprom::new(Part::new(3), DEFAULT_ADDRESS, 256);
        rom.write_bytes(4, b"hey").unwrap();
        assert_eq!(rom.i2c.writes, 3);
        assert_eq!(&rom.i2c.mem[4..7], b"hey");
        assert_eq!(rom.read_byte(5), Ok(b'e'));
        assert_eq!(rom.read_byte(15), Ok(0xFF));
    }

    #[test]
    fn stuck_part_times_out() {
        let mut rom = Eeprom::new(Part::new(COMMIT_POLL_LIMIT + 1), DEFAULT_ADDRESS, 256);
        assert_eq!(rom.write_bytes(0, b"x"), Err(Error::CommitTimeout));
    }

    #[test]
    fn absent_part_is_a_bus_error() {
        let mut rom = Eeprom::new(Part::new(0), 0x51, 256);
        assert_eq!(rom.read_byte(0), Err(Error::I2c));
        assert_eq!(rom.write_bytes(0, b"x"), Err(Error::I2c));
    }

    #[test]
    fn rejects_addresses_past_the_end() {
        let mut rom = Eeprom::new(Part::new(0), DEFAULT_ADDRESS, 128);
        assert_eq!(rom.read_byte(128), Err(Error::OutOfRange));
        assert_eq!(rom.write_bytes(126, b"abc"), Err(Error::OutOfRange));
        assert_eq!(rom.i2c.writes, 0);
        assert!(rom.write_bytes(125, b"abc").is_ok());
    }
}
