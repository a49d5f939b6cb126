//! Register access over a blocking I2C bus

use embedded_hal::blocking::i2c::{Read, Write};

use crate::errors::*;


/// Byte-level bus both chips are attached to.
///
/// Implemented for every `embedded-hal` blocking I2C peripheral, any bus
/// error (including the HAL's own timeout) is reported as [`Error::I2c`].
pub trait RegisterBus {
    /// Single write transaction
    fn send(&mut self, address: u8, bytes: &[u8]) -> Result<(), Error>;

    /// Single read transaction
    fn receive(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Error>;

    /// Writes `value` to `register` of the device at `address`.
    #[inline]
    fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), Error> {
        self.send(address, &[register, value])
    }

    /// Sets the register pointer, then reads one byte back.
    #[inline]
    fn read_register(&mut self, address: u8, register: u8) -> Result<u8, Error> {
        self.send(address, &[register])?;
        let mut buf = [0u8; 1];
        self.receive(address, &mut buf)?;
        Ok(buf[0])
    }
}


impl<I2C> RegisterBus for I2C
where I2C: Write + Read,
{
    #[inline]
    fn send(&mut self, address: u8, bytes: &[u8]) -> Result<(), Error> {
        Write::write(self, address, bytes).map_err(|_| Error::I2c)
    }

    #[inline]
    fn receive(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Error> {
        Read::read(self, address, buffer).map_err(|_| Error::I2c)
    }
}
