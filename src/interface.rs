//! Register access over SPI.
//!
//! Every access is a single [`SpiDevice::transaction`], so chip select is asserted
//! for exactly one address byte followed by its data bytes and is released
//! afterwards. Multi-byte transfers use the chip's burst mode: the address
//! auto-increments, except for [`Register::Fifo`] where every byte goes to the FIFO.

use embedded_hal::spi::{Operation, SpiDevice};

use crate::error::Error;
use crate::registers::Register;

/// Address bit selecting a write access.
pub const WRITE_MASK: u8 = 0x80;

/// Byte-level access to the RFM69 register file.
#[derive(Debug)]
pub struct RegisterInterface<SPI> {
    spi: SPI,
}

impl<SPI> RegisterInterface<SPI> {
    /// Wraps an SPI device whose chip select is wired to the RFM69 `NSS` pin.
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> RegisterInterface<SPI>
where
    SPI: SpiDevice,
{
    /// Writes `data` starting at `reg` in one burst.
    pub fn write(&mut self, reg: Register, data: &[u8]) -> Result<(), Error<SPI::Error>> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[reg.addr() | WRITE_MASK]),
                Operation::Write(data),
            ])
            .map_err(Error::Bus)
    }

    /// Fills `data` starting at `reg` in one burst.
    pub fn read(&mut self, reg: Register, data: &mut [u8]) -> Result<(), Error<SPI::Error>> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[reg.addr() & !WRITE_MASK]),
                Operation::Read(data),
            ])
            .map_err(Error::Bus)
    }

    /// Writes a single register.
    pub fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<SPI::Error>> {
        self.write(reg, &[value])
    }

    /// Reads a single register.
    pub fn read_register(&mut self, reg: Register) -> Result<u8, Error<SPI::Error>> {
        let mut value = [0u8; 1];
        self.read(reg, &mut value)?;
        Ok(value[0])
    }

    /// Writes a length-prefixed frame into the FIFO as one transaction.
    ///
    /// The payload length must fit the length byte; callers check it against
    /// the configured maximum first.
    pub fn write_fifo_frame(&mut self, payload: &[u8]) -> Result<(), Error<SPI::Error>> {
        let len = [payload.len() as u8];
        self.spi
            .transaction(&mut [
                Operation::Write(&[Register::Fifo.addr() | WRITE_MASK]),
                Operation::Write(&len),
                Operation::Write(payload),
            ])
            .map_err(Error::Bus)
    }

    /// Reads `data.len()` bytes out of the FIFO as one transaction.
    pub fn read_fifo(&mut self, data: &mut [u8]) -> Result<(), Error<SPI::Error>> {
        self.read(Register::Fifo, data)
    }
}
