//! SPI register transport for SX127x chips
//!
//! The chip uses a single-byte address phase with the top bit selecting
//! write (`addr | 0x80`) or read (`addr & 0x7F`), followed by data bytes.
//! Bursts keep chip select asserted so the chip auto-advances through the
//! FIFO.

use embedded_hal::{
    blocking::spi::{Transfer, Write},
    digital::v2::OutputPin,
};

use super::registers::Registers;

/// Possible errors in bus transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// SPI transfer error
    Spi,
    /// GPIO error
    Gpio,
}

/// SX127x register access over blocking SPI.
pub struct SpiBus<SPI, CS, RESET> {
    spi: SPI,
    cs: CS,
    reset: RESET,
}

impl<SPI, CS, RESET> SpiBus<SPI, CS, RESET>
where
    SPI: Transfer<u8> + Write<u8>,
    CS: OutputPin,
    RESET: OutputPin,
{
    /// Create a new bus wrapper. Chip select is driven high (inactive).
    pub fn new(spi: SPI, mut cs: CS, reset: RESET) -> Result<Self, BusError> {
        cs.set_high().map_err(|_| BusError::Gpio)?;
        Ok(Self { spi, cs, reset })
    }

    /// Pulse the reset line to restart the chip.
    pub fn hardware_reset(&mut self) -> Result<(), BusError> {
        self.reset.set_high().map_err(|_| BusError::Gpio)?;
        // TODO: replace the spin waits with embedded_hal::blocking::delay
        // once the driver grows a delay provider.
        for _ in 0..10_000 {
            core::hint::spin_loop();
        }
        self.reset.set_low().map_err(|_| BusError::Gpio)?;
        for _ in 0..10_000 {
            core::hint::spin_loop();
        }
        self.reset.set_high().map_err(|_| BusError::Gpio)?;
        Ok(())
    }
}

impl<SPI, CS, RESET> Registers for SpiBus<SPI, CS, RESET>
where
    SPI: Transfer<u8> + Write<u8>,
    CS: OutputPin,
    RESET: OutputPin,
{
    type Error = BusError;

    fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error> {
        self.cs.set_low().map_err(|_| BusError::Gpio)?;
        let mut buffer = [addr & 0x7F, 0];
        let result = self.spi.transfer(&mut buffer).map_err(|_| BusError::Spi);
        self.cs.set_high().map_err(|_| BusError::Gpio)?;
        result?;
        Ok(buffer[1])
    }

    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(|_| BusError::Gpio)?;
        let buffer = [addr | 0x80, value];
        let result = self.spi.write(&buffer).map_err(|_| BusError::Spi);
        self.cs.set_high().map_err(|_| BusError::Gpio)?;
        result
    }

    fn read_burst(&mut self, addr: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(|_| BusError::Gpio)?;
        let result = self
            .spi
            .write(&[addr & 0x7F])
            .map_err(|_| BusError::Spi)
            .and_then(|_| self.spi.transfer(buffer).map(|_| ()).map_err(|_| BusError::Spi));
        self.cs.set_high().map_err(|_| BusError::Gpio)?;
        result
    }

    fn write_burst(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(|_| BusError::Gpio)?;
        let result = self
            .spi
            .write(&[addr | 0x80])
            .map_err(|_| BusError::Spi)
            .and_then(|_| self.spi.write(data).map_err(|_| BusError::Spi));
        self.cs.set_high().map_err(|_| BusError::Gpio)?;
        result
    }
}
