//! Raw register access contract and SX127x register map
//!
//! The [`Registers`] trait is the seam between the chip logic and the bus
//! wiring: anything that can read and write numbered 8-bit registers can
//! back the driver, including an in-memory fake in tests.

/// Raw register transport.
///
/// Burst variants move consecutive FIFO bytes under a single transaction;
/// implementations must not interleave other traffic inside a burst.
pub trait Registers {
    /// Transport error type
    type Error;

    /// Read a single register.
    fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error>;

    /// Write a single register.
    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Self::Error>;

    /// Read `buffer.len()` bytes starting at `addr`.
    fn read_burst(&mut self, addr: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Write all of `data` starting at `addr`.
    fn write_burst(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error>;
}

// SX127x register map
pub(crate) const REG_FIFO: u8 = 0x00;
pub(crate) const REG_OP_MODE: u8 = 0x01;
pub(crate) const REG_FRF_MSB: u8 = 0x06;
pub(crate) const REG_FRF_MID: u8 = 0x07;
pub(crate) const REG_FRF_LSB: u8 = 0x08;
pub(crate) const REG_PA_CONFIG: u8 = 0x09;
pub(crate) const REG_LNA: u8 = 0x0C;
pub(crate) const REG_FIFO_ADDR_PTR: u8 = 0x0D;
pub(crate) const REG_FIFO_TX_BASE_ADDR: u8 = 0x0E;
pub(crate) const REG_FIFO_RX_BASE_ADDR: u8 = 0x0F;
pub(crate) const REG_FIFO_RX_CURRENT_ADDR: u8 = 0x10;
pub(crate) const REG_IRQ_FLAGS: u8 = 0x12;
pub(crate) const REG_RX_NB_BYTES: u8 = 0x13;
pub(crate) const REG_PKT_SNR_VALUE: u8 = 0x19;
pub(crate) const REG_PKT_RSSI_VALUE: u8 = 0x1A;
pub(crate) const REG_MODEM_CONFIG_1: u8 = 0x1D;
pub(crate) const REG_MODEM_CONFIG_2: u8 = 0x1E;
pub(crate) const REG_PREAMBLE_MSB: u8 = 0x20;
pub(crate) const REG_PREAMBLE_LSB: u8 = 0x21;
pub(crate) const REG_PAYLOAD_LENGTH: u8 = 0x22;
pub(crate) const REG_MODEM_CONFIG_3: u8 = 0x26;
pub(crate) const REG_DETECTION_OPTIMIZE: u8 = 0x31;
pub(crate) const REG_DETECTION_THRESHOLD: u8 = 0x37;
pub(crate) const REG_SYNC_WORD: u8 = 0x39;
pub(crate) const REG_DIO_MAPPING_1: u8 = 0x40;
pub(crate) const REG_VERSION: u8 = 0x42;

// Operating mode bits
pub(crate) const MODE_LONG_RANGE_MODE: u8 = 0x80;
pub(crate) const MODE_SLEEP: u8 = 0x00;
pub(crate) const MODE_STDBY: u8 = 0x01;
pub(crate) const MODE_TX: u8 = 0x03;
pub(crate) const MODE_RX_CONTINUOUS: u8 = 0x05;

// PA config
pub(crate) const PA_BOOST: u8 = 0x80;

// IRQ flag bits
const IRQ_TX_DONE_MASK: u8 = 0x08;
const IRQ_PAYLOAD_CRC_ERROR_MASK: u8 = 0x20;
const IRQ_RX_DONE_MASK: u8 = 0x40;
const IRQ_RX_TIMEOUT_MASK: u8 = 0x80;

// DIO0 mapping values
pub(crate) const DIO0_RX_DONE: u8 = 0x00;
pub(crate) const DIO0_TX_DONE: u8 = 0x40;

/// Discrete chip operating modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Lowest-power mode, configuration retained
    Sleep,
    /// Oscillator running, radio idle
    Standby,
    /// Transmitting the FIFO contents
    Tx,
    /// Continuous receive
    RxContinuous,
}

impl Mode {
    pub(crate) fn bits(self) -> u8 {
        let mode = match self {
            Mode::Sleep => MODE_SLEEP,
            Mode::Standby => MODE_STDBY,
            Mode::Tx => MODE_TX,
            Mode::RxContinuous => MODE_RX_CONTINUOUS,
        };
        MODE_LONG_RANGE_MODE | mode
    }
}

/// Snapshot of the chip's IRQ-flag register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqFlags(
    /// Raw contents of the IRQ-flag register
    pub u8,
);

impl IrqFlags {
    /// Transmission of the FIFO contents finished.
    pub fn tx_done(self) -> bool {
        self.0 & IRQ_TX_DONE_MASK != 0
    }

    /// A packet finished arriving.
    pub fn rx_done(self) -> bool {
        self.0 & IRQ_RX_DONE_MASK != 0
    }

    /// The received payload failed the chip's CRC check.
    pub fn crc_error(self) -> bool {
        self.0 & IRQ_PAYLOAD_CRC_ERROR_MASK != 0
    }

    /// Single-shot receive window expired.
    pub fn rx_timeout(self) -> bool {
        self.0 & IRQ_RX_TIMEOUT_MASK != 0
    }
}
