//! SX127x mode controller
//!
//! Sequences the chip through its discrete operating modes, loads and
//! drains the FIFO, and owns the IRQ-flag register. Everything here is
//! generic over [`Registers`], so the same logic runs against real SPI
//! hardware and against an in-memory fake in tests.

use super::registers::{self, IrqFlags, Mode, Registers};
use crate::config::ModemConfig;
use crate::packet::MAX_FRAME_LEN;

/// Silicon revision reported by supported chips.
const CHIP_VERSION: u8 = 0x12;

/// Frequencies below this use the low-band RSSI offset.
const RF_MID_BAND_THRESHOLD: u32 = 868_000_000;

/// Possible errors in radio operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Register transport error
    Bus(E),
    /// Chip reported an unexpected silicon version
    UnsupportedVersion(u8),
}

/// SX127x driver over a raw register transport.
pub struct Sx127x<I> {
    regs: I,
    frequency: u32,
}

impl<I: Registers> Sx127x<I> {
    /// Wrap a register transport. Performs no bus traffic; call
    /// [`init`](Self::init) before use.
    pub fn new(regs: I) -> Self {
        Self { regs, frequency: 0 }
    }

    /// Release the underlying transport.
    pub fn free(self) -> I {
        self.regs
    }

    /// Direct access to the underlying transport.
    pub fn bus_mut(&mut self) -> &mut I {
        &mut self.regs
    }

    fn read(&mut self, addr: u8) -> Result<u8, Error<I::Error>> {
        self.regs.read_register(addr).map_err(Error::Bus)
    }

    fn write(&mut self, addr: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.regs.write_register(addr, value).map_err(Error::Bus)
    }

    /// Check the silicon version and apply the modem configuration.
    ///
    /// Leaves the chip in standby with the FIFO base addresses zeroed and
    /// explicit-header mode selected.
    pub fn init(&mut self, config: &ModemConfig) -> Result<(), Error<I::Error>> {
        let version = self.read(registers::REG_VERSION)?;
        if version != CHIP_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        // Configuration registers require sleep or standby.
        self.set_mode(Mode::Sleep)?;

        self.set_frequency(config.frequency)?;
        self.set_bandwidth(config.bandwidth)?;

        // LNA boost and auto AGC
        let lna = self.read(registers::REG_LNA)?;
        self.write(registers::REG_LNA, lna | 0x03)?;
        self.write(registers::REG_MODEM_CONFIG_3, 0x04)?;

        self.set_tx_power(config.tx_power)?;
        self.set_spreading_factor(config.spreading_factor)?;
        self.set_coding_rate(config.coding_rate)?;
        self.set_preamble_length(config.preamble_length)?;
        self.write(registers::REG_SYNC_WORD, config.sync_word)?;
        self.enable_crc(config.crc_on)?;

        // Whole FIFO for whichever direction is active.
        self.write(registers::REG_FIFO_TX_BASE_ADDR, 0x00)?;
        self.write(registers::REG_FIFO_RX_BASE_ADDR, 0x00)?;

        self.set_mode(Mode::Standby)
    }

    /// Set the carrier frequency in Hz.
    pub fn set_frequency(&mut self, frequency: u32) -> Result<(), Error<I::Error>> {
        self.frequency = frequency;
        // Frf = freq / (FXOSC / 2^19), FXOSC = 32 MHz
        let frf = (frequency as u64 * (1 << 19) / 32_000_000) as u32;
        self.write(registers::REG_FRF_MSB, ((frf >> 16) & 0xFF) as u8)?;
        self.write(registers::REG_FRF_MID, ((frf >> 8) & 0xFF) as u8)?;
        self.write(registers::REG_FRF_LSB, (frf & 0xFF) as u8)
    }

    /// Set transmit power in dBm on the PA_BOOST output.
    pub fn set_tx_power(&mut self, power: i8) -> Result<(), Error<I::Error>> {
        let power = power.clamp(2, 17) as u8;
        self.write(registers::REG_PA_CONFIG, registers::PA_BOOST | (power - 2))
    }

    /// Set the spreading factor (6..=12).
    pub fn set_spreading_factor(&mut self, sf: u8) -> Result<(), Error<I::Error>> {
        let sf = sf.clamp(6, 12);
        // SF6 needs different detection settings per the datasheet.
        let (optimize, threshold) = if sf == 6 { (0xC5, 0x0C) } else { (0xC3, 0x0A) };
        self.write(registers::REG_DETECTION_OPTIMIZE, optimize)?;
        self.write(registers::REG_DETECTION_THRESHOLD, threshold)?;
        let config2 = self.read(registers::REG_MODEM_CONFIG_2)?;
        self.write(
            registers::REG_MODEM_CONFIG_2,
            (config2 & 0x0F) | ((sf << 4) & 0xF0),
        )
    }

    /// Set the signal bandwidth, rounded up to the nearest supported bin.
    pub fn set_bandwidth(&mut self, bandwidth: u32) -> Result<(), Error<I::Error>> {
        let bw: u8 = match bandwidth {
            b if b <= 7_800 => 0,
            b if b <= 10_400 => 1,
            b if b <= 15_600 => 2,
            b if b <= 20_800 => 3,
            b if b <= 31_250 => 4,
            b if b <= 41_700 => 5,
            b if b <= 62_500 => 6,
            b if b <= 125_000 => 7,
            b if b <= 250_000 => 8,
            _ => 9,
        };
        let config1 = self.read(registers::REG_MODEM_CONFIG_1)?;
        self.write(registers::REG_MODEM_CONFIG_1, (config1 & 0x0F) | (bw << 4))
    }

    /// Set the coding rate denominator (5..=8).
    pub fn set_coding_rate(&mut self, denominator: u8) -> Result<(), Error<I::Error>> {
        let cr = denominator.clamp(5, 8) - 4;
        let config1 = self.read(registers::REG_MODEM_CONFIG_1)?;
        self.write(registers::REG_MODEM_CONFIG_1, (config1 & 0xF1) | (cr << 1))
    }

    /// Set the preamble length in symbols.
    pub fn set_preamble_length(&mut self, length: u16) -> Result<(), Error<I::Error>> {
        self.write(registers::REG_PREAMBLE_MSB, (length >> 8) as u8)?;
        self.write(registers::REG_PREAMBLE_LSB, (length & 0xFF) as u8)
    }

    /// Enable or disable the chip's payload CRC.
    pub fn enable_crc(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        let config2 = self.read(registers::REG_MODEM_CONFIG_2)?;
        let config2 = if enable { config2 | 0x04 } else { config2 & 0xFB };
        self.write(registers::REG_MODEM_CONFIG_2, config2)
    }

    /// Switch the chip operating mode.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<I::Error>> {
        self.write(registers::REG_OP_MODE, mode.bits())
    }

    /// Load `frame` into the FIFO and start transmitting.
    ///
    /// Returns as soon as the chip is in TX mode; completion is signalled
    /// by the TX-done interrupt. The caller guarantees `frame` fits the
    /// FIFO (the codec enforces this before any hardware action).
    pub fn arm_transmit(&mut self, frame: &[u8]) -> Result<(), Error<I::Error>> {
        self.set_mode(Mode::Standby)?;
        // Raise DIO0 on TX done.
        self.write(registers::REG_DIO_MAPPING_1, registers::DIO0_TX_DONE)?;
        self.write(registers::REG_FIFO_ADDR_PTR, 0x00)?;
        self.write(registers::REG_PAYLOAD_LENGTH, frame.len() as u8)?;
        self.regs
            .write_burst(registers::REG_FIFO, frame)
            .map_err(Error::Bus)?;
        self.set_mode(Mode::Tx)
    }

    /// Enter continuous receive, raising DIO0 on each completed packet.
    ///
    /// The chip keeps the last packet at `FIFO_RX_CURRENT_ADDR`, so no
    /// pointer reset is needed here.
    pub fn arm_receive(&mut self) -> Result<(), Error<I::Error>> {
        self.write(registers::REG_DIO_MAPPING_1, registers::DIO0_RX_DONE)?;
        self.set_mode(Mode::RxContinuous)
    }

    /// Drop into sleep mode.
    pub fn enter_low_power(&mut self) -> Result<(), Error<I::Error>> {
        self.set_mode(Mode::Sleep)
    }

    /// Return to standby.
    pub fn standby(&mut self) -> Result<(), Error<I::Error>> {
        self.set_mode(Mode::Standby)
    }

    /// Read which interrupt conditions fired and clear them on the chip.
    ///
    /// This must be the first bus access on the interrupt path: clearing
    /// before any buffer access keeps a second physical event from being
    /// conflated with stale flags.
    pub fn clear_and_read_irq_flags(&mut self) -> Result<IrqFlags, Error<I::Error>> {
        let flags = self.read(registers::REG_IRQ_FLAGS)?;
        // Writing a set bit back clears it.
        self.write(registers::REG_IRQ_FLAGS, flags)?;
        Ok(IrqFlags(flags))
    }

    /// Burst-read the most recently received frame out of the FIFO.
    ///
    /// Returns the number of bytes written into `buffer`.
    pub fn read_packet(
        &mut self,
        buffer: &mut [u8; MAX_FRAME_LEN],
    ) -> Result<usize, Error<I::Error>> {
        let current = self.read(registers::REG_FIFO_RX_CURRENT_ADDR)?;
        self.write(registers::REG_FIFO_ADDR_PTR, current)?;
        let len = self.read(registers::REG_RX_NB_BYTES)? as usize;
        self.regs
            .read_burst(registers::REG_FIFO, &mut buffer[..len])
            .map_err(Error::Bus)?;
        Ok(len)
    }

    /// RSSI of the last received packet in dBm.
    ///
    /// Valid only while handling that packet's receive interrupt; the next
    /// packet overwrites the reading.
    pub fn packet_rssi(&mut self) -> Result<i16, Error<I::Error>> {
        let raw = self.read(registers::REG_PKT_RSSI_VALUE)? as i16;
        let offset = if self.frequency < RF_MID_BAND_THRESHOLD { 164 } else { 157 };
        Ok(raw - offset)
    }

    /// SNR of the last received packet in dB.
    pub fn packet_snr(&mut self) -> Result<f32, Error<I::Error>> {
        let raw = self.read(registers::REG_PKT_SNR_VALUE)? as i8;
        Ok(raw as f32 * 0.25)
    }
}
