//! Modem configuration
//!
//! Both ends of a link must share the same modulation settings; the
//! defaults here describe a common 915 MHz, SF7/125 kHz setup.

/// SX127x modem settings applied during [`init`](crate::radio::Sx127x::init).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemConfig {
    /// Carrier frequency in Hz
    pub frequency: u32,
    /// Transmit power in dBm, clamped to the PA_BOOST range (2..=17)
    pub tx_power: i8,
    /// Signal bandwidth in Hz
    pub bandwidth: u32,
    /// Spreading factor (6..=12)
    pub spreading_factor: u8,
    /// Coding rate denominator (5..=8, i.e. 4/5 through 4/8)
    pub coding_rate: u8,
    /// Preamble length in symbols
    pub preamble_length: u16,
    /// Sync word; 0x12 is the conventional private-network value
    pub sync_word: u8,
    /// Enable the chip's payload CRC
    pub crc_on: bool,
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            frequency: 915_000_000,
            tx_power: 5,
            bandwidth: 125_000,
            spreading_factor: 7,
            coding_rate: 5,
            preamble_length: 8,
            sync_word: 0x12,
            crc_on: true,
        }
    }
}
