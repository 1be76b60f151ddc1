//! Interrupt-driven point-to-point packet link for SX127x LoRa radios
//!
//! This crate drives a Semtech SX127x transceiver as a small addressed
//! packet link: four header bytes (destination, source, line counter,
//! length) followed by an opaque payload. Transmit and receive are both
//! interrupt driven; the application never busy-waits on the radio, and
//! the chip rests in continuous receive between operations.
//!
//! # Features
//! - Non-blocking send with `nb`-style completion polling
//! - Continuous receive with a newest-wins single-packet inbox
//! - Signal quality (RSSI/SNR) captured per received packet
//! - Register access behind a trait, so the full state machine runs
//!   against a fake bus in host tests
//! - No unsafe code, `no_std`
//!
//! # Example
//! ```no_run
//! use loralink::{config::ModemConfig, link::LoraLink, radio::Sx127x};
//! # struct FakeBus;
//! # impl loralink::radio::Registers for FakeBus {
//! #     type Error = core::convert::Infallible;
//! #     fn read_register(&mut self, _: u8) -> Result<u8, Self::Error> { Ok(0x12) }
//! #     fn write_register(&mut self, _: u8, _: u8) -> Result<(), Self::Error> { Ok(()) }
//! #     fn read_burst(&mut self, _: u8, _: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write_burst(&mut self, _: u8, _: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # let bus = FakeBus;
//!
//! let mut link = LoraLink::new(Sx127x::new(bus));
//! link.init(&ModemConfig::default())?;
//!
//! // Broadcast a packet; completion arrives via the DIO0 interrupt,
//! // whose handler calls link.on_interrupt().
//! link.send(0xFF, 0x11, b"Hello World")?;
//!
//! if link.is_packet_available() {
//!     let packet = link.read_packet()?;
//!     if let Ok(text) = packet.msg_txt() {
//!         let _ = (text, packet.rssi, packet.snr);
//!     }
//! }
//! # Ok::<(), loralink::link::Error<core::convert::Infallible>>(())
//! ```

#![warn(missing_docs)]
#![no_std]

/// Modem configuration
pub mod config;

/// Interrupt-driven link state machine and facade
pub mod link;

/// Addressed packet layout and codec
pub mod packet;

/// Register transport and SX127x mode controller
pub mod radio;

pub use config::ModemConfig;
pub use link::{LoraLink, OperationState, WaitForInterrupt};
pub use packet::{CodecError, LoraPacket};
