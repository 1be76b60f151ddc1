//! Radio hardware access
//!
//! Split into three layers: the [`Registers`] transport contract, a
//! blocking-SPI implementation of it, and the [`Sx127x`] mode controller
//! that drives the chip through its operating modes.

pub mod registers;
pub mod spi;
pub mod sx127x;

pub use registers::{IrqFlags, Mode, Registers};
pub use spi::{BusError, SpiBus};
pub use sx127x::{Error, Sx127x};
