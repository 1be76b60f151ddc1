//! Interrupt-driven packet link
//!
//! [`LoraLink`] is the public surface of the driver: it submits outbound
//! packets, hands out inbound ones, and owns the state machine driven by
//! the radio's DIO0 interrupt.
//!
//! # Concurrency
//!
//! The driver assumes a single application thread plus a hardware
//! interrupt that preempts it. Ownership is enforced at the edges: wrap
//! the link in your platform's critical-section mutex, register an ISR
//! shim that locks it and calls [`LoraLink::on_interrupt`], and call the
//! facade methods from thread context under the same lock. Within that
//! discipline the handler is the only writer of completion state (the
//! inbound slot, the TX-done transition) and the facade is the only
//! writer of request state (arming a transmit or receive), so no further
//! synchronization is needed.
//!
//! # Send contract
//!
//! [`LoraLink::send`] arms the transmit and returns immediately; the
//! radio finishes in the background and the TX-done interrupt re-arms
//! continuous receive. Use [`LoraLink::flush`] or
//! [`LoraLink::is_transmitting`] to observe completion, optionally
//! parking the CPU with [`LoraLink::sleep_until_interrupt`] between
//! polls. No in-flight cancellation or timeout is provided; a stuck
//! radio must be handled by an external timer.

use crate::config::ModemConfig;
use crate::packet::{self, CodecError, LoraPacket, MAX_FRAME_LEN};
use crate::radio::{self, Registers, Sx127x};

/// Link error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Radio error
    Radio(radio::Error<E>),
    /// Packet codec error
    Codec(CodecError),
    /// A transmit is already in flight
    BusyTransmitting,
    /// `read_packet` called with nothing queued
    NoPacketAvailable,
    /// Operation not permitted in the current state
    InvalidState,
}

impl<E> From<radio::Error<E>> for Error<E> {
    fn from(error: radio::Error<E>) -> Self {
        Error::Radio(error)
    }
}

impl<E> From<CodecError> for Error<E> {
    fn from(error: CodecError) -> Self {
        Error::Codec(error)
    }
}

/// Current radio operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperationState {
    /// Radio idle in standby or sleep
    Idle,
    /// A transmit is in flight
    TransmitArmed,
    /// Continuous receive is active
    ReceiveArmed,
}

/// CPU low-power wait primitive, e.g. `cortex_m::asm::wfi`.
///
/// Purely a power-saving aid: waking carries no guarantee about which
/// interrupt occurred, or that any occurred at all.
pub trait WaitForInterrupt {
    /// Suspend the CPU until any interrupt.
    fn wait(&mut self);
}

impl<F: FnMut()> WaitForInterrupt for F {
    fn wait(&mut self) {
        self()
    }
}

/// Addressed-packet link over an SX127x radio.
pub struct LoraLink<I: Registers> {
    radio: Sx127x<I>,
    state: OperationState,
    inbound: Option<LoraPacket>,
    line_count: u8,
}

impl<I: Registers> LoraLink<I> {
    /// Build a link over an uninitialized radio. Call
    /// [`init`](Self::init) before sending or listening.
    pub fn new(radio: Sx127x<I>) -> Self {
        Self {
            radio,
            state: OperationState::Idle,
            inbound: None,
            line_count: 0,
        }
    }

    /// Configure the modem and enter continuous receive.
    pub fn init(&mut self, config: &ModemConfig) -> Result<(), Error<I::Error>> {
        self.radio.init(config)?;
        self.listen()
    }

    /// Current operation state.
    pub fn state(&self) -> OperationState {
        self.state
    }

    /// Direct access to the radio, for configuration changes while idle.
    pub fn radio_mut(&mut self) -> &mut Sx127x<I> {
        &mut self.radio
    }

    /// Encode an addressed packet and start transmitting it.
    ///
    /// Returns as soon as the radio is armed; completion arrives via
    /// [`on_interrupt`](Self::on_interrupt), after which the link rests
    /// in continuous receive. Each successful send increments the
    /// wrapping line counter stamped into the header.
    pub fn send(
        &mut self,
        dst_address: u8,
        src_address: u8,
        payload: &[u8],
    ) -> Result<(), Error<I::Error>> {
        if self.state == OperationState::TransmitArmed {
            return Err(Error::BusyTransmitting);
        }
        let line_count = self.line_count.wrapping_add(1);
        let frame = packet::encode(dst_address, src_address, line_count, payload)?;
        self.radio.arm_transmit(&frame)?;
        self.line_count = line_count;
        self.state = OperationState::TransmitArmed;
        Ok(())
    }

    /// Completion poll for an in-flight transmit.
    ///
    /// `WouldBlock` while the transmit is still in the air.
    pub fn flush(&self) -> nb::Result<(), core::convert::Infallible> {
        if self.state == OperationState::TransmitArmed {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    /// Whether a transmit is currently in flight.
    pub fn is_transmitting(&self) -> bool {
        self.state == OperationState::TransmitArmed
    }

    /// Enter continuous receive.
    ///
    /// A no-op when already receive-armed; fails with
    /// [`Error::BusyTransmitting`] rather than aborting an in-flight
    /// transmit.
    pub fn listen(&mut self) -> Result<(), Error<I::Error>> {
        match self.state {
            OperationState::TransmitArmed => Err(Error::BusyTransmitting),
            OperationState::ReceiveArmed => Ok(()),
            OperationState::Idle => {
                self.radio.arm_receive()?;
                self.state = OperationState::ReceiveArmed;
                Ok(())
            }
        }
    }

    /// Stop receiving and return the radio to standby.
    pub fn standby(&mut self) -> Result<(), Error<I::Error>> {
        if self.state == OperationState::TransmitArmed {
            return Err(Error::BusyTransmitting);
        }
        self.radio.standby()?;
        self.state = OperationState::Idle;
        Ok(())
    }

    /// Put the radio into its lowest-power mode.
    ///
    /// Only valid while idle; call [`standby`](Self::standby) first to
    /// leave continuous receive.
    pub fn sleep(&mut self) -> Result<(), Error<I::Error>> {
        if self.state != OperationState::Idle {
            return Err(Error::InvalidState);
        }
        self.radio.enter_low_power()?;
        Ok(())
    }

    /// Whether a received packet is waiting.
    pub fn is_packet_available(&self) -> bool {
        self.inbound.is_some()
    }

    /// Take the queued packet.
    ///
    /// Fails with [`Error::NoPacketAvailable`] when nothing is queued;
    /// guard with [`is_packet_available`](Self::is_packet_available).
    pub fn read_packet(&mut self) -> Result<LoraPacket, Error<I::Error>> {
        self.inbound.take().ok_or(Error::NoPacketAvailable)
    }

    /// Park the CPU until the next interrupt, radio-related or not.
    pub fn sleep_until_interrupt<W: WaitForInterrupt>(&self, wfi: &mut W) {
        wfi.wait();
    }

    /// Handle a DIO0 edge. Call this, and nothing else, from the
    /// platform interrupt for the radio's interrupt line.
    ///
    /// Flags are read and cleared before any buffer access so a second
    /// physical event cannot be misattributed. Corrupt frames (chip CRC
    /// failure or a frame the codec rejects) are dropped silently and
    /// the receiver stays armed; only bus transport failures surface,
    /// for the ISR shim to record as it sees fit. A delivered packet
    /// overwrites any previous undelivered one.
    pub fn on_interrupt(&mut self) -> Result<(), radio::Error<I::Error>> {
        let flags = self.radio.clear_and_read_irq_flags()?;

        if flags.tx_done() {
            // Transmit finished; continuous receive is the resting state.
            self.radio.arm_receive()?;
            self.state = OperationState::ReceiveArmed;
        }

        if flags.rx_done() {
            if !flags.crc_error() && !flags.rx_timeout() {
                let mut buffer = [0u8; MAX_FRAME_LEN];
                let len = self.radio.read_packet(&mut buffer)?;
                // Transient readings: only valid until the next packet
                // lands, so capture them inside this handler.
                let rssi = self.radio.packet_rssi()?;
                let snr = self.radio.packet_snr()?;
                if let Ok(mut pkt) = packet::decode(&buffer[..len]) {
                    pkt.rssi = Some(rssi);
                    pkt.snr = Some(snr);
                    self.inbound = Some(pkt);
                }
            }
            // The chip remains in continuous receive after RX done,
            // including the CRC-error case.
            self.state = OperationState::ReceiveArmed;
        }

        Ok(())
    }
}
