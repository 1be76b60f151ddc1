//! Addressed packet layout and codec
//!
//! This module defines the on-air byte layout shared by both ends of a link
//! and converts between it and [`LoraPacket`]. It is pure: no hardware
//! knowledge, no hidden state.
//!
//! A frame is a fixed 4-byte header followed by the raw payload:
//!
//! ```text
//! [dst_address, src_address, src_line_count, pay_length, payload...]
//! ```
//!
//! Each header field is one byte. The declared `pay_length` must equal the
//! number of payload bytes that follow; frames that disagree are rejected
//! rather than truncated. The chip's own CRC is the only integrity check,
//! so the header carries no additional checksum.

use heapless::Vec;

/// Number of header bytes preceding the payload on air.
pub const HEADER_LEN: usize = 4;

/// Largest frame the SX127x FIFO can hold.
pub const MAX_FRAME_LEN: usize = 255;

/// Largest payload that fits in a frame alongside the header.
pub const MAX_PAYLOAD_LEN: usize = MAX_FRAME_LEN - HEADER_LEN;

/// Destination address reserved for broadcast.
pub const BROADCAST_ADDRESS: u8 = 0xFF;

/// Packet codec error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Payload exceeds [`MAX_PAYLOAD_LEN`]
    PayloadTooLarge,
    /// Frame shorter than the fixed header
    TruncatedFrame,
    /// Declared payload length disagrees with the bytes present
    LengthMismatch,
    /// Payload is not valid UTF-8 text
    InvalidText,
}

/// A single addressed packet.
///
/// Built either by [`decode`] from a received frame or locally for
/// transmission. `rssi` and `snr` are `Some` exactly when the packet came
/// from a receive event; packets built for sending leave them `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoraPacket {
    /// Sender identifier
    pub src_address: u8,
    /// Recipient identifier
    pub dst_address: u8,
    /// Sender's wrapping sequence counter, for duplicate/ordering
    /// detection by the application layer
    pub src_line_count: u8,
    /// Received signal strength in dBm, receive events only
    pub rssi: Option<i16>,
    /// Signal-to-noise ratio in dB, receive events only
    pub snr: Option<f32>,
    // Private so pay_length() can never disagree with the payload.
    msg: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl LoraPacket {
    /// Raw payload bytes.
    pub fn msg(&self) -> &[u8] {
        &self.msg
    }

    /// Payload length in bytes, as carried in the header.
    pub fn pay_length(&self) -> u8 {
        self.msg.len() as u8
    }

    /// Payload interpreted as UTF-8 text.
    ///
    /// Derived from the raw payload on demand; fails with
    /// [`CodecError::InvalidText`] instead of substituting replacement
    /// characters.
    pub fn msg_txt(&self) -> Result<&str, CodecError> {
        core::str::from_utf8(&self.msg).map_err(|_| CodecError::InvalidText)
    }
}

/// Encode an addressed message into its on-air frame.
///
/// Fails with [`CodecError::PayloadTooLarge`] before any hardware action
/// when the payload would not fit the chip FIFO.
pub fn encode(
    dst_address: u8,
    src_address: u8,
    line_count: u8,
    payload: &[u8],
) -> Result<Vec<u8, MAX_FRAME_LEN>, CodecError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(CodecError::PayloadTooLarge);
    }

    let mut frame = Vec::new();
    // Header capacity is statically sufficient, so these cannot fail.
    let _ = frame.push(dst_address);
    let _ = frame.push(src_address);
    let _ = frame.push(line_count);
    let _ = frame.push(payload.len() as u8);
    let _ = frame.extend_from_slice(payload);
    Ok(frame)
}

/// Decode a received frame into a [`LoraPacket`].
///
/// The returned packet has no signal-quality readings; the receive path
/// fills those in from the chip's status registers. Frames whose declared
/// length disagrees with the bytes actually present are dropped rather
/// than truncated to the shorter of the two.
pub fn decode(frame: &[u8]) -> Result<LoraPacket, CodecError> {
    if frame.len() < HEADER_LEN {
        return Err(CodecError::TruncatedFrame);
    }
    let declared = frame[3] as usize;
    let body = &frame[HEADER_LEN..];
    if declared != body.len() {
        return Err(CodecError::LengthMismatch);
    }

    let mut msg = Vec::new();
    // Only reachable with a frame longer than the chip FIFO allows.
    msg.extend_from_slice(body).map_err(|_| CodecError::PayloadTooLarge)?;
    Ok(LoraPacket {
        dst_address: frame[0],
        src_address: frame[1],
        src_line_count: frame[2],
        rssi: None,
        snr: None,
        msg,
    })
}
